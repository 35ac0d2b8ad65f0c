/*!
 * Mock providers for tests and offline runs.
 *
 * - `MockProvider::working()` - always translates
 * - `MockProvider::intermittent(n)` - every n-th request fails
 * - `MockProvider::failing()` - always errors
 * - `MockProvider::empty()` - answers with empty text
 * - `MockPreferenceStore` - in-memory preference rows
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{PreferenceStore, Provider, TranslationRequest, TranslationResponse};
use crate::errors::ProviderError;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails on every `fail_every`-th request
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Succeeds with an empty translation
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock translation provider that records what it was asked
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<TranslationRequest>>>,
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Replace the default `[es] text` answer
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in order
    pub fn requested_texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.text.clone()).collect()
    }

    fn answer(&self, request: &TranslationRequest) -> TranslationResponse {
        let text = match self.custom_response {
            Some(generator) => generator(request),
            None => format!("[{}] {}", request.target_language, request.text),
        };
        TranslationResponse {
            text,
            match_quality: Some(1.0),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Working => Ok(self.answer(&request)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.answer(&request))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Empty => Ok(TranslationResponse {
                text: String::new(),
                match_quality: None,
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.answer(&request))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated outage".to_string())),
            _ => Ok(()),
        }
    }
}

/// In-memory preference store
#[derive(Debug, Clone, Default)]
pub struct MockPreferenceStore {
    rows: Arc<Mutex<HashMap<String, bool>>>,
    failing: bool,
}

impl MockPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn stored(&self, user_id: &str) -> Option<bool> {
        self.rows.lock().get(user_id).copied()
    }

    fn check(&self) -> Result<(), ProviderError> {
        if self.failing {
            Err(ProviderError::ConnectionError("Simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PreferenceStore for MockPreferenceStore {
    async fn load_voice_buttons_enabled(&self, user_id: &str) -> Result<Option<bool>, ProviderError> {
        self.check()?;
        Ok(self.stored(user_id))
    }

    async fn save_voice_buttons_enabled(&self, user_id: &str, enabled: bool) -> Result<(), ProviderError> {
        self.check()?;
        self.rows.lock().insert(user_id.to_string(), enabled);
        Ok(())
    }
}
