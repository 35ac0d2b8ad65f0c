/*!
 * Remote service clients.
 *
 * - MyMemory: dialogue line translation
 * - Supabase: per-user preference storage over PostgREST
 * - Mock: in-process stand-ins for tests and offline use
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One line to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    /// ISO 639-1 source language, e.g. `pt`
    pub source_language: String,
    /// ISO 639-1 target language, e.g. `es`
    pub target_language: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResponse {
    pub text: String,
    /// Service-reported match quality in `0.0..=1.0`, when given
    pub match_quality: Option<f64>,
}

/// Common trait for translation services
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Translate a single line
    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError>;

    /// Check that the service answers
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Remote per-user preference storage
#[async_trait]
pub trait PreferenceStore: Send + Sync + Debug {
    /// `Ok(None)` when no preference row exists for the user
    async fn load_voice_buttons_enabled(&self, user_id: &str) -> Result<Option<bool>, ProviderError>;

    /// Insert or update the user's preference row
    async fn save_voice_buttons_enabled(&self, user_id: &str, enabled: bool) -> Result<(), ProviderError>;
}

pub mod mymemory;
pub mod supabase;
pub mod mock;

pub use mymemory::MyMemory;
pub use supabase::SupabasePreferenceStore;
