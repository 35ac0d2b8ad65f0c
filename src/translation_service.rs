use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationConfig;
use crate::providers::{MyMemory, Provider, TranslationRequest};
use crate::script::{format_dialogues, DialogueDocLine, Scene};

// @module: Line-by-line translation of the dialogues-only document

// @struct: Counters for one translation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationStats {
    // @field: Lines in the source document
    pub lines_total: usize,

    // @field: Speech lines sent to the provider
    pub lines_sent: usize,

    // @field: Speech lines replaced by a translation
    pub lines_translated: usize,

    // @field: Speech lines kept in the original language
    pub lines_failed: usize,

    // @field: Wall-clock time of the run
    pub duration: Duration,
}

impl TranslationStats {
    // @returns: Human readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} of {} spoken lines translated ({} kept as original) in {:.1}s",
            self.lines_translated,
            self.lines_sent,
            self.lines_failed,
            self.duration.as_secs_f64()
        )
    }
}

// @struct: Translated document plus run counters
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub text: String,
    pub stats: TranslationStats,
}

// @struct: Translates speech lines through a provider, one request per line
#[derive(Debug, Clone)]
pub struct TranslationService {
    provider: Arc<dyn Provider>,
    source_language: String,
    target_language: String,
    request_delay: Duration,
}

impl TranslationService {
    // @creates: Service using the given provider and the configured languages and delay
    pub fn new(provider: Arc<dyn Provider>, config: &TranslationConfig) -> Self {
        Self {
            provider,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
            request_delay: Duration::from_millis(config.request_delay_ms),
        }
    }

    // @creates: Service backed by the MyMemory API
    pub fn from_config(config: &TranslationConfig) -> Self {
        let client = MyMemory::new(config.endpoint.clone(), config.timeout_secs)
            .with_contact_email(config.contact_email.clone());
        Self::new(Arc::new(client), config)
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    // @returns: Number of speech lines that will be sent for a document
    pub fn count_requests(document: &str) -> usize {
        document
            .split('\n')
            .filter(|line| matches!(DialogueDocLine::classify(line), DialogueDocLine::Speech(text) if !text.is_empty()))
            .count()
    }

    // @translates: Dialogues-only projection of the scenes
    pub async fn translate_dialogues(&self, scenes: &[Scene]) -> TranslationOutcome {
        self.translate_document(&format_dialogues(scenes)).await
    }

    // @translates: A dialogues-only document
    pub async fn translate_document(&self, document: &str) -> TranslationOutcome {
        self.translate_document_with_progress(document, |_, _| {}).await
    }

    // @translates: A dialogues-only document, reporting (done, total) after each request
    pub async fn translate_document_with_progress<F>(&self, document: &str, mut progress: F) -> TranslationOutcome
    where
        F: FnMut(usize, usize),
    {
        let start = Instant::now();
        let total_requests = Self::count_requests(document);
        let mut stats = TranslationStats::default();
        let mut output: Vec<String> = Vec::new();

        info!(
            "Translating {} spoken lines with {} ({} -> {})",
            total_requests,
            self.provider.name(),
            self.source_language,
            self.target_language
        );

        for line in document.split('\n') {
            stats.lines_total += 1;

            match DialogueDocLine::classify(line) {
                DialogueDocLine::Blank => output.push(String::new()),
                DialogueDocLine::Speech(text) if !text.is_empty() => {
                    stats.lines_sent += 1;
                    match self.translate_line(text).await {
                        Some(translated) => {
                            stats.lines_translated += 1;
                            output.push(format!("- {}", translated));
                        }
                        None => {
                            stats.lines_failed += 1;
                            output.push(line.to_string());
                        }
                    }
                    progress(stats.lines_sent, total_requests);
                    tokio::time::sleep(self.request_delay).await;
                }
                _ => output.push(line.to_string()),
            }
        }

        stats.duration = start.elapsed();
        info!("{}", stats.summary());

        TranslationOutcome {
            text: output.join("\n"),
            stats,
        }
    }

    // @returns: The translation, or None when the line should stay as is
    async fn translate_line(&self, text: &str) -> Option<String> {
        let request = TranslationRequest::new(text, &self.source_language, &self.target_language);

        match self.provider.translate(request).await {
            Ok(response) if !response.text.trim().is_empty() => {
                debug!("Translated {:?} -> {:?}", text, response.text);
                Some(response.text.trim().to_string())
            }
            Ok(_) => {
                warn!("Empty translation for {:?}, keeping original", text);
                None
            }
            Err(e) => {
                warn!("Translation failed for {:?}, keeping original: {}", text, e);
                None
            }
        }
    }
}
