use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{Provider, TranslationRequest, TranslationResponse};
use crate::errors::ProviderError;

/// Public MyMemory endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.mymemory.translated.net";

/// Client for the MyMemory translation API
#[derive(Debug, Clone)]
pub struct MyMemory {
    client: Client,
    endpoint: String,
    /// Sent as `de`; MyMemory grants a larger daily quota to identified callers
    contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<ResponseData>,
    /// A number on success, sometimes a string on errors
    #[serde(rename = "responseStatus", default)]
    response_status: Value,
    #[serde(rename = "responseDetails", default)]
    response_details: Value,
}

#[derive(Debug, Deserialize)]
struct ResponseData {
    #[serde(rename = "translatedText", default)]
    translated_text: Option<String>,
    #[serde(rename = "match", default)]
    match_quality: Option<f64>,
}

impl MyMemory {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint: String = endpoint.into();
        let endpoint = if endpoint.trim().is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint.trim_end_matches('/').to_string()
        };

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint,
            contact_email: None,
        }
    }

    pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.contact_email = if email.trim().is_empty() { None } else { Some(email) };
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_url(&self) -> String {
        format!("{}/get", self.endpoint)
    }

    /// Interpret a response body
    pub fn parse_response(body: &str) -> Result<TranslationResponse, ProviderError> {
        let parsed: MyMemoryResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let status = match &parsed.response_status {
            Value::Number(n) => n.as_u64().unwrap_or(200),
            Value::String(s) => s.trim().parse().unwrap_or(200),
            _ => 200,
        };
        if status != 200 {
            let details = match &parsed.response_details {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            return Err(ProviderError::from_status(status as u16, details));
        }

        let data = parsed
            .response_data
            .ok_or_else(|| ProviderError::ParseError("Missing responseData".to_string()))?;

        Ok(TranslationResponse {
            text: data.translated_text.unwrap_or_default(),
            match_quality: data.match_quality,
        })
    }
}

#[async_trait]
impl Provider for MyMemory {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let langpair = format!("{}|{}", request.source_language, request.target_language);
        let mut query = vec![("q", request.text.as_str()), ("langpair", langpair.as_str())];
        if let Some(email) = &self.contact_email {
            query.push(("de", email.as_str()));
        }

        debug!("Translating {} chars ({})", request.text.len(), langpair);

        let response = self
            .client
            .get(self.api_url())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("MyMemory API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        Self::parse_response(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate(TranslationRequest::new("olá", "pt", "es")).await?;
        Ok(())
    }
}
