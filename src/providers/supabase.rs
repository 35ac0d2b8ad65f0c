/*!
 * Supabase (PostgREST) preference store.
 *
 * Rows live in a table keyed by `user_id` with a boolean
 * `voice_buttons_enabled` column and an `updated_at` timestamp.
 */

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::PreferenceStore;
use crate::errors::ProviderError;

/// Default preferences table
pub const DEFAULT_TABLE: &str = "user_preferences";

#[derive(Debug, Clone)]
pub struct SupabasePreferenceStore {
    client: Client,
    endpoint: String,
    api_key: String,
    table: String,
}

#[derive(Debug, Serialize)]
struct PreferenceUpsert<'a> {
    user_id: &'a str,
    voice_buttons_enabled: bool,
    updated_at: String,
}

#[derive(Debug, Deserialize)]
struct PreferenceRow {
    voice_buttons_enabled: Option<bool>,
}

impl SupabasePreferenceStore {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        table: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        let endpoint: String = endpoint.into();
        let table: String = table.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: if table.trim().is_empty() { DEFAULT_TABLE.to_string() } else { table },
        }
    }

    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.endpoint, self.table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("Supabase API error ({}): {}", status, error_text);
        Err(ProviderError::from_status(status.as_u16(), error_text))
    }

    /// First row's flag; `None` for no rows or a null column
    pub fn parse_rows(body: &str) -> Result<Option<bool>, ProviderError> {
        let rows: Vec<PreferenceRow> =
            serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(rows.first().and_then(|row| row.voice_buttons_enabled))
    }
}

#[async_trait]
impl PreferenceStore for SupabasePreferenceStore {
    async fn load_voice_buttons_enabled(&self, user_id: &str) -> Result<Option<bool>, ProviderError> {
        let filter = format!("eq.{}", user_id);
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "voice_buttons_enabled"), ("user_id", filter.as_str())])
            .header("Accept", "application/json");

        let response = Self::check_status(self.authorized(request).send().await?).await?;
        let body = response.text().await?;
        let value = Self::parse_rows(&body)?;
        debug!("Loaded remote voice preference for {}: {:?}", user_id, value);
        Ok(value)
    }

    async fn save_voice_buttons_enabled(&self, user_id: &str, enabled: bool) -> Result<(), ProviderError> {
        let row = PreferenceUpsert {
            user_id,
            voice_buttons_enabled: enabled,
            updated_at: Utc::now().to_rfc3339(),
        };
        let request = self
            .client
            .post(self.table_url())
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);

        Self::check_status(self.authorized(request).send().await?).await?;
        debug!("Saved remote voice preference for {}: {}", user_id, enabled);
        Ok(())
    }
}
