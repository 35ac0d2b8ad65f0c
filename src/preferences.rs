/*!
 * User preferences.
 *
 * The voice-button flag is kept in the remote preference store when one is
 * configured, keyed by an opaque user id generated once per installation.
 * Remote failures never reach the caller; the flag falls back to enabled.
 */

use chrono::Utc;
use log::{debug, error, info, warn};
use rand::Rng;
use std::sync::Arc;

use crate::app_config::PreferencesConfig;
use crate::providers::{PreferenceStore, SupabasePreferenceStore};
use crate::storage::Repository;

const USER_ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build a fresh id of the form `user_{millis}_{7 base-36 chars}`
pub fn generate_user_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..USER_ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("user_{}_{}", Utc::now().timestamp_millis(), suffix)
}

pub struct PreferenceService {
    repository: Repository,
    remote: Option<Arc<dyn PreferenceStore>>,
}

impl PreferenceService {
    pub fn new(repository: Repository, remote: Option<Arc<dyn PreferenceStore>>) -> Self {
        Self { repository, remote }
    }

    /// Remote store only when an endpoint is configured
    pub fn from_config(config: &PreferencesConfig, repository: Repository) -> Self {
        let remote: Option<Arc<dyn PreferenceStore>> = if config.is_remote() {
            Some(Arc::new(SupabasePreferenceStore::new(
                config.endpoint.clone(),
                config.api_key.clone(),
                config.table.clone(),
                config.timeout_secs,
            )))
        } else {
            debug!("No preferences endpoint configured, keeping preferences local");
            None
        };
        Self::new(repository, remote)
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Stored user id, created and stored on first use
    pub fn user_id(&self) -> String {
        if let Some(id) = self.repository.load_user_id() {
            return id;
        }

        let id = generate_user_id();
        info!("Generated user id {}", id);
        if let Err(e) = self.repository.save_user_id(&id) {
            warn!("Failed to store user id: {:#}", e);
        }
        id
    }

    /// Current flag; enabled when nothing is stored or the store fails
    pub async fn load_voice_buttons_enabled(&self) -> bool {
        let Some(remote) = &self.remote else {
            return self.repository.load_voice_buttons_enabled();
        };

        let user_id = self.user_id();
        match remote.load_voice_buttons_enabled(&user_id).await {
            Ok(Some(enabled)) => enabled,
            Ok(None) => {
                debug!("No remote preferences for {}, using default", user_id);
                true
            }
            Err(e) => {
                error!("Failed to load preferences: {}", e);
                true
            }
        }
    }

    /// Push the flag to the remote store; failures are only logged
    pub async fn save_voice_buttons_enabled(&self, enabled: bool) {
        let Some(remote) = &self.remote else {
            return;
        };

        let user_id = self.user_id();
        if let Err(e) = remote.save_voice_buttons_enabled(&user_id, enabled).await {
            error!("Failed to save preferences: {}", e);
        }
    }
}
