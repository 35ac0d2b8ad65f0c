/*!
 * Repository over the key/value store.
 *
 * Raw access is keyed by `StorageKey`; the typed loaders never fail; a
 * missing value yields the default and an unreadable one is logged and
 * replaced by the default.
 */

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error, warn};
use rusqlite::{params, OptionalExtension};

use super::connection::{DatabaseConnection, StoreStats};
use super::models::{self, StorageKey};
use crate::editor::{EditorState, SavedScript, StateChange, StateObserver};
use crate::script::Scene;

/// Repository for local store operations
#[derive(Clone)]
pub struct Repository {
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open the store at the default location
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_default()?))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_in_memory()?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn stats(&self) -> Result<StoreStats> {
        self.db.stats()
    }

    // =========================================================================
    // Raw key/value access
    // =========================================================================

    pub fn get(&self, key: StorageKey) -> Result<Option<String>> {
        self.db.execute(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    [key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    pub fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.db
            .execute(|conn| {
                conn.execute(
                    r#"
                    INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                    "#,
                    params![key.as_str(), value, now],
                )?;
                Ok(())
            })
            .with_context(|| format!("Failed to write {}", key))?;

        debug!("Stored {} ({} bytes)", key, value.len());
        Ok(())
    }

    /// Remove a key; returns whether it existed
    pub fn delete(&self, key: StorageKey) -> Result<bool> {
        self.db.execute(|conn| {
            let affected = conn.execute("DELETE FROM kv_store WHERE key = ?1", [key.as_str()])?;
            Ok(affected > 0)
        })
    }

    /// Fetch a key for a typed loader; read errors are logged and treated as missing
    fn read_for_load(&self, key: StorageKey) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    // =========================================================================
    // Typed values
    // =========================================================================

    pub fn load_scenes(&self) -> Vec<Scene> {
        let Some(raw) = self.read_for_load(StorageKey::Scenes) else {
            return Vec::new();
        };
        models::decode_scenes(&raw).unwrap_or_else(|e| {
            warn!("Ignoring stored scenes: {:#}", e);
            Vec::new()
        })
    }

    pub fn save_scenes(&self, scenes: &[Scene]) -> Result<()> {
        self.set(StorageKey::Scenes, &models::encode_scenes(scenes)?)
    }

    pub fn load_notes(&self) -> String {
        self.read_for_load(StorageKey::Notes).unwrap_or_default()
    }

    pub fn save_notes(&self, notes: &str) -> Result<()> {
        self.set(StorageKey::Notes, notes)
    }

    pub fn load_counter(&self) -> i64 {
        let Some(raw) = self.read_for_load(StorageKey::Counter) else {
            return 0;
        };
        raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring stored counter {:?}", raw);
            0
        })
    }

    pub fn save_counter(&self, counter: i64) -> Result<()> {
        self.set(StorageKey::Counter, &counter.to_string())
    }

    pub fn load_ideas(&self) -> Vec<String> {
        let Some(raw) = self.read_for_load(StorageKey::Ideas) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring stored ideas: {}", e);
            Vec::new()
        })
    }

    pub fn save_ideas(&self, ideas: &[String]) -> Result<()> {
        let raw = serde_json::to_string(ideas).context("Failed to serialize ideas")?;
        self.set(StorageKey::Ideas, &raw)
    }

    pub fn load_saved_scripts(&self) -> Vec<SavedScript> {
        let Some(raw) = self.read_for_load(StorageKey::SavedScripts) else {
            return Vec::new();
        };
        models::decode_saved_scripts(&raw).unwrap_or_else(|e| {
            warn!("Ignoring stored saved scripts: {:#}", e);
            Vec::new()
        })
    }

    pub fn save_saved_scripts(&self, scripts: &[SavedScript]) -> Result<()> {
        self.set(StorageKey::SavedScripts, &models::encode_saved_scripts(scripts)?)
    }

    /// Defaults to enabled
    pub fn load_voice_buttons_enabled(&self) -> bool {
        match self.read_for_load(StorageKey::VoiceButtonsEnabled).as_deref() {
            None => true,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                warn!("Ignoring stored voice button flag {:?}", other);
                true
            }
        }
    }

    pub fn save_voice_buttons_enabled(&self, enabled: bool) -> Result<()> {
        self.set(StorageKey::VoiceButtonsEnabled, if enabled { "true" } else { "false" })
    }

    pub fn load_user_id(&self) -> Option<String> {
        self.read_for_load(StorageKey::UserId).filter(|id| !id.trim().is_empty())
    }

    pub fn save_user_id(&self, user_id: &str) -> Result<()> {
        self.set(StorageKey::UserId, user_id)
    }

    // =========================================================================
    // Whole state
    // =========================================================================

    /// Rebuild the editor state from whatever is stored
    pub fn load_state(&self) -> EditorState {
        EditorState {
            scenes: self.load_scenes(),
            notes: self.load_notes(),
            counter: self.load_counter(),
            ideas: self.load_ideas(),
            saved_scripts: self.load_saved_scripts(),
            voice_buttons_enabled: self.load_voice_buttons_enabled(),
        }
    }

    /// Persist the part of the state a change touched
    pub fn save_change(&self, state: &EditorState, change: StateChange) -> Result<()> {
        match change {
            StateChange::Scenes => self.save_scenes(&state.scenes),
            StateChange::Notes => self.save_notes(&state.notes),
            StateChange::Counter => self.save_counter(state.counter),
            StateChange::Ideas => self.save_ideas(&state.ideas),
            StateChange::SavedScripts => self.save_saved_scripts(&state.saved_scripts),
            StateChange::VoiceButtons => self.save_voice_buttons_enabled(state.voice_buttons_enabled),
        }
    }

    /// Write every part of the state in one transaction
    pub fn save_state(&self, state: &EditorState) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let entries = [
            (StorageKey::Scenes, models::encode_scenes(&state.scenes)?),
            (StorageKey::Notes, state.notes.clone()),
            (StorageKey::Counter, state.counter.to_string()),
            (StorageKey::Ideas, serde_json::to_string(&state.ideas)?),
            (StorageKey::SavedScripts, models::encode_saved_scripts(&state.saved_scripts)?),
            (StorageKey::VoiceButtonsEnabled, state.voice_buttons_enabled.to_string()),
        ];

        self.db.transaction(|tx| {
            for (key, value) in &entries {
                tx.execute(
                    r#"
                    INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                    "#,
                    params![key.as_str(), value, now],
                )?;
            }
            Ok(())
        })
    }
}

impl StateObserver for Repository {
    fn on_change(&mut self, state: &EditorState, change: StateChange) {
        if let Err(e) = self.save_change(state, change) {
            error!("Failed to persist {:?}: {:#}", change, e);
        }
    }
}
