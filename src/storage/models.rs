/*!
 * Stored keys and the versioned JSON documents kept under them.
 *
 * Scenes and saved scripts are wrapped in `{ "version": N, ... }` envelopes.
 * The browser app stored them as bare arrays; those are upgraded on read.
 */

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::editor::{SavedScript, StateChange};
use crate::script::Scene;

/// Version written into every envelope
pub const DOCUMENT_VERSION: u64 = 1;

/// Keys of the local store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Scenes,
    Notes,
    Counter,
    Ideas,
    SavedScripts,
    VoiceButtonsEnabled,
    UserId,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        StorageKey::Scenes,
        StorageKey::Notes,
        StorageKey::Counter,
        StorageKey::Ideas,
        StorageKey::SavedScripts,
        StorageKey::VoiceButtonsEnabled,
        StorageKey::UserId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Scenes => "roteiro_scenes",
            StorageKey::Notes => "roteiro_notes",
            StorageKey::Counter => "roteiro_counter",
            StorageKey::Ideas => "roteiro_ideas",
            StorageKey::SavedScripts => "roteiro_saved_scripts",
            StorageKey::VoiceButtonsEnabled => "roteiro_voice_buttons_enabled",
            StorageKey::UserId => "roteiro_user_id",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| anyhow!("Unknown storage key: {}", s))
    }
}

impl From<StateChange> for StorageKey {
    fn from(change: StateChange) -> Self {
        match change {
            StateChange::Scenes => StorageKey::Scenes,
            StateChange::Notes => StorageKey::Notes,
            StateChange::Counter => StorageKey::Counter,
            StateChange::Ideas => StorageKey::Ideas,
            StateChange::SavedScripts => StorageKey::SavedScripts,
            StateChange::VoiceButtons => StorageKey::VoiceButtonsEnabled,
        }
    }
}

#[derive(Serialize)]
struct ScenesEnvelope<'a> {
    version: u64,
    scenes: &'a [Scene],
}

#[derive(Serialize)]
struct ScriptsEnvelope<'a> {
    version: u64,
    scripts: &'a [SavedScript],
}

pub fn encode_scenes(scenes: &[Scene]) -> Result<String> {
    let envelope = ScenesEnvelope {
        version: DOCUMENT_VERSION,
        scenes,
    };
    serde_json::to_string(&envelope).context("Failed to serialize scenes")
}

pub fn encode_saved_scripts(scripts: &[SavedScript]) -> Result<String> {
    let envelope = ScriptsEnvelope {
        version: DOCUMENT_VERSION,
        scripts,
    };
    serde_json::to_string(&envelope).context("Failed to serialize saved scripts")
}

pub fn decode_scenes(raw: &str) -> Result<Vec<Scene>> {
    decode_document(raw, "scenes")
}

pub fn decode_saved_scripts(raw: &str) -> Result<Vec<SavedScript>> {
    decode_document(raw, "scripts")
}

/// Read an envelope, or a legacy bare array, holding a list under `field`
fn decode_document<T: DeserializeOwned>(raw: &str, field: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(raw).with_context(|| format!("Stored {} are not valid JSON", field))?;

    match value {
        Value::Array(_) => {
            debug!("Upgrading legacy {} document", field);
            serde_json::from_value(value).with_context(|| format!("Malformed legacy {} document", field))
        }
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| anyhow!("Stored {} document has no version", field))?;

            if version != DOCUMENT_VERSION {
                return Err(anyhow!(
                    "Stored {} document has version {}, supported version is {}",
                    field,
                    version,
                    DOCUMENT_VERSION
                ));
            }

            let items = map.remove(field).unwrap_or_else(|| Value::Array(Vec::new()));
            serde_json::from_value(items).with_context(|| format!("Malformed {} document", field))
        }
        _ => Err(anyhow!("Stored {} document has an unexpected shape", field)),
    }
}
