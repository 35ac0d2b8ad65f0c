/*!
 * Tests for the SQLite key/value store and its stored documents
 */

use anyhow::Result;

use roteiro::storage::{DatabaseConnection, Repository, StorageKey};
use crate::common;

/// Test that data written through one connection is visible to a new one
#[test]
fn test_repository_withFileDatabase_shouldSurviveReopen() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::database_path(temp_dir.path());

    {
        let repository = Repository::new(DatabaseConnection::new(&path)?);
        repository.save_notes("ligar para o produtor")?;
        repository.save_counter(7)?;
        repository.save_ideas(&["cena na chuva".to_string()])?;
    }

    let reopened = Repository::new(DatabaseConnection::new(&path)?);
    assert_eq!(reopened.load_notes(), "ligar para o produtor");
    assert_eq!(reopened.load_counter(), 7);
    assert_eq!(reopened.load_ideas(), vec!["cena na chuva".to_string()]);
    assert!(reopened.stats()?.key_count >= 3);

    Ok(())
}

/// Test that documents written by the browser app as bare arrays still load
#[test]
fn test_loadScenes_withLegacyBareArray_shouldUpgrade() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    let legacy = r#"[{"id":"s1","content":"Praia","dialogues":[{"id":"d1","character":"ANA","line":"Oi","isListening":false}]}]"#;
    repository.set(StorageKey::Scenes, legacy)?;

    let scenes = repository.load_scenes();

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].id, "s1");
    assert_eq!(scenes[0].dialogues[0].line, "Oi");
    Ok(())
}

#[test]
fn test_saveScenes_shouldWriteVersionedEnvelope() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    repository.save_scenes(&roteiro::parse_full(common::SAMPLE_SCRIPT))?;

    let raw = repository.get(StorageKey::Scenes)?.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    assert_eq!(value["version"], 1);
    assert_eq!(value["scenes"].as_array().map(|a| a.len()), Some(3));
    Ok(())
}

#[test]
fn test_loadSavedScripts_withUnknownVersion_shouldFallBackToEmpty() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    repository.set(StorageKey::SavedScripts, r#"{"version":9,"scripts":[]}"#)?;

    assert!(repository.load_saved_scripts().is_empty());
    Ok(())
}

#[test]
fn test_loadVoiceButtonsEnabled_shouldDefaultToTrue() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    assert!(repository.load_voice_buttons_enabled());

    repository.save_voice_buttons_enabled(false)?;
    assert!(!repository.load_voice_buttons_enabled());
    assert_eq!(repository.get(StorageKey::VoiceButtonsEnabled)?.as_deref(), Some("false"));
    Ok(())
}

#[test]
fn test_storageKeys_shouldUseRoteiroPrefix() {
    for key in StorageKey::ALL {
        assert!(key.as_str().starts_with("roteiro_"), "{}", key);
        assert_eq!(key.as_str().parse::<StorageKey>().unwrap(), key);
    }
}
