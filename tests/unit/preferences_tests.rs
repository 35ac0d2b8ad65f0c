/*!
 * Tests for the user id and voice-button preference service
 */

use anyhow::Result;
use std::sync::Arc;

use roteiro::preferences::{generate_user_id, PreferenceService};
use roteiro::providers::mock::MockPreferenceStore;
use roteiro::storage::Repository;

#[test]
fn test_generateUserId_shouldBeUniqueAndLowercase() {
    let first = generate_user_id();
    let second = generate_user_id();

    assert_ne!(first, second);
    assert!(first.starts_with("user_"));
    assert!(first.chars().all(|c| c == '_' || c.is_ascii_digit() || c.is_ascii_lowercase()));
}

#[test]
fn test_userId_shouldBeSharedThroughRepository() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    let first = PreferenceService::new(repository.clone(), None).user_id();
    let second = PreferenceService::new(repository.clone(), None).user_id();

    assert_eq!(first, second);
    assert_eq!(repository.load_user_id(), Some(first));
    Ok(())
}

#[tokio::test]
async fn test_remoteValue_shouldWinOverLocalFlag() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    repository.save_voice_buttons_enabled(true)?;
    let store = MockPreferenceStore::new();
    let service = PreferenceService::new(repository, Some(Arc::new(store.clone())));

    service.save_voice_buttons_enabled(false).await;

    assert_eq!(store.stored(&service.user_id()), Some(false));
    assert!(!service.load_voice_buttons_enabled().await);
    Ok(())
}

#[tokio::test]
async fn test_saveVoiceButtonsEnabled_withFailingRemote_shouldNotPanic() -> Result<()> {
    let repository = Repository::new_in_memory()?;
    let service = PreferenceService::new(repository, Some(Arc::new(MockPreferenceStore::failing())));

    service.save_voice_buttons_enabled(false).await;

    assert!(service.load_voice_buttons_enabled().await);
    Ok(())
}
