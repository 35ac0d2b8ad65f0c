/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use std::sync::Arc;

use roteiro::app_config::Config;
use roteiro::app_controller::Controller;
use roteiro::providers::mock::MockPreferenceStore;
use roteiro::script::{DialogueField, ScriptView};
use crate::common;

/// Test that every edit is on disk before the next app start
#[test]
fn test_controller_afterRestart_shouldRestoreEverything() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::database_path(temp_dir.path());

    let expected_export;
    {
        let mut controller = common::file_controller(&path, None)?;
        controller.replace_from_full_script(common::SAMPLE_SCRIPT);
        let scene_id = controller.editor().scenes()[1].id.clone();
        let dialogue_id = controller.editor_mut().add_dialogue(&scene_id).unwrap();
        controller
            .editor_mut()
            .set_dialogue_field(&scene_id, &dialogue_id, DialogueField::Character, "beto");
        controller.editor_mut().set_notes("trocar a trilha");
        controller.editor_mut().increment_counter();
        controller.editor_mut().add_idea("https://example.com/locacao");
        expected_export = controller.editor().render(ScriptView::Full);
    }

    let controller = common::file_controller(&path, None)?;
    let state = controller.editor().state();

    assert_eq!(controller.editor().render(ScriptView::Full), expected_export);
    assert_eq!(state.notes, "trocar a trilha");
    assert_eq!(state.counter, 1);
    assert_eq!(state.ideas.len(), 1);
    assert_eq!(state.scenes[1].dialogues[0].character, "BETO");
    Ok(())
}

/// Test saving, clearing and loading a named script across restarts
#[test]
fn test_savedScript_afterRestart_shouldLoadExactSnapshot() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::database_path(temp_dir.path());

    let original_scenes;
    {
        let mut controller = common::file_controller(&path, None)?;
        controller.replace_from_full_script(common::SAMPLE_SCRIPT);
        controller.editor_mut().set_notes("versão 1");
        controller.editor_mut().save_script("Primeiro corte")?;
        original_scenes = controller.editor().scenes().to_vec();
        controller.clear_script();
        assert!(controller.editor().scenes().is_empty());
    }

    let mut controller = common::file_controller(&path, None)?;
    assert_eq!(controller.editor().state().saved_scripts[0].name, "Primeiro corte");

    controller.load_script(0)?;

    assert_eq!(controller.editor().scenes(), original_scenes.as_slice());
    assert_eq!(controller.editor().state().notes, "versão 1");
    assert_eq!(controller.repository().load_scenes(), original_scenes);
    Ok(())
}

/// Test that a remote preference overrides the local flag on start
#[test]
fn test_syncVoicePreference_withRemoteStore_shouldApplyRemoteValue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::database_path(temp_dir.path());
    let store = MockPreferenceStore::new();

    {
        let mut controller = common::file_controller(&path, Some(Arc::new(store.clone())))?;
        tokio_test::block_on(controller.set_voice_buttons_enabled(false));
    }

    let mut controller = common::file_controller(&path, Some(Arc::new(store.clone())))?;
    let user_id = controller.preferences().user_id();
    assert_eq!(store.stored(&user_id), Some(false));

    let enabled = tokio_test::block_on(controller.sync_voice_preference());

    assert!(!enabled);
    assert!(!controller.editor().state().voice_buttons_enabled);
    Ok(())
}

/// Test that the default controller opens the configured database file
#[test]
fn test_open_withDatabasePath_shouldCreateFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::database_path(temp_dir.path());
    let config = Config {
        storage: roteiro::app_config::StorageConfig { database_path: Some(path.clone()) },
        ..Config::default()
    };

    let mut controller = Controller::open(config)?;
    controller.editor_mut().add_scene();

    assert!(path.exists());
    assert!(!controller.recognition().is_supported());
    assert_eq!(controller.repository().load_scenes().len(), 1);
    Ok(())
}
