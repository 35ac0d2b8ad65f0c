/*!
 * End-to-end tests: import a script, translate its dialogues, reorganize them
 */

use anyhow::Result;

use roteiro::app_controller::Controller;
use roteiro::file_utils::FileManager;
use roteiro::providers::mock::MockProvider;
use roteiro::script::ScriptView;
use crate::common::{self, ScriptedRecognizerFactory};

fn controller_with(provider: MockProvider) -> Result<Controller> {
    let config = common::test_config(None);
    let translation = common::mock_translation(provider, &config);
    Controller::in_memory(config, translation, None, Box::new(ScriptedRecognizerFactory::new()))
}

/// Test the whole path from a script file to the organized translation
#[tokio::test]
async fn test_importTranslateOrganize_withScriptFile_shouldGroupBySpeaker() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script_path = temp_dir.path().join("roteiro.txt");
    FileManager::write_to_file(&script_path, common::SAMPLE_SCRIPT)?;

    let mut controller = controller_with(MockProvider::working())?;
    controller.replace_from_full_script(&FileManager::read_to_string(&script_path)?);

    let stats = controller.translate_dialogues().await;
    assert_eq!(stats.lines_translated, 3);

    controller.translated_mut().organize();
    assert_eq!(
        controller.translated().text(),
        "ANA\n1 - [es] Chegamos tarde.\n3 - [es] Voltei.\n\nBETO\n1 - [es] Como sempre.\n"
    );

    controller.translated_mut().undo();
    assert!(controller.translated().text().starts_with("1\nANA\n- [es] Chegamos tarde."));
    Ok(())
}

/// Test that a partially failing provider leaves the untranslated lines readable
#[tokio::test]
async fn test_translate_withIntermittentProvider_shouldKeepFailedLinesOriginal() -> Result<()> {
    let mut controller = controller_with(MockProvider::intermittent(2))?;
    controller.replace_from_full_script(common::SAMPLE_SCRIPT);

    let mut reported = Vec::new();
    let stats = controller
        .translate_dialogues_with_progress(|done, total| reported.push((done, total)))
        .await;

    assert_eq!(reported, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(stats.lines_failed, 1);
    assert_eq!(
        controller.translated().text(),
        "1\nANA\n- [es] Chegamos tarde.\nBETO\n- Como sempre.\n\n3\nANA\n- [es] Voltei.\n\n"
    );
    Ok(())
}

/// Test that translating never touches the source script
#[tokio::test]
async fn test_translate_shouldNotModifyScenes() -> Result<()> {
    let mut controller = controller_with(MockProvider::working())?;
    controller.replace_from_full_script(common::SAMPLE_SCRIPT);
    let before = controller.editor().render(ScriptView::Full);

    controller.translate_dialogues().await;

    assert_eq!(controller.editor().render(ScriptView::Full), before);
    assert_eq!(controller.repository().load_scenes(), controller.editor().scenes());
    Ok(())
}

/// Test exporting the dialogues view to a nested output path
#[test]
fn test_exportDialogues_toFile_shouldWriteProjection() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("export").join("dialogos.txt");
    let mut controller = controller_with(MockProvider::working())?;
    controller.replace_from_full_script(common::SAMPLE_SCRIPT);

    FileManager::write_to_file(&output, &controller.editor().render(ScriptView::Dialogues))?;

    let written = FileManager::read_to_string(&output)?;
    assert!(written.starts_with("1\nANA\n"));
    assert!(!written.contains("INT. CARRO"));
    Ok(())
}
