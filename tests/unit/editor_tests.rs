/*!
 * Tests for the editor's public operations
 */

use std::time::Duration;

use roteiro::editor::{idea_segments, Editor, IdeaSegment, COUNTER_RESET_HOLD};
use roteiro::errors::EditorError;
use roteiro::script::{DialogueField, ScriptView};
use crate::common::SAMPLE_SCRIPT;

/// Test that structural edits keep the rendered numbering contiguous
#[test]
fn test_deleteScene_inMiddle_shouldRenumberExport() {
    let mut editor = Editor::new();
    editor.replace_from_full_script(SAMPLE_SCRIPT);
    let middle = editor.scenes()[1].id.clone();

    assert!(editor.delete_scene(&middle));

    assert_eq!(
        editor.render(ScriptView::Scenes),
        "1 - EXT. PRAIA - DIA\n\n2 - EXT. ESTRADA - NOITE"
    );
}

#[test]
fn test_operations_withUnknownIds_shouldLeaveStateUntouched() {
    let mut editor = Editor::new();
    editor.replace_from_full_script(SAMPLE_SCRIPT);
    let before = editor.state().clone();

    assert!(!editor.delete_scene("ghost"));
    assert!(!editor.set_scene_content("ghost", "x"));
    assert_eq!(editor.add_dialogue("ghost"), None);
    assert!(!editor.delete_dialogue(&before.scenes[0].id, "ghost"));
    assert!(!editor.set_dialogue_field(&before.scenes[0].id, "ghost", DialogueField::Line, "x"));

    assert_eq!(editor.state(), &before);
}

#[test]
fn test_stats_shouldCountScenesAndDialogues() {
    let mut editor = Editor::new();
    editor.replace_from_full_script(SAMPLE_SCRIPT);

    let stats = editor.stats();

    assert_eq!(stats.scenes, 3);
    assert_eq!(stats.dialogues, 3);
}

#[test]
fn test_pressCounter_atThreshold_shouldReset() {
    let mut editor = Editor::new();
    editor.press_counter(Duration::from_millis(10));
    editor.press_counter(Duration::from_millis(999));
    assert_eq!(editor.state().counter, 2);

    assert_eq!(editor.press_counter(COUNTER_RESET_HOLD), 0);
}

#[test]
fn test_ideas_shouldTrimAndDeleteByPosition() {
    let mut editor = Editor::new();
    assert!(editor.add_idea("  ver https://example.com/ref  "));
    assert!(!editor.add_idea("   "));
    assert!(editor.add_idea("final alternativo"));

    assert_eq!(editor.delete_idea(0).as_deref(), Some("ver https://example.com/ref"));
    assert_eq!(editor.delete_idea(5), None);
    assert_eq!(editor.state().ideas, vec!["final alternativo".to_string()]);
}

#[test]
fn test_ideaSegments_withTrailingText_shouldKeepOrder() {
    let segments = idea_segments("ver http://a.b/c e depois");
    assert_eq!(
        segments,
        vec![
            IdeaSegment::Text("ver "),
            IdeaSegment::Link("http://a.b/c"),
            IdeaSegment::Text(" e depois"),
        ]
    );
}

#[test]
fn test_savedScripts_withDuplicateNames_shouldKeepBoth() {
    let mut editor = Editor::new();
    editor.replace_from_full_script(SAMPLE_SCRIPT);
    editor.save_script("rascunho").unwrap();
    editor.clear_script();
    editor.save_script(" rascunho ").unwrap();

    assert_eq!(editor.state().saved_scripts.len(), 2);
    assert_eq!(editor.find_script("rascunho"), Some(1));

    editor.load_script(0).unwrap();
    assert_eq!(editor.stats().scenes, 3);
}

#[test]
fn test_loadScript_withBadIndex_shouldFail() {
    let mut editor = Editor::new();
    assert_eq!(editor.load_script(0), Err(EditorError::ScriptNotFound(0)));
    assert!(matches!(editor.delete_script(3), Err(EditorError::ScriptNotFound(3))));
}
