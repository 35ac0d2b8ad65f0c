/*!
 * Tests for the script text format and the translated-dialogue reorganizer
 */

use roteiro::script::{
    format_dialogues, format_full, format_scenes, organize_translated, parse_full, Dialogue, Scene,
};
use crate::common::SAMPLE_SCRIPT;

#[test]
fn test_parseFull_withSampleScript_shouldRebuildScenes() {
    let scenes = parse_full(SAMPLE_SCRIPT);

    assert_eq!(scenes.len(), 3);
    assert_eq!(scenes[0].content, "EXT. PRAIA - DIA");
    assert_eq!(scenes[0].dialogues.len(), 2);
    assert_eq!(scenes[0].dialogues[1].character, "BETO");
    assert_eq!(scenes[0].dialogues[1].line, "Como sempre.");
    assert!(scenes[1].dialogues.is_empty());
    assert_eq!(scenes[2].dialogues[0].line, "Voltei.");
}

#[test]
fn test_formatFull_afterParse_shouldReproduceCanonicalText() {
    let scenes = parse_full(SAMPLE_SCRIPT);
    assert_eq!(format_full(&scenes), format!("{}\n", SAMPLE_SCRIPT));
}

#[test]
fn test_parseFull_shouldAssignFreshIds() {
    let first = parse_full(SAMPLE_SCRIPT);
    let second = parse_full(SAMPLE_SCRIPT);
    assert_ne!(first[0].id, second[0].id);
    assert_ne!(first[0].dialogues[0].id, second[0].dialogues[0].id);
}

#[test]
fn test_parseFull_withWindowsLineEndings_shouldMatchUnixParse() {
    let crlf = SAMPLE_SCRIPT.replace('\n', "\r\n");
    let unix = parse_full(SAMPLE_SCRIPT);
    let windows = parse_full(&crlf);

    assert_eq!(format_full(&windows), format_full(&unix));
}

#[test]
fn test_parseFull_withStrayLines_shouldDropThem() {
    let text = "ANA\n- Antes da cena\nqualquer coisa\n1\nsem marcador\n";
    let scenes = parse_full(text);

    assert_eq!(scenes.len(), 1);
    assert_eq!(scenes[0].content, "");
    assert!(scenes[0].dialogues.is_empty());
}

#[test]
fn test_formatScenes_shouldJoinHeadingsWithBlankLines() {
    let scenes = vec![Scene::new().with_content("Praia"), Scene::new(), Scene::new().with_content("Carro")];
    assert_eq!(format_scenes(&scenes), "1 - Praia\n\n2\n\n3 - Carro");
}

#[test]
fn test_formatDialogues_shouldKeepOriginalSceneNumbers() {
    let scenes = parse_full(SAMPLE_SCRIPT);
    assert_eq!(
        format_dialogues(&scenes),
        "1\nANA\n- Chegamos tarde.\nBETO\n- Como sempre.\n\n3\nANA\n- Voltei.\n\n"
    );
}

#[test]
fn test_formatFull_withBlankDialogue_shouldOmitIt() {
    let scenes = vec![Scene::new().with_dialogue(Dialogue::new()).with_dialogue(Dialogue::new().with_character("ana"))];
    assert_eq!(format_full(&scenes), "1\nANA\n\n");
}

#[test]
fn test_organizeTranslated_shouldGroupBySpeakerInSceneOrder() {
    let translated = "3\nBETO\n- \"Volvi.\"\n\n1\nANA\n- Llegamos tarde.\nBETO\n- Siempre.\n";

    let organized = organize_translated(translated);

    assert_eq!(organized, "ANA\n1 - Llegamos tarde.\n\nBETO\n1 - Siempre.\n3 - Volvi.\n");
}

#[test]
fn test_organizeTranslated_withLineBeforeSpeaker_shouldUseEmptyName() {
    let organized = organize_translated("- Hola\n");
    assert_eq!(organized, "0 - Hola\n");
}
