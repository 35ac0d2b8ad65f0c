/*!
 * Integration tests for dictation sessions driven through the controller
 */

use anyhow::Result;

use roteiro::recognition::{
    ChannelState, RecognitionChannel, RecognitionEvent, RecognitionResult, RecognitionTarget,
};
use crate::common::{self, ScriptedRecognizerFactory};

fn finals(texts: &[&str]) -> RecognitionEvent {
    RecognitionEvent::Result {
        result_index: 0,
        results: texts.iter().map(|t| RecognitionResult::final_text(*t)).collect(),
    }
}

#[test]
fn test_sceneDictation_shouldAppendWithSingleSpace() -> Result<()> {
    let factory = ScriptedRecognizerFactory::new();
    let mut controller = common::in_memory_controller(factory.clone())?;
    let scene_id = controller.editor_mut().add_scene();
    controller.editor_mut().set_scene_content(&scene_id, "EXT. PRAIA");

    let tag = controller.start_dictation(RecognitionTarget::Scene { scene_id: scene_id.clone() })?;

    let session = factory.last_session().unwrap();
    assert_eq!(session.settings.language, "pt-BR");
    assert!(session.settings.continuous);

    assert!(controller.handle_recognition_event(tag, finals(&["  ", " ao", " entardecer "])));
    assert_eq!(controller.editor().state().scene(&scene_id).unwrap().content, "EXT. PRAIA ao entardecer");

    controller.stop_dictation(RecognitionChannel::Scene);
    assert!(controller.handle_recognition_event(tag, finals(&["fim"])));
    controller.handle_recognition_event(tag, RecognitionEvent::End);

    assert!(matches!(controller.recognition().state(RecognitionChannel::Scene), ChannelState::Idle));
    assert!(!controller.handle_recognition_event(tag, finals(&["tarde demais"])));
    Ok(())
}

#[test]
fn test_characterDictation_shouldReplaceWithUppercase() -> Result<()> {
    let factory = ScriptedRecognizerFactory::new();
    let mut controller = common::in_memory_controller(factory.clone())?;
    let scene_id = controller.editor_mut().add_scene();
    let dialogue_id = controller.editor_mut().add_dialogue(&scene_id).unwrap();

    let tag = controller.start_dictation(RecognitionTarget::DialogueCharacter {
        scene_id: scene_id.clone(),
        dialogue_id: dialogue_id.clone(),
    })?;

    assert!(!factory.last_session().unwrap().settings.continuous);
    controller.handle_recognition_event(tag, finals(&[" dona ana "]));

    let scene = controller.editor().state().scene(&scene_id).unwrap().clone();
    assert_eq!(scene.dialogue(&dialogue_id).unwrap().character, "DONA ANA");
    Ok(())
}

/// Test that a callback from a replaced session never reaches the new target
#[test]
fn test_restartOnSameChannel_shouldIgnoreOldSessionCallbacks() -> Result<()> {
    let factory = ScriptedRecognizerFactory::new();
    let mut controller = common::in_memory_controller(factory.clone())?;
    let first = controller.editor_mut().add_scene();
    let second = controller.editor_mut().add_scene();

    let old_tag = controller.start_dictation(RecognitionTarget::Scene { scene_id: first.clone() })?;
    let new_tag = controller.start_dictation(RecognitionTarget::Scene { scene_id: second.clone() })?;

    assert_ne!(old_tag, new_tag);
    assert!(factory.sessions()[0].stopped);
    assert!(!controller.handle_recognition_event(old_tag, finals(&["velho"])));
    assert!(!controller.handle_recognition_event(old_tag, RecognitionEvent::End));
    assert!(controller.is_listening(&RecognitionTarget::Scene { scene_id: second.clone() }));

    assert!(controller.handle_recognition_event(new_tag, finals(&["novo"])));
    assert_eq!(controller.editor().state().scene(&first).unwrap().content, "");
    assert_eq!(controller.editor().state().scene(&second).unwrap().content, "novo");
    Ok(())
}

/// Test that deleting the target ends its session before late results arrive
#[test]
fn test_deleteScene_whileDictating_shouldCancelSession() -> Result<()> {
    let factory = ScriptedRecognizerFactory::new();
    let mut controller = common::in_memory_controller(factory.clone())?;
    let scene_id = controller.editor_mut().add_scene();
    let dialogue_id = controller.editor_mut().add_dialogue(&scene_id).unwrap();
    let line_tag = controller.start_dictation(RecognitionTarget::DialogueLine {
        scene_id: scene_id.clone(),
        dialogue_id: dialogue_id.clone(),
    })?;

    assert!(controller.delete_scene(&scene_id));

    assert!(factory.last_session().unwrap().stopped);
    assert!(matches!(controller.recognition().state(RecognitionChannel::DialogueLine), ChannelState::Idle));
    assert!(!controller.handle_recognition_event(line_tag, finals(&["perdido"])));
    Ok(())
}

#[tokio::test]
async fn test_disableVoiceButtons_shouldCancelEveryChannel() -> Result<()> {
    let factory = ScriptedRecognizerFactory::new();
    let mut controller = common::in_memory_controller(factory.clone())?;
    let scene_id = controller.editor_mut().add_scene();
    let dialogue_id = controller.editor_mut().add_dialogue(&scene_id).unwrap();
    controller.start_dictation(RecognitionTarget::Scene { scene_id: scene_id.clone() })?;
    controller.start_dictation(RecognitionTarget::DialogueLine { scene_id, dialogue_id })?;

    controller.set_voice_buttons_enabled(false).await;

    assert!(factory.sessions().iter().all(|s| s.stopped));
    for channel in RecognitionChannel::ALL {
        assert!(controller.recognition().active_target(channel).is_none());
    }
    Ok(())
}

#[test]
fn test_errorEvent_shouldReturnChannelToIdle() -> Result<()> {
    let mut controller = common::in_memory_controller(ScriptedRecognizerFactory::new())?;
    let scene_id = controller.editor_mut().add_scene();
    let tag = controller.start_dictation(RecognitionTarget::Scene { scene_id: scene_id.clone() })?;

    assert!(!controller.handle_recognition_event(tag, RecognitionEvent::Error("no-speech".to_string())));

    assert!(!controller.is_listening(&RecognitionTarget::Scene { scene_id }));
    Ok(())
}
