/*!
 * Recognition channels, targets, platform traits and events.
 */

use std::fmt;

use crate::errors::RecognitionError;

/// Independent dictation channels; each owns at most one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionChannel {
    /// Dictating a scene's action line
    Scene,
    /// Dictating a dialogue's spoken line
    DialogueLine,
    /// Dictating a dialogue's character name
    DialogueCharacter,
}

impl RecognitionChannel {
    pub const ALL: [RecognitionChannel; 3] = [
        RecognitionChannel::Scene,
        RecognitionChannel::DialogueLine,
        RecognitionChannel::DialogueCharacter,
    ];

    /// Scene and line dictation keep listening; character names are one utterance
    pub fn mode(&self) -> RecognitionMode {
        match self {
            RecognitionChannel::Scene | RecognitionChannel::DialogueLine => RecognitionMode::Continuous,
            RecognitionChannel::DialogueCharacter => RecognitionMode::SingleShot,
        }
    }

    pub(crate) fn slot(&self) -> usize {
        match self {
            RecognitionChannel::Scene => 0,
            RecognitionChannel::DialogueLine => 1,
            RecognitionChannel::DialogueCharacter => 2,
        }
    }
}

impl fmt::Display for RecognitionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionChannel::Scene => write!(f, "scene"),
            RecognitionChannel::DialogueLine => write!(f, "dialogue_line"),
            RecognitionChannel::DialogueCharacter => write!(f, "dialogue_character"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionMode {
    /// Keeps producing final results until stopped
    Continuous,
    /// Ends after the first utterance
    SingleShot,
}

/// The field a session writes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionTarget {
    Scene { scene_id: String },
    DialogueLine { scene_id: String, dialogue_id: String },
    DialogueCharacter { scene_id: String, dialogue_id: String },
}

impl RecognitionTarget {
    pub fn channel(&self) -> RecognitionChannel {
        match self {
            RecognitionTarget::Scene { .. } => RecognitionChannel::Scene,
            RecognitionTarget::DialogueLine { .. } => RecognitionChannel::DialogueLine,
            RecognitionTarget::DialogueCharacter { .. } => RecognitionChannel::DialogueCharacter,
        }
    }

    pub fn scene_id(&self) -> &str {
        match self {
            RecognitionTarget::Scene { scene_id }
            | RecognitionTarget::DialogueLine { scene_id, .. }
            | RecognitionTarget::DialogueCharacter { scene_id, .. } => scene_id,
        }
    }

    pub fn dialogue_id(&self) -> Option<&str> {
        match self {
            RecognitionTarget::Scene { .. } => None,
            RecognitionTarget::DialogueLine { dialogue_id, .. }
            | RecognitionTarget::DialogueCharacter { dialogue_id, .. } => Some(dialogue_id),
        }
    }

    /// Turn a transcript into the matching state update
    pub(crate) fn update(&self, text: String) -> RecognitionUpdate {
        match self {
            RecognitionTarget::Scene { scene_id } => RecognitionUpdate::AppendSceneContent {
                scene_id: scene_id.clone(),
                text,
            },
            RecognitionTarget::DialogueLine { scene_id, dialogue_id } => {
                RecognitionUpdate::AppendDialogueLine {
                    scene_id: scene_id.clone(),
                    dialogue_id: dialogue_id.clone(),
                    text,
                }
            }
            RecognitionTarget::DialogueCharacter { scene_id, dialogue_id } => {
                RecognitionUpdate::SetCharacter {
                    scene_id: scene_id.clone(),
                    dialogue_id: dialogue_id.clone(),
                    text,
                }
            }
        }
    }
}

/// Identifies one session; callbacks carrying an older tag are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTag {
    pub channel: RecognitionChannel,
    pub generation: u64,
}

/// Settings handed to the platform recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerSettings {
    /// BCP 47 language tag, e.g. `pt-BR`
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

/// One platform recognizer instance
pub trait Recognizer: Send {
    fn start(&mut self) -> Result<(), String>;
    fn stop(&mut self);
}

/// Platform entry point for speech recognition
pub trait RecognizerFactory: Send {
    /// False when the platform has no speech recognition at all
    fn is_supported(&self) -> bool;

    /// Build a recognizer whose callbacks will carry `tag`
    fn create(
        &mut self,
        settings: &RecognizerSettings,
        tag: SessionTag,
    ) -> Result<Box<dyn Recognizer>, RecognitionError>;
}

/// Factory for platforms without speech recognition
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedRecognizer;

impl RecognizerFactory for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn create(
        &mut self,
        _settings: &RecognizerSettings,
        _tag: SessionTag,
    ) -> Result<Box<dyn Recognizer>, RecognitionError> {
        Err(RecognitionError::Unsupported)
    }
}

/// One alternative of a recognition result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn final_text(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
        }
    }

    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: false,
        }
    }
}

/// Callback delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Accumulated results; only entries from `result_index` on are new
    Result {
        result_index: usize,
        results: Vec<RecognitionResult>,
    },
    End,
    Error(String),
}

/// State change produced by a recognition result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionUpdate {
    AppendSceneContent { scene_id: String, text: String },
    AppendDialogueLine { scene_id: String, dialogue_id: String, text: String },
    SetCharacter { scene_id: String, dialogue_id: String, text: String },
}
