/*!
 * Structured screenplay model.
 *
 * A script is an ordered list of scenes; each scene holds an action line
 * and an ordered list of dialogue entries.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a fresh element identifier
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single spoken line inside a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    /// Unique identifier
    pub id: String,

    /// Character name, conventionally upper-case
    #[serde(default)]
    pub character: String,

    /// Spoken text
    #[serde(default)]
    pub line: String,
}

impl Dialogue {
    /// Create an empty dialogue with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            character: String::new(),
            line: String::new(),
        }
    }

    /// Builder: set the character name
    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.character = character.into();
        self
    }

    /// Builder: set the spoken line
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = line.into();
        self
    }

    /// True when both fields are blank, so nothing is exported for it
    pub fn is_blank(&self) -> bool {
        self.character.trim().is_empty() && self.line.trim().is_empty()
    }
}

impl Default for Dialogue {
    fn default() -> Self {
        Self::new()
    }
}

/// Editable dialogue field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueField {
    Character,
    Line,
}

impl fmt::Display for DialogueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueField::Character => write!(f, "character"),
            DialogueField::Line => write!(f, "line"),
        }
    }
}

impl std::str::FromStr for DialogueField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "character" => Ok(DialogueField::Character),
            "line" => Ok(DialogueField::Line),
            _ => Err(anyhow::anyhow!("Invalid dialogue field: {}", s)),
        }
    }
}

/// A numbered scene of the script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Unique identifier
    pub id: String,

    /// Action description
    #[serde(default)]
    pub content: String,

    /// Dialogue entries in speaking order
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,
}

impl Scene {
    /// Create an empty scene with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            content: String::new(),
            dialogues: Vec::new(),
        }
    }

    /// Builder: set the action description
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder: append a dialogue
    pub fn with_dialogue(mut self, dialogue: Dialogue) -> Self {
        self.dialogues.push(dialogue);
        self
    }

    pub fn dialogue(&self, dialogue_id: &str) -> Option<&Dialogue> {
        self.dialogues.iter().find(|d| d.id == dialogue_id)
    }

    pub fn dialogue_mut(&mut self, dialogue_id: &str) -> Option<&mut Dialogue> {
        self.dialogues.iter_mut().find(|d| d.id == dialogue_id)
    }

    pub fn has_dialogues(&self) -> bool {
        !self.dialogues.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Total number of dialogue entries across all scenes
pub fn count_dialogues(scenes: &[Scene]) -> usize {
    scenes.iter().map(|s| s.dialogues.len()).sum()
}
