/*!
 * Flat text projections of the scene list and the full-script parser.
 *
 * The full script is the interchange format:
 *
 * ```text
 * 1 - EXT. PRAIA - DIA
 * ANA
 * - Chegamos tarde.
 *
 * 2
 * ```
 *
 * A numbered line opens a scene, an upper-case line names the speaker and a
 * line starting with `-` carries what they say. Parsing never fails;
 * unrecognized lines are dropped.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::model::{Dialogue, Scene};

// Scene numbers are ASCII digits only
static SCENE_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+").unwrap()
});

static SCENE_HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\s*-\s*(.*)$").unwrap()
});

static SCENE_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+$").unwrap()
});

/// Which projection of the script to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptView {
    /// Scenes with their dialogues
    #[default]
    Full,
    /// Scene headings only
    Scenes,
    /// Dialogues grouped under their scene number
    Dialogues,
}

impl fmt::Display for ScriptView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptView::Full => write!(f, "full"),
            ScriptView::Scenes => write!(f, "scenes"),
            ScriptView::Dialogues => write!(f, "dialogues"),
        }
    }
}

impl std::str::FromStr for ScriptView {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ScriptView::Full),
            "scenes" => Ok(ScriptView::Scenes),
            "dialogues" => Ok(ScriptView::Dialogues),
            _ => Err(anyhow::anyhow!("Invalid script view: {}", s)),
        }
    }
}

/// Render the requested projection
pub fn render(view: ScriptView, scenes: &[Scene]) -> String {
    match view {
        ScriptView::Full => format_full(scenes),
        ScriptView::Scenes => format_scenes(scenes),
        ScriptView::Dialogues => format_dialogues(scenes),
    }
}

/// `"{n} - {content}"`, or just `"{n}"` when the content is blank
fn scene_heading(index: usize, content: &str) -> String {
    let content = content.trim();
    if content.is_empty() {
        format!("{}", index + 1)
    } else {
        format!("{} - {}", index + 1, content)
    }
}

fn push_dialogue_lines(output: &mut String, dialogue: &Dialogue) {
    let character = dialogue.character.trim();
    if !character.is_empty() {
        output.push_str(&character.to_uppercase());
        output.push('\n');
    }

    let line = dialogue.line.trim();
    if !line.is_empty() {
        output.push_str("- ");
        output.push_str(line);
        output.push('\n');
    }
}

/// Full script: every scene heading followed by its dialogues and a blank line
pub fn format_full(scenes: &[Scene]) -> String {
    let mut output = String::new();

    for (index, scene) in scenes.iter().enumerate() {
        output.push_str(&scene_heading(index, &scene.content));
        output.push('\n');
        for dialogue in &scene.dialogues {
            push_dialogue_lines(&mut output, dialogue);
        }
        output.push('\n');
    }

    output
}

/// Scene headings only, separated by blank lines
pub fn format_scenes(scenes: &[Scene]) -> String {
    scenes
        .iter()
        .enumerate()
        .map(|(index, scene)| scene_heading(index, &scene.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Dialogues under their scene number; scenes without dialogues are skipped
pub fn format_dialogues(scenes: &[Scene]) -> String {
    let mut output = String::new();

    for (index, scene) in scenes.iter().enumerate() {
        if !scene.has_dialogues() {
            continue;
        }
        output.push_str(&format!("{}\n", index + 1));
        for dialogue in &scene.dialogues {
            push_dialogue_lines(&mut output, dialogue);
        }
        output.push('\n');
    }

    output
}

/// Upper-case, non-blank and not a speech line
pub(crate) fn is_character_name(trimmed: &str) -> bool {
    !trimmed.is_empty() && !trimmed.starts_with('-') && trimmed.to_uppercase() == trimmed
}

/// Classification of one line of the full script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLine<'a> {
    /// Numbered line; carries the text after `-` when present
    SceneStart { content: Option<&'a str> },
    /// Upper-case speaker name, trimmed
    Character(&'a str),
    /// Text after the leading `-`, trimmed
    Speech(&'a str),
    /// Blank or unrecognized
    Other,
}

impl<'a> ScriptLine<'a> {
    /// Classify a raw line. The scene-number test runs first, so `"42"` is a
    /// scene start even though it equals its own upper-case form.
    pub fn classify(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if SCENE_START_REGEX.is_match(line) {
            let content = SCENE_HEADING_REGEX
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str());
            return ScriptLine::SceneStart { content };
        }

        let trimmed = line.trim();
        if is_character_name(trimmed) {
            return ScriptLine::Character(trimmed);
        }

        if let Some(rest) = trimmed.strip_prefix('-') {
            return ScriptLine::Speech(rest.trim());
        }

        ScriptLine::Other
    }
}

/// Parse an edited full script back into scenes.
///
/// Produces a brand-new scene list with fresh identifiers. A `-` line
/// always targets the last dialogue of the current scene, so a second `-`
/// line before the next speaker overwrites the first.
pub fn parse_full(text: &str) -> Vec<Scene> {
    let mut scenes = Vec::new();
    let mut current: Option<Scene> = None;

    for line in text.split('\n') {
        match ScriptLine::classify(line) {
            ScriptLine::SceneStart { content } => {
                if let Some(scene) = current.take() {
                    scenes.push(scene);
                }
                let mut scene = Scene::new();
                if let Some(content) = content {
                    scene.content = content.to_string();
                }
                current = Some(scene);
            }
            ScriptLine::Character(name) => match current.as_mut() {
                Some(scene) => scene.dialogues.push(Dialogue::new().with_character(name)),
                None => debug!("Dropping character line outside of a scene: {}", name),
            },
            ScriptLine::Speech(text) => {
                match current.as_mut().and_then(|scene| scene.dialogues.last_mut()) {
                    Some(dialogue) => dialogue.line = text.to_string(),
                    None => debug!("Dropping speech line without a speaker: {}", text),
                }
            }
            ScriptLine::Other => {}
        }
    }

    scenes.extend(current);
    scenes
}

/// Classification of one line of a dialogues-only document
/// (used for translation and reorganization)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueDocLine<'a> {
    /// A line holding only a scene number
    SceneNumber(&'a str),
    /// Upper-case speaker name, trimmed
    Character(&'a str),
    /// Text after the first `-`, trimmed
    Speech(&'a str),
    /// Whitespace only
    Blank,
    /// Anything else
    Other,
}

impl<'a> DialogueDocLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            DialogueDocLine::Blank
        } else if SCENE_NUMBER_REGEX.is_match(trimmed) {
            DialogueDocLine::SceneNumber(trimmed)
        } else if is_character_name(trimmed) {
            DialogueDocLine::Character(trimmed)
        } else if let Some(rest) = trimmed.strip_prefix('-') {
            DialogueDocLine::Speech(rest.trim())
        } else {
            DialogueDocLine::Other
        }
    }
}
