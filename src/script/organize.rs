/*!
 * Reorganization of a translated dialogues-only document.
 *
 * A translated document keeps the dialogues-only layout (scene number,
 * speaker, `- line`). Reorganizing regroups every line by speaker so an
 * actor can read all of their lines in scene order:
 *
 * ```text
 * ANA
 * 1 - Llegamos tarde.
 * 3 - Volví.
 *
 * BETO
 * 1 - Siempre.
 * ```
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::format::DialogueDocLine;

static NUMBERED_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+\s*-").unwrap()
});

static NUMBERED_TEXT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)\s*-\s*(.+)$").unwrap()
});

/// One spoken line recovered from a translated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedLine {
    /// Speaker, empty when no speaker preceded the line
    pub character: String,
    /// Spoken text without dash or surrounding quotes
    pub line: String,
    /// Scene number as written in the document, 0 before any number
    pub scene_index: u64,
}

impl TranslatedLine {
    pub fn new(character: impl Into<String>, scene_index: u64, line: impl Into<String>) -> Self {
        Self {
            character: character.into(),
            line: line.into(),
            scene_index,
        }
    }
}

/// Remove one leading and one trailing quote character
fn strip_quotes(text: &str) -> &str {
    let text = text
        .strip_prefix(['"', '\'', '“', '”'])
        .unwrap_or(text);
    text.strip_suffix(['"', '\'', '“', '”']).unwrap_or(text)
}

/// Walk a translated dialogues-only document and collect its spoken lines
pub fn collect_translated_lines(text: &str) -> Vec<TranslatedLine> {
    let mut entries = Vec::new();
    let mut current_character = "";
    let mut current_scene: u64 = 0;

    for line in text.split('\n') {
        match DialogueDocLine::classify(line) {
            DialogueDocLine::SceneNumber(number) => match number.parse::<u64>() {
                Ok(index) => current_scene = index,
                Err(e) => debug!("Ignoring scene number {}: {}", number, e),
            },
            DialogueDocLine::Character(name) => current_character = name,
            DialogueDocLine::Speech(speech) => {
                let clean = strip_quotes(speech).trim();
                if !clean.is_empty() {
                    entries.push(TranslatedLine::new(current_character, current_scene, clean));
                }
            }
            DialogueDocLine::Blank | DialogueDocLine::Other => {}
        }
    }

    entries
}

/// Sort by speaker then scene and render one block per speaker.
///
/// The sort is stable, so lines of the same speaker in the same scene keep
/// their document order.
pub fn render_by_character(mut entries: Vec<TranslatedLine>) -> String {
    entries.sort_by(|a, b| {
        a.character
            .cmp(&b.character)
            .then(a.scene_index.cmp(&b.scene_index))
    });

    let mut output = String::new();
    let mut last_character = "";

    for entry in &entries {
        if entry.character != last_character {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&entry.character);
            output.push('\n');
            last_character = &entry.character;
        }
        output.push_str(&format!("{} - {}\n", entry.scene_index, entry.line));
    }

    output
}

/// Regroup a translated dialogues-only document by speaker
pub fn organize_translated(text: &str) -> String {
    render_by_character(collect_translated_lines(text))
}

/// Display item of a translated document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslatedItem {
    /// Scene number or speaker line, shown as-is
    Header(String),
    /// Spoken line: what to show and what to put on the clipboard
    Line { display: String, copy: String },
}

/// Translated text currently shown next to the source dialogues.
///
/// Reorganizing never touches the scene model; the text from before the
/// reorganization is kept so it can be restored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationView {
    text: String,
    original: Option<String>,
}

impl TranslationView {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            original: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_organized(&self) -> bool {
        self.original.is_some()
    }

    /// Replace the text with a fresh translation
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.original = None;
    }

    /// Regroup by speaker; no-op when already organized
    pub fn organize(&mut self) {
        if self.is_organized() {
            return;
        }
        let organized = organize_translated(&self.text);
        self.original = Some(std::mem::replace(&mut self.text, organized));
    }

    /// Restore the text from before `organize`
    pub fn undo(&mut self) {
        if let Some(original) = self.original.take() {
            self.text = original;
        }
    }

    /// Flip between organized and original text
    pub fn toggle(&mut self) {
        if self.is_organized() {
            self.undo();
        } else {
            self.organize();
        }
    }

    /// Only the spoken lines, without their dash, one per line
    pub fn spoken_lines(&self) -> String {
        self.text
            .split('\n')
            .filter_map(|line| line.trim().strip_prefix('-'))
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Split the text into display items; blank lines are skipped
    pub fn items(&self) -> Vec<TranslatedItem> {
        let mut items = Vec::new();

        for line in self.text.split('\n') {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let is_spoken = trimmed.starts_with('-')
                || trimmed.starts_with('"')
                || NUMBERED_LINE_REGEX.is_match(trimmed);

            if !is_spoken {
                items.push(TranslatedItem::Header(line.to_string()));
                continue;
            }

            let without_dash = trimmed
                .strip_prefix('-')
                .map(str::trim_start)
                .unwrap_or(trimmed);
            let display = strip_quotes(without_dash).trim().to_string();
            let copy = NUMBERED_TEXT_REGEX
                .captures(&display)
                .and_then(|caps| caps.get(2))
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| display.clone());

            items.push(TranslatedItem::Line { display, copy });
        }

        items
    }
}
