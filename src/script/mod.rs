/*!
 * Screenplay model and its flat text format.
 *
 * - `model`: scenes and dialogues
 * - `format`: full / scenes-only / dialogues-only projections and the full-script parser
 * - `organize`: regrouping of translated dialogues by speaker
 */

pub mod model;
pub mod format;
pub mod organize;

pub use model::{count_dialogues, generate_id, Dialogue, DialogueField, Scene};
pub use format::{
    format_dialogues, format_full, format_scenes, parse_full, render, DialogueDocLine, ScriptLine,
    ScriptView,
};
pub use organize::{
    collect_translated_lines, organize_translated, render_by_character, TranslatedItem,
    TranslatedLine, TranslationView,
};
