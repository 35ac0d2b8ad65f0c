use chrono::Utc;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::EditorError;
use crate::recognition::RecognitionUpdate;
use crate::script::{self, Dialogue, DialogueField, Scene, ScriptView};

// @module: Explicit editor state and its mutations

// @const: Holding the counter at least this long resets it
pub const COUNTER_RESET_HOLD: Duration = Duration::from_secs(1);

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://[^\s]+").unwrap()
});

/// Everything needed to restore a saved script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSnapshot {
    #[serde(default)]
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub ideas: Vec<String>,
    #[serde(default)]
    pub counter: i64,
    /// RFC 3339 timestamp of the save
    #[serde(rename = "savedAt", default)]
    pub saved_at: String,
}

/// A named snapshot kept in the saved-scripts list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedScript {
    pub name: String,
    pub data: ScriptSnapshot,
}

/// Scene and dialogue totals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStats {
    pub scenes: usize,
    pub dialogues: usize,
}

/// Part of an idea, either plain text or a link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaSegment<'a> {
    Text(&'a str),
    Link(&'a str),
}

/// Split an idea into text and `http(s)://` link segments
pub fn idea_segments(idea: &str) -> Vec<IdeaSegment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in URL_REGEX.find_iter(idea) {
        if m.start() > last {
            segments.push(IdeaSegment::Text(&idea[last..m.start()]));
        }
        segments.push(IdeaSegment::Link(m.as_str()));
        last = m.end();
    }
    if last < idea.len() {
        segments.push(IdeaSegment::Text(&idea[last..]));
    }

    segments
}

/// Which part of the state a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateChange {
    Scenes,
    Notes,
    Counter,
    Ideas,
    SavedScripts,
    VoiceButtons,
}

/// Receives every state change after it is applied
pub trait StateObserver: Send {
    fn on_change(&mut self, state: &EditorState, change: StateChange);
}

/// Complete editor state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub scenes: Vec<Scene>,
    pub notes: String,
    pub counter: i64,
    pub ideas: Vec<String>,
    pub saved_scripts: Vec<SavedScript>,
    pub voice_buttons_enabled: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            scenes: Vec::new(),
            notes: String::new(),
            counter: 0,
            ideas: Vec::new(),
            saved_scripts: Vec::new(),
            voice_buttons_enabled: true,
        }
    }
}

impl EditorState {
    pub fn scene(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    fn scene_mut(&mut self, scene_id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == scene_id)
    }

    fn dialogue_mut(&mut self, scene_id: &str, dialogue_id: &str) -> Option<&mut Dialogue> {
        self.scene_mut(scene_id)?.dialogue_mut(dialogue_id)
    }

    fn snapshot(&self) -> ScriptSnapshot {
        ScriptSnapshot {
            scenes: self.scenes.clone(),
            notes: self.notes.clone(),
            ideas: self.ideas.clone(),
            counter: self.counter,
            saved_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Owner of the editor state.
///
/// All mutations go through here so observers (persistence) see each change.
/// Methods addressing a missing scene or dialogue return `false`/`None` and
/// leave the state untouched.
pub struct Editor {
    state: EditorState,
    observers: Vec<Box<dyn StateObserver>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_state(EditorState::default())
    }

    /// Start from a previously loaded state without notifying anyone
    pub fn with_state(state: EditorState) -> Self {
        Self {
            state,
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn StateObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.state.scenes
    }

    fn notify(&mut self, change: StateChange) {
        for observer in self.observers.iter_mut() {
            observer.on_change(&self.state, change);
        }
    }

    // ---- scenes ----------------------------------------------------------

    /// Append an empty scene and return its id
    pub fn add_scene(&mut self) -> String {
        let index = self.state.scenes.len();
        self.insert_scene(index)
    }

    /// Insert an empty scene before the scene at `index`
    pub fn insert_scene_above(&mut self, index: usize) -> String {
        self.insert_scene(index)
    }

    /// Insert an empty scene after the scene at `index`
    pub fn insert_scene_below(&mut self, index: usize) -> String {
        self.insert_scene(index.saturating_add(1))
    }

    fn insert_scene(&mut self, index: usize) -> String {
        let scene = Scene::new();
        let id = scene.id.clone();
        let index = index.min(self.state.scenes.len());
        self.state.scenes.insert(index, scene);
        self.notify(StateChange::Scenes);
        id
    }

    pub fn delete_scene(&mut self, scene_id: &str) -> bool {
        let before = self.state.scenes.len();
        self.state.scenes.retain(|s| s.id != scene_id);
        let removed = self.state.scenes.len() != before;
        if removed {
            self.notify(StateChange::Scenes);
        }
        removed
    }

    pub fn set_scene_content(&mut self, scene_id: &str, content: impl Into<String>) -> bool {
        let Some(scene) = self.state.scene_mut(scene_id) else {
            return false;
        };
        scene.content = content.into();
        self.notify(StateChange::Scenes);
        true
    }

    pub fn move_scene_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.state.scenes.len() {
            return false;
        }
        self.state.scenes.swap(index - 1, index);
        self.notify(StateChange::Scenes);
        true
    }

    pub fn move_scene_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.state.scenes.len() {
            return false;
        }
        self.state.scenes.swap(index, index + 1);
        self.notify(StateChange::Scenes);
        true
    }

    /// Replace every scene with the result of parsing an edited full script
    pub fn replace_from_full_script(&mut self, text: &str) {
        self.state.scenes = script::parse_full(text);
        debug!("Replaced script with {} parsed scene(s)", self.state.scenes.len());
        self.notify(StateChange::Scenes);
    }

    pub fn render(&self, view: ScriptView) -> String {
        script::render(view, &self.state.scenes)
    }

    pub fn stats(&self) -> ScriptStats {
        ScriptStats {
            scenes: self.state.scenes.len(),
            dialogues: script::count_dialogues(&self.state.scenes),
        }
    }

    // ---- dialogues -------------------------------------------------------

    /// Append an empty dialogue to a scene and return its id
    pub fn add_dialogue(&mut self, scene_id: &str) -> Option<String> {
        let scene = self.state.scene_mut(scene_id)?;
        let dialogue = Dialogue::new();
        let id = dialogue.id.clone();
        scene.dialogues.push(dialogue);
        self.notify(StateChange::Scenes);
        Some(id)
    }

    pub fn delete_dialogue(&mut self, scene_id: &str, dialogue_id: &str) -> bool {
        let Some(scene) = self.state.scene_mut(scene_id) else {
            return false;
        };
        let before = scene.dialogues.len();
        scene.dialogues.retain(|d| d.id != dialogue_id);
        let removed = scene.dialogues.len() != before;
        if removed {
            self.notify(StateChange::Scenes);
        }
        removed
    }

    /// Edit one dialogue field; character names are stored upper-cased
    pub fn set_dialogue_field(
        &mut self,
        scene_id: &str,
        dialogue_id: &str,
        field: DialogueField,
        value: &str,
    ) -> bool {
        let Some(dialogue) = self.state.dialogue_mut(scene_id, dialogue_id) else {
            return false;
        };
        match field {
            DialogueField::Character => dialogue.character = value.to_uppercase(),
            DialogueField::Line => dialogue.line = value.to_string(),
        }
        self.notify(StateChange::Scenes);
        true
    }

    /// Apply dictated text to the targeted field
    pub fn apply_recognition(&mut self, update: &RecognitionUpdate) -> bool {
        let applied = match update {
            RecognitionUpdate::AppendSceneContent { scene_id, text } => {
                match self.state.scene_mut(scene_id) {
                    Some(scene) => {
                        append_dictation(&mut scene.content, text);
                        true
                    }
                    None => false,
                }
            }
            RecognitionUpdate::AppendDialogueLine { scene_id, dialogue_id, text } => {
                match self.state.dialogue_mut(scene_id, dialogue_id) {
                    Some(dialogue) => {
                        append_dictation(&mut dialogue.line, text);
                        true
                    }
                    None => false,
                }
            }
            RecognitionUpdate::SetCharacter { scene_id, dialogue_id, text } => {
                match self.state.dialogue_mut(scene_id, dialogue_id) {
                    Some(dialogue) => {
                        dialogue.character = text.trim().to_uppercase();
                        true
                    }
                    None => false,
                }
            }
        };

        if applied {
            self.notify(StateChange::Scenes);
        } else {
            debug!("Dictation target no longer exists: {:?}", update);
        }
        applied
    }

    // ---- side panel ------------------------------------------------------

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.state.notes = notes.into();
        self.notify(StateChange::Notes);
    }

    pub fn increment_counter(&mut self) -> i64 {
        self.state.counter += 1;
        self.notify(StateChange::Counter);
        self.state.counter
    }

    pub fn reset_counter(&mut self) {
        self.state.counter = 0;
        self.notify(StateChange::Counter);
    }

    /// A short press increments, a long press resets
    pub fn press_counter(&mut self, held: Duration) -> i64 {
        if held >= COUNTER_RESET_HOLD {
            self.reset_counter();
        } else {
            self.increment_counter();
        }
        self.state.counter
    }

    /// Add a trimmed idea; blank input is ignored
    pub fn add_idea(&mut self, idea: &str) -> bool {
        let idea = idea.trim();
        if idea.is_empty() {
            return false;
        }
        self.state.ideas.push(idea.to_string());
        self.notify(StateChange::Ideas);
        true
    }

    pub fn delete_idea(&mut self, index: usize) -> Option<String> {
        if index >= self.state.ideas.len() {
            return None;
        }
        let removed = self.state.ideas.remove(index);
        self.notify(StateChange::Ideas);
        Some(removed)
    }

    pub fn set_voice_buttons_enabled(&mut self, enabled: bool) {
        self.state.voice_buttons_enabled = enabled;
        self.notify(StateChange::VoiceButtons);
    }

    // ---- saved scripts ---------------------------------------------------

    /// Snapshot scenes, notes, ideas and counter under `name`
    pub fn save_script(&mut self, name: &str) -> Result<(), EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::EmptyScriptName);
        }
        let data = self.state.snapshot();
        self.state.saved_scripts.push(SavedScript {
            name: name.to_string(),
            data,
        });
        self.notify(StateChange::SavedScripts);
        Ok(())
    }

    /// Restore a saved snapshot, replacing the current script
    pub fn load_script(&mut self, index: usize) -> Result<(), EditorError> {
        let snapshot = self
            .state
            .saved_scripts
            .get(index)
            .map(|s| s.data.clone())
            .ok_or(EditorError::ScriptNotFound(index))?;

        self.state.scenes = snapshot.scenes;
        self.state.notes = snapshot.notes;
        self.state.ideas = snapshot.ideas;
        self.state.counter = snapshot.counter;

        for change in [StateChange::Scenes, StateChange::Notes, StateChange::Ideas, StateChange::Counter] {
            self.notify(change);
        }
        Ok(())
    }

    pub fn delete_script(&mut self, index: usize) -> Result<SavedScript, EditorError> {
        if index >= self.state.saved_scripts.len() {
            return Err(EditorError::ScriptNotFound(index));
        }
        let removed = self.state.saved_scripts.remove(index);
        self.notify(StateChange::SavedScripts);
        Ok(removed)
    }

    /// Position of the most recently saved script with this name
    pub fn find_script(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.state.saved_scripts.iter().rposition(|s| s.name == name)
    }

    /// Start over: scenes, notes and counter are cleared, ideas and saved scripts stay
    pub fn clear_script(&mut self) {
        self.state.scenes.clear();
        self.state.notes.clear();
        self.state.counter = 0;
        for change in [StateChange::Scenes, StateChange::Notes, StateChange::Counter] {
            self.notify(change);
        }
    }
}

fn append_dictation(field: &mut String, text: &str) {
    let text = text.trim();
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(text);
}
