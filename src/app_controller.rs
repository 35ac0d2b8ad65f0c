use anyhow::Result;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::app_config::Config;
use crate::editor::Editor;
use crate::errors::RecognitionError;
use crate::preferences::PreferenceService;
use crate::providers::PreferenceStore;
use crate::recognition::{
    RecognitionChannel, RecognitionEvent, RecognitionHub, RecognitionTarget, RecognizerFactory,
    SessionTag, UnsupportedRecognizer,
};
use crate::script::TranslationView;
use crate::storage::{DatabaseConnection, Repository};
use crate::translation_service::{TranslationService, TranslationStats};

// @module: Application controller owning the editor and its services

/// Root owner of the application state.
///
/// The editor persists itself through the repository observer; the
/// controller adds the cross-cutting rules: recognition sessions are torn
/// down when their target disappears, and the voice flag is mirrored to the
/// preference store.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Editor state, persisted on change
    editor: Editor,
    // @field: Local store
    repository: Repository,
    // @field: Dictation sessions
    recognition: RecognitionHub,
    // @field: Remote translation
    translation: TranslationService,
    // @field: Last translation result
    translated: TranslationView,
    // @field: Voice flag and user id
    preferences: PreferenceService,
}

impl Controller {
    // @method: Open the configured store and build the real services
    pub fn open(config: Config) -> Result<Self> {
        let db = match &config.storage.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };
        let repository = Repository::new(db);
        let translation = TranslationService::from_config(&config.translation);
        let preferences = PreferenceService::from_config(&config.preferences, repository.clone());

        Ok(Self::with_parts(
            config,
            repository,
            translation,
            preferences,
            Box::new(UnsupportedRecognizer),
        ))
    }

    // @method: Assemble from explicit parts; the editor starts from the stored state
    pub fn with_parts(
        config: Config,
        repository: Repository,
        translation: TranslationService,
        preferences: PreferenceService,
        recognizer: Box<dyn RecognizerFactory>,
    ) -> Self {
        let state = repository.load_state();
        debug!(
            "Loaded {} scenes, {} ideas, {} saved scripts",
            state.scenes.len(),
            state.ideas.len(),
            state.saved_scripts.len()
        );

        let mut editor = Editor::with_state(state);
        editor.add_observer(Box::new(repository.clone()));

        let recognition = RecognitionHub::new(recognizer, config.recognition.language.clone());

        Self {
            config,
            editor,
            repository,
            recognition,
            translation,
            translated: TranslationView::default(),
            preferences,
        }
    }

    // @method: In-memory store with the given services, for tests and dry runs
    pub fn in_memory(
        config: Config,
        translation: TranslationService,
        remote_preferences: Option<Arc<dyn PreferenceStore>>,
        recognizer: Box<dyn RecognizerFactory>,
    ) -> Result<Self> {
        let repository = Repository::new_in_memory()?;
        let preferences = PreferenceService::new(repository.clone(), remote_preferences);
        Ok(Self::with_parts(config, repository, translation, preferences, recognizer))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Direct editor access for operations with no cross-cutting rules
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn recognition(&self) -> &RecognitionHub {
        &self.recognition
    }

    pub fn preferences(&self) -> &PreferenceService {
        &self.preferences
    }

    pub fn translated(&self) -> &TranslationView {
        &self.translated
    }

    pub fn translated_mut(&mut self) -> &mut TranslationView {
        &mut self.translated
    }

    // ---- structural edits --------------------------------------------------

    pub fn delete_scene(&mut self, scene_id: &str) -> bool {
        self.recognition.cancel_scene(scene_id);
        self.editor.delete_scene(scene_id)
    }

    pub fn delete_dialogue(&mut self, scene_id: &str, dialogue_id: &str) -> bool {
        self.recognition.cancel_dialogue(dialogue_id);
        self.editor.delete_dialogue(scene_id, dialogue_id)
    }

    pub fn replace_from_full_script(&mut self, text: &str) {
        self.recognition.cancel_all();
        self.editor.replace_from_full_script(text);
    }

    pub fn load_script(&mut self, index: usize) -> Result<(), crate::errors::EditorError> {
        self.recognition.cancel_all();
        self.editor.load_script(index)
    }

    pub fn clear_script(&mut self) {
        self.recognition.cancel_all();
        self.editor.clear_script();
    }

    // ---- dictation ---------------------------------------------------------

    /// Start dictating into an existing scene or dialogue
    pub fn start_dictation(&mut self, target: RecognitionTarget) -> Result<SessionTag, RecognitionError> {
        let state = self.editor.state();
        let exists = match target.dialogue_id() {
            None => state.scene(target.scene_id()).is_some(),
            Some(dialogue_id) => state
                .scene(target.scene_id())
                .and_then(|scene| scene.dialogue(dialogue_id))
                .is_some(),
        };
        if !exists {
            warn!("Dictation target no longer exists: {:?}", target);
            return Err(RecognitionError::StartFailed("target not found".to_string()));
        }
        self.recognition.start(target)
    }

    pub fn stop_dictation(&mut self, channel: RecognitionChannel) {
        self.recognition.stop(channel);
    }

    pub fn is_listening(&self, target: &RecognitionTarget) -> bool {
        self.recognition.is_listening(target)
    }

    /// Route a platform callback; returns whether the state changed
    pub fn handle_recognition_event(&mut self, tag: SessionTag, event: RecognitionEvent) -> bool {
        match self.recognition.handle_event(tag, event) {
            Some(update) => self.editor.apply_recognition(&update),
            None => false,
        }
    }

    // ---- preferences -------------------------------------------------------

    /// Pull the voice flag from the preference store into the editor
    pub async fn sync_voice_preference(&mut self) -> bool {
        let enabled = self.preferences.load_voice_buttons_enabled().await;
        if enabled != self.editor.state().voice_buttons_enabled {
            self.editor.set_voice_buttons_enabled(enabled);
        }
        enabled
    }

    /// Change the voice flag locally and remotely; disabling ends all dictation
    pub async fn set_voice_buttons_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.recognition.cancel_all();
        }
        self.editor.set_voice_buttons_enabled(enabled);
        self.preferences.save_voice_buttons_enabled(enabled).await;
        info!("Voice buttons {}", if enabled { "enabled" } else { "disabled" });
    }

    // ---- translation -------------------------------------------------------

    /// Translate the dialogues and show the result in the translation view
    pub async fn translate_dialogues(&mut self) -> TranslationStats {
        self.translate_dialogues_with_progress(|_, _| {}).await
    }

    pub async fn translate_dialogues_with_progress<F>(&mut self, progress: F) -> TranslationStats
    where
        F: FnMut(usize, usize),
    {
        let document = self.editor.render(crate::script::ScriptView::Dialogues);
        let outcome = self
            .translation
            .translate_document_with_progress(&document, progress)
            .await;
        self.translated.set_text(outcome.text);
        outcome.stats
    }
}
