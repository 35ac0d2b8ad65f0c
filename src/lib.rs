/*!
 * # Roteiro - screenplay editor core
 *
 * A Rust library for writing screenplays as numbered scenes with dialogue,
 * dictating into them and translating the dialogue.
 *
 * ## Features
 *
 * - Scenes with an action line and ordered character/line dialogues
 * - Flat script text format: full, scenes-only and dialogues-only views,
 *   and a forgiving parser for the full view
 * - Side panel state: notes, a counter, ideas with links, named saved scripts
 * - Local persistence on SQLite with versioned JSON documents
 * - Speech dictation through an injected platform recognizer
 * - Dialogue translation through the MyMemory API
 * - Voice-button preference synced to a Supabase table
 *
 * ## Architecture
 *
 * - `script`: model, text format and translated-dialogue reorganizer
 * - `editor`: application state, mutations and change observers
 * - `storage`: SQLite key/value store
 * - `recognition`: per-channel dictation sessions
 * - `providers`: MyMemory, Supabase and mock clients
 * - `translation_service`: line-by-line dialogue translation
 * - `preferences`: user id and voice-button preference
 * - `app_controller`: root owner wiring everything together
 * - `app_config`: configuration management
 * - `language_utils`: ISO language code utilities
 * - `file_utils`: file system operations
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod editor;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod preferences;
pub mod providers;
pub mod recognition;
pub mod script;
pub mod storage;
pub mod translation_service;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use editor::{Editor, EditorState, SavedScript, ScriptSnapshot, StateChange, StateObserver};
pub use errors::{EditorError, ProviderError, RecognitionError};
pub use script::{format_dialogues, format_full, format_scenes, parse_full, Dialogue, Scene, ScriptView};
pub use translation_service::TranslationService;
