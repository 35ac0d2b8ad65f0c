/*!
 * Common test utilities for the roteiro test suite
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use roteiro::app_config::{Config, StorageConfig, TranslationConfig};
use roteiro::app_controller::Controller;
use roteiro::preferences::PreferenceService;
use roteiro::providers::mock::MockProvider;
use roteiro::providers::PreferenceStore;
use roteiro::storage::{DatabaseConnection, Repository};
use roteiro::TranslationService;


pub use scripted_recognizer::ScriptedRecognizerFactory;

/// A short full script with two speakers across three scenes
pub const SAMPLE_SCRIPT: &str = "1 - EXT. PRAIA - DIA
ANA
- Chegamos tarde.
BETO
- Como sempre.

2 - INT. CARRO - NOITE

3 - EXT. ESTRADA - NOITE
ANA
- Voltei.
";

/// Initialize env_logger once for tests that want log output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Database file path inside a temporary directory
pub fn database_path(dir: &Path) -> PathBuf {
    dir.join("data").join("roteiro.db")
}

/// Config with no request delay, pointed at the given database
pub fn test_config(database_path: Option<PathBuf>) -> Config {
    Config {
        storage: StorageConfig { database_path },
        translation: TranslationConfig {
            request_delay_ms: 0,
            ..TranslationConfig::default()
        },
        ..Config::default()
    }
}

/// Translation service backed by the given mock provider
pub fn mock_translation(provider: MockProvider, config: &Config) -> TranslationService {
    TranslationService::new(Arc::new(provider), &config.translation)
}

/// Controller over an in-memory store with a working mock translator
pub fn in_memory_controller(recognizer: ScriptedRecognizerFactory) -> Result<Controller> {
    let config = test_config(None);
    let translation = mock_translation(MockProvider::working(), &config);
    Controller::in_memory(config, translation, None, Box::new(recognizer))
}

/// Controller over a database file, as a fresh app start would build it
pub fn file_controller(
    path: &Path,
    remote: Option<Arc<dyn PreferenceStore>>,
) -> Result<Controller> {
    let config = test_config(Some(path.to_path_buf()));
    let repository = Repository::new(DatabaseConnection::new(path)?);
    let translation = mock_translation(MockProvider::working(), &config);
    let preferences = PreferenceService::new(repository.clone(), remote);
    Ok(Controller::with_parts(
        config,
        repository,
        translation,
        preferences,
        Box::new(ScriptedRecognizerFactory::new()),
    ))
}
