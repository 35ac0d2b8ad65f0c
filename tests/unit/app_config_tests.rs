/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;

use roteiro::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.source_language, "pt");
    assert_eq!(config.translation.target_language, "es");
    assert_eq!(config.translation.endpoint, "https://api.mymemory.translated.net");
    assert_eq!(config.translation.request_delay_ms, 200);
    assert_eq!(config.recognition.language, "pt-BR");
    assert!(!config.preferences.is_remote());
    assert!(config.storage.database_path.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, r#"{ "translation": { "target_language": "en" }, "log_level": "debug" }"#)?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.translation.source_language, "pt");
    assert_eq!(config.translation.target_language, "en");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_fromFile_withInvalidRecognitionLanguage_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, r#"{ "recognition": { "language": "portugues" } }"#)?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withRemotePreferences_shouldRequireKey() {
    let mut config = Config::default();
    config.preferences.endpoint = "https://project.supabase.co".to_string();
    assert!(config.validate().is_err());

    config.preferences.api_key = "anon-key".to_string();
    assert!(config.validate().is_ok());
}
