//! Language code helpers.
//!
//! Translation uses bare ISO 639-1 codes (`pt`, `es`); speech recognition
//! uses a BCP 47 tag with an optional region (`pt-BR`).

use anyhow::{anyhow, Result};
use isolang::Language;

/// Resolve an ISO 639-1 code
pub fn parse_iso639_1(code: &str) -> Result<Language> {
    let normalized = code.trim().to_lowercase();
    if normalized.len() != 2 {
        return Err(anyhow!("Invalid language code: {}", code));
    }
    Language::from_639_1(&normalized).ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// English name of a language code, e.g. `pt` -> `Portuguese`
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(parse_iso639_1(code)?.to_name().to_string())
}

/// Check a recognition tag such as `pt-BR` or `es`
pub fn validate_recognition_language(tag: &str) -> Result<()> {
    let mut parts = tag.trim().split('-');
    let primary = parts.next().unwrap_or_default();
    parse_iso639_1(primary).map_err(|_| anyhow!("Invalid recognition language: {}", tag))?;

    match (parts.next(), parts.next()) {
        (None, _) => Ok(()),
        (Some(region), None)
            if (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
                || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit())) =>
        {
            Ok(())
        }
        _ => Err(anyhow!("Invalid recognition language: {}", tag)),
    }
}
