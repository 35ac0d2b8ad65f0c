/*!
 * Tests for the line-by-line translation service
 */

use std::sync::Arc;

use roteiro::app_config::TranslationConfig;
use roteiro::providers::mock::MockProvider;
use roteiro::script::parse_full;
use roteiro::TranslationService;
use crate::common::SAMPLE_SCRIPT;

fn service(provider: MockProvider) -> TranslationService {
    let config = TranslationConfig {
        request_delay_ms: 0,
        target_language: "en".to_string(),
        ..TranslationConfig::default()
    };
    TranslationService::new(Arc::new(provider), &config)
}

#[tokio::test]
async fn test_translateDialogues_withWorkingProvider_shouldPrefixDash() {
    let provider = MockProvider::working();
    let outcome = service(provider.clone()).translate_dialogues(&parse_full(SAMPLE_SCRIPT)).await;

    assert_eq!(
        outcome.text,
        "1\nANA\n- [en] Chegamos tarde.\nBETO\n- [en] Como sempre.\n\n3\nANA\n- [en] Voltei.\n\n"
    );
    assert_eq!(
        provider.requested_texts(),
        vec!["Chegamos tarde.", "Como sempre.", "Voltei."]
    );
    assert_eq!(outcome.stats.lines_sent, 3);
    assert_eq!(outcome.stats.lines_failed, 0);
}

#[tokio::test]
async fn test_translateDocument_withFailingProvider_shouldReturnDocumentUnchanged() {
    let document = "1\nANA\n  -   Oi  \n\n";
    let outcome = service(MockProvider::failing()).translate_document(document).await;

    assert_eq!(outcome.text, document);
    assert_eq!(outcome.stats.lines_failed, 1);
    assert!(outcome.stats.summary().contains("0 of 1"));
}

#[tokio::test]
async fn test_translateDocument_shouldPassThroughUnknownLines() {
    let document = "nota solta\n-\nANA";
    let provider = MockProvider::working();

    let outcome = service(provider.clone()).translate_document(document).await;

    assert_eq!(outcome.text, document);
    assert_eq!(provider.request_count(), 0);
}

#[test]
fn test_countRequests_shouldMatchDialogueLines() {
    let scenes = parse_full(SAMPLE_SCRIPT);
    let document = roteiro::format_dialogues(&scenes);
    assert_eq!(TranslationService::count_requests(&document), 3);
}
