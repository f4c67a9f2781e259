use phone_recon::extraction::{CandidateExtractor, ExtractionPipeline};
use phone_recon::SourceHint;
use std::collections::HashSet;

const CHAT_SCREEN: &str = "\
WhatsApp
Contact info
Phone: +1 415-555-0132
Reach me on +44 20 7946 0958 after 6pm
or +91 98765 43210
+1 (415) 555-0132 (same as above)";

#[test]
fn test_repeated_number_yields_one_result() {
    let pipeline = ExtractionPipeline::default();
    let numbers = pipeline.extract(
        "Phone: +1 415-555-0132 contact me at +1 (415) 555-0132 again",
        SourceHint::WhatsApp,
    );

    assert_eq!(numbers.len(), 1);
    let phone = &numbers[0];
    assert_eq!(phone.normalized.as_deref(), Some("+14155550132"));
    assert!(phone.is_valid);
    assert_eq!(phone.country_code.as_deref(), Some("+1"));
    assert_eq!(phone.country_name.as_deref(), Some("United States"));
}

#[test]
fn test_chat_screen_numbers() {
    let pipeline = ExtractionPipeline::default();
    let numbers = pipeline.extract(CHAT_SCREEN, SourceHint::WhatsApp);

    let normalized: Vec<&str> = numbers
        .iter()
        .filter_map(|n| n.normalized.as_deref())
        .collect();

    assert!(normalized.contains(&"+14155550132"));
    assert!(normalized.contains(&"+442079460958"));
    assert!(normalized.contains(&"+919876543210"));
    assert_eq!(normalized[0], "+14155550132");
}

#[test]
fn test_no_duplicate_normalized_values() {
    let pipeline = ExtractionPipeline::default();
    let numbers = pipeline.extract(CHAT_SCREEN, SourceHint::WhatsApp);

    let mut seen = HashSet::new();
    for number in numbers.iter().filter_map(|n| n.normalized.as_deref()) {
        assert!(seen.insert(number), "duplicate normalized value {}", number);
    }
}

#[test]
fn test_validity_matches_normalized_presence() {
    let pipeline = ExtractionPipeline::default();
    for source in [SourceHint::WhatsApp, SourceHint::Sms, SourceHint::CallLog] {
        for number in pipeline.extract(CHAT_SCREEN, source) {
            assert_eq!(number.is_valid, number.normalized.is_some());
        }
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let pipeline = ExtractionPipeline::default();
    let first = pipeline.extract(CHAT_SCREEN, SourceHint::WhatsApp);
    for _ in 0..5 {
        assert_eq!(pipeline.extract(CHAT_SCREEN, SourceHint::WhatsApp), first);
    }
}

#[test]
fn test_empty_text() {
    let pipeline = ExtractionPipeline::default();
    assert!(pipeline.extract("", SourceHint::WhatsApp).is_empty());
    assert!(pipeline.extract("", SourceHint::Unknown).is_empty());
}

#[test]
fn test_text_without_numbers() {
    let pipeline = ExtractionPipeline::default();
    let numbers = pipeline.extract("See you at 6pm, bring 2 chairs", SourceHint::WhatsApp);
    assert!(numbers.is_empty());
}

#[test]
fn test_source_hint_selects_pattern_set() {
    let extractor = CandidateExtractor::new();
    let text = "Mobile: 98765 43210";

    let whatsapp = extractor.extract_candidates(text, SourceHint::WhatsApp);
    assert!(!whatsapp.is_empty());
    assert_eq!(whatsapp[0].text, "98765 43210");
    assert_eq!(whatsapp[0].pattern, "labelled");

    assert!(extractor.extract_candidates(text, SourceHint::Sms).is_empty());
}

#[test]
fn test_sms_international_number() {
    let pipeline = ExtractionPipeline::default();
    let numbers = pipeline.extract("Call me on +44 20 7946 0958 tomorrow", SourceHint::Sms);

    assert_eq!(numbers[0].normalized.as_deref(), Some("+442079460958"));
    assert_eq!(numbers[0].country_name.as_deref(), Some("United Kingdom"));
}
