//! Test utilities for BibliaAI
//!
//! Canned study payloads, in-memory stores, and assertion helpers shared by
//! the unit tests.

use crate::content::StudyContent;
use crate::error::BibliaError;
use crate::storage::MemoryKeyValueStore;
use serde_json::{json, Value};
use std::sync::Arc;

/// A complete, valid study payload as the model would return it
pub fn sample_study_value() -> Value {
    json!({
        "title": "A Graça que Transforma",
        "theme": "Graça Salvadora",
        "introduction": "Há um poder que nenhum esforço humano pode produzir.",
        "key_verses": [
            { "reference": "Efésios 2:8", "text": "Porque pela graça sois salvos, por meio da fé." },
            { "reference": "Romanos 5:20", "text": "Onde o pecado abundou, superabundou a graça." },
            { "reference": "Tito 2:11", "text": "Porque a graça de Deus se há manifestado." },
            { "reference": "João 1:17", "text": "A graça e a verdade vieram por Jesus Cristo." }
        ],
        "sermon_body": "## Introdução\n\nIrmãos, hoje falaremos da graça.\n\n## 1. A graça nos alcança",
        "illustration_prompts": [
            "A shepherd carrying a lost lamb at sunrise",
            "An empty tomb bathed in golden light",
            "A prodigal son embraced by his father"
        ],
        "practical_application": "1. Perdoe. 2. Ore. 3. Sirva.",
        "conclusion": "Aceite hoje a graça que transforma.",
        "hymns": [
            { "title": "Graça Excelsa", "number": "301", "reason": "Exalta a graça de Cristo." },
            { "title": "Sublime Graça", "reason": "Testemunho de conversão." }
        ]
    })
}

/// The parsed form of [`sample_study_value`]
pub fn sample_study() -> StudyContent {
    serde_json::from_value(sample_study_value()).expect("sample study must deserialize")
}

/// A fresh shared in-memory key/value store
pub fn memory_store() -> Arc<MemoryKeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

/// Assert that an error is a [`BibliaError`] whose message contains `expected`
///
/// # Panics
///
/// Panics if the result is Ok, the error is not a `BibliaError`, or the
/// message does not match.
pub fn assert_biblia_error_contains<T>(result: crate::error::Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            assert!(
                e.downcast_ref::<BibliaError>().is_some(),
                "Error '{}' is not a BibliaError",
                e
            );
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_study_parses() {
        let content = sample_study();
        assert_eq!(content.key_verses.len(), 4);
        assert_eq!(content.illustration_prompts.len(), 3);
    }

    #[test]
    fn test_assert_biblia_error_contains_success() {
        let result: crate::error::Result<()> =
            Err(BibliaError::Schema("missing title".to_string()).into());
        assert_biblia_error_contains(result, "missing title");
    }

    #[test]
    #[should_panic(expected = "Expected error")]
    fn test_assert_biblia_error_contains_panics_on_ok() {
        assert_biblia_error_contains(Ok(()), "anything");
    }
}
