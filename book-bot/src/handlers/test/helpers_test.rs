//! Choice building and error text mapping.

use crate::core::ChoiceAction;
use crate::handlers::{build_choices, error_text};
use crate::messages;
use book_search::{BookCandidate, CandidateKind, SearchError};

#[test]
fn test_build_choices_callbacks_and_urls() {
    let candidates = vec![
        BookCandidate::new("Dune", "https://lib.test/book-1", "library", CandidateKind::Page),
        BookCandidate::new("Dune PDF", "https://f.test/dune.pdf", "google", CandidateKind::Direct),
        BookCandidate::new(
            "Search Google",
            "https://www.google.com/search?q=dune",
            "google_link",
            CandidateKind::External,
        ),
    ];
    let choices = build_choices("abcd1234", &candidates);

    assert_eq!(choices.len(), 3);
    assert_eq!(choices[0].label, "1. Dune");
    assert_eq!(choices[0].action, ChoiceAction::Callback("dl:abcd1234:0".to_string()));
    assert_eq!(choices[1].action, ChoiceAction::Callback("dl:abcd1234:1".to_string()));
    assert_eq!(
        choices[2].action,
        ChoiceAction::Url("https://www.google.com/search?q=dune".to_string())
    );
}

#[test]
fn test_error_text_mapping() {
    assert_eq!(
        error_text(&SearchError::NoDownloadLink("https://lib.test".to_string())),
        messages::NO_DOWNLOAD_LINK
    );
    assert_eq!(
        error_text(&SearchError::UnsupportedFile("text/html".to_string())),
        messages::UNSUPPORTED_FILE
    );
    assert_eq!(
        error_text(&SearchError::TooLarge {
            size: 3 * 1024 * 1024,
            limit: 1024 * 1024
        }),
        "❌ The file is too large (3.0 MB, limit 1.0 MB)."
    );
    assert_eq!(
        error_text(&SearchError::Network("timeout".to_string())),
        messages::DOWNLOAD_FAILED
    );
}
