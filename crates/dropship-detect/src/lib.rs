//! Heuristic language classification for submitted source text.
//!
//! This is a best-effort scorer, not a parser: both marker tables are
//! evaluated by plain substring membership and the higher total wins.

pub mod report;
pub mod rules;

use dropship_core::Language;
use serde::Serialize;

/// Outcome of scoring a submission against both tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub language: Language,
    pub python_score: u32,
    pub javascript_score: u32,
}

impl Classification {
    /// True when neither table won and the default was used.
    pub fn is_tie(&self) -> bool {
        self.python_score == self.javascript_score
    }
}

/// Score `text` and return the full breakdown.
pub fn detect(text: &str) -> Classification {
    let python_score = rules::PYTHON.score(text);
    let javascript_score = rules::JAVASCRIPT.score(text);

    let language = if python_score > javascript_score {
        rules::PYTHON.language
    } else if javascript_score > python_score {
        rules::JAVASCRIPT.language
    } else {
        rules::DEFAULT_LANGUAGE
    };

    let classification = Classification {
        language,
        python_score,
        javascript_score,
    };

    if classification.is_tie() {
        tracing::warn!(
            score = python_score,
            fallback = %language,
            "language scores tied, using default"
        );
    } else {
        tracing::debug!(
            %language,
            python_score,
            javascript_score,
            "classified submission"
        );
    }

    classification
}

/// Return the best-guess language for `text`. Never fails.
pub fn classify(text: &str) -> Language {
    detect(text).language
}
