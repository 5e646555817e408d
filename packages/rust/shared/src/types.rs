//! Core domain types for examdeck question banks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for exam run / session identifiers (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Question / AnswerOption
// ---------------------------------------------------------------------------

/// One selectable answer choice within a question.
///
/// The data model does not enforce exactly one correct option per question:
/// a malformed source document may flag zero or several. Consumers decide
/// their own policy (grading treats any flagged option as correct).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option text after marker stripping. Never empty.
    pub text: String,
    /// Whether the source convention flagged this option as the right answer.
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A question recovered from the source document.
///
/// `id` is the ordinal the document itself declared; it may repeat, skip, or
/// be out of order, and the segmenter neither validates nor renumbers it.
/// Output order is the order headers appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Source-declared ordinal.
    pub id: u32,
    /// Question stem, with wrapped lines space-joined.
    pub text: String,
    /// Answer choices in source order. Never empty in segmenter output.
    pub options: Vec<AnswerOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let s = id.to_string();
        let parsed: RunId = s.parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn option_serializes_with_camel_case_flag() {
        let opt = AnswerOption::new("Blue", true);
        let json = serde_json::to_string(&opt).expect("serialize");
        assert!(json.contains("\"isCorrect\":true"));
    }

    #[test]
    fn question_serialization_roundtrip() {
        let q = Question {
            id: 7,
            text: "What color is the sky?".into(),
            options: vec![
                AnswerOption::new("Red", false),
                AnswerOption::new("Blue", true),
            ],
        };
        let json = serde_json::to_string(&q).expect("serialize");
        let parsed: Question = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, q);
    }
}
