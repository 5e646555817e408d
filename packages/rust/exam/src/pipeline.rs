//! Document → question bank pipeline: load, segment, validate.
//!
//! Failure taxonomy (kept distinct so the caller can produce the right
//! diagnostic):
//! - missing/unreadable file → [`ExamdeckError::Io`]
//! - file read but no text → [`ExamdeckError::Extraction`]
//! - text but zero questions → [`ExamdeckError::NoQuestions`] with a preview
//!   of the raw text

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use examdeck_segmenter::{DroppedRecord, segment_with_report};
use examdeck_shared::{ExamdeckError, Question, Result};

/// A parsed question bank plus provenance.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    /// Questions in source order, each with at least one option.
    pub questions: Vec<Question>,
    /// Content the segmenter discarded, for operator audit.
    pub dropped: Vec<DroppedRecord>,
    /// SHA-256 of the raw document text, hex-encoded.
    pub source_hash: String,
}

/// Read the extracted document text from disk.
///
/// The file is the output of the external PDF-to-text step: per-page text
/// joined by newlines with `--- PAGE n ---` sentinels between pages. A file
/// that exists but holds no text signals a corrupt or image-only source and
/// is reported distinctly from a missing file.
pub fn load_document(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| ExamdeckError::io(path, e))?;

    if text.trim().is_empty() {
        return Err(ExamdeckError::extraction(format!(
            "document {} produced no text (corrupt or image-only source?)",
            path.display()
        )));
    }

    Ok(text)
}

/// Load and segment a document into a [`QuestionBank`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn build_bank(path: &Path) -> Result<QuestionBank> {
    let text = load_document(path)?;
    let report = segment_with_report(&text);

    if report.questions.is_empty() {
        return Err(ExamdeckError::no_questions(&text));
    }

    let source_hash = format!("{:x}", Sha256::digest(text.as_bytes()));
    info!(
        questions = report.questions.len(),
        dropped = report.dropped.len(),
        source_hash = %source_hash,
        "built question bank"
    );

    Ok(QuestionBank {
        questions: report.questions,
        dropped: report.dropped,
        source_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_path() -> PathBuf {
        PathBuf::from("../../../fixtures/quiz/sample-exam.txt")
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("examdeck_{name}_{}.txt", std::process::id()));
        std::fs::write(&path, content).expect("write temp file");
        path
    }

    #[test]
    fn bank_from_fixture() {
        let bank = build_bank(&fixture_path()).expect("build bank");
        assert_eq!(bank.questions.len(), 6);
        assert!(!bank.dropped.is_empty());
        assert_eq!(bank.source_hash.len(), 64);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = build_bank(Path::new("/nonexistent/exam.txt")).unwrap_err();
        assert!(matches!(err, ExamdeckError::Io { .. }));
    }

    #[test]
    fn empty_file_is_extraction_error() {
        let path = temp_file("empty", "   \n\n  ");
        let err = build_bank(&path).unwrap_err();
        assert!(matches!(err, ExamdeckError::Extraction { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn prose_file_is_no_questions_with_preview() {
        let path = temp_file("prose", "This document has prose but no numbered questions.\n");
        let err = build_bank(&path).unwrap_err();
        match err {
            ExamdeckError::NoQuestions { preview } => {
                assert!(preview.starts_with("This document"));
            }
            other => panic!("unexpected error: {other}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn same_input_same_hash() {
        let a = build_bank(&fixture_path()).expect("first");
        let b = build_bank(&fixture_path()).expect("second");
        assert_eq!(a.source_hash, b.source_hash);
        assert_eq!(a.questions, b.questions);
    }
}
