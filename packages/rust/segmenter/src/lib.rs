//! Content Segmenter: recovers question/option structure from loosely
//! formatted exam text.
//!
//! Input is the flat text an upstream PDF-to-text step produced (pages
//! joined by newlines, `--- PAGE n ---` sentinels between them). The
//! segmenter walks it line by line as a small state machine: a header line
//! (`12.`, `12 .`, `12)`, `12-`) opens a question, subsequent lines become
//! stem continuations, options, or option continuations, and the question is
//! sealed when the next header (or end of input) arrives.
//!
//! The segmenter is pure and total: no I/O, no panics, and malformed input
//! degrades to a smaller result rather than an error. A question is kept
//! only if it ended up with at least one option; an option is kept only if
//! cleaning left it with real text. Anything discarded is reported in
//! [`SegmentReport::dropped`] so operators can audit lost content.

mod lines;

use serde::Serialize;
use tracing::debug;

use examdeck_shared::{AnswerOption, Question};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Why a piece of source content was not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// A question header was found but no option line ever followed.
    QuestionWithoutOptions,
    /// An option line cleaned down to nothing.
    EmptyOption,
    /// Cleaned option text was a bare numeral-with-period artifact.
    NumberingArtifact,
}

/// A record of discarded content, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecord {
    pub reason: DropReason,
    /// The text that was lost (question stem or raw option line).
    pub text: String,
}

/// Segmenter output: retained questions plus an audit trail of drops.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentReport {
    /// Questions in the order their headers appeared in the source.
    pub questions: Vec<Question>,
    /// Content discarded by the best-effort policy.
    pub dropped: Vec<DroppedRecord>,
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// The question currently being built, before sealing.
struct OpenQuestion {
    id: u32,
    text: String,
    options: Vec<AnswerOption>,
}

impl OpenQuestion {
    fn new(id: u32, initial_text: &str) -> Self {
        Self {
            id,
            text: initial_text.to_string(),
            options: Vec::new(),
        }
    }

    /// Append a wrapped stem line, space-joined.
    fn push_stem(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }

    /// Append a wrapped line to the most recent option, space-joined.
    /// Caller guarantees at least one option exists.
    fn push_option_continuation(&mut self, line: &str) {
        if let Some(last) = self.options.last_mut() {
            last.text.push(' ');
            last.text.push_str(line);
        }
    }

    /// Finalize: a question with no options is presumed malformed (or was
    /// continuation text misread as a header) and is dropped.
    fn seal(self) -> Result<Question, DroppedRecord> {
        if self.options.is_empty() {
            return Err(DroppedRecord {
                reason: DropReason::QuestionWithoutOptions,
                text: self.text,
            });
        }
        Ok(Question {
            id: self.id,
            text: self.text,
            options: self.options,
        })
    }
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// Segment document text into questions, discarding the drop report.
///
/// Never fails: unparseable input yields an empty vec, which callers should
/// treat as the "document followed none of the conventions" signal.
pub fn segment(text: &str) -> Vec<Question> {
    segment_with_report(text).questions
}

/// Segment document text into questions plus a record of dropped content.
pub fn segment_with_report(text: &str) -> SegmentReport {
    let mut questions: Vec<Question> = Vec::new();
    let mut dropped: Vec<DroppedRecord> = Vec::new();
    let mut open: Option<OpenQuestion> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if lines::is_noise(line) {
            continue;
        }

        // A header seals the previous question and opens the next.
        if let Some((id, rest)) = lines::match_header(line) {
            if let Some(prev) = open.take() {
                match prev.seal() {
                    Ok(q) => questions.push(q),
                    Err(rec) => dropped.push(rec),
                }
            }
            open = Some(OpenQuestion::new(id, rest));
            continue;
        }

        // Body lines before the first header are preamble; skip them.
        let Some(current) = open.as_mut() else {
            continue;
        };

        let is_correct = lines::has_correct_mark(line);
        let is_option_line = is_correct || lines::starts_with_bullet(line);

        if current.options.is_empty() && !is_option_line {
            // Stem wrapped across physical lines before the first option.
            current.push_stem(line);
        } else if !is_option_line
            && lines::is_continuation_candidate(line)
            && !current.options.is_empty()
        {
            // Option text wrapped onto the next line.
            current.push_option_continuation(line);
        } else {
            let cleaned = lines::clean_option_text(line);
            if cleaned.is_empty() {
                dropped.push(DroppedRecord {
                    reason: DropReason::EmptyOption,
                    text: line.to_string(),
                });
            } else if lines::is_bare_numeral(&cleaned) {
                dropped.push(DroppedRecord {
                    reason: DropReason::NumberingArtifact,
                    text: line.to_string(),
                });
            } else {
                current.options.push(AnswerOption::new(cleaned, is_correct));
            }
        }
    }

    // End of input seals whatever is still open.
    if let Some(last) = open.take() {
        match last.seal() {
            Ok(q) => questions.push(q),
            Err(rec) => dropped.push(rec),
        }
    }

    debug!(
        questions = questions.len(),
        dropped = dropped.len(),
        "segmented document"
    );

    SegmentReport { questions, dropped }
}
