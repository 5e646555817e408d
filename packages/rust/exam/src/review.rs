//! Grading and result review.
//!
//! The parser does not guarantee exactly one flagged option per question, so
//! grading uses the any-correct-counts policy: a selection is correct iff
//! the chosen option carries the flag, and the review shows the first
//! flagged option as "the" correct answer when one exists.

use serde::Serialize;

use crate::sampler::ExamQuestion;

/// Outcome for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Wrong,
    Unanswered,
}

/// Per-question review line.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewEntry {
    /// Source-declared ordinal of the question.
    pub original_id: u32,
    pub question: String,
    pub verdict: Verdict,
    /// Text of the option the taker chose, if any.
    pub your_answer: Option<String>,
    /// Text of the first flagged option; `None` when the source marked none.
    pub correct_answer: Option<String>,
}

/// Graded exam result.
#[derive(Debug, Clone, Serialize)]
pub struct ExamReport {
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub total: usize,
    pub percent: f64,
    pub entries: Vec<ReviewEntry>,
}

/// Grade an exam against the taker's selections.
///
/// `answers[i]` is the index into `exam[i].options` (served order) the taker
/// chose, or `None` when the question was skipped. A missing or out-of-range
/// entry counts as unanswered.
pub fn grade(exam: &[ExamQuestion], answers: &[Option<usize>]) -> ExamReport {
    let mut correct = 0;
    let mut wrong = 0;
    let mut unanswered = 0;
    let mut entries = Vec::with_capacity(exam.len());

    for (i, question) in exam.iter().enumerate() {
        let selected = answers
            .get(i)
            .copied()
            .flatten()
            .and_then(|idx| question.options.get(idx));

        let verdict = match selected {
            Some(opt) if opt.is_correct => {
                correct += 1;
                Verdict::Correct
            }
            Some(_) => {
                wrong += 1;
                Verdict::Wrong
            }
            None => {
                unanswered += 1;
                Verdict::Unanswered
            }
        };

        entries.push(ReviewEntry {
            original_id: question.original_id,
            question: question.text.clone(),
            verdict,
            your_answer: selected.map(|opt| opt.text.clone()),
            correct_answer: question
                .options
                .iter()
                .find(|opt| opt.is_correct)
                .map(|opt| opt.text.clone()),
        });
    }

    let total = exam.len();
    let percent = if total == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / total as f64
    };

    ExamReport {
        correct,
        wrong,
        unanswered,
        total,
        percent,
        entries,
    }
}
