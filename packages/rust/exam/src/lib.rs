//! Exam assembly and grading on top of the segmenter.
//!
//! This crate owns the two collaborator boundaries around the pure
//! segmenter: loading extracted document text into a [`QuestionBank`]
//! (with distinct failures for missing, empty, and unparseable sources)
//! and turning a bank into a served exam (bounded sampling, option
//! shuffling, grading and review).

pub mod pipeline;
pub mod review;
pub mod sampler;

pub use pipeline::{QuestionBank, build_bank, load_document};
pub use review::{ExamReport, ReviewEntry, Verdict, grade};
pub use sampler::{DEFAULT_QUESTION_CAP, ExamQuestion, draw};
