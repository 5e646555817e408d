//! Shared types, error model, and configuration for examdeck.
//!
//! This crate is the foundation depended on by all other examdeck crates.
//! It provides:
//! - [`ExamdeckError`] — the unified error type
//! - Domain types ([`Question`], [`AnswerOption`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ServerConfig, StorageConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{ExamdeckError, Result};
pub use types::{AnswerOption, Question, RunId};
