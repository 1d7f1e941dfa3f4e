//! # Quizstore - quiz schema and seed tool
//!
//! Declares the four records of a small quiz database and writes them to SQLite.
//!
//! Quizstore provides:
//! - Record types for students, topics, quizzes and results
//! - SQLite-backed storage with foreign keys and CHECK-constrained enums
//! - A one-shot seed of illustrative chemistry data in a single transaction
//! - Salted Argon2 password hashes instead of stored plain text

pub mod credential;
pub mod student;
pub mod topic;
pub mod quiz;
pub mod quiz_result;
pub mod storage;
pub mod seed;
pub mod config;
pub mod ui;


// Re-exports for convenient access
pub use credential::HashedPassword;
pub use student::Student;
pub use topic::{Difficulty, Topic};
pub use quiz::{Quiz, QuizType};
pub use quiz_result::QuizResult;
pub use storage::QuizStore;

/// Result type alias for Quizstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Quizstore operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which storage constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Unique,
    ForeignKey,
    Check,
    NotNull,
    PrimaryKey,
    Other,
}

impl Error {
    /// Classify a constraint violation reported by SQLite.
    ///
    /// Returns `None` for anything that is not a constraint failure.
    pub fn constraint(&self) -> Option<Constraint> {
        use rusqlite::ffi;

        let Error::Storage(rusqlite::Error::SqliteFailure(err, _)) = self else {
            return None;
        };
        if err.code != rusqlite::ErrorCode::ConstraintViolation {
            return None;
        }
        let kind = match err.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => Constraint::Unique,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Constraint::ForeignKey,
            ffi::SQLITE_CONSTRAINT_CHECK => Constraint::Check,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Constraint::NotNull,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Constraint::PrimaryKey,
            _ => Constraint::Other,
        };
        Some(kind)
    }
}

/// First `max` characters of `text`, with `...` appended when cut.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
