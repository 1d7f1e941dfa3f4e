//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - students(id, first_name, last_name, email, password)
//! - topics(id, name, difficulty, description)
//! - quizzes(id, topic_id, questions, type, answers, correct_answers)
//! - results(id, user_id, quiz_id, score, timestamp)

pub mod schema;
pub mod sqlite;

pub use sqlite::{QuizStore, DbStats};
