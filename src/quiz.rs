//! Quiz records - table `quizzes`
//!
//! Questions, candidate answers and the answer key are kept as opaque text
//! exactly as written; nothing here parses them.

use crate::{Error, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a quiz is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizType {
    MultipleChoice,
    Matching,
    Calc,
}

impl QuizType {
    /// Get the stored representation of the quiz type
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::MultipleChoice => "multiple_choice",
            QuizType::Matching => "matching",
            QuizType::Calc => "calc",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            QuizType::MultipleChoice => "multiple choice",
            QuizType::Matching => "matching",
            QuizType::Calc => "calc",
        }
    }

    /// Get all quiz types
    pub fn all() -> &'static [QuizType] {
        &[QuizType::MultipleChoice, QuizType::Matching, QuizType::Calc]
    }
}

impl FromStr for QuizType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "multiple_choice" => Ok(QuizType::MultipleChoice),
            "matching" => Ok(QuizType::Matching),
            "calc" => Ok(QuizType::Calc),
            _ => Err(Error::InvalidValue(format!("Unknown quiz type: {}", s))),
        }
    }
}

impl std::fmt::Display for QuizType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for QuizType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for QuizType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

/// A set of questions on one topic, with its answer key.
#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
    pub id: i64,
    /// Must reference an existing topic
    pub topic_id: i64,
    pub questions: String,
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
    pub answers: String,
    pub correct_answers: String,
}

impl Quiz {
    pub fn new(
        topic_id: i64,
        quiz_type: QuizType,
        questions: impl Into<String>,
        answers: impl Into<String>,
        correct_answers: impl Into<String>,
    ) -> Self {
        Self {
            id: 0, // Set by DB
            topic_id,
            questions: questions.into(),
            quiz_type,
            answers: answers.into(),
            correct_answers: correct_answers.into(),
        }
    }
}

impl std::fmt::Display for Quiz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Quiz(id={}, topic_id={}, type={}, questions={})",
            self.id,
            self.topic_id,
            self.quiz_type,
            crate::preview(&self.questions, 30)
        )
    }
}
