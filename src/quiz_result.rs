//! Quiz results - table `results`

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

/// One student's score on one quiz.
#[derive(Debug, Clone, Serialize)]
pub struct QuizResult {
    pub id: i64,
    /// References `students.id`
    pub user_id: i64,
    /// References `quizzes.id`
    pub quiz_id: i64,
    pub score: i64,
    /// When the quiz was taken, in UTC
    pub timestamp: NaiveDateTime,
}

impl QuizResult {
    /// Record a score taken now
    pub fn new(user_id: i64, quiz_id: i64, score: i64) -> Self {
        Self::taken_at(user_id, quiz_id, score, Utc::now().naive_utc())
    }

    pub fn taken_at(user_id: i64, quiz_id: i64, score: i64, timestamp: NaiveDateTime) -> Self {
        Self {
            id: 0, // Set by DB
            user_id,
            quiz_id,
            score,
            timestamp,
        }
    }
}

impl std::fmt::Display for QuizResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Result(id={}, user_id={}, quiz_id={}, score={}, timestamp={})",
            self.id, self.user_id, self.quiz_id, self.score, self.timestamp
        )
    }
}
