//! Topic records - table `topics`
//!
//! Every topic sits on one of three difficulty tiers:
//! - `Easy`
//! - `Intermediate`
//! - `Hard`

use crate::{Error, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Difficulty tier of a topic.
///
/// Stored as the lowercase variant name; the `topics` table rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Intermediate,
    Hard,
}

impl Difficulty {
    /// Get the stored representation of the difficulty
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
        }
    }

    /// Get all difficulty tiers
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Intermediate, Difficulty::Hard]
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "intermediate" => Ok(Difficulty::Intermediate),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(Error::InvalidValue(format!("Unknown difficulty: {}", s))),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

/// A subject area with an associated difficulty tier.
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub difficulty: Difficulty,
    /// One-sentence summary of what the topic covers
    pub description: String,
}

impl Topic {
    pub fn new(name: impl Into<String>, difficulty: Difficulty, description: impl Into<String>) -> Self {
        Self {
            id: 0, // Set by DB
            name: name.into(),
            difficulty,
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topic(id={}, name={}, difficulty={}, description={})",
            self.id,
            self.name,
            self.difficulty,
            crate::preview(&self.description, 30)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trips_through_str() {
        for difficulty in Difficulty::all() {
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), *difficulty);
        }
    }

    #[test]
    fn test_unknown_difficulty_rejected() {
        assert!("expert".parse::<Difficulty>().is_err());
        assert!("Easy".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_display_truncates_description() {
        let topic = Topic::new(
            "Periodic Table",
            Difficulty::Intermediate,
            "A study of the organization of elements based on their atomic number and properties.",
        );
        assert_eq!(
            topic.to_string(),
            "Topic(id=0, name=Periodic Table, difficulty=intermediate, description=A study of the organization of...)"
        );
    }
}
