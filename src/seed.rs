//! Sample data
//!
//! One student, five chemistry topics, two quizzes and one result, written
//! in a single transaction. Seeding twice fails on the student's email and
//! leaves the first seed untouched.

use crate::quiz::{Quiz, QuizType};
use crate::quiz_result::QuizResult;
use crate::storage::QuizStore;
use crate::student::Student;
use crate::topic::{Difficulty, Topic};
use crate::Result;
use serde::Serialize;

pub const SAMPLE_EMAIL: &str = "john.doe@example.com";
const SAMPLE_PASSWORD: &str = "securepassword123";

const TOPICS: &[(&str, Difficulty, &str)] = &[
    (
        "Atomic Structure",
        Difficulty::Easy,
        "An introduction to the structure of atoms, including protons, neutrons, and electrons.",
    ),
    (
        "Periodic Table",
        Difficulty::Intermediate,
        "A study of the organization of elements based on their atomic number and properties.",
    ),
    (
        "Chemical Bonding",
        Difficulty::Intermediate,
        "Understanding how atoms form bonds to create molecules through ionic and covalent bonds.",
    ),
    (
        "Organic Chemistry",
        Difficulty::Hard,
        "An advanced study of carbon-based compounds, their structure, reactions, and properties.",
    ),
    (
        "Thermodynamics",
        Difficulty::Hard,
        "The study of energy, heat, and the laws governing their transformations in chemical processes.",
    ),
];

const ATOMIC_STRUCTURE: usize = 0;
const ORGANIC_CHEMISTRY: usize = 3;

/// Ids written by one seed run
#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub student_id: i64,
    pub topic_ids: Vec<i64>,
    pub quiz_ids: Vec<i64>,
    pub result_ids: Vec<i64>,
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Seeded:")?;
        writeln!(f, "  Students: 1")?;
        writeln!(f, "  Topics: {}", self.topic_ids.len())?;
        writeln!(f, "  Quizzes: {}", self.quiz_ids.len())?;
        writeln!(f, "  Results: {}", self.result_ids.len())
    }
}

/// Insert the sample dataset in one transaction
pub fn seed(store: &mut QuizStore) -> Result<SeedReport> {
    // Hash outside the transaction so the write lock is held only for inserts
    let student = Student::new("John", "Doe", SAMPLE_EMAIL, SAMPLE_PASSWORD)?;

    let report = store.in_transaction(|tx| {
        let student_id = tx.insert_student(&student)?;
        tracing::debug!("Inserted student {}", student_id);

        let mut topic_ids = Vec::with_capacity(TOPICS.len());
        for (name, difficulty, description) in TOPICS {
            topic_ids.push(tx.insert_topic(&Topic::new(*name, *difficulty, *description))?);
        }
        tracing::debug!("Inserted {} topics", topic_ids.len());

        let quizzes = [
            Quiz::new(
                topic_ids[ATOMIC_STRUCTURE],
                QuizType::MultipleChoice,
                "What is the atomic number of Carbon?; What subatomic particles are found in the nucleus?",
                "A) 6, B) 12, C) 8; A) Protons and Neutrons, B) Electrons, C) Neutrons and Electrons",
                "A) 6; A) Protons and Neutrons",
            ),
            Quiz::new(
                topic_ids[ORGANIC_CHEMISTRY],
                QuizType::Matching,
                "What is the structure of an alkane?; What is the general formula for alkenes?",
                "A) CH₄, B) C₂H₄; A) Saturated, B) Unsaturated",
                "A) CH₄; A) Saturated",
            ),
        ];
        let quiz_ids = quizzes
            .iter()
            .map(|quiz| tx.insert_quiz(quiz))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Inserted {} quizzes", quiz_ids.len());

        let result_id = tx.insert_result(&QuizResult::new(student_id, quiz_ids[0], 8))?;

        Ok(SeedReport {
            student_id,
            topic_ids,
            quiz_ids,
            result_ids: vec![result_id],
        })
    })?;

    tracing::info!(
        "Seeded {} topics, {} quizzes, {} results",
        report.topic_ids.len(),
        report.quiz_ids.len(),
        report.result_ids.len()
    );
    Ok(report)
}
