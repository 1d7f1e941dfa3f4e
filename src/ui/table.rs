use crate::storage::DbStats;
use crate::{Quiz, QuizResult, Student, Topic};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Rows")]
    rows: usize,
}

#[derive(Tabled)]
struct StudentRow {
    id: i64,
    name: String,
    email: String,
}

#[derive(Tabled)]
struct TopicRow {
    id: i64,
    name: String,
    difficulty: String,
    description: String,
}

#[derive(Tabled)]
struct QuizRow {
    id: i64,
    topic_id: i64,
    #[tabled(rename = "type")]
    quiz_type: String,
    questions: String,
}

#[derive(Tabled)]
struct ResultRow {
    id: i64,
    user_id: i64,
    quiz_id: i64,
    score: i64,
    timestamp: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &DbStats) -> String {
    render(vec![
        StatRow { table: "students", rows: stats.students },
        StatRow { table: "topics", rows: stats.topics },
        StatRow { table: "quizzes", rows: stats.quizzes },
        StatRow { table: "results", rows: stats.results },
    ])
}

pub fn students_table(students: &[Student]) -> String {
    render(
        students
            .iter()
            .map(|s| StudentRow { id: s.id, name: s.full_name(), email: s.email.clone() })
            .collect(),
    )
}

pub fn topics_table(topics: &[Topic]) -> String {
    render(
        topics
            .iter()
            .map(|t| TopicRow {
                id: t.id,
                name: t.name.clone(),
                difficulty: t.difficulty.to_string(),
                description: crate::preview(&t.description, 40),
            })
            .collect(),
    )
}

pub fn quizzes_table(quizzes: &[Quiz]) -> String {
    render(
        quizzes
            .iter()
            .map(|q| QuizRow {
                id: q.id,
                topic_id: q.topic_id,
                quiz_type: q.quiz_type.label().to_string(),
                questions: crate::preview(&q.questions, 40),
            })
            .collect(),
    )
}

pub fn results_table(results: &[QuizResult]) -> String {
    render(
        results
            .iter()
            .map(|r| ResultRow {
                id: r.id,
                user_id: r.user_id,
                quiz_id: r.quiz_id,
                score: r.score,
                timestamp: r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Difficulty;

    #[test]
    fn test_empty_renders_nothing() {
        assert!(topics_table(&[]).is_empty());
    }

    #[test]
    fn test_stats_table_lists_every_table() {
        let stats = DbStats { students: 1, topics: 5, quizzes: 2, results: 1 };
        let rendered = stats_table(&stats);
        for name in ["students", "topics", "quizzes", "results"] {
            assert!(rendered.contains(name));
        }
    }

    #[test]
    fn test_topics_table_shows_difficulty() {
        let topic = Topic::new("Thermodynamics", Difficulty::Hard, "Energy and heat.");
        let rendered = topics_table(&[topic]);
        assert!(rendered.contains("Thermodynamics"));
        assert!(rendered.contains("hard"));
    }
}
