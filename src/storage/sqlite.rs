//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Error, Result};
use crate::credential::HashedPassword;
use crate::quiz::Quiz;
use crate::quiz_result::QuizResult;
use crate::student::Student;
use crate::topic::Topic;
use super::schema;

const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, password";
const TOPIC_COLUMNS: &str = "id, name, difficulty, description";
const QUIZ_COLUMNS: &str = "id, topic_id, questions, type, answers, correct_answers";
const RESULT_COLUMNS: &str = "id, user_id, quiz_id, score, timestamp";

/// SQLite-backed storage for students, topics, quizzes and results
pub struct QuizStore {
    conn: Connection,
}

impl QuizStore {
    /// Open a database file (creates it and its parent directories if missing)
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_echo(path, false)
    }

    /// Like [`QuizStore::open`], logging every statement from the first one on
    pub fn open_with_echo(path: &Path, echo: bool) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database {}", path.display());
        Self::from_connection(conn, echo)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, false)
    }

    fn from_connection(conn: Connection, echo: bool) -> Result<Self> {
        let mut store = Self { conn };
        store.set_echo(echo);
        store.conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create any missing tables. Safe to call on an initialized database.
    pub fn ensure_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Log every SQL statement at debug level
    pub fn set_echo(&mut self, enabled: bool) {
        if enabled {
            self.conn.trace(Some(echo_statement));
        } else {
            self.conn.trace(None);
        }
    }

    /// Names of the tables currently present, sorted
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name"
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    // ========== Student Operations ==========

    /// Insert a student, returning its assigned id
    pub fn insert_student(&self, student: &Student) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO students (first_name, last_name, email, password) VALUES (?1, ?2, ?3, ?4)",
            params![
                student.first_name,
                student.last_name,
                student.email,
                student.password.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a student by id
    pub fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM students WHERE id = ?1", STUDENT_COLUMNS),
                [id],
                row_to_student,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Get a student by email
    pub fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM students WHERE email = ?1", STUDENT_COLUMNS),
                [email],
                row_to_student,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_students(&self) -> Result<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM students ORDER BY id", STUDENT_COLUMNS)
        )?;
        let students = stmt
            .query_map([], row_to_student)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(students)
    }

    // ========== Topic Operations ==========

    /// Insert a topic, returning its assigned id
    pub fn insert_topic(&self, topic: &Topic) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO topics (name, difficulty, description) VALUES (?1, ?2, ?3)",
            params![topic.name, topic.difficulty, topic.description],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a topic by id
    pub fn get_topic(&self, id: i64) -> Result<Option<Topic>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM topics WHERE id = ?1", TOPIC_COLUMNS),
                [id],
                row_to_topic,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn list_topics(&self) -> Result<Vec<Topic>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM topics ORDER BY id", TOPIC_COLUMNS)
        )?;
        let topics = stmt
            .query_map([], row_to_topic)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(topics)
    }

    // ========== Quiz Operations ==========

    /// Insert a quiz, returning its assigned id
    pub fn insert_quiz(&self, quiz: &Quiz) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO quizzes (topic_id, questions, type, answers, correct_answers)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                quiz.topic_id,
                quiz.questions,
                quiz.quiz_type,
                quiz.answers,
                quiz.correct_answers,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a quiz by id
    pub fn get_quiz(&self, id: i64) -> Result<Option<Quiz>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM quizzes WHERE id = ?1", QUIZ_COLUMNS),
                [id],
                row_to_quiz,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All quizzes on a topic
    pub fn quizzes_for_topic(&self, topic_id: i64) -> Result<Vec<Quiz>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM quizzes WHERE topic_id = ?1 ORDER BY id", QUIZ_COLUMNS)
        )?;
        let quizzes = stmt
            .query_map([topic_id], row_to_quiz)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(quizzes)
    }

    pub fn list_quizzes(&self) -> Result<Vec<Quiz>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM quizzes ORDER BY id", QUIZ_COLUMNS)
        )?;
        let quizzes = stmt
            .query_map([], row_to_quiz)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(quizzes)
    }

    // ========== Result Operations ==========

    /// Insert a quiz result, returning its assigned id
    pub fn insert_result(&self, result: &QuizResult) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO results (user_id, quiz_id, score, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![result.user_id, result.quiz_id, result.score, result.timestamp],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a result by id
    pub fn get_result(&self, id: i64) -> Result<Option<QuizResult>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM results WHERE id = ?1", RESULT_COLUMNS),
                [id],
                row_to_result,
            )
            .optional()
            .map_err(Into::into)
    }

    /// All results recorded for a student, oldest first
    pub fn results_for_student(&self, user_id: i64) -> Result<Vec<QuizResult>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM results WHERE user_id = ?1 ORDER BY timestamp, id", RESULT_COLUMNS)
        )?;
        let results = stmt
            .query_map([user_id], row_to_result)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(results)
    }

    pub fn list_results(&self) -> Result<Vec<QuizResult>> {
        let mut stmt = self.conn.prepare(
            &format!("SELECT {} FROM results ORDER BY id", RESULT_COLUMNS)
        )?;
        let results = stmt
            .query_map([], row_to_result)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(results)
    }

    // ========== Transactions ==========

    /// Begin a write transaction, taking the write lock up front
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    /// Run `f` in a single transaction.
    ///
    /// Commits when `f` succeeds. If `f` or the commit fails, everything `f`
    /// wrote is rolled back and that first error is returned; the connection
    /// is never left inside an open transaction.
    pub fn in_transaction<T>(&mut self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        self.begin_transaction()?;
        let outcome = f(self).and_then(|value| self.commit().map(|()| value));
        if outcome.is_err() {
            self.abandon_transaction();
        }
        outcome
    }

    fn abandon_transaction(&mut self) {
        if self.conn.is_autocommit() {
            return;
        }
        if let Err(rollback_err) = self.rollback() {
            tracing::warn!("Rollback failed: {}", rollback_err);
        }
    }

    /// Release the database handle
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::from(e))
    }

    // ========== Statistics ==========

    fn count_rows(&self, table: &'static str) -> Result<usize> {
        let count: i64 = self.conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn count_students(&self) -> Result<usize> {
        self.count_rows("students")
    }

    pub fn count_topics(&self) -> Result<usize> {
        self.count_rows("topics")
    }

    pub fn count_quizzes(&self) -> Result<usize> {
        self.count_rows("quizzes")
    }

    pub fn count_results(&self) -> Result<usize> {
        self.count_rows("results")
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            students: self.count_students()?,
            topics: self.count_topics()?,
            quizzes: self.count_quizzes()?,
            results: self.count_results()?,
        })
    }
}

fn echo_statement(sql: &str) {
    tracing::debug!(target: "quizstore::sql", "{}", sql.trim());
}

fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
    let password: String = row.get(4)?;
    Ok(Student {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password: HashedPassword::from_stored(password),
    })
}

fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        name: row.get(1)?,
        difficulty: row.get(2)?,
        description: row.get(3)?,
    })
}

fn row_to_quiz(row: &rusqlite::Row) -> rusqlite::Result<Quiz> {
    Ok(Quiz {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        questions: row.get(2)?,
        quiz_type: row.get(3)?,
        answers: row.get(4)?,
        correct_answers: row.get(5)?,
    })
}

fn row_to_result(row: &rusqlite::Row) -> rusqlite::Result<QuizResult> {
    Ok(QuizResult {
        id: row.get(0)?,
        user_id: row.get(1)?,
        quiz_id: row.get(2)?,
        score: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

/// Row counts per table
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DbStats {
    pub students: usize,
    pub topics: usize,
    pub quizzes: usize,
    pub results: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Students: {}", self.students)?;
        writeln!(f, "  Topics: {}", self.topics)?;
        writeln!(f, "  Quizzes: {}", self.quizzes)?;
        writeln!(f, "  Results: {}", self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Constraint, Difficulty, QuizType};

    fn sample_student(email: &str) -> Student {
        Student::new("Jane", "Roe", email, "hunter2").unwrap()
    }

    fn sample_topic() -> Topic {
        Topic::new("Stoichiometry", Difficulty::Intermediate, "Quantities in chemical reactions.")
    }

    fn sample_quiz(topic_id: i64) -> Quiz {
        Quiz::new(topic_id, QuizType::Calc, "Moles in 18g of water?", "A) 1, B) 2", "A) 1")
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let store = QuizStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();

        assert_eq!(
            store.table_names().unwrap(),
            vec!["quizzes", "results", "students", "topics"]
        );
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let store = QuizStore::open_in_memory().unwrap();
        let fk: i64 = store
            .conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_student_crud() {
        let store = QuizStore::open_in_memory().unwrap();
        let id = store.insert_student(&sample_student("jane@example.com")).unwrap();

        let retrieved = store.get_student(id).unwrap().unwrap();
        assert_eq!(retrieved.id, id);
        assert_eq!(retrieved.email, "jane@example.com");
        assert!(retrieved.password.verify("hunter2"));

        let by_email = store.find_student_by_email("jane@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, id);
        assert!(store.get_student(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_unique_violation() {
        let store = QuizStore::open_in_memory().unwrap();
        store.insert_student(&sample_student("jane@example.com")).unwrap();

        let err = store.insert_student(&sample_student("jane@example.com")).unwrap_err();
        assert_eq!(err.constraint(), Some(Constraint::Unique));
        assert_eq!(store.count_students().unwrap(), 1);
    }

    #[test]
    fn test_quiz_with_missing_topic_is_foreign_key_violation() {
        let store = QuizStore::open_in_memory().unwrap();
        let err = store.insert_quiz(&sample_quiz(42)).unwrap_err();
        assert_eq!(err.constraint(), Some(Constraint::ForeignKey));
    }

    #[test]
    fn test_result_with_missing_references_is_foreign_key_violation() {
        let store = QuizStore::open_in_memory().unwrap();
        let student_id = store.insert_student(&sample_student("jane@example.com")).unwrap();
        let topic_id = store.insert_topic(&sample_topic()).unwrap();
        let quiz_id = store.insert_quiz(&sample_quiz(topic_id)).unwrap();

        let missing_user = store.insert_result(&QuizResult::new(student_id + 10, quiz_id, 5)).unwrap_err();
        assert_eq!(missing_user.constraint(), Some(Constraint::ForeignKey));

        let missing_quiz = store.insert_result(&QuizResult::new(student_id, quiz_id + 10, 5)).unwrap_err();
        assert_eq!(missing_quiz.constraint(), Some(Constraint::ForeignKey));

        store.insert_result(&QuizResult::new(student_id, quiz_id, 5)).unwrap();
        assert_eq!(store.count_results().unwrap(), 1);
    }

    #[test]
    fn test_unknown_enum_values_are_check_violations() {
        let store = QuizStore::open_in_memory().unwrap();

        let err: Error = store
            .conn
            .execute(
                "INSERT INTO topics (name, difficulty, description) VALUES ('X', 'expert', 'Y')",
                [],
            )
            .unwrap_err()
            .into();
        assert_eq!(err.constraint(), Some(Constraint::Check));

        let topic_id = store.insert_topic(&sample_topic()).unwrap();
        let err: Error = store
            .conn
            .execute(
                "INSERT INTO quizzes (topic_id, questions, type, answers, correct_answers)
                 VALUES (?1, 'q', 'multiple choice', 'a', 'c')",
                [topic_id],
            )
            .unwrap_err()
            .into();
        assert_eq!(err.constraint(), Some(Constraint::Check));
    }

    #[test]
    fn test_every_enum_variant_is_accepted() {
        let store = QuizStore::open_in_memory().unwrap();
        for difficulty in Difficulty::all() {
            let topic_id = store
                .insert_topic(&Topic::new("T", *difficulty, "D"))
                .unwrap();
            for quiz_type in QuizType::all() {
                store
                    .insert_quiz(&Quiz::new(topic_id, *quiz_type, "q", "a", "c"))
                    .unwrap();
            }
        }
        assert_eq!(store.count_topics().unwrap(), 3);
        assert_eq!(store.count_quizzes().unwrap(), 9);
    }

    #[test]
    fn test_topic_and_quiz_lookups() {
        let store = QuizStore::open_in_memory().unwrap();
        let topic_id = store.insert_topic(&sample_topic()).unwrap();
        let other_topic = store.insert_topic(&sample_topic()).unwrap();
        let quiz_id = store.insert_quiz(&sample_quiz(topic_id)).unwrap();

        let topic = store.get_topic(topic_id).unwrap().unwrap();
        assert_eq!(topic.difficulty, Difficulty::Intermediate);

        let quiz = store.get_quiz(quiz_id).unwrap().unwrap();
        assert_eq!(quiz.quiz_type, QuizType::Calc);
        assert_eq!(quiz.correct_answers, "A) 1");

        assert_eq!(store.quizzes_for_topic(topic_id).unwrap().len(), 1);
        assert!(store.quizzes_for_topic(other_topic).unwrap().is_empty());
    }

    #[test]
    fn test_result_timestamp_round_trip() {
        let store = QuizStore::open_in_memory().unwrap();
        let student_id = store.insert_student(&sample_student("jane@example.com")).unwrap();
        let topic_id = store.insert_topic(&sample_topic()).unwrap();
        let quiz_id = store.insert_quiz(&sample_quiz(topic_id)).unwrap();

        let result = QuizResult::new(student_id, quiz_id, 7);
        let id = store.insert_result(&result).unwrap();

        let retrieved = store.get_result(id).unwrap().unwrap();
        assert_eq!(retrieved.score, 7);
        assert_eq!(retrieved.timestamp, result.timestamp);
        assert_eq!(store.results_for_student(student_id).unwrap().len(), 1);
    }

    #[test]
    fn test_result_timestamp_defaults_to_insertion_time() {
        let store = QuizStore::open_in_memory().unwrap();
        let student_id = store.insert_student(&sample_student("jane@example.com")).unwrap();
        let topic_id = store.insert_topic(&sample_topic()).unwrap();
        let quiz_id = store.insert_quiz(&sample_quiz(topic_id)).unwrap();

        store
            .conn
            .execute(
                "INSERT INTO results (user_id, quiz_id, score) VALUES (?1, ?2, 3)",
                [student_id, quiz_id],
            )
            .unwrap();

        let results = store.list_results().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].timestamp <= chrono::Utc::now().naive_utc());
    }

    #[test]
    fn test_failed_transaction_leaves_no_rows() {
        let mut store = QuizStore::open_in_memory().unwrap();

        let err = store
            .in_transaction(|tx| {
                tx.insert_topic(&sample_topic())?;
                tx.insert_quiz(&sample_quiz(999))?;
                Ok(())
            })
            .unwrap_err();

        assert_eq!(err.constraint(), Some(Constraint::ForeignKey));
        assert_eq!(store.count_topics().unwrap(), 0);
    }

    #[test]
    fn test_failed_commit_rolls_back_and_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.db");

        let mut writer = QuizStore::open(&path).unwrap();
        writer.conn.busy_timeout(std::time::Duration::from_millis(50)).unwrap();

        // An open read transaction keeps COMMIT from taking the exclusive lock
        let reader = Connection::open(&path).unwrap();
        reader.execute_batch("BEGIN").unwrap();
        let seen: i64 = reader
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(seen, 0);

        let err = crate::seed::seed(&mut writer).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(rusqlite::Error::SqliteFailure(ref e, _))
                if e.code == rusqlite::ErrorCode::DatabaseBusy
        ));
        assert!(writer.conn.is_autocommit());

        reader.execute_batch("COMMIT").unwrap();
        drop(reader);

        assert_eq!(
            writer.stats().unwrap(),
            DbStats { students: 0, topics: 0, quizzes: 0, results: 0 }
        );
        crate::seed::seed(&mut writer).unwrap();
        assert_eq!(
            writer.stats().unwrap(),
            DbStats { students: 1, topics: 5, quizzes: 2, results: 1 }
        );
    }

    #[test]
    fn test_transaction_commits() {
        let mut store = QuizStore::open_in_memory().unwrap();
        let topic_id = store.in_transaction(|tx| tx.insert_topic(&sample_topic())).unwrap();

        assert_eq!(store.get_topic(topic_id).unwrap().unwrap().name, "Stoichiometry");
        assert_eq!(
            store.stats().unwrap(),
            DbStats { students: 0, topics: 1, quizzes: 0, results: 0 }
        );
    }
}
