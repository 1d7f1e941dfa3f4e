//! Database schema definitions
//!
//! Table and column names are a compatibility contract with existing
//! databases; change them only together with the data.

/// Connection settings applied right after opening
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
"#;

/// SQL to create the students table
pub const CREATE_STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    email VARCHAR(100) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL
)
"#;

/// SQL to create the topics table
pub const CREATE_TOPICS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS topics (
    id INTEGER PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    difficulty VARCHAR(12) NOT NULL CHECK (difficulty IN ('easy', 'intermediate', 'hard')),
    description VARCHAR(255) NOT NULL
)
"#;

/// SQL to create the quizzes table
pub const CREATE_QUIZZES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS quizzes (
    id INTEGER PRIMARY KEY,
    topic_id INTEGER NOT NULL REFERENCES topics(id),
    questions TEXT NOT NULL,
    type VARCHAR(15) NOT NULL CHECK (type IN ('multiple_choice', 'matching', 'calc')),
    answers TEXT NOT NULL,
    correct_answers TEXT NOT NULL
)
"#;

/// SQL to create the results table
/// `timestamp` falls back to the insertion time (UTC)
pub const CREATE_RESULTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS results (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES students(id),
    quiz_id INTEGER NOT NULL REFERENCES quizzes(id),
    score INTEGER NOT NULL,
    timestamp DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// All schema creation statements, referenced tables first
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_STUDENTS_TABLE,
        CREATE_TOPICS_TABLE,
        CREATE_QUIZZES_TABLE,
        CREATE_RESULTS_TABLE,
    ]
}
