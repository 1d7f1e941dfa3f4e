//! Student records - table `students`

use crate::credential::HashedPassword;
use crate::Result;
use serde::Serialize;

/// A registered student.
///
/// `id` is 0 until the row has been stored.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all students (enforced by storage)
    pub email: String,
    #[serde(skip)]
    pub password: HashedPassword,
}

impl Student {
    /// Create a new student, hashing the plain-text password
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self> {
        Ok(Self {
            id: 0, // Set by DB
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: HashedPassword::new(password)?,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Student(id={}, first_name={}, last_name={})",
            self.id, self.first_name, self.last_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_student_hashes_password() {
        let student = Student::new("John", "Doe", "john.doe@example.com", "securepassword123").unwrap();
        assert_eq!(student.id, 0);
        assert_eq!(student.full_name(), "John Doe");
        assert!(student.password.verify("securepassword123"));
    }

    #[test]
    fn test_display_and_json_omit_password() {
        let student = Student::new("John", "Doe", "john.doe@example.com", "securepassword123").unwrap();
        assert_eq!(student.to_string(), "Student(id=0, first_name=John, last_name=Doe)");

        let json = serde_json::to_value(&student).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "john.doe@example.com");
    }
}
