//! Student domain model and field validation.
//!
//! # Responsibility
//! - Define the canonical student record persisted by the roster.
//! - Validate raw form input field by field.
//!
//! # Invariants
//! - `id` is the unique key of a record inside one roster.
//! - Validation checks every field independently and reports all failures.
//! - Values are trimmed before validation; the trimmed values are stored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

// `\d` in `regex` matches any Unicode digit, so digit classes are spelled out.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid name regex"));
static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid id regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid contact regex"));

/// Unique key of a student record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type StudentId = String;

/// Canonical student record.
///
/// Serialized with exactly the keys `name`, `id`, `email`, `contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub id: StudentId,
    pub email: String,
    pub contact: String,
}

impl Student {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            email: email.into(),
            contact: contact.into(),
        }
    }
}

/// Raw form input as submitted by the UI layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentInput {
    pub name: String,
    pub id: String,
    pub email: String,
    pub contact: String,
}

impl StudentInput {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            email: email.into(),
            contact: contact.into(),
        }
    }

    /// Validates the trimmed fields and returns the record to store.
    ///
    /// # Errors
    /// - Returns every failing field, not only the first one.
    pub fn validate(&self) -> Result<Student, ValidationErrors> {
        let student = self.normalized();
        validate_student(&student)?;
        Ok(student)
    }

    /// Returns the input with surrounding whitespace removed from every field.
    pub fn normalized(&self) -> Student {
        Student::new(
            self.name.trim(),
            self.id.trim(),
            self.email.trim(),
            self.contact.trim(),
        )
    }
}

impl From<&Student> for StudentInput {
    /// Populates form input from a stored record (edit flow).
    fn from(value: &Student) -> Self {
        Self::new(
            value.name.as_str(),
            value.id.as_str(),
            value.email.as_str(),
            value.contact.as_str(),
        )
    }
}

/// Form field of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StudentField {
    Name,
    Id,
    Email,
    Contact,
}

impl StudentField {
    /// Stable field key, matching the serialized record keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
            Self::Email => "email",
            Self::Contact => "contact",
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldError {
    InvalidName,
    InvalidId,
    InvalidEmail,
    InvalidContact,
}

impl FieldError {
    /// Field that failed validation.
    pub fn field(self) -> StudentField {
        match self {
            Self::InvalidName => StudentField::Name,
            Self::InvalidId => StudentField::Id,
            Self::InvalidEmail => StudentField::Email,
            Self::InvalidContact => StudentField::Contact,
        }
    }

    /// User-facing message shown next to the failing field.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidName => "Name should contain only letters and spaces.",
            Self::InvalidId => "Student ID should contain only numbers.",
            Self::InvalidEmail => "Please enter a valid email address.",
            Self::InvalidContact => "Contact number should be exactly 10 digits.",
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field().as_str(), self.message())
    }
}

impl Error for FieldError {}

/// Non-empty set of field errors from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeSet<FieldError>,
}

impl ValidationErrors {
    /// Returns the failing fields in declaration order.
    pub fn errors(&self) -> &BTreeSet<FieldError> {
        &self.errors
    }

    pub fn contains(&self, error: FieldError) -> bool {
        self.errors.contains(&error)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns whether the given field failed.
    pub fn has_field(&self, field: StudentField) -> bool {
        self.errors.iter().any(|error| error.field() == field)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "invalid student input: {}", messages.join("; "))
    }
}

impl Error for ValidationErrors {}

/// Validates all four fields of a record.
///
/// Fields are checked as given; callers trimming raw input should go through
/// [`StudentInput::validate`].
pub fn validate_student(student: &Student) -> Result<(), ValidationErrors> {
    let mut errors = BTreeSet::new();

    if !NAME_RE.is_match(&student.name) {
        errors.insert(FieldError::InvalidName);
    }
    if !ID_RE.is_match(&student.id) {
        errors.insert(FieldError::InvalidId);
    }
    if !EMAIL_RE.is_match(&student.email) {
        errors.insert(FieldError::InvalidEmail);
    }
    if !CONTACT_RE.is_match(&student.contact) {
        errors.insert(FieldError::InvalidContact);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_student, FieldError, Student, StudentField, StudentInput};

    fn valid_input() -> StudentInput {
        StudentInput::new("Ann Lee", "101", "a@b.com", "1234567890")
    }

    #[test]
    fn valid_input_passes_and_is_trimmed() {
        let input = StudentInput::new("  Ann Lee ", " 101", "a@b.com ", "1234567890\n");
        let student = input.validate().expect("input should be valid");
        assert_eq!(
            student,
            Student::new("Ann Lee", "101", "a@b.com", "1234567890")
        );
    }

    #[test]
    fn name_with_digits_is_rejected() {
        let mut input = valid_input();
        input.name = "John123".to_string();
        let errors = input.validate().expect_err("digits in name must fail");
        assert!(errors.contains(FieldError::InvalidName));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn short_contact_is_rejected() {
        let mut input = valid_input();
        input.contact = "12345".to_string();
        let errors = input.validate().expect_err("short contact must fail");
        assert!(errors.contains(FieldError::InvalidContact));
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        let mut input = valid_input();
        input.email = "a@b".to_string();
        let errors = input.validate().expect_err("a@b must fail");
        assert!(errors.contains(FieldError::InvalidEmail));
    }

    #[test]
    fn non_ascii_digits_are_rejected_for_id_and_contact() {
        let mut input = valid_input();
        input.id = "١٢٣".to_string();
        input.contact = "١٢٣٤٥٦٧٨٩٠".to_string();
        let errors = input.validate().expect_err("arabic-indic digits must fail");
        assert!(errors.contains(FieldError::InvalidId));
        assert!(errors.contains(FieldError::InvalidContact));
    }

    #[test]
    fn all_fields_are_checked_independently() {
        let errors = StudentInput::default()
            .validate()
            .expect_err("empty input must fail");
        assert_eq!(errors.len(), 4);
        for field in [
            StudentField::Name,
            StudentField::Id,
            StudentField::Email,
            StudentField::Contact,
        ] {
            assert!(errors.has_field(field), "{} should fail", field.as_str());
        }
    }

    #[test]
    fn whitespace_only_fields_count_as_empty() {
        let input = StudentInput::new("   ", " ", "a@b.com", "1234567890");
        let errors = input.validate().expect_err("blank name/id must fail");
        assert!(errors.contains(FieldError::InvalidName));
        assert!(errors.contains(FieldError::InvalidId));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn validate_student_does_not_trim() {
        let student = Student::new("Ann", " 7", "a@b.com", "1234567890");
        let errors = validate_student(&student).expect_err("padded id must fail");
        assert!(errors.contains(FieldError::InvalidId));
    }

    #[test]
    fn display_lists_every_failing_field() {
        let errors = StudentInput::new("Ann", "x", "a@b.com", "1")
            .validate()
            .expect_err("id and contact must fail");
        let message = errors.to_string();
        assert!(message.contains("id:"));
        assert!(message.contains("contact:"));
        assert!(!message.contains("name:"));
    }
}
