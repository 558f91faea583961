//! Declarative table projection of the student list.
//!
//! # Responsibility
//! - Map `list()` output to display rows with per-row actions.
//! - Derive table-level presentation flags.
//!
//! # Invariants
//! - Row order equals list order.
//! - Row actions are keyed by record id, never by row position.

use crate::model::student::{Student, StudentId};

/// Placeholder shown when the roster has no records.
pub const EMPTY_ROSTER_MESSAGE: &str = "No students registered yet";

/// Row count above which the table container scrolls.
pub const SCROLL_THRESHOLD: usize = 5;

/// Action attached to a rendered row, dispatched back by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowAction {
    Edit(StudentId),
    Delete(StudentId),
}

impl RowAction {
    pub fn student_id(&self) -> &str {
        match self {
            Self::Edit(id) | Self::Delete(id) => id.as_str(),
        }
    }

    /// Button label for this action.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit(_) => "Edit",
            Self::Delete(_) => "Delete",
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRow {
    pub name: String,
    pub id: StudentId,
    pub email: String,
    pub contact: String,
    pub actions: [RowAction; 2],
}

impl StudentRow {
    fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            id: student.id.clone(),
            email: student.email.clone(),
            contact: student.contact.clone(),
            actions: [
                RowAction::Edit(student.id.clone()),
                RowAction::Delete(student.id.clone()),
            ],
        }
    }

    /// Display cells in column order.
    pub fn cells(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.id.as_str(),
            self.email.as_str(),
            self.contact.as_str(),
        ]
    }
}

/// Rendered roster table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    pub rows: Vec<StudentRow>,
    /// Set only when `rows` is empty.
    pub empty_message: Option<&'static str>,
    pub scrollable: bool,
}

/// Column headers in display order.
pub const COLUMNS: [&str; 5] = ["Name", "Student ID", "Email", "Contact", "Actions"];

/// Builds the table projection for the given records.
pub fn render(students: &[Student]) -> RosterView {
    let rows = students
        .iter()
        .map(StudentRow::from_student)
        .collect::<Vec<_>>();
    let empty_message = rows.is_empty().then_some(EMPTY_ROSTER_MESSAGE);
    let scrollable = rows.len() > SCROLL_THRESHOLD;

    RosterView {
        rows,
        empty_message,
        scrollable,
    }
}

#[cfg(test)]
mod tests {
    use super::{render, RowAction, EMPTY_ROSTER_MESSAGE};
    use crate::model::student::Student;

    fn student(id: &str) -> Student {
        Student::new("Ann Lee", id, "a@b.com", "1234567890")
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let view = render(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.empty_message, Some(EMPTY_ROSTER_MESSAGE));
        assert!(!view.scrollable);
    }

    #[test]
    fn rows_keep_order_and_carry_id_keyed_actions() {
        let view = render(&[student("2"), student("1")]);
        assert_eq!(view.empty_message, None);
        assert_eq!(view.rows[0].id, "2");
        assert_eq!(view.rows[1].cells(), ["Ann Lee", "1", "a@b.com", "1234567890"]);
        assert_eq!(
            view.rows[1].actions,
            [RowAction::Edit("1".into()), RowAction::Delete("1".into())]
        );
        assert!(view.rows[1]
            .actions
            .iter()
            .all(|action| action.student_id() == "1"));
    }

    #[test]
    fn table_scrolls_only_above_five_rows() {
        let five = (1..=5).map(|i| student(&i.to_string())).collect::<Vec<_>>();
        assert!(!render(&five).scrollable);

        let six = (1..=6).map(|i| student(&i.to_string())).collect::<Vec<_>>();
        assert!(render(&six).scrollable);
    }
}
