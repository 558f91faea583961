//! Student roster use-case service.
//!
//! # Responsibility
//! - Turn form submissions into validated repository mutations.
//! - Carry edit-mode state as an explicit `FormMode` value.
//! - Dispatch row actions keyed by record id.
//!
//! # Invariants
//! - Nothing reaches the repository before all four fields validate.
//! - A successful submit always returns `FormMode::Idle`.
//! - Service layer remains storage-agnostic.

use crate::model::student::{Student, StudentId, StudentInput, ValidationErrors};
use crate::repo::student_repo::{RepoError, RepoResult, StudentRepository};
use crate::view::{render, RosterView, RowAction};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Form state: registering a new record or editing an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Idle,
    /// Editing the record currently stored under this id.
    Editing(StudentId),
}

impl FormMode {
    /// Submit button label for this mode.
    pub fn submit_label(&self) -> &'static str {
        match self {
            Self::Idle => "Register Student",
            Self::Editing(_) => "Update Student",
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

/// Submit failure surfaced to the form.
#[derive(Debug)]
pub enum SubmitError {
    /// One or more fields failed validation.
    Validation(ValidationErrors),
    /// Another record already uses the submitted id.
    DuplicateId(StudentId),
    /// The record being edited no longer exists.
    NotFound(StudentId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl SubmitError {
    /// Blocking message for duplicate/not-found failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::DuplicateId(_) => "Student ID already exists!".to_string(),
            Self::NotFound(id) => format!("Student {id} no longer exists."),
            Self::Repo(err) => err.to_string(),
        }
    }
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "student id already exists: {id}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationErrors> for SubmitError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for SubmitError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateId(id) => Self::DuplicateId(id),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Result of dispatching one row action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Form switched to edit mode and is populated with the record.
    Editing {
        mode: FormMode,
        input: StudentInput,
    },
    /// Delete ran; `removed` tells whether a record matched.
    Deleted { removed: bool },
}

/// Roster service facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns all records in insertion order.
    pub fn list(&self) -> RepoResult<Vec<Student>> {
        self.repo.list()
    }

    /// Renders the current list into table rows.
    pub fn render(&self) -> RepoResult<RosterView> {
        Ok(render(&self.repo.list()?))
    }

    /// Gets one record by id.
    pub fn get(&self, id: &str) -> RepoResult<Option<Student>> {
        self.repo.get(id)
    }

    /// Submits the form in the given mode.
    ///
    /// # Contract
    /// - `Idle` adds a new record; `Editing(target)` replaces `target`.
    /// - Returns the next mode (`Idle`) on success.
    /// - On error the caller keeps `mode` and re-presents the form.
    pub fn submit(
        &mut self,
        mode: &FormMode,
        input: &StudentInput,
    ) -> Result<FormMode, SubmitError> {
        let student = input.validate()?;
        match mode {
            FormMode::Idle => self.repo.add(&student)?,
            FormMode::Editing(target_id) => self.repo.update(target_id, &student)?,
        }
        debug!(
            "event=form_submit module=service status=ok editing={} id={}",
            mode.is_editing(),
            student.id
        );
        Ok(FormMode::Idle)
    }

    /// Loads a record into the form and switches to edit mode.
    pub fn begin_edit(&self, id: &str) -> Result<(FormMode, StudentInput), SubmitError> {
        let student = self
            .repo
            .get(id)?
            .ok_or_else(|| SubmitError::NotFound(id.to_string()))?;
        Ok((
            FormMode::Editing(student.id.clone()),
            StudentInput::from(&student),
        ))
    }

    /// Leaves edit mode without saving.
    pub fn cancel_edit(&self) -> FormMode {
        FormMode::Idle
    }

    /// Deletes a record by id; returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> RepoResult<bool> {
        self.repo.delete(id)
    }

    /// Dispatches a row action by record id.
    pub fn dispatch(&mut self, action: &RowAction) -> Result<RowOutcome, SubmitError> {
        debug!(
            "event=row_action module=service action={} id={}",
            action.label().to_ascii_lowercase(),
            action.student_id()
        );
        match action {
            RowAction::Edit(id) => {
                let (mode, input) = self.begin_edit(id)?;
                Ok(RowOutcome::Editing { mode, input })
            }
            RowAction::Delete(id) => Ok(RowOutcome::Deleted {
                removed: self.delete(id)?,
            }),
        }
    }
}
