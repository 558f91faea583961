//! Student repository contracts and key-value implementation.
//!
//! # Responsibility
//! - Provide list/add/update/delete over the student list.
//! - Own the JSON blob encoding stored under the `students` key.
//!
//! # Invariants
//! - At most one record per `id` is ever persisted.
//! - Every operation re-reads the blob; every mutation rewrites it whole.
//! - List order is insertion order; updates keep position.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::student::{Student, StudentId};
use crate::storage::{KeyValueStore, StorageError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized student list.
pub const STUDENTS_KEY: &str = "students";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Another record already uses this id.
    DuplicateId(StudentId),
    /// No record has this id.
    NotFound(StudentId),
    Storage(StorageError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "student id already exists: {id}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::DuplicateId(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Repository interface for the student record list.
pub trait StudentRepository {
    /// Returns all records in insertion order.
    fn list(&self) -> RepoResult<Vec<Student>>;
    /// Returns the record with `id`, if any.
    fn get(&self, id: &str) -> RepoResult<Option<Student>>;
    /// Appends a record whose id is not used yet.
    fn add(&mut self, candidate: &Student) -> RepoResult<()>;
    /// Replaces the record `target_id` wholesale, keeping its position.
    fn update(&mut self, target_id: &str, candidate: &Student) -> RepoResult<()>;
    /// Removes the record `id`; returns whether one was removed.
    fn delete(&mut self, id: &str) -> RepoResult<bool>;
}

/// Student repository persisting the full list as one JSON blob.
pub struct KvStudentRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvStudentRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Gives back the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn load(&self) -> RepoResult<Vec<Student>> {
        match self.store.get(STUDENTS_KEY)? {
            Some(blob) => decode_students(&blob),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, students: &[Student]) -> RepoResult<()> {
        let blob = encode_students(students)?;
        self.store.set(STUDENTS_KEY, &blob)?;
        Ok(())
    }
}

impl<S: KeyValueStore> StudentRepository for KvStudentRepository<S> {
    fn list(&self) -> RepoResult<Vec<Student>> {
        self.load()
    }

    fn get(&self, id: &str) -> RepoResult<Option<Student>> {
        Ok(self.load()?.into_iter().find(|student| student.id == id))
    }

    fn add(&mut self, candidate: &Student) -> RepoResult<()> {
        let mut students = self.load()?;
        if students.iter().any(|student| student.id == candidate.id) {
            warn!(
                "event=student_add module=repo status=rejected error_code=duplicate_id id={}",
                candidate.id
            );
            return Err(RepoError::DuplicateId(candidate.id.clone()));
        }

        students.push(candidate.clone());
        self.save(&students)?;
        info!(
            "event=student_add module=repo status=ok id={} total={}",
            candidate.id,
            students.len()
        );
        Ok(())
    }

    fn update(&mut self, target_id: &str, candidate: &Student) -> RepoResult<()> {
        let mut students = self.load()?;
        let Some(position) = students.iter().position(|student| student.id == target_id) else {
            warn!(
                "event=student_update module=repo status=rejected error_code=not_found id={}",
                target_id
            );
            return Err(RepoError::NotFound(target_id.to_string()));
        };

        // The record being edited keeping its own id is not a collision.
        if candidate.id != target_id && students.iter().any(|student| student.id == candidate.id)
        {
            warn!(
                "event=student_update module=repo status=rejected error_code=duplicate_id id={} new_id={}",
                target_id, candidate.id
            );
            return Err(RepoError::DuplicateId(candidate.id.clone()));
        }

        students[position] = candidate.clone();
        self.save(&students)?;
        info!(
            "event=student_update module=repo status=ok id={} new_id={}",
            target_id, candidate.id
        );
        Ok(())
    }

    fn delete(&mut self, id: &str) -> RepoResult<bool> {
        let mut students = self.load()?;
        let before = students.len();
        students.retain(|student| student.id != id);
        let removed = students.len() != before;

        self.save(&students)?;
        info!(
            "event=student_delete module=repo status=ok id={} removed={}",
            id, removed
        );
        Ok(removed)
    }
}

/// Serializes the list into the stored blob format.
pub fn encode_students(students: &[Student]) -> RepoResult<String> {
    serde_json::to_string(students)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode student list: {err}")))
}

/// Parses a stored blob back into the list.
///
/// An empty blob reads as an empty list.
pub fn decode_students(blob: &str) -> RepoResult<Vec<Student>> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }

    let students: Vec<Student> = serde_json::from_str(blob).map_err(|err| {
        RepoError::InvalidData(format!("cannot decode `{STUDENTS_KEY}` blob: {err}"))
    })?;

    let mut seen = HashSet::with_capacity(students.len());
    for student in &students {
        if !seen.insert(student.id.as_str()) {
            return Err(RepoError::InvalidData(format!(
                "duplicate id `{}` in `{STUDENTS_KEY}` blob",
                student.id
            )));
        }
    }

    Ok(students)
}
