//! Core domain logic for the student roster.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use config::RosterConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{
    validate_student, FieldError, Student, StudentField, StudentId, StudentInput,
    ValidationErrors,
};
pub use repo::student_repo::{
    decode_students, encode_students, KvStudentRepository, RepoError, RepoResult,
    StudentRepository, STUDENTS_KEY,
};
pub use service::student_service::{FormMode, RowOutcome, StudentService, SubmitError};
pub use storage::{
    KeyValueStore, MemoryStore, SqliteKvStore, StorageError, StorageResult, SCHEMA_VERSION,
};
pub use view::{render, RosterView, RowAction, StudentRow};
