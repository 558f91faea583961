//! Domain model for the student roster.
//!
//! # Responsibility
//! - Define the canonical student record and its raw form input.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - Every record is identified by its `id` field.
//! - Validation is independent of storage.

pub mod student;
