//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into form-level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod student_service;
