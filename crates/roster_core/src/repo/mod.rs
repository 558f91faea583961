//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-list data access contract.
//! - Isolate blob encoding and storage details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateId`, `NotFound`) in
//!   addition to storage transport errors.

pub mod student_repo;
