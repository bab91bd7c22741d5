//! Repository layer: storage contracts and their SQLite implementations.
//!
//! # Responsibility
//! - Define the data access contract callers program against.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Absence is reported as `None` or a no-op, never as an error.
//! - Backend failures surface as `StorageError` without retries.

pub mod employee_repo;
