//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the canonical record shape shared by store, service and CLI.
//!
//! # Invariants
//! - Identity is assigned by storage, never by callers.
//! - Deletion is a hard delete; ids are not recycled afterwards.

pub mod employee;
