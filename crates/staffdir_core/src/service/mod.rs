//! Use-case services over the repository layer.
//!
//! # Responsibility
//! - Turn caller intents into store calls.
//! - Keep CLI and other front ends independent of SQL details.

pub mod employee_service;
