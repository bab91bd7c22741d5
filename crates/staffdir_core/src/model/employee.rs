//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted employee record and its identity type.
//! - Provide the textual and wire representations used by callers.
//!
//! # Invariants
//! - `id` is `None` until the record is first saved.
//! - Once assigned, `id` never changes for the lifetime of the record.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier for an employee row.
pub type EmployeeId = i64;

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// `None` before the first save.
    pub id: Option<EmployeeId>,
    pub first_name: String,
    /// Target of substring search.
    pub last_name: String,
}

impl Employee {
    /// Creates an unsaved employee.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns whether this record has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Employee[id={id}, ")?,
            None => write!(f, "Employee[id=null, ")?,
        }
        write!(
            f,
            "firstName='{}', lastName='{}']",
            self.first_name, self.last_name
        )
    }
}
