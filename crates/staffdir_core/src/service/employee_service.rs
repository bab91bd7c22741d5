//! Employee use-case service.
//!
//! # Invariants
//! - Every persistence step goes through the wrapped `EmployeeStore`.
//! - Store errors are returned unchanged.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeStore, StoreResult};

/// Use-case wrapper constructed once and handed to callers.
pub struct EmployeeService<S: EmployeeStore> {
    store: S,
}

impl<S: EmployeeStore> EmployeeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the wrapped store for operations without a use-case wrapper.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persists a new employee and returns it with its assigned id.
    pub fn hire(
        &self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> StoreResult<Employee> {
        self.store.save(&Employee::new(first_name, last_name))
    }

    /// Replaces both names of an existing employee.
    ///
    /// Returns `None` when `id` is unknown; nothing is written in that case.
    pub fn rename(
        &self,
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> StoreResult<Option<Employee>> {
        let Some(mut employee) = self.store.find_by_id(id)? else {
            return Ok(None);
        };

        employee.first_name = first_name.into();
        employee.last_name = last_name.into();
        self.store.save(&employee).map(Some)
    }

    pub fn get(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        self.store.find_by_id(id)
    }

    pub fn list(&self) -> StoreResult<Vec<Employee>> {
        self.store.find_all()
    }

    /// Removes an employee; unknown ids are ignored.
    pub fn dismiss(&self, id: EmployeeId) -> StoreResult<()> {
        self.store.delete_by_id(id)
    }

    /// Case-sensitive last-name substring search.
    pub fn search_last_name(&self, text: &str) -> StoreResult<Vec<Employee>> {
        self.store.find_employees_by_last_name_containing(text)
    }

    pub fn headcount(&self) -> StoreResult<u64> {
        self.store.count()
    }
}
