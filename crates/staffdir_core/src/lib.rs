//! Employee records store: CRUD plus last-name substring search on SQLite.
//!
//! Callers open a connection with [`db::open_db`], wrap it in a
//! [`SqliteEmployeeStore`] and pass that store (or an [`EmployeeService`]
//! built from it) to whatever needs employee data.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, MEMORY_PATH};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::employee::{Employee, EmployeeId};
pub use repo::employee_repo::{EmployeeStore, SqliteEmployeeStore, StorageError, StoreResult};
pub use service::employee_service::EmployeeService;
