//! Employee store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and last-name substring search over `employees`.
//! - Own id assignment: callers never choose ids.
//!
//! # Invariants
//! - `save` never writes a caller-supplied id; a stale id yields a fresh row.
//! - Ids come from `AUTOINCREMENT` and are not reused after deletion.
//! - Batch writes (`save_all`, `delete_all_by_id`) are all-or-nothing and
//!   nest inside a transaction the caller already holds.
//! - Last-name search is a case-sensitive substring match.

use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId};
use log::{debug, error};
use rusqlite::{params, params_from_iter, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, first_name, last_name FROM employees";
const BATCH_SAVEPOINT: &str = "employee_batch";
/// Stays well below SQLite's bound-parameter limit.
const ID_LOOKUP_CHUNK: usize = 500;

pub type StoreResult<T> = Result<T, StorageError>;

/// Error raised by every store operation.
///
/// Not-found is not an error: reads return `None` and deletes are no-ops.
#[derive(Debug)]
pub enum StorageError {
    /// Backend failure: connectivity, constraint violation, busy timeout.
    Db(DbError),
    /// Row could not be mapped back into an `Employee`.
    InvalidData(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data access contract for employee records.
///
/// Each call is a single blocking request against the backend. Isolation of
/// concurrent writers is left to the backend.
pub trait EmployeeStore {
    /// Inserts an unsaved record or updates a saved one.
    ///
    /// Returns the persisted record with `id` populated.
    fn save(&self, employee: &Employee) -> StoreResult<Employee>;

    /// Saves every record atomically, preserving input order.
    ///
    /// Runs inside a savepoint, so it joins a transaction the caller already
    /// holds on the same connection.
    fn save_all(&self, employees: &[Employee]) -> StoreResult<Vec<Employee>>;

    fn find_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>>;

    fn exists_by_id(&self, id: EmployeeId) -> StoreResult<bool>;

    /// Returns a snapshot of every record.
    fn find_all(&self) -> StoreResult<Vec<Employee>>;

    /// Returns the records for the ids that exist; unknown ids are skipped.
    fn find_all_by_id(&self, ids: &[EmployeeId]) -> StoreResult<Vec<Employee>>;

    fn count(&self) -> StoreResult<u64>;

    /// Removes the record if present. Idempotent.
    fn delete_by_id(&self, id: EmployeeId) -> StoreResult<()>;

    /// Removes a saved record; an unsaved one is a no-op.
    fn delete(&self, employee: &Employee) -> StoreResult<()> {
        match employee.id {
            Some(id) => self.delete_by_id(id),
            None => Ok(()),
        }
    }

    /// Removes every listed id atomically; joins an open caller transaction.
    fn delete_all_by_id(&self, ids: &[EmployeeId]) -> StoreResult<()>;

    fn delete_all(&self) -> StoreResult<()>;

    /// Returns records whose `last_name` contains `text`.
    ///
    /// Matching is case-sensitive. An empty `text` matches every record.
    fn find_employees_by_last_name_containing(&self, text: &str) -> StoreResult<Vec<Employee>>;
}

/// SQLite-backed employee store.
///
/// Borrows a connection opened by [`crate::db::open_db`]; the caller owns the
/// connection lifetime and can share it between stores.
pub struct SqliteEmployeeStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EmployeeStore for SqliteEmployeeStore<'_> {
    fn save(&self, employee: &Employee) -> StoreResult<Employee> {
        save_on(self.conn, employee)
    }

    fn save_all(&self, employees: &[Employee]) -> StoreResult<Vec<Employee>> {
        let saved = in_savepoint(self.conn, |conn| {
            employees
                .iter()
                .map(|employee| save_on(conn, employee))
                .collect::<StoreResult<Vec<_>>>()
        })?;

        debug!(
            "event=employee_save_all module=repo status=ok count={}",
            saved.len()
        );
        Ok(saved)
    }

    fn find_by_id(&self, id: EmployeeId) -> StoreResult<Option<Employee>> {
        let mut found = query_employees(
            self.conn,
            &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )?;
        Ok(found.pop())
    }

    fn exists_by_id(&self, id: EmployeeId) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_all(&self) -> StoreResult<Vec<Employee>> {
        query_employees(
            self.conn,
            &format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"),
            [],
        )
    }

    fn find_all_by_id(&self, ids: &[EmployeeId]) -> StoreResult<Vec<Employee>> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        // Ascending chunks of ascending ids keep the merged result ordered.
        let mut found = Vec::new();
        for chunk in unique.chunks(ID_LOOKUP_CHUNK) {
            let sql = format!(
                "{EMPLOYEE_SELECT_SQL} WHERE id IN ({}) ORDER BY id ASC;",
                placeholders(chunk.len())
            );
            found.extend(query_employees(self.conn, &sql, params_from_iter(chunk))?);
        }
        Ok(found)
    }

    fn count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM employees;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| StorageError::InvalidData(format!("negative row count `{count}`")))
    }

    fn delete_by_id(&self, id: EmployeeId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;

        debug!("event=employee_delete module=repo status=ok id={id} changed={changed}");
        Ok(())
    }

    fn delete_all_by_id(&self, ids: &[EmployeeId]) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let changed = in_savepoint(self.conn, |conn| {
            let mut stmt = conn.prepare("DELETE FROM employees WHERE id = ?1;")?;
            let mut changed = 0;
            for id in ids {
                changed += stmt.execute([id])?;
            }
            Ok(changed)
        })?;

        debug!(
            "event=employee_delete_all_by_id module=repo status=ok requested={} changed={changed}",
            ids.len()
        );
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        let changed = self.conn.execute("DELETE FROM employees;", [])?;

        debug!("event=employee_delete_all module=repo status=ok changed={changed}");
        Ok(())
    }

    fn find_employees_by_last_name_containing(&self, text: &str) -> StoreResult<Vec<Employee>> {
        // instr() compares bytes, unlike LIKE which folds ASCII case.
        query_employees(
            self.conn,
            &format!(
                "{EMPLOYEE_SELECT_SQL}
                 WHERE (?1 = '' OR instr(last_name, ?1) > 0)
                 ORDER BY id ASC;"
            ),
            [text],
        )
    }
}

fn save_on(conn: &Connection, employee: &Employee) -> StoreResult<Employee> {
    if let Some(id) = employee.id {
        let changed = conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2
             WHERE id = ?3;",
            params![employee.first_name, employee.last_name, id],
        )?;

        if changed > 0 {
            debug!("event=employee_save module=repo status=ok op=update id={id}");
            return Ok(employee.clone());
        }

        debug!("event=employee_save module=repo status=stale_id id={id}");
    }

    conn.execute(
        "INSERT INTO employees (first_name, last_name) VALUES (?1, ?2);",
        params![employee.first_name, employee.last_name],
    )?;
    let id = conn.last_insert_rowid();

    debug!("event=employee_save module=repo status=ok op=insert id={id}");
    Ok(Employee {
        id: Some(id),
        first_name: employee.first_name.clone(),
        last_name: employee.last_name.clone(),
    })
}

/// Runs `body` inside a savepoint so batches nest in a caller's transaction.
///
/// Outside a transaction the savepoint opens one and `RELEASE` commits it.
fn in_savepoint<T>(
    conn: &Connection,
    body: impl FnOnce(&Connection) -> StoreResult<T>,
) -> StoreResult<T> {
    conn.execute_batch(&format!("SAVEPOINT {BATCH_SAVEPOINT};"))?;

    match body(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {BATCH_SAVEPOINT};"))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = conn.execute_batch(&format!(
                "ROLLBACK TO {BATCH_SAVEPOINT}; RELEASE {BATCH_SAVEPOINT};"
            )) {
                error!(
                    "event=employee_batch_rollback module=repo status=error error={rollback_err}"
                );
            }
            Err(err)
        }
    }
}

fn query_employees<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> StoreResult<Vec<Employee>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut employees = Vec::new();

    while let Some(row) = rows.next()? {
        employees.push(parse_employee_row(row)?);
    }

    Ok(employees)
}

fn parse_employee_row(row: &Row<'_>) -> StoreResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    if id <= 0 {
        return Err(StorageError::InvalidData(format!(
            "invalid id value `{id}` in employees.id"
        )));
    }

    Ok(Employee {
        id: Some(id),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::placeholders;

    #[test]
    fn placeholders_are_comma_separated() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
