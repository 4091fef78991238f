//! In-memory SQLite pool carrying the `employees` schema, for tests.

use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

use crate::{DbPool, DbResult, EmployeeStore};

// AUTOINCREMENT keeps SQLite from handing out a deleted row's id again.
const EMPLOYEES_TABLE: &str = r#"
CREATE TABLE employees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL
);
"#;

pub async fn sqlite_pool() -> DbResult<DbPool> {
    let pool = Database::connect("sqlite::memory:").await?;
    pool.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        EMPLOYEES_TABLE.to_string(),
    ))
    .await?;
    Ok(pool)
}

pub async fn sqlite_store() -> DbResult<EmployeeStore> {
    Ok(EmployeeStore::new(sqlite_pool().await?))
}
