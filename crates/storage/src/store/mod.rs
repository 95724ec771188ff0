#![forbid(unsafe_code)]

mod bubbles;
mod error;
mod graph;
mod pairs;
mod projects;
mod schema;

pub use error::StoreError;
pub use graph::ProjectSnapshot;
pub use pairs::RenameOutcome;
pub use projects::ProjectRow;

use bubbles_core::ids::ProjectId;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE_NAME: &str = "bubbles.db";

/// Durable home of projects, pairs and bubble states.
///
/// Every mutating method runs as one SQLite transaction. Callers that share a
/// store across threads are expected to serialize access themselves.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )?;

        schema::install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(DB_FILE_NAME)
    }
}

fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}

fn project_exists_tx(tx: &Transaction<'_>, project: ProjectId) -> Result<bool, StoreError> {
    let found = tx
        .query_row(
            "SELECT 1 FROM projects WHERE project = ?1",
            params![project.get()],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn ensure_project_tx(tx: &Transaction<'_>, project: ProjectId) -> Result<(), StoreError> {
    if !project_exists_tx(tx, project)? {
        return Err(StoreError::UnknownProject(project));
    }
    Ok(())
}
