#![forbid(unsafe_code)]

use super::StoreError;
use rusqlite::{Connection, params};

const SCHEMA_VERSION: &str = "v1";

const SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS meta (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS projects (
      project INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      created_at_ms INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS pairs (
      project INTEGER NOT NULL,
      left_bubble TEXT NOT NULL,
      right_bubble TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS bubbles (
      project INTEGER NOT NULL,
      bubble TEXT NOT NULL,
      state TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS pairs_unique ON pairs(project, left_bubble, right_bubble);
    CREATE UNIQUE INDEX IF NOT EXISTS bubbles_project_bubble ON bubbles(project, bubble);
"#;

pub(super) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}
