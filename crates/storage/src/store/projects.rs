#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, now_ms, project_exists_tx};
use bubbles_core::ids::ProjectId;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRow {
    pub id: ProjectId,
    pub name: String,
    pub created_at_ms: i64,
}

pub(super) fn project_row(conn: &Connection, id: ProjectId) -> Result<ProjectRow, StoreError> {
    let row = conn
        .query_row(
            "SELECT name, created_at_ms FROM projects WHERE project = ?1",
            params![id.get()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;
    let Some((name, created_at_ms)) = row else {
        return Err(StoreError::UnknownProject(id));
    };
    Ok(ProjectRow {
        id,
        name,
        created_at_ms,
    })
}

fn project_id_from_row(raw: i64) -> Result<ProjectId, StoreError> {
    ProjectId::try_new(raw)
        .map_err(|_| StoreError::InvalidInput("stored project id is not positive"))
}

impl SqliteStore {
    pub fn create_project(&mut self, name: &str) -> Result<ProjectRow, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("project name must not be empty"));
        }

        let created_at_ms = now_ms();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO projects(name, created_at_ms) VALUES (?1, ?2)",
            params![name, created_at_ms],
        )?;
        let id = project_id_from_row(tx.last_insert_rowid())?;
        tx.commit()?;

        Ok(ProjectRow {
            id,
            name: name.to_string(),
            created_at_ms,
        })
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT project, name, created_at_ms FROM projects ORDER BY project ASC")?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(ProjectRow {
                id: project_id_from_row(row.get(0)?)?,
                name: row.get(1)?,
                created_at_ms: row.get(2)?,
            });
        }
        Ok(out)
    }

    pub fn project(&self, id: ProjectId) -> Result<ProjectRow, StoreError> {
        project_row(&self.conn, id)
    }

    /// Drops the project together with all of its pairs and bubble states.
    /// Returns whether a project row existed.
    pub fn delete_project(&mut self, id: ProjectId) -> Result<bool, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existed = project_exists_tx(&tx, id)?;
        tx.execute("DELETE FROM pairs WHERE project = ?1", params![id.get()])?;
        tx.execute("DELETE FROM bubbles WHERE project = ?1", params![id.get()])?;
        tx.execute("DELETE FROM projects WHERE project = ?1", params![id.get()])?;
        tx.commit()?;
        Ok(existed)
    }
}
