#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, ensure_project_tx};
use bubbles_core::graph::{BubbleRow, BubbleState};
use bubbles_core::ids::ProjectId;
use bubbles_core::names::activity_name;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

impl SqliteStore {
    /// Advances the bubble one step along its cycle and returns the new state.
    /// A bubble with no row starts at `started`.
    pub fn flip_state(
        &mut self,
        project: ProjectId,
        bubble: &str,
    ) -> Result<BubbleState, StoreError> {
        let bubble =
            activity_name(bubble).ok_or(StoreError::InvalidInput("bubble must not be empty"))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_project_tx(&tx, project)?;

        let current = tx
            .query_row(
                "SELECT state FROM bubbles WHERE project = ?1 AND bubble = ?2",
                params![project.get(), bubble],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .map(|raw| BubbleState::parse_lenient(&raw));
        let next = BubbleState::flipped(current);

        tx.execute(
            r#"
            INSERT INTO bubbles(project, bubble, state) VALUES (?1, ?2, ?3)
            ON CONFLICT(project, bubble) DO UPDATE SET state = excluded.state
            "#,
            params![project.get(), bubble, next.as_str()],
        )?;
        tx.commit()?;
        Ok(next)
    }

    /// Raw state rows, orphans included.
    pub fn list_bubble_rows(&self, project: ProjectId) -> Result<Vec<BubbleRow>, StoreError> {
        list_bubble_rows(&self.conn, project)
    }
}

pub(super) fn list_bubble_rows(
    conn: &Connection,
    project: ProjectId,
) -> Result<Vec<BubbleRow>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT bubble, state FROM bubbles WHERE project = ?1 ORDER BY bubble ASC")?;
    let rows = stmt.query_map(params![project.get()], |row| {
        Ok(BubbleRow {
            bubble: row.get(0)?,
            state: BubbleState::parse_lenient(&row.get::<_, String>(1)?),
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
