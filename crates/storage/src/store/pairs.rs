#![forbid(unsafe_code)]

use super::{SqliteStore, StoreError, ensure_project_tx};
use bubbles_core::graph::{Pair, triple_pairs};
use bubbles_core::ids::ProjectId;
use bubbles_core::names::activity_name;
use rusqlite::{Connection, Transaction, TransactionBehavior, params};

/// Row counts touched by a rename.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    pub pairs_rewritten: usize,
    /// Pairs dropped because the renamed pair already existed.
    pub pairs_merged: usize,
    pub state_moved: bool,
}

impl SqliteStore {
    /// Inserts whichever of `(center, right)` and `(left, center)` have both
    /// ends present. Existing pairs are left alone. Returns how many rows were
    /// actually added.
    pub fn add_triple(
        &mut self,
        project: ProjectId,
        left: &str,
        center: &str,
        right: &str,
    ) -> Result<usize, StoreError> {
        let pairs = triple_pairs(left, center, right);
        if pairs.is_empty() {
            return Ok(0);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_project_tx(&tx, project)?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO pairs(project, left_bubble, right_bubble) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(project, left_bubble, right_bubble) DO NOTHING",
            )?;
            for pair in &pairs {
                inserted += stmt.execute(params![project.get(), pair.left, pair.right])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Deletes one pair. Missing pairs are not an error.
    pub fn remove_pair(
        &mut self,
        project: ProjectId,
        left: &str,
        right: &str,
    ) -> Result<bool, StoreError> {
        let Some(pair) = Pair::new(left, right) else {
            return Ok(false);
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_project_tx(&tx, project)?;
        let removed = tx.execute(
            "DELETE FROM pairs WHERE project = ?1 AND left_bubble = ?2 AND right_bubble = ?3",
            params![project.get(), pair.left, pair.right],
        )?;
        tx.commit()?;
        Ok(removed > 0)
    }

    /// Deletes every pair touching `activity`. Its state row, if any, stays and
    /// is ignored on read until the name shows up in a pair again.
    pub fn remove_activity(
        &mut self,
        project: ProjectId,
        activity: &str,
    ) -> Result<usize, StoreError> {
        let Some(activity) = activity_name(activity) else {
            return Ok(0);
        };

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_project_tx(&tx, project)?;
        let removed = tx.execute(
            "DELETE FROM pairs WHERE project = ?1 AND (left_bubble = ?2 OR right_bubble = ?2)",
            params![project.get(), activity],
        )?;
        tx.commit()?;
        Ok(removed)
    }

    /// Renames an activity across pairs and its state row in one transaction.
    ///
    /// Collisions merge: a pair whose renamed form already exists is dropped,
    /// and if `to` already owns a state row that row wins. Afterwards nothing
    /// references `from`.
    pub fn rename_activity(
        &mut self,
        project: ProjectId,
        from: &str,
        to: &str,
    ) -> Result<RenameOutcome, StoreError> {
        let from = activity_name(from)
            .ok_or(StoreError::InvalidInput("rename from must not be empty"))?;
        let to =
            activity_name(to).ok_or(StoreError::InvalidInput("rename to must not be empty"))?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        ensure_project_tx(&tx, project)?;
        if from == to {
            return Ok(RenameOutcome::default());
        }

        let mut outcome = RenameOutcome::default();
        for column in ["left_bubble", "right_bubble"] {
            let (rewritten, merged) = rename_pair_column_tx(&tx, project, column, from, to)?;
            outcome.pairs_rewritten += rewritten;
            outcome.pairs_merged += merged;
        }

        let moved = tx.execute(
            "UPDATE OR IGNORE bubbles SET bubble = ?3 WHERE project = ?1 AND bubble = ?2",
            params![project.get(), from, to],
        )?;
        tx.execute(
            "DELETE FROM bubbles WHERE project = ?1 AND bubble = ?2",
            params![project.get(), from],
        )?;
        outcome.state_moved = moved > 0;

        tx.commit()?;
        Ok(outcome)
    }

    pub fn list_pairs(&self, project: ProjectId) -> Result<Vec<Pair>, StoreError> {
        list_pairs(&self.conn, project)
    }
}

pub(super) fn list_pairs(conn: &Connection, project: ProjectId) -> Result<Vec<Pair>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT left_bubble, right_bubble FROM pairs WHERE project = ?1 \
         ORDER BY left_bubble ASC, right_bubble ASC",
    )?;
    let rows = stmt.query_map(params![project.get()], |row| {
        Ok(Pair {
            left: row.get(0)?,
            right: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

// `column` is one of two literals chosen above, never caller input.
fn rename_pair_column_tx(
    tx: &Transaction<'_>,
    project: ProjectId,
    column: &str,
    from: &str,
    to: &str,
) -> Result<(usize, usize), StoreError> {
    let rewritten = tx.execute(
        &format!("UPDATE OR IGNORE pairs SET {column} = ?3 WHERE project = ?1 AND {column} = ?2"),
        params![project.get(), from, to],
    )?;
    let merged = tx.execute(
        &format!("DELETE FROM pairs WHERE project = ?1 AND {column} = ?2"),
        params![project.get(), from],
    )?;
    Ok((rewritten, merged))
}
