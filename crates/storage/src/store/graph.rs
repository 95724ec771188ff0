#![forbid(unsafe_code)]

use super::bubbles::list_bubble_rows;
use super::pairs::list_pairs;
use super::projects::project_row;
use super::{ProjectRow, SqliteStore, StoreError};
use bubbles_core::graph::ProjectGraph;
use bubbles_core::ids::ProjectId;

/// Project row plus its reconciled graph, read in one transaction.
#[derive(Clone, Debug)]
pub struct ProjectSnapshot {
    pub project: ProjectRow,
    pub graph: ProjectGraph,
}

impl SqliteStore {
    pub fn project_graph(&mut self, id: ProjectId) -> Result<ProjectSnapshot, StoreError> {
        let tx = self.conn.transaction()?;
        let project = project_row(&tx, id)?;
        let pairs = list_pairs(&tx, id)?;
        let rows = list_bubble_rows(&tx, id)?;
        tx.commit()?;

        Ok(ProjectSnapshot {
            project,
            graph: ProjectGraph::reconcile(pairs, rows),
        })
    }
}
