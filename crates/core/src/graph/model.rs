#![forbid(unsafe_code)]

use super::{BubbleRow, BubbleState, Pair};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One project's pairs reconciled with its bubble states.
///
/// Known activities are derived from the pairs on every build and never
/// stored on their own. State rows for names that no pair mentions are
/// dropped here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectGraph {
    pairs: Vec<Pair>,
    styled: BTreeMap<String, BubbleState>,
    unstyled: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    pub name: String,
    pub state: Option<BubbleState>,
}

impl ProjectGraph {
    pub fn reconcile(
        pairs: impl IntoIterator<Item = Pair>,
        rows: impl IntoIterator<Item = BubbleRow>,
    ) -> Self {
        let mut unstyled = BTreeSet::new();
        let mut pairs = pairs
            .into_iter()
            .inspect(|pair| {
                unstyled.insert(pair.left.clone());
                unstyled.insert(pair.right.clone());
            })
            .collect::<Vec<_>>();
        pairs.sort();
        pairs.dedup();

        let mut styled = BTreeMap::new();
        for row in rows {
            if unstyled.remove(&row.bubble) {
                styled.insert(row.bubble, row.state);
            }
        }

        Self {
            pairs,
            styled,
            unstyled,
        }
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn is_known(&self, activity: &str) -> bool {
        self.styled.contains_key(activity) || self.unstyled.contains(activity)
    }

    /// Sorted union of every pair endpoint.
    pub fn known_activities(&self) -> Vec<&str> {
        let mut out = self
            .styled
            .keys()
            .chain(self.unstyled.iter())
            .map(String::as_str)
            .collect::<Vec<_>>();
        out.sort_unstable();
        out
    }

    /// Known activities that carry a persisted state, sorted by name.
    pub fn styled(&self) -> impl Iterator<Item = (&str, BubbleState)> {
        self.styled.iter().map(|(name, state)| (name.as_str(), *state))
    }

    /// Known activities with no persisted state, sorted by name.
    pub fn unstyled(&self) -> impl Iterator<Item = &str> {
        self.unstyled.iter().map(String::as_str)
    }

    pub fn state_of(&self, activity: &str) -> Option<BubbleState> {
        self.styled.get(activity).copied()
    }

    pub fn activities(&self) -> Vec<ActivityView> {
        self.known_activities()
            .into_iter()
            .map(|name| ActivityView {
                name: name.to_string(),
                state: self.state_of(name),
            })
            .collect()
    }
}
