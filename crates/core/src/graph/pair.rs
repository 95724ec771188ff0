#![forbid(unsafe_code)]

use crate::names::activity_name;
use serde::Serialize;

/// Directed precedence arc: `left` must happen before `right`.
///
/// Ordering is `left` then `right`, byte-wise, which is the display and
/// serialization order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pair {
    pub left: String,
    pub right: String,
}

impl Pair {
    /// Builds a pair from raw input, trimming both ends. Returns `None` when
    /// either endpoint is blank.
    pub fn new(left: &str, right: &str) -> Option<Self> {
        let left = activity_name(left)?;
        let right = activity_name(right)?;
        Some(Self {
            left: left.to_string(),
            right: right.to_string(),
        })
    }

    pub fn touches(&self, activity: &str) -> bool {
        self.left == activity || self.right == activity
    }
}

/// Expands a "left -> center -> right" submission into the pairs it implies,
/// in insertion order: `(center, right)` first, then `(left, center)`.
pub fn triple_pairs(left: &str, center: &str, right: &str) -> Vec<Pair> {
    [Pair::new(center, right), Pair::new(left, center)]
        .into_iter()
        .flatten()
        .collect()
}

/// Persisted state row as read back from storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BubbleRow {
    pub bubble: String,
    pub state: super::BubbleState,
}
