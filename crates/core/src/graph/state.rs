#![forbid(unsafe_code)]

use serde::Serialize;

/// Lifecycle of a bubble. Absence of a persisted row means "unstyled", which
/// behaves like `Initial` except that the first flip lands on `Started`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleState {
    Initial,
    Started,
    Done,
    Aborted,
}

impl BubbleState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Started => "started",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Unrecognized persisted values collapse to `Initial`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "started" => Self::Started,
            "done" => Self::Done,
            "aborted" => Self::Aborted,
            _ => Self::Initial,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Initial => Self::Started,
            Self::Started => Self::Done,
            Self::Done => Self::Aborted,
            Self::Aborted => Self::Initial,
        }
    }

    /// Result of one flip given the persisted row, if any.
    pub fn flipped(current: Option<Self>) -> Self {
        match current {
            None => Self::Started,
            Some(state) => state.next(),
        }
    }

    pub fn fill_color(self) -> Option<&'static str> {
        match self {
            Self::Initial => None,
            Self::Started => Some("yellow"),
            Self::Done => Some("lightgreen"),
            Self::Aborted => Some("red"),
        }
    }
}

impl std::fmt::Display for BubbleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
