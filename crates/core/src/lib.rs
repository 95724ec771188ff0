#![forbid(unsafe_code)]

pub mod dot;
pub mod graph;

pub mod ids {
    use serde::Serialize;

    /// Row id of a project. Every pair and bubble state is scoped by one.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
    #[serde(transparent)]
    pub struct ProjectId(i64);

    impl ProjectId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, ProjectIdError> {
            if value <= 0 {
                return Err(ProjectIdError::NotPositive);
            }
            Ok(Self(value))
        }

        pub fn parse(value: &str) -> Result<Self, ProjectIdError> {
            let value = value.trim();
            if value.is_empty() {
                return Err(ProjectIdError::Empty);
            }
            let raw = value
                .parse::<i64>()
                .map_err(|_| ProjectIdError::NotANumber)?;
            Self::try_new(raw)
        }
    }

    impl std::fmt::Display for ProjectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum ProjectIdError {
        Empty,
        NotANumber,
        NotPositive,
    }

    impl ProjectIdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::Empty => "pID must not be empty",
                Self::NotANumber => "pID must be an integer",
                Self::NotPositive => "pID must be positive",
            }
        }
    }

}

pub mod names {
    /// Trims an activity name; `None` when nothing is left.
    pub fn activity_name(raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed)
    }

}
