use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Free-text progress status recorded on a `UserCourse`.
///
/// Any non-empty label is accepted ("in-progress", "planned", ...). Only
/// [`ProgressStatus::COMPLETED`] counts towards prerequisite completion, and
/// the comparison is exact: "Completed" or "completed " do not qualify.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgressStatus(String);

impl ProgressStatus {
    pub const COMPLETED: &'static str = "completed";

    pub fn new(status: impl Into<String>) -> Result<Self, DomainError> {
        let status = status.into();
        if status.trim().is_empty() {
            return Err(DomainError::validation("Status cannot be empty"));
        }
        Ok(Self(status))
    }

    pub fn completed() -> Self {
        Self(Self::COMPLETED.to_string())
    }

    pub fn is_completed(&self) -> bool {
        self.0 == Self::COMPLETED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ProgressStatus {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ProgressStatus> for String {
    fn from(status: ProgressStatus) -> String {
        status.0
    }
}
