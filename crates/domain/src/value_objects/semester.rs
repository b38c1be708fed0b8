use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Ordinal semester in which a course is scheduled (1 = first semester).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Semester(i64);

impl Semester {
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::validation(format!(
                "Semester cannot be negative (got {})",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Semester {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Semester> for i64 {
    fn from(semester: Semester) -> i64 {
        semester.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_numerically() {
        assert!(Semester::new(1).unwrap() < Semester::new(2).unwrap());
        assert_eq!(Semester::new(3).unwrap(), Semester::new(3).unwrap());
    }

    #[test]
    fn rejects_negative_values() {
        assert!(Semester::new(-1).is_err());
        assert!(serde_json::from_str::<Semester>("-4").is_err());
    }
}
