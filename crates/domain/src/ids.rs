//! Opaque identifiers assigned by the graph store.
//!
//! Neo4j hands out `elementId` strings (e.g. `4:0b5c...:12`). They are stable
//! for the lifetime of a node or relationship but carry no meaning of their
//! own, so each entity gets a newtype around the raw string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a store-assigned id. Surrounding whitespace is dropped.
            pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(concat!($entity, " id cannot be empty")));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Graph nodes
define_id!(CourseId, "Course");
define_id!(UserId, "User");
define_id!(UserCourseId, "UserCourse");

// Graph relationships
define_id!(RelationId, "Relation");

// Ontology classes (non-course nodes reachable via subClassOf)
define_id!(ClassId, "Class");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let id = CourseId::new("  4:abc:12 ").unwrap();
        assert_eq!(id.as_str(), "4:abc:12");
    }

    #[test]
    fn rejects_blank_ids() {
        let err = RelationId::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
        assert!(err.to_string().contains("Relation id"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: UserId = "5:xyz:1".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"5:xyz:1\"");
        let back: UserId = serde_json::from_str("\"5:xyz:1\"").unwrap();
        assert_eq!(back, id);
    }
}
