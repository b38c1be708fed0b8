//! Closed set of relationship kinds between curriculum nodes.
//!
//! The graph was imported from an OWL ontology, so relationship types carry
//! their namespace prefixes (`ns0__tienQuyet`, `rdfs__subClassOf`, ...).
//! Relationship types cannot be passed as Cypher parameters, which means the
//! label returned by [`RelationKind::graph_label`] is the only text that may be
//! interpolated into a query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Semester placement rule attached to a relation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemesterConstraint {
    /// Source must sit in an earlier semester than the target.
    StrictlyEarlier,
    /// Source and target must sit in the same semester.
    SameSemester,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationKind {
    /// `ns0__tienQuyet`: source must be completed before the target.
    Prerequisite,
    /// `ns0__songHanh`: taken alongside the target.
    Parallel,
    /// `ns0__hocTruoc`: studied before the target.
    PriorTo,
    /// `ns0__coNoiDung`
    HasContent,
    /// `ns0__noiDungCua`
    ContentOf,
    /// `ns0__thuocChuyenNganh`
    Specialization,
    /// `rdfs__subClassOf`
    SubClassOf,
    /// `rdf__type`
    TypeOf,
}

impl RelationKind {
    pub const ALL: [RelationKind; 8] = [
        RelationKind::Prerequisite,
        RelationKind::Parallel,
        RelationKind::PriorTo,
        RelationKind::HasContent,
        RelationKind::ContentOf,
        RelationKind::Specialization,
        RelationKind::SubClassOf,
        RelationKind::TypeOf,
    ];

    /// Kinds that carry a semester rule, in the order checks are reported.
    pub const CONSTRAINED: [RelationKind; 3] = [
        RelationKind::PriorTo,
        RelationKind::Parallel,
        RelationKind::Prerequisite,
    ];

    /// Relationship type as stored in Neo4j.
    pub fn graph_label(self) -> &'static str {
        match self {
            RelationKind::Prerequisite => "ns0__tienQuyet",
            RelationKind::Parallel => "ns0__songHanh",
            RelationKind::PriorTo => "ns0__hocTruoc",
            RelationKind::HasContent => "ns0__coNoiDung",
            RelationKind::ContentOf => "ns0__noiDungCua",
            RelationKind::Specialization => "ns0__thuocChuyenNganh",
            RelationKind::SubClassOf => "rdfs__subClassOf",
            RelationKind::TypeOf => "rdf__type",
        }
    }

    /// Name used in the JSON API.
    pub fn api_name(self) -> &'static str {
        match self {
            RelationKind::Prerequisite => "prerequisite",
            RelationKind::Parallel => "parallel",
            RelationKind::PriorTo => "priorTo",
            RelationKind::HasContent => "hasContent",
            RelationKind::ContentOf => "contentOf",
            RelationKind::Specialization => "specialization",
            RelationKind::SubClassOf => "subClassOf",
            RelationKind::TypeOf => "typeOf",
        }
    }

    pub fn semester_constraint(self) -> Option<SemesterConstraint> {
        match self {
            RelationKind::Prerequisite | RelationKind::PriorTo => {
                Some(SemesterConstraint::StrictlyEarlier)
            }
            RelationKind::Parallel => Some(SemesterConstraint::SameSemester),
            _ => None,
        }
    }

    pub fn is_constrained(self) -> bool {
        self.semester_constraint().is_some()
    }

    /// Look up a kind by its exact Neo4j relationship type.
    pub fn from_graph_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.graph_label() == label)
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for RelationKind {
    type Err = DomainError;

    /// Accepts the graph label verbatim or the API name in any case, with
    /// `_`, `-` and spaces ignored (`prior_to`, `Prior To`, `priorTo`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(kind) = Self::from_graph_label(trimmed) {
            return Ok(kind);
        }

        let normalized = trimmed.to_lowercase().replace(['_', '-', ' '], "");
        match normalized.as_str() {
            "prerequisite" => Ok(Self::Prerequisite),
            "parallel" => Ok(Self::Parallel),
            "priorto" | "prior" => Ok(Self::PriorTo),
            "hascontent" => Ok(Self::HasContent),
            "contentof" => Ok(Self::ContentOf),
            "specialization" => Ok(Self::Specialization),
            "subclassof" => Ok(Self::SubClassOf),
            "typeof" | "type" => Ok(Self::TypeOf),
            _ => Err(DomainError::parse(format!("Unknown relation kind: {}", s))),
        }
    }
}
