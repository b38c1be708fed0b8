//! Relation entity - a typed directed edge between two curriculum nodes.

use crate::ids::{CourseId, RelationId};
use crate::value_objects::RelationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: RelationId,
    pub source: CourseId,
    pub target: CourseId,
    /// Raw relationship type from the graph.
    pub relation_type: String,
}

impl Relation {
    /// Known kind for this edge, if its type belongs to the closed set.
    pub fn kind(&self) -> Option<RelationKind> {
        RelationKind::from_graph_label(&self.relation_type)
    }
}

/// Request to link `target` from some source course with `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDraft {
    pub kind: RelationKind,
    pub target: CourseId,
}

impl RelationDraft {
    pub fn new(kind: RelationKind, target: CourseId) -> Self {
        Self { kind, target }
    }
}

/// Outcome of a conditional relation write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationWrite {
    Created(Relation),
    /// Retargeting onto the edge's current kind and target; nothing was written.
    Unchanged(Relation),
    /// An edge of the same kind already linked the pair; nothing was written.
    AlreadyExists,
}
