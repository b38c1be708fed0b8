//! Course entity
//!
//! # Graph Shape
//!
//! Courses are instances of ontology classes that descend from the root class
//! labelled "Môn học". Property names keep the prefixes of the imported
//! ontology.
//!
//! ```cypher
//! (course:Resource)-[:rdf__type]->(class:Resource)-[:rdfs__subClassOf*]->(root:Resource {rdfs__label: 'Môn học'})
//! (course)-[:ns0__tienQuyet|ns0__songHanh|ns0__hocTruoc|...]->(other)
//! ```

use crate::error::DomainError;
use crate::ids::{CourseId, RelationId};
use crate::value_objects::Semester;

/// A course node as stored in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: CourseId,
    /// Course code (`ns0__maMonHoc`). Unique in practice, not enforced by the store.
    pub code: Option<String>,
    /// Display name (`rdfs__label`)
    pub label: Option<String>,
    /// Scheduled semester (`ns0__hocKy`). Imported data may omit it.
    pub semester: Option<Semester>,
    /// Elective flag (`ns0__laMonTuChon`)
    pub is_elective: bool,
    /// Credit count (`ns0__soTinChi`)
    pub credits: Option<i64>,
}

/// An outgoing edge from a course, as shown alongside the course.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationSummary {
    pub relation_id: RelationId,
    /// Raw relationship type from the graph (may be outside [`crate::RelationKind`]).
    pub relation_type: String,
    pub target_id: CourseId,
    pub target_label: String,
}

/// Course together with its labelled outgoing relations.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetails {
    pub course: Course,
    pub relations: Vec<RelationSummary>,
}

/// Catalogue entry: course, relations, and optionally one user's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub details: CourseDetails,
    pub course_status: Option<String>,
}

/// Minimal projection used when listing candidate targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub course_id: CourseId,
    pub code: Option<String>,
    pub label: Option<String>,
}

/// Input for creating a course.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub code: String,
    pub label: Option<String>,
    pub semester: Option<Semester>,
    pub is_elective: bool,
    pub credits: Option<i64>,
}

impl NewCourse {
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Course code cannot be empty"));
        }
        Ok(Self {
            code: trimmed.to_string(),
            label: None,
            semester: None,
            is_elective: false,
            credits: None,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_semester(mut self, semester: Semester) -> Self {
        self.semester = Some(semester);
        self
    }

    pub fn with_elective(mut self, is_elective: bool) -> Self {
        self.is_elective = is_elective;
        self
    }

    pub fn with_credits(mut self, credits: i64) -> Result<Self, DomainError> {
        if credits < 0 {
            return Err(DomainError::validation("Credits cannot be negative"));
        }
        self.credits = Some(credits);
        Ok(self)
    }
}

/// Partial update. `None` fields keep their stored value; the course code
/// is immutable once created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub semester: Option<Semester>,
    pub is_elective: Option<bool>,
    pub credits: Option<i64>,
    pub label: Option<String>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.semester.is_none()
            && self.is_elective.is_none()
            && self.credits.is_none()
            && self.label.is_none()
    }
}

/// Identity, display name and semester of a course: everything the
/// curriculum rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePlacement {
    pub id: CourseId,
    pub label: String,
    pub semester: Option<Semester>,
}

impl CoursePlacement {
    pub fn new(id: CourseId, label: impl Into<String>, semester: Option<Semester>) -> Self {
        Self {
            id,
            label: label.into(),
            semester,
        }
    }

    /// Same course, placed in a different semester.
    pub fn moved_to(&self, semester: Semester) -> Self {
        Self {
            semester: Some(semester),
            ..self.clone()
        }
    }
}
