//! Curriculum consistency rules.
//!
//! Pure decisions over already-fetched course placements. Fetching and
//! reporting live in the engine's curriculum validator; this module only
//! knows what a consistent curriculum looks like:
//!
//! - `prerequisite` / `priorTo` A→B: `A.semester < B.semester`
//! - `parallel` A→B: `A.semester == B.semester`
//! - no duplicate (source, target, kind) edge
//! - a course may only be completed once all direct prerequisites are

use std::fmt;

use crate::entities::CoursePlacement;
use crate::ids::CourseId;
use crate::value_objects::{RelationKind, Semester, SemesterConstraint};

/// A course with a known semester, as named in a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedCourse {
    pub id: CourseId,
    pub label: String,
    pub semester: Semester,
}

impl fmt::Display for PlacedCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (semester {})", self.label, self.semester)
    }
}

/// A rule breach. Reported as a value, never raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurriculumViolation {
    /// prerequisite / priorTo edge whose source is not strictly earlier.
    SemesterOrder {
        kind: RelationKind,
        source: PlacedCourse,
        target: PlacedCourse,
    },
    /// parallel edge between different semesters.
    SemesterMismatch {
        source: PlacedCourse,
        target: PlacedCourse,
    },
    /// Same (source, target, kind) edge already present.
    DuplicateRelation {
        kind: RelationKind,
        source: CourseId,
        target: CourseId,
    },
    /// A direct prerequisite lacks a completed progress record.
    PrerequisiteIncomplete {
        course: CourseId,
        prerequisite: CourseId,
        prerequisite_label: String,
    },
}

impl CurriculumViolation {
    /// Stable machine-readable tag.
    pub fn kind(&self) -> &'static str {
        match self {
            CurriculumViolation::SemesterOrder { .. } => "semester-order",
            CurriculumViolation::SemesterMismatch { .. } => "semester-mismatch",
            CurriculumViolation::DuplicateRelation { .. } => "duplicate",
            CurriculumViolation::PrerequisiteIncomplete { .. } => "prerequisite-incomplete",
        }
    }
}

impl fmt::Display for CurriculumViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurriculumViolation::SemesterOrder {
                kind,
                source,
                target,
            } => {
                let rule = match kind {
                    RelationKind::PriorTo => "Prior",
                    _ => "Prerequisite",
                };
                write!(
                    f,
                    "{} relation violation: course {} must be scheduled earlier than course {}.",
                    rule, source, target
                )
            }
            CurriculumViolation::SemesterMismatch { source, target } => write!(
                f,
                "Parallel relation violation: course {} must be in the same semester as course {}.",
                source, target
            ),
            CurriculumViolation::DuplicateRelation {
                kind,
                source,
                target,
            } => write!(
                f,
                "Relation {} between course {} and target {} already exists.",
                kind, source, target
            ),
            CurriculumViolation::PrerequisiteIncomplete {
                course,
                prerequisite,
                prerequisite_label,
            } => write!(
                f,
                "Cannot mark course {} as completed: prerequisite course \"{}\" ({}) is not completed.",
                course, prerequisite_label, prerequisite
            ),
        }
    }
}

/// Check one directed edge of `kind` from `source` to `target`.
///
/// Unconstrained kinds never violate. When either semester is unknown the
/// rule cannot be evaluated and the edge is accepted.
pub fn check_placement(
    kind: RelationKind,
    source: &CoursePlacement,
    target: &CoursePlacement,
) -> Option<CurriculumViolation> {
    let constraint = kind.semester_constraint()?;
    let (source_semester, target_semester) = (source.semester?, target.semester?);

    let placed = |course: &CoursePlacement, semester: Semester| PlacedCourse {
        id: course.id.clone(),
        label: course.label.clone(),
        semester,
    };

    match constraint {
        SemesterConstraint::StrictlyEarlier if source_semester >= target_semester => {
            Some(CurriculumViolation::SemesterOrder {
                kind,
                source: placed(source, source_semester),
                target: placed(target, target_semester),
            })
        }
        SemesterConstraint::SameSemester if source_semester != target_semester => {
            Some(CurriculumViolation::SemesterMismatch {
                source: placed(source, source_semester),
                target: placed(target, target_semester),
            })
        }
        _ => None,
    }
}
