extern crate self as curricula_domain;

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod rules;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    group_by_ancestor, CatalogEntry, ClassGroup, ClassLink, ClassRef, Course, CourseDetails,
    CoursePatch, CoursePlacement, CourseSummary, NewCourse, NewUser, NewUserCourse, Relation,
    RelationDraft, RelationSummary, RelationWrite, User, UserCourse, UserPatch, Username,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{ClassId, CourseId, RelationId, UserCourseId, UserId};

// Re-export curriculum rules
pub use rules::{check_placement, CurriculumViolation, PlacedCourse};

// Re-export value objects
pub use value_objects::{ProgressStatus, RelationKind, Semester, SemesterConstraint, UserRole};
