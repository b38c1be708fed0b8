//! Value objects shared by course, relation and progress entities.

mod progress_status;
mod relation_kind;
mod semester;
mod user_role;

pub use progress_status::ProgressStatus;
pub use relation_kind::{RelationKind, SemesterConstraint};
pub use semester::Semester;
pub use user_role::UserRole;
