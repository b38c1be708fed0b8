//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area. Mutations that
//! can break curriculum consistency go through the shared
//! [`curriculum::CurriculumValidator`] first.

pub mod courses;
pub mod curriculum;
pub mod relations;
pub mod search;
pub mod structure;
pub mod user_courses;
pub mod users;

pub use courses::{CourseError, CourseUseCases};
pub use curriculum::{CurriculumValidator, Decision, ValidatorError};
pub use relations::{RelationError, RelationUseCases};
pub use search::{SearchError, SearchUseCases};
pub use structure::{StructureError, StructureUseCases};
pub use user_courses::{ProgressError, UserCourseUseCases};
pub use users::{UserError, UserUseCases};
