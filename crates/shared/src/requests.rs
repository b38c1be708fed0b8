//! Request bodies and query strings.

mod course;
mod relation;
mod search;
mod user;
mod user_course;

pub use course::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest};
pub use relation::{AddRelationsRequest, RelationInput, UpdateRelationRequest};
pub use search::SearchRequest;
pub use user::{CredentialsRequest, UpdateUserRequest};
pub use user_course::{CreateUserCourseRequest, UpdateUserCourseRequest};
