//! Graph entities: courses, relations, users and progress records.

mod course;
mod ontology;
mod relation;
mod user;
mod user_course;

pub use course::{
    CatalogEntry, Course, CourseDetails, CoursePatch, CoursePlacement, CourseSummary, NewCourse,
    RelationSummary,
};
pub use ontology::{group_by_ancestor, ClassGroup, ClassLink, ClassRef};
pub use relation::{Relation, RelationDraft, RelationWrite};
pub use user::{NewUser, User, UserPatch, Username};
pub use user_course::{NewUserCourse, UserCourse};
