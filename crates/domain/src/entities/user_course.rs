//! UserCourse entity - one user's progress on one course.
//!
//! Stored as a standalone `UserCourse` node holding both ids as properties
//! rather than as edges, matching how progress records were first imported.

use chrono::{DateTime, Utc};

use crate::ids::{CourseId, UserCourseId, UserId};
use crate::value_objects::ProgressStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCourse {
    pub id: UserCourseId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub status: Option<ProgressStatus>,
    /// Last status change; absent on imported records.
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserCourse {
    pub fn is_completed(&self) -> bool {
        self.status.as_ref().is_some_and(ProgressStatus::is_completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserCourse {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub status: Option<ProgressStatus>,
}
