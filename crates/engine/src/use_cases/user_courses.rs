//! Progress records linking users to courses.
//!
//! Moving a record to "completed" requires every direct prerequisite of the
//! course to be completed by the same user first.

use std::sync::Arc;

use curricula_domain::{
    CourseId, CurriculumViolation, DomainError, NewUserCourse, ProgressStatus, UserCourse,
    UserCourseId, UserId,
};

use crate::infrastructure::ports::{RepoError, UserCourseRepo};
use crate::use_cases::curriculum::{CurriculumValidator, Decision, ValidatorError};

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("UserCourse with user_id {user_id} and course_id {course_id} already exists.")]
    AlreadyExists { user_id: UserId, course_id: CourseId },
    #[error("{0}")]
    Violation(CurriculumViolation),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<ValidatorError> for ProgressError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::NotFound { entity_type, id } => {
                ProgressError::NotFound { entity_type, id }
            }
            ValidatorError::Repo(e) => ProgressError::Repo(e),
        }
    }
}

impl From<DomainError> for ProgressError {
    fn from(err: DomainError) -> Self {
        ProgressError::InvalidInput(err.to_string())
    }
}

pub struct UserCourseUseCases {
    records: Arc<dyn UserCourseRepo>,
    validator: Arc<CurriculumValidator>,
}

impl UserCourseUseCases {
    pub fn new(records: Arc<dyn UserCourseRepo>, validator: Arc<CurriculumValidator>) -> Self {
        Self { records, validator }
    }

    /// Create the user's record for a course. A record created directly as
    /// "completed" is subject to the same prerequisite check as an update.
    pub async fn create(
        &self,
        user_id: Option<String>,
        course_id: Option<String>,
        status: Option<String>,
    ) -> Result<UserCourse, ProgressError> {
        let (Some(user_id), Some(course_id)) = (user_id, course_id) else {
            return Err(ProgressError::InvalidInput(
                "user_id and course_id are required.".to_string(),
            ));
        };
        let user_id = UserId::new(user_id)?;
        let course_id = CourseId::new(course_id)?;
        let status = status
            .filter(|s| !s.trim().is_empty())
            .map(ProgressStatus::new)
            .transpose()?;

        if status.as_ref().is_some_and(ProgressStatus::is_completed) {
            self.ensure_prerequisites_completed(&user_id, &course_id)
                .await?;
        }

        let record = NewUserCourse {
            user_id: user_id.clone(),
            course_id: course_id.clone(),
            status,
        };
        let created = self
            .records
            .create(&record)
            .await?
            .ok_or(ProgressError::AlreadyExists { user_id, course_id })?;

        tracing::info!(
            user_course_id = %created.id,
            user_id = %created.user_id,
            course_id = %created.course_id,
            "User course created"
        );
        Ok(created)
    }

    pub async fn list(&self) -> Result<Vec<UserCourse>, ProgressError> {
        Ok(self.records.list().await?)
    }

    pub async fn get(&self, id: &UserCourseId) -> Result<UserCourse, ProgressError> {
        self.records
            .get(id)
            .await?
            .ok_or_else(|| record_not_found(id))
    }

    /// Set a new status. Absent status leaves the record untouched.
    pub async fn update_status(
        &self,
        id: &UserCourseId,
        status: Option<String>,
    ) -> Result<UserCourse, ProgressError> {
        let current = self.get(id).await?;

        let Some(status) = status.filter(|s| !s.trim().is_empty()) else {
            return Ok(current);
        };
        let status = ProgressStatus::new(status)?;

        if status.is_completed() {
            self.ensure_prerequisites_completed(&current.user_id, &current.course_id)
                .await?;
        }

        let updated = self
            .records
            .update_status(id, &status)
            .await?
            .ok_or_else(|| record_not_found(id))?;
        tracing::info!(user_course_id = %id, status = %status, "User course updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &UserCourseId) -> Result<(), ProgressError> {
        if !self.records.delete(id).await? {
            return Err(record_not_found(id));
        }
        tracing::info!(user_course_id = %id, "User course deleted");
        Ok(())
    }

    async fn ensure_prerequisites_completed(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<(), ProgressError> {
        match self.validator.validate_completion(user_id, course_id).await? {
            Decision::Allow => Ok(()),
            Decision::Reject(violation) => Err(ProgressError::Violation(violation)),
        }
    }
}

fn record_not_found(id: &UserCourseId) -> ProgressError {
    ProgressError::NotFound {
        entity_type: "UserCourse",
        id: id.to_string(),
    }
}
