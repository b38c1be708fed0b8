//! Course use cases: catalogue, CRUD and relation candidates.
//!
//! Semester changes go through the curriculum validator before anything is
//! written; a rejected change reports every violated edge at once.

mod catalog;
mod crud;

use std::sync::Arc;

use curricula_domain::{CurriculumViolation, DomainError};

use crate::infrastructure::ports::{CourseRepo, RepoError};
use crate::use_cases::curriculum::{CurriculumValidator, ValidatorError};

pub use catalog::{CatalogPage, CatalogRequest, DEFAULT_PAGE_SIZE};
pub use crud::{CourseInput, EligibleTargets};

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Course with code {0} already exists.")]
    DuplicateCode(String),
    #[error("Semester change breaks {} curriculum rule(s)", .0.len())]
    Violations(Vec<CurriculumViolation>),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<ValidatorError> for CourseError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::NotFound { entity_type, id } => {
                CourseError::NotFound { entity_type, id }
            }
            ValidatorError::Repo(e) => CourseError::Repo(e),
        }
    }
}

impl From<DomainError> for CourseError {
    fn from(err: DomainError) -> Self {
        CourseError::InvalidInput(err.to_string())
    }
}

/// Course operations exposed over HTTP.
pub struct CourseUseCases {
    courses: Arc<dyn CourseRepo>,
    validator: Arc<CurriculumValidator>,
}

impl CourseUseCases {
    pub fn new(courses: Arc<dyn CourseRepo>, validator: Arc<CurriculumValidator>) -> Self {
        Self { courses, validator }
    }
}
