//! Curriculum consistency checks.

mod validator;

pub use validator::{CurriculumValidator, Decision, ValidatorError};
