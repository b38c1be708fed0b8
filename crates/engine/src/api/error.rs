//! HTTP error mapping.
//!
//! Every error body is `{"error": "..."}`; curriculum rejections add a
//! `violations` array. Store and embedding failures are logged and reported
//! with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use curricula_domain::CurriculumViolation;
use curricula_shared::{ErrorResponse, ViolationData};

use crate::use_cases::{
    CourseError, ProgressError, RelationError, SearchError, StructureError, UserError,
};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Violations(Vec<CurriculumViolation>),
    Internal(String),
}

impl ApiError {
    fn not_found(entity_type: &str, id: &str) -> Self {
        ApiError::NotFound(format!("{entity_type} with id {id} not found."))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Violations(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Unauthorized(msg) => {
                ErrorResponse {
                    error: msg,
                    violations: Vec::new(),
                }
            }
            ApiError::Violations(violations) => {
                let error = match violations.as_slice() {
                    [only] => only.to_string(),
                    _ => format!("{} curriculum rules violated.", violations.len()),
                };
                ErrorResponse {
                    error,
                    violations: violations
                        .iter()
                        .map(|v| ViolationData {
                            kind: v.kind().to_string(),
                            message: v.to_string(),
                        })
                        .collect(),
                }
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    violations: Vec::new(),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<crate::infrastructure::ports::RepoError> for ApiError {
    fn from(e: crate::infrastructure::ports::RepoError) -> Self {
        use crate::infrastructure::ports::RepoError;
        match e {
            RepoError::NotFound { entity_type, id } => ApiError::not_found(entity_type, &id),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<CourseError> for ApiError {
    fn from(e: CourseError) -> Self {
        match e {
            CourseError::NotFound { entity_type, id } => ApiError::not_found(entity_type, &id),
            CourseError::InvalidInput(msg) => ApiError::BadRequest(msg),
            e @ CourseError::DuplicateCode(_) => ApiError::BadRequest(e.to_string()),
            CourseError::Violations(violations) => ApiError::Violations(violations),
            CourseError::Repo(e) => e.into(),
        }
    }
}

impl From<RelationError> for ApiError {
    fn from(e: RelationError) -> Self {
        match e {
            RelationError::NotFound { entity_type, id } => ApiError::not_found(entity_type, &id),
            RelationError::InvalidInput(msg) => ApiError::BadRequest(msg),
            RelationError::Violation(violation) => ApiError::Violations(vec![violation]),
            RelationError::Repo(e) => e.into(),
        }
    }
}

impl From<StructureError> for ApiError {
    fn from(e: StructureError) -> Self {
        match e {
            StructureError::NotFound { entity_type, id } => ApiError::not_found(entity_type, &id),
            StructureError::Repo(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound { entity_type, id } => ApiError::not_found(entity_type, &id),
            UserError::InvalidInput(msg) => ApiError::BadRequest(msg),
            e @ UserError::UsernameTaken(_) => ApiError::BadRequest(e.to_string()),
            e @ UserError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            UserError::Password(e) => ApiError::Internal(e.to_string()),
            UserError::Repo(e) => e.into(),
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(e: ProgressError) -> Self {
        match e {
            ProgressError::NotFound { entity_type, id } => ApiError::not_found(entity_type, &id),
            ProgressError::InvalidInput(msg) => ApiError::BadRequest(msg),
            e @ ProgressError::AlreadyExists { .. } => ApiError::BadRequest(e.to_string()),
            ProgressError::Violation(violation) => ApiError::Violations(vec![violation]),
            ProgressError::Repo(e) => e.into(),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidInput(msg) => ApiError::BadRequest(msg),
            SearchError::Embedding(e) => ApiError::Internal(e.to_string()),
            SearchError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{EmbeddingError, PasswordError, RepoError};
    use curricula_domain::{CourseId, RelationKind};

    fn duplicate() -> CurriculumViolation {
        CurriculumViolation::DuplicateRelation {
            kind: RelationKind::Prerequisite,
            source: CourseId::new("a").unwrap(),
            target: CourseId::new("b").unwrap(),
        }
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                CourseError::NotFound { entity_type: "Course", id: "x".into() }.into(),
                StatusCode::NOT_FOUND,
            ),
            (CourseError::DuplicateCode("CS101".into()).into(), StatusCode::BAD_REQUEST),
            (CourseError::Violations(vec![duplicate()]).into(), StatusCode::BAD_REQUEST),
            (RelationError::Violation(duplicate()).into(), StatusCode::BAD_REQUEST),
            (UserError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (
                UserError::Password(PasswordError::MalformedHash("bad".into())).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SearchError::Embedding(EmbeddingError::RequestFailed("down".into())).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StructureError::Repo(RepoError::database("delete_relation", "boom")).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn violation_body_lists_each_violation() {
        let response = ApiError::Violations(vec![duplicate()]).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["violations"][0]["kind"], "duplicate");
        assert!(body["error"].as_str().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = ApiError::Internal("neo4j password rejected".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }
}
