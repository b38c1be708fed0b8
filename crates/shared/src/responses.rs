//! Response bodies returned by the HTTP API.

use serde::{Deserialize, Serialize};

/// Plain acknowledgement, e.g. after a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A rule breach reported by the curriculum validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationData {
    /// Stable tag: `semester-order`, `semester-mismatch`, `duplicate`, `prerequisite-incomplete`
    pub kind: String,
    pub message: String,
}

/// Error body. `violations` is present only for curriculum rejections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationData>,
}

// =============================================================================
// Courses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseData {
    pub course_id: String,
    pub code: Option<String>,
    pub label: Option<String>,
    pub semester: Option<i64>,
    pub is_elective: bool,
    pub credits: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    pub message: String,
    pub course: CourseData,
}

/// An outgoing edge. `label` is the target course's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationData {
    pub relation_id: String,
    pub relation_type: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationResponse {
    pub message: String,
    pub relation: RelationData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetailsData {
    #[serde(flatten)]
    pub course: CourseData,
    pub relations: Vec<RelationData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntryData {
    #[serde(flatten)]
    pub details: CourseDetailsData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub total_courses: u64,
    pub total_pages: u64,
    pub courses: Vec<CatalogEntryData>,
}

/// Candidate target for a new relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibleCourseData {
    pub course_id: String,
    pub code: Option<String>,
    pub label: Option<String>,
}

// =============================================================================
// Structure
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationTypesResponse {
    pub relation_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyAncestorData {
    pub ancestor_id: String,
    pub ancestor_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyChildData {
    pub child_id: String,
    pub child_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyGroupData {
    pub ancestor: OntologyAncestorData,
    pub children: Vec<OntologyChildData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyResponse {
    pub ontology_structure: Vec<OntologyGroupData>,
}

// =============================================================================
// Users and progress
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user_id: String,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdatedResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCourseData {
    pub user_course_id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: Option<String>,
    /// RFC 3339 timestamp of the last status change
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCourseResponse {
    pub message: String,
    pub user_course: UserCourseData,
}

// =============================================================================
// Search
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub course_id: String,
    pub code: Option<String>,
    pub label: Option<String>,
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::CreateCourseRequest;

    #[test]
    fn error_body_omits_empty_violations() {
        let body = ErrorResponse {
            error: "Course not found".into(),
            violations: vec![],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Course not found" }));
    }

    #[test]
    fn course_details_flatten_course_fields() {
        let details = CourseDetailsData {
            course: CourseData {
                course_id: "4:abc:1".into(),
                code: Some("CS101".into()),
                label: Some("Intro".into()),
                semester: Some(1),
                is_elective: false,
                credits: Some(3),
            },
            relations: vec![],
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["code"], "CS101");
        assert_eq!(json["relations"], serde_json::json!([]));
    }

    #[test]
    fn create_request_accepts_ontology_property_names() {
        let request: CreateCourseRequest = serde_json::from_value(serde_json::json!({
            "ns0__maMonHoc": "CS202",
            "rdfs__label": "Data Structures",
            "ns0__hocKy": 2,
            "ns0__laMonTuChon": true,
            "ns0__soTinChi": 4
        }))
        .unwrap();
        assert_eq!(request.code.as_deref(), Some("CS202"));
        assert_eq!(request.semester, Some(2));
        assert_eq!(request.is_elective, Some(true));
    }
}
