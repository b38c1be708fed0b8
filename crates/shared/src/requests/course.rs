use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCourseRequest {
    #[serde(default, alias = "ns0__maMonHoc")]
    pub code: Option<String>,
    #[serde(default, alias = "rdfs__label")]
    pub label: Option<String>,
    #[serde(default, alias = "ns0__hocKy")]
    pub semester: Option<i64>,
    #[serde(default, alias = "ns0__laMonTuChon")]
    pub is_elective: Option<bool>,
    #[serde(default, alias = "ns0__soTinChi")]
    pub credits: Option<i64>,
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(default, alias = "rdfs__label")]
    pub label: Option<String>,
    #[serde(default, alias = "ns0__hocKy")]
    pub semester: Option<i64>,
    #[serde(default, alias = "ns0__laMonTuChon")]
    pub is_elective: Option<bool>,
    #[serde(default, alias = "ns0__soTinChi")]
    pub credits: Option<i64>,
}

/// `GET /courses` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Comma-separated relation kinds; a course must have an outgoing edge of each.
    pub relation: Option<String>,
    /// Attach this user's progress status to every entry.
    pub user_id: Option<String>,
}
