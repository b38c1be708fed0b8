//! Neo4j deserialization helpers for row conversion functions.
//!
//! Repositories project the properties they need into named columns
//! (`RETURN elementId(c) AS course_id, c.rdfs__label AS label, ...`), so the
//! helpers here work on `Row` columns rather than whole nodes.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use curricula_domain::common::StringExt;
use curricula_domain::{
    ClassId, ClassLink, ClassRef, Course, CourseId, CoursePlacement, CourseSummary, DomainError,
    ProgressStatus, Relation, RelationId, RelationSummary, Semester, User, UserCourse,
    UserCourseId, UserId, UserRole, Username,
};
use neo4rs::Row;
use serde::Deserialize;

use crate::infrastructure::ports::RepoError;

// =============================================================================
// Shared Projections
// =============================================================================

/// Course columns for a node bound to `c`. Used by every course query so
/// row converters stay in one place.
pub const COURSE_COLUMNS: &str = "elementId(c) AS course_id, \
     c.ns0__maMonHoc AS code, \
     c.rdfs__label AS label, \
     c.ns0__hocKy AS semester, \
     c.ns0__laMonTuChon AS is_elective, \
     c.ns0__soTinChi AS credits";

/// Outgoing edges of `c` whose target carries a label, as a `relations` column.
pub const RELATION_SUMMARIES: &str = "[r IN collect({ \
         relation_id: elementId(rel), \
         relation_type: type(rel), \
         target_id: elementId(related), \
         target_label: related.rdfs__label \
     }) WHERE r.target_label IS NOT NULL] AS relations";

/// Columns for an edge `r` from `s` to `t`, read by [`row_to_relation`].
pub const RELATION_COLUMNS: &str = "elementId(r) AS relation_id, \
     elementId(s) AS source_id, \
     elementId(t) AS target_id, \
     type(r) AS relation_type";

/// Match the catalogue: instances of any class below the root course class.
pub const CATALOG_MATCH: &str = "MATCH (root:Resource {rdfs__label: 'Môn học'}) \
     MATCH (cls:Resource)-[:rdfs__subClassOf*]->(root) \
     MATCH (c:Resource)-[:rdf__type]->(cls)";

// =============================================================================
// Row Extension Trait
// =============================================================================

/// Extension trait for Neo4j Row to simplify common deserialization patterns.
pub trait RowExt {
    /// Get an optional string column, returning None if null, blank or missing.
    fn get_optional_string(&self, column: &str) -> Option<String>;

    /// Get an integer column. Imported data sometimes stores numbers as text.
    fn get_optional_i64(&self, column: &str) -> Option<i64>;

    /// Get a bool column with a default value if null or missing.
    fn get_bool_or(&self, column: &str, default: bool) -> bool;

    /// Get an RFC 3339 timestamp column, `None` if absent or unparsable.
    fn get_optional_datetime(&self, column: &str) -> Option<DateTime<Utc>>;

    /// Get a required string column with strict error handling (fail-fast).
    fn get_string_strict(&self, column: &str) -> Result<String, RepoError>;

    /// Parse a required id column into its typed id.
    fn get_id<T>(&self, column: &str) -> Result<T, RepoError>
    where
        T: FromStr<Err = DomainError>;
}

impl RowExt for Row {
    fn get_optional_string(&self, column: &str) -> Option<String> {
        self.get::<Option<String>>(column)
            .ok()
            .flatten()
            .into_option()
    }

    fn get_optional_i64(&self, column: &str) -> Option<i64> {
        if let Ok(Some(n)) = self.get::<Option<i64>>(column) {
            return Some(n);
        }
        self.get_optional_string(column)
            .and_then(|s| s.parse::<i64>().ok())
    }

    fn get_bool_or(&self, column: &str, default: bool) -> bool {
        self.get::<Option<bool>>(column)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_optional_datetime(&self, column: &str) -> Option<DateTime<Utc>> {
        self.get_optional_string(column)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn get_string_strict(&self, column: &str) -> Result<String, RepoError> {
        self.get(column).map_err(|e| {
            RepoError::database(
                "query",
                format!("Missing required column '{}': {}", column, e),
            )
        })
    }

    fn get_id<T>(&self, column: &str) -> Result<T, RepoError>
    where
        T: FromStr<Err = DomainError>,
    {
        let raw = self.get_string_strict(column)?;
        raw.parse::<T>()
            .map_err(|e| RepoError::serialization(format!("column '{}': {}", column, e)))
    }
}

/// Semesters below zero are treated as unknown.
fn optional_semester(row: &Row, column: &str) -> Option<Semester> {
    row.get_optional_i64(column)
        .and_then(|value| Semester::new(value).ok())
}

// =============================================================================
// Common Row-to-Entity Converters
// =============================================================================

/// Convert a row projected with [`COURSE_COLUMNS`].
pub fn row_to_course(row: &Row) -> Result<Course, RepoError> {
    Ok(Course {
        id: row.get_id("course_id")?,
        code: row.get_optional_string("code"),
        label: row.get_optional_string("label"),
        semester: optional_semester(row, "semester"),
        is_elective: row.get_bool_or("is_elective", false),
        credits: row.get_optional_i64("credits"),
    })
}

/// Convert `course_id`, `label`, `semester` columns. A course without a
/// label is named by its id.
pub fn row_to_placement(row: &Row) -> Result<CoursePlacement, RepoError> {
    let id: CourseId = row.get_id("course_id")?;
    let label = row
        .get_optional_string("label")
        .unwrap_or_else(|| id.to_string());
    Ok(CoursePlacement::new(
        id,
        label,
        optional_semester(row, "semester"),
    ))
}

/// Convert `course_id`, `code`, `label` columns.
pub fn row_to_summary(row: Row) -> Result<CourseSummary, RepoError> {
    Ok(CourseSummary {
        course_id: row.get_id("course_id")?,
        code: row.get_optional_string("code"),
        label: row.get_optional_string("label"),
    })
}

#[derive(Debug, Deserialize)]
struct RelationSummaryRow {
    relation_id: String,
    relation_type: String,
    target_id: String,
    target_label: Option<String>,
}

/// Convert the `relations` column built by [`RELATION_SUMMARIES`].
pub fn row_to_relation_summaries(row: &Row) -> Result<Vec<RelationSummary>, RepoError> {
    let raw: Vec<RelationSummaryRow> = row
        .get("relations")
        .map_err(|e| RepoError::serialization(format!("column 'relations': {}", e)))?;

    raw.into_iter()
        .map(|r| {
            Ok(RelationSummary {
                relation_id: RelationId::new(r.relation_id).map_err(RepoError::serialization)?,
                relation_type: r.relation_type,
                target_id: CourseId::new(r.target_id).map_err(RepoError::serialization)?,
                target_label: r.target_label.unwrap_or_default(),
            })
        })
        .collect()
}

/// Convert `relation_id`, `source_id`, `target_id`, `relation_type` columns.
pub fn row_to_relation(row: Row) -> Result<Relation, RepoError> {
    Ok(Relation {
        id: row.get_id("relation_id")?,
        source: row.get_id("source_id")?,
        target: row.get_id("target_id")?,
        relation_type: row.get_string_strict("relation_type")?,
    })
}

/// Convert `user_id`, `username`, `role`, `password` columns. Unknown roles
/// read back as the default role.
pub fn row_to_user(row: Row) -> Result<User, RepoError> {
    let id: UserId = row.get_id("user_id")?;
    let username = Username::new(row.get_string_strict("username")?)
        .map_err(|e| RepoError::serialization(format!("user {}: {}", id, e)))?;
    let role = row
        .get_optional_string("role")
        .and_then(|r| r.parse::<UserRole>().ok())
        .unwrap_or_default();

    Ok(User {
        id,
        username,
        role,
        password_hash: row.get_optional_string("password"),
    })
}

/// Convert `user_course_id`, `user_id`, `course_id`, `status`, `updated_at` columns.
pub fn row_to_user_course(row: Row) -> Result<UserCourse, RepoError> {
    Ok(UserCourse {
        id: row.get_id::<UserCourseId>("user_course_id")?,
        user_id: row.get_id("user_id")?,
        course_id: row.get_id("course_id")?,
        status: row
            .get_optional_string("status")
            .and_then(|s| ProgressStatus::new(s).ok()),
        updated_at: row.get_optional_datetime("updated_at"),
    })
}

/// Convert `child_id`, `child_label`, `ancestor_id`, `ancestor_label` columns.
pub fn row_to_class_link(row: Row) -> Result<ClassLink, RepoError> {
    Ok(ClassLink {
        child: ClassRef {
            id: row.get_id::<ClassId>("child_id")?,
            label: row.get_optional_string("child_label"),
        },
        ancestor: ClassRef {
            id: row.get_id::<ClassId>("ancestor_id")?,
            label: row.get_optional_string("ancestor_label"),
        },
    })
}
