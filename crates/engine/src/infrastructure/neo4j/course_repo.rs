//! Neo4j course repository.
//!
//! Course properties keep the imported ontology names (`ns0__hocKy`,
//! `rdfs__label`, ...). Courses are addressed by `elementId`.

use async_trait::async_trait;
use curricula_domain::{
    CatalogEntry, Course, CourseDetails, CourseId, CoursePatch, CourseSummary, NewCourse,
    RelationKind, SemesterConstraint,
};
use neo4rs::{query, Row};

use super::helpers::{
    row_to_course, row_to_relation_summaries, row_to_summary, RowExt, CATALOG_MATCH,
    COURSE_COLUMNS, RELATION_SUMMARIES,
};
use super::query_helpers::{collect_rows, get_first_row};
use super::Neo4jGraph;
use crate::infrastructure::ports::{CatalogQuery, CourseRepo, RepoError};

/// Keeps courses with an outgoing edge of every kind in `$kinds`.
const REQUIRED_KINDS_FILTER: &str =
    "WHERE all(kind IN $kinds WHERE EXISTS { MATCH (c)-[k]->() WHERE type(k) = kind })";

pub struct Neo4jCourseRepo {
    graph: Neo4jGraph,
}

impl Neo4jCourseRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }
}

fn kind_labels(kinds: &[RelationKind]) -> Vec<String> {
    kinds.iter().map(|k| k.graph_label().to_string()).collect()
}

fn row_to_details(row: &Row) -> Result<CourseDetails, RepoError> {
    Ok(CourseDetails {
        course: row_to_course(row)?,
        relations: row_to_relation_summaries(row)?,
    })
}

#[async_trait]
impl CourseRepo for Neo4jCourseRepo {
    async fn get(&self, id: &CourseId) -> Result<Option<Course>, RepoError> {
        let q = query(&format!(
            "MATCH (c) WHERE elementId(c) = $id
             RETURN {COURSE_COLUMNS}"
        ))
        .param("id", id.as_str());

        get_first_row(&self.graph, q, "get_course", |row| row_to_course(&row)).await
    }

    async fn get_details(&self, id: &CourseId) -> Result<Option<CourseDetails>, RepoError> {
        let q = query(&format!(
            "MATCH (c) WHERE elementId(c) = $id
             OPTIONAL MATCH (c)-[rel]->(related)
             RETURN {COURSE_COLUMNS}, {RELATION_SUMMARIES}"
        ))
        .param("id", id.as_str());

        get_first_row(&self.graph, q, "get_course_details", |row| {
            row_to_details(&row)
        })
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Course>, RepoError> {
        let q = query(&format!(
            "MATCH (c:Resource {{ns0__maMonHoc: $code}})
             RETURN {COURSE_COLUMNS}
             LIMIT 1"
        ))
        .param("code", code);

        get_first_row(&self.graph, q, "find_course_by_code", |row| {
            row_to_course(&row)
        })
        .await
    }

    async fn create(&self, course: &NewCourse) -> Result<Course, RepoError> {
        let q = query(&format!(
            "CREATE (c:Resource:owl__NamedIndividual {{
                 ns0__maMonHoc: $code,
                 rdfs__label: $label,
                 ns0__hocKy: $semester,
                 ns0__laMonTuChon: $is_elective,
                 ns0__soTinChi: $credits
             }})
             RETURN {COURSE_COLUMNS}"
        ))
        .param("code", course.code.as_str())
        .param("label", course.label.clone())
        .param("semester", course.semester.map(|s| s.value()))
        .param("is_elective", course.is_elective)
        .param("credits", course.credits);

        let created = get_first_row(&self.graph, q, "create_course", |row| row_to_course(&row))
            .await?
            .ok_or_else(|| RepoError::database("create_course", "CREATE returned no row"))?;

        tracing::debug!(course_id = %created.id, code = %course.code, "Created course");
        Ok(created)
    }

    async fn update(
        &self,
        id: &CourseId,
        patch: &CoursePatch,
    ) -> Result<Option<Course>, RepoError> {
        let q = query(&format!(
            "MATCH (c) WHERE elementId(c) = $id
             SET c.ns0__hocKy = coalesce($semester, c.ns0__hocKy),
                 c.ns0__laMonTuChon = coalesce($is_elective, c.ns0__laMonTuChon),
                 c.ns0__soTinChi = coalesce($credits, c.ns0__soTinChi),
                 c.rdfs__label = coalesce($label, c.rdfs__label)
             RETURN {COURSE_COLUMNS}"
        ))
        .param("id", id.as_str())
        .param("semester", patch.semester.map(|s| s.value()))
        .param("is_elective", patch.is_elective)
        .param("credits", patch.credits)
        .param("label", patch.label.clone());

        get_first_row(&self.graph, q, "update_course", |row| row_to_course(&row)).await
    }

    async fn delete(&self, id: &CourseId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH (c) WHERE elementId(c) = $id
             WITH c, elementId(c) AS course_id
             DETACH DELETE c
             RETURN course_id",
        )
        .param("id", id.as_str());

        let deleted = get_first_row(&self.graph, q, "delete_course", |_| Ok(()))
            .await?
            .is_some();

        if deleted {
            tracing::debug!(course_id = %id, "Deleted course and incident relations");
        }
        Ok(deleted)
    }

    async fn count_catalog(&self, required_kinds: &[RelationKind]) -> Result<u64, RepoError> {
        let q = query(&format!(
            "{CATALOG_MATCH}
             WITH DISTINCT c
             {REQUIRED_KINDS_FILTER}
             RETURN count(c) AS total"
        ))
        .param("kinds", kind_labels(required_kinds));

        let total = get_first_row(&self.graph, q, "count_catalog", |row| {
            Ok(row.get_optional_i64("total").unwrap_or(0))
        })
        .await?
        .unwrap_or(0);

        Ok(total.max(0) as u64)
    }

    async fn list_catalog(&self, catalog: &CatalogQuery) -> Result<Vec<CatalogEntry>, RepoError> {
        let q = query(&format!(
            "{CATALOG_MATCH}
             WITH DISTINCT c
             {REQUIRED_KINDS_FILTER}
             OPTIONAL MATCH (c)-[rel]->(related)
             WITH c, {RELATION_SUMMARIES}
             OPTIONAL MATCH (uc:UserCourse {{user_id: $user_id, course_id: elementId(c)}})
             WITH c, relations, head(collect(uc.status)) AS course_status
             RETURN {COURSE_COLUMNS}, relations, course_status
             ORDER BY semester, course_id
             SKIP $skip
             LIMIT $limit"
        ))
        .param("kinds", kind_labels(&catalog.required_kinds))
        .param(
            "user_id",
            catalog.user_id.as_ref().map(|id| id.as_str().to_string()),
        )
        .param("skip", catalog.skip)
        .param("limit", catalog.limit);

        collect_rows(&self.graph, q, "list_catalog", |row| {
            Ok(CatalogEntry {
                details: row_to_details(&row)?,
                course_status: row.get_optional_string("course_status"),
            })
        })
        .await
    }

    async fn list_catalog_names(&self) -> Result<Vec<CourseSummary>, RepoError> {
        let q = query(&format!(
            "{CATALOG_MATCH}
             RETURN DISTINCT elementId(c) AS course_id,
                    c.ns0__maMonHoc AS code,
                    c.rdfs__label AS label"
        ));

        collect_rows(&self.graph, q, "list_catalog_names", row_to_summary).await
    }

    async fn eligible_targets(
        &self,
        id: &CourseId,
        kind: RelationKind,
    ) -> Result<Vec<CourseSummary>, RepoError> {
        // `kind.graph_label()` comes from a closed enum, never from input.
        let label = kind.graph_label();
        let placement = match kind.semester_constraint() {
            Some(SemesterConstraint::StrictlyEarlier) => format!(
                "AND a.ns0__hocKy > c.ns0__hocKy
                 AND NOT (c)-[:`{label}`]->(a)"
            ),
            Some(SemesterConstraint::SameSemester) => {
                "AND a.ns0__hocKy = c.ns0__hocKy".to_string()
            }
            None => format!("AND NOT (c)-[:`{label}`]->(a)"),
        };

        let q = query(&format!(
            "MATCH (a) WHERE elementId(a) = $id
             MATCH (c:Resource)
             WHERE elementId(c) <> $id
             {placement}
             RETURN elementId(c) AS course_id,
                    c.ns0__maMonHoc AS code,
                    c.rdfs__label AS label
             ORDER BY c.ns0__hocKy, label"
        ))
        .param("id", id.as_str());

        collect_rows(&self.graph, q, "eligible_targets", row_to_summary).await
    }
}
