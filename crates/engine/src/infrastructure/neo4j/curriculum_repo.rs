//! Neo4j implementation of the curriculum validator's read model.

use async_trait::async_trait;
use curricula_domain::{
    CourseId, CoursePlacement, ProgressStatus, Relation, RelationId, RelationKind, UserId,
};
use neo4rs::query;

use super::helpers::{row_to_placement, row_to_relation, RowExt, RELATION_COLUMNS};
use super::query_helpers::{collect_rows, get_first_row};
use super::Neo4jGraph;
use crate::infrastructure::ports::{CurriculumGraph, RepoError};

const PLACEMENT_COLUMNS: &str = "elementId(c) AS course_id, \
     c.rdfs__label AS label, \
     c.ns0__hocKy AS semester";

pub struct Neo4jCurriculumGraph {
    graph: Neo4jGraph,
}

impl Neo4jCurriculumGraph {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl CurriculumGraph for Neo4jCurriculumGraph {
    async fn course_placement(
        &self,
        course: &CourseId,
    ) -> Result<Option<CoursePlacement>, RepoError> {
        let q = query(&format!(
            "MATCH (c) WHERE elementId(c) = $id
             RETURN {PLACEMENT_COLUMNS}"
        ))
        .param("id", course.as_str());

        get_first_row(&self.graph, q, "course_placement", |row| {
            row_to_placement(&row)
        })
        .await
    }

    async fn outgoing(
        &self,
        course: &CourseId,
        kind: RelationKind,
    ) -> Result<Vec<CoursePlacement>, RepoError> {
        let label = kind.graph_label();
        let q = query(&format!(
            "MATCH (a)-[:`{label}`]->(c) WHERE elementId(a) = $id
             RETURN DISTINCT {PLACEMENT_COLUMNS}"
        ))
        .param("id", course.as_str());

        collect_rows(&self.graph, q, "outgoing_relations", |row| {
            row_to_placement(&row)
        })
        .await
    }

    async fn prerequisites_of(
        &self,
        course: &CourseId,
    ) -> Result<Vec<CoursePlacement>, RepoError> {
        let label = RelationKind::Prerequisite.graph_label();
        let q = query(&format!(
            "MATCH (c)-[:`{label}`]->(b) WHERE elementId(b) = $id
             RETURN DISTINCT {PLACEMENT_COLUMNS}"
        ))
        .param("id", course.as_str());

        collect_rows(&self.graph, q, "prerequisites_of", |row| {
            row_to_placement(&row)
        })
        .await
    }

    async fn user_course_status(
        &self,
        user: &UserId,
        course: &CourseId,
    ) -> Result<Option<ProgressStatus>, RepoError> {
        let q = query(
            "MATCH (uc:UserCourse {user_id: $user_id, course_id: $course_id})
             RETURN uc.status AS status
             ORDER BY coalesce(uc.updated_at, '') DESC, elementId(uc)
             LIMIT 1",
        )
        .param("user_id", user.as_str())
        .param("course_id", course.as_str());

        let status = get_first_row(&self.graph, q, "user_course_status", |row| {
            Ok(row
                .get_optional_string("status")
                .and_then(|s| ProgressStatus::new(s).ok()))
        })
        .await?;

        Ok(status.flatten())
    }

    async fn relation_exists(
        &self,
        source: &CourseId,
        target: &CourseId,
        kind: RelationKind,
        excluding: Option<RelationId>,
    ) -> Result<bool, RepoError> {
        let label = kind.graph_label();
        let q = query(&format!(
            "MATCH (s)-[r:`{label}`]->(t)
             WHERE elementId(s) = $source
               AND elementId(t) = $target
               AND ($excluding IS NULL OR elementId(r) <> $excluding)
             RETURN count(r) > 0 AS found"
        ))
        .param("source", source.as_str())
        .param("target", target.as_str())
        .param("excluding", excluding.map(RelationId::into_inner));

        let found = get_first_row(&self.graph, q, "relation_exists", |row| {
            Ok(row.get_bool_or("found", false))
        })
        .await?;

        Ok(found.unwrap_or(false))
    }

    async fn relation(&self, edge: &RelationId) -> Result<Option<Relation>, RepoError> {
        let q = query(&format!(
            "MATCH (s)-[r]->(t) WHERE elementId(r) = $id
             RETURN {RELATION_COLUMNS}"
        ))
        .param("id", edge.as_str());

        get_first_row(&self.graph, q, "get_relation", row_to_relation).await
    }
}
