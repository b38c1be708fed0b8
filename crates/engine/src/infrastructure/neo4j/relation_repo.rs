//! Neo4j relation repository.
//!
//! Relationship types cannot be query parameters, so the type is spliced
//! into the Cypher text. Only [`RelationKind::graph_label`] values are ever
//! spliced; request strings are parsed into a `RelationKind` first.
//!
//! Creation is a single `MERGE` that tags a freshly created edge with a
//! one-off token. Reading the token back tells whether this call created the
//! edge or found an existing one, so concurrent writers cannot both create
//! the same (source, target, kind) edge.

use async_trait::async_trait;
use curricula_domain::{CourseId, Relation, RelationId, RelationKind, RelationWrite};
use neo4rs::{query, Row};
use uuid::Uuid;

use super::helpers::{row_to_relation, RowExt, RELATION_COLUMNS};
use super::query_helpers::get_first_row;
use super::Neo4jGraph;
use crate::infrastructure::ports::{RelationRepo, RepoError};

pub struct Neo4jRelationRepo {
    graph: Neo4jGraph,
}

impl Neo4jRelationRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }
}

/// Outcome flags returned alongside the edge by the conditional writes.
fn row_to_write(row: Row) -> Result<RelationWrite, RepoError> {
    let created = row.get_bool_or("created", false);
    let unchanged = row.get_bool_or("unchanged", false);
    let relation = row_to_relation(row)?;

    Ok(if created {
        RelationWrite::Created(relation)
    } else if unchanged {
        RelationWrite::Unchanged(relation)
    } else {
        RelationWrite::AlreadyExists
    })
}

#[async_trait]
impl RelationRepo for Neo4jRelationRepo {
    async fn get(&self, id: &RelationId) -> Result<Option<Relation>, RepoError> {
        let q = query(&format!(
            "MATCH (s)-[r]->(t) WHERE elementId(r) = $id
             RETURN {RELATION_COLUMNS}"
        ))
        .param("id", id.as_str());

        get_first_row(&self.graph, q, "get_relation", row_to_relation).await
    }

    async fn create(
        &self,
        source: &CourseId,
        target: &CourseId,
        kind: RelationKind,
    ) -> Result<RelationWrite, RepoError> {
        let label = kind.graph_label();
        let q = query(&format!(
            "MATCH (s) WHERE elementId(s) = $source
             MATCH (t) WHERE elementId(t) = $target
             MERGE (s)-[r:`{label}`]->(t)
             ON CREATE SET r.merge_token = $token
             WITH s, r, t, coalesce(r.merge_token = $token, false) AS created
             REMOVE r.merge_token
             RETURN {RELATION_COLUMNS}, created"
        ))
        .param("source", source.as_str())
        .param("target", target.as_str())
        .param("token", Uuid::new_v4().to_string());

        let write = get_first_row(&self.graph, q, "create_relation", row_to_write)
            .await?
            .ok_or_else(|| RepoError::not_found("Course", format!("{} or {}", source, target)))?;

        if let RelationWrite::Created(relation) = &write {
            tracing::debug!(
                relation_id = %relation.id,
                source = %source,
                target = %target,
                kind = %kind,
                "Created relation"
            );
        }
        Ok(write)
    }

    async fn retarget(
        &self,
        id: &RelationId,
        kind: RelationKind,
        target: &CourseId,
    ) -> Result<Option<RelationWrite>, RepoError> {
        let label = kind.graph_label();
        // The old edge is removed only when the replacement was created here.
        let q = query(&format!(
            "MATCH (s)-[old]->() WHERE elementId(old) = $id
             MATCH (t) WHERE elementId(t) = $target
             MERGE (s)-[r:`{label}`]->(t)
             ON CREATE SET r.merge_token = $token
             WITH s, t, old, r,
                  coalesce(r.merge_token = $token, false) AS created,
                  elementId(r) = elementId(old) AS unchanged
             REMOVE r.merge_token
             FOREACH (_ IN CASE WHEN created THEN [1] ELSE [] END | DELETE old)
             RETURN {RELATION_COLUMNS}, created, unchanged"
        ))
        .param("id", id.as_str())
        .param("target", target.as_str())
        .param("token", Uuid::new_v4().to_string());

        let write = get_first_row(&self.graph, q, "retarget_relation", row_to_write).await?;

        if let Some(RelationWrite::Created(relation)) = &write {
            tracing::debug!(
                old_relation_id = %id,
                relation_id = %relation.id,
                target = %target,
                kind = %kind,
                "Retargeted relation"
            );
        }
        Ok(write)
    }

    async fn delete(&self, id: &RelationId) -> Result<bool, RepoError> {
        let q = query(
            "MATCH ()-[r]->() WHERE elementId(r) = $id
             WITH r, elementId(r) AS relation_id
             DELETE r
             RETURN relation_id",
        )
        .param("id", id.as_str());

        let deleted = get_first_row(&self.graph, q, "delete_relation", |_| Ok(()))
            .await?
            .is_some();

        if deleted {
            tracing::debug!(relation_id = %id, "Deleted relation");
        }
        Ok(deleted)
    }
}
