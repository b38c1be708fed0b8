//! Neo4j structure repository: relationship types and the class hierarchy.

use async_trait::async_trait;
use curricula_domain::ClassLink;
use neo4rs::query;

use super::helpers::{row_to_class_link, RowExt};
use super::query_helpers::collect_rows;
use super::Neo4jGraph;
use crate::infrastructure::ports::{RepoError, StructureRepo};

pub struct Neo4jStructureRepo {
    graph: Neo4jGraph,
}

impl Neo4jStructureRepo {
    pub fn new(graph: Neo4jGraph) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl StructureRepo for Neo4jStructureRepo {
    async fn relation_types(&self) -> Result<Vec<String>, RepoError> {
        let q = query(
            "MATCH ()-[r]->()
             RETURN DISTINCT type(r) AS relation_type
             ORDER BY relation_type",
        );

        collect_rows(&self.graph, q, "relation_types", |row| {
            row.get_string_strict("relation_type")
        })
        .await
    }

    async fn class_hierarchy(&self) -> Result<Vec<ClassLink>, RepoError> {
        let q = query(
            "MATCH (child:Resource)-[:rdfs__subClassOf*]->(ancestor:Resource)
             RETURN DISTINCT elementId(child) AS child_id,
                    child.rdfs__label AS child_label,
                    elementId(ancestor) AS ancestor_id,
                    ancestor.rdfs__label AS ancestor_label",
        );

        collect_rows(&self.graph, q, "class_hierarchy", row_to_class_link).await
    }
}
