//! Graph structure use cases: raw relation removal and ontology browsing.

use std::sync::Arc;

use curricula_domain::{group_by_ancestor, ClassGroup, RelationId};

use crate::infrastructure::ports::{RelationRepo, RepoError, StructureRepo};

#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub struct StructureUseCases {
    relations: Arc<dyn RelationRepo>,
    structure: Arc<dyn StructureRepo>,
}

impl StructureUseCases {
    pub fn new(relations: Arc<dyn RelationRepo>, structure: Arc<dyn StructureRepo>) -> Self {
        Self {
            relations,
            structure,
        }
    }

    pub async fn delete_relation(&self, id: &RelationId) -> Result<(), StructureError> {
        if !self.relations.delete(id).await? {
            return Err(StructureError::NotFound {
                entity_type: "Relation",
                id: id.to_string(),
            });
        }
        tracing::info!(relation_id = %id, "Relation deleted");
        Ok(())
    }

    pub async fn relation_types(&self) -> Result<Vec<String>, StructureError> {
        Ok(self.structure.relation_types().await?)
    }

    /// Class hierarchy grouped by ancestor.
    pub async fn ontology(&self) -> Result<Vec<ClassGroup>, StructureError> {
        let links = self.structure.class_hierarchy().await?;
        Ok(group_by_ancestor(links))
    }
}
