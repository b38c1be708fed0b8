//! Relation use cases: validated creation and retargeting of course edges.

use std::sync::Arc;

use curricula_domain::{
    CourseId, CurriculumViolation, DomainError, Relation, RelationDraft, RelationId,
    RelationKind, RelationWrite,
};

use crate::infrastructure::ports::{RelationRepo, RepoError};
use crate::use_cases::curriculum::{CurriculumValidator, Decision, ValidatorError};

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Violation(CurriculumViolation),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<ValidatorError> for RelationError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::NotFound { entity_type, id } => {
                RelationError::NotFound { entity_type, id }
            }
            ValidatorError::Repo(e) => RelationError::Repo(e),
        }
    }
}

impl From<DomainError> for RelationError {
    fn from(err: DomainError) -> Self {
        RelationError::InvalidInput(err.to_string())
    }
}

/// Parse a client-supplied kind and target into a draft.
pub fn parse_draft(
    relation_type: Option<&str>,
    target_id: Option<&str>,
) -> Result<RelationDraft, RelationError> {
    let (Some(relation_type), Some(target_id)) = (relation_type, target_id) else {
        return Err(RelationError::InvalidInput(
            "Missing relation_type or target_id.".to_string(),
        ));
    };
    let kind = relation_type.parse::<RelationKind>()?;
    let target = CourseId::new(target_id)?;
    Ok(RelationDraft::new(kind, target))
}

pub struct RelationUseCases {
    relations: Arc<dyn RelationRepo>,
    validator: Arc<CurriculumValidator>,
}

impl RelationUseCases {
    pub fn new(relations: Arc<dyn RelationRepo>, validator: Arc<CurriculumValidator>) -> Self {
        Self {
            relations,
            validator,
        }
    }

    /// Create edges from `source` in order. The first rejected or failed
    /// draft stops the batch; edges created before it are kept.
    pub async fn add_relations(
        &self,
        source: &CourseId,
        drafts: &[RelationDraft],
    ) -> Result<Vec<Relation>, RelationError> {
        let mut created = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let decision = self
                .validator
                .validate_new_relation(source, &draft.target, draft.kind)
                .await?;
            if let Decision::Reject(violation) = decision {
                return Err(RelationError::Violation(violation));
            }

            match self
                .relations
                .create(source, &draft.target, draft.kind)
                .await?
            {
                RelationWrite::Created(relation) => {
                    tracing::info!(
                        relation_id = %relation.id,
                        source_id = %source,
                        target_id = %draft.target,
                        kind = %draft.kind,
                        "Relation created"
                    );
                    created.push(relation);
                }
                RelationWrite::Unchanged(_) | RelationWrite::AlreadyExists => {
                    return Err(duplicate(draft.kind, source.clone(), draft.target.clone()));
                }
            }
        }

        Ok(created)
    }

    /// Replace edge `id` with a `kind` edge from the same source to `target`.
    /// Retargeting onto the edge's current kind and target is a no-op.
    pub async fn retarget(
        &self,
        id: &RelationId,
        kind: RelationKind,
        target: &CourseId,
    ) -> Result<Relation, RelationError> {
        let existing = self
            .relations
            .get(id)
            .await?
            .ok_or_else(|| relation_not_found(id))?;

        if let Decision::Reject(violation) = self
            .validator
            .validate_relation_retarget(id, kind, target)
            .await?
        {
            return Err(RelationError::Violation(violation));
        }

        match self.relations.retarget(id, kind, target).await? {
            Some(RelationWrite::Created(relation)) => {
                tracing::info!(
                    old_relation_id = %id,
                    relation_id = %relation.id,
                    target_id = %target,
                    kind = %kind,
                    "Relation retargeted"
                );
                Ok(relation)
            }
            Some(RelationWrite::Unchanged(relation)) => Ok(relation),
            Some(RelationWrite::AlreadyExists) => {
                Err(duplicate(kind, existing.source, target.clone()))
            }
            None => Err(relation_not_found(id)),
        }
    }
}

fn duplicate(kind: RelationKind, source: CourseId, target: CourseId) -> RelationError {
    let violation = CurriculumViolation::DuplicateRelation {
        kind,
        source,
        target,
    };
    tracing::info!(kind = violation.kind(), "{}", violation);
    RelationError::Violation(violation)
}

fn relation_not_found(id: &RelationId) -> RelationError {
    RelationError::NotFound {
        entity_type: "Relation",
        id: id.to_string(),
    }
}
