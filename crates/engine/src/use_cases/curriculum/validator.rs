//! Curriculum consistency validator.
//!
//! Fetches the placements a proposed change touches and runs them through
//! [`curricula_domain::check_placement`]. The validator never writes; callers
//! perform the mutation once a change is allowed.

use std::sync::Arc;

use curricula_domain::{
    check_placement, CourseId, CoursePlacement, CurriculumViolation, RelationId, RelationKind,
    Semester, UserId,
};

use crate::infrastructure::ports::{CurriculumGraph, RepoError};

/// Outcome of a single-change validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject(CurriculumViolation),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn violation(self) -> Option<CurriculumViolation> {
        match self {
            Decision::Allow => None,
            Decision::Reject(violation) => Some(violation),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Stateless rule checker over the course graph.
pub struct CurriculumValidator {
    graph: Arc<dyn CurriculumGraph>,
}

impl CurriculumValidator {
    pub fn new(graph: Arc<dyn CurriculumGraph>) -> Self {
        Self { graph }
    }

    /// Check a new `kind` edge from `source` to `target`.
    pub async fn validate_new_relation(
        &self,
        source: &CourseId,
        target: &CourseId,
        kind: RelationKind,
    ) -> Result<Decision, ValidatorError> {
        let source_course = self.placement(source).await?;
        let target_course = self.placement(target).await?;

        if let Some(violation) = check_placement(kind, &source_course, &target_course) {
            return Ok(reject(violation));
        }

        if self
            .graph
            .relation_exists(source, target, kind, None)
            .await?
        {
            return Ok(reject(CurriculumViolation::DuplicateRelation {
                kind,
                source: source.clone(),
                target: target.clone(),
            }));
        }

        Ok(Decision::Allow)
    }

    /// Check replacing edge `edge` by a `new_kind` edge from the same source
    /// to `new_target`.
    pub async fn validate_relation_retarget(
        &self,
        edge: &RelationId,
        new_kind: RelationKind,
        new_target: &CourseId,
    ) -> Result<Decision, ValidatorError> {
        let relation = self
            .graph
            .relation(edge)
            .await?
            .ok_or_else(|| ValidatorError::NotFound {
                entity_type: "Relation",
                id: edge.to_string(),
            })?;

        let source_course = self.placement(&relation.source).await?;
        let target_course = self.placement(new_target).await?;

        if self
            .graph
            .relation_exists(&relation.source, new_target, new_kind, Some(edge.clone()))
            .await?
        {
            return Ok(reject(CurriculumViolation::DuplicateRelation {
                kind: new_kind,
                source: relation.source,
                target: new_target.clone(),
            }));
        }

        match check_placement(new_kind, &source_course, &target_course) {
            Some(violation) => Ok(reject(violation)),
            None => Ok(Decision::Allow),
        }
    }

    /// Every violation the course's outgoing semester-bound edges would have
    /// if it moved to `new_semester`. `None` checks nothing.
    pub async fn validate_semester_change(
        &self,
        course: &CourseId,
        new_semester: Option<Semester>,
    ) -> Result<Vec<CurriculumViolation>, ValidatorError> {
        let Some(new_semester) = new_semester else {
            return Ok(Vec::new());
        };

        let moved = self.placement(course).await?.moved_to(new_semester);

        let mut violations = Vec::new();
        for kind in RelationKind::CONSTRAINED {
            for neighbour in self.graph.outgoing(course, kind).await? {
                if let Some(violation) = check_placement(kind, &moved, &neighbour) {
                    violations.push(violation);
                }
            }
        }

        if !violations.is_empty() {
            tracing::info!(
                course_id = %course,
                semester = %new_semester,
                count = violations.len(),
                "Semester change rejected"
            );
        }
        Ok(violations)
    }

    /// Check that `user` has completed every direct prerequisite of `course`.
    pub async fn validate_completion(
        &self,
        user: &UserId,
        course: &CourseId,
    ) -> Result<Decision, ValidatorError> {
        for prerequisite in self.graph.prerequisites_of(course).await? {
            let status = self
                .graph
                .user_course_status(user, &prerequisite.id)
                .await?;

            if !status.as_ref().is_some_and(|s| s.is_completed()) {
                return Ok(reject(CurriculumViolation::PrerequisiteIncomplete {
                    course: course.clone(),
                    prerequisite: prerequisite.id,
                    prerequisite_label: prerequisite.label,
                }));
            }
        }
        Ok(Decision::Allow)
    }

    async fn placement(&self, course: &CourseId) -> Result<CoursePlacement, ValidatorError> {
        self.graph
            .course_placement(course)
            .await?
            .ok_or_else(|| ValidatorError::NotFound {
                entity_type: "Course",
                id: course.to_string(),
            })
    }
}

fn reject(violation: CurriculumViolation) -> Decision {
    tracing::info!(kind = violation.kind(), "{}", violation);
    Decision::Reject(violation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCurriculumGraph;
    use curricula_domain::{ProgressStatus, Relation};
    use mockall::predicate::*;

    fn id(raw: &str) -> CourseId {
        CourseId::new(raw).unwrap()
    }

    fn placed(raw: &str, semester: i64) -> CoursePlacement {
        CoursePlacement::new(
            id(raw),
            format!("Course {}", raw.to_uppercase()),
            Some(Semester::new(semester).unwrap()),
        )
    }

    fn with_placements(graph: &mut MockCurriculumGraph, courses: Vec<CoursePlacement>) {
        graph.expect_course_placement().returning(move |course| {
            Ok(courses.iter().find(|c| &c.id == course).cloned())
        });
    }

    #[tokio::test]
    async fn same_semester_prerequisite_is_rejected() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1), placed("b", 1)]);
        graph.expect_relation_exists().never();

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_new_relation(&id("a"), &id("b"), RelationKind::Prerequisite)
            .await
            .unwrap();

        assert!(matches!(
            decision,
            Decision::Reject(CurriculumViolation::SemesterOrder { .. })
        ));
    }

    #[tokio::test]
    async fn parallel_across_semesters_is_rejected() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("c", 2), placed("d", 3)]);

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_new_relation(&id("c"), &id("d"), RelationKind::Parallel)
            .await
            .unwrap();

        assert_eq!(decision.violation().map(|v| v.kind()), Some("semester-mismatch"));
    }

    #[tokio::test]
    async fn ordered_prerequisite_is_allowed_and_reverse_rejected() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1), placed("b", 2)]);
        graph
            .expect_relation_exists()
            .returning(|_, _, _, _| Ok(false));

        let validator = CurriculumValidator::new(Arc::new(graph));

        let forward = validator
            .validate_new_relation(&id("a"), &id("b"), RelationKind::Prerequisite)
            .await
            .unwrap();
        assert!(forward.is_allowed());

        let backward = validator
            .validate_new_relation(&id("b"), &id("a"), RelationKind::Prerequisite)
            .await
            .unwrap();
        assert_eq!(backward.violation().map(|v| v.kind()), Some("semester-order"));
    }

    #[tokio::test]
    async fn existing_edge_is_a_duplicate() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1), placed("b", 2)]);
        graph
            .expect_relation_exists()
            .with(eq(id("a")), eq(id("b")), eq(RelationKind::HasContent), eq(None))
            .returning(|_, _, _, _| Ok(true));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_new_relation(&id("a"), &id("b"), RelationKind::HasContent)
            .await
            .unwrap();

        assert_eq!(decision.violation().map(|v| v.kind()), Some("duplicate"));
    }

    #[tokio::test]
    async fn missing_target_is_not_found_not_a_violation() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1)]);

        let validator = CurriculumValidator::new(Arc::new(graph));
        let err = validator
            .validate_new_relation(&id("a"), &id("ghost"), RelationKind::Prerequisite)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ValidatorError::NotFound { entity_type: "Course", .. }
        ));
    }

    #[tokio::test]
    async fn retarget_ignores_the_edge_being_replaced() {
        let edge = RelationId::new("5:r:1").unwrap();
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1), placed("b", 2)]);
        graph.expect_relation().returning(|edge| {
            Ok(Some(Relation {
                id: edge.clone(),
                source: id("a"),
                target: id("b"),
                relation_type: "ns0__tienQuyet".to_string(),
            }))
        });
        graph
            .expect_relation_exists()
            .withf(|source, target, kind, excluding| {
                source.as_str() == "a"
                    && target.as_str() == "b"
                    && *kind == RelationKind::Prerequisite
                    && excluding.as_ref().map(|e| e.as_str()) == Some("5:r:1")
            })
            .returning(|_, _, _, _| Ok(false));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_relation_retarget(&edge, RelationKind::Prerequisite, &id("b"))
            .await
            .unwrap();

        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn retarget_onto_an_existing_edge_of_the_new_kind_is_a_duplicate() {
        let edge = RelationId::new("5:r:1").unwrap();
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1), placed("b", 2), placed("c", 3)]);
        graph.expect_relation().returning(|edge| {
            Ok(Some(Relation {
                id: edge.clone(),
                source: id("a"),
                target: id("b"),
                relation_type: "ns0__tienQuyet".to_string(),
            }))
        });
        graph
            .expect_relation_exists()
            .withf(|source, target, kind, excluding| {
                source.as_str() == "a"
                    && target.as_str() == "c"
                    && *kind == RelationKind::Prerequisite
                    && excluding.as_ref().map(|e| e.as_str()) == Some("5:r:1")
            })
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        // semester 1 before 3 satisfies the placement rule on its own
        assert_eq!(
            check_placement(RelationKind::Prerequisite, &placed("a", 1), &placed("c", 3)),
            None
        );

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_relation_retarget(&edge, RelationKind::Prerequisite, &id("c"))
            .await
            .unwrap();

        assert_eq!(decision.clone().violation().map(|v| v.kind()), Some("duplicate"));
        assert_eq!(
            decision,
            Decision::Reject(CurriculumViolation::DuplicateRelation {
                kind: RelationKind::Prerequisite,
                source: id("a"),
                target: id("c"),
            })
        );
    }

    #[tokio::test]
    async fn retarget_onto_earlier_course_is_rejected() {
        let edge = RelationId::new("5:r:1").unwrap();
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 3), placed("b", 4), placed("c", 2)]);
        graph.expect_relation().returning(|edge| {
            Ok(Some(Relation {
                id: edge.clone(),
                source: id("a"),
                target: id("b"),
                relation_type: "ns0__hocTruoc".to_string(),
            }))
        });
        graph
            .expect_relation_exists()
            .returning(|_, _, _, _| Ok(false));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_relation_retarget(&edge, RelationKind::PriorTo, &id("c"))
            .await
            .unwrap();

        assert!(matches!(
            decision,
            Decision::Reject(CurriculumViolation::SemesterOrder {
                kind: RelationKind::PriorTo,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn retarget_of_missing_edge_is_not_found() {
        let mut graph = MockCurriculumGraph::new();
        graph.expect_relation().returning(|_| Ok(None));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let err = validator
            .validate_relation_retarget(
                &RelationId::new("5:r:9").unwrap(),
                RelationKind::Parallel,
                &id("b"),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ValidatorError::NotFound { entity_type: "Relation", .. }
        ));
    }

    #[tokio::test]
    async fn semester_change_reports_every_violation() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 1)]);
        graph.expect_outgoing().returning(|_, kind| {
            Ok(match kind {
                RelationKind::Prerequisite => vec![placed("b", 2), placed("c", 4)],
                RelationKind::Parallel => vec![placed("d", 1)],
                _ => Vec::new(),
            })
        });

        let validator = CurriculumValidator::new(Arc::new(graph));
        let violations = validator
            .validate_semester_change(&id("a"), Some(Semester::new(3).unwrap()))
            .await
            .unwrap();

        let kinds: Vec<_> = violations.iter().map(|v| v.kind()).collect();
        assert_eq!(kinds, vec!["semester-mismatch", "semester-order"]);
    }

    #[tokio::test]
    async fn semester_change_without_value_checks_nothing() {
        let graph = MockCurriculumGraph::new();
        let validator = CurriculumValidator::new(Arc::new(graph));

        let violations = validator
            .validate_semester_change(&id("a"), None)
            .await
            .unwrap();

        assert!(violations.is_empty());
    }

    #[tokio::test]
    async fn revalidating_current_semester_adds_nothing_new() {
        let mut graph = MockCurriculumGraph::new();
        with_placements(&mut graph, vec![placed("a", 2)]);
        graph.expect_outgoing().returning(|_, kind| {
            Ok(match kind {
                RelationKind::Prerequisite => vec![placed("b", 3)],
                RelationKind::Parallel => vec![placed("c", 2)],
                _ => Vec::new(),
            })
        });

        let validator = CurriculumValidator::new(Arc::new(graph));
        let violations = validator
            .validate_semester_change(&id("a"), Some(Semester::new(2).unwrap()))
            .await
            .unwrap();

        assert!(violations.is_empty());
    }

    #[tokio::test]
    async fn completed_prerequisite_allows_completion() {
        let mut graph = MockCurriculumGraph::new();
        graph
            .expect_prerequisites_of()
            .returning(|_| Ok(vec![placed("a", 1)]));
        graph
            .expect_user_course_status()
            .returning(|_, _| Ok(Some(ProgressStatus::completed())));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_completion(&UserId::new("u").unwrap(), &id("b"))
            .await
            .unwrap();

        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn in_progress_prerequisite_rejects_completion_naming_it() {
        let mut graph = MockCurriculumGraph::new();
        graph
            .expect_prerequisites_of()
            .returning(|_| Ok(vec![placed("a", 1)]));
        graph
            .expect_user_course_status()
            .returning(|_, _| Ok(Some(ProgressStatus::new("in-progress").unwrap())));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_completion(&UserId::new("u").unwrap(), &id("b"))
            .await
            .unwrap();

        match decision {
            Decision::Reject(CurriculumViolation::PrerequisiteIncomplete {
                prerequisite, ..
            }) => assert_eq!(prerequisite, id("a")),
            other => panic!("expected prerequisite-incomplete, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_progress_record_rejects_completion() {
        let mut graph = MockCurriculumGraph::new();
        graph
            .expect_prerequisites_of()
            .returning(|_| Ok(vec![placed("a", 1)]));
        graph
            .expect_user_course_status()
            .returning(|_, _| Ok(None));

        let validator = CurriculumValidator::new(Arc::new(graph));
        let decision = validator
            .validate_completion(&UserId::new("u").unwrap(), &id("b"))
            .await
            .unwrap();

        assert!(!decision.is_allowed());
    }
}
