//! Repository port traits for database access.

use async_trait::async_trait;
use curricula_domain::*;

use super::error::RepoError;

// =============================================================================
// Query Types
// =============================================================================

/// One catalogue page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Signed to match Cypher integers; never negative.
    pub skip: i64,
    pub limit: i64,
    /// A course is listed only if it has an outgoing edge of every kind here.
    pub required_kinds: Vec<RelationKind>,
    /// Attach this user's progress status to each entry.
    pub user_id: Option<UserId>,
}

// =============================================================================
// Curriculum Rules
// =============================================================================

/// Read-only view of the course graph used by the curriculum validator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurriculumGraph: Send + Sync {
    async fn course_placement(&self, course: &CourseId)
        -> Result<Option<CoursePlacement>, RepoError>;

    /// Targets of `course`'s outgoing edges of `kind`.
    async fn outgoing(
        &self,
        course: &CourseId,
        kind: RelationKind,
    ) -> Result<Vec<CoursePlacement>, RepoError>;

    /// Sources of prerequisite edges pointing at `course`.
    async fn prerequisites_of(&self, course: &CourseId)
        -> Result<Vec<CoursePlacement>, RepoError>;

    async fn user_course_status(
        &self,
        user: &UserId,
        course: &CourseId,
    ) -> Result<Option<ProgressStatus>, RepoError>;

    /// Whether an edge of `kind` links `source` to `target`, ignoring the
    /// edge `excluding` when given.
    async fn relation_exists(
        &self,
        source: &CourseId,
        target: &CourseId,
        kind: RelationKind,
        excluding: Option<RelationId>,
    ) -> Result<bool, RepoError>;

    async fn relation(&self, edge: &RelationId) -> Result<Option<Relation>, RepoError>;
}

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn get(&self, id: &CourseId) -> Result<Option<Course>, RepoError>;

    /// Course with its outgoing edges whose targets carry a label.
    async fn get_details(&self, id: &CourseId) -> Result<Option<CourseDetails>, RepoError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Course>, RepoError>;
    async fn create(&self, course: &NewCourse) -> Result<Course, RepoError>;

    /// Apply the non-empty fields of `patch`. `None` when no such course.
    async fn update(&self, id: &CourseId, patch: &CoursePatch)
        -> Result<Option<Course>, RepoError>;

    /// Delete a course and every incident edge. `false` when no such course.
    async fn delete(&self, id: &CourseId) -> Result<bool, RepoError>;

    // Catalogue
    async fn count_catalog(&self, required_kinds: &[RelationKind]) -> Result<u64, RepoError>;
    async fn list_catalog(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>, RepoError>;
    async fn list_catalog_names(&self) -> Result<Vec<CourseSummary>, RepoError>;

    /// Courses that `id` could link to with `kind` without breaking a
    /// semester rule.
    async fn eligible_targets(
        &self,
        id: &CourseId,
        kind: RelationKind,
    ) -> Result<Vec<CourseSummary>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationRepo: Send + Sync {
    async fn get(&self, id: &RelationId) -> Result<Option<Relation>, RepoError>;

    /// Create the edge unless one of the same kind already links the pair.
    async fn create(
        &self,
        source: &CourseId,
        target: &CourseId,
        kind: RelationKind,
    ) -> Result<RelationWrite, RepoError>;

    /// Replace edge `id` with a `kind` edge from the same source to `target`.
    /// `None` when the edge or the target no longer exists.
    async fn retarget(
        &self,
        id: &RelationId,
        kind: RelationKind,
        target: &CourseId,
    ) -> Result<Option<RelationWrite>, RepoError>;

    async fn delete(&self, id: &RelationId) -> Result<bool, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StructureRepo: Send + Sync {
    /// Distinct relationship types present in the graph.
    async fn relation_types(&self) -> Result<Vec<String>, RepoError>;

    /// Every `(child)-[:rdfs__subClassOf*]->(ancestor)` pair.
    async fn class_hierarchy(&self) -> Result<Vec<ClassLink>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: &UserId) -> Result<Option<User>, RepoError>;
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepoError>;

    /// `None` when the username is already taken.
    async fn create(&self, user: &NewUser) -> Result<Option<User>, RepoError>;
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<Option<User>, RepoError>;
    async fn delete(&self, id: &UserId) -> Result<bool, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCourseRepo: Send + Sync {
    async fn get(&self, id: &UserCourseId) -> Result<Option<UserCourse>, RepoError>;
    async fn list(&self) -> Result<Vec<UserCourse>, RepoError>;

    /// `None` when the user already has a record for the course.
    async fn create(&self, record: &NewUserCourse) -> Result<Option<UserCourse>, RepoError>;
    async fn update_status(
        &self,
        id: &UserCourseId,
        status: &ProgressStatus,
    ) -> Result<Option<UserCourse>, RepoError>;
    async fn delete(&self, id: &UserCourseId) -> Result<bool, RepoError>;
}
