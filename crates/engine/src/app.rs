//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    neo4j::Neo4jRepositories,
    ports::{
        CourseRepo, CurriculumGraph, EmbeddingPort, PasswordHasherPort, RelationRepo,
        StructureRepo, UserCourseRepo, UserRepo,
    },
};
use crate::use_cases;

/// Main application state.
///
/// Holds all use cases. Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all repository ports.
///
/// All fields are `Arc<dyn PortTrait>` so tests can wire mocks in place of
/// the Neo4j adapters.
pub struct Repositories {
    pub curriculum: Arc<dyn CurriculumGraph>,
    pub course: Arc<dyn CourseRepo>,
    pub relation: Arc<dyn RelationRepo>,
    pub structure: Arc<dyn StructureRepo>,
    pub user: Arc<dyn UserRepo>,
    pub user_course: Arc<dyn UserCourseRepo>,
}

impl From<Neo4jRepositories> for Repositories {
    fn from(repos: Neo4jRepositories) -> Self {
        Self {
            curriculum: repos.curriculum,
            course: repos.course,
            relation: repos.relation,
            structure: repos.structure,
            user: repos.user,
            user_course: repos.user_course,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub courses: use_cases::CourseUseCases,
    pub relations: use_cases::RelationUseCases,
    pub structure: use_cases::StructureUseCases,
    pub users: use_cases::UserUseCases,
    pub user_courses: use_cases::UserCourseUseCases,
    pub search: use_cases::SearchUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    ///
    /// Course, relation and progress use cases share one validator so every
    /// mutation path applies the same curriculum rules.
    pub fn new(
        repos: impl Into<Repositories>,
        embedder: Arc<dyn EmbeddingPort>,
        hasher: Arc<dyn PasswordHasherPort>,
        search_top_k: usize,
    ) -> Self {
        let repos = repos.into();
        let validator = Arc::new(use_cases::CurriculumValidator::new(repos.curriculum.clone()));

        let use_cases = UseCases {
            courses: use_cases::CourseUseCases::new(repos.course.clone(), validator.clone()),
            relations: use_cases::RelationUseCases::new(
                repos.relation.clone(),
                validator.clone(),
            ),
            structure: use_cases::StructureUseCases::new(
                repos.relation.clone(),
                repos.structure.clone(),
            ),
            users: use_cases::UserUseCases::new(repos.user.clone(), hasher),
            user_courses: use_cases::UserCourseUseCases::new(
                repos.user_course.clone(),
                validator,
            ),
            search: use_cases::SearchUseCases::new(repos.course, embedder, search_top_k),
        };

        Self { use_cases }
    }
}
