//! Neo4j database implementations.

use std::sync::Arc;

use crate::infrastructure::ports::ClockPort;

mod graph;
mod helpers;
mod query_helpers;
mod schema;

mod course_repo;
mod curriculum_repo;
mod relation_repo;
mod structure_repo;
mod user_course_repo;
mod user_repo;


pub use graph::{Neo4jGraph, Neo4jRowStream};
pub use schema::ensure_schema;

pub use course_repo::Neo4jCourseRepo;
pub use curriculum_repo::Neo4jCurriculumGraph;
pub use relation_repo::Neo4jRelationRepo;
pub use structure_repo::Neo4jStructureRepo;
pub use user_course_repo::Neo4jUserCourseRepo;
pub use user_repo::Neo4jUserRepo;

/// Create all Neo4j repositories from a graph connection.
pub struct Neo4jRepositories {
    pub curriculum: Arc<Neo4jCurriculumGraph>,
    pub course: Arc<Neo4jCourseRepo>,
    pub relation: Arc<Neo4jRelationRepo>,
    pub structure: Arc<Neo4jStructureRepo>,
    pub user: Arc<Neo4jUserRepo>,
    pub user_course: Arc<Neo4jUserCourseRepo>,
}

impl Neo4jRepositories {
    pub fn new(graph: Neo4jGraph, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            curriculum: Arc::new(Neo4jCurriculumGraph::new(graph.clone())),
            course: Arc::new(Neo4jCourseRepo::new(graph.clone())),
            relation: Arc::new(Neo4jRelationRepo::new(graph.clone())),
            structure: Arc::new(Neo4jStructureRepo::new(graph.clone())),
            user: Arc::new(Neo4jUserRepo::new(graph.clone())),
            user_course: Arc::new(Neo4jUserCourseRepo::new(graph, clock)),
        }
    }
}
