//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (course graph, users, progress records)
//! - Embeddings (could swap Ollama -> any `/api/embed` compatible server)
//! - Password hashing
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{EmbeddingError, PasswordError, RepoError};

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{
    CatalogQuery, CourseRepo, CurriculumGraph, RelationRepo, StructureRepo, UserCourseRepo,
    UserRepo,
};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{EmbeddingPort, PasswordHasherPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockCourseRepo, MockCurriculumGraph, MockRelationRepo, MockStructureRepo, MockUserCourseRepo,
    MockUserRepo,
};

#[cfg(test)]
pub use external::{MockEmbeddingPort, MockPasswordHasherPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;
