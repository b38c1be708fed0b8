//! Backend E2E integration tests.
//!
//! These tests drive the HTTP router against:
//! - Real Neo4j database (via testcontainers)
//! - Complete App construction with all use cases
//! - A mocked embedding port (no model server needed)
//!
//! # Running E2E Tests
//!
//! ```bash
//! # Run all E2E tests (requires Docker)
//! cargo test -p curricula-engine --lib e2e_tests -- --ignored --test-threads=1
//! ```

mod neo4j_test_harness;

pub use neo4j_test_harness::*;
