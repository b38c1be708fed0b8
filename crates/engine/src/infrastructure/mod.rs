//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod embedding;
pub mod neo4j;
pub mod password;
pub mod ports;
