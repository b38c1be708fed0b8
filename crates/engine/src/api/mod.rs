//! API layer - HTTP entry points.

pub mod error;
pub mod http;
mod mappers;

pub use error::ApiError;
