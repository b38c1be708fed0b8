//! Small pure helpers shared by the domain and engine crates.

pub mod string;

pub use string::{non_blank, StringExt};
