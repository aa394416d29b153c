//! Response types and utilities.

pub mod builder;
pub mod types;

pub use builder::*;
pub use types::*;
