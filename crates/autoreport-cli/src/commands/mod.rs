//! CLI command implementations.

pub mod context;
pub mod run;
pub mod validate;
