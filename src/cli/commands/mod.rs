//! CLI command modules

pub mod patch;
pub mod replace_refs;
pub mod validate;
