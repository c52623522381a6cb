//! Run configuration for celpatch

pub mod config;


pub use config::PatchConfig;
