//! Data models shared across the pipeline.

pub mod config;
pub mod history;
pub mod receipt;
