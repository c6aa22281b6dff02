//! Subcommands.

pub mod batch;
pub mod config;
pub mod history;
pub mod scan;
