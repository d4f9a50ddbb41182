//! CLI subcommand implementations.

pub mod annotate;
pub mod cache;
pub mod eval;
