//! CLI command implementations.

pub mod config;
pub mod count;
pub mod generate;
pub mod providers;
pub mod simulate;
