//! CLI, cycle orchestration, configuration
//!
//! This crate provides the `upnext` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod cycle;
pub mod error;
pub mod state;

pub use cli::Cli;
pub use config::AppConfig;
pub use cycle::{Cycle, CycleDecision, CycleOutcome};
pub use error::{AppError, AppResult};
