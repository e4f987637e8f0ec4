//! Command implementations.

pub mod config;
pub mod cycle;
pub mod preview;
