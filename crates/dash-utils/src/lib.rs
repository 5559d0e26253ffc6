//! Shared utilities for stockdash
//!
//! This crate provides common functionality used across the stockdash workspace:
//! tracing setup and the process-level configuration read from the environment.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat};
pub use logging::init_tracing;
