//! # Core Module
//!
//! Shared configuration used by every bootstrap component.

pub mod config;

pub use config::{BootstrapConfig, Config, ConfigError};
