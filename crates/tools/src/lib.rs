//! OpenCourse Tools Library
//!
//! Provides configuration management and utilities for deploying the
//! OpenCourse contracts.

pub mod config;

pub use config::{Config, ConfigError, ContractIds, Network};
