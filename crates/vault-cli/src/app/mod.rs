//! Application-level utilities for the vault CLI.
//!
//! This module provides:
//! - Path resolution for the config file
//! - Passphrase acquisition with retry
//! - The per-invocation context that opens the store and session

mod context;
mod passphrase;
mod resolver;

pub use context::AppContext;
pub use resolver::resolve_config_path;
