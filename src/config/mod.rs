//! Configuration module for Seedwave
//!
//! Configuration is read from a TOML file. Every field has a default, so
//! the dispatcher also runs with no config file at all.

mod parser;
mod types;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, DispatchConfig, EngineConfig, UserAgentConfig};
