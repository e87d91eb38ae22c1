//! Configuration module for Finsight
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; omitted keys take their defaults.
//!
//! # Example
//!
//! ```no_run
//! use finsight::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("finsight.toml")).unwrap();
//! println!("Page fetch timeout: {}ms", config.http.fetch_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BackgroundConfig, BatchConfig, Config, ExtractorConfig, HttpConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
