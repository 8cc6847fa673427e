//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an empty file crawls the jutsu listing with defaults.
//!
//! # Example
//!
//! ```no_run
//! use jutsu_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will start from: {}", config.crawler.seed_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, HttpConfig, OutputConfig, OutputFormat, SelectorConfig,
    DEFAULT_SEED_URL, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
