//! Configuration management for the corkboard application.
//!
//! This crate handles loading, validating, and persisting configuration
//! from multiple sources (files, environment variables, defaults).
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`api`]: Task service URL and request timeout
//! - [`columns`]: Default columns and layout storage location
//! - [`env`]: `CORKBOARD_*` environment overrides
//! - [`persistence`]: File locations, config reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! Configuration is loaded from multiple sources with the following priority
//! (highest to lowest):
//!
//! 1. Environment variables (`CORKBOARD_*`)
//! 2. Local config (`./corkboard.json5` or `./corkboard.json`)
//! 3. User config (`~/.config/corkboard/config.json5` or `~/.config/corkboard/config.json`)
//! 4. Built-in defaults
//!
//! # File Format
//!
//! ```json5
//! {
//!   api: {
//!     base_url: "http://127.0.0.1:8000/api",
//!     timeout_secs: 15,
//!   },
//!   columns: {
//!     // Used for projects whose layout was never changed
//!     defaults: ["To Do", "Work In Progress", "Under Review", "Completed"],
//!     store_dir: "/home/me/.local/share/corkboard/columns",
//!   },
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use corkboard_config::Config;
//!
//! # fn example() -> corkboard_config::Result<()> {
//! let config = Config::load()?;
//! println!("Task service: {}", config.api.base_url);
//! println!("Layouts in: {}", config.columns.resolved_store_dir()?.display());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod columns;
pub mod config;
pub mod env;
pub mod error;
pub mod persistence;

// Re-export primary types at crate root for convenience
pub use api::ApiConfig;
pub use columns::ColumnsConfig;
pub use config::Config;
pub use error::{ConfigError, Result};
