//! Task service client for corkboard.
//!
//! This crate provides the [`TaskService`] trait describing the four remote
//! task operations the board relies on, along with two implementations:
//!
//! - [`HttpTaskService`]: JSON over HTTP against the real service
//! - [`MemoryTaskService`]: an in-process store for demos and tests
//!
//! # Example
//!
//! ```no_run
//! use corkboard_api::{HttpTaskService, TaskService};
//! use corkboard_config::Config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let service = HttpTaskService::new(&config.api)?;
//!
//! for task in service.fetch_tasks(1).await? {
//!     println!("#{} {}", task.id, task.title);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod memory;
mod service;

pub use client::HttpTaskService;
pub use error::{Error, Result};
pub use memory::MemoryTaskService;
pub use service::TaskService;
