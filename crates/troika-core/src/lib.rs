//! # troika-core
//!
//! Core crate for Troika. Contains the unified error system, the site
//! configuration store, and logging setup.
//!
//! This crate has **no** internal dependencies on other Troika crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;

pub use config::{CONFIG_FILE_ENV, Config, ConfigSource, SiteConfig, SiteLookup};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
