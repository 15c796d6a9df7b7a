//! Core library for the NWS weather tool server.
//!
//! This crate defines:
//! - Configuration handling
//! - The HTTP fetch seam against the National Weather Service API
//! - The forecast and alert lookup pipelines
//! - The tool registry exposing both pipelines as named operations
//!
//! It is used by `nws-server`, but can also be reused by other binaries or services.

pub mod alerts;
pub mod client;
pub mod config;
pub mod forecast;
pub mod model;
pub mod tool;

pub use client::{FetchError, NwsClient, NwsFetch};
pub use config::Config;
pub use model::Coordinate;
pub use tool::{Tool, ToolError, ToolRegistry, ToolSpec, registry_from_config};

/// Separator placed between rendered forecast and alert blocks.
pub const BLOCK_SEPARATOR: &str = "\n---\n";
