//! Thin driver for the Cloud Foundry `cf` command-line client.
//!
//! Mutating operations shell out to `cf` with the terminal attached. Queries
//! go through `cf curl` against the v2 API and are decoded with serde.

mod cli;
mod config;
mod error;
pub mod response;

pub use cli::{CfCli, DEFAULT_BINARY, apps_query};
pub use config::{CfConfig, Space, config_path};
pub use error::CfError;

pub type Result<T> = std::result::Result<T, CfError>;
