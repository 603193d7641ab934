//! Blue-green rotation for Cloud Foundry applications.
//!
//! A push probes the live name and its two retired slots, plans the
//! renames and pushes needed to rotate them, and runs the plan as a saga so
//! that a failed push leaves the original application serving traffic.

mod error;
pub mod operations;
pub mod planner;
pub mod providers;
pub mod request;
pub mod slots;
pub mod traits;

#[cfg(test)]
pub mod mocks;

pub use error::{OperationError, Result};
