//! Lookbook Core - Foundational types for the Lookbook studio
//!
//! This crate provides the core types that all other Lookbook crates depend on:
//! - `Mode` - The three workspace tabs (Spotlight, Lifestyle, Shot Lab)
//! - `DataUrl` - Encoded image payloads addressable as `data:` URLs
//! - Error types and Result alias

mod data_url;
mod error;
mod mode;

pub use data_url::DataUrl;
pub use error::{LookbookError, Result};
pub use mode::Mode;
