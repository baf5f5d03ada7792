//! HSM Tools module
//!
//! MCP tool implementations for the Health Score Manager.

pub mod products;
pub mod scoring;
pub mod status;
