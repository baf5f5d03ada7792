//! Health Score Manager (HSM) Library
//!
//! Health scoring for packaged foods and beverages, plus the product store
//! and MCP tools around it.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod scoring;
pub mod tools;
