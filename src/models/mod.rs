//! Data models
//!
//! Rust structs representing database entities.

mod product;

pub use product::{Product, ProductCreate, ProductUpdate};
