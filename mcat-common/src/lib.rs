//! # MCAT Common Library
//!
//! Shared code for the MCAT binaries including:
//! - The song record model
//! - Database pool, schema, and song queries
//! - Configuration loading
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::SongRecord;
