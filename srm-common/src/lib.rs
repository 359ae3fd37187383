//! # SRM Common Library
//!
//! Shared code for the school records manager services including:
//! - Database bootstrap and versioned migrations
//! - Student and teacher row models
//! - The fixed subject catalog
//! - Configuration loading
//! - The common error taxonomy

pub mod config;
pub mod db;
pub mod error;
pub mod subjects;

pub use error::{Error, ErrorKind, Result};
pub use subjects::Subject;
