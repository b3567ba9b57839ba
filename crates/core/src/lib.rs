//! Core library for the task tracker
//!
//! This crate contains the persistence boundary of the application:
//! - The task model and its creation rules
//! - The repository trait the API layer talks to
//! - The SQLite store adapter

pub mod error;
pub mod task;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
