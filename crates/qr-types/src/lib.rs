//! Foundation types for the QR console.
//!
//! This crate holds the types shared by every other crate in the workspace:
//! the error enum, the tagged argument value type, and the shell
//! configuration.

pub mod config;
pub mod error;
pub mod value;
