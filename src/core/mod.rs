//! Core types shared across the crate.
//!
//! At the moment this is the error taxonomy; see [`error`] for how resolution,
//! and git failures are separated.

pub mod error;

pub use error::{GitError, ResolveError};
