//! Integration test suite for vcs-resolver
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=resolver=trace cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: selection rules against an in-memory listing
//! - **caching**: listing reuse, failures, and concurrent callers
//! - **git_remote**: end to end against real repositories via `git ls-remote`

mod caching;
mod git_remote;
mod resolution;
