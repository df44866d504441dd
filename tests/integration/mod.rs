//! Integration test suite for soltpl
//!
//! End-to-end tests of the `soltpl` binary and of the library pipeline from
//! capture to deployment.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **order**: build order, missing dependencies and patch lists
//! - **templatize**: item id and field templatization
//! - **resolve**: placeholder resolution and `check`
//! - **config**: configuration discovery and settings
//! - **workflow**: capture, field caching and a full deployment session

#[path = "../common/mod.rs"]
mod common;

mod config;
mod order;
mod resolve;
mod templatize;
mod workflow;
