//! Database plumbing
//!
//! - `pool`: connection pool creation, health check, stats
//! - `migrations`: embedded schema migrations
//!
//! Queries for each resource live in [`crate::repository`].

pub mod migrations;
pub mod pool;
