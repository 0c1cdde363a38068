//! # Workbench Shared Library
//!
//! Domain types, storage and business rules used by the Workbench API
//! server.
//!
//! ## Module Organization
//!
//! - `models`: users, products, projects and project items
//! - `query`: list filters, pagination and sort parsing
//! - `repository`: PostgreSQL and in-memory storage behind per-resource traits
//! - `services`: validation, defaults and orchestration
//! - `auth`: password hashing and JWT tokens
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod query;
pub mod repository;
pub mod services;

/// Current version of the Workbench shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
