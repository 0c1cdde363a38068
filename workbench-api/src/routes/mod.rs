//! API route handlers
//!
//! This module contains all route handlers organized by resource:
//!
//! - `health`: Liveness, readiness and detailed health
//! - `auth`: Login
//! - `users`, `products`, `projects`, `project_items`: resource CRUD

pub mod auth;
pub mod health;
pub mod products;
pub mod project_items;
pub mod projects;
pub mod users;
