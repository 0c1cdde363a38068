//! Middleware for the API server
//!
//! - `auth`: Bearer token validation for the `/v1` resource routes

pub mod auth;
