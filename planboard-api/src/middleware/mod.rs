//! Custom middleware for the API server
//!
//! - [`auth`]: Bearer-token authentication and per-route role guards
//! - [`security`]: Security response headers

pub mod auth;
pub mod security;
