//! # Planboard API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `bootstrap`: Startup seeding of the first admin account
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Body and path extractors with JSON rejections
//! - `middleware`: Authentication, role guards and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
