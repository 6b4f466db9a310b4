//! # HiveHelper API Server Library
//!
//! This library provides the HTTP surface of HiveHelper: session-based
//! authentication and JSON endpoints for hives, health readings and tasks.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with JSON errors
//! - `middleware`: Response-wide middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
