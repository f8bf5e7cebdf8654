//! ipgeo - IP geolocation lookups normalized across providers
//!
//! Queries third-party geolocation APIs and maps their heterogeneous
//! responses into one record shape and one small error taxonomy.
//!
//! # Architecture
//! - `services`: provider adapters, registry and lookup orchestration
//! - `api`: HTTP handlers, error responses and middleware
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging initialization

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
