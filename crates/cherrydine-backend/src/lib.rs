//! Backend runtime entry point and public API surface.
//!
//! This crate owns the backend lifecycle, routes bridge messages to the cart
//! services and holds the HTTP client used to reach the restaurant's site.

pub mod api;
mod app;
mod config;
mod runtime;
mod services;

pub use crate::config::{ConfigError, load_config};
pub use crate::runtime::run;
