//! # hestia-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept free-text commands and hand them to the home core
//! - Expose status, devices and scenes as JSON
//! - Map [`HestiaError`](hestia_domain::error::HestiaError) to HTTP status codes
//!
//! ## Dependency rule
//! Depends on `hestia-app` (for the `Home` facade and port traits) and
//! `hestia-domain` (for request/response mapping). Never leaks axum types
//! into the core.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
