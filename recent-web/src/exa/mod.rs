//! Exa search API integration.
//!
//! `types` holds the wire models, `client` the authenticated wrapper around
//! `POST /search`.
pub mod client;
pub mod types;

pub use client::ExaApi;
