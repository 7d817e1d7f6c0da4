//! Microsoft Graph directory access
//!
//! Client-credentials authentication, OData query building and a paginated
//! group membership reader. Everything goes through the `GraphTransport`
//! trait so the HTTP layer can be swapped out in tests.

pub mod auth;
pub mod client;
pub mod models;
pub mod query;
pub mod resilience;
pub mod transport;

pub use client::GraphClient;
