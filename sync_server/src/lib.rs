//! # Sync server
//! The webhook listener for the Erply ↔ Voog product sync, and the `ProductCatalog` implementations that connect the
//! sync engine to both systems.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/healthz`: A health check route that returns `{"ok": true}`.
//! * `/voog/order-webhook`: Receives Voog order notifications and refreshes the ordered SKUs' stock from Erply.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod order_webhook;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
