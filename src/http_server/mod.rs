//! # cardvault HTTP Server Module
//!
//! Serves the card API over HTTP.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/cards` - Card CRUD, keyed by `?user=&cardID=`

pub mod config;
pub mod health;
pub mod server;

pub use config::{HttpServerConfig, PORT_ENV};
pub use server::HttpServer;
