//! # Restgate Server
//!
//! HTTP front end for the restgate dispatcher, built on hyper and tokio.
//!
//! - One catch-all route under a configurable prefix (`/rest` by default)
//! - Query string and url-encoded form parameters merged for the dispatcher
//! - Body size limit and request timeout
//! - `/health` and `/ready` probes
//! - Graceful shutdown on SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use restgate_server::{Server, ServerConfig};
//!
//! let server = Server::new(ServerConfig::default(), Arc::new(dispatcher));
//! server.run().await?;
//! ```

#![doc(html_root_url = "https://docs.rs/restgate-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod health;
pub mod routing;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_REST_PREFIX,
};
pub use health::{HealthCheck, HealthStatus, ReadinessCheck, ReadinessStatus};
pub use server::{Server, ServerError};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
