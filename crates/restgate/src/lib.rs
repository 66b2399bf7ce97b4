//! # Restgate
//!
//! A verb-based REST gateway. Requests for `/{prefix}/{service}/{resource}`
//! are routed to named services; POST requests can carry another verb
//! through the `X-HTTP-Method` header or the `method` parameter; the bare
//! prefix lists available services.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use restgate::Gateway;
//! use restgate_config::ConfigLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::new().with_env_prefix("RESTGATE").load()?;
//!     Gateway::demo(config).into_server().run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Request flow
//!
//! ```text
//! HTTP → Server (route, body, params) → Dispatcher (resolve → dispatch)
//!      → ServiceObject → ResponseFormatter → HTTP
//! ```

#![doc(html_root_url = "https://docs.rs/restgate/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builtin;
mod gateway;
pub mod store;

pub use gateway::Gateway;

pub use restgate_config as config;
pub use restgate_core as core;
pub use restgate_dispatch as dispatch;
pub use restgate_docs as docs;
pub use restgate_server as server;
pub use restgate_telemetry as telemetry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
