//! # Restgate Core
//!
//! Core types and collaborator traits for the restgate REST dispatcher.
//!
//! - [`RequestContext`] - Per-request context carrying the calling application
//! - [`RequestId`] - UUID v7 request identifier
//! - [`GateError`] - Standard error type, mapped to HTTP status codes
//! - [`Verb`] and [`ResponseFormat`] - What a request asks for
//! - [`ServiceHandler`] / [`ServiceObject`] - Named backend services
//! - [`ServiceRegistry`] - The persisted list of configured services
//! - [`DocumentationProvider`] - API descriptions for documentation mode

#![doc(html_root_url = "https://docs.rs/restgate-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod docs;
mod error;
mod format;
mod registry;
mod service;
mod verb;

pub use context::{RequestContext, RequestId};
pub use docs::DocumentationProvider;
pub use error::{ErrorDetail, ErrorEnvelope, ErrorKind, GateError, GateResult};
pub use format::ResponseFormat;
pub use registry::{InMemoryRegistry, ServiceEntry, ServiceRegistry};
pub use service::{RequestParams, ServiceCall, ServiceCatalog, ServiceHandler, ServiceObject};
pub use verb::Verb;
