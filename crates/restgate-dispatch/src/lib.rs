//! # Restgate Dispatch
//!
//! The verb-based REST request dispatcher.
//!
//! Requests address services through a generic `{service}/{resource}` path.
//! The dispatcher resolves the calling application, the response format and
//! the effective verb (POST can tunnel PUT, MERGE, PATCH, DELETE and GET),
//! then delegates to the named service and renders the result.
//!
//! - [`Dispatcher`] - Two-stage `resolve` then `dispatch` pipeline
//! - [`RequestInput`] - Immutable request view built by the HTTP layer
//! - [`DispatchState`] - Per-request resolved state
//! - [`ResponseFormatter`] / [`RestResponse`] - JSON and XML rendering

#![doc(html_root_url = "https://docs.rs/restgate-dispatch/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod dispatcher;
pub mod format;
pub mod identity;
pub mod path;
mod request;
pub mod response;
mod state;
pub mod tunnel;
pub mod xml;

pub use dispatcher::{DispatchOptions, Dispatcher};
pub use request::{RequestInput, PATH_PARAM};
pub use response::{HttpResponse, ResponseBody, ResponseFormatter, RestResponse};
pub use state::DispatchState;
