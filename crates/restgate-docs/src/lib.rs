//! # Restgate Docs
//!
//! Swagger 1.2 documentation for restgate services, served when a request
//! arrives in documentation mode.
//!
//! - [`SwaggerCatalog`] - The [`DocumentationProvider`](restgate_core::DocumentationProvider)
//!   implementation
//! - [`ResourceListing`] / [`ApiDeclaration`] - Swagger 1.2 documents

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod error;
mod swagger;

pub use catalog::SwaggerCatalog;
pub use error::{DocsError, DocsResult};
pub use swagger::{
    Api, ApiDeclaration, Operation, ParamType, Parameter, ResourceListing, ResourceSummary,
    ResponseMessage, SWAGGER_VERSION,
};
