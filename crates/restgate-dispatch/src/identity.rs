//! Calling-application identity.
//!
//! Every request must say which application is calling. The first non-empty
//! source wins:
//!
//! 1. `X-DreamFactory-Application-Name` header
//! 2. `X-Application-Name` header (legacy)
//! 3. `app_name` parameter
//! 4. `swagger_app_name` parameter, which also turns on documentation mode

use restgate_core::{GateError, GateResult};

use crate::RequestInput;

/// Namespaced application header.
pub const APPLICATION_NAME_HEADER: &str = "x-dreamfactory-application-name";
/// Legacy application header.
pub const LEGACY_APPLICATION_NAME_HEADER: &str = "x-application-name";
/// Application name parameter.
pub const APP_NAME_PARAM: &str = "app_name";
/// Application name parameter sent by the documentation UI.
pub const SWAGGER_APP_NAME_PARAM: &str = "swagger_app_name";

/// Message returned when no source names the application.
pub const MISSING_APPLICATION_NAME: &str =
    "No application name header or parameter value in REST request.";

/// The resolved caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    /// Application name.
    pub name: String,
    /// `true` when the name came from `swagger_app_name`.
    pub documentation_mode: bool,
}

/// Resolves the calling application.
///
/// Returns a `BadRequest` when every source is missing or empty.
pub fn resolve_identity(input: &RequestInput) -> GateResult<AppIdentity> {
    let regular = input
        .header(APPLICATION_NAME_HEADER)
        .or_else(|| input.header(LEGACY_APPLICATION_NAME_HEADER))
        .or_else(|| input.param(APP_NAME_PARAM));

    if let Some(name) = regular {
        return Ok(AppIdentity {
            name: name.to_string(),
            documentation_mode: false,
        });
    }

    input
        .param(SWAGGER_APP_NAME_PARAM)
        .map(|name| AppIdentity {
            name: name.to_string(),
            documentation_mode: true,
        })
        .ok_or_else(|| GateError::bad_request(MISSING_APPLICATION_NAME))
}
