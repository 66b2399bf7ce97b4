//! Verb tunneling over POST.
//!
//! Clients that can only send GET and POST name the real verb in the
//! `X-HTTP-Method` header or, failing that, the `method` parameter. Only
//! POST requests are inspected.

use restgate_core::{GateError, GateResult, Verb};

use crate::RequestInput;

/// Header carrying the tunneled verb.
pub const TUNNEL_HEADER: &str = "x-http-method";
/// Parameter carrying the tunneled verb.
pub const TUNNEL_PARAM: &str = "method";

/// Returns the raw tunnel value, header first.
#[must_use]
pub fn tunnel_value(input: &RequestInput) -> Option<&str> {
    input
        .header(TUNNEL_HEADER)
        .or_else(|| input.param(TUNNEL_PARAM))
}

/// Parses a tunnel value, case-insensitively.
///
/// `patch` is an alias for MERGE. Anything unrecognized is a `BadRequest`
/// naming the value as sent.
pub fn parse_tunnel_verb(value: &str) -> GateResult<Verb> {
    match value.to_ascii_lowercase().as_str() {
        "get" => Ok(Verb::Get),
        "post" => Ok(Verb::Post),
        "put" => Ok(Verb::Put),
        "merge" | "patch" => Ok(Verb::Merge),
        "delete" => Ok(Verb::Delete),
        _ => Err(GateError::bad_request(format!(
            "Unknown tunneling verb '{value}' in REST request."
        ))),
    }
}

/// Returns the verb a POST request tunnels, or `None` if it tunnels nothing.
pub fn tunneled_verb(input: &RequestInput) -> GateResult<Option<Verb>> {
    tunnel_value(input).map(parse_tunnel_verb).transpose()
}
