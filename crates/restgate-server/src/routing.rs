//! Mapping HTTP requests onto dispatcher input.
//!
//! Every path under the REST prefix is a single route. The remainder after
//! the prefix, percent-decoded and with surrounding slashes stripped, becomes
//! the `path` parameter; the dispatcher recovers a meaningful trailing slash from the
//! raw URI.

use std::borrow::Cow;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use restgate_core::RequestParams;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Where a request path leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Liveness probe.
    Health,
    /// Readiness probe.
    Ready,
    /// A REST route; the string is `service/resource` and may be empty.
    Rest(String),
    /// Outside the REST prefix.
    Unmatched,
}

/// Matches a URL path against the REST prefix.
///
/// The remainder is percent-decoded. A remainder that does not decode to
/// UTF-8 is kept as written.
///
/// ```
/// use restgate_server::routing::{match_route, Route};
///
/// assert_eq!(match_route("/rest", "/rest/db/todo/"), Route::Rest("db/todo".into()));
/// assert_eq!(match_route("/rest", "/rest"), Route::Rest(String::new()));
/// assert_eq!(match_route("/rest", "/restful"), Route::Unmatched);
/// assert_eq!(match_route("/rest", "/rest/db/my%20table"), Route::Rest("db/my table".into()));
/// ```
#[must_use]
pub fn match_route(prefix: &str, path: &str) -> Route {
    match path {
        "/health" => return Route::Health,
        "/ready" => return Route::Ready,
        _ => {}
    }

    let remainder = if prefix == "/" {
        Some(path)
    } else {
        path.strip_prefix(prefix)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
    };

    remainder.map_or(Route::Unmatched, |rest| {
        let decoded = urlencoding::decode(rest).unwrap_or_else(|e| {
            tracing::debug!(error = %e, path = rest, "keeping undecodable path as written");
            Cow::Borrowed(rest)
        });
        Route::Rest(decoded.trim_matches('/').to_string())
    })
}

/// Merges the query string and a url-encoded form body.
///
/// Query values win over form values with the same name. Within one source,
/// the last occurrence of a name wins. Undecodable input contributes nothing.
#[must_use]
pub fn collect_params(query: Option<&str>, headers: &HeaderMap, body: &Bytes) -> RequestParams {
    let mut params = RequestParams::new();

    for (name, value) in decode_pairs(query.unwrap_or_default().as_bytes()) {
        params.insert(name, value);
    }

    if is_form(headers) {
        let mut form = RequestParams::new();
        for (name, value) in decode_pairs(body) {
            form.insert(name, value);
        }
        for (name, value) in form {
            params.entry(name).or_insert(value);
        }
    }

    params
}

fn decode_pairs(input: &[u8]) -> Vec<(String, String)> {
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(input) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring undecodable parameters");
            Vec::new()
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}
