//! The immutable view of an incoming request.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use restgate_core::RequestParams;

/// Name of the parameter carrying `service/resource`.
pub const PATH_PARAM: &str = "path";

/// Everything the dispatcher reads from a request.
///
/// Built once by the HTTP layer and never modified by the dispatcher.
///
/// ```
/// use http::{HeaderValue, Method};
/// use restgate_dispatch::RequestInput;
///
/// let input = RequestInput::new(Method::GET, "/rest/db/todo/")
///     .with_param("path", "db/todo")
///     .with_header("x-application-name", HeaderValue::from_static("admin"));
///
/// assert_eq!(input.path(), "db/todo");
/// assert_eq!(input.header("X-Application-Name"), Some("admin"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestInput {
    method: Method,
    uri: String,
    headers: HeaderMap,
    params: RequestParams,
    body: Bytes,
}

impl RequestInput {
    /// Creates a request with no headers, parameters or body.
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderMap::new(),
            params: RequestParams::new(),
            body: Bytes::new(),
        }
    }

    /// Replaces the header map.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a header. `name` must be a lower-case header name.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: HeaderValue) -> Self {
        self.headers.insert(HeaderName::from_static(name), value);
        self
    }

    /// Replaces the request parameters.
    #[must_use]
    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }

    /// Adds a request parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// The HTTP method as declared on the wire.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw request URI, including any query string.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// All request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Merged request parameters.
    #[must_use]
    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    /// The request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns a parameter value if present and non-empty.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Returns a header value if present, valid UTF-8 and non-empty.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    /// The routed `service/resource` path, or empty.
    #[must_use]
    pub fn path(&self) -> &str {
        self.param(PATH_PARAM).unwrap_or_default()
    }
}
