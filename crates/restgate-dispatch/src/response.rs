//! Result and error emission.
//!
//! The dispatcher never builds HTTP bodies itself. It hands a payload, or an
//! error, to a [`ResponseFormatter`] together with the negotiated format.

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use restgate_core::{GateError, RequestId, ResponseFormat};
use serde_json::Value;

use crate::xml;

/// Type alias for HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Root element of XML responses.
pub const XML_ROOT: &str = "dfapi";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Serializes results and errors into HTTP responses.
pub trait ResponseFormatter: Send + Sync + 'static {
    /// Renders a successful result.
    ///
    /// `forced_format` overrides `default_format` when set; documentation
    /// responses force `json`.
    fn send_results(
        &self,
        result: &Value,
        status: StatusCode,
        forced_format: Option<&ResponseFormat>,
        default_format: &ResponseFormat,
    ) -> HttpResponse;

    /// Renders an error, with its status derived from the error kind.
    fn send_errors(
        &self,
        error: &GateError,
        format: &ResponseFormat,
        request_id: Option<RequestId>,
    ) -> HttpResponse;
}

/// The default formatter: JSON and XML.
///
/// Other formats are rejected with `400 Bad Request`, rendered as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestResponse;

impl RestResponse {
    /// Creates the formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render(status: StatusCode, format: &ResponseFormat, payload: &Value) -> Option<HttpResponse> {
        let (content_type, body) = match format {
            ResponseFormat::Json => (JSON_CONTENT_TYPE, serde_json::to_vec(payload).ok()?),
            ResponseFormat::Xml => (XML_CONTENT_TYPE, xml::to_xml(XML_ROOT, payload).into_bytes()),
            ResponseFormat::Other(_) => return None,
        };
        Some(build(status, content_type, Bytes::from(body)))
    }

    fn unsupported(format: &ResponseFormat) -> GateError {
        GateError::bad_request(format!("Unsupported response format '{format}'."))
    }
}

impl ResponseFormatter for RestResponse {
    fn send_results(
        &self,
        result: &Value,
        status: StatusCode,
        forced_format: Option<&ResponseFormat>,
        default_format: &ResponseFormat,
    ) -> HttpResponse {
        let format = forced_format.unwrap_or(default_format);
        Self::render(status, format, result)
            .unwrap_or_else(|| self.send_errors(&Self::unsupported(format), format, None))
    }

    fn send_errors(
        &self,
        error: &GateError,
        format: &ResponseFormat,
        request_id: Option<RequestId>,
    ) -> HttpResponse {
        let request_id = request_id.map(|id| id.to_string());
        let envelope = error.to_envelope(request_id.as_deref());
        let payload = serde_json::to_value(&envelope).unwrap_or(Value::Null);

        let mut response = Self::render(error.status_code(), format, &payload)
            .or_else(|| Self::render(error.status_code(), &ResponseFormat::Json, &payload))
            .unwrap_or_else(|| build(error.status_code(), JSON_CONTENT_TYPE, Bytes::new()));

        if let Some(id) = request_id.and_then(|id| HeaderValue::from_str(&id).ok()) {
            response.headers_mut().insert("x-request-id", id);
        }
        response
    }
}

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
