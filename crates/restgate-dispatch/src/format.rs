//! Response format selection.

use restgate_core::ResponseFormat;

use crate::RequestInput;

/// Parameter naming the response format.
pub const FORMAT_PARAM: &str = "format";

/// Returns the lower-cased `format` parameter, or `default` when it is
/// missing or empty.
///
/// Unsupported values pass through; the formatter rejects them.
#[must_use]
pub fn resolve_format(input: &RequestInput, default: &ResponseFormat) -> ResponseFormat {
    input
        .param(FORMAT_PARAM)
        .map_or_else(|| default.clone(), ResponseFormat::parse)
}
