//! Per-request dispatch state.

use restgate_core::{RequestContext, ResponseFormat};

/// Everything resolved before delegation.
///
/// Built by [`Dispatcher::resolve`](crate::Dispatcher::resolve) and owned by
/// a single request.
#[derive(Debug, Clone)]
pub struct DispatchState {
    /// Negotiated response format.
    pub format: ResponseFormat,
    /// Target service; empty for the index.
    pub service: String,
    /// Resource within the service; may be empty.
    pub resource: String,
    /// Whether GETs return API descriptions instead of data.
    pub documentation_mode: bool,
    /// Request context carrying the resolved application name.
    pub context: RequestContext,
}

impl DispatchState {
    /// The resolved application name.
    #[must_use]
    pub fn application_name(&self) -> &str {
        self.context.application_name().unwrap_or_default()
    }

    /// Returns `true` if the request targets the service index.
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.service.is_empty()
    }
}
