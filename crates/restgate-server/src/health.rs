//! Liveness and readiness probes.
//!
//! - `GET /health` reports that the process is up, with its uptime.
//! - `GET /ready` reports whether the gateway should receive traffic. It
//!   turns false once shutdown begins, or when any registered check fails.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Body of the `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// Always `"healthy"` while the process answers.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Seconds since the server was built.
    pub uptime_seconds: u64,
}

/// Liveness probe.
///
/// ```
/// use restgate_server::HealthCheck;
///
/// let health = HealthCheck::new("restgate", "0.1.0");
/// assert_eq!(health.status().status, "healthy");
/// ```
#[derive(Debug, Clone)]
pub struct HealthCheck {
    service: String,
    version: String,
    started_at: Instant,
}

impl HealthCheck {
    /// Creates a probe reporting `service` at `version`.
    #[must_use]
    pub fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            started_at: Instant::now(),
        }
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            service: self.service.clone(),
            version: self.version.clone(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

/// Body of the `/ready` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessStatus {
    /// Overall readiness.
    pub ready: bool,
    /// Result of each named check.
    pub checks: BTreeMap<String, bool>,
}

type Check = Arc<dyn Fn() -> bool + Send + Sync>;

/// Readiness probe with named checks.
///
/// ```
/// use restgate_server::ReadinessCheck;
///
/// let readiness = ReadinessCheck::new().add_check("registry", || true);
/// assert!(readiness.is_ready());
///
/// readiness.set_ready(false);
/// assert!(!readiness.is_ready());
/// ```
#[derive(Clone)]
pub struct ReadinessCheck {
    checks: Vec<(String, Check)>,
    accepting: Arc<AtomicBool>,
}

impl std::fmt::Debug for ReadinessCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessCheck")
            .field("checks", &self.checks.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("accepting", &self.accepting.load(Ordering::SeqCst))
            .finish()
    }
}

impl ReadinessCheck {
    /// Creates a probe with no checks, initially ready.
    #[must_use]
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Adds a named check.
    #[must_use]
    pub fn add_check<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.checks.push((name.into(), Arc::new(check)));
        self
    }

    /// Overrides readiness; the server clears it when shutdown starts.
    pub fn set_ready(&self, ready: bool) {
        self.accepting.store(ready, Ordering::SeqCst);
    }

    /// Returns `true` if accepting traffic and every check passes.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::SeqCst) && self.checks.iter().all(|(_, check)| check())
    }

    /// Runs every check and reports the results.
    #[must_use]
    pub fn status(&self) -> ReadinessStatus {
        let checks: BTreeMap<String, bool> = self
            .checks
            .iter()
            .map(|(name, check)| (name.clone(), check()))
            .collect();
        let ready = self.accepting.load(Ordering::SeqCst) && checks.values().all(|&ok| ok);
        ReadinessStatus { ready, checks }
    }
}

impl Default for ReadinessCheck {
    fn default() -> Self {
        Self::new()
    }
}
