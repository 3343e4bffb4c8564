//! Error-reporting seam between the engine and its caller
//!
//! The engine never logs directly. Parse and incompatibility failures are
//! handed to a [`ResourceLogger`] at the point of detection so the
//! surrounding system can attach them to a Kubernetes Event, a webhook
//! response, or a structured log line.

use tracing::warn;

/// Receives failure reports for one resource's evaluation.
pub trait ResourceLogger {
    /// An annotation (or flag/env) value failed to parse.
    fn invalid_annotation(&self, key: &str, message: &str);

    /// Two mutually exclusive fields were combined in one scope.
    fn incompatible_fields(&self, message: &str);
}

/// Forwards reports to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ResourceLogger for TracingLogger {
    fn invalid_annotation(&self, key: &str, message: &str) {
        warn!(key, message, "invalid annotation value");
    }

    fn incompatible_fields(&self, message: &str) {
        warn!(message, "incompatible fields");
    }
}
