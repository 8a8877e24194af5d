use perfreport_core::Diagnostic;
use tracing::warn;

/// Receives non-fatal ingestion diagnostics, e.g. the build console of the job being reported on.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, report_identifier: &str, diagnostic: &Diagnostic);
}

/// Default sink; forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, report_identifier: &str, diagnostic: &Diagnostic) {
        warn!(report = report_identifier, "{diagnostic}");
    }
}
