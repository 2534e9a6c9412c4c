//! Prometheus exposition for provider and aggregation metrics.
//!
//! Metric names emitted by the crate:
//! - `provider_fetch_ms{provider}` histogram
//! - `provider_failures_total{provider}` counter
//! - `reputation_aggregation_ms` histogram
//! - `reputation_aggregation_failures_total` counter
//! - `reputation_score` gauge

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::utils::error::{Error, Result};

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder. Later calls are no-ops.
pub fn init() -> Result<()> {
    if PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| Error::Other(format!("failed to install metrics recorder: {}", e)))?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

/// The global handle, if [`init`] has run.
pub fn handle() -> Option<&'static PrometheusHandle> {
    PROM_HANDLE.get()
}

/// Current metrics in the Prometheus text format; empty before [`init`].
pub fn render() -> String {
    handle().map(|h| h.render()).unwrap_or_default()
}
