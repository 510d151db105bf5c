//! Prometheus metrics
//!
//! Counters and histograms for the pipeline flows, exposed on
//! `GET /metrics` via the prometheus exporter's render handle.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the prometheus recorder and register metric descriptions
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_metrics() {
    if HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            describe_counter!("leadflow_leads_ingested_total", "Leads accepted by the ingestion webhook");
            describe_counter!("leadflow_qualifications_total", "Qualification results recorded, by status");
            describe_counter!("leadflow_activations_total", "Leads activated");
            describe_counter!("leadflow_quota_rejections_total", "Activation batches rejected by the daily quota");
            describe_counter!("leadflow_dispatches_total", "Leads handed to the contact automation");
            describe_counter!("leadflow_dispatch_reverts_total", "Leads reverted after delivery failure");
            describe_histogram!("leadflow_report_duration_seconds", "Dashboard report computation time");

            let _ = HANDLE.set(handle);
            tracing::info!("prometheus metrics initialized");
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to install metrics recorder");
        }
    }
}

/// Render the prometheus exposition text
pub async fn metrics_handler() -> String {
    HANDLE.get().map(|h| h.render()).unwrap_or_default()
}

pub fn record_lead_ingested() {
    counter!("leadflow_leads_ingested_total").increment(1);
}

pub fn record_qualification(status: &str) {
    counter!("leadflow_qualifications_total", "status" => status.to_string()).increment(1);
}

pub fn record_activation(count: u64) {
    counter!("leadflow_activations_total").increment(count);
}

pub fn record_quota_rejection() {
    counter!("leadflow_quota_rejections_total").increment(1);
}

pub fn record_dispatch(dispatched: u64, reverted: u64) {
    counter!("leadflow_dispatches_total").increment(dispatched);
    counter!("leadflow_dispatch_reverts_total").increment(reverted);
}

pub fn record_report_duration(report: &'static str, seconds: f64) {
    histogram!("leadflow_report_duration_seconds", "report" => report).record(seconds);
}
