//! Core metrics definitions.
//!
//! All metrics follow Prometheus naming conventions:
//! - `_total` suffix for counters
//! - plain names for gauges

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Register all core metrics with descriptions.
pub fn register_core_metrics() {
    describe_counter!("vmwd_reconcile_total", "Total number of inventory reconciliation passes");
    describe_counter!(
        "vmwd_reconcile_failures_total",
        "Total number of failed reconciliation passes (by reason)"
    );
    describe_counter!(
        "vmwd_domains_discovered_total",
        "Total number of running domains discovered through vmrun list"
    );
    describe_gauge!("vmwd_domain_count", "Current number of registered domains");
}

pub fn record_reconcile() {
    counter!("vmwd_reconcile_total").increment(1);
}

pub fn record_reconcile_failure(reason: &'static str) {
    counter!("vmwd_reconcile_failures_total", "reason" => reason).increment(1);
}

pub fn record_domain_discovered() {
    counter!("vmwd_domains_discovered_total").increment(1);
}

pub fn set_domain_count(count: usize) {
    gauge!("vmwd_domain_count").set(count as f64);
}
