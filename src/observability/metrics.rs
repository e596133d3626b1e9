//! Metrics collection.
//!
//! # Metrics
//! - `router_dispatch_passes_total` (counter): dispatch passes run
//! - `router_notifications_total` (counter): listener notifications by `kind`
//!   (`entered`, `left`)
//! - `router_subscriptions` (gauge): registered subscriptions
//! - `router_navigations_total` (counter): calls to `Router::navigate`
//!
//! # Design Decisions
//! - Records through the `metrics` facade; the host installs an exporter
//! - Without a recorder every call is a no-op

pub fn record_dispatch_pass(entered: usize, left: usize) {
    metrics::counter!("router_dispatch_passes_total").increment(1);
    if entered > 0 {
        metrics::counter!("router_notifications_total", "kind" => "entered").increment(entered as u64);
    }
    if left > 0 {
        metrics::counter!("router_notifications_total", "kind" => "left").increment(left as u64);
    }
}

pub fn record_subscriptions(count: usize) {
    metrics::gauge!("router_subscriptions").set(count as f64);
}

pub fn record_navigation() {
    metrics::counter!("router_navigations_total").increment(1);
}
