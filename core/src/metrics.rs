//! Dispatch metrics.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the host
//! installs a recorder (e.g. a Prometheus exporter).
//!
//! | metric                            | type      | labels    |
//! |-----------------------------------|-----------|-----------|
//! | `mvc_dispatch_total`              | counter   | `outcome` |
//! | `mvc_dispatch_deferred_total`     | counter   | `reason`  |
//! | `mvc_dispatch_errors_total`       | counter   | `kind`    |
//! | `mvc_dispatch_duration_seconds`   | histogram |           |
//! | `mvc_observer_failures_total`     | counter   |           |

use ::metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Register metric descriptions with the installed recorder.
pub fn register_metrics() {
    describe_counter!(
        "mvc_dispatch_total",
        "Total number of dispatches by outcome (responded, deferred, error)"
    );
    describe_counter!(
        "mvc_dispatch_deferred_total",
        "Total number of requests handed back to the host chain, by reason"
    );
    describe_counter!(
        "mvc_dispatch_errors_total",
        "Total number of hard dispatch failures, by kind"
    );
    describe_histogram!(
        "mvc_dispatch_duration_seconds",
        "Time taken to dispatch a request"
    );
    describe_counter!(
        "mvc_observer_failures_total",
        "Total number of lifecycle observer failures"
    );
}

pub(crate) fn record_responded(elapsed: Duration) {
    counter!("mvc_dispatch_total", "outcome" => "responded").increment(1);
    histogram!("mvc_dispatch_duration_seconds").record(elapsed.as_secs_f64());
}

pub(crate) fn record_deferred(reason: &'static str, elapsed: Duration) {
    counter!("mvc_dispatch_total", "outcome" => "deferred").increment(1);
    counter!("mvc_dispatch_deferred_total", "reason" => reason).increment(1);
    histogram!("mvc_dispatch_duration_seconds").record(elapsed.as_secs_f64());
}

pub(crate) fn record_error(kind: &'static str, elapsed: Duration) {
    counter!("mvc_dispatch_total", "outcome" => "error").increment(1);
    counter!("mvc_dispatch_errors_total", "kind" => kind).increment(1);
    histogram!("mvc_dispatch_duration_seconds").record(elapsed.as_secs_f64());
}

pub(crate) fn record_observer_failure() {
    counter!("mvc_observer_failures_total").increment(1);
}
