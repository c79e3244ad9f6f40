//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, outcome, status
//! - `router_request_duration_seconds` (histogram): dispatch + handler latency
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Outcome label is `matched` or `no_match`, never the raw path
//! - Method label is a routed method or `OTHER`, never an arbitrary client token

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Method label for requests whose method has no routes.
pub const OTHER_METHOD: &str = "OTHER";

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Pick the `method` label for a request.
///
/// Returns the upper-cased method when it is one of `routed`, otherwise
/// [`OTHER_METHOD`]. Keeps the label set bounded by the route table.
pub fn method_label<'a>(method: &str, routed: impl IntoIterator<Item = &'a str>) -> String {
    let method = method.trim();
    routed
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(method))
        .map(str::to_string)
        .unwrap_or_else(|| OTHER_METHOD.to_string())
}

/// Record a served request. `method` should come from [`method_label`].
pub fn record_request(method: String, outcome: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "router_requests_total",
        "method" => method,
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "router_request_duration_seconds",
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with<F: FnOnce()>(f: F) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        ::metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    fn series<'a>(rendered: &'a str, name: &str) -> Vec<&'a str> {
        rendered
            .lines()
            .filter(|line| line.starts_with(name) && !line.starts_with('#'))
            .collect()
    }

    #[test]
    fn test_method_label() {
        let routed = ["GET", "POST"];
        assert_eq!(method_label("GET", routed), "GET");
        assert_eq!(method_label(" post ", routed), "POST");
        assert_eq!(method_label("DELETE", routed), OTHER_METHOD);
        assert_eq!(method_label("X-CUSTOM", routed), OTHER_METHOD);
        assert_eq!(method_label("GET", []), OTHER_METHOD);
    }

    #[test]
    fn test_request_counter_names_and_labels() {
        let rendered = render_with(|| {
            record_request("GET".into(), "matched", 200, Instant::now());
            record_request("GET".into(), "matched", 200, Instant::now());
            record_request(OTHER_METHOD.into(), "no_match", 404, Instant::now());
        });

        let counters = series(&rendered, "router_requests_total{");
        assert_eq!(counters.len(), 2, "{rendered}");

        let matched = counters
            .iter()
            .find(|line| line.contains("outcome=\"matched\""))
            .unwrap();
        assert!(matched.contains("method=\"GET\""));
        assert!(matched.contains("status=\"200\""));
        assert!(matched.ends_with(" 2"));

        let missed = counters
            .iter()
            .find(|line| line.contains("outcome=\"no_match\""))
            .unwrap();
        assert!(missed.contains("method=\"OTHER\""));
        assert!(missed.contains("status=\"404\""));
        assert!(missed.ends_with(" 1"));
    }

    #[test]
    fn test_duration_histogram_by_outcome() {
        let rendered = render_with(|| {
            record_request("GET".into(), "matched", 200, Instant::now());
            record_request("GET".into(), "no_match", 404, Instant::now());
        });

        let counts = series(&rendered, "router_request_duration_seconds_count");
        assert_eq!(counts.len(), 2, "{rendered}");
        assert!(counts.iter().any(|line| line.contains("outcome=\"matched\"")));
        assert!(counts.iter().any(|line| line.contains("outcome=\"no_match\"")));
        assert!(counts.iter().all(|line| !line.contains("method=")));
    }
}
