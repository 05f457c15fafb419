use std::sync::atomic::{AtomicU64, Ordering};

/// Content type of the Prometheus text exposition format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Process-wide request counters
#[derive(Debug, Default)]
pub struct Metrics {
    http_requests_total: AtomicU64,
    chat_requests_total: AtomicU64,
    chat_errors_total: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a page view of the chat interface
    pub fn record_http_request(&self) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts an answered (or failed) chat message
    pub fn record_chat(&self, success: bool) {
        self.chat_requests_total.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.chat_errors_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Prometheus text exposition of all counters
    pub fn prometheus_output(&self) -> String {
        let http = self.http_requests_total.load(Ordering::Relaxed);
        let chats = self.chat_requests_total.load(Ordering::Relaxed);
        let errors = self.chat_errors_total.load(Ordering::Relaxed);

        format!(
            r"# HELP http_requests_total Total HTTP Request
# TYPE http_requests_total counter
http_requests_total {http}
# HELP chat_requests_total Total chat messages handled
# TYPE chat_requests_total counter
chat_requests_total {chats}
# HELP chat_errors_total Chat messages that failed
# TYPE chat_errors_total counter
chat_errors_total {errors}
"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_output_format() {
        let metrics = Metrics::new();
        metrics.record_http_request();
        metrics.record_http_request();
        metrics.record_chat(true);
        metrics.record_chat(false);

        let output = metrics.prometheus_output();

        assert!(output.contains("# TYPE http_requests_total counter"));
        assert!(output.contains("http_requests_total 2\n"));
        assert!(output.contains("chat_requests_total 2\n"));
        assert!(output.contains("chat_errors_total 1\n"));
    }

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = Metrics::new();
        assert_eq!(metrics.http_requests_total(), 0);
        assert!(metrics.prometheus_output().contains("http_requests_total 0\n"));
    }
}
