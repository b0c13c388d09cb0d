use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the storefront backend
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Auth Flow Metrics
    pub auth_registrations_total: Counter,
    pub auth_verifications_total: Counter,
    pub auth_logins_total: CounterVec,
    pub auth_password_resets_total: Counter,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("fitwear"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("fitwear")
                .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        let auth_registrations_total = Counter::with_opts(
            Opts::new("auth_registrations_total", "Accounts created").namespace("fitwear"),
        )?;
        registry.register(Box::new(auth_registrations_total.clone()))?;

        let auth_verifications_total = Counter::with_opts(
            Opts::new("auth_verifications_total", "Accounts verified by OTP").namespace("fitwear"),
        )?;
        registry.register(Box::new(auth_verifications_total.clone()))?;

        let auth_logins_total = CounterVec::new(
            Opts::new("auth_logins_total", "Login attempts by outcome").namespace("fitwear"),
            &["outcome"],
        )?;
        registry.register(Box::new(auth_logins_total.clone()))?;

        let auth_password_resets_total = Counter::with_opts(
            Opts::new("auth_password_resets_total", "Completed password resets")
                .namespace("fitwear"),
        )?;
        registry.register(Box::new(auth_password_resets_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            auth_registrations_total,
            auth_verifications_total,
            auth_logins_total,
            auth_password_resets_total,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
