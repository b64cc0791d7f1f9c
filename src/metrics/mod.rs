//! Prometheus metrics for the optimizer service

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    /// Labelled by `outcome`: success, invalid_request, insufficient_data, timeout, error
    pub optimizations_total: IntCounterVec,
    pub optimization_duration_seconds: Histogram,
    pub strategy_cache_hits_total: IntCounter,
    pub strategy_cache_misses_total: IntCounter,
    pub snapshot_refresh_failures_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = IntGauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let optimizations_total = IntCounterVec::new(
            Opts::new(
                "dca_optimizations_total",
                "DCA optimization calls by outcome",
            ),
            &["outcome"],
        )?;
        let optimization_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "dca_optimization_duration_seconds",
                "Wall time spent computing a DCA strategy",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        let strategy_cache_hits_total = IntCounter::new(
            "strategy_cache_hits_total",
            "Strategy results served from cache",
        )?;
        let strategy_cache_misses_total = IntCounter::new(
            "strategy_cache_misses_total",
            "Strategy results computed because no cached entry existed",
        )?;
        let snapshot_refresh_failures_total = IntCounter::new(
            "snapshot_refresh_failures_total",
            "Failed attempts to refresh the price snapshot",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(optimizations_total.clone()))?;
        registry.register(Box::new(optimization_duration_seconds.clone()))?;
        registry.register(Box::new(strategy_cache_hits_total.clone()))?;
        registry.register(Box::new(strategy_cache_misses_total.clone()))?;
        registry.register(Box::new(snapshot_refresh_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            optimizations_total,
            optimization_duration_seconds,
            strategy_cache_hits_total,
            strategy_cache_misses_total,
            snapshot_refresh_failures_total,
        })
    }

    pub fn record_optimization(&self, outcome: &str) {
        self.optimizations_total.with_label_values(&[outcome]).inc();
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
