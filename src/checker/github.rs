//! GitHub profile existence probe

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};

use super::AvailabilityProbe;
use crate::config_error;
use crate::error::{NameCheckError, Result};
use crate::types::{Availability, CheckConfig, CheckResult};

/// Availability checker backed by HEAD requests against profile URLs
pub struct GithubChecker {
    client: Client,
    base_url: String,
    metrics: Arc<ProbeMetrics>,
}

impl GithubChecker {
    /// Create a checker with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&CheckConfig::default())
    }

    /// Create a checker with custom configuration
    pub fn with_config(config: &CheckConfig) -> Result<Self> {
        config.validate()?;

        if !config.verify_tls {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for availability probes"
            );
        }

        // 3xx must be classified as-is, so redirects are never followed
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::none())
            .danger_accept_invalid_certs(!config.verify_tls)
            .pool_max_idle_per_host(config.concurrency)
            .build()
            .map_err(|e| config_error!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            metrics: Arc::new(ProbeMetrics::default()),
        })
    }

    /// Profile URL probed for a candidate
    pub fn profile_url(&self, candidate: &str) -> String {
        format!("{}/{}", self.base_url, candidate)
    }

    /// Map a response status to an availability outcome
    pub fn classify(status: StatusCode) -> Availability {
        if status == StatusCode::NOT_FOUND {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    async fn probe(&self, url: &str) -> Result<StatusCode> {
        let response = self.client.head(url).send().await.map_err(NameCheckError::from)?;
        Ok(response.status())
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> ProbeMetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl AvailabilityProbe for GithubChecker {
    async fn check(&self, candidate: &str) -> CheckResult {
        let url = self.profile_url(candidate);
        let start_time = Instant::now();

        let availability = match self.probe(&url).await {
            Ok(status) => {
                tracing::debug!(
                    candidate = %candidate,
                    status = %status.as_u16(),
                    duration_ms = %start_time.elapsed().as_millis(),
                    "Probe completed"
                );
                Self::classify(status)
            }
            Err(e) => {
                self.metrics.increment_errors();
                tracing::debug!(candidate = %candidate, error = %e, "Probe failed");
                Availability::Error(probe_error_message(&e))
            }
        };

        let duration = start_time.elapsed();
        self.metrics.record_probe(duration.as_millis() as u64);

        CheckResult::new(candidate, availability).with_duration(duration)
    }

    fn target(&self) -> &str {
        &self.base_url
    }
}

fn probe_error_message(err: &NameCheckError) -> String {
    match err {
        NameCheckError::Network { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Lock-free probe counters
#[derive(Debug, Default)]
pub struct ProbeMetrics {
    probes_sent: AtomicU64,
    errors: AtomicU64,
    total_probe_ms: AtomicU64,
}

impl ProbeMetrics {
    fn record_probe(&self, elapsed_ms: u64) {
        self.probes_sent.fetch_add(1, Ordering::Relaxed);
        self.total_probe_ms.fetch_add(elapsed_ms, Ordering::Relaxed);
    }

    fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProbeMetricsSnapshot {
        ProbeMetricsSnapshot {
            probes_sent: self.probes_sent.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            total_probe_ms: self.total_probe_ms.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`ProbeMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeMetricsSnapshot {
    pub probes_sent: u64,
    pub errors: u64,
    pub total_probe_ms: u64,
}

impl ProbeMetricsSnapshot {
    pub fn avg_probe_time_ms(&self) -> f64 {
        if self.probes_sent == 0 {
            0.0
        } else {
            self.total_probe_ms as f64 / self.probes_sent as f64
        }
    }
}
