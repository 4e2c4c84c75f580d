//! Username availability checking module

pub mod github;

// Re-export main functionality
pub use github::{GithubChecker, ProbeMetrics, ProbeMetricsSnapshot};

use crate::types::CheckResult;
use async_trait::async_trait;

/// Trait for anything that can decide whether a username is free
///
/// Implementations never fail: transport problems are reported as
/// [`Availability::Error`](crate::types::Availability::Error) in the result.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    /// Probe a single candidate
    async fn check(&self, candidate: &str) -> CheckResult;

    /// Name of the service being probed
    fn target(&self) -> &str;
}
