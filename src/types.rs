//! Core types and structures for gh-namecheck

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::config_error;
use crate::error::{NameCheckError, Result};

/// Default probe target
pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of probing a single candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "message")]
pub enum Availability {
    Available,
    Unavailable,
    Error(String),
}

impl Availability {
    /// Category this outcome is recorded under
    pub fn category(&self) -> Category {
        match self {
            Availability::Available => Category::Available,
            Availability::Unavailable => Category::Unavailable,
            Availability::Error(_) => Category::Errors,
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Availability::Available => write!(f, "available"),
            Availability::Unavailable => write!(f, "unavailable"),
            Availability::Error(message) => write!(f, "error: {}", message),
        }
    }
}

/// Availability check result for one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub candidate: String,
    pub availability: Availability,
    pub checked_at: DateTime<Utc>,
    pub duration: Option<Duration>,
}

impl CheckResult {
    pub fn new(candidate: impl Into<String>, availability: Availability) -> Self {
        Self {
            candidate: candidate.into(),
            availability,
            checked_at: Utc::now(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Result category in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Available,
    Unavailable,
    Errors,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Available, Category::Unavailable, Category::Errors];

    /// File name used when exporting every category into a directory
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Category::Available => "available.txt",
            Category::Unavailable => "unavailable.txt",
            Category::Errors => "errors.txt",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Available => write!(f, "available"),
            Category::Unavailable => write!(f, "unavailable"),
            Category::Errors => write!(f, "errors"),
        }
    }
}

impl FromStr for Category {
    type Err = NameCheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Category::Available),
            "unavailable" => Ok(Category::Unavailable),
            "errors" | "error" => Ok(Category::Errors),
            other => Err(NameCheckError::invalid_input(format!(
                "Unknown category '{}'. Expected one of: available, unavailable, errors",
                other
            ))),
        }
    }
}

/// Lifecycle of a check session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Running => write!(f, "running"),
            SessionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Snapshot emitted after each candidate is recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub candidate: String,
    pub availability: Availability,
    pub processed: usize,
    pub total: usize,
}

impl ProgressEvent {
    /// Fraction of the run completed, in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }

    /// Short status text for display
    pub fn status_label(&self) -> String {
        self.availability.to_string()
    }
}

/// Counters describing a finished or in-progress run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub available: usize,
    pub unavailable: usize,
    pub errors: usize,
    pub processed: usize,
    pub total: usize,
    pub stopped_early: bool,
}

/// Configuration for availability checking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Disabling this accepts any certificate; only meant for testing setups
    pub verify_tls: bool,
    pub concurrency: usize,
    pub user_agent: String,
    pub channel_capacity: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
            concurrency: 1,
            user_agent: format!("gh-namecheck/{}", env!("CARGO_PKG_VERSION")),
            channel_capacity: 1024,
        }
    }
}

impl CheckConfig {
    /// Build a configuration from `GH_NAMECHECK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("GH_NAMECHECK_BASE_URL") {
            config.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("GH_NAMECHECK_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| config_error!("GH_NAMECHECK_TIMEOUT_SECS must be an integer, got '{}'", secs))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = lookup("GH_NAMECHECK_CONCURRENCY") {
            config.concurrency = n
                .trim()
                .parse()
                .map_err(|_| config_error!("GH_NAMECHECK_CONCURRENCY must be an integer, got '{}'", n))?;
        }
        if let Some(flag) = lookup("GH_NAMECHECK_INSECURE") {
            config.verify_tls = !parse_bool(&flag)
                .ok_or_else(|| config_error!("GH_NAMECHECK_INSECURE must be true or false, got '{}'", flag))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the checker cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(config_error!("base URL cannot be empty"));
        }
        if self.timeout.is_zero() {
            return Err(config_error!("timeout must be greater than zero"));
        }
        if self.concurrency == 0 {
            return Err(config_error!("concurrency must be at least 1"));
        }
        if self.channel_capacity == 0 {
            return Err(config_error!("channel capacity must be at least 1"));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
