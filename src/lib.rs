//! gh-namecheck - GitHub username availability checking
//!
//! Generates candidate usernames from permutations of seed letters, probes
//! GitHub for each one and exports the categorized results.

pub mod checker;
pub mod error;
pub mod generator;
pub mod input;
pub mod session;
pub mod store;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use error::{NameCheckError, Result};
pub use types::{
    Availability, Category, CheckConfig, CheckResult, ProgressEvent, SessionState,
    SessionSummary,
};

// Re-export main functionality
pub use checker::{AvailabilityProbe, GithubChecker};
pub use generator::{generate, CandidateGenerator};
pub use session::{CheckSession, ProgressReceiver, StopToken};
pub use store::ResultStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
