//! Error handling for gh-namecheck

use thiserror::Error;

use crate::types::Category;

/// Main error type for gh-namecheck
#[derive(Error, Debug, Clone)]
pub enum NameCheckError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("No {category} results to export")]
    EmptyCategory { category: Category },

    #[error("A check session is already running")]
    SessionAlreadyRunning,

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NameCheckError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an empty category error
    pub fn empty_category(category: Category) -> Self {
        Self::EmptyCategory { category }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Informational errors are notices for the user, not failures of the tool
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::EmptyCategory { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { message } => {
                format!("❌ {}\n💡 Check the seed letters or the username file", message)
            }
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or command line flags", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::EmptyCategory { category } => {
                format!("ℹ️  No {} results to export", category)
            }
            Self::SessionAlreadyRunning => {
                "❌ A check is already running\n💡 Stop it or wait for it to finish first".to_string()
            }
            Self::Parse { message } => {
                format!("❌ Parse error: {}", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for NameCheckError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network(format!("connection failed: {}", err), status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for NameCheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<std::io::Error> for NameCheckError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NameCheckError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! invalid_input {
    ($msg:expr) => {
        $crate::error::NameCheckError::invalid_input($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NameCheckError::invalid_input(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::NameCheckError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::NameCheckError::config(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_category_is_informational() {
        let err = NameCheckError::empty_category(Category::Available);
        assert!(err.is_informational());
        assert_eq!(err.to_string(), "No available results to export");
        assert!(!NameCheckError::SessionAlreadyRunning.is_informational());
    }

    #[test]
    fn test_io_user_message_includes_path() {
        let err = NameCheckError::io("permission denied", Some("/tmp/out.txt".to_string()));
        let msg = err.user_message();
        assert!(msg.contains("/tmp/out.txt"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_macros() {
        let err = invalid_input!("seed is {}", "empty");
        assert!(err.to_string().contains("seed is empty"));
        let err = config_error!("bad value");
        assert!(matches!(err, NameCheckError::Config { .. }));
    }
}
