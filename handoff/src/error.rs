///
/// Handoff error types.
///
/// The handoff protocol itself cannot fail, it can only block. These errors
/// cover what surrounds it: loading configuration, starting the two role
/// threads, and detecting a broken FIFO sequence after the run.
///

use std::path::PathBuf;
use thiserror::Error;

use crate::observer::Role;

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("Failed to start {role} thread: {source}")]
    Spawn {
        role: Role,
        #[source]
        source: std::io::Error,
    },

    #[error("The {role} thread panicked")]
    Panicked { role: Role },

    #[error("Item out of order: expected sequence {expected}, consumer received {found:?}")]
    OutOfOrder { expected: u64, found: Option<u64> },

    #[error("{0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_error_display_messages() {
        let err = HandoffError::Panicked { role: Role::Consumer };
        assert_snapshot!(err.to_string(), @"The consumer thread panicked");

        let err = HandoffError::OutOfOrder {
            expected: 3,
            found: Some(4),
        };
        assert_snapshot!(
            err.to_string(),
            @"Item out of order: expected sequence 3, consumer received Some(4)"
        );

        let err = HandoffError::OutOfOrder {
            expected: 2,
            found: None,
        };
        assert!(err.to_string().contains("None"));

        let err = HandoffError::Spawn {
            role: Role::Producer,
            source: std::io::Error::other("out of threads"),
        };
        assert!(err.to_string().contains("producer"));
        assert!(err.to_string().contains("out of threads"));

        let err: HandoffError = ConfigError::Invalid("min_delay > max_delay".to_string()).into();
        assert_snapshot!(err.to_string(), @"Invalid config: min_delay > max_delay");

        let err = ConfigError::Parse {
            path: PathBuf::from("/tmp/handoff.toml"),
            reason: "expected `=`".to_string(),
        };
        assert!(err.to_string().contains("/tmp/handoff.toml"));
        assert!(err.to_string().contains("expected `=`"));
    }
}
