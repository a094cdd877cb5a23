use std::time::Duration;

/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the relay loop
/// can tell transient failures (retry after backoff) from fatal ones.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("telegram api error: {0}")]
    Api(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("{0}")]
    Process(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Errors the relay recovers from locally (log, back off, keep looping).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Api(_) | Error::Timeout(_) | Error::Json(_) | Error::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_uses_whole_seconds() {
        let e = Error::Timeout(Duration::from_millis(120_000));
        assert_eq!(e.to_string(), "timed out after 120s");
    }

    #[test]
    fn config_errors_are_not_transient() {
        assert!(!Error::Config("missing".to_string()).is_transient());
        assert!(Error::Network("reset".to_string()).is_transient());
        assert!(Error::Timeout(Duration::from_secs(35)).is_transient());
    }
}
