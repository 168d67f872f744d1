use thiserror::Error;

/// Boxed error returned by log stream sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Error opening stream to {namespace}/{pod}: {container}: {source}")]
    Open {
        namespace: String,
        pod: String,
        container: String,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
