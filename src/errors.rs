use thiserror::Error;

/// Fatal errors surfaced to callers of the detection engine.
///
/// Per-signal failures (reputation lookup timeouts, malformed upstream
/// bodies) are deliberately not represented here: they are absorbed into the
/// affected verdict's `error` field and only reduce confidence.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The input record carries no usable IP address.
    #[error("input record has no usable IP address")]
    MissingIp,

    /// Invalid configuration detected at construction time.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, DetectorError>;
