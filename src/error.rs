use thiserror::Error;

/// Frame source failures.
///
/// Only `Open` aborts a run. A `Decode` error mid-stream is treated by the
/// pipeline as end of stream, so a truncated file still produces whatever
/// scenes were sampled before the corruption.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open video source: {0}")]
    Open(String),

    #[error("failed to decode frame: {0}")]
    Decode(String),
}

/// Model collaborator failures.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The collaborator cannot be reached at all. The pipeline disables that
    /// capability for the rest of the run and logs it once.
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// A single call failed. The pipeline substitutes a sentinel/empty result
    /// for that frame only and keeps going.
    #[error("transient model failure: {0}")]
    Transient(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_texts() {
        let open = SourceError::Open("no such file".to_string());
        assert_eq!(open.to_string(), "failed to open video source: no such file");

        let decode = SourceError::Decode("truncated frame".to_string());
        assert_eq!(decode.to_string(), "failed to decode frame: truncated frame");

        let unavailable = ModelError::Unavailable("connection refused".to_string());
        assert_eq!(unavailable.to_string(), "model unavailable: connection refused");

        let transient = ModelError::Transient("timeout".to_string());
        assert_eq!(transient.to_string(), "transient model failure: timeout");
    }
}
