use thiserror::Error;

/// Failures after a document has been parsed. Parsing itself never fails.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] std::io::Error),
    #[error("serializer produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
