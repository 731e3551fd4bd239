use thiserror::Error;

/// Errors raised while turning IR input into a tree.
#[derive(Debug, Error)]
pub enum Error {
    /// Input text is not valid JSON.
    #[error("Invalid JSON: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("Failed to read IR: {0}")]
    Io(#[from] std::io::Error),
}
