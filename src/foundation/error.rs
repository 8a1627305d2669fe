use std::path::PathBuf;

/// Convenience result type used across gifkey.
pub type GifkeyResult<T> = Result<T, GifkeyError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum GifkeyError {
    /// The input path does not name an existing file.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input decoded, but produced no frames.
    #[error("No frames loaded from GIF")]
    EmptySequence,

    /// Invalid user-provided data (arguments, dimensions, pixel buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// The input could not be decoded as an animated GIF.
    #[error("decode error: {0}")]
    Decode(String),

    /// The keyed sequence could not be encoded or written.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifkeyError {
    /// Build a [`GifkeyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifkeyError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifkeyError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Process exit code reported by the command-line tool for this error.
    ///
    /// Only the two named conditions have dedicated codes; everything else exits with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound(_) => 2,
            Self::EmptySequence => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
