//! Recording error types

use thiserror::Error;

/// Precondition violations raised by the recording API
///
/// None of these are recoverable in the sense of a retry: they indicate a
/// caller bug and leave the recorder unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// `restore` without a matching `save`
    #[error("restore called without a matching save")]
    UnbalancedRestore,

    /// Mutation attempted after `finalize`
    #[error("recording has been finalized")]
    Finalized,

    /// Order requested before `finalize`
    #[error("recording has not been finalized")]
    NotFinalized,

    /// Surface dimensions are zero or too large
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    /// Submission depths must strictly increase within a device
    #[error("submission depth {next} does not follow {previous}")]
    DepthOutOfOrder { previous: u32, next: u32 },
}

/// Result type for recording operations
pub type Result<T> = std::result::Result<T, RecordError>;
