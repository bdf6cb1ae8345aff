//! Error types for the ai-watermark-stamp crate.

use std::path::PathBuf;

/// Errors that can occur while loading the watermark asset, compositing,
/// or orchestrating a batch run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The watermark asset file does not exist.
    #[error("watermark asset not found: {}", .0.display())]
    AssetMissing(PathBuf),

    /// The watermark asset file exists but could not be decoded.
    #[error("failed to decode watermark asset: {0}")]
    AssetDecode(image::ImageError),

    /// A source image file does not exist.
    #[error("input file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// A source image file could not be decoded.
    #[error("failed to decode {}: {source}", path.display())]
    SourceDecode {
        /// Path of the unreadable source image.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// The composited output could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Encode {
        /// Destination path that could not be written.
        path: PathBuf,
        /// Underlying encode or I/O error.
        #[source]
        source: image::ImageError,
    },

    /// Opacity outside the accepted `[30, 100]` range.
    #[error("opacity must be between 30 and 100, got {0}")]
    InvalidOpacity(u8),

    /// Manual size percentage outside the accepted `[1, 100]` range.
    #[error("manual size must be between 1 and 100, got {0}")]
    InvalidSizePercent(u8),

    /// The batch input directory does not exist or is not a directory.
    #[error("input directory not found: {}", .0.display())]
    InputDirMissing(PathBuf),

    /// A batch was submitted while another batch is still running.
    #[error("a batch is already running")]
    WorkerBusy,

    /// An I/O error occurred while enumerating input files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
