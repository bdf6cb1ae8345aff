//! Stamp the Doubao AI watermark onto photos via alpha compositing.
//!
//! The watermark asset is loaded once, scaled relative to each photo's width,
//! faded to the requested opacity, alpha-composited into the bottom-right
//! corner, and the result is flattened to an opaque quality-90 JPEG next to
//! the original (or into a chosen output directory). Originals are never
//! modified.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use ai_watermark_stamp::{batch, StampOptions, WatermarkEngine};
//!
//! let engine = WatermarkEngine::from_path(Path::new("doubao_ai_watermark.png"))
//!     .expect("failed to load watermark asset");
//! let input = Path::new("photo.jpg");
//! let output = batch::watermarked_output_path(input, None);
//! engine.stamp_file(input, &output, &StampOptions::default()).unwrap();
//! ```
//!
//! # Batch runs
//!
//! [`batch::run_directory`] stamps every supported image in a directory,
//! recording one success or failure per file without ever aborting the run.
//! An interactive surface drives the same orchestration through
//! [`worker::BatchWorker`], which executes a single batch on a background
//! thread and streams progress over a channel.

#![deny(missing_docs)]

pub mod asset;
pub mod batch;
pub mod blending;
mod engine;
pub mod error;
pub mod worker;

pub use asset::{WatermarkAsset, DEFAULT_ASSET_PATH};
pub use batch::{run_batch, run_directory, BatchOutcome};
pub use engine::{
    Opacity, SizePreset, SizeSpec, StampOptions, StampResult, WatermarkEngine,
    AUTO_SCALE_FLOOR, MANUAL_SCALE_FLOOR, MARGIN, OUTPUT_JPEG_QUALITY, REFERENCE_WIDTH,
};
pub use error::{Error, Result};
pub use worker::{BatchEvent, BatchWorker};
