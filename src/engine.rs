//! Core watermark compositing engine.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

use crate::asset::WatermarkAsset;
use crate::blending;
use crate::error::{Error, Result};

/// Reference source width the watermark asset was authored against.
pub const REFERENCE_WIDTH: f32 = 864.0;

/// Minimum resolved scale for the auto and named-preset paths.
pub const AUTO_SCALE_FLOOR: f32 = 0.2;

/// Minimum resolved scale for the manual-percentage path.
///
/// Deliberately distinct from [`AUTO_SCALE_FLOOR`]: the two call sites in the
/// reference tool use different floors, and they are kept as two named
/// constants rather than unified.
pub const MANUAL_SCALE_FLOOR: f32 = 0.1;

/// Margin between the watermark and the source's bottom-right corner.
pub const MARGIN: i64 = 12;

/// JPEG quality used for every output, regardless of the input format.
pub const OUTPUT_JPEG_QUALITY: u8 = 90;

/// Named watermark size preset.
///
/// The divisor is applied to the source width; a smaller divisor yields a
/// larger watermark relative to the photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePreset {
    /// Source width / 1200.
    Small,
    /// Source width / 800.
    Medium,
    /// Source width / 600.
    Large,
}

impl SizePreset {
    fn divisor(self) -> f32 {
        match self {
            Self::Small => 1200.0,
            Self::Medium => 800.0,
            Self::Large => 600.0,
        }
    }
}

/// Policy determining the watermark's pixel dimensions relative to the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeSpec {
    /// Derive scale from the source width against [`REFERENCE_WIDTH`].
    Auto,
    /// Fixed divisor preset.
    Named(SizePreset),
    /// Manual percentage in `[1, 100]`, mapped to a `0.1..=1.5` base scale.
    ManualPercent(u8),
}

impl SizeSpec {
    /// Build a manual size spec, validating the percentage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSizePercent`] for values outside `[1, 100]`.
    pub fn manual(percent: u8) -> Result<Self> {
        if !(1..=100).contains(&percent) {
            return Err(Error::InvalidSizePercent(percent));
        }
        Ok(Self::ManualPercent(percent))
    }

    /// The scale floor conventionally paired with this spec.
    #[must_use]
    pub fn default_floor(&self) -> f32 {
        match self {
            Self::ManualPercent(_) => MANUAL_SCALE_FLOOR,
            Self::Auto | Self::Named(_) => AUTO_SCALE_FLOOR,
        }
    }

    /// Resolve the watermark scale factor for a source of the given width.
    ///
    /// The result is clamped to `floor` so the watermark never vanishes on
    /// very narrow sources.
    #[must_use]
    pub fn resolve_scale(&self, source_width: u32, floor: f32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let width = source_width as f32;
        let scale = match self {
            Self::Auto => width / REFERENCE_WIDTH,
            Self::Named(preset) => width / preset.divisor(),
            Self::ManualPercent(percent) => {
                let base = 0.1 + (f32::from(*percent) / 100.0) * 1.4;
                base * (width / REFERENCE_WIDTH)
            }
        };
        scale.max(floor)
    }
}

/// Watermark opacity percentage, validated to `[30, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opacity(u8);

impl Opacity {
    /// Lowest accepted opacity.
    pub const MIN: u8 = 30;
    /// Fully opaque.
    pub const FULL: Self = Self(100);

    /// Validate and wrap an opacity percentage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOpacity`] for values outside `[30, 100]`.
    pub fn new(percent: u8) -> Result<Self> {
        if !(Self::MIN..=100).contains(&percent) {
            return Err(Error::InvalidOpacity(percent));
        }
        Ok(Self(percent))
    }

    /// The wrapped percentage.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(70)
    }
}

/// Options controlling a single compositing call.
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Watermark size policy.
    pub size: SizeSpec,
    /// Watermark opacity.
    pub opacity: Opacity,
    /// Minimum resolved scale. [`StampOptions::new`] picks the floor that
    /// matches the size policy; override only if a call site needs the other.
    pub scale_floor: f32,
}

impl StampOptions {
    /// Build options with the scale floor conventional for `size`.
    #[must_use]
    pub fn new(size: SizeSpec, opacity: Opacity) -> Self {
        Self {
            size,
            opacity,
            scale_floor: size.default_floor(),
        }
    }
}

impl Default for StampOptions {
    fn default() -> Self {
        Self::new(SizeSpec::Auto, Opacity::default())
    }
}

/// Record of stamping a single image file.
///
/// Used by the batch orchestrator, which must never abort on a per-file
/// failure: every input yields exactly one of these.
#[derive(Debug, Clone)]
pub struct StampResult {
    /// Input file path.
    pub input: PathBuf,
    /// Whether stamping succeeded.
    pub success: bool,
    /// Output path, present on success.
    pub output: Option<PathBuf>,
    /// Human-readable status or failure cause.
    pub message: String,
}

/// The compositing engine holding the loaded watermark asset.
///
/// Create once and reuse for any number of images; the asset is read-only
/// for the life of the engine.
pub struct WatermarkEngine {
    asset: WatermarkAsset,
}

impl WatermarkEngine {
    /// Create an engine from an already-loaded asset.
    #[must_use]
    pub fn new(asset: WatermarkAsset) -> Self {
        Self { asset }
    }

    /// Load the watermark asset from `path` and create an engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetMissing`] or [`Error::AssetDecode`] when the
    /// asset cannot be loaded.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(WatermarkAsset::load(path)?))
    }

    /// The loaded watermark asset.
    #[must_use]
    pub fn asset(&self) -> &WatermarkAsset {
        &self.asset
    }

    /// Composite the watermark onto a decoded source image.
    ///
    /// Promotes the source to RGBA, scales the watermark per the size policy
    /// (Lanczos3 resampling, since the watermark is often scaled down by an
    /// order of magnitude), rescales its alpha by the opacity, places it at
    /// the bottom-right with a 12px margin, alpha-composites, and flattens
    /// back to opaque RGB over white.
    ///
    /// If the scaled watermark is larger than the source minus margin, the
    /// placement coordinates go negative and the overlap is painted as-is;
    /// the watermark is not shrunk or repositioned.
    #[must_use]
    pub fn composite(&self, source: &DynamicImage, opts: &StampOptions) -> RgbImage {
        let mut canvas = source.to_rgba8();

        let scale = opts.size.resolve_scale(canvas.width(), opts.scale_floor);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wm_w = ((self.asset.width() as f32 * scale).round() as u32).max(1);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wm_h = ((self.asset.height() as f32 * scale).round() as u32).max(1);

        let mut wm =
            image::imageops::resize(self.asset.pixels(), wm_w, wm_h, FilterType::Lanczos3);
        if opts.opacity.get() < 100 {
            wm = blending::apply_opacity(&wm, opts.opacity.get());
        }

        let x = i64::from(canvas.width()) - i64::from(wm_w) - MARGIN;
        let y = i64::from(canvas.height()) - i64::from(wm_h) - MARGIN;
        blending::overlay_blend(&mut canvas, &wm, x, y);

        blending::flatten_over_white(&canvas)
    }

    /// Stamp a single image file and write the result to `output`.
    ///
    /// The output is always encoded as quality-90 JPEG, whatever extension
    /// `output` carries. The output's parent directory is created if absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceMissing`], [`Error::SourceDecode`], or
    /// [`Error::Encode`], each naming the offending file.
    pub fn stamp_file(&self, input: &Path, output: &Path, opts: &StampOptions) -> Result<PathBuf> {
        if !input.exists() {
            return Err(Error::SourceMissing(input.to_path_buf()));
        }
        let source = image::open(input).map_err(|e| Error::SourceDecode {
            path: input.to_path_buf(),
            source: e,
        })?;

        let stamped = self.composite(&source, opts);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::Encode {
                    path: output.to_path_buf(),
                    source: image::ImageError::IoError(e),
                })?;
            }
        }
        save_jpeg(&stamped, output)?;

        Ok(output.to_path_buf())
    }

    /// Stamp a single file, folding any failure into a [`StampResult`].
    ///
    /// This is the batch-facing wrapper: it never returns an error, so one
    /// file's failure cannot stop the files after it.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, opts: &StampOptions) -> StampResult {
        match self.stamp_file(input, output, opts) {
            Ok(path) => StampResult {
                input: input.to_path_buf(),
                success: true,
                output: Some(path),
                message: "Watermark applied".to_string(),
            },
            Err(e) => StampResult {
                input: input.to_path_buf(),
                success: false,
                output: None,
                message: e.to_string(),
            },
        }
    }
}

/// Encode an RGB image as quality-90 JPEG at `path`.
fn save_jpeg(img: &RgbImage, path: &Path) -> Result<()> {
    let encode = || -> std::result::Result<(), image::ImageError> {
        let file = std::fs::File::create(path).map_err(image::ImageError::IoError)?;
        let writer = std::io::BufWriter::new(file);
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(writer, OUTPUT_JPEG_QUALITY);
        encoder.encode_image(img)?;
        Ok(())
    };
    encode().map_err(|e| Error::Encode {
        path: path.to_path_buf(),
        source: e,
    })
}
