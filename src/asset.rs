//! Watermark asset loading.
//!
//! The watermark is a fixed overlay image resolved from a well-known filename
//! in the working directory. It is loaded once, promoted to RGBA so the
//! compositing math always has an alpha channel to work with, and kept
//! read-only for the life of the process.

use std::path::Path;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Well-known watermark filename, resolved relative to the working directory.
pub const DEFAULT_ASSET_PATH: &str = "doubao_ai_watermark.png";

/// The watermark overlay image as an immutable RGBA buffer.
///
/// An absent or corrupt asset is a hard error at load time; no compositing
/// call accepts a missing asset.
#[derive(Debug, Clone)]
pub struct WatermarkAsset {
    rgba: RgbaImage,
}

impl WatermarkAsset {
    /// Load the watermark asset from a file, converting to RGBA.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssetMissing`] if `path` does not exist, or
    /// [`Error::AssetDecode`] if the file cannot be decoded as an image.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::AssetMissing(path.to_path_buf()));
        }
        let img = image::open(path).map_err(Error::AssetDecode)?;
        Ok(Self {
            rgba: img.to_rgba8(),
        })
    }

    /// Wrap an already-decoded RGBA buffer as a watermark asset.
    #[must_use]
    pub fn from_image(rgba: RgbaImage) -> Self {
        Self { rgba }
    }

    /// Asset width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Asset height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// The RGBA pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.rgba
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn load_fails_for_missing_file() {
        let err = WatermarkAsset::load(Path::new("/nonexistent/watermark.png")).unwrap_err();
        assert!(matches!(err, Error::AssetMissing(_)));
    }

    #[test]
    fn load_fails_for_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = WatermarkAsset::load(&path).unwrap_err();
        assert!(matches!(err, Error::AssetDecode(_)));
    }

    #[test]
    fn load_converts_rgb_source_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wm.png");
        let rgb = image::RgbImage::from_pixel(16, 8, image::Rgb([10, 20, 30]));
        rgb.save(&path).unwrap();

        let asset = WatermarkAsset::load(&path).unwrap();
        assert_eq!(asset.width(), 16);
        assert_eq!(asset.height(), 8);
        assert_eq!(*asset.pixels().get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }
}
