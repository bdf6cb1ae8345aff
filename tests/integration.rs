use std::path::Path;

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use ai_watermark_stamp::{
    batch, Opacity, SizeSpec, StampOptions, WatermarkAsset, WatermarkEngine,
};

fn write_watermark_asset(path: &Path) {
    // Opaque dark square with a transparent border, like a logo cutout.
    let mut wm = RgbaImage::from_pixel(60, 24, Rgba([0, 0, 0, 0]));
    for y in 2..22 {
        for x in 2..58 {
            wm.put_pixel(x, y, Rgba([20, 20, 20, 255]));
        }
    }
    wm.save(path).unwrap();
}

fn write_photo(path: &Path, w: u32, h: u32) {
    RgbImage::from_pixel(w, h, Rgb([230, 230, 230])).save(path).unwrap();
}

#[test]
fn engine_loads_asset_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let asset_path = dir.path().join("watermark.png");
    write_watermark_asset(&asset_path);

    let engine = WatermarkEngine::from_path(&asset_path).unwrap();
    assert_eq!(engine.asset().width(), 60);
    assert_eq!(engine.asset().height(), 24);
}

#[test]
fn engine_init_fails_without_asset() {
    assert!(WatermarkEngine::from_path(Path::new("/nonexistent/wm.png")).is_err());
}

#[test]
fn stamped_output_is_opaque_jpeg_with_source_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let asset_path = dir.path().join("watermark.png");
    write_watermark_asset(&asset_path);
    let input = dir.path().join("photo.jpg");
    write_photo(&input, 1000, 800);

    let engine = WatermarkEngine::from_path(&asset_path).unwrap();
    let opts = StampOptions::new(SizeSpec::Auto, Opacity::new(70).unwrap());
    let output = batch::watermarked_output_path(&input, None);
    assert_eq!(output, dir.path().join("photo_watermarked.jpg"));

    let written = engine.stamp_file(&input, &output, &opts).unwrap();
    assert_eq!(written, output);

    let reloaded = image::open(&output).unwrap();
    assert_eq!(reloaded.width(), 1000);
    assert_eq!(reloaded.height(), 800);
    // JPEG decodes without an alpha channel
    assert!(reloaded.as_rgba8().is_none());
}

#[test]
fn stamping_does_not_modify_the_original() {
    let dir = tempfile::tempdir().unwrap();
    let asset_path = dir.path().join("watermark.png");
    write_watermark_asset(&asset_path);
    let input = dir.path().join("photo.png");
    write_photo(&input, 400, 300);
    let original_bytes = std::fs::read(&input).unwrap();

    let engine = WatermarkEngine::from_path(&asset_path).unwrap();
    let output = batch::watermarked_output_path(&input, None);
    engine
        .stamp_file(&input, &output, &StampOptions::default())
        .unwrap();

    assert_eq!(std::fs::read(&input).unwrap(), original_bytes);
    assert!(output.exists());
}

#[test]
fn rerunning_overwrites_instead_of_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    std::fs::create_dir(&assets).unwrap();
    let asset_path = assets.join("watermark.png");
    write_watermark_asset(&asset_path);
    let input = dir.path().join("photo.jpg");
    write_photo(&input, 500, 400);

    let engine = WatermarkEngine::from_path(&asset_path).unwrap();
    let opts = StampOptions::default();

    let first = engine
        .stamp_file(&input, &batch::watermarked_output_path(&input, None), &opts)
        .unwrap();
    let second = engine
        .stamp_file(&input, &batch::watermarked_output_path(&input, None), &opts)
        .unwrap();
    assert_eq!(first, second);

    let entries = batch::collect_images(dir.path()).unwrap();
    // photo.jpg + photo_watermarked.jpg only, no photo_watermarked_watermarked.jpg
    assert_eq!(entries.len(), 2);
}

#[test]
fn full_opacity_stamps_darker_than_faded() {
    let engine = WatermarkEngine::new(WatermarkAsset::from_image(RgbaImage::from_pixel(
        50,
        50,
        Rgba([0, 0, 0, 255]),
    )));
    let source = image::DynamicImage::ImageRgb8(RgbImage::from_pixel(
        864,
        864,
        Rgb([255, 255, 255]),
    ));

    let full = engine.composite(
        &source,
        &StampOptions::new(SizeSpec::Auto, Opacity::FULL),
    );
    let faded = engine.composite(
        &source,
        &StampOptions::new(SizeSpec::Auto, Opacity::new(30).unwrap()),
    );

    let probe = (864 - 30, 864 - 30);
    assert_eq!(*full.get_pixel(probe.0, probe.1), Rgb([0, 0, 0]));
    let faded_px = faded.get_pixel(probe.0, probe.1);
    assert!(faded_px[0] > 150, "30% opacity should leave the photo mostly visible");
}

#[test]
fn batch_partial_failure_yields_one_outcome_per_input() {
    let dir = tempfile::tempdir().unwrap();
    let asset_path = dir.path().join("wm_asset.png");
    RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]))
        .save(&asset_path)
        .unwrap();

    let photos = dir.path().join("photos");
    std::fs::create_dir(&photos).unwrap();
    write_photo(&photos.join("a.png"), 300, 200);
    std::fs::write(photos.join("broken.jpg"), b"definitely not a jpeg").unwrap();
    write_photo(&photos.join("c.bmp"), 300, 200);

    let engine = WatermarkEngine::from_path(&asset_path).unwrap();
    let out_dir = dir.path().join("stamped");
    let outcome = batch::run_directory(
        &engine,
        &photos,
        Some(&out_dir),
        &StampOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.succeeded(), 2);
    assert_eq!(outcome.failed(), 1);

    let failed: Vec<_> = outcome.results.iter().filter(|r| !r.success).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].input.ends_with("broken.jpg"));
    assert!(failed[0].message.contains("broken.jpg"));

    assert!(out_dir.join("a_watermarked.png").exists());
    assert!(out_dir.join("c_watermarked.bmp").exists());
    assert!(!out_dir.join("broken_watermarked.jpg").exists());
}

#[test]
fn validation_rejects_out_of_range_opacity_before_any_processing() {
    assert!(Opacity::new(29).is_err());
    assert!(Opacity::new(0).is_err());
    assert!(Opacity::new(255).is_err());
    assert!(SizeSpec::manual(0).is_err());
}
