//! Alpha blending math for watermark stamping.
//!
//! The watermark is applied via forward alpha blending:
//! `out = (1 - alpha) * source + alpha * watermark`
//! where `alpha` is the watermark pixel's own normalized alpha channel.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Rescale a watermark's alpha channel by an opacity percentage.
///
/// Every pixel's alpha becomes `floor(alpha * percent / 100)`; RGB channels
/// are untouched. Callers skip this entirely at 100% to avoid needless
/// precision loss.
#[must_use]
pub fn apply_opacity(wm: &RgbaImage, percent: u8) -> RgbaImage {
    let mut out = wm.clone();
    for px in out.pixels_mut() {
        px[3] = (u16::from(px[3]) * u16::from(percent) / 100) as u8;
    }
    out
}

/// Composite a watermark onto a base image at `(pos_x, pos_y)`.
///
/// Standard "over" compositing per RGB channel, weighted by the watermark
/// pixel's normalized alpha. The base image's own alpha channel is left
/// unchanged, so an opaque source stays opaque.
///
/// Coordinates may be negative or exceed the base bounds (this happens when
/// the scaled watermark is larger than the source minus margin); the painted
/// region is clipped to the overlap, matching the reference behavior of
/// partially drawing an oversized watermark rather than repositioning it.
pub fn overlay_blend(base: &mut RgbaImage, wm: &RgbaImage, pos_x: i64, pos_y: i64) {
    let base_w = i64::from(base.width());
    let base_h = i64::from(base.height());
    let wm_w = i64::from(wm.width());
    let wm_h = i64::from(wm.height());

    // Overlap of the watermark rectangle with the base image
    let x0 = pos_x.max(0);
    let y0 = pos_y.max(0);
    let x1 = (pos_x + wm_w).min(base_w);
    let y1 = (pos_y + wm_h).min(base_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for by in y0..y1 {
        for bx in x0..x1 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let wm_px = wm.get_pixel((bx - pos_x) as u32, (by - pos_y) as u32);
            let alpha = f32::from(wm_px[3]) / 255.0;
            if alpha == 0.0 {
                continue;
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let px = base.get_pixel_mut(bx as u32, by as u32);
            for ch in 0..3 {
                let src = f32::from(px[ch]);
                let over = f32::from(wm_px[ch]);
                let blended = src * (1.0 - alpha) + over * alpha;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    px[ch] = blended.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
}

/// Flatten an RGBA buffer to opaque RGB over a white background.
///
/// Each pixel is composited over white using its own alpha, so fully opaque
/// pixels come through loss-free and already-transparent source pixels get a
/// deterministic white fill.
#[must_use]
pub fn flatten_over_white(img: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(img.width(), img.height());
    for (x, y, px) in img.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *px;
        if a == 255 {
            out.put_pixel(x, y, Rgb([r, g, b]));
            continue;
        }
        let alpha = f32::from(a) / 255.0;
        let blend = |ch: u8| {
            let v = 255.0 * (1.0 - alpha) + f32::from(ch) * alpha;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                v.round().clamp(0.0, 255.0) as u8
            }
        };
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}
