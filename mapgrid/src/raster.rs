//! Loading and resampling of the source map image.
//!
//! - `open_rgba`: decode an image file into an RGBA buffer, `None` if the file is missing.
//! - `blur`: optional gaussian smoothing of the full resolution buffer.
//! - `resize_bilinear`: downsample to the grid resolution.
use std::path::Path;

use anyhow::Context;
use image::{imageops, Rgba, RgbaImage};
use log::debug;

/// Opens the image at `path` and converts it to RGBA.
///
/// A missing file is reported as `Ok(None)` so the caller can stop without
/// treating it as a failure. Anything else that goes wrong while decoding is
/// an error.
pub fn open_rgba(path: &Path) -> Result<Option<RgbaImage>, anyhow::Error> {
    if !path.exists() {
        return Ok(None);
    }

    let image = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .into_rgba8();

    debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    Ok(Some(image))
}

/// Applies a gaussian blur with the given radius, a radius of 0 leaves the image untouched
pub fn blur(image: &RgbaImage, radius: u32) -> RgbaImage {
    if radius == 0 {
        return image.clone();
    }

    imageops::blur(image, radius as f32)
}

/// Maps a destination pixel index to the two source indices to blend and the weight of the second one
fn source_span(dst: u32, dst_len: u32, src_len: u32) -> (u32, u32, f64) {
    let scale = src_len as f64 / dst_len as f64;
    let pos = ((dst as f64 + 0.5) * scale - 0.5).clamp(0.0, (src_len - 1) as f64);

    let lower = pos.floor() as u32;
    let upper = (lower + 1).min(src_len - 1);

    (lower, upper, pos - lower as f64)
}

/// Resizes the image with bilinear interpolation.
///
/// Every output pixel is a weighted blend of the four source pixels around its
/// centre, using the fractional source coordinates as weights.
pub fn resize_bilinear(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_width, src_height) = image.dimensions();

    if (src_width, src_height) == (width, height) {
        return image.clone();
    }
    if src_width == 0 || src_height == 0 {
        return RgbaImage::new(width, height);
    }

    let columns: Vec<_> = (0..width)
        .map(|x| source_span(x, width, src_width))
        .collect();

    RgbaImage::from_fn(width, height, |x, y| {
        let (y0, y1, ty) = source_span(y, height, src_height);
        let (x0, x1, tx) = columns[x as usize];

        let top_left = image.get_pixel(x0, y0);
        let top_right = image.get_pixel(x1, y0);
        let bottom_left = image.get_pixel(x0, y1);
        let bottom_right = image.get_pixel(x1, y1);

        let mut out = [0u8; 4];
        for (c, value) in out.iter_mut().enumerate() {
            let top = top_left[c] as f64 * (1.0 - tx) + top_right[c] as f64 * tx;
            let bottom = bottom_left[c] as f64 * (1.0 - tx) + bottom_right[c] as f64 * tx;
            let blended = top * (1.0 - ty) + bottom * ty;
            *value = blended.round().clamp(0.0, 255.0) as u8;
        }

        Rgba(out)
    })
}

#[cfg(test)]
mod test {

    use super::*;

    fn checkerboard(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_resize_same_size_is_exact() {
        let image = checkerboard(4);
        assert_eq!(resize_bilinear(&image, 4, 4), image);
    }

    #[test]
    fn test_resize_halves_blend_pairs() {
        // a 4x1 strip [0, 100, 200, 255] halved samples at 0.5 and 2.5
        let mut image = RgbaImage::new(4, 1);
        for (x, v) in [0u8, 100, 200, 255].into_iter().enumerate() {
            image.put_pixel(x as u32, 0, Rgba([v, v, v, 255]));
        }

        let small = resize_bilinear(&image, 2, 1);
        assert_eq!(small.dimensions(), (2, 1));
        assert_eq!(small.get_pixel(0, 0).0, [50, 50, 50, 255]);
        // 200 * 0.5 + 255 * 0.5 = 227.5, rounded up
        assert_eq!(small.get_pixel(1, 0).0, [228, 228, 228, 255]);
    }

    #[test]
    fn test_resize_uniform_stays_uniform() {
        let image = RgbaImage::from_pixel(37, 23, Rgba([12, 34, 56, 255]));
        let resized = resize_bilinear(&image, 8, 8);
        assert_eq!(resized.dimensions(), (8, 8));
        assert!(resized.pixels().all(|p| p.0 == [12, 34, 56, 255]));
    }

    #[test]
    fn test_resize_upscale_clamps_edges() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([200, 200, 200, 255]));

        let large = resize_bilinear(&image, 4, 1);
        let values: Vec<u8> = large.pixels().map(|p| p[0]).collect();
        // source positions -0.25 (clamped), 0.25, 0.75, 1.25 (clamped)
        assert_eq!(values, vec![0, 50, 150, 200]);
    }

    #[test]
    fn test_blur_zero_is_identity() {
        let image = checkerboard(6);
        assert_eq!(blur(&image, 0), image);
    }

    #[test]
    fn test_blur_smooths() {
        let image = checkerboard(8);
        let blurred = blur(&image, 2);
        assert_eq!(blurred.dimensions(), image.dimensions());
        // the hard black/white alternation gets pulled towards gray
        let p = blurred.get_pixel(4, 4)[0];
        assert!(p > 0 && p < 255, "pixel value {}", p);
    }

    #[test]
    fn test_open_missing() {
        let res = open_rgba(Path::new("this/file/does/not/exist.png")).unwrap();
        assert!(res.is_none());
    }
}
