//! Per-pixel classification of a map image into walkable and blocked cells.
//!
//! Doors (blue pixels) are always walkable and are tested before walls, so a
//! dark blue door never ends up blocked. Everything else is a wall when its
//! Rec.709 luminance falls below the threshold.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::Grid;

/// Minimum blue value for a door pixel
const DOOR_MIN_BLUE: i32 = 100;
/// How much the blue channel must exceed both red and green
const DOOR_MARGIN: i32 = 20;

/// Rec.709 weights scaled by 10_000 so the wall test stays in integers
const LUMA_WEIGHTS: [u32; 3] = [2126, 7152, 722];
const LUMA_SCALE: u32 = 10_000;

/// Rec.709 luminance scaled by `LUMA_SCALE`, exact for all 0-255 channel values
fn scaled_luminance(pixel: &Rgba<u8>) -> u32 {
    let [r, g, b, _] = pixel.0.map(u32::from);
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}

/// Rec.709 luminance on 0-255 channel values, alpha is ignored
pub fn luminance(pixel: &Rgba<u8>) -> f64 {
    scaled_luminance(pixel) as f64 / LUMA_SCALE as f64
}

pub fn is_door(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, _] = pixel.0.map(i32::from);
    b > DOOR_MIN_BLUE && b > r + DOOR_MARGIN && b > g + DOOR_MARGIN
}

pub fn is_wall(pixel: &Rgba<u8>, threshold: u8) -> bool {
    scaled_luminance(pixel) < LUMA_SCALE * threshold as u32
}

pub fn is_walkable(pixel: &Rgba<u8>, threshold: u8) -> bool {
    is_door(pixel) || !is_wall(pixel, threshold)
}

/// Classifies every pixel of the (already resampled) image into a grid of the same size
pub fn classify(image: &RgbaImage, threshold: u8) -> Grid {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let mut grid = Grid::new(width, height);
    let mut doors = 0;

    for (x, y, pixel) in image.enumerate_pixels() {
        if is_door(pixel) {
            doors += 1;
        }
        grid.cells[y as usize][x as usize] = is_walkable(pixel, threshold);
    }

    debug!(
        "classified {}x{} pixels: {} door, {} blocked",
        width,
        height,
        doors,
        grid.blocked_count()
    );

    grid
}

#[cfg(test)]
mod test {

    use super::*;

    fn px(r: u8, g: u8, b: u8) -> Rgba<u8> {
        Rgba([r, g, b, 255])
    }

    #[test]
    fn test_door_precedence() {
        let door = px(0, 0, 200);
        assert!(is_door(&door));
        // dark enough to be a wall on its own
        assert!(is_wall(&door, 100));
        assert!(is_walkable(&door, 100));
    }

    #[test]
    fn test_wall() {
        let wall = px(10, 10, 10);
        assert!((luminance(&wall) - 10.0).abs() < 1e-9);
        assert!(!is_door(&wall));
        assert!(!is_walkable(&wall, 100));
        // luminance of exactly 10 is not below a threshold of 10
        assert!(is_walkable(&wall, 10));
        assert!(!is_walkable(&wall, 11));
    }

    #[test]
    fn test_white_always_walkable() {
        let white = px(255, 255, 255);
        for threshold in [0, 1, 100, 200, 254, 255] {
            assert!(is_walkable(&white, threshold));
        }
        assert!(!is_wall(&white, 255));
    }

    #[test]
    fn test_door_bounds() {
        // blue must be strictly above 100
        assert!(!is_door(&px(0, 0, 100)));
        assert!(is_door(&px(0, 0, 101)));
        // and strictly more than 20 above red and green
        assert!(!is_door(&px(100, 0, 120)));
        assert!(is_door(&px(80, 0, 120)));
        assert!(!is_door(&px(0, 100, 120)));
        assert!(is_door(&px(99, 99, 120)));
        // bright channels must not overflow
        assert!(!is_door(&px(250, 250, 255)));
    }

    #[test]
    fn test_threshold_is_strict() {
        let gray = px(100, 100, 100);
        assert!((luminance(&gray) - 100.0).abs() < 1e-9);
        assert!(is_walkable(&gray, 99));
        assert!(is_walkable(&gray, 100));
        assert!(!is_walkable(&gray, 101));
    }

    #[test]
    fn test_alpha_ignored() {
        assert!(!is_walkable(&Rgba([0, 0, 0, 0]), 100));
        assert!(is_walkable(&Rgba([255, 255, 255, 0]), 100));
    }

    #[test]
    fn test_classify_image() {
        let mut image = RgbaImage::from_pixel(3, 2, px(255, 255, 255));
        image.put_pixel(0, 0, px(0, 0, 0));
        image.put_pixel(2, 1, px(0, 0, 255));
        image.put_pixel(1, 1, px(20, 20, 20));

        let grid = classify(&image, 100);
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert_eq!(
            grid.cells,
            vec![vec![false, true, true], vec![true, false, true]]
        );
    }
}
