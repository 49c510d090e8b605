//! Pixel transforms behind every editing operation.
//!
//! All functions are pure: they read the input image and return a new one.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::debug;

use crate::error::{EditorError, Result};
use crate::operation::{AspectMode, BorderMethod, Operation, PadParams, ThresholdMode};

const THRESHOLD_LEVEL: u8 = 127;

/// Validates `operation` and runs it against `image`.
pub fn transform(image: &RgbImage, operation: &Operation) -> Result<RgbImage> {
    operation.validate()?;
    debug!(
        "transform {} on {}x{} image",
        operation.kind(),
        image.width(),
        image.height()
    );

    let result = match operation {
        Operation::Brightness { delta } => brightness(image, *delta),
        Operation::Contrast { factor } => contrast(image, *factor),
        Operation::Grayscale => grayscale(image),
        Operation::Pad(params) => pad(image, params)?,
        Operation::Threshold { mode } => threshold(image, *mode),
        Operation::Blend { second, alpha, .. } => blend(image, second, *alpha),
    };
    Ok(result)
}

/// `min(255, round(|v * factor + delta|))` on every channel.
pub fn scale_abs(image: &RgbImage, factor: f32, delta: f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let value = (*channel as f32 * factor + delta).abs().round_ties_even();
            *channel = value.min(255.0) as u8;
        }
    }
    out
}

pub fn brightness(image: &RgbImage, delta: i32) -> RgbImage {
    scale_abs(image, 1.0, delta as f32)
}

pub fn contrast(image: &RgbImage, factor: f32) -> RgbImage {
    scale_abs(image, factor, 0.0)
}

/// Rec.601 luma in 14-bit fixed point.
pub fn luma(pixel: &Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    let weighted = r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868;
    ((weighted + (1 << 13)) >> 14) as u8
}

pub fn grayscale(image: &RgbImage) -> RgbImage {
    map_luma(image, |l| l)
}

pub fn threshold(image: &RgbImage, mode: ThresholdMode) -> RgbImage {
    map_luma(image, |l| {
        let above = l > THRESHOLD_LEVEL;
        match (mode, above) {
            (ThresholdMode::Binary, true) | (ThresholdMode::Inverse, false) => 255,
            _ => 0,
        }
    })
}

fn map_luma(image: &RgbImage, f: impl Fn(u8) -> u8) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let v = f(luma(image.get_pixel(x, y)));
        Rgb([v, v, v])
    })
}

/// Bilinear resize to exactly `width` x `height`. Returns a clone when the size already matches.
pub fn resize_to(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}

/// `(1 - alpha) * current + alpha * second`, truncated, with `second` resized to `current`.
pub fn blend(current: &RgbImage, second: &RgbImage, alpha: f64) -> RgbImage {
    let (width, height) = current.dimensions();
    let second = resize_to(second, width, height);

    let mut out = current.clone();
    for (dst, src) in out.pixels_mut().zip(second.pixels()) {
        for (d, s) in dst.0.iter_mut().zip(src.0.iter()) {
            *d = ((1.0 - alpha) * *d as f64 + alpha * *s as f64) as u8;
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Border sizes for padding a `width` x `height` image.
///
/// The flat margin goes on every side first. `Square` then replaces the margin on
/// the shorter axis with half the size difference, and `Ratio` replaces the
/// horizontal margin with half the width shortfall (zero when the image is
/// already wide enough). Odd remainders are dropped, so results can be one
/// pixel short of the exact target.
///
/// Fails with `InvalidParams` when the padded image would not fit in `u32` dimensions.
pub fn pad_margins(width: u32, height: u32, params: &PadParams) -> Result<Margins> {
    let m = params.margin;
    let mut margins = Margins {
        top: m,
        bottom: m,
        left: m,
        right: m,
    };

    match params.aspect {
        AspectMode::Square => {
            if height > width {
                let side = (height - width) / 2;
                margins.left = side;
                margins.right = side;
            } else {
                let side = (width - height) / 2;
                margins.top = side;
                margins.bottom = side;
            }
        }
        AspectMode::Ratio(a, b) => {
            let desired_width = u32::try_from(height as u64 * a as u64 / b.max(1) as u64)
                .map_err(|_| {
                    EditorError::invalid(format!("ratio {}:{} too wide for height {}", a, b, height))
                })?;
            let side = desired_width.saturating_sub(width) / 2;
            margins.left = side;
            margins.right = side;
        }
        AspectMode::Rectangle => {}
    }

    let out_width = width
        .checked_add(margins.left)
        .and_then(|w| w.checked_add(margins.right));
    let out_height = height
        .checked_add(margins.top)
        .and_then(|h| h.checked_add(margins.bottom));
    if out_width.is_none() || out_height.is_none() {
        return Err(EditorError::invalid(format!(
            "padding {}x{} by {:?} overflows",
            width, height, margins
        )));
    }
    Ok(margins)
}

pub fn pad(image: &RgbImage, params: &PadParams) -> Result<RgbImage> {
    let margins = pad_margins(image.width(), image.height(), params)?;
    Ok(copy_make_border(image, margins, params.method))
}

/// Surrounds `image` with the given margins filled according to `method`.
pub fn copy_make_border(image: &RgbImage, margins: Margins, method: BorderMethod) -> RgbImage {
    let (width, height) = image.dimensions();
    let out_width = width + margins.left + margins.right;
    let out_height = height + margins.top + margins.bottom;

    RgbImage::from_fn(out_width, out_height, |x, y| {
        let sx = border_index(x as i64 - margins.left as i64, width, method);
        let sy = border_index(y as i64 - margins.top as i64, height, method);
        match (sx, sy) {
            (Some(sx), Some(sy)) => *image.get_pixel(sx, sy),
            _ => Rgb([0, 0, 0]),
        }
    })
}

fn border_index(index: i64, len: u32, method: BorderMethod) -> Option<u32> {
    let len = len as i64;
    if len == 0 {
        return None;
    }
    if (0..len).contains(&index) {
        return Some(index as u32);
    }
    match method {
        BorderMethod::Constant => None,
        BorderMethod::Replicate => Some(index.clamp(0, len - 1) as u32),
        BorderMethod::Reflect => {
            let period = 2 * len;
            let folded = index.rem_euclid(period);
            let mirrored = if folded < len { folded } else { period - 1 - folded };
            Some(mirrored as u32)
        }
    }
}

/// Both images squashed to `size` x `size` and placed next to each other.
pub fn side_by_side(original: &RgbImage, modified: &RgbImage, size: u32) -> RgbImage {
    let left = resize_to(original, size, size);
    let right = resize_to(modified, size, size);

    let mut combined = RgbImage::new(size * 2, size);
    imageops::replace(&mut combined, &left, 0, 0);
    imageops::replace(&mut combined, &right, size as i64, 0);
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    fn row(values: &[u8]) -> RgbImage {
        RgbImage::from_fn(values.len() as u32, 1, |x, _| {
            let v = values[x as usize];
            Rgb([v, v, v])
        })
    }

    fn row_values(image: &RgbImage) -> Vec<u8> {
        (0..image.width()).map(|x| image.get_pixel(x, 0)[0]).collect()
    }

    #[test]
    fn test_brightness_saturates_and_mirrors_negative() {
        let img = row(&[0, 30, 100, 250]);
        assert_eq!(row_values(&brightness(&img, 20)), vec![20, 50, 120, 255]);
        // Results below zero come back as their absolute value.
        assert_eq!(row_values(&brightness(&img, -100)), vec![100, 70, 0, 150]);
    }

    #[test]
    fn test_contrast_scales() {
        let img = row(&[0, 10, 100, 200]);
        assert_eq!(row_values(&contrast(&img, 1.5)), vec![0, 15, 150, 255]);
        assert_eq!(row_values(&contrast(&img, 0.5)), vec![0, 5, 50, 100]);
    }

    #[test]
    fn test_grayscale_luma() {
        assert_eq!(luma(&Rgb([255, 0, 0])), 76);
        assert_eq!(luma(&Rgb([0, 255, 0])), 150);
        assert_eq!(luma(&Rgb([0, 0, 255])), 29);
        assert_eq!(luma(&Rgb([255, 255, 255])), 255);

        let gray = grayscale(&solid(3, 2, [0, 255, 0]));
        assert_eq!(gray.dimensions(), (3, 2));
        assert!(gray.pixels().all(|p| p.0 == [150, 150, 150]));
    }

    #[test]
    fn test_threshold_modes() {
        let img = row(&[0, 127, 128, 255]);
        assert_eq!(
            row_values(&threshold(&img, ThresholdMode::Binary)),
            vec![0, 0, 255, 255]
        );
        assert_eq!(
            row_values(&threshold(&img, ThresholdMode::Inverse)),
            vec![255, 255, 0, 0]
        );
    }

    #[test]
    fn test_blend_endpoints() {
        let current = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 7]));
        let second = solid(8, 6, [200, 10, 90]);

        assert_eq!(blend(&current, &second, 0.0), current);
        assert_eq!(blend(&current, &second, 1.0), resize_to(&second, 4, 3));
    }

    #[test]
    fn test_blend_midpoint_truncates() {
        let a = solid(2, 2, [10, 0, 255]);
        let b = solid(2, 2, [21, 255, 0]);
        let out = blend(&a, &b, 0.5);
        assert!(out.pixels().all(|p| p.0 == [15, 127, 127]));
    }

    #[test]
    fn test_blend_fractional_alpha_truncates_like_f64() {
        let current = solid(2, 2, [100, 10, 200]);
        let black = solid(2, 2, [0, 0, 0]);

        // 0.7 * 100 and friends land exactly on integers in f64.
        let out = blend(&current, &black, 0.3);
        assert!(out.pixels().all(|p| p.0 == [70, 7, 140]));

        // (1 - 0.9) * 100 is 9.999999999999998, truncated to 9.
        let out = blend(&current, &black, 0.9);
        assert_eq!(out.get_pixel(0, 0)[0], 9);
    }

    #[test]
    fn test_square_pad_on_square_image_is_noop() {
        let img = RgbImage::from_fn(300, 300, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 3]));
        let params = PadParams {
            method: BorderMethod::Reflect,
            aspect: AspectMode::Square,
            margin: 0,
        };
        assert_eq!(pad(&img, &params).unwrap(), img);
    }

    #[test]
    fn test_square_margins() {
        let square = |margin| PadParams {
            method: BorderMethod::Constant,
            aspect: AspectMode::Square,
            margin,
        };

        // Wide image: top/bottom even out the height, flat margin stays left/right.
        let m = pad_margins(300, 200, &square(5)).unwrap();
        assert_eq!(m, Margins { top: 50, bottom: 50, left: 5, right: 5 });

        // Tall image: left/right even out the width.
        let m = pad_margins(200, 300, &square(5)).unwrap();
        assert_eq!(m, Margins { top: 5, bottom: 5, left: 50, right: 50 });

        // One pixel of difference is dropped entirely.
        let m = pad_margins(301, 300, &square(0)).unwrap();
        assert_eq!(m, Margins { top: 0, bottom: 0, left: 0, right: 0 });
        let m = pad_margins(300, 303, &square(0)).unwrap();
        assert_eq!(m.left, 1);
        assert_eq!(m.right, 1);
    }

    #[test]
    fn test_ratio_margins() {
        let ratio = |a, b, margin| PadParams {
            method: BorderMethod::Reflect,
            aspect: AspectMode::Ratio(a, b),
            margin,
        };

        // 100x200 at 4:5 wants 160 wide.
        let m = pad_margins(100, 200, &ratio(4, 5, 10)).unwrap();
        assert_eq!(m, Margins { top: 10, bottom: 10, left: 30, right: 30 });

        // Already wider than the ratio: horizontal margin is zero, vertical keeps the flat margin.
        let m = pad_margins(300, 200, &ratio(1, 1, 10)).unwrap();
        assert_eq!(m, Margins { top: 10, bottom: 10, left: 0, right: 0 });

        // 7 * 3 / 2 = 10 (truncated), shortfall 5 -> 2 per side.
        let m = pad_margins(5, 7, &ratio(3, 2, 0)).unwrap();
        assert_eq!(m.left, 2);
        assert_eq!(m.right, 2);
    }

    #[test]
    fn test_ratio_margins_reject_overflow() {
        let params = PadParams {
            method: BorderMethod::Reflect,
            aspect: AspectMode::Ratio(32, 1),
            margin: 0,
        };
        assert!(matches!(
            pad_margins(1, u32::MAX / 2, &params),
            Err(EditorError::InvalidParams(_))
        ));

        let flat = PadParams {
            aspect: AspectMode::Rectangle,
            margin: 500,
            ..params
        };
        assert!(pad_margins(u32::MAX - 10, 1, &flat).is_err());
    }

    #[test]
    fn test_rectangle_is_flat_margin() {
        let params = PadParams {
            method: BorderMethod::Constant,
            aspect: AspectMode::Rectangle,
            margin: 4,
        };
        let out = pad(&solid(10, 6, [9, 9, 9]), &params).unwrap();
        assert_eq!(out.dimensions(), (18, 14));
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(out.get_pixel(4, 4).0, [9, 9, 9]);
    }

    #[test]
    fn test_border_fill_methods() {
        let img = row(&[1, 2, 3]);
        let margins = Margins { top: 0, bottom: 0, left: 2, right: 2 };

        let reflect = copy_make_border(&img, margins, BorderMethod::Reflect);
        assert_eq!(row_values(&reflect), vec![2, 1, 1, 2, 3, 3, 2]);

        let replicate = copy_make_border(&img, margins, BorderMethod::Replicate);
        assert_eq!(row_values(&replicate), vec![1, 1, 1, 2, 3, 3, 3]);

        let constant = copy_make_border(&img, margins, BorderMethod::Constant);
        assert_eq!(row_values(&constant), vec![0, 0, 1, 2, 3, 0, 0]);
    }

    #[test]
    fn test_reflect_wider_than_image() {
        let img = row(&[1, 2]);
        let margins = Margins { top: 0, bottom: 0, left: 5, right: 0 };
        let out = copy_make_border(&img, margins, BorderMethod::Reflect);
        assert_eq!(row_values(&out), vec![1, 1, 2, 2, 1, 1, 2]);
    }

    #[test]
    fn test_transform_rejects_before_work() {
        let img = solid(2, 2, [1, 2, 3]);
        let result = transform(&img, &Operation::Brightness { delta: 500 });
        assert!(matches!(result, Err(EditorError::InvalidParams(_))));
    }

    #[test]
    fn test_side_by_side_layout() {
        let left = solid(10, 20, [255, 0, 0]);
        let right = solid(7, 7, [0, 0, 255]);
        let out = side_by_side(&left, &right, 30);
        assert_eq!(out.dimensions(), (60, 30));
        assert_eq!(out.get_pixel(5, 5).0, [255, 0, 0]);
        assert_eq!(out.get_pixel(45, 5).0, [0, 0, 255]);
    }
}
