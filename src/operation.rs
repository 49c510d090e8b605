use std::fmt;
use std::ops::RangeInclusive;

use image::RgbImage;

use crate::error::{EditorError, Result};

pub const BRIGHTNESS_RANGE: RangeInclusive<i32> = -100..=100;
pub const CONTRAST_RANGE: RangeInclusive<f32> = 0.1..=5.0;
pub const MARGIN_RANGE: RangeInclusive<u32> = 0..=500;
pub const ALPHA_RANGE: RangeInclusive<f64> = 0.0..=1.0;
/// Bounds for each term of an `a:b` padding ratio.
pub const RATIO_TERM_RANGE: RangeInclusive<u32> = 1..=32;

/// How the area added by padding is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMethod {
    /// Solid black.
    Constant,
    /// Mirror image of the border including the edge pixel: `fedcba|abcdef|fedcba`.
    #[default]
    Reflect,
    /// Edge pixel repeated outward: `aaaaaa|abcdef|ffffff`.
    Replicate,
}

impl BorderMethod {
    pub const ALL: [BorderMethod; 3] = [
        BorderMethod::Constant,
        BorderMethod::Reflect,
        BorderMethod::Replicate,
    ];

    /// Unknown names resolve to `Reflect` rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "constant" => BorderMethod::Constant,
            "replicate" => BorderMethod::Replicate,
            _ => BorderMethod::Reflect,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BorderMethod::Constant => "constant",
            BorderMethod::Reflect => "reflect",
            BorderMethod::Replicate => "replicate",
        }
    }
}

impl fmt::Display for BorderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target shape for padding, decided once at the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectMode {
    Square,
    /// Flat margin only.
    #[default]
    Rectangle,
    /// Width:height ratio, each term within `RATIO_TERM_RANGE`.
    Ratio(u32, u32),
}

impl AspectMode {
    /// Parses `square`, `rectangle` or `a:b`.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim().to_lowercase();
        match text.as_str() {
            "square" => Ok(AspectMode::Square),
            "rectangle" => Ok(AspectMode::Rectangle),
            _ => {
                let (a, b) = text
                    .split_once(':')
                    .ok_or_else(|| EditorError::invalid(format!("unknown aspect mode '{}'", text)))?;
                let a: u32 = a
                    .trim()
                    .parse()
                    .map_err(|_| EditorError::invalid(format!("bad ratio term '{}'", a)))?;
                let b: u32 = b
                    .trim()
                    .parse()
                    .map_err(|_| EditorError::invalid(format!("bad ratio term '{}'", b)))?;
                let mode = AspectMode::Ratio(a, b);
                mode.validate()?;
                Ok(mode)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let AspectMode::Ratio(a, b) = *self {
            if !RATIO_TERM_RANGE.contains(&a) || !RATIO_TERM_RANGE.contains(&b) {
                return Err(EditorError::invalid(format!(
                    "ratio {}:{} has a term outside {:?}",
                    a, b, RATIO_TERM_RANGE
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for AspectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectMode::Square => f.write_str("square"),
            AspectMode::Rectangle => f.write_str("rectangle"),
            AspectMode::Ratio(a, b) => write!(f, "{}:{}", a, b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdMode {
    #[default]
    Binary,
    Inverse,
}

impl ThresholdMode {
    /// Anything other than `inverse` is treated as binary.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("inverse") {
            ThresholdMode::Inverse
        } else {
            ThresholdMode::Binary
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThresholdMode::Binary => "binary",
            ThresholdMode::Inverse => "inverse",
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadParams {
    pub method: BorderMethod,
    pub aspect: AspectMode,
    /// Flat margin in pixels, applied to every side before the aspect adjustment.
    pub margin: u32,
}

/// One editing step with its parameters.
#[derive(Clone)]
pub enum Operation {
    Brightness { delta: i32 },
    Contrast { factor: f32 },
    Grayscale,
    Pad(PadParams),
    Threshold { mode: ThresholdMode },
    Blend {
        second: RgbImage,
        /// File name shown in the operation log.
        source_name: String,
        alpha: f64,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Brightness { .. } => "brightness",
            Operation::Contrast { .. } => "contrast",
            Operation::Grayscale => "grayscale",
            Operation::Pad(_) => "pad",
            Operation::Threshold { .. } => "threshold",
            Operation::Blend { .. } => "blend",
        }
    }

    /// Range and shape checks. Runs before any pixel work.
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Brightness { delta } => {
                if !BRIGHTNESS_RANGE.contains(delta) {
                    return Err(EditorError::invalid(format!(
                        "brightness {} outside {:?}",
                        delta, BRIGHTNESS_RANGE
                    )));
                }
            }
            Operation::Contrast { factor } => {
                if !CONTRAST_RANGE.contains(factor) {
                    return Err(EditorError::invalid(format!(
                        "contrast {} outside {:?}",
                        factor, CONTRAST_RANGE
                    )));
                }
            }
            Operation::Pad(params) => {
                if !MARGIN_RANGE.contains(&params.margin) {
                    return Err(EditorError::invalid(format!(
                        "padding {}px outside {:?}",
                        params.margin, MARGIN_RANGE
                    )));
                }
                params.aspect.validate()?;
            }
            Operation::Blend { second, alpha, .. } => {
                if !ALPHA_RANGE.contains(alpha) {
                    return Err(EditorError::invalid(format!(
                        "alpha {} outside {:?}",
                        alpha, ALPHA_RANGE
                    )));
                }
                if second.width() == 0 || second.height() == 0 {
                    return Err(EditorError::invalid("second image is empty"));
                }
            }
            Operation::Grayscale | Operation::Threshold { .. } => {}
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Brightness { delta } => write!(f, "brightness {:+}", delta),
            Operation::Contrast { factor } => write!(f, "contrast x{:.2}", factor),
            Operation::Grayscale => f.write_str("grayscale"),
            Operation::Pad(p) => write!(f, "padded {}px with {} ({})", p.margin, p.method, p.aspect),
            Operation::Threshold { mode } => write!(f, "threshold ({})", mode),
            Operation::Blend {
                source_name, alpha, ..
            } => write!(f, "blended with {}, alpha={:.2}", source_name, alpha),
        }
    }
}

// Image payloads are left out; the description is what matters when debugging.
impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operation({})", self)
    }
}
