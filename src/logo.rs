//! Procedural three-ring logo.

use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_polygon_mut};
use imageproc::point::Point;

pub const CANVAS_SIZE: u32 = 400;
pub const RADIUS: i32 = 60;
pub const THICKNESS: i32 = 35;
pub const OUTER_RADIUS: i32 = RADIUS + THICKNESS / 2;
pub const INNER_RADIUS: i32 = RADIUS - THICKNESS / 2;
/// Angular width of the opening in the `Arcs` style.
pub const GAP_DEGREES: f32 = 60.0;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoStyle {
    /// Full rings with white triangles carved out.
    #[default]
    Cutout,
    /// Rings drawn as open arcs.
    Arcs,
}

impl LogoStyle {
    pub fn default_output(&self) -> &'static str {
        match self {
            LogoStyle::Cutout => "logo_cutout.jpg",
            LogoStyle::Arcs => "logo_arcs.jpg",
        }
    }
}

impl FromStr for LogoStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cutout" => Ok(LogoStyle::Cutout),
            "arcs" => Ok(LogoStyle::Arcs),
            other => Err(format!("unknown logo style '{}' (expected cutout or arcs)", other)),
        }
    }
}

impl fmt::Display for LogoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoStyle::Cutout => f.write_str("cutout"),
            LogoStyle::Arcs => f.write_str("arcs"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ring {
    pub center: (i32, i32),
    pub color: Rgb<u8>,
    /// Triangle with its apex on the ring center; the opening of the ring.
    pub cutout: [(i32, i32); 3],
}

impl Ring {
    /// Direction from the center towards the middle of the opening, in degrees
    /// (image coordinates, y down).
    pub fn gap_direction(&self) -> f32 {
        let (cx, cy) = self.center;
        let mid_x = (self.cutout[0].0 + self.cutout[1].0) as f32 / 2.0 - cx as f32;
        let mid_y = (self.cutout[0].1 + self.cutout[1].1) as f32 / 2.0 - cy as f32;
        mid_y.atan2(mid_x).to_degrees()
    }
}

pub fn rings() -> [Ring; 3] {
    let red = (200, 110);
    let green = (120, 260);
    let blue = (280, 260);
    [
        Ring {
            center: red,
            color: Rgb([255, 0, 0]),
            cutout: [(red.0 - 40, red.1 + 80), (red.0 + 40, red.1 + 80), red],
        },
        Ring {
            center: green,
            color: Rgb([0, 255, 0]),
            cutout: [
                (green.0 + 60, green.1 - 90),
                (green.0 + 100, green.1 - 60),
                green,
            ],
        },
        Ring {
            center: blue,
            color: Rgb([0, 0, 255]),
            cutout: [(blue.0 - 40, blue.1 - 80), (blue.0 + 40, blue.1 - 80), blue],
        },
    ]
}

pub fn draw_logo(style: LogoStyle) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, WHITE);
    for ring in rings() {
        match style {
            LogoStyle::Cutout => draw_cutout_ring(&mut canvas, &ring),
            LogoStyle::Arcs => draw_arc_ring(&mut canvas, &ring),
        }
    }
    canvas
}

fn draw_cutout_ring(canvas: &mut RgbImage, ring: &Ring) {
    draw_filled_circle_mut(canvas, ring.center, OUTER_RADIUS, ring.color);
    draw_filled_circle_mut(canvas, ring.center, INNER_RADIUS, WHITE);

    let triangle: Vec<Point<i32>> = ring.cutout.iter().map(|&(x, y)| Point::new(x, y)).collect();
    draw_polygon_mut(canvas, &triangle, WHITE);
}

fn draw_arc_ring(canvas: &mut RgbImage, ring: &Ring) {
    let (cx, cy) = ring.center;
    let gap = ring.gap_direction();
    let inner_sq = INNER_RADIUS * INNER_RADIUS;
    let outer_sq = OUTER_RADIUS * OUTER_RADIUS;

    for y in (cy - OUTER_RADIUS).max(0)..=(cy + OUTER_RADIUS).min(CANVAS_SIZE as i32 - 1) {
        for x in (cx - OUTER_RADIUS).max(0)..=(cx + OUTER_RADIUS).min(CANVAS_SIZE as i32 - 1) {
            let (dx, dy) = (x - cx, y - cy);
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < inner_sq || dist_sq > outer_sq {
                continue;
            }
            let angle = (dy as f32).atan2(dx as f32).to_degrees();
            let offset = ((angle - gap + 540.0) % 360.0 - 180.0).abs();
            if offset > GAP_DEGREES / 2.0 {
                canvas.put_pixel(x as u32, y as u32, ring.color);
            }
        }
    }
}
