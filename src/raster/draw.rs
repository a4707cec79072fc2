//! Aliased drawing primitives.
//!
//! Coordinates are in surface pixel space with pixel `(x, y)` centered on the
//! integer point `(x, y)`; bounding boxes are inclusive on both ends. Output is
//! hard-edged (no coverage blending): smoothing comes from the final
//! downscale, and exact colors keep region fills and recoloring predictable.
//! Geometry may extend past the surface; only on-surface pixels are written.

use crate::{
    foundation::core::{Point, Rect, Rgba8, Vec2},
    raster::surface::RasterSurface,
};

/// Fill and outline of a closed shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Rgba8>,
    pub outline: Option<Rgba8>,
    pub outline_width: u32,
}

impl ShapeStyle {
    pub fn filled(color: Rgba8) -> Self {
        Self {
            fill: Some(color),
            outline: None,
            outline_width: 0,
        }
    }

    pub fn outlined(color: Rgba8, width: u32) -> Self {
        Self {
            fill: None,
            outline: Some(color),
            outline_width: width,
        }
    }

    pub fn with_fill(mut self, color: Rgba8) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Straight segment with a square-ended stroke of `width` pixels.
///
/// Widths of one pixel or less use Bresenham and always touch both endpoints,
/// so a zero-length segment marks a single pixel.
pub fn draw_line(surface: &mut RasterSurface, p0: Point, p1: Point, color: Rgba8, width: f64) {
    if width <= 1.0 {
        bresenham(surface, p0, p1, color);
        return;
    }

    let d = p1 - p0;
    let len = d.hypot();
    if len == 0.0 {
        return;
    }
    let n = Vec2::new(-d.y, d.x) * (width / (2.0 * len));
    let quad = [p0 + n, p1 + n, p1 - n, p0 - n];
    draw_polygon(surface, &quad, color);
}

/// Draws each consecutive pair of `points` as a segment.
pub fn draw_polyline(surface: &mut RasterSurface, points: &[Point], color: Rgba8, width: f64) {
    for pair in points.windows(2) {
        draw_line(surface, pair[0], pair[1], color, width);
    }
}

fn bresenham(surface: &mut RasterSurface, p0: Point, p1: Point, color: Rgba8) {
    let (mut x0, mut y0) = (p0.x.round() as i64, p0.y.round() as i64);
    let (x1, y1) = (p1.x.round() as i64, p1.y.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        surface.put_clipped(x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Solid fill of a closed, non-self-intersecting polygon, boundary included.
pub fn draw_polygon(surface: &mut RasterSurface, points: &[Point], color: Rgba8) {
    match points.len() {
        0 => return,
        1 => {
            bresenham(surface, points[0], points[0], color);
            return;
        }
        _ => {}
    }

    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let y_start = (min_y.ceil() as i64).max(0);
    let y_end = (max_y.floor() as i64).min(i64::from(surface.height()) - 1);

    let mut xs: Vec<f64> = Vec::with_capacity(points.len());
    for y in y_start..=y_end {
        let sy = y as f64;
        xs.clear();
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let (lo, hi) = if a.y <= b.y { (a, b) } else { (b, a) };
            // Half-open in y so shared vertices are counted once.
            if sy >= lo.y && sy < hi.y {
                let t = (sy - lo.y) / (hi.y - lo.y);
                xs.push(lo.x + t * (hi.x - lo.x));
            }
        }
        xs.sort_by(f64::total_cmp);
        for span in xs.chunks_exact(2) {
            let x0 = (span[0] - 1e-9).ceil() as i64;
            let x1 = (span[1] + 1e-9).floor() as i64;
            fill_span(surface, y, x0, x1, color);
        }
    }

    for (i, &a) in points.iter().enumerate() {
        bresenham(surface, a, points[(i + 1) % points.len()], color);
    }
}

fn fill_span(surface: &mut RasterSurface, y: i64, x0: i64, x1: i64, color: Rgba8) {
    let x0 = x0.max(0);
    let x1 = x1.min(i64::from(surface.width()) - 1);
    for x in x0..=x1 {
        surface.put_clipped(x, y, color);
    }
}

/// Integer pixel range covered by an inclusive box, clipped to the surface.
fn clipped_box(surface: &RasterSurface, bbox: Rect) -> Option<(i64, i64, i64, i64)> {
    let x0 = (bbox.x0.round() as i64).max(0);
    let y0 = (bbox.y0.round() as i64).max(0);
    let x1 = (bbox.x1.round() as i64).min(i64::from(surface.width()) - 1);
    let y1 = (bbox.y1.round() as i64).min(i64::from(surface.height()) - 1);
    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}

/// Axis-aligned rectangle; the outline grows inward from the box edges.
pub fn draw_rectangle(surface: &mut RasterSurface, bbox: Rect, style: ShapeStyle) {
    let bbox = bbox.abs();
    let (bx0, by0, bx1, by1) = (
        bbox.x0.round() as i64,
        bbox.y0.round() as i64,
        bbox.x1.round() as i64,
        bbox.y1.round() as i64,
    );
    let Some((x0, y0, x1, y1)) = clipped_box(surface, bbox) else {
        return;
    };
    let w = i64::from(if style.outline.is_some() {
        style.outline_width.max(1)
    } else {
        0
    });

    for y in y0..=y1 {
        for x in x0..=x1 {
            let on_outline =
                x < bx0 + w || x > bx1 - w || y < by0 + w || y > by1 - w;
            let color = if on_outline { style.outline } else { style.fill };
            if let Some(c) = color {
                surface.put_clipped(x, y, c);
            }
        }
    }
}

/// Axis-aligned ellipse inscribed in an inclusive box; the outline grows inward.
pub fn draw_ellipse(surface: &mut RasterSurface, bbox: Rect, style: ShapeStyle) {
    let bbox = bbox.abs();
    let c = bbox.center();
    let rx = bbox.width() / 2.0 + 0.5;
    let ry = bbox.height() / 2.0 + 0.5;
    let Some((x0, y0, x1, y1)) = clipped_box(surface, bbox) else {
        return;
    };
    let w = if style.outline.is_some() {
        f64::from(style.outline_width.max(1))
    } else {
        0.0
    };
    let (irx, iry) = (rx - w, ry - w);

    let inside = |x: i64, y: i64, rx: f64, ry: f64| -> bool {
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let nx = (x as f64 - c.x) / rx;
        let ny = (y as f64 - c.y) / ry;
        nx * nx + ny * ny <= 1.0
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            if !inside(x, y, rx, ry) {
                continue;
            }
            let color = if inside(x, y, irx, iry) {
                style.fill
            } else {
                style.outline
            };
            if let Some(color) = color {
                surface.put_clipped(x, y, color);
            }
        }
    }
}

/// Solid disc; used for pin pads.
pub fn fill_circle(surface: &mut RasterSurface, center: Point, radius: f64, color: Rgba8) {
    let bbox = Rect::new(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
    );
    draw_ellipse(surface, bbox, ShapeStyle::filled(color));
}
