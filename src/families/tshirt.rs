use std::f64::consts::SQRT_2;

use crate::{
    foundation::{
        core::{Point, Rgba8, Vec2},
        error::{SpriteError, SpriteResult},
    },
    pattern::{
        branch::BranchGenerator,
        recolor::{StripePattern, fill_stripes},
    },
    raster::{
        draw::{draw_line, draw_polyline},
        surface::RasterSurface,
    },
};

/// Two-tone striped t-shirt icon.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TshirtConfig {
    /// Height is derived as `width + width / 4`.
    pub sprite_width: u32,
    pub outline_thickness: u32,
    pub outline_color: Rgba8,
    pub rect_scale_x: f64,
    pub rect_scale_y: f64,
    pub sleeve_width_ratio: f64,
    pub sleeve_delta_ratio: f64,
    pub neck_depth_ratio: f64,
    pub neck_width_ratio: f64,
    pub stripe_width_ratio: f64,
    pub palette: Vec<Rgba8>,
}

impl Default for TshirtConfig {
    fn default() -> Self {
        Self {
            sprite_width: 64,
            outline_thickness: 1,
            outline_color: Rgba8::BLACK,
            rect_scale_x: 0.5,
            rect_scale_y: 0.666,
            sleeve_width_ratio: 0.15,
            sleeve_delta_ratio: 0.1,
            neck_depth_ratio: 0.05,
            neck_width_ratio: 0.3,
            stripe_width_ratio: 0.09,
            palette: vec![
                Rgba8::RED,
                Rgba8::BLUE,
                Rgba8::GREEN,
                Rgba8::YELLOW,
                Rgba8::MAGENTA,
                Rgba8::CYAN,
            ],
        }
    }
}

impl TshirtConfig {
    pub fn validate(&self) -> SpriteResult<()> {
        let layout = self.layout()?;
        if layout.width < 8 {
            return Err(SpriteError::validation("t-shirt sprite width must be >= 8"));
        }
        if layout.stripe_width == 0 {
            return Err(SpriteError::validation("t-shirt stripe width must be > 0"));
        }
        if self.palette.is_empty() {
            return Err(SpriteError::validation("t-shirt palette must not be empty"));
        }
        if self.palette.contains(&self.outline_color) {
            tracing::warn!("t-shirt palette contains the outline color; stripes will merge with the outline");
        }
        if layout.left - layout.sleeve_width - layout.sleeve_delta < 0
            || layout.right + layout.sleeve_width + layout.sleeve_delta >= i64::from(layout.width)
        {
            return Err(SpriteError::validation("t-shirt sleeves do not fit the sprite"));
        }
        Ok(())
    }

    /// Fails when the derived height does not fit a surface dimension.
    pub fn layout(&self) -> SpriteResult<TshirtLayout> {
        let w = i64::from(self.sprite_width);
        let h = w + w / 4;
        let height = u32::try_from(h).map_err(|_| {
            SpriteError::validation(format!(
                "t-shirt sprite width {} gives a height beyond u32",
                self.sprite_width
            ))
        })?;
        let wf = w as f64;
        let hf = h as f64;

        let rect_w = (wf * self.rect_scale_x) as i64;
        let rect_h = (hf * self.rect_scale_y) as i64;
        let left = (w - rect_w) / 2;
        let top = (h - rect_h) / 2;
        let right = left + rect_w;
        let bottom = top + rect_h;
        let cx = (left + right) / 2;
        let neck_width = (self.neck_width_ratio * wf) as i64;

        Ok(TshirtLayout {
            width: self.sprite_width,
            height,
            left,
            top,
            right,
            bottom,
            cx,
            neck_x1: cx - neck_width / 2,
            neck_x2: cx + neck_width / 2,
            neck_y: top + (self.neck_depth_ratio * hf) as i64,
            sleeve_width: (self.sleeve_width_ratio * wf) as i64,
            sleeve_delta: (self.sleeve_delta_ratio * wf) as i64,
            stripe_width: (self.stripe_width_ratio * wf) as u32,
        })
    }
}

/// Integer geometry derived from [`TshirtConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TshirtLayout {
    pub width: u32,
    pub height: u32,
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub cx: i64,
    pub neck_x1: i64,
    pub neck_x2: i64,
    pub neck_y: i64,
    pub sleeve_width: i64,
    pub sleeve_delta: i64,
    pub stripe_width: u32,
}

impl TshirtLayout {
    /// Interior point used to seed the body fill.
    pub fn seed(&self) -> (i64, i64) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

fn pt(x: i64, y: i64) -> Point {
    Point::new(x as f64, y as f64)
}

/// Draws the closed garment outline (body, neck V, both sleeves).
#[tracing::instrument(skip_all)]
pub fn render_tshirt_outline(cfg: &TshirtConfig) -> SpriteResult<RasterSurface> {
    cfg.validate()?;
    let l = cfg.layout()?;
    let mut sprite = RasterSurface::new(l.width, l.height)?;
    let (color, width) = (cfg.outline_color, f64::from(cfg.outline_thickness));
    let side_top = l.top + 2 * l.sleeve_width;

    // Shoulders, neck V, sides, hem.
    draw_line(&mut sprite, pt(l.left, l.top), pt(l.neck_x1, l.top), color, width);
    draw_line(&mut sprite, pt(l.neck_x2, l.top), pt(l.right, l.top), color, width);
    draw_polyline(
        &mut sprite,
        &[pt(l.neck_x1, l.top), pt(l.cx, l.neck_y), pt(l.neck_x2, l.top)],
        color,
        width,
    );
    draw_polyline(
        &mut sprite,
        &[
            pt(l.right, side_top),
            pt(l.right, l.bottom),
            pt(l.left, l.bottom),
            pt(l.left, side_top),
        ],
        color,
        width,
    );

    // Each sleeve is a padless branch leaving the shoulder diagonally, bent
    // across by one sleeve width, then closed back onto the body side.
    let sleeves = BranchGenerator {
        min_length: 0,
        max_length: 0,
        lateral_unit: l.sleeve_width as f64 * SQRT_2,
        pad_radius: 0.0,
        stroke_width: width,
        color,
    };
    let reach = (l.sleeve_width + l.sleeve_delta) as f64 * SQRT_2;
    let d = l.sleeve_delta as f64;
    for (shoulder, dir, step, closing) in [
        (pt(l.left, l.top), Vec2::new(-1.0, 1.0), 1, Vec2::new(d, -d)),
        (pt(l.right, l.top), Vec2::new(1.0, 1.0), -1, Vec2::new(-d, -d)),
    ] {
        let branch = sleeves.trace_fixed(shoulder, dir, reach, step)?;
        sleeves.render(&mut sprite, &branch);
        draw_line(&mut sprite, branch.end, branch.end + closing, color, width);
    }

    Ok(sprite)
}

/// Renders a shirt whose body alternates `first` and `second` in vertical stripes.
#[tracing::instrument(skip(cfg))]
pub fn render_tshirt(cfg: &TshirtConfig, first: Rgba8, second: Rgba8) -> SpriteResult<RasterSurface> {
    let mut sprite = render_tshirt_outline(cfg)?;
    let l = cfg.layout()?;
    let pattern = StripePattern::new(first, second, l.stripe_width)?;
    fill_stripes(&mut sprite, l.seed(), Rgba8::TRANSPARENT, &pattern)?;
    Ok(sprite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_reference_numbers() {
        let l = TshirtConfig::default().layout().unwrap();
        assert_eq!((l.width, l.height), (64, 80));
        assert_eq!((l.left, l.top, l.right, l.bottom), (16, 13, 48, 66));
        assert_eq!((l.neck_x1, l.neck_x2, l.neck_y), (23, 41, 17));
        assert_eq!((l.sleeve_width, l.sleeve_delta), (9, 6));
        assert_eq!(l.stripe_width, 5);
        assert_eq!(l.seed(), (32, 39));
    }

    #[test]
    fn sleeves_close_onto_the_body_sides() {
        let s = render_tshirt_outline(&TshirtConfig::default()).unwrap();
        let black = |x: i64, y: i64| s.get_pixel(x, y).unwrap() == Rgba8::BLACK;
        // Left sleeve: (16,13) -> (1,28) -> (10,37) -> (16,31).
        for (x, y) in [(1, 28), (10, 37), (16, 31), (8, 21), (13, 34)] {
            assert!(black(x, y), "left ({x},{y})");
        }
        // Right sleeve: (48,13) -> (63,28) -> (54,37) -> (48,31).
        for (x, y) in [(63, 28), (54, 37), (48, 31), (56, 21), (51, 34)] {
            assert!(black(x, y), "right ({x},{y})");
        }
        assert!(!black(32, 39));
    }

    #[test]
    fn body_fill_stays_inside_the_outline() {
        let s = render_tshirt(&TshirtConfig::default(), Rgba8::RED, Rgba8::BLUE).unwrap();
        assert_eq!(s.get_pixel(0, 0).unwrap(), Rgba8::TRANSPARENT);
        assert_eq!(s.get_pixel(32, 75).unwrap(), Rgba8::TRANSPARENT);
        assert_eq!(s.get_pixel(32, 14).unwrap(), Rgba8::TRANSPARENT);
        // Band index is x / 5: 32 -> 6 (first color), 27 -> 5 (second).
        assert_eq!(s.get_pixel(32, 39).unwrap(), Rgba8::RED);
        assert_eq!(s.get_pixel(27, 39).unwrap(), Rgba8::BLUE);
        // Sleeve interiors are part of the body region.
        assert_eq!(s.get_pixel(8, 28).unwrap(), Rgba8::BLUE);
    }

    #[test]
    fn oversized_width_is_rejected_instead_of_truncated() {
        let cfg = TshirtConfig {
            sprite_width: u32::MAX,
            ..TshirtConfig::default()
        };
        assert!(matches!(cfg.layout(), Err(SpriteError::Validation(_))));
        assert!(matches!(
            render_tshirt(&cfg, Rgba8::RED, Rgba8::BLUE),
            Err(SpriteError::Validation(_))
        ));
        // Largest width whose height still fits.
        let cfg = TshirtConfig {
            sprite_width: 3_435_973_836,
            ..TshirtConfig::default()
        };
        assert_eq!(cfg.layout().unwrap().height, u32::MAX);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let cfg = TshirtConfig {
            palette: vec![],
            ..TshirtConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SpriteError::Validation(_))));
    }
}
