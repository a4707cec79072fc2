use crate::{
    foundation::{
        core::{Point, Rect, Rgba8},
        error::{SpriteError, SpriteResult},
    },
    raster::{
        draw::{ShapeStyle, draw_ellipse, draw_polygon, fill_circle},
        surface::{RasterSurface, ResampleFilter},
    },
};

/// User/avatar icon: ring, head disc, trapezoid shoulders.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub sprite_size: u32,
    pub output_size: u32,
    pub filter: ResampleFilter,
    pub outline_thickness: u32,
    pub color: Rgba8,
    pub margin_ratio: f64,
    pub head_radius: f64,
    /// Head center height as a fraction of the sprite.
    pub head_y_ratio: f64,
    /// Gap between the head and the top of the body.
    pub body_gap: i64,
    /// Body bottom sits this far above the ring's inner margin.
    pub body_bottom_inset: i64,
    /// Bottom width; the top is half as wide.
    pub body_width: i64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            sprite_size: 256,
            output_size: 128,
            filter: ResampleFilter::Lanczos3,
            outline_thickness: 10,
            color: Rgba8::BLACK,
            margin_ratio: 0.05,
            head_radius: 35.0,
            head_y_ratio: 0.33,
            body_gap: 10,
            body_bottom_inset: 27,
            body_width: 80,
        }
    }
}

impl UserConfig {
    pub fn validate(&self) -> SpriteResult<()> {
        if self.sprite_size == 0 || self.output_size == 0 {
            return Err(SpriteError::validation("user sizes must be > 0"));
        }
        if !(0.0..0.5).contains(&self.margin_ratio) {
            return Err(SpriteError::validation("user margin ratio must be in [0, 0.5)"));
        }
        if self.body_width <= 0 || self.head_radius <= 0.0 {
            return Err(SpriteError::validation("user head and body must be > 0"));
        }
        Ok(())
    }

    /// Body trapezoid corners: top-left, top-right, bottom-right, bottom-left.
    pub fn body_points(&self) -> [Point; 4] {
        let size = i64::from(self.sprite_size);
        let margin = (self.margin_ratio * size as f64) as i64;
        let head_y = (size as f64 * self.head_y_ratio) as i64;
        let y1 = head_y + self.head_radius as i64 + self.body_gap;
        let y2 = size - margin - self.body_bottom_inset;
        let half_top = self.body_width / 2 / 2;
        let half_bottom = self.body_width / 2;
        let cx = size / 2;
        [
            Point::new((cx - half_top) as f64, y1 as f64),
            Point::new((cx + half_top) as f64, y1 as f64),
            Point::new((cx + half_bottom) as f64, y2 as f64),
            Point::new((cx - half_bottom) as f64, y2 as f64),
        ]
    }
}

#[tracing::instrument(skip_all, fields(size = cfg.sprite_size))]
pub fn render_user(cfg: &UserConfig) -> SpriteResult<RasterSurface> {
    cfg.validate()?;
    let size = cfg.sprite_size;
    let mut sprite = RasterSurface::new(size, size)?;

    let margin = (cfg.margin_ratio * f64::from(size)).trunc();
    let far = f64::from(size) - margin;
    draw_ellipse(
        &mut sprite,
        Rect::new(margin, margin, far, far),
        ShapeStyle::outlined(cfg.color, cfg.outline_thickness),
    );

    let head = Point::new(
        f64::from(size / 2),
        (f64::from(size) * cfg.head_y_ratio).trunc(),
    );
    fill_circle(&mut sprite, head, cfg.head_radius, cfg.color);
    draw_polygon(&mut sprite, &cfg.body_points(), cfg.color);

    sprite.resize(cfg.output_size, cfg.output_size, cfg.filter)
}
