use rand::Rng;

use crate::{
    foundation::{
        core::{Point, Rect, Rgba8, Vec2},
        error::{SpriteError, SpriteResult},
    },
    pattern::branch::{BranchGenerator, PinSpec},
    raster::{
        draw::{ShapeStyle, draw_rectangle},
        surface::{RasterSurface, ResampleFilter},
        text::{FontProvider, draw_text, measure_text},
    },
};

/// Chip icon: outlined body, centered label, one pin row above and one below.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChipConfig {
    /// Working canvas edge (square).
    pub sprite_size: u32,
    /// Delivered edge after the downscale.
    pub output_size: u32,
    pub filter: ResampleFilter,
    pub outline_thickness: u32,
    pub outline_color: Rgba8,
    pub body_fill: Option<Rgba8>,
    pub body_scale_x: f64,
    pub body_scale_y: f64,
    /// `None` skips the label (and the font lookup).
    pub label: Option<String>,
    pub font: String,
    pub font_size: f32,
    pub min_pin_length: u32,
    pub max_pin_length: u32,
    pub pin_radius: f64,
    pub lateral_unit: f64,
    /// Same table is used for the top and the bottom row.
    pub pins: Vec<PinSpec>,
}

impl Default for ChipConfig {
    fn default() -> Self {
        Self {
            sprite_size: 256,
            output_size: 128,
            filter: ResampleFilter::Lanczos3,
            outline_thickness: 5,
            outline_color: Rgba8::BLACK,
            body_fill: None,
            body_scale_x: 0.6,
            body_scale_y: 0.4,
            label: Some("AI".to_string()),
            font: "Arial".to_string(),
            font_size: 48.0,
            min_pin_length: 20,
            max_pin_length: 50,
            pin_radius: 7.0,
            lateral_unit: 20.0,
            pins: vec![
                PinSpec::fixed(20.0, -1),
                PinSpec::fixed(40.0, -1),
                PinSpec::fixed(60.0, -1),
                PinSpec::fixed(20.0, 0),
                PinSpec::fixed(40.0, 0),
                PinSpec::fixed(60.0, 1),
                PinSpec::fixed(40.0, 1),
            ],
        }
    }
}

impl ChipConfig {
    pub fn validate(&self) -> SpriteResult<()> {
        if self.sprite_size == 0 || self.output_size == 0 {
            return Err(SpriteError::validation("chip sizes must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.body_scale_x) || !(0.0..=1.0).contains(&self.body_scale_y)
        {
            return Err(SpriteError::validation("chip body scale must be in [0, 1]"));
        }
        if self.label.is_some() && (!self.font_size.is_finite() || self.font_size <= 0.0) {
            return Err(SpriteError::validation(format!(
                "chip font size must be finite and > 0 (got {})",
                self.font_size
            )));
        }
        self.pin_generator().validate()
    }

    pub fn pin_generator(&self) -> BranchGenerator {
        BranchGenerator {
            min_length: self.min_pin_length,
            max_length: self.max_pin_length,
            lateral_unit: self.lateral_unit,
            pad_radius: self.pin_radius,
            stroke_width: f64::from(self.outline_thickness),
            color: self.outline_color,
        }
    }
}

/// Pixel-space layout of the chip body on the working canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipBody {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
    pub pin_spacing: i64,
}

impl ChipBody {
    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    pub fn pin_x(&self, index: usize) -> i64 {
        self.x1 + self.pin_spacing * (index as i64 + 1)
    }
}

pub fn chip_body(cfg: &ChipConfig) -> ChipBody {
    let size = i64::from(cfg.sprite_size);
    let rect_w = (cfg.sprite_size as f64 * cfg.body_scale_x) as i64;
    let rect_h = (cfg.sprite_size as f64 * cfg.body_scale_y) as i64;
    let x1 = (size - rect_w) / 2;
    let y1 = (size - rect_h) / 2;
    ChipBody {
        x1,
        y1,
        x2: x1 + rect_w,
        y2: y1 + rect_h,
        pin_spacing: rect_w / (cfg.pins.len() as i64 + 1),
    }
}

/// Renders the chip and downscales it to `output_size`.
///
/// The font is resolved before anything is drawn; a missing font fails the
/// whole texture with [`SpriteError::MissingResource`].
#[tracing::instrument(skip_all, fields(size = cfg.sprite_size, pins = cfg.pins.len()))]
pub fn render_chip<R: Rng + ?Sized>(
    cfg: &ChipConfig,
    fonts: &dyn FontProvider,
    rng: &mut R,
) -> SpriteResult<RasterSurface> {
    cfg.validate()?;
    let label = match cfg.label.as_deref().filter(|l| !l.is_empty()) {
        Some(text) => Some((text, fonts.load(&cfg.font)?)),
        None => None,
    };

    let mut sprite = RasterSurface::new(cfg.sprite_size, cfg.sprite_size)?;
    let body = chip_body(cfg);

    let mut style = ShapeStyle::outlined(cfg.outline_color, cfg.outline_thickness);
    style.fill = cfg.body_fill;
    draw_rectangle(
        &mut sprite,
        Rect::new(body.x1 as f64, body.y1 as f64, body.x2 as f64, body.y2 as f64),
        style,
    );

    if let Some((text, font)) = &label {
        if let Some(bounds) = measure_text(font, cfg.font_size, text) {
            let tw = bounds.width().round() as i64;
            let th = bounds.height().round() as i64;
            let text_x = (i64::from(cfg.sprite_size) - tw) / 2;
            let text_y = body.y1 + (body.height() - th) / 2 - th / 4;
            draw_text(
                &mut sprite,
                font,
                cfg.font_size,
                Point::new(text_x as f64, text_y as f64),
                text,
                cfg.outline_color,
            );
        }
    }

    let pins = cfg.pin_generator();
    for (row_y, dir) in [(body.y1, Vec2::new(0.0, -1.0)), (body.y2, Vec2::new(0.0, 1.0))] {
        for (i, pin) in cfg.pins.iter().enumerate() {
            let anchor = Point::new(body.pin_x(i) as f64, row_y as f64);
            let branch = pins.draw(&mut sprite, rng, anchor, dir, *pin)?;
            tracing::trace!(i, length = branch.length, step = pin.lateral_step, "pin");
        }
    }

    sprite.resize(cfg.output_size, cfg.output_size, cfg.filter)
}
