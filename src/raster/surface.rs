use image::{RgbaImage, imageops::FilterType};

use crate::foundation::{
    core::Rgba8,
    error::{SpriteError, SpriteResult},
};

/// Resampling filter used by [`RasterSurface::resize`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(f: ResampleFilter) -> Self {
        match f {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Addressable RGBA pixel buffer, fully transparent on creation.
///
/// Explicit pixel access is bounds-checked and fails with
/// [`SpriteError::OutOfBounds`]. Drawing code goes through the `*_clipped`
/// writers, which silently drop pixels that fall outside the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterSurface {
    img: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> SpriteResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation(format!(
                "surface size must be > 0 (got {width}x{height})"
            )));
        }
        Ok(Self {
            img: RgbaImage::new(width, height),
        })
    }

    pub fn from_image(img: RgbaImage) -> SpriteResult<Self> {
        if img.width() == 0 || img.height() == 0 {
            return Err(SpriteError::validation("surface image must be non-empty"));
        }
        Ok(Self { img })
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }

    fn check(&self, x: i64, y: i64) -> SpriteResult<(u32, u32)> {
        if !self.contains(x, y) {
            return Err(SpriteError::out_of_bounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        Ok((x as u32, y as u32))
    }

    pub fn get_pixel(&self, x: i64, y: i64) -> SpriteResult<Rgba8> {
        let (x, y) = self.check(x, y)?;
        Ok(Rgba8::from(self.img.get_pixel(x, y).0))
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba8) -> SpriteResult<()> {
        let (x, y) = self.check(x, y)?;
        self.img.put_pixel(x, y, image::Rgba(color.to_array()));
        Ok(())
    }

    /// Writes `color` if `(x, y)` is on the surface; returns whether it was written.
    pub fn put_clipped(&mut self, x: i64, y: i64, color: Rgba8) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.img
            .put_pixel(x as u32, y as u32, image::Rgba(color.to_array()));
        true
    }

    /// Source-over blend of `color` scaled by `coverage`, clipped to the surface.
    pub fn blend_clipped(&mut self, x: i64, y: i64, color: Rgba8, coverage: f32) {
        if !self.contains(x, y) {
            return;
        }
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        px.0 = Rgba8::from(px.0).over(color, coverage).to_array();
    }

    /// Row-major iterator over `(x, y, color)`.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Rgba8)> + '_ {
        self.img
            .enumerate_pixels()
            .map(|(x, y, p)| (x, y, Rgba8::from(p.0)))
    }

    /// Rewrites every pixel through `f(x, y, current)`.
    pub fn map_pixels(&mut self, mut f: impl FnMut(u32, u32, Rgba8) -> Rgba8) {
        for (x, y, p) in self.img.enumerate_pixels_mut() {
            p.0 = f(x, y, Rgba8::from(p.0)).to_array();
        }
    }

    pub fn count_where(&self, mut pred: impl FnMut(Rgba8) -> bool) -> usize {
        self.pixels().filter(|&(_, _, c)| pred(c)).count()
    }

    /// Resamples into a new surface.
    ///
    /// Filtering happens on premultiplied values so transparent neighbours do
    /// not bleed dark fringes into edges. Same-size requests return a copy.
    pub fn resize(
        &self,
        width: u32,
        height: u32,
        filter: ResampleFilter,
    ) -> SpriteResult<RasterSurface> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation(format!(
                "resize target must be > 0 (got {width}x{height})"
            )));
        }
        if (width, height) == self.img.dimensions() {
            return Ok(self.clone());
        }

        let mut premul = self.img.clone();
        premultiply_rgba8_in_place(&mut premul);
        let mut out = image::imageops::resize(&premul, width, height, filter.into());
        unpremultiply_rgba8_in_place(&mut out);
        Ok(Self { img: out })
    }

    /// Copies `src` over this surface with its top-left at `(x, y)`, clipped.
    pub fn paste(&mut self, src: &RasterSurface, x: i64, y: i64) {
        image::imageops::replace(&mut self.img, &src.img, x, y);
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    pub fn as_raw(&self) -> &[u8] {
        self.img.as_raw()
    }
}

fn premultiply_rgba8_in_place(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let a = u16::from(px.0[3]);
        for c in &mut px.0[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

fn unpremultiply_rgba8_in_place(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let a = u16::from(px.0[3]);
        if a == 0 {
            px.0 = [0, 0, 0, 0];
            continue;
        }
        for c in &mut px.0[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
