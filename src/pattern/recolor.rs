//! Two-phase region recoloring: flood-fill an enclosed region with a reserved
//! mark, then resolve every marked pixel through a spatial pattern.
//!
//! The mark lives in a separate plane of [`Marked`] cells rather than being an
//! RGBA value, so it can never collide with an outline or palette color.

use std::collections::VecDeque;

use crate::{
    foundation::{
        core::Rgba8,
        error::{SpriteError, SpriteResult},
    },
    raster::surface::RasterSurface,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// Diagonal-only gaps in an outline stop the fill.
    #[default]
    Four,
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Connectivity::Four => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            Connectivity::Eight => &[
                (1, 0),
                (-1, 0),
                (0, 1),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marked {
    Color(Rgba8),
    Fill,
}

/// A surface snapshot whose pixels may carry the reserved fill mark.
#[derive(Clone, Debug)]
pub struct MarkedSurface {
    width: u32,
    height: u32,
    cells: Vec<Marked>,
}

impl MarkedSurface {
    pub fn from_surface(surface: &RasterSurface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            cells: surface.pixels().map(|(_, _, c)| Marked::Color(c)).collect(),
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let inside = x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height);
        inside.then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: i64, y: i64) -> SpriteResult<Marked> {
        self.index(x, y)
            .map(|i| self.cells[i])
            .ok_or_else(|| SpriteError::out_of_bounds(x, y, self.width, self.height))
    }

    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Marked::Fill).count()
    }

    /// Marks the region of `background` pixels connected to `seed`.
    ///
    /// Returns the number of marked pixels. A seed that is not on background
    /// marks nothing; a seed off the surface is an error.
    pub fn flood_fill(
        &mut self,
        seed: (i64, i64),
        background: Rgba8,
        connectivity: Connectivity,
    ) -> SpriteResult<usize> {
        let (sx, sy) = seed;
        let start = self
            .index(sx, sy)
            .ok_or_else(|| SpriteError::out_of_bounds(sx, sy, self.width, self.height))?;
        if self.cells[start] != Marked::Color(background) {
            tracing::warn!(x = sx, y = sy, "flood fill seed is not on background; nothing filled");
            return Ok(0);
        }

        let mut filled = 0usize;
        let mut queue = VecDeque::new();
        self.cells[start] = Marked::Fill;
        queue.push_back((sx, sy));

        while let Some((x, y)) = queue.pop_front() {
            filled += 1;
            for &(dx, dy) in connectivity.offsets() {
                let Some(i) = self.index(x + dx, y + dy) else {
                    continue;
                };
                if self.cells[i] == Marked::Color(background) {
                    self.cells[i] = Marked::Fill;
                    queue.push_back((x + dx, y + dy));
                }
            }
        }
        Ok(filled)
    }

    /// Writes resolved colors back: marked pixels through `resolve(x, y)`, the
    /// rest unchanged. Returns the number of resolved pixels.
    pub fn resolve_into(
        &self,
        surface: &mut RasterSurface,
        mut resolve: impl FnMut(u32, u32) -> Rgba8,
    ) -> SpriteResult<usize> {
        if (surface.width(), surface.height()) != (self.width, self.height) {
            return Err(SpriteError::validation(
                "marked surface and target surface differ in size",
            ));
        }
        let mut resolved = 0usize;
        let width = self.width as usize;
        surface.map_pixels(|x, y, current| {
            match self.cells[(y as usize) * width + (x as usize)] {
                Marked::Fill => {
                    resolved += 1;
                    resolve(x, y)
                }
                Marked::Color(_) => current,
            }
        });
        Ok(resolved)
    }
}

/// Two colors alternating in vertical bands: `palette[(x / stripe_width) % 2]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripePattern {
    pub palette: [Rgba8; 2],
    pub stripe_width: u32,
}

impl StripePattern {
    pub fn new(first: Rgba8, second: Rgba8, stripe_width: u32) -> SpriteResult<Self> {
        if stripe_width == 0 {
            return Err(SpriteError::validation("stripe width must be > 0"));
        }
        Ok(Self {
            palette: [first, second],
            stripe_width,
        })
    }

    pub fn color_at(&self, x: u32) -> Rgba8 {
        self.palette[((x / self.stripe_width) % 2) as usize]
    }
}

/// Fills the outline-enclosed region around `seed` and recolors it with
/// vertical stripes. Returns the number of recolored pixels.
pub fn fill_stripes(
    surface: &mut RasterSurface,
    seed: (i64, i64),
    background: Rgba8,
    pattern: &StripePattern,
) -> SpriteResult<usize> {
    let mut marked = MarkedSurface::from_surface(surface);
    let filled = marked.flood_fill(seed, background, Connectivity::Four)?;
    let resolved = marked.resolve_into(surface, |x, _| pattern.color_at(x))?;
    debug_assert_eq!(filled, resolved);
    tracing::debug!(filled, stripe_width = pattern.stripe_width, "recolored region");
    Ok(resolved)
}
