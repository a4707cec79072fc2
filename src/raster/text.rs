use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, Glyph, PxScale, ScaleFont, point};

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{SpriteError, SpriteResult},
    },
    raster::surface::RasterSurface,
};

/// Resolves a font by name.
pub trait FontProvider {
    fn load(&self, name: &str) -> SpriteResult<FontVec>;
}

/// Looks for `<name>.ttf` / `<name>.otf` (case-insensitive stem) under a set of
/// directory roots. A `name` that is itself an existing file path is loaded directly.
#[derive(Clone, Debug, Default)]
pub struct SystemFontProvider {
    roots: Vec<PathBuf>,
}

impl SystemFontProvider {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Extra roots first, then the platform's usual font directories.
    pub fn with_system_roots(extra: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut roots: Vec<PathBuf> = extra.into_iter().collect();
        roots.extend(system_font_dirs());
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn find(&self, name: &str) -> Option<PathBuf> {
        for root in &self.roots {
            if !root.is_dir() {
                continue;
            }
            let hit = walkdir::WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .find(|p| font_file_matches(p, name));
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

impl FontProvider for SystemFontProvider {
    fn load(&self, name: &str) -> SpriteResult<FontVec> {
        let direct = Path::new(name);
        let path = if direct.is_file() {
            direct.to_path_buf()
        } else {
            self.find(name).ok_or_else(|| {
                SpriteError::missing_resource(format!(
                    "font '{name}' not found in {} search root(s)",
                    self.roots.len()
                ))
            })?
        };

        let bytes = std::fs::read(&path).map_err(|e| {
            SpriteError::missing_resource(format!("read font '{}': {e}", path.display()))
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| {
            SpriteError::missing_resource(format!("parse font '{}': {e}", path.display()))
        })?;
        tracing::debug!(font = name, path = %path.display(), "loaded font");
        Ok(font)
    }
}

fn font_file_matches(path: &Path, name: &str) -> bool {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
    let stem_ok = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case(name));
    ext_ok && stem_ok
}

fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

/// Ink bounds of a laid-out string, relative to the layout origin (top-left,
/// ascender line at `y = 0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBounds {
    pub min: Point,
    pub max: Point,
}

impl TextBounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

// `size_px` is the em size; ab_glyph scales by ascent - descent instead.
fn em_scale(font: &FontVec, size_px: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size_px * font.height_unscaled() / upem),
        _ => PxScale::from(size_px),
    }
}

fn layout(font: &FontVec, size_px: f32, text: &str) -> Vec<Glyph> {
    let scale = em_scale(font, size_px);
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut prev = None;
    let mut glyphs = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, scaled.ascent())));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    glyphs
}

/// Returns `None` for strings with no ink (empty or whitespace only).
pub fn measure_text(font: &FontVec, size_px: f32, text: &str) -> Option<TextBounds> {
    let mut bounds: Option<TextBounds> = None;
    for glyph in layout(font, size_px, text) {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let r = outlined.px_bounds();
        let (min, max) = (
            Point::new(f64::from(r.min.x), f64::from(r.min.y)),
            Point::new(f64::from(r.max.x), f64::from(r.max.y)),
        );
        bounds = Some(match bounds {
            None => TextBounds { min, max },
            Some(b) => TextBounds {
                min: Point::new(b.min.x.min(min.x), b.min.y.min(min.y)),
                max: Point::new(b.max.x.max(max.x), b.max.y.max(max.y)),
            },
        });
    }
    bounds
}

/// Blends antialiased glyph coverage onto the surface with the layout origin at `origin`.
pub fn draw_text(
    surface: &mut RasterSurface,
    font: &FontVec,
    size_px: f32,
    origin: Point,
    text: &str,
    color: Rgba8,
) {
    let (ox, oy) = (origin.x.round() as i64, origin.y.round() as i64);
    for glyph in layout(font, size_px, text) {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let r = outlined.px_bounds();
        let (gx0, gy0) = (r.min.x as i64 + ox, r.min.y as i64 + oy);
        outlined.draw(|gx, gy, coverage| {
            surface.blend_clipped(gx0 + i64::from(gx), gy0 + i64::from(gy), color, coverage);
        });
    }
}
