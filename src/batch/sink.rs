use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{SpriteError, SpriteResult},
    raster::surface::RasterSurface,
};

/// Destination for finished textures, keyed by file name.
pub trait ImageSink {
    fn save(&mut self, name: &str, surface: &RasterSurface) -> SpriteResult<()>;
}

/// Writes each texture as an RGBA PNG under a directory.
#[derive(Clone, Debug)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl ImageSink for PngDirSink {
    fn save(&mut self, name: &str, surface: &RasterSurface) -> SpriteResult<()> {
        if name.is_empty() || Path::new(name).components().count() != 1 {
            return Err(SpriteError::validation(format!(
                "sink name must be a plain file name (got '{name}')"
            )));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            SpriteError::io(format!("create output dir '{}': {e}", self.dir.display()))
        })?;

        let path = self.path_for(name);
        image::save_buffer_with_format(
            &path,
            surface.as_raw(),
            surface.width(),
            surface.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| SpriteError::io(format!("write png '{}': {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "texture saved");
        Ok(())
    }
}

/// Keeps saved textures in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub images: Vec<(String, RasterSurface)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<&str> {
        self.images.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RasterSurface> {
        self.images
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}

impl ImageSink for MemorySink {
    fn save(&mut self, name: &str, surface: &RasterSurface) -> SpriteResult<()> {
        self.images.push((name.to_string(), surface.clone()));
        Ok(())
    }
}

/// Grid of equally sized cells; cell `(row, col)` is pasted at
/// `(col * cell_width, row * cell_height)`.
#[derive(Clone, Debug)]
pub struct ContactSheet {
    cols: u32,
    rows: u32,
    cell_width: u32,
    cell_height: u32,
    sheet: RasterSurface,
}

impl ContactSheet {
    pub fn new(cols: u32, rows: u32, cell_width: u32, cell_height: u32) -> SpriteResult<Self> {
        let width = cols
            .checked_mul(cell_width)
            .ok_or_else(|| SpriteError::validation("contact sheet width overflows"))?;
        let height = rows
            .checked_mul(cell_height)
            .ok_or_else(|| SpriteError::validation("contact sheet height overflows"))?;
        Ok(Self {
            cols,
            rows,
            cell_width,
            cell_height,
            sheet: RasterSurface::new(width, height)?,
        })
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn paste(&mut self, row: u32, col: u32, cell: &RasterSurface) -> SpriteResult<()> {
        if row >= self.rows || col >= self.cols {
            return Err(SpriteError::validation(format!(
                "cell ({row},{col}) outside a {}x{} sheet",
                self.rows, self.cols
            )));
        }
        if cell.width() != self.cell_width || cell.height() != self.cell_height {
            return Err(SpriteError::validation(format!(
                "cell is {}x{}, sheet expects {}x{}",
                cell.width(),
                cell.height(),
                self.cell_width,
                self.cell_height
            )));
        }

        self.sheet.paste(
            cell,
            i64::from(col * self.cell_width),
            i64::from(row * self.cell_height),
        );
        Ok(())
    }

    pub fn as_surface(&self) -> &RasterSurface {
        &self.sheet
    }

    pub fn into_surface(self) -> RasterSurface {
        self.sheet
    }
}
