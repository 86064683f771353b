use crate::error::{Error, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use super::render::{RasterSurface, compose, plan_frame};
use super::state::Composition;
use super::CompositorApp;

/// Render the committed composition (no live drag) at `size`×`size`.
pub(super) fn render_export(comp: &Composition, size: u32) -> Result<RgbaImage> {
    let mut surface = RasterSurface::for_canvas(comp.canvas(), [size, size])?;
    compose(&mut surface, comp.background(), &plan_frame(comp, None));
    Ok(surface.into_pixels())
}

pub(super) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(bytes)
}

pub(super) fn export_png(comp: &Composition, size: u32, path: &Path) -> Result<()> {
    let image = render_export(comp, size)?;
    let bytes = encode_png(&image)?;
    std::fs::write(path, bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

impl CompositorApp {
    pub(super) fn export_dialog(&mut self) {
        if self.comp.drag.is_dragging() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&self.settings.export_file_name)
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return;
        };
        match export_png(&self.comp, self.settings.export_size, &path) {
            Ok(()) => {
                log::info!("exported {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::warn!("export failed: {e}");
                self.status = Some(format!("Export failed: {e}"));
            }
        }
    }
}
