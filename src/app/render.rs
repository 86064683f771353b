use crate::blend::blend_pixel;
use crate::error::{Error, Result};
use crate::model::{BlendMode, LayerSlot, Rgb};
use eframe::egui;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

use super::geometry::{cell_origin, source_tile};
use super::state::Composition;

/// A drawing target that can copy an image region into a destination
/// rectangle under a blend mode. Destination coordinates are canvas pixels;
/// the surface applies its own scale.
pub(super) trait Surface {
    fn clear(&mut self, color: Rgb);
    fn draw_region(&mut self, image: &RgbaImage, src: egui::Rect, dst: egui::Rect, blend: BlendMode);
}

#[derive(Clone, Debug)]
pub(super) struct TileDraw {
    pub src: egui::Rect,
    pub dst: egui::Rect,
}

#[derive(Clone, Debug)]
pub(super) struct LayerPass {
    pub slot: LayerSlot,
    pub image: Arc<RgbaImage>,
    pub blend: BlendMode,
    pub tiles: Vec<TileDraw>,
}

/// Draw calls for one frame, bottom layer first. With `pointer` set, the
/// dragged cell of the selected layer follows it instead of its stored
/// offset.
pub(super) fn plan_frame(comp: &Composition, pointer: Option<egui::Pos2>) -> Vec<LayerPass> {
    let grid = comp.grid();
    let cell_size = comp.cell_size();
    let cell_extent = egui::vec2(cell_size.width, cell_size.height);
    let live = pointer.and_then(|p| comp.live_position(p));

    let mut passes = Vec::new();
    for slot in LayerSlot::ALL {
        let layer = comp.layer(slot);
        let Some(image) = layer.image.as_ref() else {
            continue;
        };
        if !layer.visible {
            continue;
        }
        debug_assert_eq!(layer.offsets.dims(), grid);
        let image_size = egui::vec2(image.width() as f32, image.height() as f32);
        let tiles = grid
            .cells()
            .map(|cell| {
                let offset = layer.offsets.get(cell).unwrap_or_default();
                let mut min = cell_origin(cell, cell_size) + offset.to_vec2();
                if slot == comp.selected()
                    && let Some((live_cell, live_pos)) = live
                    && live_cell == cell
                {
                    min = live_pos;
                }
                TileDraw {
                    src: source_tile(image_size, grid, cell),
                    dst: egui::Rect::from_min_size(min, cell_extent),
                }
            })
            .collect();
        passes.push(LayerPass {
            slot,
            image: Arc::clone(image),
            blend: layer.blend,
            tiles,
        });
    }
    passes
}

pub(super) fn compose<S: Surface>(surface: &mut S, background: Rgb, passes: &[LayerPass]) {
    surface.clear(background);
    for pass in passes {
        log::trace!("compositing {} ({})", pass.slot.label(), pass.blend.name());
        for tile in &pass.tiles {
            surface.draw_region(&pass.image, tile.src, tile.dst, pass.blend);
        }
    }
}

/// CPU raster target used for both the on-screen preview and the export.
pub(super) struct RasterSurface {
    pixels: RgbaImage,
    scale: egui::Vec2,
}

impl RasterSurface {
    pub(super) fn new(width: u32, height: u32, scale: egui::Vec2) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Dimensions { width, height });
        }
        Ok(Self {
            pixels: RgbaImage::new(width, height),
            scale,
        })
    }

    /// A surface of `target` pixels showing a canvas of `canvas` pixels.
    pub(super) fn for_canvas(canvas: egui::Vec2, target: [u32; 2]) -> Result<Self> {
        let scale = egui::vec2(target[0] as f32 / canvas.x, target[1] as f32 / canvas.y);
        Self::new(target[0], target[1], scale)
    }

    pub(super) fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(super) fn into_pixels(self) -> RgbaImage {
        self.pixels
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self, color: Rgb) {
        let px = Rgba([color.r, color.g, color.b, 255]);
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    fn draw_region(&mut self, image: &RgbaImage, src: egui::Rect, dst: egui::Rect, blend: BlendMode) {
        if image.width() == 0 || image.height() == 0 || dst.width() <= 0.0 || dst.height() <= 0.0 {
            return;
        }
        let dst = egui::Rect::from_min_max(
            egui::pos2(dst.min.x * self.scale.x, dst.min.y * self.scale.y),
            egui::pos2(dst.max.x * self.scale.x, dst.max.y * self.scale.y),
        );
        let (w, h) = self.pixels.dimensions();
        // Pixels whose centres fall inside dst, clipped to the surface.
        let x0 = (dst.min.x - 0.5).ceil().max(0.0) as u32;
        let y0 = (dst.min.y - 0.5).ceil().max(0.0) as u32;
        let x1 = ((dst.max.x - 0.5).ceil().max(0.0) as u32).min(w);
        let y1 = ((dst.max.y - 0.5).ceil().max(0.0) as u32).min(h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let sx_per_px = src.width() / dst.width();
        let sy_per_px = src.height() / dst.height();
        let max_sx = image.width() - 1;
        let max_sy = image.height() - 1;
        for y in y0..y1 {
            let sy = src.min.y + (y as f32 + 0.5 - dst.min.y) * sy_per_px;
            let sy = (sy.floor().max(0.0) as u32).min(max_sy);
            for x in x0..x1 {
                let sx = src.min.x + (x as f32 + 0.5 - dst.min.x) * sx_per_px;
                let sx = (sx.floor().max(0.0) as u32).min(max_sx);
                let top = *image.get_pixel(sx, sy);
                let base = self.pixels.get_pixel_mut(x, y);
                *base = blend_pixel(*base, top, blend);
            }
        }
    }
}
