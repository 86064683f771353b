use crate::model::{CellIndex, GridDimensions, Offset};
use eframe::egui;

/// Size of one grid cell in canvas pixels. Never stored; derive it from the
/// current canvas size and grid each time it is needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct CellSize {
    pub width: f32,
    pub height: f32,
}

pub(super) fn cell_size(canvas: egui::Vec2, dims: GridDimensions) -> CellSize {
    CellSize {
        width: canvas.x / dims.columns as f32,
        height: canvas.y / dims.rows as f32,
    }
}

pub(super) fn pixel_to_cell(pos: egui::Pos2, cell: CellSize) -> CellIndex {
    CellIndex {
        col: (pos.x / cell.width).floor() as i32,
        row: (pos.y / cell.height).floor() as i32,
    }
}

/// Top-left corner of a cell's natural slot.
pub(super) fn cell_origin(index: CellIndex, cell: CellSize) -> egui::Pos2 {
    egui::pos2(index.col as f32 * cell.width, index.row as f32 * cell.height)
}

/// Source sub-rectangle of `index` in an image of `image_size` pixels.
pub(super) fn source_tile(image_size: egui::Vec2, dims: GridDimensions, index: CellIndex) -> egui::Rect {
    let tile = egui::vec2(
        image_size.x / dims.columns as f32,
        image_size.y / dims.rows as f32,
    );
    let min = egui::pos2(index.col as f32 * tile.x, index.row as f32 * tile.y);
    egui::Rect::from_min_size(min, tile)
}

pub(super) fn snap_offset(offset: Offset, cell: CellSize) -> Offset {
    Offset {
        dx: (offset.dx / cell.width).round() * cell.width,
        dy: (offset.dy / cell.height).round() * cell.height,
    }
}

#[cfg(test)]
pub(super) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(b.abs()).max(1.0)
}
