use crate::model::{
    BlendMode, CellIndex, GridDimensions, LAYER_COUNT, Layer, LayerSlot, Offset, OffsetGrid, Rgb,
};
use eframe::egui;
use image::RgbaImage;
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;

use super::geometry::{CellSize, cell_size};
use super::interaction::DragSession;

/// Everything the canvas, the panel and the exporter read. Mutated only
/// through the methods below so that every layer's offset grid stays sized
/// to `grid`.
#[derive(Clone, Debug)]
pub(super) struct Composition {
    canvas: egui::Vec2,
    grid: GridDimensions,
    layers: [Layer; LAYER_COUNT],
    selected: LayerSlot,
    snap_to_grid: bool,
    background: Rgb,
    pub(super) drag: DragSession,
}

impl Composition {
    pub(super) fn new(canvas: egui::Vec2, grid: GridDimensions, background: Rgb) -> Self {
        Self {
            canvas,
            grid,
            layers: std::array::from_fn(|_| Layer::new(grid)),
            selected: LayerSlot::default(),
            snap_to_grid: false,
            background,
            drag: DragSession::Idle,
        }
    }

    pub(super) fn canvas(&self) -> egui::Vec2 {
        self.canvas
    }

    pub(super) fn grid(&self) -> GridDimensions {
        self.grid
    }

    pub(super) fn cell_size(&self) -> CellSize {
        cell_size(self.canvas, self.grid)
    }

    pub(super) fn layer(&self, slot: LayerSlot) -> &Layer {
        &self.layers[slot.index()]
    }

    pub(super) fn selected(&self) -> LayerSlot {
        self.selected
    }

    pub(super) fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub(super) fn background(&self) -> Rgb {
        self.background
    }

    pub(super) fn offset(&self, slot: LayerSlot, cell: CellIndex) -> Option<Offset> {
        self.layers[slot.index()].offsets.get(cell)
    }

    /// Returns `false` when `cell` is outside the grid.
    pub(super) fn set_offset(&mut self, slot: LayerSlot, cell: CellIndex, offset: Offset) -> bool {
        self.layers[slot.index()].offsets.set(cell, offset)
    }

    pub(super) fn select_layer(&mut self, slot: LayerSlot) {
        self.selected = slot;
    }

    pub(super) fn set_snap_to_grid(&mut self, snap: bool) {
        self.snap_to_grid = snap;
    }

    pub(super) fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }

    pub(super) fn set_visible(&mut self, slot: LayerSlot, visible: bool) {
        self.layers[slot.index()].visible = visible;
    }

    pub(super) fn set_blend(&mut self, slot: LayerSlot, blend: BlendMode) {
        self.layers[slot.index()].blend = blend;
    }

    /// Replace a slot's image and show it. Last commit wins.
    pub(super) fn commit_image(&mut self, slot: LayerSlot, image: Arc<RgbaImage>) {
        let layer = &mut self.layers[slot.index()];
        layer.image = Some(image);
        layer.visible = true;
    }

    pub(super) fn set_columns(&mut self, columns: u32) {
        self.resize_grid(GridDimensions::new(columns, self.grid.rows));
    }

    pub(super) fn set_rows(&mut self, rows: u32) {
        self.resize_grid(GridDimensions::new(self.grid.columns, rows));
    }

    pub(super) fn resize_grid(&mut self, dims: GridDimensions) {
        if dims != self.grid {
            log::info!("grid resized to {}x{}", dims.columns, dims.rows);
        }
        self.reconcile(dims);
    }

    /// Discard every layer's offsets and start over with an all-zero grid of
    /// `dims`. Any drag in progress refers to the old partition and is dropped.
    pub(super) fn reconcile(&mut self, dims: GridDimensions) {
        self.grid = dims;
        for layer in &mut self.layers {
            layer.offsets = OffsetGrid::zeroed(dims);
        }
        self.drag = DragSession::Idle;
    }

    /// Jitter every cell of each loaded layer by up to half a cell, then
    /// shuffle the three layers as whole units. Selection stays on its slot.
    pub(super) fn randomize<R: Rng>(&mut self, rng: &mut R) {
        let cell = self.cell_size();
        let half_w = cell.width * 0.5;
        let half_h = cell.height * 0.5;
        for layer in self.layers.iter_mut().filter(|l| l.has_image()) {
            for offset in layer.offsets.iter_mut() {
                *offset = Offset {
                    dx: rng.random_range(-half_w..=half_w),
                    dy: rng.random_range(-half_h..=half_h),
                };
            }
        }
        self.layers.shuffle(rng);
        self.drag = DragSession::Idle;
        log::info!("randomized layers");
    }

    /// Back to defaults, keeping the grid dimensions and loaded images. The
    /// background returns to the stock grey even when another was configured.
    pub(super) fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.blend = BlendMode::Normal;
        }
        self.selected = LayerSlot::default();
        self.snap_to_grid = false;
        self.background = Rgb::DEFAULT_BACKGROUND;
        self.reconcile(self.grid);
        log::info!("composition reset");
    }
}
