use eframe::egui;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const LAYER_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDimensions {
    pub columns: u32,
    pub rows: u32,
}

impl GridDimensions {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn contains(self, cell: CellIndex) -> bool {
        cell.col >= 0
            && (cell.col as u32) < self.columns
            && cell.row >= 0
            && (cell.row as u32) < self.rows
    }

    pub fn cell_count(self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn cells(self) -> impl Iterator<Item = CellIndex> {
        let rows = self.rows as i32;
        (0..self.columns as i32)
            .flat_map(move |col| (0..rows).map(move |row| CellIndex { col, row }))
    }
}

/// Column/row pair. May be out of range; check with [`GridDimensions::contains`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub col: i32,
    pub row: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn to_vec2(self) -> egui::Vec2 {
        egui::vec2(self.dx, self.dy)
    }

    pub fn from_vec2(v: egui::Vec2) -> Self {
        Self { dx: v.x, dy: v.y }
    }
}

/// Per-cell displacement for one layer, always sized to its grid.
#[derive(Clone, Debug, PartialEq)]
pub struct OffsetGrid {
    dims: GridDimensions,
    cells: Vec<Offset>,
}

impl OffsetGrid {
    pub fn zeroed(dims: GridDimensions) -> Self {
        Self {
            dims,
            cells: vec![Offset::ZERO; dims.cell_count()],
        }
    }

    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    fn index(&self, cell: CellIndex) -> Option<usize> {
        if !self.dims.contains(cell) {
            return None;
        }
        Some(cell.col as usize * self.dims.rows as usize + cell.row as usize)
    }

    pub fn get(&self, cell: CellIndex) -> Option<Offset> {
        self.index(cell).map(|idx| self.cells[idx])
    }

    pub fn set(&mut self, cell: CellIndex, offset: Offset) -> bool {
        match self.index(cell) {
            Some(idx) => {
                self.cells[idx] = offset;
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_zero(&self) -> bool {
        self.cells.iter().all(|o| *o == Offset::ZERO)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Offset> {
        self.cells.iter_mut()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const DEFAULT_BACKGROUND: Self = Self {
        r: 220,
        g: 220,
        b: 220,
    };

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::DEFAULT_BACKGROUND
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Darkest,
    Lightest,
    Difference,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    pub const ALL: [BlendMode; 8] = [
        BlendMode::Normal,
        BlendMode::Add,
        BlendMode::Darkest,
        BlendMode::Lightest,
        BlendMode::Difference,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "Blend",
            BlendMode::Add => "Add",
            BlendMode::Darkest => "Darkest",
            BlendMode::Lightest => "Lightest",
            BlendMode::Difference => "Difference",
            BlendMode::Multiply => "Multiply",
            BlendMode::Screen => "Screen",
            BlendMode::Overlay => "Overlay",
        }
    }
}

/// Index into the fixed three-layer stack. Slot 0 is drawn first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerSlot(usize);

impl LayerSlot {
    pub const ALL: [LayerSlot; LAYER_COUNT] = [LayerSlot(0), LayerSlot(1), LayerSlot(2)];

    pub fn index(self) -> usize {
        self.0
    }

    /// Panel label. "Layer 1" is the top-most slot.
    pub fn label(self) -> String {
        format!("Layer {}", LAYER_COUNT - self.0)
    }
}

impl Default for LayerSlot {
    fn default() -> Self {
        LayerSlot(LAYER_COUNT - 1)
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    pub image: Option<Arc<RgbaImage>>,
    pub visible: bool,
    pub blend: BlendMode,
    pub offsets: OffsetGrid,
}

impl Layer {
    pub fn new(dims: GridDimensions) -> Self {
        Self {
            image: None,
            visible: false,
            blend: BlendMode::Normal,
            offsets: OffsetGrid::zeroed(dims),
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions_clamp_to_one() {
        let dims = GridDimensions::new(0, 0);
        assert_eq!(dims, GridDimensions { columns: 1, rows: 1 });
    }

    #[test]
    fn contains_rejects_negative_and_overflow() {
        let dims = GridDimensions::new(3, 2);
        assert!(dims.contains(CellIndex { col: 0, row: 0 }));
        assert!(dims.contains(CellIndex { col: 2, row: 1 }));
        assert!(!dims.contains(CellIndex { col: -1, row: 0 }));
        assert!(!dims.contains(CellIndex { col: 3, row: 0 }));
        assert!(!dims.contains(CellIndex { col: 0, row: 2 }));
    }

    #[test]
    fn offset_grid_get_set() {
        let dims = GridDimensions::new(4, 3);
        let mut grid = OffsetGrid::zeroed(dims);
        let cell = CellIndex { col: 3, row: 2 };
        assert_eq!(grid.get(cell), Some(Offset::ZERO));
        assert!(grid.set(cell, Offset { dx: 5.0, dy: -2.0 }));
        assert_eq!(grid.get(cell), Some(Offset { dx: 5.0, dy: -2.0 }));
        assert_eq!(grid.get(CellIndex { col: 2, row: 2 }), Some(Offset::ZERO));
        assert!(!grid.set(CellIndex { col: 4, row: 0 }, Offset::ZERO));
        assert_eq!(grid.get(CellIndex { col: 4, row: 0 }), None);
    }

    #[test]
    fn cells_cover_whole_grid() {
        let dims = GridDimensions::new(5, 4);
        let cells: Vec<_> = dims.cells().collect();
        assert_eq!(cells.len(), 20);
        assert!(cells.iter().all(|c| dims.contains(*c)));
    }

    #[test]
    fn layer_slot_labels_are_top_down() {
        assert_eq!(LayerSlot::default().index(), 2);
        assert_eq!(LayerSlot::default().label(), "Layer 1");
        assert_eq!(LayerSlot::ALL[0].label(), "Layer 3");
    }
}
