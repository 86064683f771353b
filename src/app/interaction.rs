use crate::model::{CellIndex, Offset};
use eframe::egui;

use super::geometry::{cell_origin, pixel_to_cell, snap_offset};
use super::state::Composition;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(super) enum DragSession {
    #[default]
    Idle,
    Dragging {
        cell: CellIndex,
        /// Pointer position relative to the cell's drawn corner at press time.
        anchor: egui::Vec2,
    },
}

impl DragSession {
    pub(super) fn is_dragging(&self) -> bool {
        matches!(self, DragSession::Dragging { .. })
    }
}

impl Composition {
    /// Start dragging the cell under `pointer` on the selected layer.
    /// Returns `false` (and stays idle) when the pointer is off the grid or
    /// the selected layer has no image.
    pub(super) fn pointer_down(&mut self, pointer: egui::Pos2) -> bool {
        let cell_size = self.cell_size();
        let cell = pixel_to_cell(pointer, cell_size);
        let selected = self.selected();
        if !self.layer(selected).has_image() {
            log::debug!("press ignored: {} has no image", selected.label());
            return false;
        }
        let Some(current) = self.offset(selected, cell) else {
            log::debug!("press ignored: {pointer:?} is off the grid");
            return false;
        };
        let anchor = pointer - cell_origin(cell, cell_size) - current.to_vec2();
        self.drag = DragSession::Dragging { cell, anchor };
        log::debug!("drag started on {} cell ({}, {})", selected.label(), cell.col, cell.row);
        true
    }

    /// Where the dragged cell is drawn while the pointer is at `pointer`.
    pub(super) fn live_position(&self, pointer: egui::Pos2) -> Option<(CellIndex, egui::Pos2)> {
        match self.drag {
            DragSession::Dragging { cell, anchor } => Some((cell, pointer - anchor)),
            DragSession::Idle => None,
        }
    }

    /// Commit the drag at `pointer`. Returns the stored offset, or `None`
    /// when no drag was active.
    pub(super) fn pointer_up(&mut self, pointer: egui::Pos2) -> Option<Offset> {
        let DragSession::Dragging { cell, anchor } = std::mem::take(&mut self.drag) else {
            return None;
        };
        let cell_size = self.cell_size();
        let origin = cell_origin(cell, cell_size);
        let mut offset = Offset::from_vec2(pointer - origin - anchor);
        if self.snap_to_grid() {
            offset = snap_offset(offset, cell_size);
        }
        let selected = self.selected();
        if !self.set_offset(selected, cell, offset) {
            return None;
        }
        log::debug!(
            "committed {} cell ({}, {}) offset ({:.1}, {:.1})",
            selected.label(),
            cell.col,
            cell.row,
            offset.dx,
            offset.dy
        );
        Some(offset)
    }

    /// Abandon the drag without touching the stored offset.
    pub(super) fn cancel_drag(&mut self) {
        self.drag = DragSession::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::geometry::approx_eq;
    use crate::app::state::tests::{composition, solid_image};
    use crate::model::LayerSlot;

    fn loaded() -> Composition {
        let mut comp = composition(6, 6);
        comp.commit_image(LayerSlot::default(), solid_image([255, 0, 0, 255]));
        comp
    }

    #[test]
    fn press_without_image_stays_idle() {
        let mut comp = composition(6, 6);
        assert!(!comp.pointer_down(egui::pos2(150.0, 150.0)));
        assert_eq!(comp.drag, DragSession::Idle);
        assert_eq!(comp.pointer_up(egui::pos2(300.0, 300.0)), None);
    }

    #[test]
    fn press_off_grid_stays_idle() {
        let mut comp = loaded();
        assert!(!comp.pointer_down(egui::pos2(-5.0, 100.0)));
        assert!(!comp.pointer_down(egui::pos2(100.0, 800.0)));
        assert!(!comp.drag.is_dragging());
    }

    #[test]
    fn press_on_other_layer_with_image_is_ignored() {
        let mut comp = composition(6, 6);
        comp.commit_image(LayerSlot::ALL[0], solid_image([0, 0, 0, 255]));
        assert!(!comp.pointer_down(egui::pos2(10.0, 10.0)));
    }

    #[test]
    fn release_while_idle_is_noop() {
        let mut comp = loaded();
        assert_eq!(comp.pointer_up(egui::pos2(10.0, 10.0)), None);
        assert!(comp.layer(LayerSlot::default()).offsets.is_zero());
    }

    #[test]
    fn drag_six_by_six_scenario() {
        let mut comp = loaded();
        assert!(comp.pointer_down(egui::pos2(150.0, 150.0)));
        let DragSession::Dragging { cell, anchor } = comp.drag else {
            panic!("expected drag");
        };
        assert_eq!(cell, CellIndex { col: 1, row: 1 });
        // 150 - 0 - 800/6
        assert!(approx_eq(anchor.x, 150.0 - 800.0 / 6.0));
        assert!(approx_eq(anchor.y, 150.0 - 800.0 / 6.0));

        let committed = comp.pointer_up(egui::pos2(300.0, 300.0)).expect("commit");
        assert!(approx_eq(committed.dx, 150.0));
        assert!(approx_eq(committed.dy, 150.0));
        let stored = comp.offset(LayerSlot::default(), cell).unwrap_or_default();
        assert_eq!(stored, committed);
        assert_eq!(comp.drag, DragSession::Idle);
    }

    #[test]
    fn release_in_place_restores_prior_offset() {
        let mut comp = loaded();
        let cell = CellIndex { col: 2, row: 3 };
        let prior = Offset { dx: -37.5, dy: 12.25 };
        comp.set_offset(LayerSlot::default(), cell, prior);
        for pointer in [egui::pos2(290.0, 410.0), egui::pos2(266.7, 400.1), egui::pos2(399.0, 533.0)] {
            assert!(comp.pointer_down(pointer));
            let committed = comp.pointer_up(pointer).expect("commit");
            assert!(approx_eq(committed.dx, prior.dx));
            assert!(approx_eq(committed.dy, prior.dy));
            comp.set_offset(LayerSlot::default(), cell, prior);
        }
    }

    #[test]
    fn live_position_tracks_pointer_without_storing() {
        let mut comp = loaded();
        let cell = CellIndex { col: 0, row: 0 };
        comp.set_offset(LayerSlot::default(), cell, Offset { dx: 5.0, dy: 5.0 });
        assert!(comp.pointer_down(egui::pos2(20.0, 30.0)));
        // At the press point the cell sits where it was drawn.
        let (live_cell, pos) = comp.live_position(egui::pos2(20.0, 30.0)).expect("dragging");
        assert_eq!(live_cell, cell);
        assert!(approx_eq(pos.x, 5.0) && approx_eq(pos.y, 5.0));
        let (_, pos) = comp.live_position(egui::pos2(70.0, 10.0)).expect("dragging");
        assert!(approx_eq(pos.x, 55.0) && approx_eq(pos.y, -15.0));
        assert_eq!(comp.offset(LayerSlot::default(), cell), Some(Offset { dx: 5.0, dy: 5.0 }));
    }

    #[test]
    fn snapped_commits_are_cell_multiples() {
        let mut comp = loaded();
        comp.set_snap_to_grid(true);
        let size = comp.cell_size();
        let releases = [
            egui::pos2(300.0, 300.0),
            egui::pos2(-120.0, 35.0),
            egui::pos2(777.0, 12.0),
            egui::pos2(151.0, 149.0),
        ];
        for release in releases {
            assert!(comp.pointer_down(egui::pos2(150.0, 150.0)));
            let committed = comp.pointer_up(release).expect("commit");
            let kx = committed.dx / size.width;
            let ky = committed.dy / size.height;
            assert!(approx_eq(kx, kx.round()), "{committed:?}");
            assert!(approx_eq(ky, ky.round()), "{committed:?}");
        }
    }

    #[test]
    fn cancel_keeps_stored_offset() {
        let mut comp = loaded();
        assert!(comp.pointer_down(egui::pos2(150.0, 150.0)));
        comp.cancel_drag();
        assert_eq!(comp.pointer_up(egui::pos2(400.0, 400.0)), None);
        assert!(comp.layer(LayerSlot::default()).offsets.is_zero());
    }

    #[test]
    fn resize_mid_drag_drops_session() {
        let mut comp = loaded();
        assert!(comp.pointer_down(egui::pos2(700.0, 700.0)));
        comp.set_columns(2);
        assert_eq!(comp.pointer_up(egui::pos2(10.0, 10.0)), None);
    }
}
