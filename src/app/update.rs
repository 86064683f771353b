use crate::model::{BlendMode, GridDimensions, LayerSlot, Rgb};
use eframe::egui;

use super::CompositorApp;
use super::geometry::CellSize;
use super::help::draw_help_window;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Shortcut {
    Select(LayerSlot),
    ToggleSnap,
    Randomize,
    Export,
    CancelDrag,
    Help,
}

impl eframe::App for CompositorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.commit_uploads();

        let wants_keyboard = ctx.wants_keyboard_input();
        let mut shortcuts = Vec::new();
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::NONE, egui::Key::F1) {
                shortcuts.push(Shortcut::Help);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) {
                shortcuts.push(Shortcut::CancelDrag);
            }
            if i.consume_key(egui::Modifiers::COMMAND, egui::Key::E) {
                shortcuts.push(Shortcut::Export);
            }
            if wants_keyboard {
                return;
            }
            let layer_keys = [egui::Key::Num1, egui::Key::Num2, egui::Key::Num3];
            for (key, slot) in layer_keys.into_iter().zip(LayerSlot::ALL.into_iter().rev()) {
                if i.consume_key(egui::Modifiers::NONE, key) {
                    shortcuts.push(Shortcut::Select(slot));
                }
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::S) {
                shortcuts.push(Shortcut::ToggleSnap);
            }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::R) {
                shortcuts.push(Shortcut::Randomize);
            }
        });
        for shortcut in shortcuts {
            match shortcut {
                Shortcut::Select(slot) => self.select_layer(slot),
                Shortcut::ToggleSnap => self.toggle_snap(),
                Shortcut::Randomize => self.randomize(),
                Shortcut::Export => self.export_dialog(),
                Shortcut::CancelDrag => {
                    if self.comp.drag.is_dragging() {
                        self.comp.cancel_drag();
                        self.dirty = true;
                    }
                }
                Shortcut::Help => self.show_help = true,
            }
        }

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new("Pangram3").monospace());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Help (F1)").clicked() {
                        self.show_help = true;
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let grid = self.comp.grid();
                ui.label(format!("{}×{} grid", grid.columns, grid.rows));
                ui.separator();
                ui.label(format!("Editing {}", self.comp.selected().label()));
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });

        egui::SidePanel::right("controls")
            .resizable(false)
            .min_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.layer_controls(ui, ctx);
                    ui.separator();
                    self.composition_controls(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui, ctx);
            });
        });

        if self.show_help {
            draw_help_window(ctx, &mut self.show_help);
        }
    }
}

impl CompositorApp {
    fn layer_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.heading("Layers");
        // Top-most layer first.
        for slot in LayerSlot::ALL.into_iter().rev() {
            let layer = self.comp.layer(slot);
            let mut visible = layer.visible;
            let mut blend = layer.blend;
            let has_image = layer.has_image();
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.comp.selected() == slot, slot.label())
                    .clicked()
                {
                    self.select_layer(slot);
                }
                if ui.checkbox(&mut visible, "Show").changed() {
                    self.comp.set_visible(slot, visible);
                    self.dirty = true;
                }
                egui::ComboBox::from_id_salt(("blend_mode", slot.index()))
                    .width(90.0)
                    .selected_text(blend.name())
                    .show_ui(ui, |ui| {
                        for mode in BlendMode::ALL {
                            ui.selectable_value(&mut blend, mode, mode.name());
                        }
                    });
                if blend != self.comp.layer(slot).blend {
                    self.comp.set_blend(slot, blend);
                    self.dirty = true;
                }
                let load_label = if has_image { "Replace…" } else { "Load…" };
                if ui.button(load_label).clicked() {
                    self.pick_upload(ctx, slot);
                }
            });
        }
    }

    fn composition_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Composition");
        let snap_label = if self.comp.snap_to_grid() { "Snap: ON" } else { "Snap: OFF" };
        if ui.button(snap_label).clicked() {
            self.toggle_snap();
        }

        ui.horizontal(|ui| {
            ui.label("Background");
            let mut rgb = self.comp.background().to_array();
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.comp.set_background(Rgb::from_array(rgb));
                self.dirty = true;
            }
        });

        let max_grid = self.settings.max_grid;
        let mut columns = self.comp.grid().columns;
        if ui
            .add(egui::Slider::new(&mut columns, 1..=max_grid).text("Columns"))
            .changed()
        {
            self.comp.set_columns(columns);
            self.dirty = true;
        }
        let mut rows = self.comp.grid().rows;
        if ui
            .add(egui::Slider::new(&mut rows, 1..=max_grid).text("Rows"))
            .changed()
        {
            self.comp.set_rows(rows);
            self.dirty = true;
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.reset();
            }
            if ui.button("Randomize").clicked() {
                self.randomize();
            }
        });
        let export_label = format!("Download {}px PNG", self.settings.export_size);
        if ui
            .add_enabled(!self.comp.drag.is_dragging(), egui::Button::new(export_label))
            .clicked()
        {
            self.export_dialog();
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let size = self.comp.canvas();
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let origin = rect.min;

        let pointer = ctx
            .input(|i| i.pointer.interact_pos())
            .map(|p| (p - origin).to_pos2());
        if pointer.is_some() {
            self.last_pointer = pointer;
        }

        let (pressed, released) = ctx.input(|i| (i.pointer.primary_pressed(), i.pointer.primary_released()));
        if pressed
            && response.contains_pointer()
            && let Some(p) = pointer
            && self.comp.pointer_down(p)
        {
            self.dirty = true;
        }
        if self.comp.drag.is_dragging() {
            // The dragged cell follows the pointer every frame.
            self.dirty = true;
        }
        if released
            && let Some(p) = pointer.or(self.last_pointer)
            && self.comp.pointer_up(p).is_some()
        {
            self.dirty = true;
        }

        self.refresh_preview(ctx, self.last_pointer);

        let painter = ui.painter_at(rect);
        if let Some(texture) = &self.preview {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture.id(), rect, uv, egui::Color32::WHITE);
        }
        let any_drawn = LayerSlot::ALL.iter().any(|slot| {
            let layer = self.comp.layer(*slot);
            layer.has_image() && layer.visible
        });
        if any_drawn {
            draw_grid_lines(&painter, rect, self.comp.grid(), self.comp.cell_size());
        }
    }
}

fn draw_grid_lines(painter: &egui::Painter, rect: egui::Rect, grid: GridDimensions, cell: CellSize) {
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_black_alpha(50));
    for i in 0..=grid.columns {
        let x = rect.min.x + i as f32 * cell.width;
        painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
    }
    for j in 0..=grid.rows {
        let y = rect.min.y + j as f32 * cell.height;
        painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
    }
}
