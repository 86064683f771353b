use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Canvas");
                ui.separator();
                help_row(ui, "Drag a cell", "Move that cell of the selected layer");
                help_row(ui, "Escape", "Cancel the current drag");
                ui.label("A drag only starts on a layer that has an image loaded.");

                ui.add_space(10.0);
                ui.heading("Keyboard Shortcuts");
                ui.separator();
                help_row(ui, "1 / 2 / 3", "Select Layer 1 / 2 / 3");
                help_row(ui, "S", "Toggle snap to grid");
                help_row(ui, "R", "Randomize");
                help_row(ui, "⌘E", "Export PNG");
                help_row(ui, "F1", "Show this help");

                ui.add_space(10.0);
                ui.heading("Grid");
                ui.separator();
                ui.label("Changing columns or rows clears every cell offset.");
                ui.label("Reset clears offsets, blend modes, snap and background, and keeps the grid size.");
                ui.label("Randomize jitters each loaded layer, then shuffles the three layers.");
            });
        });
}

fn help_row(ui: &mut egui::Ui, key: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [110.0, 18.0],
            egui::Label::new(egui::RichText::new(key).monospace().strong()),
        );
        ui.label(description);
    });
}
