mod app;
mod blend;
mod error;
mod model;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Pangram3")
            .with_inner_size([1160.0, 920.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Pangram3",
        native_options,
        Box::new(|cc| Ok(Box::new(app::CompositorApp::new(cc)))),
    )
}
