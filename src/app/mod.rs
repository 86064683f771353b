use crate::model;
use eframe::egui;

mod export;
mod geometry;
mod help;
mod interaction;
mod render;
mod settings;
mod state;
mod update;
mod upload;

use render::{RasterSurface, compose, plan_frame};
use state::Composition;

pub struct CompositorApp {
    comp: Composition,
    settings: settings::AppSettings,
    uploads: upload::UploadQueue,
    preview: Option<egui::TextureHandle>,
    dirty: bool,
    /// Last pointer position in canvas pixels, kept for releases outside the window.
    last_pointer: Option<egui::Pos2>,
    status: Option<String>,
    show_help: bool,
}

impl CompositorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = match settings::config_path() {
            Some(path) => {
                log::info!("loading settings from {path}");
                settings::load_settings(&path).unwrap_or_default()
            }
            None => settings::load_settings("settings.json").unwrap_or_default(),
        }
        .sanitized();

        let comp = Composition::new(
            egui::vec2(settings.canvas_width as f32, settings.canvas_height as f32),
            settings.grid(),
            settings.background,
        );

        Self {
            comp,
            settings,
            uploads: upload::UploadQueue::default(),
            preview: None,
            dirty: true,
            last_pointer: None,
            status: None,
            show_help: false,
        }
    }

    fn canvas_pixels(&self) -> [u32; 2] {
        [self.settings.canvas_width, self.settings.canvas_height]
    }

    /// Re-composite the preview texture if anything changed since the last frame.
    fn refresh_preview(&mut self, ctx: &egui::Context, pointer: Option<egui::Pos2>) {
        if !self.dirty && self.preview.is_some() {
            return;
        }
        let surface = RasterSurface::for_canvas(self.comp.canvas(), self.canvas_pixels()).map(|mut surface| {
            compose(&mut surface, self.comp.background(), &plan_frame(&self.comp, pointer));
            surface
        });
        let surface = match surface {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("preview failed: {e}");
                return;
            }
        };
        let pixels = surface.pixels();
        let size = [pixels.width() as usize, pixels.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
        match &mut self.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview = Some(ctx.load_texture("composition", image, egui::TextureOptions::LINEAR));
            }
        }
        self.dirty = false;
    }

    fn select_layer(&mut self, slot: model::LayerSlot) {
        self.comp.select_layer(slot);
    }

    fn randomize(&mut self) {
        self.comp.randomize(&mut rand::rng());
        self.dirty = true;
    }

    fn reset(&mut self) {
        self.comp.reset();
        self.dirty = true;
    }

    fn toggle_snap(&mut self) {
        let snap = !self.comp.snap_to_grid();
        self.comp.set_snap_to_grid(snap);
    }
}
