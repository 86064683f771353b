use crate::error::{Error, Result};
use crate::model::LayerSlot;
use eframe::egui;
use image::RgbaImage;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use super::CompositorApp;
use super::state::Composition;

pub(super) struct DecodedUpload {
    pub slot: LayerSlot,
    pub path: PathBuf,
    pub result: Result<RgbaImage>,
}

/// Decodes picked files off the UI thread. Results are drained once per
/// frame; a later upload to the same slot simply replaces the earlier one.
pub(super) struct UploadQueue {
    tx: Sender<DecodedUpload>,
    rx: Receiver<DecodedUpload>,
}

impl Default for UploadQueue {
    fn default() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }
}

impl UploadQueue {
    pub(super) fn spawn(&self, ctx: &egui::Context, slot: LayerSlot, path: PathBuf, canvas: [u32; 2]) {
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = decode_file(&path, canvas);
            let _ = tx.send(DecodedUpload { slot, path, result });
            ctx.request_repaint();
        });
    }

    pub(super) fn drain(&self) -> Vec<DecodedUpload> {
        let mut done = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(upload) => done.push(upload),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        done
    }
}

pub(super) fn decode_file(path: &Path, canvas: [u32; 2]) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&bytes, canvas)
}

/// Decode any supported format and normalize it to the canvas size.
pub(super) fn decode_bytes(bytes: &[u8], canvas: [u32; 2]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(Error::Decode)?;
    let [w, h] = canvas;
    if w == 0 || h == 0 {
        return Err(Error::Dimensions { width: w, height: h });
    }
    Ok(image.resize_exact(w, h, FilterType::Triangle).to_rgba8())
}

impl CompositorApp {
    pub(super) fn pick_upload(&mut self, ctx: &egui::Context, slot: LayerSlot) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file()
        else {
            return;
        };
        self.uploads.spawn(ctx, slot, path, self.canvas_pixels());
    }

    pub(super) fn commit_uploads(&mut self) {
        for upload in self.uploads.drain() {
            if self.comp.commit_upload(upload) {
                self.dirty = true;
            }
        }
    }
}

impl Composition {
    /// Commit a finished decode. Failed uploads leave the slot untouched.
    pub(super) fn commit_upload(&mut self, upload: DecodedUpload) -> bool {
        match upload.result {
            Ok(image) => {
                log::info!("{} <- {}", upload.slot.label(), upload.path.display());
                self.commit_image(upload.slot, Arc::new(image));
                true
            }
            Err(e) => {
                log::warn!("ignored upload {}: {e}", upload.path.display());
                false
            }
        }
    }
}
