//! Display mode: a window that fills in bucket by bucket.
//!
//! Rendering runs on a background thread and sends each finished bucket
//! over a channel. The UI thread drains the channel every frame, copies the
//! buckets into its frame buffer and re-uploads the texture.

use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use eframe::egui;
use glint_core::Scene;
use glint_renderer::{generate_buckets, render_buckets, BucketResult, ImageBuffer, RenderConfig};

/// Open the window and render into it. Returns when the window is closed.
pub fn run(scene: Scene, config: RenderConfig, bucket_size: u32) -> Result<()> {
    let total = generate_buckets(config.width, config.height, bucket_size).len();
    let (sender, receiver) = mpsc::channel();

    let render_config = config.clone();
    thread::Builder::new()
        .name("glint-render".into())
        .spawn(move || {
            render_buckets(&scene, &render_config, bucket_size, |result| {
                // The window may already be gone
                let _ = sender.send(result);
            });
        })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("glint")
            .with_inner_size([config.width as f32, config.height as f32])
            .with_resizable(false),
        ..Default::default()
    };

    log::info!("Opening display window");
    eframe::run_native(
        "glint",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(receiver, &config, total)))),
    )
    .map_err(|e| anyhow!("Display window failed: {}", e))
}

struct Viewer {
    receiver: Receiver<BucketResult>,
    frame: ImageBuffer,
    texture: Option<egui::TextureHandle>,
    buckets_done: usize,
    bucket_total: usize,
}

impl Viewer {
    fn new(receiver: Receiver<BucketResult>, config: &RenderConfig, bucket_total: usize) -> Self {
        Self {
            receiver,
            frame: ImageBuffer::new(config.width, config.height),
            texture: None,
            buckets_done: 0,
            bucket_total,
        }
    }

    /// Copy any finished buckets into the frame. Returns true if anything
    /// changed.
    fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.receiver.try_recv() {
            self.frame.write_bucket(&result);
            self.buckets_done += 1;
            changed = true;
        }

        if changed && self.buckets_done == self.bucket_total {
            log::info!("All {} buckets displayed", self.bucket_total);
        }
        changed
    }

    fn upload(&mut self, ctx: &egui::Context) {
        let size = [self.frame.width as usize, self.frame.height as usize];
        let image = egui::ColorImage::from_rgb(size, self.frame.as_bytes());

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("frame", image, egui::TextureOptions::NEAREST));
            }
        }
    }
}

impl eframe::App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.drain() || self.texture.is_none() {
            self.upload(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    ui.image((texture.id(), texture.size_vec2()));
                }
            });

        if self.buckets_done < self.bucket_total {
            ctx.request_repaint_after(Duration::from_millis(30));
        }
    }
}
