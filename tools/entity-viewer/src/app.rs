//! eframe host for the entity viewer

use anyhow::Result;
use eframe::egui;
use kanan_core::{EntityViewer, ViewerConfig};

use crate::world::DemoWorld;

/// Desktop window hosting the viewer over a synthetic game
pub struct ViewerApp {
    world: DemoWorld,
    viewer: EntityViewer,
    frozen: bool,
}

impl ViewerApp {
    pub fn new(world: DemoWorld, config: &ViewerConfig, frozen: bool) -> Self {
        Self {
            world,
            viewer: EntityViewer::new(config),
            frozen,
        }
    }

    fn advance(&mut self, ctx: &egui::Context) {
        if self.frozen {
            return;
        }
        let dt = ctx.input(|i| i.stable_dt);
        if let Err(e) = self.world.tick(dt) {
            tracing::warn!("world update failed, freezing: {}", e);
            self.frozen = true;
            return;
        }
        ctx.request_repaint();
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Synthetic game");
            ui.label(format!("{} characters", self.world.character_count()));
            if !self.viewer.visible && ui.button("Show Entity Viewer").clicked() {
                self.viewer.set_visible(true);
            }
        });

        let game = self.world.game();
        self.viewer.show(ctx, &game);
    }
}

/// Open the viewer window and block until it is closed
pub fn run(app: ViewerApp) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Kanan Entity Viewer")
            .with_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Kanan Entity Viewer",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
