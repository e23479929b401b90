mod state;
mod ui;
mod upload_files;

use crate::upload::UploadFilesService;
use eframe::egui::{self, RichText};
use eframe::App;
use tokio::runtime::Handle;

pub use state::{EndpointHealth, UploadEvent, UploadOutcome, UploadState};
pub use upload_files::UploadFiles;

pub const APP_TITLE: &str = "Pi Photos";

/// Top-level page: static heading over the upload panel.
pub struct PiPhotosApp {
    upload_files: UploadFiles,
}

impl PiPhotosApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        service: UploadFilesService,
        runtime: Handle,
    ) -> Self {
        tracing::info!("Initializing {}", APP_TITLE);
        let upload_files = UploadFiles::new(service, runtime);
        upload_files.check_health(&cc.egui_ctx);
        Self { upload_files }
    }
}

impl App for PiPhotosApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.upload_files.update_state();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(10.0);
                ui.heading(APP_TITLE);
                ui.label(
                    RichText::new("Upload one or more files from your device")
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
                ui.add_space(20.0);

                self.upload_files.render(ui);
            });
        });
    }
}
