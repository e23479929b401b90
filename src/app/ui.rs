use super::state::EndpointHealth;
use super::upload_files::UploadFiles;
use crate::upload::UploadStatus;
use crate::utils::file_size::format_size;
use eframe::egui::{self, Color32, RichText};

const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);
const SUCCESS: Color32 = Color32::from_rgb(0, 180, 0);
const FAILURE: Color32 = Color32::from_rgb(220, 50, 50);
const MUTED: Color32 = Color32::from_rgb(150, 150, 150);

impl UploadFiles {
    pub fn render(&mut self, ui: &mut egui::Ui) {
        self.render_health(ui);
        ui.add_space(10.0);

        let busy = self.state.is_uploading();

        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.add_enabled_ui(!busy, |ui| {
                    if ui.button("🖼 Select Files").clicked() {
                        self.select_files();
                    }
                    if ui.button("📁 Select Folder").clicked() {
                        self.select_folder();
                    }
                });
                ui.label(format!("{} file(s) selected", self.state.selected.len()));
            });
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            ui.add_enabled_ui(self.can_upload(), |ui| {
                let button = egui::Button::new("📤 Upload").min_size(egui::vec2(160.0, 36.0));
                if ui.add(button).clicked() {
                    self.start_upload(ui.ctx());
                }
            });
            ui.add_enabled_ui(!busy, |ui| {
                if ui.button("🗑 Clear").clicked() {
                    self.clear();
                }
            });
        });

        ui.add_space(10.0);

        if self.state.files.is_empty() {
            self.render_selection(ui);
        } else {
            self.render_progress(ui);
        }

        if let Some(message) = &self.state.message {
            ui.add_space(10.0);
            let (_, failed) = self.state.counts();
            let color = if failed > 0 { FAILURE } else { SUCCESS };
            ui.colored_label(color, message);
        }

        if !self.state.locations.is_empty() {
            ui.add_space(10.0);
            self.render_locations(ui);
        }
    }

    fn render_health(&self, ui: &mut egui::Ui) {
        match &self.state.health {
            EndpointHealth::Unknown => {
                ui.label(RichText::new("Checking upload endpoint...").color(MUTED));
            }
            EndpointHealth::Online(check) => {
                ui.colored_label(
                    SUCCESS,
                    format!("● {} {} is reachable", check.app_name, check.version),
                );
            }
            EndpointHealth::Offline(reason) => {
                ui.colored_label(FAILURE, "● Upload endpoint unreachable")
                    .on_hover_text(reason.as_str());
            }
        }
    }

    fn render_selection(&self, ui: &mut egui::Ui) {
        if self.state.selected.is_empty() {
            return;
        }

        egui::ScrollArea::vertical()
            .max_height(200.0)
            .show(ui, |ui| {
                for path in &self.state.selected {
                    ui.label(path.display().to_string());
                }
            });
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            let overall = egui::ProgressBar::new(self.state.get_progress_percentage())
                .show_percentage()
                .fill(ACCENT);
            ui.add(overall);
            ui.label(self.state.get_status_text());
        });

        ui.add_space(10.0);

        egui::ScrollArea::vertical()
            .max_height(260.0)
            .show(ui, |ui| {
                egui::Frame::none()
                    .fill(ui.style().visuals.extreme_bg_color)
                    .show(ui, |ui| {
                        ui.add_space(8.0);
                        for file in &self.state.files {
                            match &file.status {
                                UploadStatus::Pending => {
                                    ui.horizontal(|ui| {
                                        ui.label("⏳");
                                        ui.colored_label(MUTED, &file.name);
                                    });
                                }
                                UploadStatus::Uploading(progress) => {
                                    ui.label(format!(
                                        "📤 {} ({} / {})",
                                        file.name,
                                        format_size(progress.loaded),
                                        format_size(progress.total)
                                    ));
                                    ui.add(
                                        egui::ProgressBar::new(progress.fraction())
                                            .text(format!("{}%", progress.percent()))
                                            .fill(ACCENT),
                                    );
                                }
                                UploadStatus::Success(message) => {
                                    ui.horizontal(|ui| {
                                        ui.label("✅");
                                        ui.colored_label(
                                            SUCCESS,
                                            format!(
                                                "{} ({}) - {}",
                                                file.name,
                                                format_size(file.size),
                                                message
                                            ),
                                        );
                                    });
                                }
                                UploadStatus::Error(err) => {
                                    ui.horizontal(|ui| {
                                        ui.label("❌");
                                        ui.colored_label(
                                            FAILURE,
                                            format!("{} - {}", file.name, err),
                                        );
                                    });
                                }
                            }
                            ui.add_space(4.0);
                        }
                        ui.add_space(8.0);
                    });
            });
    }

    fn render_locations(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Uploaded photos").strong());
        for location in &self.state.locations {
            if ui.link(location.as_str()).clicked() {
                if let Err(e) = open::that(location) {
                    tracing::warn!("Failed to open {}: {}", location, e);
                }
            }
        }
    }
}
