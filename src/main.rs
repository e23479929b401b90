use eframe::CreationContext;
use pi_photos_uploader::app::{PiPhotosApp, APP_TITLE};
use pi_photos_uploader::{ClientConfig, HttpClient, UploadFilesService};
use tokio::runtime::Runtime;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pi_photos_uploader=info".into()),
        )
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Config init failed: {}", e);
            std::process::exit(1);
        }
    };

    let http = match HttpClient::new(&config) {
        Ok(http) => http,
        Err(e) => {
            tracing::error!("HTTP client init failed: {}", e);
            std::process::exit(1);
        }
    };

    // Uploads run here; the UI stays on the main thread.
    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let service = UploadFilesService::new(http);
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 600.0])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc: &CreationContext| Box::new(PiPhotosApp::new(cc, service, handle))),
    ) {
        tracing::error!("UI exited with error: {}", e);
        std::process::exit(1);
    }
}
