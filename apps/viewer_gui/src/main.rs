mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::ViewerApp;

#[derive(Parser, Debug)]
struct Args {
    /// Simulator base URL; overrides viewer.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Request timeout in seconds, 0 waits forever.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        settings.server_url.clone(),
        settings.request_timeout(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Combination Viewer")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    let inputs = settings.default_parameters;
    eframe::run_native(
        "Combination Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(cmd_tx, ui_rx, inputs)))),
    )
}
