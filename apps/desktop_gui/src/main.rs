mod backend_bridge;
mod controller;
mod ui;

use anyhow::anyhow;
use client_core::{load_settings, LookupController, OrderClient, OrderRenderer};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    controller::events::UiEvent,
    ui::OrderLookupApp,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings(None)?;
    let client = OrderClient::from_settings(&settings)?;
    tracing::info!(api_base = %client.api_base(), ordering = ?settings.ordering, "starting order lookup gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(cmd_rx, ui_tx, client);

    let controller =
        LookupController::new(settings.ordering, OrderRenderer::from_utc_flag(settings.utc));
    let app = OrderLookupApp::new(cmd_tx, ui_rx, controller, "Starting backend...".to_string());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Order Lookup")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Order Lookup",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow!("order lookup window failed: {err}"))
}
