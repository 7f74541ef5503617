//! askdock desktop host: embeds the conversational panel in an eframe shell.
//!
//! The shell wires the two core components together: the session orchestrator
//! runs on a backend worker thread bridged over crossbeam channels, and the
//! window controller turns pointer gestures into the panel frame.

use std::sync::Arc;
use std::time::Duration;

use ask_client::{AskConfig, EventSink};
use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use shared::PanelEvent;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;

#[derive(Parser, Debug)]
#[command(name = "askdock", about = "Desktop host for the askdock conversational panel")]
struct Args {
    /// Base URL of the answering service, without the trailing `/ask`.
    #[arg(long, env = "ASKDOCK_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Application identifier sent in the query context.
    #[arg(long, env = "ASKDOCK_DAPP", default_value = "kamino")]
    dapp: String,

    /// Language code sent in the query context.
    #[arg(long, env = "ASKDOCK_LANG", default_value = "en")]
    lang: String,

    /// Fabricate replies locally instead of contacting the service.
    #[arg(long, env = "ASKDOCK_MOCK")]
    mock: bool,

    /// Bearer token attached to outbound requests when present.
    #[arg(long, env = "ASKDOCK_BEARER_TOKEN")]
    bearer_token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "ASKDOCK_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

fn build_ask_config(args: &Args, sink: EventSink) -> AskConfig {
    let mut config = AskConfig::new(args.api_url.clone());
    config.dapp = args.dapp.clone();
    config.lang = args.lang.clone();
    config.mock = args.mock;
    config.bearer_token = args.bearer_token.clone();
    config.timeout = Duration::from_secs(args.timeout_secs);
    config.on_event = Some(sink);
    config
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    // Host-side analytics sink; the panel works the same without it.
    let sink: EventSink = Arc::new(|event: &PanelEvent| {
        tracing::info!(target: "askdock::analytics", ?event, "panel lifecycle event");
    });

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(build_ask_config(&args, sink.clone()), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("askdock")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "askdock",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::PanelApp::new(cmd_tx, ui_rx, sink)))),
    )
}
