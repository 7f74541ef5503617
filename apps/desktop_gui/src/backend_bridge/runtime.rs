//! Worker thread owning the ask client and its tokio runtime.

use std::sync::Arc;
use std::thread;

use ask_client::{AskClient, AskConfig, AskOptions};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(config: AskConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = Arc::new(AskClient::new(config));
            // The demo host keeps one request in flight; a new ask cancels
            // the previous one.
            let mut in_flight: Option<CancellationToken> = None;

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Ask { query } => {
                        if let Some(token) = in_flight.take() {
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        in_flight = Some(token.clone());

                        let client = client.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let options = AskOptions {
                                cancel: Some(token),
                                timeout: None,
                            };
                            let event = match client.ask(&query, options).await {
                                Ok(reply) => UiEvent::ReplyReady(reply),
                                Err(err) => UiEvent::AskFailed(err),
                            };
                            if let Err(TrySendError::Disconnected(_)) = ui_tx.try_send(event) {
                                warn!("ui event channel disconnected; dropping ask result");
                            }
                        });
                    }
                    BackendCommand::CancelAsk => {
                        if let Some(token) = in_flight.take() {
                            token.cancel();
                        }
                    }
                }
            }
        });
    });
}
