//! Async Operations
//!
//! Background dispatch processing. The loop runs on the app's tokio runtime
//! so that connecting to a device never blocks the UI thread.
//!
//! ```text
//! ┌──────────────────┐          ┌──────────────────┐
//! │    UI Thread     │          │  Background Task │
//! │   (ConsoleApp)   │          │ (dispatch loop)  │
//! │                  │          │                  │
//! │  async_tx ─────────────────▶│  request_rx      │
//! │                  │          │                  │
//! │  async_rx ◀─────────────────│  result_tx       │
//! └──────────────────┘          └──────────────────┘
//! ```
//!
//! At most one dispatch is in flight. A cancel stops it through its
//! [`Cancellation`], and the next dispatch only starts once the previous
//! task has finished.

use std::sync::Arc;

use eframe::egui;
use netconsole::console::{dispatch, Cancellation};
use netconsole::transport::Transport;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{AsyncRequest, AsyncResult};

/// The dispatch currently running in the background
struct InFlight {
    id: Uuid,
    cancel: Cancellation,
    task: JoinHandle<()>,
}

impl InFlight {
    async fn wait(self) {
        if let Err(e) = self.task.await {
            warn!("Dispatch {} task failed: {}", self.id, e);
        }
    }
}

/// Run the dispatch processing loop until the UI drops its sender
pub async fn dispatch_loop(
    request_rx: &mut mpsc::UnboundedReceiver<AsyncRequest>,
    result_tx: mpsc::UnboundedSender<AsyncResult>,
    transport: Arc<dyn Transport>,
    repaint: egui::Context,
) {
    info!("Starting dispatch loop on {} transport", transport.name());
    let mut in_flight: Option<InFlight> = None;

    while let Some(request) = request_rx.recv().await {
        match request {
            AsyncRequest::Dispatch(request) => {
                if let Some(previous) = in_flight.take() {
                    debug!("Waiting for dispatch {} to wind down", previous.id);
                    previous.wait().await;
                }

                debug!("Processing dispatch {}", request.id);
                let cancel = Cancellation::new();
                let id = request.id;
                let task = {
                    let transport = Arc::clone(&transport);
                    let result_tx = result_tx.clone();
                    let repaint = repaint.clone();
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        let Some(completion) =
                            dispatch::execute_cancellable(transport.as_ref(), &request, &cancel)
                                .await
                        else {
                            return;
                        };
                        if result_tx.send(AsyncResult::Completed(completion)).is_err() {
                            debug!("UI went away before dispatch {} finished", request.id);
                        }
                        repaint.request_repaint();
                    })
                };
                in_flight = Some(InFlight { id, cancel, task });
            }
            AsyncRequest::Cancel(id) => match &in_flight {
                Some(current) if current.id == id => current.cancel.cancel(),
                _ => debug!("Dispatch {} is no longer running", id),
            },
        }
    }

    if let Some(current) = in_flight.take() {
        current.cancel.cancel();
        current.wait().await;
    }
    info!("Dispatch loop ended");
}
