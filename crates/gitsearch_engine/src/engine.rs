use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gitsearch_logging::{gs_debug, gs_warn};

use crate::fetch::Fetcher;
use crate::{EngineEvent, Generation};

enum EngineCommand {
    FetchProfile {
        generation: Generation,
        identifier: String,
    },
    FetchPage {
        generation: Generation,
        identifier: String,
        page: u32,
        per_page: u32,
    },
}

/// Runs fetches on a background tokio runtime and hands completions back as events.
///
/// Requests run concurrently; events arrive in completion order, each tagged with the
/// generation it was issued for.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("gitsearch-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let fetcher = fetcher.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(fetcher.as_ref(), command, event_tx).await;
                    });
                }
                gs_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn fetch_profile(&self, generation: Generation, identifier: impl Into<String>) {
        self.send(EngineCommand::FetchProfile {
            generation,
            identifier: identifier.into(),
        });
    }

    pub fn fetch_page(
        &self,
        generation: Generation,
        identifier: impl Into<String>,
        page: u32,
        per_page: u32,
    ) {
        self.send(EngineCommand::FetchPage {
            generation,
            identifier: identifier.into(),
            page,
            per_page,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            gs_warn!("Engine worker is gone; request dropped");
        }
    }
}

async fn handle_command(
    fetcher: &dyn Fetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchProfile {
            generation,
            identifier,
        } => {
            let result = fetcher.fetch_profile(&identifier).await;
            EngineEvent::ProfileFetched {
                generation,
                identifier,
                result,
            }
        }
        EngineCommand::FetchPage {
            generation,
            identifier,
            page,
            per_page,
        } => {
            let result = fetcher.fetch_records(&identifier, page, per_page).await;
            EngineEvent::PageFetched {
                generation,
                page,
                result,
            }
        }
    };
    let _ = event_tx.send(event);
}
