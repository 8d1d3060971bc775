use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use jobsearch_logging::{search_debug, search_trace};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, QueryClient, ReqwestQueryClient};
use crate::{EngineEvent, FailureKind, FetchError, QueryParams, RequestId, SlotId, TimerId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("http client: {0}")]
    Client(#[from] FetchError),
    #[error("async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        slot: SlotId,
        path: String,
        params: QueryParams,
    },
    StartTimer {
        timer_id: TimerId,
        generation: u64,
        delay: Duration,
    },
    CancelTimer {
        timer_id: TimerId,
    },
    CancelAll,
}

/// Owns the background IO thread. Dropping the handle stops it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestQueryClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn QueryClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let mut dispatcher = Dispatcher {
                client,
                event_tx,
                handle: runtime.handle().clone(),
                slots: HashMap::new(),
                timers: HashMap::new(),
            };
            while let Ok(command) = cmd_rx.recv() {
                dispatcher.handle_command(command);
            }
            dispatcher.cancel_all();
            drop(dispatcher);
            runtime.shutdown_background();
        });

        Ok(Self { cmd_tx, event_rx })
    }

    /// Start a fetch. A fetch already running in `slot` is aborted and
    /// completes with [`FailureKind::Cancelled`].
    pub fn fetch(&self, request_id: RequestId, slot: SlotId, path: impl Into<String>, params: QueryParams) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            request_id,
            slot,
            path: path.into(),
            params,
        });
    }

    /// (Re)start a one-shot timer. Restarting replaces the pending one.
    pub fn start_timer(&self, timer_id: TimerId, generation: u64, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::StartTimer {
            timer_id,
            generation,
            delay,
        });
    }

    pub fn cancel_timer(&self, timer_id: TimerId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelTimer { timer_id });
    }

    /// Abort every fetch and timer.
    pub fn cancel_all(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelAll);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct Dispatcher {
    client: Arc<dyn QueryClient>,
    event_tx: mpsc::Sender<EngineEvent>,
    handle: Handle,
    slots: HashMap<SlotId, CancellationToken>,
    timers: HashMap<TimerId, CancellationToken>,
}

impl Dispatcher {
    fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Fetch {
                request_id,
                slot,
                path,
                params,
            } => {
                let cancel = CancellationToken::new();
                if let Some(previous) = self.slots.insert(slot, cancel.clone()) {
                    search_debug!("Slot {} superseded by request {}", slot, request_id);
                    previous.cancel();
                }
                let client = self.client.clone();
                let event_tx = self.event_tx.clone();
                self.handle.spawn(async move {
                    let result = tokio::select! {
                        _ = cancel.cancelled() => {
                            Err(FetchError::new(FailureKind::Cancelled, "superseded"))
                        }
                        result = client.fetch_json(&path, &params) => result,
                    };
                    let _ = event_tx.send(EngineEvent::FetchCompleted { request_id, result });
                });
            }
            EngineCommand::StartTimer {
                timer_id,
                generation,
                delay,
            } => {
                let cancel = CancellationToken::new();
                if let Some(previous) = self.timers.insert(timer_id, cancel.clone()) {
                    previous.cancel();
                }
                let event_tx = self.event_tx.clone();
                self.handle.spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            search_trace!("Timer {} generation {} cancelled", timer_id, generation);
                        }
                        _ = tokio::time::sleep(delay) => {
                            let _ = event_tx.send(EngineEvent::TimerFired { timer_id, generation });
                        }
                    }
                });
            }
            EngineCommand::CancelTimer { timer_id } => {
                if let Some(cancel) = self.timers.remove(&timer_id) {
                    cancel.cancel();
                }
            }
            EngineCommand::CancelAll => self.cancel_all(),
        }
    }

    fn cancel_all(&mut self) {
        for (_, cancel) in self.slots.drain().chain(self.timers.drain()) {
            cancel.cancel();
        }
    }
}
