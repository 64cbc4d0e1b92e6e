//! Notification demultiplexing for the session stream channel.
//!
//! One background task per session reads the server-to-client stream and
//! routes each frame into a typed, bounded queue: idle-timeout, port-status,
//! warm-init progression, and stream-level errors. Within one kind and one
//! pipe, frames keep device order; no ordering holds across kinds. Closing
//! the session cancels the reader and closes every queue, after which gets
//! report [`BfrtError::QueueClosed`] once drained.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::codec::Streaming;
use tracing::{debug, warn};

use bfrt_proto::bfrt::{
    set_forwarding_pipeline_config_response::ResponseType, stream_message_response,
    StreamMessageResponse, TableEntry,
};

use crate::error::{BfrtError, Result};
use crate::session::{SessionShared, SessionState};
use crate::target::Target;

/// Warm-init progression observed on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmInitStatus {
    Started,
    Finished,
}

impl WarmInitStatus {
    fn from_wire(v: i32) -> Option<Self> {
        match ResponseType::try_from(v) {
            Ok(ResponseType::WarmInitStarted) => Some(WarmInitStatus::Started),
            Ok(ResponseType::WarmInitFinished) => Some(WarmInitStatus::Finished),
            Err(_) => None,
        }
    }
}

/// An entry aged out by the idle-timeout sweeper.
///
/// Carries the originating pipe target and the raw entry; decode the key
/// with [`crate::table::Table::decode_notification_key`].
#[derive(Debug, Clone)]
pub struct IdleNotification {
    pub target: Target,
    pub table_id: u32,
    pub(crate) entry: TableEntry,
}

impl IdleNotification {
    pub(crate) fn raw(&self) -> &TableEntry {
        &self.entry
    }
}

/// A port operational status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortStatusNotification {
    pub dev_port: u32,
    pub up: bool,
}

/// An asynchronous error pushed by the server.
#[derive(Debug, Clone)]
pub struct RpcErrorNotification {
    pub code: tonic::Code,
    pub message: String,
}

pub(crate) struct QueueSenders {
    idle: mpsc::Sender<IdleNotification>,
    port: mpsc::Sender<PortStatusNotification>,
    errors: mpsc::Sender<RpcErrorNotification>,
    progress: mpsc::Sender<WarmInitStatus>,
    subscribe: mpsc::Sender<i32>,
}

impl Clone for QueueSenders {
    fn clone(&self) -> Self {
        Self {
            idle: self.idle.clone(),
            port: self.port.clone(),
            errors: self.errors.clone(),
            progress: self.progress.clone(),
            subscribe: self.subscribe.clone(),
        }
    }
}

/// The per-session notification queues a test pulls from.
pub struct NotificationQueues {
    idle: tokio::sync::Mutex<mpsc::Receiver<IdleNotification>>,
    port: tokio::sync::Mutex<mpsc::Receiver<PortStatusNotification>>,
    errors: tokio::sync::Mutex<mpsc::Receiver<RpcErrorNotification>>,
    progress: tokio::sync::Mutex<mpsc::Receiver<WarmInitStatus>>,
    subscribe: tokio::sync::Mutex<mpsc::Receiver<i32>>,
}

impl NotificationQueues {
    /// Builds the paired senders and queues with the given per-kind bound.
    pub(crate) fn channel(capacity: usize) -> (QueueSenders, NotificationQueues) {
        let (idle_tx, idle_rx) = mpsc::channel(capacity);
        let (port_tx, port_rx) = mpsc::channel(capacity);
        let (err_tx, err_rx) = mpsc::channel(capacity);
        let (progress_tx, progress_rx) = mpsc::channel(capacity);
        let (sub_tx, sub_rx) = mpsc::channel(8);
        (
            QueueSenders {
                idle: idle_tx,
                port: port_tx,
                errors: err_tx,
                progress: progress_tx,
                subscribe: sub_tx,
            },
            NotificationQueues {
                idle: tokio::sync::Mutex::new(idle_rx),
                port: tokio::sync::Mutex::new(port_rx),
                errors: tokio::sync::Mutex::new(err_rx),
                progress: tokio::sync::Mutex::new(progress_rx),
                subscribe: tokio::sync::Mutex::new(sub_rx),
            },
        )
    }

    /// Pops the next idle-timeout notification, waiting up to `timeout`.
    pub async fn idle_timeout(&self, timeout: Duration) -> Result<IdleNotification> {
        recv_timeout(&self.idle, timeout).await
    }

    /// Pops the next port-status notification, waiting up to `timeout`.
    pub async fn port_status(&self, timeout: Duration) -> Result<PortStatusNotification> {
        recv_timeout(&self.port, timeout).await
    }

    /// Waits until the given warm-init status is observed, discarding earlier
    /// progression frames.
    pub async fn wait_warm_init(&self, status: WarmInitStatus, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(tokio::time::Instant::now())
                .ok_or(BfrtError::Timeout(timeout))?;
            let observed = recv_timeout(&self.progress, remaining).await?;
            if observed == status {
                return Ok(());
            }
        }
    }

    /// Drains the error queue without blocking.
    pub async fn drain_errors(&self) -> Vec<RpcErrorNotification> {
        let mut rx = self.errors.lock().await;
        let mut out = Vec::new();
        while let Ok(e) = rx.try_recv() {
            out.push(e);
        }
        out
    }

    /// Pops the next stream error, waiting up to `timeout`.
    pub async fn next_error(&self, timeout: Duration) -> Result<RpcErrorNotification> {
        recv_timeout(&self.errors, timeout).await
    }

    pub(crate) async fn wait_subscribe_ack(&self, timeout: Duration) -> Result<i32> {
        recv_timeout(&self.subscribe, timeout).await
    }
}

async fn recv_timeout<T>(
    queue: &tokio::sync::Mutex<mpsc::Receiver<T>>,
    timeout: Duration,
) -> Result<T> {
    let mut rx = queue.lock().await;
    match tokio::time::timeout(timeout, rx.recv()).await {
        Ok(Some(v)) => Ok(v),
        Ok(None) => Err(BfrtError::QueueClosed),
        Err(_) => Err(BfrtError::Timeout(timeout)),
    }
}

/// Spawns the background reader that routes stream frames into the queues.
pub(crate) fn spawn_dispatcher(
    client_id: u32,
    mut stream: Streaming<StreamMessageResponse>,
    senders: QueueSenders,
    shared: Arc<SessionShared>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                frame = stream.message() => match frame {
                    Ok(Some(msg)) => route(client_id, msg, &senders, &shared).await,
                    Ok(None) => {
                        debug!(client = client_id, "stream channel closed by server");
                        break;
                    }
                    Err(status) => {
                        let _ = senders
                            .errors
                            .send(RpcErrorNotification {
                                code: status.code(),
                                message: status.message().to_string(),
                            })
                            .await;
                        break;
                    }
                }
            }
        }
        shared.set_state(SessionState::Disconnected);
        // Senders drop here, closing every queue.
    })
}

async fn route(
    client_id: u32,
    msg: StreamMessageResponse,
    senders: &QueueSenders,
    shared: &SessionShared,
) {
    use stream_message_response::Update;
    match msg.update {
        Some(Update::Subscribe(sub)) => {
            let code = sub.status.as_ref().map(|s| s.canonical_code).unwrap_or(0);
            if code == 0 {
                shared.set_state(SessionState::Subscribed);
            }
            let _ = senders.subscribe.send(code).await;
        }
        Some(Update::IdleTimeoutNotification(n)) => {
            let target = n
                .target
                .as_ref()
                .map(Target::from_proto)
                .unwrap_or(Target::new(0));
            let Some(entry) = n.table_entry else {
                warn!(client = client_id, "idle notification without entry");
                return;
            };
            let notif = IdleNotification {
                target,
                table_id: entry.table_id,
                entry,
            };
            if senders.idle.try_send(notif).is_err() {
                warn!(client = client_id, "idle queue full, dropping notification");
            }
        }
        Some(Update::PortStatusChangeNotification(n)) => {
            let notif = PortStatusNotification {
                dev_port: n.dev_port,
                up: n.port_up,
            };
            if senders.port.try_send(notif).is_err() {
                warn!(client = client_id, "port-status queue full, dropping notification");
            }
        }
        Some(Update::SetForwardingPipelineConfigResponse(r)) => {
            let Some(status) =
                WarmInitStatus::from_wire(r.set_forwarding_pipeline_config_response_type)
            else {
                return;
            };
            match status {
                WarmInitStatus::Started => shared.set_state(SessionState::WarmInit),
                WarmInitStatus::Finished => shared.settle_after_warm_init(),
            }
            debug!(client = client_id, ?status, "warm init progression");
            let _ = senders.progress.send(status).await;
        }
        Some(Update::Error(e)) => {
            let code = tonic::Code::from(e.canonical_code);
            if code == tonic::Code::Cancelled && shared.clear_binding_if_bound() {
                // Kicked: the bound program was replaced out from under us.
                debug!(client = client_id, "unbound by pipeline replacement");
            }
            let _ = senders
                .errors
                .send(RpcErrorNotification {
                    code,
                    message: e.message,
                })
                .await;
        }
        None => {}
    }
}
