//! An in-process BfRuntime mock, so conformance suites run hermetically.
//!
//! The mock serves the real gRPC surface over a loopback listener: table
//! writes and reads against an in-memory store, subscribe handshakes,
//! program binding with warm-init locking and kicks, an idle-timeout
//! sweeper, and test-driven port-status injection. It is test tooling, not a
//! device simulator; behavior is limited to what the conformance properties
//! observe.

pub mod schemas;
mod store;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tokio_util::sync::CancellationToken;
use tonic::{Code, Request, Response, Status, Streaming};
use tracing::debug;

use bfrt_proto::bfrt::set_forwarding_pipeline_config_request::Action;
use bfrt_proto::bfrt::set_forwarding_pipeline_config_response::ResponseType;
use bfrt_proto::bfrt::{
    stream_message_request, stream_message_response, ForwardingPipelineConfig,
    GetForwardingPipelineConfigRequest, GetForwardingPipelineConfigResponse,
    IdleTimeoutNotification, PortStatusChgNotification, ReadRequest, ReadResponse,
    SetForwardingPipelineConfigRequest, SetForwardingPipelineConfigResponse, StreamError,
    StreamMessageRequest, StreamMessageResponse, Subscribe, TableEntry, TargetDevice,
    WriteRequest, WriteResponse,
};
use bfrt_proto::{BfRuntime, BfRuntimeServer};

use store::DeviceStore;

/// Sweep granularity of the idle-timeout task. TTLs decrement against wall
/// time at this resolution regardless of the configured query interval.
const SWEEP_TICK_MS: u32 = 50;

type StreamSender = mpsc::Sender<Result<StreamMessageResponse, Status>>;

struct ClientConn {
    tx: StreamSender,
    idle_notifications: bool,
    port_notifications: bool,
    bound: Option<String>,
}

struct WarmInit {
    initiator: u32,
}

struct Shared {
    store: DeviceStore,
    clients: HashMap<u32, ClientConn>,
    warm_init: Option<WarmInit>,
}

impl Shared {
    fn progress_frame(status: ResponseType) -> StreamMessageResponse {
        StreamMessageResponse {
            update: Some(
                stream_message_response::Update::SetForwardingPipelineConfigResponse(
                    SetForwardingPipelineConfigResponse {
                        set_forwarding_pipeline_config_response_type: status as i32,
                    },
                ),
            ),
        }
    }

    fn broadcast(&self, frame: StreamMessageResponse) {
        for client in self.clients.values() {
            let _ = client.tx.try_send(Ok(frame.clone()));
        }
    }
}

/// Handle over a running mock runtime.
pub struct MockRuntime {
    shared: Arc<tokio::sync::Mutex<Shared>>,
    endpoint: String,
    cancel: CancellationToken,
    server: JoinHandle<()>,
    sweeper: JoinHandle<()>,
}

impl MockRuntime {
    /// Binds a loopback listener and serves the BfRuntime service.
    pub async fn start() -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shared = Arc::new(tokio::sync::Mutex::new(Shared {
            store: DeviceStore::new(),
            clients: HashMap::new(),
            warm_init: None,
        }));
        let cancel = CancellationToken::new();

        let service = MockService {
            shared: shared.clone(),
        };
        let shutdown = cancel.clone();
        let server = tokio::spawn(async move {
            let result = tonic::transport::Server::builder()
                .add_service(BfRuntimeServer::new(service))
                .serve_with_incoming_shutdown(
                    TcpListenerStream::new(listener),
                    shutdown.cancelled_owned(),
                )
                .await;
            if let Err(e) = result {
                debug!("mock runtime server exited: {e}");
            }
        });
        let sweeper = tokio::spawn(sweep_loop(shared.clone(), cancel.clone()));

        Ok(Self {
            shared,
            endpoint: format!("http://{addr}"),
            cancel,
            server,
            sweeper,
        })
    }

    /// Endpoint URI clients connect to.
    pub fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    /// Preloads programs without a warm init, as if a prior boot loaded them.
    pub async fn install_programs(&self, configs: &[(String, Vec<u8>)]) -> anyhow::Result<()> {
        let mut shared = self.shared.lock().await;
        shared
            .store
            .install(configs)
            .map_err(|s| anyhow::anyhow!(s.to_string()))?;
        Ok(())
    }

    /// Injects a port operational status change.
    pub async fn set_port_status(&self, dev_port: u32, up: bool) {
        let shared = self.shared.lock().await;
        let frame = StreamMessageResponse {
            update: Some(stream_message_response::Update::PortStatusChangeNotification(
                PortStatusChgNotification { dev_port, port_up: up },
            )),
        };
        for client in shared.clients.values() {
            if client.port_notifications {
                let _ = client.tx.try_send(Ok(frame.clone()));
            }
        }
    }

    /// Number of currently subscribed clients.
    pub async fn subscribed_clients(&self) -> usize {
        self.shared.lock().await.clients.len()
    }

    /// Stops the server and the sweeper.
    pub async fn stop(self) {
        self.cancel.cancel();
        let _ = self.server.await;
        let _ = self.sweeper.await;
    }
}

async fn sweep_loop(shared: Arc<tokio::sync::Mutex<Shared>>, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_millis(u64::from(SWEEP_TICK_MS)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let mut shared = shared.lock().await;
        let mut expirations: Vec<StreamMessageResponse> = Vec::new();
        for program in shared.store.programs.values_mut() {
            for table in program.tables.values_mut() {
                let Some(idle) = table.attrs.idle else { continue };
                let notify_mode = idle.mode
                    == bfrt_proto::bfrt::table_attribute::idle_table::Mode::NotifyMode as i32;
                // A disabled table freezes TTLs at their residuals.
                if !idle.enable || !notify_mode {
                    continue;
                }
                let table_id = table.info.id;
                for ((pipe, _), entry) in table.entries.iter_mut() {
                    let Some(ttl) = entry.ttl_ms else { continue };
                    let next = ttl.saturating_sub(SWEEP_TICK_MS);
                    entry.ttl_ms = Some(next);
                    if next == 0 && !entry.notified {
                        entry.notified = true;
                        expirations.push(StreamMessageResponse {
                            update: Some(
                                stream_message_response::Update::IdleTimeoutNotification(
                                    IdleTimeoutNotification {
                                        target: Some(TargetDevice {
                                            device_id: 0,
                                            pipe_id: *pipe,
                                            direction: 0xFF,
                                            prsr_id: 0xFF,
                                        }),
                                        table_entry: Some(TableEntry {
                                            table_id,
                                            value: Some(
                                                bfrt_proto::bfrt::table_entry::Value::Key(
                                                    entry.key.clone(),
                                                ),
                                            ),
                                            ..Default::default()
                                        }),
                                    },
                                ),
                            ),
                        });
                    }
                }
            }
        }
        for frame in expirations {
            for client in shared.clients.values() {
                if client.idle_notifications {
                    let _ = client.tx.try_send(Ok(frame.clone()));
                }
            }
        }
    }
}

#[derive(Clone)]
struct MockService {
    shared: Arc<tokio::sync::Mutex<Shared>>,
}

#[tonic::async_trait]
impl BfRuntime for MockService {
    async fn write(
        &self,
        request: Request<WriteRequest>,
    ) -> Result<Response<WriteResponse>, Status> {
        let req = request.into_inner();
        let mut shared = self.shared.lock().await;
        if let Some(warm_init) = &shared.warm_init {
            // Replay traffic passes the device lock: the initiator, plus any
            // client that bound to a staged program during the window.
            let replaying = warm_init.initiator == req.client_id
                || shared
                    .clients
                    .get(&req.client_id)
                    .map(|c| c.bound.is_some())
                    .unwrap_or(false);
            if !replaying {
                return Err(Status::unavailable("device locked by warm init"));
            }
        }
        let program = shared.store.program_mut(&req.p4_name)?;
        program.write(&req)?;
        Ok(Response::new(WriteResponse {}))
    }

    type ReadStream = ReceiverStream<Result<ReadResponse, Status>>;

    async fn read(
        &self,
        request: Request<ReadRequest>,
    ) -> Result<Response<Self::ReadStream>, Status> {
        let req = request.into_inner();
        let shared = self.shared.lock().await;
        let program = shared.store.program(&req.p4_name)?;
        let pipe = req.target.as_ref().map(|t| t.pipe_id).unwrap_or(0xFFFF);

        let mut entities = Vec::new();
        for entity in &req.entities {
            entities.extend(program.read_entity(pipe, entity)?);
        }
        let (tx, rx) = mpsc::channel(4);
        tx.send(Ok(ReadResponse { entities }))
            .await
            .map_err(|_| Status::internal("read stream closed"))?;
        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn set_forwarding_pipeline_config(
        &self,
        request: Request<SetForwardingPipelineConfigRequest>,
    ) -> Result<Response<SetForwardingPipelineConfigResponse>, Status> {
        let req = request.into_inner();
        let action = Action::try_from(req.action)
            .map_err(|_| Status::invalid_argument("unknown pipeline action"))?;
        let configs: Vec<(String, Vec<u8>)> = req
            .config
            .iter()
            .map(|c| (c.p4_name.clone(), c.bfruntime_info.clone()))
            .collect();

        let mut shared = self.shared.lock().await;
        let mut response_type = ResponseType::WarmInitStarted;
        match action {
            Action::Bind => {
                if configs.is_empty() {
                    if let Some(client) = shared.clients.get_mut(&req.client_id) {
                        client.bound = None;
                    }
                } else {
                    let name = configs[0].0.clone();
                    // During a warm init, only programs in the staged config
                    // are bindable; anything else sees the device lock.
                    if shared.store.program(&name).is_err() {
                        if shared.warm_init.is_some() {
                            return Err(Status::unavailable("device locked by warm init"));
                        }
                        shared.store.program(&name)?;
                    }
                    let client = shared
                        .clients
                        .get_mut(&req.client_id)
                        .ok_or_else(|| Status::failed_precondition("client not subscribed"))?;
                    if client.bound.as_deref() == Some(name.as_str()) {
                        return Err(Status::already_exists(format!(
                            "client {} already bound to {name}",
                            req.client_id
                        )));
                    }
                    client.bound = Some(name);
                }
            }
            Action::Verify => {
                DeviceStore::verify(&configs)?;
            }
            Action::VerifyAndWarmInitBegin | Action::VerifyAndWarmInitBeginAndEnd => {
                if shared.warm_init.is_some() {
                    return Err(Status::unavailable("warm init already in progress"));
                }
                DeviceStore::verify(&configs)?;
                shared.store.install(&configs)?;
                shared.warm_init = Some(WarmInit {
                    initiator: req.client_id,
                });
                shared.broadcast(Shared::progress_frame(ResponseType::WarmInitStarted));

                // Kick clients whose bound program did not survive.
                let loaded: Vec<&String> = configs.iter().map(|(n, _)| n).collect();
                for client in shared.clients.values_mut() {
                    let kicked = client
                        .bound
                        .as_ref()
                        .map(|b| !loaded.contains(&b))
                        .unwrap_or(false);
                    if kicked {
                        client.bound = None;
                        let _ = client.tx.try_send(Ok(StreamMessageResponse {
                            update: Some(stream_message_response::Update::Error(StreamError {
                                canonical_code: Code::Cancelled as i32,
                                message: "bound program replaced".to_string(),
                            })),
                        }));
                    }
                }

                if action == Action::VerifyAndWarmInitBeginAndEnd {
                    shared.warm_init = None;
                    shared.broadcast(Shared::progress_frame(ResponseType::WarmInitFinished));
                    response_type = ResponseType::WarmInitFinished;
                }
            }
            Action::WarmInitEnd => {
                if !configs.is_empty() {
                    return Err(Status::invalid_argument(
                        "WARM_INIT_END must not carry a config payload",
                    ));
                }
                if shared.warm_init.take().is_none() {
                    return Err(Status::failed_precondition("no warm init in progress"));
                }
                shared.broadcast(Shared::progress_frame(ResponseType::WarmInitFinished));
                response_type = ResponseType::WarmInitFinished;
            }
        }
        Ok(Response::new(SetForwardingPipelineConfigResponse {
            set_forwarding_pipeline_config_response_type: response_type as i32,
        }))
    }

    async fn get_forwarding_pipeline_config(
        &self,
        _request: Request<GetForwardingPipelineConfigRequest>,
    ) -> Result<Response<GetForwardingPipelineConfigResponse>, Status> {
        let shared = self.shared.lock().await;
        let config = shared
            .store
            .programs
            .iter()
            .map(|(name, program)| ForwardingPipelineConfig {
                p4_name: name.clone(),
                bfruntime_info: program.blob.clone(),
                profiles: Vec::new(),
            })
            .collect();
        Ok(Response::new(GetForwardingPipelineConfigResponse { config }))
    }

    type StreamChannelStream = ReceiverStream<Result<StreamMessageResponse, Status>>;

    async fn stream_channel(
        &self,
        request: Request<Streaming<StreamMessageRequest>>,
    ) -> Result<Response<Self::StreamChannelStream>, Status> {
        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(256);
        let shared = self.shared.clone();

        tokio::spawn(async move {
            let mut registered: Option<u32> = None;
            while let Ok(Some(msg)) = inbound.message().await {
                let Some(stream_message_request::Update::Subscribe(sub)) = msg.update else {
                    continue;
                };
                let notifications = sub.notifications.unwrap_or_default();
                let mut shared_guard = shared.lock().await;
                let code = if shared_guard.warm_init.is_some() {
                    Code::Unavailable as i32
                } else {
                    0
                };
                if code == 0 {
                    shared_guard.clients.insert(
                        msg.client_id,
                        ClientConn {
                            tx: tx.clone(),
                            idle_notifications: notifications.enable_idletimeout_notifications,
                            port_notifications: notifications
                                .enable_port_status_change_notifications,
                            bound: None,
                        },
                    );
                    registered = Some(msg.client_id);
                }
                drop(shared_guard);

                let ack = StreamMessageResponse {
                    update: Some(stream_message_response::Update::Subscribe(Subscribe {
                        device_id: sub.device_id,
                        notifications: Some(notifications),
                        status: Some(StreamError {
                            canonical_code: code,
                            message: if code == 0 {
                                String::new()
                            } else {
                                "device locked by warm init".to_string()
                            },
                        }),
                    })),
                };
                if tx.send(Ok(ack)).await.is_err() || code != 0 {
                    break;
                }
            }
            // Deregister on disconnect, unless a newer stream took the id.
            if let Some(client_id) = registered {
                let mut shared_guard = shared.lock().await;
                let stale = shared_guard
                    .clients
                    .get(&client_id)
                    .map(|c| c.tx.is_closed() || c.tx.same_channel(&tx))
                    .unwrap_or(false);
                if stale {
                    shared_guard.clients.remove(&client_id);
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
