//! Client sessions: subscription handshake, program binding, and
//! forwarding-pipeline configuration.
//!
//! One [`ClientInterface`] encapsulates one bidirectional stream to the
//! runtime plus the unary control surface. Connecting performs the subscribe
//! handshake, retrying while the device reports `UNAVAILABLE` (warm init in
//! progress). A session is not safe for concurrent RPCs from multiple tasks;
//! callers serialize at the session boundary, which the internal lock
//! enforces rather than assumes.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info, warn};

use bfrt_proto::bfrt::set_forwarding_pipeline_config_request::Action;
use bfrt_proto::bfrt::{
    forwarding_pipeline_config, stream_message_request, subscribe, Entity, ForwardingPipelineConfig,
    GetForwardingPipelineConfigRequest, ReadRequest, SetForwardingPipelineConfigRequest,
    StreamMessageRequest, Subscribe, Update, WriteRequest,
};
use bfrt_proto::BfRuntimeClient;

use crate::error::{BfrtError, Result};
use crate::notify::{spawn_dispatcher, NotificationQueues};
use crate::schema::{SchemaCache, SchemaInfo};
use crate::table::{Atomicity, Table};
use crate::target::Target;

/// Session lifecycle state, driven by the handshake and stream events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Subscribing,
    Subscribed,
    /// Subscribed and associated with one loaded program.
    Bound,
    /// A warm init is in progress on the device.
    WarmInit,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "Disconnected"),
            SessionState::Subscribing => write!(f, "Subscribing"),
            SessionState::Subscribed => write!(f, "Subscribed"),
            SessionState::Bound => write!(f, "Bound"),
            SessionState::WarmInit => write!(f, "WarmInit"),
        }
    }
}

/// State shared between the session and its stream dispatcher.
pub(crate) struct SessionShared {
    inner: Mutex<StatusInner>,
}

struct StatusInner {
    state: SessionState,
    bound: Option<String>,
}

impl SessionShared {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(StatusInner {
                state: SessionState::Disconnected,
                bound: None,
            }),
        }
    }

    pub(crate) fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        self.inner.lock().state = state;
    }

    pub(crate) fn bound(&self) -> Option<String> {
        self.inner.lock().bound.clone()
    }

    pub(crate) fn set_bound(&self, p4_name: Option<String>) {
        let mut inner = self.inner.lock();
        inner.state = if p4_name.is_some() {
            SessionState::Bound
        } else {
            SessionState::Subscribed
        };
        inner.bound = p4_name;
    }

    /// After `WARM_INIT_FINISHED`: back to Bound when the binding survived.
    pub(crate) fn settle_after_warm_init(&self) {
        let mut inner = self.inner.lock();
        inner.state = if inner.bound.is_some() {
            SessionState::Bound
        } else {
            SessionState::Subscribed
        };
    }

    /// Clears the binding if present; returns true when a kick happened.
    pub(crate) fn clear_binding_if_bound(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.bound.take().is_some() {
            inner.state = SessionState::Subscribed;
            true
        } else {
            false
        }
    }
}

/// Connection options for one client session.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Endpoint URI, e.g. `http://127.0.0.1:50052`.
    pub addr: String,
    pub client_id: u32,
    pub device_id: u32,
    pub enable_idle_timeout_notifications: bool,
    pub enable_port_status_change_notifications: bool,
    /// Per-attempt wait for the subscribe ack.
    pub subscribe_timeout: Duration,
    /// Subscribe attempts before giving up on `UNAVAILABLE`.
    pub subscribe_attempts: u32,
    /// Default per-RPC deadline; `None` leaves requests unbounded.
    pub deadline: Option<Duration>,
    /// Per-kind notification queue bound.
    pub queue_capacity: usize,
}

impl ClientOptions {
    pub fn new(addr: impl Into<String>, client_id: u32, device_id: u32) -> Self {
        Self {
            addr: addr.into(),
            client_id,
            device_id,
            enable_idle_timeout_notifications: true,
            enable_port_status_change_notifications: true,
            subscribe_timeout: Duration::from_secs(5),
            subscribe_attempts: 5,
            deadline: None,
            queue_capacity: 1024,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// The pipeline-config push actions. Mutually exclusive per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineAction {
    /// Validate the proposed config; no device change.
    Verify,
    /// Verify, then freeze the device so clients can replay entries.
    VerifyAndWarmInitBegin,
    /// Verify, freeze, and commit immediately (no replay window).
    VerifyAndWarmInitBeginAndEnd,
    /// Commit a previously begun warm init. Must carry no config payload.
    WarmInitEnd,
}

impl PipelineAction {
    fn to_wire(self) -> Action {
        match self {
            PipelineAction::Verify => Action::Verify,
            PipelineAction::VerifyAndWarmInitBegin => Action::VerifyAndWarmInitBegin,
            PipelineAction::VerifyAndWarmInitBeginAndEnd => Action::VerifyAndWarmInitBeginAndEnd,
            PipelineAction::WarmInitEnd => Action::WarmInitEnd,
        }
    }

    fn begins_warm_init(self) -> bool {
        matches!(
            self,
            PipelineAction::VerifyAndWarmInitBegin | PipelineAction::VerifyAndWarmInitBeginAndEnd
        )
    }
}

/// One compiled profile of a pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct PipelineProfile {
    pub name: String,
    pub context: Vec<u8>,
    pub binary: Vec<u8>,
    pub pipe_scope: Vec<u32>,
}

/// One program of a forwarding-pipeline push.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub p4_name: String,
    pub bfruntime_info: Vec<u8>,
    pub profiles: Vec<PipelineProfile>,
}

impl PipelineConfig {
    pub fn new(p4_name: impl Into<String>, bfruntime_info: Vec<u8>) -> Self {
        Self {
            p4_name: p4_name.into(),
            bfruntime_info,
            profiles: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: PipelineProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Loads a config from a compiler output directory: `bf-rt.json` at the
    /// top, one subdirectory per profile with `context.json` and the device
    /// binary, each profile mapped to the given pipes.
    pub fn from_artifact_dir(
        p4_name: &str,
        dir: &Path,
        pipe_assignment: &[(String, Vec<u32>)],
    ) -> Result<Self> {
        let read = |p: &Path| -> Result<Vec<u8>> {
            std::fs::read(p).map_err(|e| {
                BfrtError::invalid_argument(format!("cannot read artifact {}: {e}", p.display()))
            })
        };
        let bfruntime_info = read(&dir.join("bf-rt.json"))?;
        let mut config = PipelineConfig::new(p4_name, bfruntime_info);
        for (profile_name, pipes) in pipe_assignment {
            let pdir = dir.join(profile_name);
            let context = read(&pdir.join("context.json"))?;
            let binary = read(&pdir.join("tofino.bin"))?;
            config = config.with_profile(PipelineProfile {
                name: profile_name.clone(),
                context,
                binary,
                pipe_scope: pipes.clone(),
            });
        }
        Ok(config)
    }

    fn to_proto(&self) -> ForwardingPipelineConfig {
        ForwardingPipelineConfig {
            p4_name: self.p4_name.clone(),
            bfruntime_info: self.bfruntime_info.clone(),
            profiles: self
                .profiles
                .iter()
                .map(|p| forwarding_pipeline_config::Profile {
                    profile_name: p.name.clone(),
                    context: p.context.clone(),
                    binary: p.binary.clone(),
                    pipe_scope: p.pipe_scope.clone(),
                })
                .collect(),
        }
    }
}

pub(crate) struct SessionCore {
    pub(crate) client_id: u32,
    pub(crate) device_id: u32,
    grpc: tokio::sync::Mutex<BfRuntimeClient<Channel>>,
    pub(crate) shared: Arc<SessionShared>,
    queues: NotificationQueues,
    cache: SchemaCache,
    cancel: CancellationToken,
    reader: Mutex<Option<JoinHandle<()>>>,
    // Held so the outbound half of the stream stays open.
    _to_server: mpsc::Sender<StreamMessageRequest>,
    deadline: Option<Duration>,
}

impl SessionCore {
    /// Builds a request under the per-call deadline, falling back to the
    /// session default.
    fn request<T>(&self, message: T, deadline: Option<Duration>) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        if let Some(deadline) = deadline.or(self.deadline) {
            request.set_timeout(deadline);
        }
        request
    }

    pub(crate) async fn write(
        &self,
        p4_name: &str,
        target: Target,
        updates: Vec<Update>,
        atomicity: Atomicity,
        deadline: Option<Duration>,
    ) -> Result<()> {
        let request = self.request(
            WriteRequest {
                target: Some(target.to_proto()),
                client_id: self.client_id,
                updates,
                atomicity: atomicity.to_wire() as i32,
                p4_name: p4_name.to_string(),
            },
            deadline,
        );
        let mut grpc = self.grpc.lock().await;
        grpc.write(request).await?;
        Ok(())
    }

    pub(crate) async fn read(
        &self,
        p4_name: &str,
        target: Target,
        entities: Vec<Entity>,
        deadline: Option<Duration>,
    ) -> Result<Vec<Entity>> {
        let request = self.request(
            ReadRequest {
                target: Some(target.to_proto()),
                client_id: self.client_id,
                entities,
                p4_name: p4_name.to_string(),
            },
            deadline,
        );
        let mut grpc = self.grpc.lock().await;
        let mut stream = grpc.read(request).await?.into_inner();
        drop(grpc);

        // Iterate the GetFirst/GetNext chain to completion.
        let mut out = Vec::new();
        while let Some(response) = stream.message().await? {
            out.extend(response.entities);
        }
        Ok(out)
    }

    async fn set_pipeline(&self, request: SetForwardingPipelineConfigRequest) -> Result<()> {
        let request = self.request(request, None);
        let mut grpc = self.grpc.lock().await;
        grpc.set_forwarding_pipeline_config(request).await?;
        Ok(())
    }
}

/// One client connection to the BfRuntime service.
pub struct ClientInterface {
    core: Arc<SessionCore>,
}

impl ClientInterface {
    /// Connects and performs the subscribe handshake, retrying while the
    /// device reports `UNAVAILABLE`.
    pub async fn connect(options: ClientOptions) -> Result<Self> {
        let endpoint = Endpoint::from_shared(options.addr.clone())
            .map_err(BfrtError::Transport)?
            .connect_timeout(Duration::from_secs(5));
        let channel = endpoint.connect().await?;
        let mut grpc = BfRuntimeClient::new(channel);

        let (senders, queues) = NotificationQueues::channel(options.queue_capacity);
        let shared = Arc::new(SessionShared::new());
        let cancel = CancellationToken::new();

        let mut attempt = 0u32;
        let (to_server, reader) = loop {
            attempt += 1;
            shared.set_state(SessionState::Subscribing);

            let (tx, rx) = mpsc::channel::<StreamMessageRequest>(16);
            let outbound = ReceiverStream::new(rx);
            let attempt_cancel = cancel.child_token();

            let result = async {
                let response = grpc
                    .stream_channel(tonic::Request::new(outbound))
                    .await
                    .map_err(BfrtError::from)?;
                let handle = spawn_dispatcher(
                    options.client_id,
                    response.into_inner(),
                    senders.clone(),
                    shared.clone(),
                    attempt_cancel.clone(),
                );

                let subscribe = StreamMessageRequest {
                    client_id: options.client_id,
                    update: Some(stream_message_request::Update::Subscribe(Subscribe {
                        device_id: options.device_id,
                        notifications: Some(subscribe::Notifications {
                            enable_learn_notifications: false,
                            enable_idletimeout_notifications: options
                                .enable_idle_timeout_notifications,
                            enable_port_status_change_notifications: options
                                .enable_port_status_change_notifications,
                        }),
                        status: None,
                    })),
                };
                tx.send(subscribe)
                    .await
                    .map_err(|_| BfrtError::Unavailable("stream closed before subscribe".into()))?;

                let code = queues.wait_subscribe_ack(options.subscribe_timeout).await?;
                if code == 0 {
                    Ok(handle)
                } else {
                    handle.abort();
                    Err(BfrtError::from(tonic::Status::new(
                        tonic::Code::from(code),
                        "subscribe rejected",
                    )))
                }
            }
            .await;

            match result {
                Ok(handle) => break (tx, handle),
                Err(e) if e.is_retryable_bind() && attempt < options.subscribe_attempts => {
                    attempt_cancel.cancel();
                    let backoff = Duration::from_millis(u64::from(100 * attempt).min(2000));
                    warn!(
                        client = options.client_id,
                        attempt, "subscribe unavailable, retrying in {backoff:?}"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    cancel.cancel();
                    return Err(e);
                }
            }
        };

        info!(
            client = options.client_id,
            device = options.device_id,
            "subscribed to runtime"
        );
        Ok(Self {
            core: Arc::new(SessionCore {
                client_id: options.client_id,
                device_id: options.device_id,
                grpc: tokio::sync::Mutex::new(grpc),
                shared,
                queues,
                cache: SchemaCache::new(),
                cancel,
                reader: Mutex::new(Some(reader)),
                _to_server: to_server,
                deadline: options.deadline,
            }),
        })
    }

    pub fn client_id(&self) -> u32 {
        self.core.client_id
    }

    pub fn device_id(&self) -> u32 {
        self.core.device_id
    }

    /// Current lifecycle state of the session.
    pub fn state(&self) -> SessionState {
        self.core.shared.state()
    }

    /// Program this client is bound to, if any.
    pub fn bound_program(&self) -> Option<String> {
        self.core.shared.bound()
    }

    /// The per-kind notification queues of this session.
    pub fn notifications(&self) -> &NotificationQueues {
        &self.core.queues
    }

    /// Associates this client with a loaded program.
    ///
    /// Fails with `Unavailable` while a warm init holds the device lock and
    /// with `AlreadyExists` when the client is already bound; bind-retry
    /// loops recover both locally.
    pub async fn bind_pipeline_config(&self, p4_name: &str) -> Result<()> {
        let request = SetForwardingPipelineConfigRequest {
            device_id: self.core.device_id,
            client_id: self.core.client_id,
            action: Action::Bind as i32,
            base_path: String::new(),
            config: vec![ForwardingPipelineConfig {
                p4_name: p4_name.to_string(),
                ..Default::default()
            }],
        };
        self.core.set_pipeline(request).await?;
        self.core.shared.set_bound(Some(p4_name.to_string()));
        info!(client = self.core.client_id, p4 = p4_name, "bound to program");
        Ok(())
    }

    /// Drops the program association.
    pub async fn clear_bound_program(&self) -> Result<()> {
        let request = SetForwardingPipelineConfigRequest {
            device_id: self.core.device_id,
            client_id: self.core.client_id,
            action: Action::Bind as i32,
            base_path: String::new(),
            config: Vec::new(),
        };
        self.core.set_pipeline(request).await?;
        self.core.shared.set_bound(None);
        Ok(())
    }

    /// Pushes a forwarding-pipeline configuration. Warm-init progression
    /// arrives on the notification queues; wait with
    /// [`NotificationQueues::wait_warm_init`](crate::notify::NotificationQueues::wait_warm_init).
    ///
    /// `WarmInitEnd` must not carry configs; the device rejects the payload
    /// with `INVALID_ARGUMENT`.
    pub async fn pipeline_config_set(
        &self,
        action: PipelineAction,
        base_path: &str,
        configs: &[PipelineConfig],
    ) -> Result<()> {
        let request = SetForwardingPipelineConfigRequest {
            device_id: self.core.device_id,
            client_id: self.core.client_id,
            action: action.to_wire() as i32,
            base_path: base_path.to_string(),
            config: configs.iter().map(PipelineConfig::to_proto).collect(),
        };
        debug!(
            client = self.core.client_id,
            action = ?action,
            programs = configs.len(),
            "pipeline config push"
        );
        self.core.set_pipeline(request).await?;
        if action.begins_warm_init() {
            self.core.shared.set_state(SessionState::WarmInit);
            // Schemas may change across the warm init.
            for config in configs {
                self.core.cache.evict(&config.p4_name);
            }
        }
        Ok(())
    }

    /// Fetches the loaded configuration: `(p4_name, bf-rt.json blob)` pairs.
    pub async fn pipeline_config_get(&self) -> Result<Vec<(String, Vec<u8>)>> {
        let request = self.core.request(
            GetForwardingPipelineConfigRequest {
                device_id: self.core.device_id,
                client_id: self.core.client_id,
            },
            None,
        );
        let mut grpc = self.core.grpc.lock().await;
        let response = grpc.get_forwarding_pipeline_config(request).await?;
        Ok(response
            .into_inner()
            .config
            .into_iter()
            .map(|c| (c.p4_name, c.bfruntime_info))
            .collect())
    }

    /// Returns the schema of a program, fetching and caching on first use.
    ///
    /// `p4_name` may be omitted when the client is bound.
    pub async fn info_get(&self, p4_name: Option<&str>) -> Result<Arc<SchemaInfo>> {
        let name = match p4_name {
            Some(n) => n.to_string(),
            None => self.core.shared.bound().ok_or_else(|| {
                BfrtError::invalid_argument("no program name given and client is not bound")
            })?,
        };
        if let Some(info) = self.core.cache.get(&name) {
            return Ok(info);
        }
        let configs = self.pipeline_config_get().await?;
        let blob = configs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, blob)| blob)
            .ok_or_else(|| BfrtError::not_found(format!("program {name:?} is not loaded")))?;
        self.core.cache.load(&name, blob)
    }

    /// Resolves a table handle by name on the bound program.
    pub async fn table(&self, name: &str) -> Result<Table> {
        let info = self.info_get(None).await?;
        let p4_name = info.p4_name.clone();
        let table_info = info.table_get(name)?;
        Ok(Table::new(self.core.clone(), p4_name, table_info))
    }

    /// Resolves a table handle by name on an explicit program.
    pub async fn table_from(&self, p4_name: &str, name: &str) -> Result<Table> {
        let info = self.info_get(Some(p4_name)).await?;
        let table_info = info.table_get(name)?;
        Ok(Table::new(self.core.clone(), p4_name.to_string(), table_info))
    }

    /// Cancels the stream reader and closes every notification queue.
    pub async fn close(&self) {
        self.core.cancel.cancel();
        let handle = self.core.reader.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
        self.core.shared.set_state(SessionState::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Bound.to_string(), "Bound");
        assert_eq!(SessionState::WarmInit.to_string(), "WarmInit");
    }

    #[test]
    fn test_shared_bind_and_kick() {
        let shared = SessionShared::new();
        shared.set_state(SessionState::Subscribed);
        shared.set_bound(Some("prog_a".to_string()));
        assert_eq!(shared.state(), SessionState::Bound);
        assert!(shared.clear_binding_if_bound());
        assert_eq!(shared.state(), SessionState::Subscribed);
        assert!(!shared.clear_binding_if_bound());
    }

    #[test]
    fn test_settle_after_warm_init() {
        let shared = SessionShared::new();
        shared.set_bound(Some("prog_a".to_string()));
        shared.set_state(SessionState::WarmInit);
        shared.settle_after_warm_init();
        assert_eq!(shared.state(), SessionState::Bound);

        shared.set_bound(None);
        shared.set_state(SessionState::WarmInit);
        shared.settle_after_warm_init();
        assert_eq!(shared.state(), SessionState::Subscribed);
    }

    #[test]
    fn test_warm_init_end_begins_nothing() {
        assert!(!PipelineAction::WarmInitEnd.begins_warm_init());
        assert!(!PipelineAction::Verify.begins_warm_init());
        assert!(PipelineAction::VerifyAndWarmInitBegin.begins_warm_init());
        assert!(PipelineAction::VerifyAndWarmInitBeginAndEnd.begins_warm_init());
    }

    #[test]
    fn test_pipeline_config_from_artifact_dir() {
        let dir = std::env::temp_dir().join(format!("bfrt-artifacts-{}", std::process::id()));
        let profile = dir.join("pipe0");
        std::fs::create_dir_all(&profile).unwrap();
        std::fs::write(dir.join("bf-rt.json"), b"{\"tables\":[]}").unwrap();
        std::fs::write(profile.join("context.json"), b"{}").unwrap();
        std::fs::write(profile.join("tofino.bin"), [0u8; 4]).unwrap();

        let config = PipelineConfig::from_artifact_dir(
            "prog",
            &dir,
            &[("pipe0".to_string(), vec![0, 1])],
        )
        .unwrap();
        assert_eq!(config.p4_name, "prog");
        assert_eq!(config.profiles.len(), 1);
        assert_eq!(config.profiles[0].pipe_scope, vec![0, 1]);
        assert_eq!(config.profiles[0].binary.len(), 4);

        std::fs::remove_dir_all(&dir).unwrap();

        // A missing artifact is a build-time error, before any RPC.
        assert!(PipelineConfig::from_artifact_dir("prog", &dir, &[]).is_err());
    }
}
