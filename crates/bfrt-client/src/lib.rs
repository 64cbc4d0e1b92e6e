//! BfRuntime gRPC client core.
//!
//! The building blocks a conformance test composes:
//!
//! - [`session::ClientInterface`] — one connection per client: subscribe
//!   handshake, program binding, pipeline-config pushes
//! - [`schema`] — per-program schema cache, tables resolved by name
//! - [`key`] / [`data`] — per-table Key and Data builders over tagged tuples
//! - [`table::Table`] — the operations façade: add/mod/del/get, default
//!   entries, attributes, batched writes with atomicity modes
//! - [`notify`] — typed notification queues fed by the stream reader
//! - [`pre`] / [`mirror`] / [`pktgen`] — wrappers over the reserved tables
//!
//! A test constructs a [`target::Target`], obtains a table handle from the
//! session, builds keys and data, and issues operations; failures surface as
//! [`error::BfrtError`] carrying the device's canonical code and, for
//! batches, one status per failing sub-operation.

pub mod codec;
pub mod data;
pub mod error;
pub mod key;
pub mod mirror;
pub mod notify;
pub mod pktgen;
pub mod pre;
pub mod schema;
pub mod session;
pub mod table;
pub mod target;

pub use data::{Data, DataTuple, DataValue};
pub use error::{BfrtError, Result, SubError};
pub use key::{Key, KeyTuple, MATCH_PRIORITY};
pub use notify::{
    IdleNotification, NotificationQueues, PortStatusNotification, RpcErrorNotification,
    WarmInitStatus,
};
pub use session::{
    ClientInterface, ClientOptions, PipelineAction, PipelineConfig, PipelineProfile, SessionState,
};
pub use table::{
    Atomicity, AttributeKind, AttributeValue, EntryScopeMode, IdleTableMode, IdleTimeAttribute,
    ModIncMode, PreDeviceConfig, Table, TableOperationKind, ENTRY_HIT_STATE, ENTRY_TTL,
};
pub use target::{Direction, Target, PIPE_ALL};
