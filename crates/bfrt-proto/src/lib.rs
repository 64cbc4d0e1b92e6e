//! Committed protobuf/gRPC bindings for the BfRuntime control service.
//!
//! The message set mirrors the device's wire schema: length-tagged field-id
//! collections for table keys and data, a unary `Write`/`SetForwardingPipelineConfig`
//! surface, a server-streaming `Read`, and the bidirectional `StreamChannel`
//! carrying subscriptions and server-pushed notifications.
//!
//! The bindings are committed to the tree (prost/tonic output style) so the
//! build does not depend on `protoc` being available.

pub mod bfrt;

pub use bfrt::bf_runtime_client::BfRuntimeClient;
pub use bfrt::bf_runtime_server::{BfRuntime, BfRuntimeServer};
