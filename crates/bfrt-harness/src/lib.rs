//! Test base for BfRuntime conformance suites.
//!
//! Provides what a scenario needs around the client core:
//!
//! - [`params`] — command-line test parameters (arch, pipes, seed, paths)
//! - [`context`] — the explicit per-run context: seeded RNG and port list
//! - [`ports`] / [`packet`] — pipe/port math and minimal test frames
//! - [`fixture`] — session lifecycle with the cleanup obligation
//! - [`specs`] — typed counter/meter/LPF/WRED specs with tolerance checks
//! - [`stress`] — the multi-client supervisor and liveness loops
//! - [`mock`] — an in-process BfRuntime for hermetic runs

pub mod context;
pub mod fixture;
pub mod mock;
pub mod packet;
pub mod params;
pub mod ports;
pub mod specs;
pub mod stress;

pub use context::TestContext;
pub use fixture::{init_logging, TestFixture};
pub use mock::MockRuntime;
pub use params::{TestParams, TargetKind};
pub use specs::{CounterSpec, LpfSpec, MeterSpec, WredSpec};
pub use stress::Supervisor;
