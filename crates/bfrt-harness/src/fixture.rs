//! Test lifecycle: connect, track, tear down.
//!
//! A fixture owns one client session and the cleanup obligation: every entry
//! a test adds is tracked and deleted in teardown, in reverse order. Teardown
//! also drains the session's error queue; an unconsumed stream error fails
//! the test unless the scenario consumed it explicitly.

use std::sync::Arc;

use anyhow::{bail, Context};
use parking_lot::Mutex;
use tracing::{debug, warn};

use bfrt_client::{ClientInterface, ClientOptions, Key, Table, Target};

use crate::context::TestContext;

/// Installs the process-wide trace subscriber; safe to call repeatedly.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct TrackedEntry {
    table_name: String,
    target: Target,
    key: Key,
}

/// One test's session plus its cleanup ledger.
pub struct TestFixture {
    ctx: Arc<TestContext>,
    client: ClientInterface,
    tracked: Mutex<Vec<TrackedEntry>>,
}

impl TestFixture {
    /// Connects a client using the context's parameters.
    pub async fn create(ctx: Arc<TestContext>, client_id: u32) -> anyhow::Result<Self> {
        init_logging();
        let params = ctx.params();
        let options = ClientOptions::new(params.grpc_addr.clone(), client_id, params.device_id);
        let client = ClientInterface::connect(options)
            .await
            .context("connecting to the runtime")?;
        Ok(Self {
            ctx,
            client,
            tracked: Mutex::new(Vec::new()),
        })
    }

    pub fn ctx(&self) -> &TestContext {
        &self.ctx
    }

    pub fn client(&self) -> &ClientInterface {
        &self.client
    }

    /// Resolves a table on the bound program.
    pub async fn table(&self, name: &str) -> anyhow::Result<Table> {
        Ok(self.client.table(name).await?)
    }

    /// Records an added entry for teardown deletion.
    pub fn track_entry(&self, table: &Table, target: Target, key: Key) {
        self.tracked.lock().push(TrackedEntry {
            table_name: table.name().to_string(),
            target,
            key,
        });
    }

    /// Forgets tracked entries, e.g. after the test deleted them itself.
    pub fn untrack_all(&self) {
        self.tracked.lock().clear();
    }

    /// Deletes tracked entries, asserts the error queue is empty, and closes
    /// the session. Cleanup failures are logged, not raised; they are
    /// subsumed by whatever made cleanup necessary.
    pub async fn teardown(self) -> anyhow::Result<()> {
        let tracked: Vec<TrackedEntry> = {
            let mut guard = self.tracked.lock();
            guard.drain(..).rev().collect()
        };
        for entry in tracked {
            match self.client.table(&entry.table_name).await {
                Ok(table) => {
                    if let Err(e) = table.entry_del(entry.target, Some(&[entry.key])).await {
                        debug!(table = %entry.table_name, "cleanup delete failed: {e}");
                    }
                }
                Err(e) => warn!(table = %entry.table_name, "cleanup lookup failed: {e}"),
            }
        }

        let errors = self.client.notifications().drain_errors().await;
        self.client.close().await;
        if !errors.is_empty() {
            let rendered: Vec<String> = errors
                .iter()
                .map(|e| format!("{:?}: {}", e.code, e.message))
                .collect();
            bail!(
                "seed {}: {} unconsumed stream errors at teardown: {}",
                self.ctx.seed(),
                errors.len(),
                rendered.join("; ")
            );
        }
        Ok(())
    }
}
