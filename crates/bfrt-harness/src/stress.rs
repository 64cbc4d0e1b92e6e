//! Multi-client stress scaffolding.
//!
//! A [`Supervisor`] owns worker tasks and a shared error sink. Workers run
//! until done or until the stop token fires; `stop_and_join` cancels, joins
//! every worker, and re-raises the first error collected. The loop builders
//! encode the liveness rules long-running scenarios rely on: binds retry on
//! `Unavailable` and break on `AlreadyExists`, readers tolerate a locked
//! device, and the reconfigurer requires every push to reach
//! `WARM_INIT_FINISHED`.

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bfrt_client::{
    BfrtError, ClientInterface, PipelineAction, PipelineConfig, WarmInitStatus,
};

/// Supervises a set of worker tasks with one shared error sink.
pub struct Supervisor {
    cancel: CancellationToken,
    workers: Vec<(String, JoinHandle<()>)>,
    errors_tx: mpsc::UnboundedSender<(String, anyhow::Error)>,
    errors_rx: mpsc::UnboundedReceiver<(String, anyhow::Error)>,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        Self {
            cancel: CancellationToken::new(),
            workers: Vec::new(),
            errors_tx,
            errors_rx,
        }
    }

    /// Token workers watch to stop cleanly.
    pub fn stop_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawns a named worker; an `Err` return lands in the error sink.
    pub fn spawn<F>(&mut self, name: impl Into<String>, fut: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let name = name.into();
        let errors = self.errors_tx.clone();
        let worker_name = name.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = fut.await {
                warn!(worker = %worker_name, "worker failed: {e:#}");
                let _ = errors.send((worker_name, e));
            }
        });
        self.workers.push((name, handle));
    }

    /// Signals stop, joins every worker, and re-raises the first error.
    pub async fn stop_and_join(mut self) -> anyhow::Result<()> {
        self.cancel.cancel();
        for (name, handle) in self.workers.drain(..) {
            handle
                .await
                .with_context(|| format!("worker {name} panicked"))?;
        }
        drop(self.errors_tx);
        if let Ok((name, error)) = self.errors_rx.try_recv() {
            return Err(anyhow!("worker {name} failed: {error:#}"));
        }
        Ok(())
    }
}

/// Binds with the standard liveness rules: retry on `Unavailable` while the
/// device is locked, treat `AlreadyExists` as success.
///
/// Returns `false` when the stop token fired before the bind landed.
pub async fn bind_with_retry(
    client: &ClientInterface,
    p4_name: &str,
    cancel: &CancellationToken,
) -> anyhow::Result<bool> {
    loop {
        if cancel.is_cancelled() {
            return Ok(false);
        }
        match client.bind_pipeline_config(p4_name).await {
            Ok(()) => return Ok(true),
            Err(BfrtError::AlreadyExists(_)) => return Ok(true),
            Err(e) if e.is_retryable_bind() => {
                debug!(p4 = p4_name, "bind unavailable, retrying");
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Reader loop: periodically fetch the loaded configs, tolerating a locked
/// device. Returns the number of successful fetches.
pub async fn schema_reader_loop(
    client: &ClientInterface,
    period: Duration,
    cancel: &CancellationToken,
) -> anyhow::Result<u64> {
    let mut fetched = 0u64;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(fetched),
            _ = tokio::time::sleep(period) => {}
        }
        match client.pipeline_config_get().await {
            Ok(configs) => {
                fetched += 1;
                debug!(programs = configs.len(), "schema fetch ok");
            }
            Err(BfrtError::Unavailable(_)) => {
                debug!("schema fetch skipped, device locked");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Reconfigurer loop: push the same config `cycles` times with
/// `VERIFY_AND_WARM_INIT_BEGIN_AND_END`, requiring `WARM_INIT_FINISHED` after
/// every push.
pub async fn reconfigurer_loop(
    client: &ClientInterface,
    base_path: &str,
    configs: &[PipelineConfig],
    cycles: u32,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    for cycle in 0..cycles {
        if cancel.is_cancelled() {
            return Ok(());
        }
        loop {
            match client
                .pipeline_config_set(
                    PipelineAction::VerifyAndWarmInitBeginAndEnd,
                    base_path,
                    configs,
                )
                .await
            {
                Ok(()) => break,
                Err(BfrtError::Unavailable(_)) => {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
        client
            .notifications()
            .wait_warm_init(WarmInitStatus::Finished, Duration::from_secs(10))
            .await
            .with_context(|| format!("cycle {cycle}: no WARM_INIT_FINISHED observed"))?;
        info!(cycle, "warm init cycle finished");
    }
    Ok(())
}
