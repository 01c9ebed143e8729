use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::compare::{self, Difference, Image, PixelDistance};
use crate::config::ResolvedRunConfig;

/// Terminal state of a run.
#[derive(Debug)]
pub enum Outcome {
    Completed(Difference),
    /// The deadline passed first; any partial result was discarded.
    TimedOut(Duration),
    /// Decoding, dimension check, or the scan itself failed.
    Failed(anyhow::Error),
}

/// Single-shot outcome slot shared by the racing tasks.
///
/// The first `complete` wins. Later calls are no-ops and return `false`.
#[derive(Clone)]
pub struct OutcomeSlot {
    tx: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl OutcomeSlot {
    pub fn new() -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let slot = Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        };
        (slot, rx)
    }

    pub fn complete(&self, outcome: Outcome) -> bool {
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match sender {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }
}

/// Wait, then decode and compare both images under the configured deadline.
///
/// The deadline starts once the wait is over, so decoding counts against it.
pub async fn run(config: ResolvedRunConfig) -> Outcome {
    if !config.wait.is_zero() {
        info!(wait = ?config.wait, "waiting before reading images");
        tokio::time::sleep(config.wait).await;
    }

    let timeout = config.timeout;
    race(timeout, move || compare_files(&config)).await
}

/// Run `work` on a blocking thread and race it against `timeout`.
///
/// A zero timeout means no deadline; no timer is started at all. The work is
/// not interrupted when the timer wins, its result is simply dropped. A worker
/// that panics is reported as a failure right away, deadline or not.
pub async fn race<F>(timeout: Duration, work: F) -> Outcome
where
    F: FnOnce() -> Result<Difference> + Send + 'static,
{
    let (slot, mut rx) = OutcomeSlot::new();

    let timer = (!timeout.is_zero()).then(|| {
        let slot = slot.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if slot.complete(Outcome::TimedOut(timeout)) {
                debug!(?timeout, "deadline reached first");
            }
        })
    });

    let worker_slot = slot.clone();
    let mut worker = tokio::task::spawn_blocking(move || {
        let outcome = match work() {
            Ok(diff) => Outcome::Completed(diff),
            Err(e) => Outcome::Failed(e),
        };
        if !worker_slot.complete(outcome) {
            debug!("late comparison result discarded");
        }
    });

    let first = tokio::select! {
        received = &mut rx => First::Slot(received),
        joined = &mut worker => First::Worker(joined),
    };
    let received = match first {
        First::Slot(received) => received,
        First::Worker(joined) => {
            // A worker that returned has already filled the slot or lost to
            // the timer. One that panicked never will.
            if let Err(e) = joined {
                slot.complete(Outcome::Failed(anyhow!("comparison task failed: {e}")));
            }
            rx.await
        }
    };
    let outcome = received
        .unwrap_or_else(|_| Outcome::Failed(anyhow!("comparison task ended without a result")));

    if let Some(timer) = timer {
        timer.abort();
    }
    outcome
}

/// Whichever of the slot and the worker handle resolved first.
enum First {
    Slot(Result<Outcome, oneshot::error::RecvError>),
    Worker(Result<(), tokio::task::JoinError>),
}

/// Decode both images and compute their difference.
pub fn compare_files(config: &ResolvedRunConfig) -> Result<Difference> {
    let base = Image::open(&config.base)?;
    let reference = Image::open(&config.reference)?;

    debug!(
        colors = %config.colors,
        workers = config.parallel,
        width = base.width(),
        height = base.height(),
        "comparing"
    );
    let metric = PixelDistance::new(config.colors, config.score.normalization);
    let diff = compare::compare(&base, &reference, &metric, &config.score, config.parallel)?;
    Ok(diff)
}
