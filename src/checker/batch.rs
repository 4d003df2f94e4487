// src/checker/batch.rs
// =============================================================================
// Runs a probe for every target, either one after another or all at once.
//
// Two modes:
// - Sequential: targets are probed in the order given. Each outcome is
//   handed to the caller as soon as it is ready, so output streams.
// - Concurrent: one tokio task per target, all started immediately.
//   Outcomes are handed over in the order the tasks finish.
//
// Isolation:
// - probe() itself never returns an error, but a bug (a panic) could still
//   happen inside it. A panic is caught and turned into an offline outcome
//   for that target only; the other targets carry on.
// - In concurrent mode we wait for ALL tasks. A failing task never cancels
//   its siblings.
//
// Rust concepts:
// - Arc: Shared ownership of the transport across spawned tasks
// - FuturesUnordered: A set of futures that yields results as they complete
// - catch_unwind: Turns a panic inside a future into a Result
// =============================================================================

use crate::checker::probe::{probe, ProbeOutcome, Transport};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt; // catch_unwind()
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// How the batch is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    #[default]
    Sequential,
    Concurrent,
}

impl CheckMode {
    pub fn from_async_flag(asynchronous: bool) -> Self {
        if asynchronous {
            CheckMode::Concurrent
        } else {
            CheckMode::Sequential
        }
    }
}

// Probes a list of targets with a shared transport and timeout
#[derive(Clone)]
pub struct BatchRunner {
    transport: Arc<dyn Transport>,
    timeout: Duration,
}

impl BatchRunner {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    // Probes every target and returns one outcome per target
    //
    // `on_outcome` is called once per target, as soon as that target is done.
    // The returned Vec holds the outcomes in the same order they were emitted.
    pub async fn run<F>(
        &self,
        targets: Vec<String>,
        mode: CheckMode,
        on_outcome: F,
    ) -> Vec<ProbeOutcome>
    where
        F: FnMut(&ProbeOutcome),
    {
        info!(targets = targets.len(), ?mode, timeout = ?self.timeout, "starting batch");

        let outcomes = match mode {
            CheckMode::Sequential => self.run_sequential(targets, on_outcome).await,
            CheckMode::Concurrent => self.run_concurrent(targets, on_outcome).await,
        };

        let online = outcomes.iter().filter(|o| o.reachable).count();
        info!(online, offline = outcomes.len() - online, "batch complete");

        outcomes
    }

    async fn run_sequential<F>(&self, targets: Vec<String>, mut on_outcome: F) -> Vec<ProbeOutcome>
    where
        F: FnMut(&ProbeOutcome),
    {
        let mut outcomes = Vec::with_capacity(targets.len());

        for target in targets {
            let guarded = AssertUnwindSafe(probe(&target, self.timeout, self.transport.as_ref()));
            let outcome = match guarded.catch_unwind().await {
                Ok(outcome) => outcome,
                Err(panic) => panicked_outcome(&target, panic_message(panic.as_ref())),
            };

            log_outcome(&outcome);
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    async fn run_concurrent<F>(&self, targets: Vec<String>, mut on_outcome: F) -> Vec<ProbeOutcome>
    where
        F: FnMut(&ProbeOutcome),
    {
        // Start every task before waiting on any of them
        let mut tasks: FuturesUnordered<_> = targets
            .into_iter()
            .map(|target| {
                let transport = Arc::clone(&self.transport);
                let timeout = self.timeout;
                let task_target = target.clone();
                let handle = tokio::spawn(async move {
                    probe(&task_target, timeout, transport.as_ref()).await
                });

                async move { (target, handle.await) }
            })
            .collect();

        let mut outcomes = Vec::with_capacity(tasks.len());

        // Drain the set: this only finishes once every task has finished
        while let Some((target, joined)) = tasks.next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => {
                    panicked_outcome(&target, panic_message(e.into_panic().as_ref()))
                }
                Err(e) => panicked_outcome(&target, e.to_string()),
            };

            log_outcome(&outcome);
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }
}

fn log_outcome(outcome: &ProbeOutcome) {
    match &outcome.failure_reason {
        None => info!(probe_target = %outcome.target, "online"),
        Some(reason) => debug!(probe_target = %outcome.target, %reason, "offline"),
    }
}

fn panicked_outcome(target: &str, message: String) -> ProbeOutcome {
    warn!(probe_target = target, %message, "probe panicked");
    ProbeOutcome::offline(target, format!("probe failed unexpectedly: {}", message))
}

// Panics carry either a &str or a String payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why spawn a task per target instead of just awaiting futures together?
//    - tokio::spawn runs each probe on the runtime's worker threads
//    - A panic inside a spawned task is captured in its JoinHandle as a
//      JoinError; it does not take down the other tasks
//
// 2. Why FuturesUnordered?
//    - It yields each (target, result) pair as soon as that task finishes
//    - No shared Vec behind a Mutex is needed: only this loop pushes results
//
// 3. Why AssertUnwindSafe?
//    - catch_unwind() requires the future to be UnwindSafe
//    - After a panic we never look at the probe's state again, we only
//      build a fresh outcome, so asserting it is fine
// -----------------------------------------------------------------------------
