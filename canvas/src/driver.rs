//! Cooperative layout driver.
//!
//! The driver owns at most one live [`Simulation`] and advances it one tick per
//! [`LayoutDriver::tick`] call, so the host decides the pacing (one tick per
//! animation frame, or a tight loop). Results are delivered through a
//! [`LayoutHandle`], a oneshot future that resolves exactly once with either the
//! finished snapshot or [`LayoutOutcome::Cancelled`].
//!
//! Starting a new run cancels the previous one. A cancelled run never publishes
//! positions, even if its last tick had already begun when cancellation was
//! requested.

#[cfg(test)]
#[path = "driver_test.rs"]
mod driver_test;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::channel::oneshot;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LayoutConfig;
use crate::node::{NodeArena, PlacedTile, Seed, TileSpec};
use crate::simulation::{LayoutSummary, Phase, Simulation};

/// Shared cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Final positions of one run, with the caller's payloads in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot<P = serde_json::Value> {
    pub run_id: u64,
    pub tiles: Vec<PlacedTile<P>>,
    pub summary: LayoutSummary,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutOutcome<P = serde_json::Value> {
    Completed(LayoutSnapshot<P>),
    Cancelled,
}

impl<P> LayoutOutcome<P> {
    #[must_use]
    pub fn into_snapshot(self) -> Option<LayoutSnapshot<P>> {
        match self {
            Self::Completed(snapshot) => Some(snapshot),
            Self::Cancelled => None,
        }
    }
}

/// Receiving side of one run.
///
/// Await it, or poll with [`LayoutHandle::try_outcome`] from a frame loop.
#[derive(Debug)]
pub struct LayoutHandle<P = serde_json::Value> {
    run_id: u64,
    token: CancelToken,
    rx: oneshot::Receiver<LayoutOutcome<P>>,
    delivered: bool,
}

impl<P> LayoutHandle<P> {
    #[must_use]
    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Request cancellation. Takes effect at the driver's next tick.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Non-blocking poll. Returns the outcome once, then `None`.
    pub fn try_outcome(&mut self) -> Option<LayoutOutcome<P>> {
        if self.delivered {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return None,
            Err(oneshot::Canceled) => LayoutOutcome::Cancelled,
        };
        self.delivered = true;
        Some(outcome)
    }
}

impl<P> Future for LayoutHandle<P> {
    type Output = LayoutOutcome<P>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.rx).poll(cx).map(|received| {
            this.delivered = true;
            received.unwrap_or(LayoutOutcome::Cancelled)
        })
    }
}

struct Run<P> {
    id: u64,
    sim: Simulation,
    payloads: Vec<P>,
    token: CancelToken,
    tx: oneshot::Sender<LayoutOutcome<P>>,
}

fn deliver<P>(run_id: u64, tx: oneshot::Sender<LayoutOutcome<P>>, outcome: LayoutOutcome<P>) {
    if tx.send(outcome).is_err() {
        debug!(run_id, "layout handle dropped before delivery");
    }
}

/// Drives one layout run at a time.
pub struct LayoutDriver<P = serde_json::Value> {
    config: LayoutConfig,
    current: Option<Run<P>>,
    next_id: u64,
}

impl<P> LayoutDriver<P> {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config, current: None, next_id: 1 }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Applies to runs started after this call.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// Phase of the live run, or `None` when idle.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.current.as_ref().map(|run| run.sim.phase())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Seed a new run from `tiles`, cancelling any run in flight.
    pub fn start(&mut self, tiles: Vec<TileSpec<P>>, seed: &Seed) -> LayoutHandle<P> {
        self.cancel();

        let (sizes, payloads): (Vec<_>, Vec<_>) =
            tiles.into_iter().map(|tile| (tile.size(), tile.payload)).unzip();
        let arena = NodeArena::new(sizes, self.config.padding, seed);
        if arena.clamped_count() > 0 {
            warn!(clamped = arena.clamped_count(), "malformed tile sizes clamped to minimum");
        }

        let id = self.next_id;
        self.next_id += 1;
        info!(run_id = id, tiles = arena.len(), "layout started");

        let token = CancelToken::new();
        let (tx, rx) = oneshot::channel();
        self.current = Some(Run { id, sim: Simulation::new(arena, self.config), payloads, token: token.clone(), tx });
        LayoutHandle { run_id: id, token, rx, delivered: false }
    }

    /// Cancel the live run, if any. Its handle resolves to `Cancelled`.
    pub fn cancel(&mut self) {
        if let Some(mut run) = self.current.take() {
            run.sim.cancel();
            info!(run_id = run.id, ticks = run.sim.ticks(), "layout cancelled");
            deliver(run.id, run.tx, LayoutOutcome::Cancelled);
        }
    }

    /// Advance the live run by one tick.
    ///
    /// Returns the run's phase after the tick, or `None` when idle. Terminal
    /// phases are reported once; the driver is idle afterwards.
    pub fn tick(&mut self) -> Option<Phase> {
        let run = self.current.as_mut()?;
        if run.token.is_cancelled() {
            self.cancel();
            return Some(Phase::Cancelled);
        }

        run.sim.tick();

        // Cancellation may have been requested while the tick ran.
        if run.token.is_cancelled() {
            self.cancel();
            return Some(Phase::Cancelled);
        }
        if !run.sim.phase().is_terminal() {
            return Some(run.sim.phase());
        }

        let run = self.current.take()?;
        Some(Self::finish(run))
    }

    /// Tick until the live run ends. Bounded by `max_ticks`.
    pub fn run_to_completion(&mut self) -> Option<Phase> {
        let mut last = None;
        while let Some(phase) = self.tick() {
            last = Some(phase);
            if phase.is_terminal() {
                break;
            }
        }
        last
    }

    fn finish(run: Run<P>) -> Phase {
        let Run { id, sim, payloads, tx, .. } = run;
        let Some((arena, summary)) = sim.into_result() else {
            deliver(id, tx, LayoutOutcome::Cancelled);
            return Phase::Cancelled;
        };
        info!(
            run_id = id,
            ticks = summary.ticks,
            status = ?summary.status,
            overlapping_pairs = summary.overlap.pairs,
            "layout finished"
        );
        let tiles = arena.place(payloads);
        deliver(id, tx, LayoutOutcome::Completed(LayoutSnapshot { run_id: id, tiles, summary }));
        Phase::Converged
    }
}

impl<P> Default for LayoutDriver<P> {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
