//! Decaying-energy layout simulation.
//!
//! `Init → Running → {Converged | Cancelled}`. Each tick runs the collision
//! resolver for up to `iterations_per_tick` passes and then multiplies the
//! energy by `1 - decay_rate`. The run converges once energy drops below
//! `convergence_epsilon` or `max_ticks` ticks have run, whichever comes first.
//! Energy does not scale corrections; it only paces the run.
//!
//! Node positions are private while the run is live. They become readable
//! once the simulation reaches a terminal phase.

#[cfg(test)]
#[path = "simulation_test.rs"]
mod simulation_test;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::collide::{CollisionResolver, OverlapStats};
use crate::config::LayoutConfig;
use crate::node::{Node, NodeArena};

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Seeded, no tick run yet.
    Init,
    Running,
    /// Terminal: finished normally (check [`LayoutStatus`] for overlap).
    Converged,
    /// Terminal: stopped from outside.
    Cancelled,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Converged | Self::Cancelled)
    }
}

/// Why a converged run stopped ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EnergyDecayed,
    TickLimit,
}

/// Whether the final layout is overlap-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStatus {
    /// No padded pair overlaps.
    Converged,
    /// Best-effort positions; some pairs still overlap.
    BudgetExhausted,
}

/// Facts about a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutSummary {
    pub status: LayoutStatus,
    pub stop_reason: StopReason,
    pub ticks: u32,
    pub energy: f64,
    pub overlap: OverlapStats,
}

impl LayoutSummary {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.status == LayoutStatus::Converged
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// 1-based tick index.
    pub tick: u32,
    /// Energy after this tick's decay.
    pub energy: f64,
    pub passes: u32,
    /// Overlaps found by the last pass of the tick.
    pub overlaps: usize,
    pub phase: Phase,
}

/// One layout run over an owned node arena.
#[derive(Debug)]
pub struct Simulation {
    arena: NodeArena,
    resolver: CollisionResolver,
    config: LayoutConfig,
    energy: f64,
    ticks: u32,
    phase: Phase,
    summary: Option<LayoutSummary>,
}

impl Simulation {
    /// Take ownership of a seeded arena. Energy starts at 1.
    ///
    /// Fields that fail [`LayoutConfig::validate`] run with their defaults.
    #[must_use]
    pub fn new(arena: NodeArena, config: LayoutConfig) -> Self {
        let sanitized = config.sanitized();
        if sanitized != config {
            warn!(?config, ?sanitized, "invalid layout config replaced with defaults");
        }
        let config = sanitized;
        Self {
            arena,
            resolver: CollisionResolver::new(config.strength),
            config,
            energy: 1.0,
            ticks: 0,
            phase: Phase::Init,
            summary: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    #[must_use]
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Final summary, once converged.
    #[must_use]
    pub fn summary(&self) -> Option<LayoutSummary> {
        self.summary
    }

    /// Node positions, only once the run is terminal.
    #[must_use]
    pub fn nodes(&self) -> Option<&[Node]> {
        self.phase.is_terminal().then(|| self.arena.nodes())
    }

    /// Advance one tick. Returns `None` once the run is terminal.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.phase.is_terminal() {
            return None;
        }
        self.phase = Phase::Running;

        let batch = self
            .resolver
            .resolve(self.arena.nodes_mut(), self.config.iterations_per_tick);
        self.energy = (self.energy * (1.0 - self.config.decay_rate)).clamp(0.0, 1.0);
        self.ticks += 1;

        let stop = if self.energy < self.config.convergence_epsilon {
            Some(StopReason::EnergyDecayed)
        } else if self.ticks >= self.config.max_ticks {
            Some(StopReason::TickLimit)
        } else {
            None
        };

        trace!(
            tick = self.ticks,
            energy = self.energy,
            passes = batch.passes,
            overlaps = batch.last_overlaps,
            "layout tick"
        );

        if let Some(reason) = stop {
            self.converge(reason);
        }

        Some(TickReport {
            tick: self.ticks,
            energy: self.energy,
            passes: batch.passes,
            overlaps: batch.last_overlaps,
            phase: self.phase,
        })
    }

    /// Stop the run. No-op once terminal.
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            debug!(ticks = self.ticks, "layout simulation cancelled");
            self.phase = Phase::Cancelled;
        }
    }

    /// Tick until terminal; bounded by `max_ticks`.
    pub fn run(&mut self) -> Option<LayoutSummary> {
        while self.tick().is_some() {}
        self.summary
    }

    /// Give up the arena once converged.
    #[must_use]
    pub fn into_result(self) -> Option<(NodeArena, LayoutSummary)> {
        match (self.phase, self.summary) {
            (Phase::Converged, Some(summary)) => Some((self.arena, summary)),
            _ => None,
        }
    }

    fn converge(&mut self, stop_reason: StopReason) {
        let overlap = self.resolver.measure(self.arena.nodes());
        let status = if overlap.pairs == 0 { LayoutStatus::Converged } else { LayoutStatus::BudgetExhausted };
        let summary = LayoutSummary { status, stop_reason, ticks: self.ticks, energy: self.energy, overlap };
        self.phase = Phase::Converged;
        self.summary = Some(summary);

        if status == LayoutStatus::BudgetExhausted {
            warn!(
                ticks = self.ticks,
                overlapping_pairs = overlap.pairs,
                overlap_area = overlap.area,
                "layout budget exhausted with overlaps remaining"
            );
        } else {
            debug!(ticks = self.ticks, energy = self.energy, ?stop_reason, "layout converged");
        }
    }
}
