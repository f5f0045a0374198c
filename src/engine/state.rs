//! Cycle outcomes, aggregate counters and read-only snapshots.

use crate::device::{DeviceKind, DeviceStats};
use crate::interrupt::InterruptRequest;
use crate::process::ProcessContext;
use crate::time::Cycle;

// ── CycleOutcome ──────────────────────────────────────────────────────

/// What the CPU did on one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CycleOutcome {
    /// A request was selected; the process was parked.
    InterruptStarted,
    /// The active request consumed a cycle and still needs more.
    InterruptHandling,
    /// The active request completed; the process was resumed.
    InterruptFinished,
    /// The process executed one unit.
    ProcessRunning,
    /// Nothing to service and the process is already finished.
    ProcessFinished,
}

impl CycleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            CycleOutcome::InterruptStarted => "INTERRUPT_STARTED",
            CycleOutcome::InterruptHandling => "INTERRUPT_HANDLING",
            CycleOutcome::InterruptFinished => "INTERRUPT_FINISHED",
            CycleOutcome::ProcessRunning => "PROCESS_RUNNING",
            CycleOutcome::ProcessFinished => "PROCESS_FINISHED",
        }
    }

    /// Whether the cycle was spent on interrupt work.
    pub fn is_interrupt(self) -> bool {
        matches!(
            self,
            CycleOutcome::InterruptStarted
                | CycleOutcome::InterruptHandling
                | CycleOutcome::InterruptFinished
        )
    }
}

impl std::fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── EngineStats ───────────────────────────────────────────────────────

/// Aggregate counters owned by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineStats {
    pub cycles_running_process: u64,
    pub cycles_servicing_interrupts: u64,
    pub total_interrupts_handled: u64,
    /// Started interrupts per device kind, in polling order.
    pub per_device: Vec<(DeviceKind, u64)>,
    /// Requests queued for a kind with no configured rank.
    pub unranked_requests: u64,
}

impl EngineStats {
    /// Counters with a zero entry for every kind in `kinds`.
    pub fn for_kinds(kinds: impl IntoIterator<Item = DeviceKind>) -> Self {
        EngineStats {
            per_device: kinds.into_iter().map(|k| (k, 0)).collect(),
            ..Default::default()
        }
    }

    /// Interrupts started for `kind`.
    pub fn handled_for(&self, kind: DeviceKind) -> u64 {
        self.per_device
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    pub(crate) fn record_started(&mut self, kind: DeviceKind) {
        self.total_interrupts_handled += 1;
        match self.per_device.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n += 1,
            None => self.per_device.push((kind, 1)),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────

/// Read-only view of the engine between cycles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Snapshot {
    pub cycle: Cycle,
    pub total_cycles: u64,
    pub seed: u64,
    pub process: ProcessContext,
    pub active_interrupt: Option<InterruptRequest>,
    pub remaining_service: u32,
    pub pending_queue_length: usize,
    pub stats: EngineStats,
    pub devices: Vec<DeviceStats>,
}

// ── RunSummary ────────────────────────────────────────────────────────

/// Why a run loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "snake_case"))]
pub enum RunEnd {
    ProcessFinished,
    BudgetExhausted,
}

/// Result of [`Engine::run`](super::Engine::run).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct RunSummary {
    /// Cycles executed by the loop.
    pub cycles_executed: u64,
    pub ended_by: RunEnd,
    pub final_state: Snapshot,
}
