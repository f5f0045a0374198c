//! `DeviceSource` trait and per-device statistics.

use crate::interrupt::InterruptRequest;
use crate::time::Cycle;

use super::kind::{DeviceKind, Priority};

// ── DeviceStats ───────────────────────────────────────────────────────

/// Diagnostic counters for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct DeviceStats {
    pub kind: DeviceKind,
    pub priority_label: &'static str,
    /// Requests raised over the whole run.
    pub total_generated: u64,
    /// Requests raised but not yet reported as serviced.
    pub pending: u64,
}

/// Counter pair shared by the built-in sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counters {
    pub(crate) total_generated: u64,
    pub(crate) pending: u64,
}

impl Counters {
    pub(crate) fn generated(&mut self) {
        self.total_generated += 1;
        self.pending += 1;
    }

    pub(crate) fn serviced(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub(crate) fn stats(self, kind: DeviceKind) -> DeviceStats {
        DeviceStats {
            kind,
            priority_label: kind.priority_label(),
            total_generated: self.total_generated,
            pending: self.pending,
        }
    }
}

// ── DeviceSource ──────────────────────────────────────────────────────

/// A producer of interrupt requests, polled once per idle cycle.
///
/// # Contract
///
/// Implementations **must**:
/// - Yield at most one request per call to `try_generate`.
/// - Be deterministic for a fixed seed and call sequence.
/// - Never reach into the scheduler or the process; they only return
///   requests for the engine to queue.
pub trait DeviceSource: std::fmt::Debug {
    /// The kind stamped on every request this source raises.
    fn kind(&self) -> DeviceKind;

    /// Rank to register for this kind, if any.
    fn priority(&self) -> Option<Priority> {
        self.kind().reference_priority()
    }

    /// Possibly raise a request at cycle `now`.
    fn try_generate(&mut self, now: Cycle) -> Option<InterruptRequest>;

    /// Called by the engine when one of this source's requests completes.
    fn on_serviced(&mut self);

    /// Current diagnostic counters.
    fn stats(&self) -> DeviceStats;
}
