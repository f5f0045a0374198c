//! Per-cycle execution trace.
//!
//! When enabled, the engine appends one [`TraceEntry`] per `advance_cycle`.
//! The trace is append-only and hashes deterministically, so two runs with
//! the same seed can be compared by a single `u64`.

use crate::device::DeviceKind;
use crate::engine::CycleOutcome;
use crate::time::Cycle;

// ── Hash utility ──────────────────────────────────────────────────────

/// Combine two u64 hashes deterministically.
pub fn hash_combine(a: u64, b: u64) -> u64 {
    let mut h = a;
    h = h.wrapping_mul(0x517cc1b727220a95);
    h = h.wrapping_add(b);
    h ^= h >> 32;
    h
}

fn device_hash(kind: Option<DeviceKind>) -> u64 {
    match kind {
        None => 0,
        Some(DeviceKind::Keyboard) => 1,
        Some(DeviceKind::Printer) => 2,
        Some(DeviceKind::Disk) => 3,
        Some(DeviceKind::Custom(n)) => 0x100 | n as u64,
    }
}

// ── TraceEntry ────────────────────────────────────────────────────────

/// What happened on one cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    pub cycle: Cycle,
    pub outcome: CycleOutcome,
    /// Device being serviced (or just finished), if any.
    pub device: Option<DeviceKind>,
    pub program_counter: u64,
    pub progress: f64,
    /// Requests still queued after the cycle.
    pub pending: usize,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} PC={:04} Q={}] {}",
            self.cycle, self.program_counter, self.pending, self.outcome
        )?;
        if let Some(device) = self.device {
            write!(f, " {}", device)?;
        }
        Ok(())
    }
}

// ── Trace ─────────────────────────────────────────────────────────────

/// Append-only list of trace entries.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(transparent))]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Trace {
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic hash of every entry, in order.
    pub fn hash(&self) -> u64 {
        let mut h: u64 = 0;
        for entry in &self.entries {
            h = hash_combine(h, entry.cycle.count());
            h = hash_combine(h, entry.outcome as u64);
            h = hash_combine(h, device_hash(entry.device));
            h = hash_combine(h, entry.program_counter);
            h = hash_combine(h, entry.progress.to_bits());
            h = hash_combine(h, entry.pending as u64);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cycle: u64, outcome: CycleOutcome, device: Option<DeviceKind>) -> TraceEntry {
        TraceEntry {
            cycle: Cycle::new(cycle),
            outcome,
            device,
            program_counter: cycle,
            progress: cycle as f64,
            pending: 0,
        }
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        let a = entry(0, CycleOutcome::ProcessRunning, None);
        let b = entry(1, CycleOutcome::InterruptStarted, Some(DeviceKind::Disk));

        let mut t1 = Trace::new();
        t1.record(a.clone());
        t1.record(b.clone());

        let mut t2 = Trace::new();
        t2.record(b);
        t2.record(a);

        assert_ne!(t1.hash(), t2.hash());
        assert_eq!(t1.hash(), t1.clone().hash());
    }

    #[test]
    fn test_hash_sees_device() {
        let mut t1 = Trace::new();
        t1.record(entry(0, CycleOutcome::InterruptStarted, Some(DeviceKind::Disk)));
        let mut t2 = Trace::new();
        t2.record(entry(0, CycleOutcome::InterruptStarted, Some(DeviceKind::Printer)));
        assert_ne!(t1.hash(), t2.hash());
    }

    #[test]
    fn test_display() {
        let e = entry(3, CycleOutcome::InterruptStarted, Some(DeviceKind::Keyboard));
        assert_eq!(e.to_string(), "[T=3 PC=0003 Q=0] INTERRUPT_STARTED keyboard");
    }

    #[test]
    fn test_empty() {
        let t = Trace::new();
        assert!(t.is_empty());
        assert_eq!(t.hash(), 0);
    }
}
