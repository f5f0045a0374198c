//! Structured error types for the interrupt simulator.
//!
//! Construction-time problems (bad cycle budget, bad device table) are
//! returned as `Err(SimError)` before the engine ever runs. Invalid
//! process transitions are not errors at all: they are reported through
//! `bool`/`Option` results on `ProcessContext`.

use thiserror::Error;

use crate::device::DeviceKind;

/// Convenience alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// The top-level error type for the simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    // ── Configuration errors ──────────────────────────────

    /// The cycle budget must be a positive integer.
    #[error("cycle budget must be positive, got {0}")]
    InvalidCycleBudget(u64),

    /// A device's service range has `min > max`.
    #[error("device {kind} has an inverted service range {min}..={max}")]
    InvertedServiceRange { kind: DeviceKind, min: u32, max: u32 },

    /// A device's service range allows a zero-length service.
    #[error("device {kind} has a zero minimum service duration")]
    ZeroServiceDuration { kind: DeviceKind },

    /// A generation probability outside `[0, 1]` (or NaN).
    #[error("device {kind} has generation probability {probability} outside [0, 1]")]
    InvalidProbability { kind: DeviceKind, probability: f64 },

    /// Two devices of the same kind were registered.
    #[error("device {0} is registered more than once")]
    DuplicateDevice(DeviceKind),

    // ── Scheduling warnings ───────────────────────────────

    /// A request was enqueued for a kind with no configured rank.
    /// The request is still queued at rank 0.
    #[error("device kind {0} has no configured priority; treated as lowest")]
    UnknownDeviceKind(DeviceKind),

    // ── Facade errors ─────────────────────────────────────

    /// Attempted to step a simulation whose run loop already ended.
    #[error("simulation has already finished")]
    SimulationFinished,

    /// A snapshot could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_cycle_budget() {
        let e = SimError::InvalidCycleBudget(0);
        assert_eq!(e.to_string(), "cycle budget must be positive, got 0");
    }

    #[test]
    fn test_error_display_inverted_range() {
        let e = SimError::InvertedServiceRange {
            kind: DeviceKind::Disk,
            min: 12,
            max: 5,
        };
        let s = e.to_string();
        assert!(s.contains("disk"));
        assert!(s.contains("12..=5"));
    }

    #[test]
    fn test_error_display_unknown_kind() {
        let e = SimError::UnknownDeviceKind(DeviceKind::Custom(7));
        assert!(e.to_string().contains("custom-7"));
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(SimError::SimulationFinished);
        assert!(!e.to_string().is_empty());
    }
}
