//! Interrupt requests raised by simulated devices.
//!
//! A request is created once by a device source, queued in the priority
//! scheduler, serviced by the engine, and then retired into the engine's
//! serviced history. Apart from its two service timestamps it never
//! changes after creation.

use crate::device::DeviceKind;
use crate::time::Cycle;

// ── Request ID ────────────────────────────────────────────────────────

/// A strictly increasing request identifier.
///
/// Minted by the engine when a request enters the scheduler. Among
/// requests of equal priority the smaller ID is served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(u64);

impl RequestId {
    #[inline]
    pub fn new(raw: u64) -> Self {
        RequestId(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IRQ#{}", self.0)
    }
}

// ── Request ID Generator ─────────────────────────────────────────────

/// Deterministic, strictly increasing request-ID generator.
#[derive(Debug, Clone, Default)]
pub struct RequestIdGen {
    next: u64,
}

impl RequestIdGen {
    pub fn new() -> Self {
        RequestIdGen { next: 0 }
    }

    /// Mint the next request ID.
    pub fn next_id(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next += 1;
        id
    }
}

// ── Interrupt Request ─────────────────────────────────────────────────

/// One pending device event and the service time it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct InterruptRequest {
    /// Assigned by the scheduler on enqueue; `None` until then.
    pub id: Option<RequestId>,
    pub device: DeviceKind,
    pub created_at: Cycle,
    /// Cycles of service required. Always positive.
    pub service_duration: u32,
    pub service_started_at: Option<Cycle>,
    pub service_finished_at: Option<Cycle>,
}

impl InterruptRequest {
    pub fn new(device: DeviceKind, created_at: Cycle, service_duration: u32) -> Self {
        InterruptRequest {
            id: None,
            device,
            created_at,
            service_duration,
            service_started_at: None,
            service_finished_at: None,
        }
    }

    /// Cycles spent queued before service began.
    pub fn wait_cycles(&self) -> Option<u64> {
        self.service_started_at?.since(self.created_at)
    }
}

impl std::fmt::Display for InterruptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Interrupt [{}] | Created: {} | Service: {} cycles",
            self.device.name().to_uppercase(),
            self.created_at,
            self.service_duration
        )
    }
}
