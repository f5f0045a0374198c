//! Parameterised device description.
//!
//! Every device is the same machine with different constants: a kind, a
//! priority, a service-time range and a per-cycle firing probability.

use crate::error::{SimError, SimResult};

use super::kind::{DeviceKind, Priority};

/// Static parameters of one device.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceDescriptor {
    pub kind: DeviceKind,
    /// Rank registered with the scheduler for this kind.
    /// `None` leaves the kind unranked (served at [`Priority::LOWEST`]).
    pub priority: Option<Priority>,
    /// Shortest service, in cycles (inclusive).
    pub service_min: u32,
    /// Longest service, in cycles (inclusive).
    pub service_max: u32,
    /// Chance of raising an interrupt on any polled cycle, in `[0, 1]`.
    pub probability: f64,
}

impl DeviceDescriptor {
    /// A device of `kind` using its built-in priority.
    pub fn new(kind: DeviceKind, service_min: u32, service_max: u32, probability: f64) -> Self {
        DeviceDescriptor {
            kind,
            priority: kind.reference_priority(),
            service_min,
            service_max,
            probability,
        }
    }

    /// Input device: fast to service, rarely fires.
    pub fn keyboard() -> Self {
        Self::new(DeviceKind::Keyboard, 1, 3, 0.05)
    }

    /// Output device: moderate service time and rate.
    pub fn printer() -> Self {
        Self::new(DeviceKind::Printer, 3, 7, 0.08)
    }

    /// Storage device: slow to service, fires often.
    pub fn disk() -> Self {
        Self::new(DeviceKind::Disk, 5, 12, 0.15)
    }

    /// Keyboard, printer and disk, in polling order.
    pub fn reference_table() -> Vec<DeviceDescriptor> {
        vec![Self::keyboard(), Self::printer(), Self::disk()]
    }

    /// Override the scheduler rank for this device's kind.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Reject parameters the engine cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        if self.service_min > self.service_max {
            return Err(SimError::InvertedServiceRange {
                kind: self.kind,
                min: self.service_min,
                max: self.service_max,
            });
        }
        if self.service_min == 0 {
            return Err(SimError::ZeroServiceDuration { kind: self.kind });
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(SimError::InvalidProbability {
                kind: self.kind,
                probability: self.probability,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Device: {} | Priority: {} | Service: {}-{} cycles | Prob: {:.1}%",
            self.kind.name().to_uppercase(),
            self.kind.priority_label(),
            self.service_min,
            self.service_max,
            self.probability * 100.0
        )
    }
}
