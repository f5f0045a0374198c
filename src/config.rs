//! Run configuration.
//!
//! A run is fully described by its cycle budget, an optional seed and the
//! device table. Everything is checked up front by [`SimConfig::validate`]
//! so a misconfigured engine never starts.

use std::collections::BTreeSet;

use crate::device::{DeviceDescriptor, DeviceKind, Priority};
use crate::error::{SimError, SimResult};

/// Default cycle budget used by the CLI.
pub const DEFAULT_TOTAL_CYCLES: u64 = 200;

/// Parameters for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Cycle budget. The run stops once the clock passes it.
    pub total_cycles: u64,
    /// Seed for every random device. `None` draws one from OS entropy.
    pub seed: Option<u64>,
    /// Random devices, in polling order.
    pub devices: Vec<DeviceDescriptor>,
    /// Rank overrides applied after device registration.
    pub priorities: Vec<(DeviceKind, Priority)>,
    /// Record a per-cycle trace.
    pub record_trace: bool,
}

impl SimConfig {
    /// `total_cycles` with the reference keyboard/printer/disk table.
    pub fn new(total_cycles: u64) -> Self {
        SimConfig {
            total_cycles,
            seed: None,
            devices: DeviceDescriptor::reference_table(),
            priorities: Vec::new(),
            record_trace: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject a configuration the engine cannot run.
    pub fn validate(&self) -> SimResult<()> {
        if self.total_cycles == 0 {
            return Err(SimError::InvalidCycleBudget(self.total_cycles));
        }
        let mut seen = BTreeSet::new();
        for device in &self.devices {
            device.validate()?;
            if !seen.insert(device.kind) {
                return Err(SimError::DuplicateDevice(device.kind));
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_CYCLES)
    }
}
