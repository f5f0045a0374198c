//! Device with a fixed arrival list.
//!
//! Raises a request of a given duration at each listed cycle. Useful for
//! reproducing a specific interleaving without searching for a seed.

use std::collections::VecDeque;

use crate::error::{SimError, SimResult};
use crate::interrupt::InterruptRequest;
use crate::time::Cycle;

use super::kind::{DeviceKind, Priority};
use super::traits::{Counters, DeviceSource, DeviceStats};

/// A device that fires on a predetermined schedule.
///
/// Arrivals are kept sorted by cycle. An arrival whose cycle passed while
/// the device was not being polled (the engine skips polling while it
/// services an interrupt) is raised on the next poll, still stamped with
/// its scheduled cycle. At most one request is raised per poll.
#[derive(Debug, Clone)]
pub struct ScriptedDevice {
    kind: DeviceKind,
    priority: Option<Priority>,
    arrivals: VecDeque<(Cycle, u32)>,
    counters: Counters,
}

impl ScriptedDevice {
    /// Build from `(cycle, service_duration)` pairs in any order.
    pub fn new(kind: DeviceKind, arrivals: impl IntoIterator<Item = (u64, u32)>) -> SimResult<Self> {
        let mut sorted: Vec<(Cycle, u32)> = arrivals
            .into_iter()
            .map(|(at, duration)| (Cycle::new(at), duration))
            .collect();
        if sorted.iter().any(|&(_, duration)| duration == 0) {
            return Err(SimError::ZeroServiceDuration { kind });
        }
        sorted.sort_by_key(|&(at, _)| at);

        Ok(ScriptedDevice {
            kind,
            priority: kind.reference_priority(),
            arrivals: sorted.into(),
            counters: Counters::default(),
        })
    }

    /// Override the rank registered for this device's kind.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Arrivals not yet raised.
    pub fn remaining(&self) -> usize {
        self.arrivals.len()
    }
}

impl DeviceSource for ScriptedDevice {
    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn priority(&self) -> Option<Priority> {
        self.priority
    }

    fn try_generate(&mut self, now: Cycle) -> Option<InterruptRequest> {
        let &(at, duration) = self.arrivals.front()?;
        if at > now {
            return None;
        }
        self.arrivals.pop_front();
        self.counters.generated();
        Some(InterruptRequest::new(self.kind, at, duration))
    }

    fn on_serviced(&mut self) {
        self.counters.serviced();
    }

    fn stats(&self) -> DeviceStats {
        self.counters.stats(self.kind)
    }
}
