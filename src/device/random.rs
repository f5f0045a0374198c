//! Seeded Bernoulli device.
//!
//! Each polled cycle the device fires with its configured probability and,
//! when it fires, draws a service duration uniformly from its inclusive
//! range. The generator is owned by the device, so a fixed seed and a
//! fixed polling sequence always reproduce the same requests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimResult;
use crate::interrupt::InterruptRequest;
use crate::time::Cycle;

use super::descriptor::DeviceDescriptor;
use super::kind::{DeviceKind, Priority};
use super::traits::{Counters, DeviceSource, DeviceStats};

/// A device that raises interrupts at random.
#[derive(Debug, Clone)]
pub struct RandomDevice {
    descriptor: DeviceDescriptor,
    rng: StdRng,
    counters: Counters,
}

impl RandomDevice {
    /// Create a device from a descriptor and a seed.
    ///
    /// The descriptor is validated here, so an inverted range or a bad
    /// probability never reaches the generator.
    pub fn new(descriptor: DeviceDescriptor, seed: u64) -> SimResult<Self> {
        descriptor.validate()?;
        Ok(RandomDevice {
            descriptor,
            rng: StdRng::seed_from_u64(seed),
            counters: Counters::default(),
        })
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Bernoulli draw against the firing probability.
    fn fires(&mut self) -> bool {
        self.rng.gen::<f64>() < self.descriptor.probability
    }

    /// Uniform draw in `[service_min, service_max]`.
    fn draw_duration(&mut self) -> u32 {
        self.rng
            .gen_range(self.descriptor.service_min..=self.descriptor.service_max)
    }
}

impl DeviceSource for RandomDevice {
    fn kind(&self) -> DeviceKind {
        self.descriptor.kind
    }

    fn priority(&self) -> Option<Priority> {
        self.descriptor.priority
    }

    fn try_generate(&mut self, now: Cycle) -> Option<InterruptRequest> {
        if !self.fires() {
            return None;
        }
        let duration = self.draw_duration();
        self.counters.generated();
        Some(InterruptRequest::new(self.descriptor.kind, now, duration))
    }

    fn on_serviced(&mut self) {
        self.counters.serviced();
    }

    fn stats(&self) -> DeviceStats {
        self.counters.stats(self.descriptor.kind)
    }
}
