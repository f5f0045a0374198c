//! `DeviceSet`: the ordered collection of sources polled by the engine.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::RngCore;

use crate::error::{SimError, SimResult};
use crate::interrupt::InterruptRequest;
use crate::time::Cycle;

use super::descriptor::DeviceDescriptor;
use super::kind::DeviceKind;
use super::random::RandomDevice;
use super::traits::{DeviceSource, DeviceStats};

/// Owns every device source in registration order.
///
/// Polling always walks devices in that order, which together with
/// per-device generators makes a run reproducible from its seed.
#[derive(Debug, Default)]
pub struct DeviceSet {
    devices: Vec<Box<dyn DeviceSource>>,
    kinds: BTreeSet<DeviceKind>,
}

impl DeviceSet {
    /// An empty set: nothing ever interrupts.
    pub fn new() -> Self {
        DeviceSet {
            devices: Vec::new(),
            kinds: BTreeSet::new(),
        }
    }

    /// Build random devices from descriptors, deriving one seed per device
    /// from `master` in descriptor order.
    pub fn from_descriptors(
        descriptors: &[DeviceDescriptor],
        master: &mut StdRng,
    ) -> SimResult<Self> {
        let mut set = DeviceSet::new();
        for descriptor in descriptors {
            let seed = master.next_u64();
            set.register(Box::new(RandomDevice::new(descriptor.clone(), seed)?))?;
        }
        Ok(set)
    }

    /// Append a source. Each kind may be registered once.
    pub fn register(&mut self, device: Box<dyn DeviceSource>) -> SimResult<()> {
        let kind = device.kind();
        if !self.kinds.insert(kind) {
            return Err(SimError::DuplicateDevice(kind));
        }
        log::debug!("registered device {} (priority {:?})", kind, device.priority());
        self.devices.push(device);
        Ok(())
    }

    /// Poll every device once at `now`, in registration order.
    pub fn poll(&mut self, now: Cycle) -> Vec<InterruptRequest> {
        self.devices
            .iter_mut()
            .filter_map(|device| device.try_generate(now))
            .collect()
    }

    /// Tell the first device of `kind` that one of its requests completed.
    pub fn notify_serviced(&mut self, kind: DeviceKind) {
        if let Some(device) = self.devices.iter_mut().find(|d| d.kind() == kind) {
            device.on_serviced();
        }
    }

    /// Counters for every device, in registration order.
    pub fn stats(&self) -> Vec<DeviceStats> {
        self.devices.iter().map(|d| d.stats()).collect()
    }

    /// Iterate over the registered sources.
    pub fn iter(&self) -> impl Iterator<Item = &dyn DeviceSource> {
        self.devices.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
