//! Fluent builder for engine setup.
//!
//! Hides the boilerplate of assembling a `SimConfig`, random and scripted
//! devices and priority overrides, and validates everything in `build`.

use crate::config::{SimConfig, DEFAULT_TOTAL_CYCLES};
use crate::device::{DeviceDescriptor, DeviceKind, DeviceSource, Priority, ScriptedDevice};
use crate::engine::Engine;
use crate::error::SimResult;

/// Fluent builder for an [`Engine`].
///
/// # Example
/// ```rust
/// use irqsim::dsl::SimulationBuilder;
/// use irqsim::device::DeviceKind;
///
/// let engine = SimulationBuilder::new()
///     .cycles(50)
///     .seed(42)
///     .without_devices()
///     .scripted(DeviceKind::Disk, [(3, 5)])
///     .with_trace()
///     .build()
///     .unwrap();
/// assert_eq!(engine.total_cycles(), 50);
/// ```
pub struct SimulationBuilder {
    config: SimConfig,
    scripted: Vec<(DeviceKind, Vec<(u64, u32)>, Option<Priority>)>,
    sources: Vec<Box<dyn DeviceSource>>,
}

impl SimulationBuilder {
    /// Reference devices, default cycle budget, entropy seed.
    pub fn new() -> Self {
        SimulationBuilder {
            config: SimConfig::new(DEFAULT_TOTAL_CYCLES),
            scripted: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SimConfig) -> Self {
        SimulationBuilder {
            config,
            scripted: Vec::new(),
            sources: Vec::new(),
        }
    }

    // ── Run parameters ────────────────────────────────────────

    /// Set the cycle budget.
    pub fn cycles(mut self, total: u64) -> Self {
        self.config.total_cycles = total;
        self
    }

    /// Fix the seed for reproducible runs.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Record a per-cycle trace.
    pub fn with_trace(mut self) -> Self {
        self.config.record_trace = true;
        self
    }

    // ── Devices ───────────────────────────────────────────────

    /// Replace the device list with keyboard, printer and disk.
    pub fn reference_devices(mut self) -> Self {
        self.config.devices = DeviceDescriptor::reference_table();
        self
    }

    /// Remove all random devices.
    pub fn without_devices(mut self) -> Self {
        self.config.devices.clear();
        self
    }

    /// Append a random device.
    pub fn device(mut self, descriptor: DeviceDescriptor) -> Self {
        self.config.devices.push(descriptor);
        self
    }

    /// Append a device that fires at fixed cycles with fixed durations.
    pub fn scripted(
        mut self,
        kind: DeviceKind,
        arrivals: impl IntoIterator<Item = (u64, u32)>,
    ) -> Self {
        self.scripted.push((kind, arrivals.into_iter().collect(), None));
        self
    }

    /// Like [`scripted`](Self::scripted), with an explicit rank.
    pub fn scripted_with_priority(
        mut self,
        kind: DeviceKind,
        priority: Priority,
        arrivals: impl IntoIterator<Item = (u64, u32)>,
    ) -> Self {
        self.scripted
            .push((kind, arrivals.into_iter().collect(), Some(priority)));
        self
    }

    /// Append any custom source.
    pub fn source(mut self, source: Box<dyn DeviceSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Override the scheduler rank for `kind`.
    pub fn rank(mut self, kind: DeviceKind, priority: Priority) -> Self {
        self.config.priorities.push((kind, priority));
        self
    }

    // ── Build ─────────────────────────────────────────────────

    /// Validate and assemble the engine.
    ///
    /// Random devices are polled first, then scripted devices, then
    /// custom sources, each group in insertion order.
    pub fn build(self) -> SimResult<Engine> {
        let mut sources: Vec<Box<dyn DeviceSource>> = Vec::new();
        for (kind, arrivals, priority) in self.scripted {
            let mut device = ScriptedDevice::new(kind, arrivals)?;
            if let Some(priority) = priority {
                device = device.with_priority(priority);
            }
            sources.push(Box::new(device));
        }
        sources.extend(self.sources);
        Engine::with_sources(self.config, sources)
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceStats, RandomDevice};
    use crate::error::SimError;
    use crate::interrupt::InterruptRequest;
    use crate::time::Cycle;

    /// Fires a one-cycle request on every multiple of `every`.
    #[derive(Debug)]
    struct Metronome {
        every: u64,
        raised: u64,
        serviced: u64,
    }

    impl DeviceSource for Metronome {
        fn kind(&self) -> DeviceKind {
            DeviceKind::Custom(7)
        }

        fn priority(&self) -> Option<Priority> {
            Some(Priority::new(5))
        }

        fn try_generate(&mut self, now: Cycle) -> Option<InterruptRequest> {
            if now.count() % self.every != 0 {
                return None;
            }
            self.raised += 1;
            Some(InterruptRequest::new(self.kind(), now, 1))
        }

        fn on_serviced(&mut self) {
            self.serviced += 1;
        }

        fn stats(&self) -> DeviceStats {
            DeviceStats {
                kind: self.kind(),
                priority_label: "Custom",
                total_generated: self.raised,
                pending: self.raised - self.serviced,
            }
        }
    }

    #[test]
    fn test_defaults() {
        let engine = SimulationBuilder::new().seed(1).build().unwrap();
        assert_eq!(engine.total_cycles(), DEFAULT_TOTAL_CYCLES);
        assert_eq!(engine.seed(), 1);
        assert_eq!(engine.device_stats().len(), 3);
        assert!(engine.trace().is_none());
    }

    #[test]
    fn test_zero_cycles_fails_fast() {
        let err = SimulationBuilder::new().cycles(0).build().unwrap_err();
        assert_eq!(err, SimError::InvalidCycleBudget(0));
    }

    #[test]
    fn test_inverted_range_fails_fast() {
        let err = SimulationBuilder::new()
            .without_devices()
            .device(DeviceDescriptor::new(DeviceKind::Printer, 7, 3, 0.1))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::InvertedServiceRange { .. }));
    }

    #[test]
    fn test_scripted_duplicate_of_random_rejected() {
        let err = SimulationBuilder::new()
            .scripted(DeviceKind::Disk, [(1, 1)])
            .build()
            .unwrap_err();
        assert_eq!(err, SimError::DuplicateDevice(DeviceKind::Disk));
    }

    #[test]
    fn test_device_order() {
        let engine = SimulationBuilder::new()
            .without_devices()
            .device(DeviceDescriptor::disk())
            .scripted(DeviceKind::Keyboard, [(0, 1)])
            .build()
            .unwrap();
        let kinds: Vec<DeviceKind> = engine.device_stats().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![DeviceKind::Disk, DeviceKind::Keyboard]);
    }

    #[test]
    fn test_rank_override() {
        let engine = SimulationBuilder::new()
            .without_devices()
            .rank(DeviceKind::Disk, Priority::new(7))
            .build()
            .unwrap();
        assert_eq!(
            engine.scheduler().table().get(DeviceKind::Disk),
            Some(Priority::new(7))
        );
    }

    #[test]
    fn test_from_config() {
        let config = SimConfig::new(30).with_seed(5);
        let engine = SimulationBuilder::from_config(config)
            .without_devices()
            .build()
            .unwrap();
        assert_eq!(engine.total_cycles(), 30);
        assert_eq!(engine.seed(), 5);
        assert!(engine.device_stats().is_empty());
    }

    #[test]
    fn test_scripted_rank_beats_keyboard() {
        let mut engine = SimulationBuilder::new()
            .cycles(20)
            .seed(0)
            .without_devices()
            .scripted(DeviceKind::Keyboard, [(0, 1)])
            .scripted_with_priority(DeviceKind::Custom(3), Priority::new(9), [(0, 1)])
            .build()
            .unwrap();
        engine.run();

        let order: Vec<DeviceKind> = engine.serviced().iter().map(|r| r.device).collect();
        assert_eq!(order, vec![DeviceKind::Custom(3), DeviceKind::Keyboard]);
        assert_eq!(engine.stats().unranked_requests, 0);
    }

    #[test]
    fn test_custom_source() {
        let mut engine = SimulationBuilder::new()
            .cycles(9)
            .seed(0)
            .without_devices()
            .source(Box::new(Metronome {
                every: 4,
                raised: 0,
                serviced: 0,
            }))
            .build()
            .unwrap();
        assert_eq!(
            engine.scheduler().table().get(DeviceKind::Custom(7)),
            Some(Priority::new(5))
        );

        engine.run();
        // Fires at 0, 4 and 8; each takes two cycles (start + finish).
        assert_eq!(engine.serviced().len(), 3);
        let stats = &engine.device_stats()[0];
        assert_eq!(stats.total_generated, 3);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_random_source_validated_before_build() {
        fn build_with(descriptor: DeviceDescriptor) -> SimResult<Engine> {
            let device = RandomDevice::new(descriptor, 0)?;
            SimulationBuilder::new()
                .cycles(10)
                .seed(0)
                .without_devices()
                .source(Box::new(device))
                .build()
        }

        let err = build_with(DeviceDescriptor::new(DeviceKind::Custom(1), 9, 2, 1.0)).unwrap_err();
        assert_eq!(
            err,
            SimError::InvertedServiceRange {
                kind: DeviceKind::Custom(1),
                min: 9,
                max: 2
            }
        );

        let mut engine = build_with(DeviceDescriptor::new(DeviceKind::Custom(1), 2, 2, 1.0)).unwrap();
        assert_eq!(engine.advance_cycle(), crate::engine::CycleOutcome::InterruptStarted);
    }
}
