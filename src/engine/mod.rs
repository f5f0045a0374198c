//! Interrupt-driven simulation engine.
//!
//! Drives the clock one cycle at a time. Each cycle either advances the
//! active interrupt's service, or polls the devices, queues their requests
//! and starts the highest-priority one, or runs the process for one unit.
//! The step is synchronous and single-threaded; with a fixed seed two runs
//! produce identical outcomes.
//!
//! Service is non-preemptive: at most one interrupt is active, and
//! priority only matters when choosing the next one to start.

mod state;


pub use state::{CycleOutcome, EngineStats, RunEnd, RunSummary, Snapshot};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimConfig;
use crate::device::{DeviceSet, DeviceSource, DeviceStats};
use crate::error::SimResult;
use crate::interrupt::InterruptRequest;
use crate::process::{Pid, ProcessContext};
use crate::scheduler::{PriorityScheduler, PriorityTable};
use crate::time::Cycle;
use crate::trace::{Trace, TraceEntry};

/// PID given to the simulated process.
pub const MAIN_PID: u32 = 1;

/// The simulation engine.
///
/// Exclusively owns the process, the scheduler queue and the devices.
#[derive(Debug)]
pub struct Engine {
    total_cycles: u64,
    seed: u64,
    clock: Cycle,
    process: ProcessContext,
    scheduler: PriorityScheduler,
    devices: DeviceSet,
    active: Option<InterruptRequest>,
    remaining_service: u32,
    stats: EngineStats,
    serviced: Vec<InterruptRequest>,
    trace: Option<Trace>,
}

impl Engine {
    /// Build an engine with the random devices described by `config`.
    pub fn new(config: SimConfig) -> SimResult<Self> {
        Self::with_sources(config, Vec::new())
    }

    /// Build an engine with the configured random devices followed by
    /// `sources`, polled in that order.
    pub fn with_sources(
        config: SimConfig,
        sources: Vec<Box<dyn DeviceSource>>,
    ) -> SimResult<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        let mut master = StdRng::seed_from_u64(seed);
        let mut devices = DeviceSet::from_descriptors(&config.devices, &mut master)?;
        for source in sources {
            devices.register(source)?;
        }

        let mut table = PriorityTable::reference();
        for device in devices.iter() {
            if let Some(priority) = device.priority() {
                table.set(device.kind(), priority);
            }
        }
        for &(kind, priority) in &config.priorities {
            table.set(kind, priority);
        }

        let stats = EngineStats::for_kinds(devices.iter().map(|d| d.kind()));

        log::info!(
            "engine ready: {} cycles, seed {}, {} device(s)",
            config.total_cycles,
            seed,
            devices.len()
        );

        Ok(Engine {
            total_cycles: config.total_cycles,
            seed,
            clock: Cycle::ZERO,
            process: ProcessContext::new(Pid::new(MAIN_PID)),
            scheduler: PriorityScheduler::with_table(table),
            devices,
            active: None,
            remaining_service: 0,
            stats,
            serviced: Vec::new(),
            trace: config.record_trace.then(Trace::new),
        })
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn clock(&self) -> Cycle {
        self.clock
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// The seed actually used, including one drawn from entropy.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn process(&self) -> &ProcessContext {
        &self.process
    }

    pub fn scheduler(&self) -> &PriorityScheduler {
        &self.scheduler
    }

    pub fn active_interrupt(&self) -> Option<&InterruptRequest> {
        self.active.as_ref()
    }

    pub fn remaining_service(&self) -> u32 {
        self.remaining_service
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Completed requests, in completion order.
    pub fn serviced(&self) -> &[InterruptRequest] {
        &self.serviced
    }

    /// The per-cycle trace, when recording is enabled.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    pub fn device_stats(&self) -> Vec<DeviceStats> {
        self.devices.stats()
    }

    /// Read-only view of the engine. Has no side effects.
    pub fn current_state(&self) -> Snapshot {
        Snapshot {
            cycle: self.clock,
            total_cycles: self.total_cycles,
            seed: self.seed,
            process: self.process.clone(),
            active_interrupt: self.active.clone(),
            remaining_service: self.remaining_service,
            pending_queue_length: self.scheduler.len(),
            stats: self.stats.clone(),
            devices: self.devices.stats(),
        }
    }

    // ── Stepping ──────────────────────────────────────────────

    /// Execute exactly one cycle and report what the CPU did.
    pub fn advance_cycle(&mut self) -> CycleOutcome {
        let outcome = self.step();

        let device = match outcome {
            CycleOutcome::InterruptFinished => self.serviced.last().map(|r| r.device),
            o if o.is_interrupt() => self.active.as_ref().map(|r| r.device),
            _ => None,
        };
        log::trace!(
            "{} {} pc={} progress={:.1} queued={}",
            self.clock,
            outcome,
            self.process.program_counter(),
            self.process.progress(),
            self.scheduler.len()
        );

        if let Some(trace) = self.trace.as_mut() {
            trace.record(TraceEntry {
                cycle: self.clock,
                outcome,
                device,
                program_counter: self.process.program_counter(),
                progress: self.process.progress(),
                pending: self.scheduler.len(),
            });
        }

        outcome
    }

    fn step(&mut self) -> CycleOutcome {
        // Active service is never preempted and suppresses polling.
        if self.active.is_some() {
            self.remaining_service = self.remaining_service.saturating_sub(1);
            self.stats.cycles_servicing_interrupts += 1;

            if self.remaining_service == 0 {
                self.finish_service();
                return CycleOutcome::InterruptFinished;
            }
            return CycleOutcome::InterruptHandling;
        }

        self.poll_devices();

        if let Some(request) = self.scheduler.select_next() {
            self.start_service(request);
            return CycleOutcome::InterruptStarted;
        }

        if self.process.run_one_unit() {
            self.stats.cycles_running_process += 1;
            CycleOutcome::ProcessRunning
        } else {
            CycleOutcome::ProcessFinished
        }
    }

    /// Poll every device at the current cycle and queue what they raise.
    fn poll_devices(&mut self) {
        for request in self.devices.poll(self.clock) {
            let queued = self.scheduler.enqueue(request);
            if queued.warning.is_some() {
                self.stats.unranked_requests += 1;
            }
        }
    }

    fn start_service(&mut self, mut request: InterruptRequest) {
        debug_assert!(self.active.is_none(), "interrupt already in service");

        // The registers stay in the process itself; only the state flips.
        let _ = self.process.save();

        request.service_started_at = Some(self.clock);
        self.remaining_service = request.service_duration;
        self.stats.record_started(request.device);

        log::debug!(
            "{} start {} service ({} cycles, waited {})",
            self.clock,
            request.device,
            request.service_duration,
            request.wait_cycles().unwrap_or(0)
        );
        self.active = Some(request);
    }

    fn finish_service(&mut self) {
        let Some(mut request) = self.active.take() else {
            return;
        };

        self.devices.notify_serviced(request.device);

        let context = self.process.snapshot();
        self.process.restore(context);

        request.service_finished_at = Some(self.clock);
        self.remaining_service = 0;

        log::debug!("{} finished {} service", self.clock, request.device);
        self.serviced.push(request);
    }

    /// Advance the clock. Returns `true` while the budget allows another
    /// cycle and the process has not finished.
    pub fn tick_clock(&mut self) -> bool {
        self.clock = self.clock.next();
        self.clock.count() <= self.total_cycles && !self.process.is_finished()
    }

    // ── Run loop ──────────────────────────────────────────────

    /// Run until the budget is exhausted or the process finishes.
    pub fn run(&mut self) -> RunSummary {
        self.run_with(|_, _| {})
    }

    /// Like [`run`](Self::run), calling `on_cycle` after every cycle with
    /// the engine state before the clock ticks.
    pub fn run_with<F>(&mut self, mut on_cycle: F) -> RunSummary
    where
        F: FnMut(&Engine, CycleOutcome),
    {
        let mut executed = 0u64;
        loop {
            let outcome = self.advance_cycle();
            executed += 1;
            on_cycle(self, outcome);

            let more = self.tick_clock();
            if outcome == CycleOutcome::ProcessFinished || !more {
                break;
            }
        }

        let ended_by = if self.process.is_finished() {
            RunEnd::ProcessFinished
        } else {
            RunEnd::BudgetExhausted
        };
        log::info!(
            "run ended ({:?}) after {} cycles: {} interrupts handled, progress {:.1}%",
            ended_by,
            executed,
            self.stats.total_interrupts_handled,
            self.process.progress()
        );

        RunSummary {
            cycles_executed: executed,
            ended_by,
            final_state: self.current_state(),
        }
    }
}
