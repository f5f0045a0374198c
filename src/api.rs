//! Step-by-step simulation API for external interfaces.
//!
//! Wraps an [`Engine`] together with the caller loop (advance, then tick)
//! so front-ends can step, run, and export state without re-implementing
//! the stopping rule.

use crate::engine::{CycleOutcome, Engine, Snapshot};
use crate::error::{SimError, SimResult};
use crate::report;

// ── StepResult ────────────────────────────────────────────────────────

/// Result of a single simulation step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct StepResult {
    /// Cycle the step executed on.
    pub cycle: u64,
    pub outcome: CycleOutcome,
    /// Rendered log messages for the cycle.
    pub messages: Vec<String>,
    pub progress: f64,
    pub pending: usize,
    /// Whether the caller loop has ended after this step.
    pub finished: bool,
}

// ── SimulationApi ─────────────────────────────────────────────────────

/// High-level API wrapping an engine for external consumption.
pub struct SimulationApi {
    engine: Engine,
    finished: bool,
    steps: u64,
}

impl SimulationApi {
    pub fn new(engine: Engine) -> Self {
        SimulationApi {
            engine,
            finished: false,
            steps: 0,
        }
    }

    /// Execute one cycle and tick the clock.
    ///
    /// Returns `SimulationFinished` once the loop has ended.
    pub fn step(&mut self) -> SimResult<StepResult> {
        if self.finished {
            return Err(SimError::SimulationFinished);
        }

        let outcome = self.engine.advance_cycle();
        let state = self.engine.current_state();
        let more = self.engine.tick_clock();
        self.steps += 1;
        self.finished = outcome == CycleOutcome::ProcessFinished || !more;

        Ok(StepResult {
            cycle: state.cycle.count(),
            outcome,
            messages: report::describe(outcome, &state),
            progress: state.process.progress(),
            pending: state.pending_queue_length,
            finished: self.finished,
        })
    }

    /// Run to completion. Returns the number of steps executed by this call.
    pub fn run(&mut self) -> u64 {
        self.run_steps(u64::MAX)
    }

    /// Run up to `n` steps. Returns the number actually executed.
    pub fn run_steps(&mut self, n: u64) -> u64 {
        let mut done = 0;
        while done < n && self.step().is_ok() {
            done += 1;
        }
        done
    }

    /// Whether the caller loop has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Steps executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn state(&self) -> Snapshot {
        self.engine.current_state()
    }

    // ── JSON Export ───────────────────────────────────────────

    /// Export the current snapshot as a JSON string.
    #[cfg(feature = "serialize")]
    pub fn state_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(&self.engine.current_state())
            .map_err(|e| SimError::Serialization(e.to_string()))
    }

    /// Export the per-cycle trace (empty if tracing is off) as JSON.
    #[cfg(feature = "serialize")]
    pub fn trace_json(&self) -> SimResult<String> {
        let entries = self.engine.trace().map(|t| t.entries()).unwrap_or(&[]);
        serde_json::to_string_pretty(entries).map_err(|e| SimError::Serialization(e.to_string()))
    }

    /// Export every completed request as JSON.
    #[cfg(feature = "serialize")]
    pub fn serviced_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self.engine.serviced())
            .map_err(|e| SimError::Serialization(e.to_string()))
    }
}
