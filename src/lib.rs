//! # irqsim: deterministic interrupt handling simulator
//!
//! Models how a single CPU interleaves one process with asynchronous I/O
//! interrupts under a fixed priority policy. No threads, no wall-clock
//! time: a synchronous state machine driven one cycle at a time, fully
//! reproducible from its seed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │            Engine            │ ← advance_cycle / tick_clock
//! │  ┌────────────────────────┐  │
//! │  │       DeviceSet        │  │ ← polled on idle cycles
//! │  └────────────────────────┘  │
//! │  ┌────────────────────────┐  │
//! │  │   PriorityScheduler    │  │ ← rank, then FIFO
//! │  └────────────────────────┘  │
//! │  ┌────────────────────────┐  │
//! │  │    ProcessContext      │  │ ← saved / restored around service
//! │  └────────────────────────┘  │
//! │  ┌────────────────────────┐  │
//! │  │        Cycle           │  │ ← simulated clock
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod device;
pub mod dsl;
pub mod engine;
pub mod error;
pub mod interrupt;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod time;
pub mod trace;

// Re-exports for convenience.
pub use api::{SimulationApi, StepResult};
pub use config::SimConfig;
pub use device::{DeviceDescriptor, DeviceKind, DeviceSource, Priority};
pub use dsl::SimulationBuilder;
pub use engine::{CycleOutcome, Engine, EngineStats, RunEnd, RunSummary, Snapshot};
pub use error::{SimError, SimResult};
pub use interrupt::{InterruptRequest, RequestId};
pub use process::{Pid, ProcessContext, ProcessState, SavedContext};
pub use scheduler::{PriorityScheduler, PriorityTable};
pub use time::Cycle;
pub use trace::{Trace, TraceEntry};
