//! Process control block for the single simulated process.
//!
//! The engine owns exactly one `ProcessContext`. It advances one unit per
//! cycle while `RUNNING`, is parked in `WAITING` while an interrupt is
//! serviced, and becomes `FINISHED` once progress reaches 100%.

/// Progress value at which a process is complete.
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Progress gained per executed cycle.
pub const PROGRESS_PER_UNIT: f64 = 1.0;

/// A process identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Pid(u32);

impl Pid {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Pid(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Execution state of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ProcessState {
    Running,
    Waiting,
    Finished,
}

impl ProcessState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessState::Running => "RUNNING",
            ProcessState::Waiting => "WAITING",
            ProcessState::Finished => "FINISHED",
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// The register pair captured when a process is preempted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedContext {
    pub program_counter: u64,
    pub progress: f64,
}

/// Process context (PCB).
///
/// `state == Finished` holds exactly when `progress >= 100.0`, and
/// `program_counter` never decreases under `run_one_unit`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessContext {
    pid: Pid,
    program_counter: u64,
    progress: f64,
    state: ProcessState,
}

impl ProcessContext {
    /// A fresh process: PC 0, no progress, `RUNNING`.
    pub fn new(pid: Pid) -> Self {
        ProcessContext {
            pid,
            program_counter: 0,
            progress: 0.0,
            state: ProcessState::Running,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn program_counter(&self) -> u64 {
        self.program_counter
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == ProcessState::Finished
    }

    /// Execute one unit of work.
    ///
    /// Only effective while `RUNNING`: advances progress by one unit (while
    /// below 100%) and the program counter by one, and finishes the process
    /// when progress reaches 100%. Returns `false` as a no-op otherwise.
    pub fn run_one_unit(&mut self) -> bool {
        if self.state != ProcessState::Running {
            return false;
        }

        if self.progress < PROGRESS_COMPLETE {
            self.progress += PROGRESS_PER_UNIT;
        }
        self.program_counter += 1;

        if self.progress >= PROGRESS_COMPLETE {
            self.state = ProcessState::Finished;
        }
        true
    }

    /// Park the process for interrupt service.
    ///
    /// Moves `RUNNING -> WAITING` and returns the current registers
    /// unchanged. Returns `None` if the process was not running.
    pub fn save(&mut self) -> Option<SavedContext> {
        if self.state != ProcessState::Running {
            return None;
        }
        self.state = ProcessState::Waiting;
        Some(self.snapshot())
    }

    /// Reinstate registers and resume.
    ///
    /// Rejected (returns `false`) once the process has finished.
    pub fn restore(&mut self, context: SavedContext) -> bool {
        if self.state == ProcessState::Finished {
            return false;
        }
        self.program_counter = context.program_counter;
        self.progress = context.progress;
        self.state = ProcessState::Running;
        true
    }

    /// The registers as they stand right now.
    pub fn snapshot(&self) -> SavedContext {
        SavedContext {
            program_counter: self.program_counter,
            progress: self.progress,
        }
    }
}

impl std::fmt::Display for ProcessContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PID: {} | State: {:^10} | PC: {:04} | Progress: {:.1}%",
            self.pid, self.state, self.program_counter, self.progress
        )
    }
}
