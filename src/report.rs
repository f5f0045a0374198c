//! Text rendering of cycle outcomes.
//!
//! The engine only reports an outcome tag and a snapshot; this module
//! turns them into the human-readable execution log.

use std::io::{self, Write};

use crate::device::DeviceKind;
use crate::engine::{CycleOutcome, RunEnd, RunSummary, Snapshot};

/// First line of every log file.
pub const LOG_HEADER: &str = "=== EXECUTION LOG ===";

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn active_kind(state: &Snapshot) -> Option<DeviceKind> {
    state.active_interrupt.as_ref().map(|r| r.device)
}

/// Messages for one cycle, without the cycle prefix.
pub fn describe(outcome: CycleOutcome, state: &Snapshot) -> Vec<String> {
    match outcome {
        CycleOutcome::InterruptStarted => match active_kind(state) {
            Some(kind) => vec![format!(
                "Interrupt: {} - Priority: {} - Saving context...",
                capitalize(&kind.name()),
                kind.priority_label()
            )],
            None => Vec::new(),
        },
        CycleOutcome::InterruptHandling => match active_kind(state) {
            Some(kind) => vec![format!("Handling {} interrupt...", kind)],
            None => Vec::new(),
        },
        CycleOutcome::InterruptFinished => vec![
            "Main process resumed.".to_string(),
            "Interrupt handled. Restoring main process context.".to_string(),
        ],
        CycleOutcome::ProcessRunning => vec![format!(
            "Main process running. (Progress: {:.1}%)",
            state.process.progress()
        )],
        CycleOutcome::ProcessFinished => vec!["Main process finished.".to_string()],
    }
}

/// Log lines for one cycle, each prefixed with `[Cycle N] - `.
pub fn lines(outcome: CycleOutcome, state: &Snapshot) -> Vec<String> {
    describe(outcome, state)
        .into_iter()
        .map(|msg| format!("[Cycle {}] - {}", state.cycle.count(), msg))
        .collect()
}

/// End-of-run statistics block, one line per entry.
pub fn summary(run: &RunSummary) -> String {
    let state = &run.final_state;
    let stats = &state.stats;

    let ended = match run.ended_by {
        RunEnd::ProcessFinished => "process finished",
        RunEnd::BudgetExhausted => "cycle budget exhausted",
    };
    let mut lines = vec![
        "=== SUMMARY ===".to_string(),
        format!(
            "Ended: {} after {} cycles (seed {})",
            ended, run.cycles_executed, state.seed
        ),
        state.process.to_string(),
        format!("Cycles running process: {}", stats.cycles_running_process),
        format!(
            "Cycles servicing interrupts: {}",
            stats.cycles_servicing_interrupts
        ),
        format!("Interrupts handled: {}", stats.total_interrupts_handled),
    ];
    lines.extend(
        stats
            .per_device
            .iter()
            .map(|(kind, count)| format!("  {}: {}", kind, count)),
    );
    if stats.unranked_requests > 0 {
        lines.push(format!("Unranked requests: {}", stats.unranked_requests));
    }
    lines.push(format!("Still queued: {}", state.pending_queue_length));
    lines.extend(state.devices.iter().map(|device| {
        format!(
            "{}: {} generated, {} pending",
            device.kind.name().to_uppercase(),
            device.total_generated,
            device.pending
        )
    }));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Writes the execution log to any `io::Write`, flushing after each cycle.
pub struct LogWriter<W: Write> {
    out: W,
}

impl<W: Write> LogWriter<W> {
    /// Wrap `out` and write the log header.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{}", LOG_HEADER)?;
        Ok(LogWriter { out })
    }

    /// Append the lines for one cycle. Returns the lines written.
    pub fn write_cycle(&mut self, outcome: CycleOutcome, state: &Snapshot) -> io::Result<Vec<String>> {
        let lines = lines(outcome, state);
        for line in &lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(lines)
    }

    /// Append the summary block.
    pub fn write_summary(&mut self, run: &RunSummary) -> io::Result<()> {
        write!(self.out, "{}", summary(run))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::SimulationBuilder;

    fn state_after(builder: SimulationBuilder, cycles: usize) -> (CycleOutcome, Snapshot) {
        let mut engine = builder.build().unwrap();
        let mut last = None;
        for _ in 0..cycles {
            let outcome = engine.advance_cycle();
            last = Some((outcome, engine.current_state()));
            engine.tick_clock();
        }
        last.unwrap()
    }

    fn quiet() -> SimulationBuilder {
        SimulationBuilder::new().cycles(50).seed(0).without_devices()
    }

    #[test]
    fn test_running_line() {
        let (outcome, state) = state_after(quiet(), 7);
        assert_eq!(
            lines(outcome, &state),
            vec!["[Cycle 6] - Main process running. (Progress: 7.0%)"]
        );
    }

    #[test]
    fn test_started_and_handling_lines() {
        let builder = || quiet().scripted(DeviceKind::Keyboard, [(0, 3)]);

        let (outcome, state) = state_after(builder(), 1);
        assert_eq!(
            lines(outcome, &state),
            vec!["[Cycle 0] - Interrupt: Keyboard - Priority: High - Saving context..."]
        );

        let (outcome, state) = state_after(builder(), 2);
        assert_eq!(
            lines(outcome, &state),
            vec!["[Cycle 1] - Handling keyboard interrupt..."]
        );
    }

    #[test]
    fn test_finished_lines() {
        let (outcome, state) = state_after(quiet().scripted(DeviceKind::Disk, [(0, 1)]), 2);
        assert_eq!(outcome, CycleOutcome::InterruptFinished);
        assert_eq!(
            lines(outcome, &state),
            vec![
                "[Cycle 1] - Main process resumed.",
                "[Cycle 1] - Interrupt handled. Restoring main process context.",
            ]
        );
    }

    #[test]
    fn test_log_writer() {
        let mut engine = quiet().cycles(2).build().unwrap();
        let mut writer = LogWriter::new(Vec::new()).unwrap();
        let summary = engine.run_with(|e, outcome| {
            writer.write_cycle(outcome, &e.current_state()).unwrap();
        });
        writer.write_summary(&summary).unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(LOG_HEADER));
        assert_eq!(lines.next(), Some("[Cycle 0] - Main process running. (Progress: 1.0%)"));
        assert!(text.contains("=== SUMMARY ==="));
        assert!(text.contains("cycle budget exhausted after 3 cycles"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("printer"), "Printer");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_summary_block() {
        let mut engine = quiet()
            .cycles(10)
            .scripted(DeviceKind::Disk, [(2, 3)])
            .build()
            .unwrap();
        let text = summary(&engine.run());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=== SUMMARY ===");
        assert_eq!(lines[1], "Ended: cycle budget exhausted after 11 cycles (seed 0)");
        assert!(lines.contains(&"Interrupts handled: 1"));
        assert!(lines.contains(&"  disk: 1"));
        assert!(lines.contains(&"DISK: 1 generated, 0 pending"));
        assert!(!text.contains("Unranked"));
        assert!(text.ends_with('\n'));
    }
}
