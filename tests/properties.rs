//! Property tests over seeded runs and arbitrary request mixes.

use std::collections::BTreeSet;

use proptest::prelude::*;

use irqsim::{
    Cycle, CycleOutcome, DeviceKind, Engine, InterruptRequest, PriorityScheduler,
    SimulationBuilder,
};

fn kind_strategy() -> impl Strategy<Value = DeviceKind> {
    prop_oneof![
        Just(DeviceKind::Keyboard),
        Just(DeviceKind::Printer),
        Just(DeviceKind::Disk),
        (0u16..4).prop_map(DeviceKind::Custom),
    ]
}

fn seeded(seed: u64, cycles: u64) -> Engine {
    SimulationBuilder::new()
        .cycles(cycles)
        .seed(seed)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_program_counter_moves_only_when_running(seed in any::<u64>(), cycles in 1u64..300) {
        let mut engine = seeded(seed, cycles);
        loop {
            let before = engine.process().program_counter();
            let outcome = engine.advance_cycle();
            let after = engine.process().program_counter();

            prop_assert!(after >= before);
            if outcome == CycleOutcome::ProcessRunning {
                prop_assert_eq!(after, before + 1);
            } else {
                prop_assert_eq!(after, before);
            }
            if !engine.tick_clock() {
                break;
            }
        }
    }

    #[test]
    fn prop_finished_iff_complete(seed in any::<u64>(), cycles in 1u64..400) {
        let mut engine = seeded(seed, cycles);
        let mut finished_seen = false;
        loop {
            engine.advance_cycle();
            let process = engine.process();
            prop_assert_eq!(process.is_finished(), process.progress() >= 100.0);
            prop_assert!(process.progress() <= 100.0);

            if finished_seen {
                prop_assert!(process.is_finished());
            }
            finished_seen = process.is_finished();
            if !engine.tick_clock() {
                break;
            }
        }
    }

    #[test]
    fn prop_no_start_while_servicing(seed in any::<u64>(), cycles in 1u64..300) {
        let mut engine = seeded(seed, cycles);
        loop {
            let busy = engine.active_interrupt().is_some();
            let outcome = engine.advance_cycle();
            if busy {
                prop_assert!(matches!(
                    outcome,
                    CycleOutcome::InterruptHandling | CycleOutcome::InterruptFinished
                ));
            }
            if outcome == CycleOutcome::InterruptStarted {
                prop_assert!(engine.active_interrupt().is_some());
                prop_assert!(engine.remaining_service() >= 1);
            }
            if !engine.tick_clock() {
                break;
            }
        }
    }

    #[test]
    fn prop_snapshot_has_no_side_effects(seed in any::<u64>(), steps in 0usize..120) {
        let mut engine = seeded(seed, 200);
        for _ in 0..steps {
            engine.advance_cycle();
            engine.tick_clock();
        }
        let first = engine.current_state();
        let second = engine.current_state();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_scheduler_conserves_and_orders(
        requests in prop::collection::vec((kind_strategy(), 0u64..50, 1u32..10), 0..40)
    ) {
        let mut scheduler = PriorityScheduler::new();
        let mut enqueued = BTreeSet::new();
        for &(kind, at, duration) in &requests {
            let queued = scheduler.enqueue(InterruptRequest::new(kind, Cycle::new(at), duration));
            prop_assert!(enqueued.insert(queued.id));
        }
        prop_assert_eq!(scheduler.len(), requests.len());

        let drained = scheduler.drain_ordered();
        prop_assert!(scheduler.is_empty());

        // Every enqueued request comes back exactly once.
        let mut returned = BTreeSet::new();
        for request in &drained {
            let id = request.id.expect("queued requests carry an id");
            prop_assert!(returned.insert(id), "{} returned twice", id);
        }
        prop_assert_eq!(returned, enqueued);

        for pair in drained.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let rank_a = scheduler.table().get(a.device).map(|p| p.rank()).unwrap_or(0);
            let rank_b = scheduler.table().get(b.device).map(|p| p.rank()).unwrap_or(0);
            prop_assert!(rank_a >= rank_b);
            if rank_a == rank_b {
                // Same rank: FIFO by enqueue order.
                prop_assert!(a.id < b.id);
            }
        }
    }
}
