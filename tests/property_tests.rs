//! Property-based tests for dispatch and lifecycle.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated machines and event sequences.

use chrono::Utc;
use eventfsm::core::{StateHistory, StateTransition};
use eventfsm::{Dispatch, Event, MachineConfig, StateBuilder, StateMachine, TransitionBuilder};
use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
struct Tick(u8);

impl Event for Tick {
    type Kind = u8;

    fn kind(&self) -> Self::Kind {
        self.0
    }
}

#[derive(Default)]
struct Counters {
    enter: Rc<Cell<usize>>,
    leave: Rc<Cell<usize>>,
}

impl Counters {
    fn state(&self, name: &str) -> StateBuilder<Tick> {
        let enter = Rc::clone(&self.enter);
        let leave = Rc::clone(&self.leave);
        StateBuilder::new(name)
            .on_enter(move || enter.set(enter.get() + 1))
            .on_leave(move || leave.set(leave.get() + 1))
    }

    fn counts(&self) -> (usize, usize) {
        (self.leave.get(), self.enter.get())
    }
}

prop_compose! {
    fn arbitrary_candidate()(kind in 0..3u8, open in any::<bool>()) -> (u8, bool) {
        (kind, open)
    }
}

/// A ring of `size` states where event `0` moves to the next state.
fn ring(size: usize, counters: &Counters, config: MachineConfig) -> StateMachine<Tick> {
    let machine = StateMachine::with_config(config);
    for i in 0..size {
        machine.add_state(counters.state(&format!("s{i}"))).unwrap();
    }
    for i in 0..size {
        let next = format!("s{}", (i + 1) % size);
        machine
            .add_transition(format!("s{i}"), TransitionBuilder::on(0).to(next))
            .unwrap();
    }
    machine
}

proptest! {
    #[test]
    fn first_eligible_transition_wins(
        candidates in prop::collection::vec(arbitrary_candidate(), 1..8),
        event in 0..3u8,
    ) {
        let machine = StateMachine::new();
        machine.add_state("source").unwrap();
        for i in 0..candidates.len() {
            machine.add_state(format!("d{i}")).unwrap();
        }
        for (i, (kind, open)) in candidates.iter().enumerate() {
            let open = *open;
            machine
                .add_transition(
                    "source",
                    TransitionBuilder::on(*kind).when(move |_| open).to(format!("d{i}")),
                )
                .unwrap();
        }

        let expected = candidates
            .iter()
            .position(|(kind, open)| *kind == event && *open);
        let outcome = machine.process_event(&Tick(event)).unwrap();

        match expected {
            Some(i) => {
                prop_assert_eq!(outcome, Dispatch::Fired);
                let expected_name = format!("d{i}");
                prop_assert!(machine.is_in(expected_name.as_str()));
            }
            None => {
                prop_assert_eq!(outcome, Dispatch::Ignored);
                prop_assert!(machine.is_in("source"));
            }
        }
    }

    #[test]
    fn self_loops_never_run_enter_or_leave(
        kinds in prop::collection::vec(0..4u8, 1..5),
        events in prop::collection::vec(0..4u8, 0..20),
    ) {
        let counters = Counters::default();
        let fired = Rc::new(Cell::new(0));
        let machine = StateMachine::new();
        let id = machine.add_state(counters.state("only")).unwrap();
        for kind in &kinds {
            let fired = Rc::clone(&fired);
            machine
                .add_transition("only", TransitionBuilder::on(*kind).action(move |_| {
                    fired.set(fired.get() + 1)
                }))
                .unwrap();
        }

        let mut expected_fired = 0;
        for event in events {
            if machine.process_event(&Tick(event)).unwrap().fired() {
                expected_fired += 1;
            }
        }

        prop_assert_eq!(counters.counts(), (0, 0));
        prop_assert_eq!(fired.get(), expected_fired);
        prop_assert_eq!(machine.current_state().map(|s| s.id()), Some(id));
    }

    #[test]
    fn reset_runs_one_leave_then_one_enter(size in 2..6usize, steps in 0..12usize) {
        let counters = Counters::default();
        let machine = ring(size, &counters, MachineConfig::new().call_actions_on_reset(true));
        for _ in 0..steps {
            machine.process_event(&Tick(0)).unwrap();
        }
        let before = counters.counts();
        let away = !machine.is_in("s0");

        machine.reset().unwrap();

        let (leave, enter) = counters.counts();
        let expected = if away { 1 } else { 0 };
        prop_assert_eq!(leave - before.0, expected);
        prop_assert_eq!(enter - before.1, expected);
        prop_assert!(machine.is_in("s0"));
        prop_assert!(machine.is_active());
    }

    #[test]
    fn suspend_then_resume_pairs_leave_and_enter(size in 1..6usize, steps in 0..12usize) {
        let counters = Counters::default();
        let config = MachineConfig::new()
            .call_actions_on_suspend(true)
            .call_actions_on_resume(true);
        let machine = ring(size, &counters, config);
        for _ in 0..steps {
            machine.process_event(&Tick(0)).unwrap();
        }
        let current = machine.current_state();
        let before = counters.counts();

        machine.suspend().unwrap();
        prop_assert!(!machine.is_active());
        prop_assert_eq!(machine.process_event(&Tick(0)).unwrap(), Dispatch::Inactive);
        machine.resume().unwrap();

        let (leave, enter) = counters.counts();
        prop_assert_eq!((leave - before.0, enter - before.1), (1, 1));
        prop_assert!(machine.is_active());
        prop_assert_eq!(machine.current_state(), current);
    }

    #[test]
    fn history_follows_the_walk(size in 1..5usize, steps in 0..10usize) {
        let counters = Counters::default();
        let machine = ring(size, &counters, MachineConfig::new().record_history(true));
        let mut expected = vec!["s0".to_string()];
        for step in 1..=steps {
            machine.process_event(&Tick(0)).unwrap();
            expected.push(format!("s{}", step % size));
        }

        let history = machine.history();
        prop_assert_eq!(history.len(), steps);
        if steps > 0 {
            prop_assert_eq!(history.get_path(), expected);
        } else {
            prop_assert!(history.get_path().is_empty());
        }
    }

    #[test]
    fn history_roundtrip_serialization(
        names in prop::collection::vec("[a-z]{1,6}", 0..5)
    ) {
        let mut history = StateHistory::new();
        for pair in names.windows(2) {
            history.record(StateTransition {
                from: pair[0].clone(),
                to: pair[1].clone(),
                event: "Tick".to_string(),
                timestamp: Utc::now(),
            });
        }

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(history, deserialized);
    }
}
