//! Drag and Drop
//!
//! This example drives the classic drag-and-drop interaction machine.
//!
//! Key concepts:
//! - Match arguments select the mouse button
//! - A guard adds hysteresis before a drag starts
//! - A self-loop follows the pointer without leaving the state
//! - Reset with actions leaves the drag state cleanly
//!
//! Run with: cargo run --example drag_and_drop

use eventfsm::{
    Event, MachineConfig, StateBuilder, StateMachineBuilder, Transition, TransitionBuilder,
};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug)]
enum Mouse {
    Press(&'static str, i32, i32),
    Move(i32, i32),
    Release(&'static str, i32, i32),
}

impl Mouse {
    fn position(&self) -> (i32, i32) {
        match *self {
            Mouse::Press(_, x, y) | Mouse::Move(x, y) | Mouse::Release(_, x, y) => (x, y),
        }
    }
}

impl Event for Mouse {
    type Kind = &'static str;

    fn kind(&self) -> Self::Kind {
        match self {
            Mouse::Press(..) => "Press",
            Mouse::Move(..) => "Move",
            Mouse::Release(..) => "Release",
        }
    }

    fn matches(&self, transition: &Transition<Self>) -> bool {
        match (self, transition.match_args().first()) {
            (Mouse::Press(button, ..) | Mouse::Release(button, ..), Some(arg)) => arg == *button,
            _ => true,
        }
    }
}

fn main() {
    println!("=== Drag and Drop ===\n");

    let anchor = Rc::new(Cell::new((0, 0)));
    let press_anchor = Rc::clone(&anchor);
    let guard_anchor = Rc::clone(&anchor);

    let machine = StateMachineBuilder::new()
        .config(MachineConfig::new().call_actions_on_reset(true).record_history(true))
        .state("start")
        .state("wait")
        .state(
            StateBuilder::new("drag")
                .on_enter(|| println!("  [drag] picked up"))
                .on_leave(|| println!("  [drag] dropped")),
        )
        .transition(
            "start",
            TransitionBuilder::on("Press")
                .arg("Button1")
                .to("wait")
                .action(move |e: &Mouse| press_anchor.set(e.position())),
        )
        .transition(
            "wait",
            TransitionBuilder::on("Move")
                .when(move |e: &Mouse| {
                    let (x0, y0) = guard_anchor.get();
                    let (x, y) = e.position();
                    (x - x0).abs() > 5 || (y - y0).abs() > 5
                })
                .to("drag"),
        )
        .transition(
            "wait",
            TransitionBuilder::on("Release").arg("Button1").to("start"),
        )
        .transition(
            "drag",
            TransitionBuilder::on("Move").action(|e: &Mouse| {
                let (x, y) = e.position();
                println!("  [drag] at {x},{y}");
            }),
        )
        .transition(
            "drag",
            TransitionBuilder::on("Release").arg("Button1").to("start"),
        )
        .build();

    let machine = match machine {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("Failed to build machine: {e}");
            return;
        }
    };

    println!("Transitions:");
    for transition in machine.all_transitions() {
        println!("  {}", transition);
    }
    println!();

    let events = [
        Mouse::Press("Button1", 10, 10),
        Mouse::Move(12, 10),
        Mouse::Move(14, 14),
        Mouse::Move(16, 14),
        Mouse::Move(20, 16),
        Mouse::Release("Button2", 16, 16),
        Mouse::Release("Button1", 16, 16),
    ];

    for event in &events {
        match machine.process_event(event) {
            Ok(outcome) => {
                let state = machine
                    .current_state()
                    .map(|s| s.name().to_string())
                    .unwrap_or_default();
                println!("{:?} -> {:?}, now in {}", event, outcome, state);
            }
            Err(e) => eprintln!("{:?} failed: {}", event, e),
        }
    }

    println!("\nPath: {}", machine.history().get_path().join(" -> "));

    println!("\nReset from the middle of a drag:");
    let _ = machine.process_event(&Mouse::Press("Button1", 0, 0));
    let _ = machine.process_event(&Mouse::Move(30, 30));
    if let Err(e) = machine.reset() {
        eprintln!("reset failed: {e}");
    }
    println!("  back in start: {}", machine.is_in("start"));
}
