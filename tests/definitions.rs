//! Machines loaded from JSON definitions.

use eventfsm::definition::{MachineDefinition, Registry};
use eventfsm::{Event, MachineError, Transition};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use stillwater::validation::Validation;

struct Pointer {
    kind: &'static str,
    button: Option<&'static str>,
    at: (i32, i32),
}

impl Pointer {
    fn press(button: &'static str, x: i32, y: i32) -> Self {
        Self {
            kind: "Press",
            button: Some(button),
            at: (x, y),
        }
    }

    fn release(button: &'static str, x: i32, y: i32) -> Self {
        Self {
            kind: "Release",
            button: Some(button),
            at: (x, y),
        }
    }

    fn moved(x: i32, y: i32) -> Self {
        Self {
            kind: "Move",
            button: None,
            at: (x, y),
        }
    }
}

impl Event for Pointer {
    type Kind = String;

    fn kind(&self) -> Self::Kind {
        self.kind.to_string()
    }

    fn matches(&self, transition: &Transition<Self>) -> bool {
        match (self.button, transition.match_args().first()) {
            (Some(button), Some(arg)) => arg == button,
            _ => true,
        }
    }
}

const DRAG_AND_DROP: &str = r#"{
    "config": { "record_history": true },
    "states": [
        {
            "name": "start",
            "enter": "show_idle",
            "transitions": [
                { "on": "Press", "args": ["Button1"], "to": "wait", "action": "anchor" }
            ]
        },
        {
            "name": "wait",
            "transitions": [
                { "on": "Move", "guard": "far_enough", "to": "drag" },
                { "on": "Release", "args": ["Button1"], "to": "start" }
            ]
        },
        {
            "name": "drag",
            "leave": "drop",
            "transitions": [
                { "on": "Move", "action": "follow" },
                { "on": "Release", "args": ["Button1"], "to": "start" }
            ]
        }
    ]
}"#;

struct Desk {
    anchor: Rc<Cell<(i32, i32)>>,
    log: Rc<RefCell<Vec<String>>>,
}

impl Desk {
    fn new() -> Self {
        Self {
            anchor: Rc::new(Cell::new((0, 0))),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn registry(&self) -> Registry<Pointer> {
        let anchor = Rc::clone(&self.anchor);
        let distance = Rc::clone(&self.anchor);
        let idle = Rc::clone(&self.log);
        let dropped = Rc::clone(&self.log);
        let follow = Rc::clone(&self.log);
        Registry::new()
            .hook("show_idle", move || idle.borrow_mut().push("idle".to_string()))
            .hook("drop", move || dropped.borrow_mut().push("drop".to_string()))
            .action("anchor", move |p: &Pointer| anchor.set(p.at))
            .action("follow", move |p: &Pointer| {
                follow.borrow_mut().push(format!("at {},{}", p.at.0, p.at.1))
            })
            .guard("far_enough", move |p: &Pointer| {
                let (x0, y0) = distance.get();
                (p.at.0 - x0).abs() > 5 || (p.at.1 - y0).abs() > 5
            })
    }
}

#[test]
fn json_definition_drives_the_drag_and_drop_scenario() {
    let desk = Desk::new();
    let definition: MachineDefinition<String> = serde_json::from_str(DRAG_AND_DROP).unwrap();
    let registry = desk.registry();

    assert!(definition.validate(&registry).is_success());
    assert!(definition.config.record_history);

    let machine = definition.compile(&registry).unwrap().instantiate().unwrap();

    machine.process_event(&Pointer::press("Button1", 10, 10)).unwrap();
    machine.process_event(&Pointer::moved(12, 10)).unwrap();
    assert!(machine.is_in("wait"));

    machine.process_event(&Pointer::moved(16, 14)).unwrap();
    machine.process_event(&Pointer::moved(20, 16)).unwrap();
    assert!(machine.is_in("drag"));

    machine.process_event(&Pointer::release("Button2", 20, 16)).unwrap();
    assert!(machine.is_in("drag"));

    machine.process_event(&Pointer::release("Button1", 20, 16)).unwrap();
    assert!(machine.is_in("start"));

    assert_eq!(desk.anchor.get(), (10, 10));
    assert_eq!(*desk.log.borrow(), vec!["at 20,16", "drop", "idle"]);
    assert_eq!(
        machine.history().get_path(),
        vec!["start", "wait", "drag", "drag", "start"]
    );
}

#[test]
fn unknown_names_are_all_reported() {
    let desk = Desk::new();
    let definition: MachineDefinition<String> = serde_json::from_str(DRAG_AND_DROP).unwrap();
    let sparse = Registry::<Pointer>::new().hook("show_idle", || {});

    match definition.validate(&sparse) {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 4);
            assert!(errors
                .iter()
                .any(|e| *e == MachineError::InvalidGuard("far_enough".to_string())));
            assert!(errors
                .iter()
                .any(|e| *e == MachineError::InvalidAction("drop".to_string())));
        }
        Validation::Success(_) => panic!("Expected validation failure"),
    }

    assert!(definition.validate(&desk.registry()).is_success());
}

#[test]
fn compile_reports_the_first_unknown_name() {
    let definition: MachineDefinition<String> = serde_json::from_str(DRAG_AND_DROP).unwrap();
    let sparse = Registry::<Pointer>::new().hook("show_idle", || {});

    assert_eq!(
        definition.compile(&sparse).err(),
        Some(MachineError::InvalidAction("anchor".to_string()))
    );
}

#[test]
fn templates_from_one_definition_share_identity() {
    let desk = Desk::new();
    let definition: MachineDefinition<String> = serde_json::from_str(DRAG_AND_DROP).unwrap();
    let template = definition.compile(&desk.registry()).unwrap();

    let first = template.instantiate().unwrap();
    let second = template.instantiate().unwrap();

    assert_eq!(first.find_state("wait"), second.find_state("wait"));
    assert_eq!(
        first.all_states().map(|s| s.id()).collect::<Vec<_>>(),
        second.all_states().map(|s| s.id()).collect::<Vec<_>>()
    );
}
