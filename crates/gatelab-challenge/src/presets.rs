//! The built-in challenge pack: NOT, AND, OR, and the free-build sandbox.
//!
//! Layouts, labels, and hints follow the original workshop's presets.

use crate::{Challenge, InputSetup, OutputSetup, TargetFn, TestSpec};
use gatelab_core::graph::Position;

fn input(label: &str, x: f32, y: f32, value: bool) -> InputSetup {
    InputSetup {
        label: label.to_owned(),
        value,
        pos: Position::new(x, y),
    }
}

fn output(label: &str, x: f32, y: f32) -> OutputSetup {
    OutputSetup {
        label: label.to_owned(),
        pos: Position::new(x, y),
    }
}

/// Invert the input using a single NAND with tied pins.
pub fn not_challenge() -> Challenge {
    Challenge {
        id: "not".to_owned(),
        name: "Build NOT".to_owned(),
        description: "Invert input using 1 NAND".to_owned(),
        hint: "Connect both NAND inputs together".to_owned(),
        sandbox: false,
        inputs: vec![input("A", 100.0, 150.0, false)],
        outputs: vec![output("OUT", 500.0, 150.0)],
        test: TestSpec::function(TargetFn::Not, 1),
    }
}

/// A AND B from two NANDs (NAND, then invert the result).
pub fn and_challenge() -> Challenge {
    Challenge {
        id: "and".to_owned(),
        name: "Build AND".to_owned(),
        description: "A AND B using 2 NANDs".to_owned(),
        hint: "NAND then invert with another NAND".to_owned(),
        sandbox: false,
        inputs: vec![
            input("A", 80.0, 100.0, false),
            input("B", 80.0, 220.0, false),
        ],
        outputs: vec![output("OUT", 550.0, 160.0)],
        test: TestSpec::function(TargetFn::And, 2),
    }
}

/// A OR B from three NANDs (NOT each input, NAND the results).
pub fn or_challenge() -> Challenge {
    Challenge {
        id: "or".to_owned(),
        name: "Build OR".to_owned(),
        description: "A OR B using 3 NANDs".to_owned(),
        hint: "NOT both inputs, then NAND results".to_owned(),
        sandbox: false,
        inputs: vec![
            input("A", 80.0, 100.0, false),
            input("B", 80.0, 220.0, false),
        ],
        outputs: vec![output("OUT", 600.0, 160.0)],
        test: TestSpec::function(TargetFn::Or, 2),
    }
}

/// Free build: never graded, setup nodes unprotected.
pub fn sandbox() -> Challenge {
    Challenge {
        id: "sandbox".to_owned(),
        name: "Free Build".to_owned(),
        description: "Build anything!".to_owned(),
        hint: String::new(),
        sandbox: true,
        inputs: vec![input("A", 100.0, 100.0, false)],
        outputs: vec![output("OUT", 500.0, 100.0)],
        test: TestSpec::Any,
    }
}

/// All built-in challenges in menu order.
pub fn builtin_pack() -> Vec<Challenge> {
    vec![not_challenge(), and_challenge(), or_challenge(), sandbox()]
}
