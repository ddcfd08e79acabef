//! Challenge specifications and grading for the circuit workshop.
//!
//! A [`Challenge`] is an immutable target: a fixed layout of input switches
//! and output LEDs plus a [`TestSpec`] describing the boolean function the
//! user's wiring must implement. The [`verify`] module grades a circuit by
//! brute-force truth-table enumeration; [`progress`] tracks the persisted
//! set of completed challenges; [`session`] is the owning controller that
//! ties graph mutations, signal recomputation, and re-verification together.

pub mod presets;
pub mod progress;
pub mod session;
pub mod verify;

use gatelab_core::graph::Position;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Challenge setup
// ---------------------------------------------------------------------------

/// An input switch in a challenge's fixed layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSetup {
    pub label: String,
    /// Value the switch starts at when the challenge loads.
    pub value: bool,
    pub pos: Position,
}

/// An output LED in a challenge's fixed layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSetup {
    pub label: String,
    pub pos: Position,
}

// ---------------------------------------------------------------------------
// Target functions
// ---------------------------------------------------------------------------

/// Named boolean functions a challenge can demand. All are n-ary over the
/// challenge's inputs except `Not`, which requires exactly one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFn {
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
    Xnor,
}

impl TargetFn {
    /// The expected single output for `inputs`, or `None` if the arity
    /// does not fit (a mis-sized setup is simply never satisfied).
    pub fn apply(self, inputs: &[bool]) -> Option<bool> {
        match self {
            TargetFn::Not => match inputs {
                &[a] => Some(!a),
                _ => None,
            },
            _ if inputs.is_empty() => None,
            TargetFn::And => Some(inputs.iter().all(|&v| v)),
            TargetFn::Or => Some(inputs.iter().any(|&v| v)),
            TargetFn::Nand => Some(!inputs.iter().all(|&v| v)),
            TargetFn::Nor => Some(!inputs.iter().any(|&v| v)),
            TargetFn::Xor => Some(inputs.iter().filter(|&&v| v).count() % 2 == 1),
            TargetFn::Xnor => Some(inputs.iter().filter(|&&v| v).count() % 2 == 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Test specification
// ---------------------------------------------------------------------------

/// The grading predicate: does `outputs` match what the challenge demands
/// for `inputs`?
#[derive(Debug, Clone)]
pub enum TestSpec {
    /// A named single-output boolean function over exactly `arity` inputs.
    /// Assignments of any other width never satisfy it, so adding an extra
    /// switch to a graded challenge breaks it rather than bending the
    /// target function to the wider input list.
    Function { target: TargetFn, arity: usize },
    /// Explicit expected outputs per assignment. Row `i` holds the expected
    /// output values for the assignment whose bit `k` (LSB first) is the
    /// value of input `k`; rows must cover all `2^N` assignments.
    TruthTable(Vec<Vec<bool>>),
    /// An arbitrary code-defined predicate.
    Predicate(fn(&[bool], &[bool]) -> bool),
    /// Always satisfied. Sandbox challenges use this; the session never
    /// grades a sandbox, and an unwired graph never completes regardless.
    Any,
}

impl TestSpec {
    /// Arity-strict named function spec.
    pub fn function(target: TargetFn, arity: usize) -> Self {
        TestSpec::Function { target, arity }
    }

    /// Evaluate the predicate for one assignment.
    pub fn evaluate(&self, inputs: &[bool], outputs: &[bool]) -> bool {
        match self {
            TestSpec::Function { target, arity } => {
                if inputs.len() != *arity {
                    return false;
                }
                match (target.apply(inputs), outputs) {
                    (Some(expected), &[actual]) => actual == expected,
                    _ => false,
                }
            }
            TestSpec::TruthTable(rows) => {
                let index = inputs
                    .iter()
                    .enumerate()
                    .fold(0usize, |acc, (k, &v)| acc | ((v as usize) << k));
                rows.get(index).is_some_and(|row| row.as_slice() == outputs)
            }
            TestSpec::Predicate(pred) => pred(inputs, outputs),
            TestSpec::Any => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

/// An immutable challenge specification. Loading one into a session fully
/// resets the graph to the `inputs`/`outputs` layout.
#[derive(Debug, Clone)]
pub struct Challenge {
    /// Stable identifier; the persisted completion set is keyed by it.
    pub id: String,
    pub name: String,
    pub description: String,
    pub hint: String,
    /// Sandbox challenges are never graded and their setup nodes are not
    /// protected from deletion.
    pub sandbox: bool,
    pub inputs: Vec<InputSetup>,
    pub outputs: Vec<OutputSetup>,
    pub test: TestSpec,
}

// ===========================================================================
// Tests
// ===========================================================================
