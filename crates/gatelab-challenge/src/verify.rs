//! Brute-force truth-table verification of a circuit against a challenge.
//!
//! Every one of the `2^N` assignments to the challenge's input switches is
//! propagated through an independent, fully local pass -- the live graph
//! values and the displayed signal map are never touched. Cost doubles per
//! input; this is a documented scaling boundary (fine for the handful of
//! inputs pedagogical challenges use, prohibitive past ~8-10), not an
//! enforced limit.

use crate::TestSpec;
use gatelab_core::graph::CircuitGraph;
use gatelab_core::id::NodeId;
use gatelab_core::signal::propagate_with_inputs;
use slotmap::SecondaryMap;

/// Outcome of a verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every assignment satisfied the test.
    Passed,
    /// The first assignment that did not, with the outputs it produced.
    Failed {
        inputs: Vec<bool>,
        outputs: Vec<bool>,
    },
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }
}

/// Check whether `graph` implements `test` over the given input switches
/// and output LEDs (both in challenge declaration order).
///
/// For each assignment: bit `k` (LSB first) of the enumeration counter is
/// the value of input `k`; outputs are read in order, with unresolved
/// outputs treated as `false`; the first failing assignment short-circuits.
pub fn verify(
    graph: &CircuitGraph,
    inputs: &[NodeId],
    outputs: &[NodeId],
    test: &TestSpec,
) -> Verdict {
    // Saturate at u64::MAX rather than overflowing the shift for 64+
    // inputs; a fixed-arity test fails long before the range matters.
    let combinations = 1u64
        .checked_shl(inputs.len() as u32)
        .unwrap_or(u64::MAX);
    for bits in 0..combinations {
        let assignment: Vec<bool> = (0..inputs.len()).map(|k| bits >> k & 1 == 1).collect();

        let mut seeds: SecondaryMap<NodeId, bool> = SecondaryMap::new();
        for (&id, &value) in inputs.iter().zip(&assignment) {
            seeds.insert(id, value);
        }
        let signals = propagate_with_inputs(graph, &seeds);

        let observed: Vec<bool> = outputs
            .iter()
            .map(|&id| signals.get(id).map(|s| s.value).unwrap_or(false))
            .collect();

        if !test.evaluate(&assignment, &observed) {
            return Verdict::Failed {
                inputs: assignment,
                outputs: observed,
            };
        }
    }
    Verdict::Passed
}

// ===========================================================================
// Tests
// ===========================================================================
