//! Fixed-point signal propagation over a circuit graph snapshot.
//!
//! Given a [`CircuitGraph`], [`propagate`] computes the steady-state boolean
//! value of every node it can determine, returning a [`SignalMap`]. Nodes
//! whose inputs are unwired or caught in a feedback cycle are simply absent
//! from the map -- consumers must render "absent" as indeterminate/off.
//!
//! The algorithm is deliberately not a topological sort: mid-edit graphs
//! are routinely incomplete and can be cyclic. Instead, passes sweep every
//! unresolved node and resolve those whose sources are already resolved.
//! Resolution is monotonic, so the result is independent of sweep order,
//! and the pass count is capped at [`MAX_PASSES`] so a cycle stalls out
//! instead of spinning.

use crate::graph::{CircuitGraph, NodeKind};
use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

/// Upper bound on propagation passes. A generous safety valve for the
/// small pedagogical graphs this engine targets, not a convergence proof:
/// each pass resolves at least one node or the loop stops early, so depth
/// beyond this simply stays unresolved.
pub const MAX_PASSES: usize = 50;

/// The sole logic primitive. Everything else is wired compositions.
#[inline]
pub fn nand(a: bool, b: bool) -> bool {
    !(a && b)
}

/// Resolved state of a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// The value this node drives (gates, inputs) or displays (outputs).
    pub value: bool,
    /// For gates: the resolved value arriving on pin 0.
    pub pin_a: Option<bool>,
    /// For gates: the resolved value arriving on pin 1.
    pub pin_b: Option<bool>,
}

impl Signal {
    fn plain(value: bool) -> Self {
        Signal {
            value,
            pin_a: None,
            pin_b: None,
        }
    }
}

/// Derived per-node signal state. Never stored; recomputed per snapshot.
pub type SignalMap = SecondaryMap<NodeId, Signal>;

/// Propagate using each input switch's stored value as the seed.
pub fn propagate(graph: &CircuitGraph) -> SignalMap {
    let mut seeds: SecondaryMap<NodeId, bool> = SecondaryMap::new();
    for (id, node) in graph.nodes() {
        if let NodeKind::Input { value } = node.kind {
            seeds.insert(id, value);
        }
    }
    propagate_with_inputs(graph, &seeds)
}

/// Propagate with an explicit input assignment in place of the stored
/// switch values. The graph is read-only here: verification runs this per
/// truth-table row without disturbing the live values or the displayed
/// signal map. Input switches absent from `inputs` stay unresolved.
pub fn propagate_with_inputs(
    graph: &CircuitGraph,
    inputs: &SecondaryMap<NodeId, bool>,
) -> SignalMap {
    // Source node per destination input pin. Single occupancy is enforced
    // by the graph, so a plain per-pin slot suffices.
    let mut sources: SecondaryMap<NodeId, [Option<NodeId>; 2]> = SecondaryMap::new();
    for (_, wire) in graph.wires() {
        if wire.to_pin > 1 {
            continue;
        }
        if let Some(entry) = sources.entry(wire.to) {
            entry.or_insert([None, None])[wire.to_pin as usize] = Some(wire.from);
        }
    }

    let mut signals: SignalMap = SecondaryMap::new();
    for (id, node) in graph.nodes() {
        if matches!(node.kind, NodeKind::Input { .. })
            && let Some(&value) = inputs.get(id)
        {
            signals.insert(id, Signal::plain(value));
        }
    }

    for _ in 0..MAX_PASSES {
        let mut changed = false;
        for (id, node) in graph.nodes() {
            if signals.contains_key(id) {
                continue;
            }
            let pins = sources.get(id).copied().unwrap_or([None, None]);
            let resolved = match node.kind {
                NodeKind::Gate => {
                    let a = pins[0].and_then(|src| signals.get(src)).map(|s| s.value);
                    let b = pins[1].and_then(|src| signals.get(src)).map(|s| s.value);
                    match (a, b) {
                        (Some(a), Some(b)) => Some(Signal {
                            value: nand(a, b),
                            pin_a: Some(a),
                            pin_b: Some(b),
                        }),
                        _ => None,
                    }
                }
                NodeKind::Output => pins[0]
                    .and_then(|src| signals.get(src))
                    .map(|s| Signal::plain(s.value)),
                // An unseeded switch has no value to offer.
                NodeKind::Input { .. } => None,
            };
            if let Some(signal) = resolved {
                signals.insert(id, signal);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    signals
}

// ===========================================================================
// Tests
// ===========================================================================
