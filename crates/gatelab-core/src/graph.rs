//! The circuit graph: authoritative node and wire storage.
//!
//! Nodes are NAND gates, input switches, or output LEDs; wires are directed
//! edges from an output pin to an input pin. The graph enforces exactly one
//! invariant of its own: at most one wire may terminate at a given
//! `(node, pin)` pair -- connecting onto an occupied pin silently replaces
//! the previous wire. Fan-out from a single output pin is unrestricted.
//!
//! All rejections the editing surface can provoke (self-connection, wiring
//! into an input switch, deleting a challenge-fixed node) are silent no-ops
//! by design; the only hard errors are genuine API misuse, reported via
//! [`GraphError`].

use crate::id::{NodeId, WireId};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    #[error("node is not an input switch: {0:?}")]
    NotAnInput(NodeId),
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Canvas position of a node. Presentational only -- simulation semantics
/// never read it, but challenge setups specify layout through it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// What a node is. Each variant carries only the fields that kind needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A two-input NAND gate, the sole logic primitive.
    Gate,
    /// A user-toggleable source driving a boolean onto its output pin.
    Input { value: bool },
    /// A sink reporting the boolean driven into its single input pin.
    Output,
}

impl NodeKind {
    /// Number of input pins a node of this kind exposes.
    pub fn input_pins(self) -> u8 {
        match self {
            NodeKind::Gate => 2,
            NodeKind::Input { .. } => 0,
            NodeKind::Output => 1,
        }
    }

    /// Whether a node of this kind has an output pin to drive wires from.
    pub fn has_output_pin(self) -> bool {
        !matches!(self, NodeKind::Output)
    }
}

/// Per-node data stored in the circuit graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Display label ("A", "OUT", ...). Inputs/outputs from a challenge
    /// setup carry one; toolbox gates usually don't.
    #[serde(default)]
    pub label: Option<String>,
    pub pos: Position,
    /// Part of the active challenge's fixed setup; protected from deletion.
    #[serde(default)]
    pub fixed: bool,
}

/// A directed wire: output pin of `from` into input pin `to_pin` of `to`.
/// `from_pin` is always 0 today (every driving node has a single output),
/// kept explicit so the wire record matches the pin addressing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub from: NodeId,
    pub from_pin: u8,
    pub to: NodeId,
    pub to_pin: u8,
}

// ---------------------------------------------------------------------------
// CircuitGraph
// ---------------------------------------------------------------------------

/// The circuit graph: nodes and wires in slotmaps, each graph owning its
/// own id sequence. A directed multigraph -- nothing here prevents cycles;
/// the propagation engine is expected to tolerate them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircuitGraph {
    nodes: SlotMap<NodeId, Node>,
    wires: SlotMap<WireId, Wire>,
}

impl CircuitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node operations ---

    /// Insert a node. Always succeeds.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    /// Insert an unlabeled NAND gate at `pos`.
    pub fn add_gate(&mut self, pos: Position) -> NodeId {
        self.add_node(Node {
            kind: NodeKind::Gate,
            label: None,
            pos,
            fixed: false,
        })
    }

    /// Insert an input switch at `pos` with the given initial value.
    pub fn add_input(&mut self, pos: Position, value: bool) -> NodeId {
        self.add_node(Node {
            kind: NodeKind::Input { value },
            label: None,
            pos,
            fixed: false,
        })
    }

    /// Insert an output LED at `pos`.
    pub fn add_output(&mut self, pos: Position) -> NodeId {
        self.add_node(Node {
            kind: NodeKind::Output,
            label: None,
            pos,
            fixed: false,
        })
    }

    /// Remove a node, cascading deletion of every wire that references it
    /// as source or destination. Returns `false` without touching anything
    /// if the node does not exist or is part of a fixed challenge setup.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        match self.nodes.get(id) {
            None => false,
            Some(node) if node.fixed => false,
            Some(_) => {
                self.nodes.remove(id);
                self.wires.retain(|_, w| w.from != id && w.to != id);
                true
            }
        }
    }

    /// Set the stored value of an input switch.
    pub fn set_input_value(&mut self, id: NodeId, value: bool) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        match &mut node.kind {
            NodeKind::Input { value: stored } => {
                *stored = value;
                Ok(())
            }
            _ => Err(GraphError::NotAnInput(id)),
        }
    }

    /// Flip the stored value of an input switch.
    pub fn toggle_input(&mut self, id: NodeId) -> Result<bool, GraphError> {
        let node = self.nodes.get_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        match &mut node.kind {
            NodeKind::Input { value } => {
                *value = !*value;
                Ok(*value)
            }
            _ => Err(GraphError::NotAnInput(id)),
        }
    }

    // --- Wire operations ---

    /// Connect an output pin to an input pin. Rejections are silent
    /// (`None`): self-connection, a missing endpoint, a source without an
    /// output pin (output LEDs), or a destination pin the target kind does
    /// not have. If the destination pin is already occupied, the previous
    /// wire is removed first; its id is reported alongside the new wire.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_pin: u8,
        to: NodeId,
        to_pin: u8,
    ) -> Option<Connected> {
        if from == to {
            return None;
        }
        let source = self.nodes.get(from)?;
        let dest = self.nodes.get(to)?;
        if !source.kind.has_output_pin() || from_pin != 0 {
            return None;
        }
        if to_pin >= dest.kind.input_pins() {
            return None;
        }

        let replaced = self.wire_to(to, to_pin);
        if let Some(old) = replaced {
            self.wires.remove(old);
        }
        let wire = self.wires.insert(Wire {
            from,
            from_pin,
            to,
            to_pin,
        });
        Some(Connected { wire, replaced })
    }

    /// Remove a wire. Returns `false` if it does not exist.
    pub fn disconnect(&mut self, id: WireId) -> bool {
        self.wires.remove(id).is_some()
    }

    /// The wire currently occupying `(node, pin)`, if any.
    pub fn wire_to(&self, node: NodeId, pin: u8) -> Option<WireId> {
        self.wires
            .iter()
            .find(|(_, w)| w.to == node && w.to_pin == pin)
            .map(|(id, _)| id)
    }

    // --- Queries ---

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> {
        self.wires.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Drop every node and wire. Used when loading a challenge setup.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.wires.clear();
    }
}

/// Result of a successful [`CircuitGraph::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connected {
    /// The newly inserted wire.
    pub wire: WireId,
    /// The wire that previously occupied the destination pin, if any.
    /// Already removed from the graph by the time this is returned.
    pub replaced: Option<WireId>,
}

// ===========================================================================
// Tests
// ===========================================================================
