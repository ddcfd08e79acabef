//! The owning controller for an interactive circuit session.
//!
//! A [`Session`] exclusively owns the circuit graph. Every mutation flows
//! through it: apply the graph operation, recompute the displayed signal
//! map, and -- for a non-sandbox challenge -- re-run verification. The
//! verification trigger is this explicit call chain, not a reactive
//! subscription, which keeps the core framework-agnostic.
//!
//! All of this runs synchronously on the caller's thread and completes
//! before the mutating call returns: propagation is bounded by its pass
//! cap and verification by `2^N` assignments over small N.

use crate::Challenge;
use crate::progress::{ChallengeState, CompletionSet};
use crate::verify::verify;
use gatelab_core::graph::{CircuitGraph, Connected, GraphError, Node, NodeKind, Position};
use gatelab_core::id::{NodeId, WireId};
use gatelab_core::signal::{Signal, SignalMap, propagate};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// State transitions a session reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The active challenge passed verification for the first time.
    ChallengeCompleted { id: String },
    /// Connecting onto an occupied pin displaced an existing wire.
    WireReplaced { old: WireId, new: WireId },
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An interactive editing session: one graph, one active challenge, the
/// user's accumulated completions, and the derived signal map.
#[derive(Debug)]
pub struct Session {
    graph: CircuitGraph,
    challenge: Challenge,
    /// Input switches in creation order: challenge setup first, then any
    /// the user added. Verification enumerates assignments over this list.
    input_ids: Vec<NodeId>,
    /// Output LEDs in creation order, read back in this order.
    output_ids: Vec<NodeId>,
    completions: CompletionSet,
    signals: SignalMap,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Start a session on a challenge with a fresh completion record.
    pub fn new(challenge: Challenge) -> Self {
        Self::with_completions(challenge, CompletionSet::new())
    }

    /// Start a session with previously persisted completions.
    pub fn with_completions(challenge: Challenge, completions: CompletionSet) -> Self {
        let mut session = Session {
            graph: CircuitGraph::new(),
            challenge: challenge.clone(),
            input_ids: Vec::new(),
            output_ids: Vec::new(),
            completions,
            signals: SignalMap::default(),
            events: Vec::new(),
        };
        session.load_challenge(challenge);
        session
    }

    /// Switch to a challenge: full graph reset to its setup. The setup's
    /// switches and LEDs are protected from deletion unless the challenge
    /// is a sandbox. Completions and undrained events carry over untouched.
    pub fn load_challenge(&mut self, challenge: Challenge) {
        self.graph.clear();
        self.input_ids.clear();
        self.output_ids.clear();

        let fixed = !challenge.sandbox;
        for setup in &challenge.inputs {
            let id = self.graph.add_node(Node {
                kind: NodeKind::Input { value: setup.value },
                label: Some(setup.label.clone()),
                pos: setup.pos,
                fixed,
            });
            self.input_ids.push(id);
        }
        for setup in &challenge.outputs {
            let id = self.graph.add_node(Node {
                kind: NodeKind::Output,
                label: Some(setup.label.clone()),
                pos: setup.pos,
                fixed,
            });
            self.output_ids.push(id);
        }

        self.challenge = challenge;
        self.signals = propagate(&self.graph);
    }

    // --- Mutations (each recomputes signals, then re-verifies) ---

    /// Drop a NAND gate from the toolbox.
    pub fn add_gate(&mut self, pos: Position) -> NodeId {
        let id = self.graph.add_gate(pos);
        self.after_mutation();
        id
    }

    /// Drop an extra input switch from the toolbox (never protected).
    pub fn add_input(&mut self, pos: Position, value: bool) -> NodeId {
        let id = self.graph.add_input(pos, value);
        self.input_ids.push(id);
        self.after_mutation();
        id
    }

    /// Drop an extra output LED from the toolbox (never protected).
    pub fn add_output(&mut self, pos: Position) -> NodeId {
        let id = self.graph.add_output(pos);
        self.output_ids.push(id);
        self.after_mutation();
        id
    }

    /// Delete a node and its wires. Challenge-fixed nodes silently refuse.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let removed = self.graph.remove_node(id);
        if removed {
            self.input_ids.retain(|&n| n != id);
            self.output_ids.retain(|&n| n != id);
            self.after_mutation();
        }
        removed
    }

    /// Connect an output pin to an input pin (replacing any occupant).
    pub fn connect(&mut self, from: NodeId, from_pin: u8, to: NodeId, to_pin: u8) -> Option<Connected> {
        let connected = self.graph.connect(from, from_pin, to, to_pin);
        if let Some(c) = connected {
            if let Some(old) = c.replaced {
                self.events.push(SessionEvent::WireReplaced { old, new: c.wire });
            }
            self.after_mutation();
        }
        connected
    }

    /// Delete a single wire.
    pub fn disconnect(&mut self, wire: WireId) -> bool {
        let removed = self.graph.disconnect(wire);
        if removed {
            self.after_mutation();
        }
        removed
    }

    /// Flip an input switch.
    pub fn toggle_input(&mut self, id: NodeId) -> Result<bool, GraphError> {
        let value = self.graph.toggle_input(id)?;
        self.after_mutation();
        Ok(value)
    }

    /// Set an input switch to a specific value.
    pub fn set_input(&mut self, id: NodeId, value: bool) -> Result<(), GraphError> {
        self.graph.set_input_value(id, value)?;
        self.after_mutation();
        Ok(())
    }

    /// Recompute derived state and, for graded challenges, re-verify.
    fn after_mutation(&mut self) {
        self.signals = propagate(&self.graph);

        if self.challenge.sandbox {
            return;
        }
        // An unwired graph must never complete, even under a vacuous test.
        if self.graph.wire_count() == 0 {
            return;
        }
        // Completion is sticky; once recorded there is nothing to re-derive.
        if self.completions.contains(&self.challenge.id) {
            return;
        }
        if verify(&self.graph, &self.input_ids, &self.output_ids, &self.challenge.test).passed() {
            self.completions.mark_complete(&self.challenge.id);
            self.events.push(SessionEvent::ChallengeCompleted {
                id: self.challenge.id.clone(),
            });
        }
    }

    // --- Queries ---

    pub fn graph(&self) -> &CircuitGraph {
        &self.graph
    }

    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }

    /// The displayed signal map, current as of the last mutation.
    pub fn signals(&self) -> &SignalMap {
        &self.signals
    }

    pub fn signal(&self, id: NodeId) -> Option<&Signal> {
        self.signals.get(id)
    }

    pub fn input_ids(&self) -> &[NodeId] {
        &self.input_ids
    }

    pub fn output_ids(&self) -> &[NodeId] {
        &self.output_ids
    }

    pub fn completions(&self) -> &CompletionSet {
        &self.completions
    }

    /// Where the active challenge stands.
    pub fn state(&self) -> ChallengeState {
        if self.completions.contains(&self.challenge.id) {
            ChallengeState::Completed
        } else if self.graph.wire_count() > 0 {
            ChallengeState::InProgress
        } else {
            ChallengeState::NotStarted
        }
    }

    /// Take the events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;

    fn p(x: f32, y: f32) -> Position {
        Position::new(x, y)
    }

    /// Build the canonical 2-NAND AND between the AND challenge's fixed
    /// switches and LED. Returns the finishing wire's endpoints wired last.
    fn solve_and(session: &mut Session) {
        let (a, b) = (session.input_ids()[0], session.input_ids()[1]);
        let out = session.output_ids()[0];
        let n1 = session.add_gate(p(250.0, 120.0));
        let n2 = session.add_gate(p(400.0, 160.0));
        session.connect(a, 0, n1, 0).unwrap();
        session.connect(b, 0, n1, 1).unwrap();
        session.connect(n1, 0, n2, 0).unwrap();
        session.connect(n1, 0, n2, 1).unwrap();
        session.connect(n2, 0, out, 0).unwrap();
    }

    #[test]
    fn loading_a_challenge_builds_its_setup() {
        let session = Session::new(presets::and_challenge());
        assert_eq!(session.input_ids().len(), 2);
        assert_eq!(session.output_ids().len(), 1);
        assert_eq!(session.graph().wire_count(), 0);
        assert_eq!(session.state(), ChallengeState::NotStarted);

        let a = session.input_ids()[0];
        let node = session.graph().node(a).unwrap();
        assert_eq!(node.label.as_deref(), Some("A"));
        assert!(node.fixed);
    }

    #[test]
    fn solving_and_completes_the_challenge() {
        let mut session = Session::new(presets::and_challenge());
        solve_and(&mut session);

        assert_eq!(session.state(), ChallengeState::Completed);
        assert!(session.completions().contains("and"));
        assert!(session
            .drain_events()
            .contains(&SessionEvent::ChallengeCompleted { id: "and".into() }));
    }

    #[test]
    fn completion_is_sticky_after_breaking_the_wiring() {
        let mut session = Session::new(presets::and_challenge());
        solve_and(&mut session);
        assert_eq!(session.state(), ChallengeState::Completed);

        // Tear out a wire; the recorded completion must survive.
        let wire = session.graph().wires().next().map(|(id, _)| id).unwrap();
        assert!(session.disconnect(wire));
        assert_eq!(session.state(), ChallengeState::Completed);
    }

    #[test]
    fn unwired_graph_never_completes_under_vacuous_test() {
        let mut challenge = presets::and_challenge();
        challenge.test = crate::TestSpec::Any;
        let mut session = Session::new(challenge);

        // Mutations that leave the graph wireless must not complete it.
        let gate = session.add_gate(p(250.0, 150.0));
        session.remove_node(gate);
        assert_eq!(session.state(), ChallengeState::NotStarted);
        assert!(session.completions().is_empty());
    }

    #[test]
    fn sandbox_is_never_graded() {
        let mut session = Session::new(presets::sandbox());
        let a = session.input_ids()[0];
        let out = session.output_ids()[0];
        session.connect(a, 0, out, 0).unwrap();

        assert!(session.completions().is_empty());
        assert_eq!(session.state(), ChallengeState::InProgress);
    }

    #[test]
    fn fixed_setup_nodes_survive_deletion_outside_sandbox() {
        let mut session = Session::new(presets::not_challenge());
        let a = session.input_ids()[0];
        assert!(!session.remove_node(a));
        assert_eq!(session.input_ids().len(), 1);
    }

    #[test]
    fn sandbox_setup_nodes_are_deletable() {
        let mut session = Session::new(presets::sandbox());
        let a = session.input_ids()[0];
        assert!(session.remove_node(a));
        assert!(session.input_ids().is_empty());
    }

    #[test]
    fn toggling_an_input_updates_the_signal_map() {
        let mut session = Session::new(presets::not_challenge());
        let a = session.input_ids()[0];
        let out = session.output_ids()[0];
        let gate = session.add_gate(p(300.0, 150.0));
        session.connect(a, 0, gate, 0).unwrap();
        session.connect(a, 0, gate, 1).unwrap();
        session.connect(gate, 0, out, 0).unwrap();

        assert_eq!(session.signal(out).unwrap().value, true); // NOT(false)
        session.toggle_input(a).unwrap();
        assert_eq!(session.signal(out).unwrap().value, false);
    }

    #[test]
    fn replacing_a_wire_emits_an_event() {
        let mut session = Session::new(presets::sandbox());
        let a = session.input_ids()[0];
        let out = session.output_ids()[0];
        let extra = session.add_input(p(100.0, 200.0), true);

        let first = session.connect(a, 0, out, 0).unwrap();
        let second = session.connect(extra, 0, out, 0).unwrap();
        assert_eq!(second.replaced, Some(first.wire));
        assert!(session.drain_events().contains(&SessionEvent::WireReplaced {
            old: first.wire,
            new: second.wire,
        }));
        assert_eq!(session.graph().wire_count(), 1);
    }

    #[test]
    fn loading_a_new_challenge_resets_the_graph_but_keeps_completions() {
        let mut session = Session::new(presets::and_challenge());
        solve_and(&mut session);
        assert!(session.completions().contains("and"));

        session.load_challenge(presets::or_challenge());
        assert_eq!(session.graph().wire_count(), 0);
        assert_eq!(session.input_ids().len(), 2);
        assert!(session.completions().contains("and"));
        assert_eq!(session.state(), ChallengeState::NotStarted);
    }

    #[test]
    fn undrained_events_survive_a_challenge_switch() {
        let mut session = Session::new(presets::and_challenge());
        solve_and(&mut session);

        // Switch challenges before the caller drains; the completion
        // notification must still be delivered.
        session.load_challenge(presets::or_challenge());
        assert!(session
            .drain_events()
            .contains(&SessionEvent::ChallengeCompleted { id: "and".into() }));
    }

    #[test]
    fn extra_switch_breaks_a_fixed_arity_challenge() {
        let mut session = Session::new(presets::and_challenge());
        session.add_input(p(80.0, 300.0), false);
        solve_and(&mut session);
        // Three enumerated inputs against a 2-ary AND: never satisfied.
        assert_eq!(session.state(), ChallengeState::InProgress);
    }

    #[test]
    fn three_way_and_does_not_satisfy_the_two_input_challenge() {
        // A genuine AND over three switches agrees with the n-ary AND on
        // every row, but the challenge declares two inputs and must stay
        // strict about that count.
        let mut session = Session::new(presets::and_challenge());
        let (a, b) = (session.input_ids()[0], session.input_ids()[1]);
        let c = session.add_input(p(80.0, 300.0), false);
        let out = session.output_ids()[0];

        let n1 = session.add_gate(p(250.0, 100.0));
        let n2 = session.add_gate(p(350.0, 100.0));
        let n3 = session.add_gate(p(450.0, 150.0));
        let n4 = session.add_gate(p(550.0, 150.0));
        session.connect(a, 0, n1, 0).unwrap();
        session.connect(b, 0, n1, 1).unwrap();
        session.connect(n1, 0, n2, 0).unwrap();
        session.connect(n1, 0, n2, 1).unwrap(); // a AND b
        session.connect(n2, 0, n3, 0).unwrap();
        session.connect(c, 0, n3, 1).unwrap();
        session.connect(n3, 0, n4, 0).unwrap();
        session.connect(n3, 0, n4, 1).unwrap(); // (a AND b) AND c
        session.connect(n4, 0, out, 0).unwrap();

        assert_eq!(session.state(), ChallengeState::InProgress);
        assert!(session.completions().is_empty());
    }
}
