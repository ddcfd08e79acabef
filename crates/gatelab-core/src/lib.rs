//! Gatelab Core -- the combinational circuit simulator behind the
//! visual circuit workshop.
//!
//! Models a circuit as a directed multigraph of nodes (NAND gates, input
//! switches, output LEDs) connected by wires, and evaluates it with a
//! bounded fixed-point propagation pass. NAND is the sole gate primitive;
//! every other gate is a composition built by wiring.
//!
//! # Key Types
//!
//! - [`graph::CircuitGraph`] -- authoritative node/wire storage with the
//!   single-occupancy input-pin invariant, cascade deletion, and fixed-node
//!   protection.
//! - [`signal::SignalMap`] -- derived per-node resolved values, recomputed
//!   from a graph snapshot by [`signal::propagate`]. Absence from the map
//!   means "indeterminate", never an error.
//!
//! # Propagation Model
//!
//! The evaluator is an iterative fixed point, not a topological sort: the
//! graph may be under-connected or even cyclic at any moment while the
//! user is editing. Resolution is monotonic (a node, once resolved, never
//! changes within a pass run) and capped at [`signal::MAX_PASSES`]
//! iterations, so a miswired feedback loop leaves its nodes unresolved
//! instead of hanging the caller.

pub mod graph;
pub mod id;
pub mod signal;
