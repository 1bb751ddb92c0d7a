//! Dataflow Graph
//!
//! This module implements the node graph runtime: nodes with named ports, the
//! link registry connecting outputs to inputs, and the tick scheduler that
//! moves state and trigger pulses between them.
//!
//! # Overview
//!
//! - A [`Node`] exposes parameters, trigger parameters, valued outputs and
//!   output triggers, and holds committed plus pending state.
//! - [`Links`] records directed edges `(node, output) -> (node, input)`.
//! - [`Graph`] owns both and runs the two phase tick: commit pending state,
//!   then deliver queued propagations.
//!
//! # Design Decisions
//!
//! 1. Nodes talk to the graph only through an outbox of [`NodeEvent`]s that
//!    the graph drains after each call into a node. Link purges on port
//!    removal and propagation on output firing are direct method calls on the
//!    graph, in a known order.
//!
//! 2. Values forwarded over a link become visible on the next tick, never in
//!    the tick they were read. This makes feedback loops advance one hop per
//!    tick rather than recurse.
//!
//! 3. The graph does not detect cycles; wiring one is the caller's choice.

mod address;
mod event;
mod links;
mod node;
mod registry;
mod scheduler;
mod schema;

pub use address::{Link, NodeId, ParamAddress};
pub use event::NodeEvent;
pub use links::{LinkedInputs, Links, TriggerQueue};
pub use node::{Node, NodeBehavior, TriggerFn};
pub use registry::{NodeFactory, NodeRegistry};
pub use scheduler::{Graph, TickReport};
pub use schema::{NodeSchema, PortKind, PortSpec, ValueKind};
