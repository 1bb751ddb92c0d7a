//! Ambient Values
//!
//! Some values are needed by many nodes but are not part of the patch: the
//! rendering device, a shared clock, the output canvas. Wiring them through
//! links would clutter every graph, so they live in [`Context`] cells
//! instead.
//!
//! # Injection
//!
//! Contexts are not looked up by name. Whoever builds the
//! [`NodeRegistry`](crate::graph::NodeRegistry) hands each node type the
//! contexts it needs by capturing them in its factory. A node type that needs
//! a device therefore says so in its constructor signature, and a test can
//! substitute its own cell.

mod context;

pub use context::{Context, SubscriberId};
