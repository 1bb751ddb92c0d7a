//! Trellis Core
//!
//! This crate provides the runtime behind the Trellis patching environment:
//! a graph of nodes with typed input and output ports, wired by links and
//! advanced in discrete ticks.
//!
//! - Nodes, ports, links and the two-phase tick scheduler
//! - A registry of node types with declared port schemas
//! - Ambient context cells injected into node factories
//! - Saved projects, transport commands and an async tick driver
//!
//! # Architecture
//!
//! - `value`: parameter values and node state maps
//! - `graph`: nodes, links, schemas, the registry and the scheduler
//! - `reactive`: observable context cells
//! - `nodes`: the built-in node types
//! - `project`: saving and replaying a graph
//! - `command`: editor commands and the session they drive
//! - `driver`: the tokio tick loop
//! - `config`: engine settings
//!
//! # Example
//!
//! ```rust
//! use trellis_core::graph::{Graph, ParamAddress};
//! use trellis_core::nodes::builtin_registry;
//! use trellis_core::reactive::Context;
//! use trellis_core::value::ParamData;
//!
//! let registry = builtin_registry(Context::empty());
//! let mut graph = Graph::new();
//! graph.add_node(registry.create("counter", "counter").unwrap()).unwrap();
//! graph.add_node(registry.create("monitor", "display").unwrap()).unwrap();
//! graph
//!     .add_link(
//!         &ParamAddress::new("counter", "count"),
//!         &ParamAddress::new("display", "value"),
//!     )
//!     .unwrap();
//!
//! // One tick to forward the value, one to commit it.
//! graph.tick();
//! graph.tick();
//! assert_eq!(graph.node("display").unwrap().state()["value"], ParamData::from(0));
//! ```

pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod graph;
pub mod nodes;
pub mod project;
pub mod reactive;
pub mod value;

pub use command::{Command, Session};
pub use config::EngineConfig;
pub use driver::Driver;
pub use error::{GraphError, Result};
pub use graph::{Graph, Node, NodeId, ParamAddress};
pub use project::Project;
pub use value::{ParamData, State};
