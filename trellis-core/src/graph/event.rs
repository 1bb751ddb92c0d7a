//! Node Events
//!
//! Nodes never call into the graph. Every topology change or output firing is
//! appended to the node's outbox as a [`NodeEvent`], and the graph drains that
//! outbox right after each call it makes into the node. This keeps the
//! ordering of link purges and propagation explicit: it happens at a known
//! point in [`Graph`](super::Graph), not inside a subscriber callback.
//!
//! Port changes and errors are also forwarded to the graph's outbound
//! notification list so a transport can mirror them to an editor. Firings and
//! queued patches are internal and stay in the graph.

use serde::Serialize;

use super::address::{NodeId, ParamAddress};
use super::schema::PortKind;
use crate::value::{ParamData, State};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum NodeEvent {
    /// A port was registered. `value` is the initial value of valued ports.
    PortAdded {
        address: ParamAddress,
        kind: PortKind,
        value: Option<ParamData>,
    },

    /// A parameter or trigger parameter was removed.
    ParameterRemoved { address: ParamAddress },

    /// A valued output or output trigger was removed.
    OutputRemoved { address: ParamAddress },

    /// An output fired, either with a new value or as a bare trigger.
    Fired { address: ParamAddress },

    /// A patch addressed to another node, merged into the graph's pending
    /// patches like [`Graph::add_to_node_state`](super::Graph::add_to_node_state).
    PatchQueued { node: NodeId, state: State },

    /// The node's own logic failed.
    Error { node: NodeId, message: String },
}
