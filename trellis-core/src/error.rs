//! Error Types
//!
//! Topology mistakes (unknown nodes, ports of the wrong kind, duplicate
//! names) indicate a bug in whoever is building the graph. They are returned
//! synchronously from the call that made them and are never swallowed.
//!
//! Errors raised inside a concrete node type are not represented here; nodes
//! report those through [`Node::report_error`](crate::graph::Node::report_error).

use thiserror::Error;

use crate::graph::{NodeId, ParamAddress, PortKind, ValueKind};

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Which family of ports a lookup expected to find a name in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortFamily {
    /// Valued parameters and trigger parameters.
    Input,
    /// Valued outputs and output triggers.
    Output,
    /// Exactly one kind of port.
    Exact(PortKind),
}

impl std::fmt::Display for PortFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortFamily::Input => f.write_str("input"),
            PortFamily::Output => f.write_str("output"),
            PortFamily::Exact(kind) => write!(f, "{kind:?}"),
        }
    }
}

/// Why a port registration did not fit the node type's schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{kind:?} port is not declared by the node type")]
    Undeclared { kind: PortKind },

    #[error("declared as {declared:?}, registered as {requested:?}")]
    WrongKind {
        declared: PortKind,
        requested: PortKind,
    },

    #[error("expected a {expected:?} value, got {found}")]
    WrongValue {
        expected: ValueKind,
        found: &'static str,
    },
}

/// Errors returned by graph construction and maintenance.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node '{0}' does not exist")]
    NodeNotFound(NodeId),

    #[error("node '{0}' already exists")]
    DuplicateNode(NodeId),

    #[error("port '{address}' already exists in the {family} namespace")]
    DuplicatePort {
        address: ParamAddress,
        family: PortFamily,
    },

    #[error("no {family} port named '{address}'")]
    PortNotFound {
        address: ParamAddress,
        family: PortFamily,
    },

    #[error("'{0}' is not an output")]
    NotAnOutput(ParamAddress),

    #[error("'{0}' is not an input")]
    NotAnInput(ParamAddress),

    #[error("port '{address}' violates its node schema: {violation}")]
    Schema {
        address: ParamAddress,
        #[source]
        violation: SchemaViolation,
    },

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("node '{0}' has no type tag and cannot be saved")]
    UntypedNode(NodeId),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("messagepack error: {0}")]
    MessagePack(#[from] rmp_serde::decode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_address() {
        let err = GraphError::PortNotFound {
            address: ParamAddress::new("osc", "freq"),
            family: PortFamily::Exact(PortKind::OutValue),
        };
        assert_eq!(err.to_string(), "no OutValue port named 'osc.freq'");

        let err = GraphError::DuplicatePort {
            address: ParamAddress::new("osc", "freq"),
            family: PortFamily::Input,
        };
        assert_eq!(
            err.to_string(),
            "port 'osc.freq' already exists in the input namespace"
        );
    }
}
