//! Node and Port Addressing
//!
//! A port is addressed globally by the pair `(node id, port name)`. Addresses
//! are the atomic unit of linking and serialize as a two element array, e.g.
//! `["counter", "count"]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Process-unique identifier of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a node id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One parameter or output slot on one node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamAddress(pub NodeId, pub String);

impl ParamAddress {
    /// Address port `port` of node `node`.
    pub fn new(node: impl Into<NodeId>, port: impl Into<String>) -> Self {
        Self(node.into(), port.into())
    }

    /// The node half of the address.
    pub fn node(&self) -> &NodeId {
        &self.0
    }

    /// The port half of the address.
    pub fn port(&self) -> &str {
        &self.1
    }
}

impl fmt::Display for ParamAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

impl<N: Into<NodeId>, P: Into<String>> From<(N, P)> for ParamAddress {
    fn from((node, port): (N, P)) -> Self {
        Self::new(node, port)
    }
}

/// A directed edge from an output address to an input address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub output: ParamAddress,
    pub input: ParamAddress,
}

impl Link {
    /// A link from `output` to `input`. Endpoints are not checked here.
    pub fn new(output: impl Into<ParamAddress>, input: impl Into<ParamAddress>) -> Self {
        Self {
            output: output.into(),
            input: input.into(),
        }
    }

    /// Whether either endpoint lives on `node`.
    pub fn touches(&self, node: &NodeId) -> bool {
        self.output.node() == node || self.input.node() == node
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.output, self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_serializes_as_pair() {
        let address = ParamAddress::new("counter", "count");
        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            r#"["counter","count"]"#
        );

        let parsed: ParamAddress = serde_json::from_str(r#"["display","value"]"#).unwrap();
        assert_eq!(parsed.node().as_str(), "display");
        assert_eq!(parsed.port(), "value");
    }

    #[test]
    fn link_touches_either_endpoint() {
        let link = Link::new(("a", "out"), ("b", "in"));
        assert!(link.touches(&NodeId::from("a")));
        assert!(link.touches(&NodeId::from("b")));
        assert!(!link.touches(&NodeId::from("c")));
        assert_eq!(link.to_string(), "a.out -> b.in");
    }
}
