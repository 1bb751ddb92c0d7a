//! Saved Projects
//!
//! A project is the minimal description needed to rebuild a graph:
//!
//! ```json
//! {
//!   "nodes": [{ "id": "counter", "type": "counter", "state": { "step": 1 } }],
//!   "links": [{ "output": ["counter", "count"], "input": ["display", "value"] }]
//! }
//! ```
//!
//! Replaying one builds every node through a [`NodeRegistry`], merges each
//! node's saved state as a pending patch, commits once so that values exist
//! before anything is wired, and only then adds the links. Links from outputs
//! that already hold a value queue their initial propagation like any other
//! `add_link`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Link, NodeId, NodeRegistry};
use crate::value::State;

/// One saved node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub state: State,
}

/// A saved graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Project {
    /// Parse a saved project.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON, as written to disk.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Graph {
    /// Rebuild `project` into this graph, on top of whatever it already holds.
    pub fn load_project(&mut self, project: &Project, registry: &NodeRegistry) -> Result<()> {
        for record in &project.nodes {
            let node = registry.create(&record.node_type, record.id.clone())?;
            self.add_node(node)?;
            self.add_to_node_state(record.id.as_str(), record.state.clone())?;
        }

        let committed = self.commit_phase();

        for link in &project.links {
            self.add_link(&link.output, &link.input)?;
        }

        info!(
            nodes = project.nodes.len(),
            links = project.links.len(),
            committed,
            "project loaded"
        );
        Ok(())
    }

    /// Describe the current graph. Every node needs a type tag.
    pub fn to_project(&self) -> Result<Project> {
        let nodes = self
            .nodes()
            .map(|node| -> Result<NodeRecord> {
                let node_type = node
                    .type_tag()
                    .ok_or_else(|| GraphError::UntypedNode(node.id().clone()))?;
                Ok(NodeRecord {
                    id: node.id().clone(),
                    node_type: node_type.to_owned(),
                    state: node.state().clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Project {
            nodes,
            links: self.links().iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use crate::nodes::builtin_registry;
    use crate::reactive::Context;
    use crate::value::ParamData;

    const PATCH: &str = r#"{
        "nodes": [
            { "id": "k", "type": "constant", "state": { "value": 4 } },
            { "id": "m", "type": "monitor" }
        ],
        "links": [
            { "output": ["k", "value"], "input": ["m", "value"] }
        ]
    }"#;

    #[test]
    fn replay_commits_before_linking() {
        let registry = builtin_registry(Context::empty());
        let project = Project::from_json(PATCH).unwrap();

        let mut graph = Graph::new();
        graph.load_project(&project, &registry).unwrap();

        // Saved state is committed, and the constant already republished it.
        assert_eq!(graph.node("k").unwrap().state()["value"], ParamData::from(4));
        assert_eq!(
            graph.node("k").unwrap().output_value("value"),
            Some(&ParamData::from(4))
        );
        // The link picked it up as an initial propagation.
        assert_eq!(graph.pending_triggers().len(), 1);

        graph.tick();
        graph.tick();
        assert_eq!(graph.node("m").unwrap().state()["value"], ParamData::from(4));
    }

    #[test]
    fn save_round_trips_through_replay() {
        let registry = builtin_registry(Context::empty());
        let mut graph = Graph::new();
        graph
            .load_project(&Project::from_json(PATCH).unwrap(), &registry)
            .unwrap();
        graph.tick();
        graph.tick();

        let saved = graph.to_project().unwrap();
        assert_eq!(saved.links.len(), 1);
        assert_eq!(saved.nodes[1].state["value"], ParamData::from(4));

        let mut copy = Graph::new();
        copy.load_project(&Project::from_json(&saved.to_json().unwrap()).unwrap(), &registry)
            .unwrap();
        assert_eq!(copy.to_project().unwrap(), saved);
    }

    #[test]
    fn unknown_types_and_bad_links_fail_loudly() {
        let registry = builtin_registry(Context::empty());

        let unknown = Project::from_json(r#"{"nodes": [{"id": "x", "type": "reverb"}]}"#).unwrap();
        assert!(matches!(
            Graph::new().load_project(&unknown, &registry),
            Err(GraphError::UnknownNodeType(_))
        ));

        let dangling = Project::from_json(
            r#"{"nodes": [{"id": "m", "type": "monitor"}],
                "links": [{"output": ["k", "value"], "input": ["m", "value"]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            Graph::new().load_project(&dangling, &registry),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn untyped_nodes_cannot_be_saved() {
        let mut graph = Graph::new();
        graph.add_node(Node::new("bare")).unwrap();
        assert!(matches!(
            graph.to_project(),
            Err(GraphError::UntypedNode(_))
        ));
    }
}
