//! Transport Commands
//!
//! An editor talks to the engine with small commands that map one to one
//! onto graph operations. The transport that carries them (a worker message
//! port, a socket) is someone else's business; this module only decodes the
//! payloads, from JSON or MessagePack, and applies them to a [`Session`].
//!
//! ```json
//! { "type": "createLink", "output": ["counter", "count"], "input": ["display", "value"] }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::graph::{Graph, NodeEvent, NodeId, NodeRegistry, ParamAddress};
use crate::project::Project;
use crate::value::State;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    CreateNode { id: NodeId, node_type: String },
    DeleteNode { id: NodeId },
    CreateLink { output: ParamAddress, input: ParamAddress },
    DeleteLink { output: ParamAddress, input: ParamAddress },
    /// Queue a patch for the node's next commit.
    SetNodeParams { id: NodeId, params: State },
    /// Start ticking.
    Activate,
    /// Stop ticking. Pending work stays queued.
    Deactivate,
    /// Replace the whole graph with a saved project.
    LoadProject { project: Project },
    /// Drop everything and stop ticking.
    Clear,
}

impl Command {
    /// Decode a command from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a command from MessagePack, as a worker port would send it.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// A graph plus what is needed to drive it from commands.
#[derive(Debug)]
pub struct Session {
    graph: Graph,
    registry: NodeRegistry,
    active: bool,
}

impl Session {
    /// Empty session. It starts active only if the config says so.
    pub fn new(registry: NodeRegistry, config: &EngineConfig) -> Self {
        Self {
            graph: Graph::new(),
            registry,
            active: config.start_active,
        }
    }

    /// The graph being edited.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access for callers that poke nodes directly.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Node types `createNode` and `loadProject` can build.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Whether the driver should tick this session.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply one command. Graph errors are returned unchanged.
    pub fn apply(&mut self, command: Command) -> Result<()> {
        debug!(?command, "applying command");
        match command {
            Command::CreateNode { id, node_type } => {
                let node = self.registry.create(&node_type, id)?;
                self.graph.add_node(node)?;
            }
            Command::DeleteNode { id } => {
                self.graph.remove_node(id.as_str())?;
            }
            Command::CreateLink { output, input } => {
                self.graph.add_link(&output, &input)?;
            }
            Command::DeleteLink { output, input } => {
                self.graph.remove_link(&output, &input);
            }
            Command::SetNodeParams { id, params } => {
                self.graph.add_to_node_state(id.as_str(), params)?;
            }
            Command::Activate => {
                self.active = true;
                info!("tick loop activated");
            }
            Command::Deactivate => {
                self.active = false;
                info!("tick loop deactivated");
            }
            Command::LoadProject { project } => {
                self.graph.reset();
                self.graph.load_project(&project, &self.registry)?;
            }
            Command::Clear => {
                self.graph.reset();
                self.active = false;
            }
        }
        Ok(())
    }

    /// Decode a MessagePack command and apply it.
    pub fn apply_msgpack(&mut self, bytes: &[u8]) -> Result<()> {
        self.apply(Command::from_msgpack(bytes)?)
    }

    /// Tick once if active.
    pub fn tick_if_active(&mut self) -> bool {
        if self.active {
            self.graph.tick();
        }
        self.active
    }

    /// Port and error notifications for the transport to forward.
    pub fn drain_events(&mut self) -> Vec<NodeEvent> {
        self.graph.drain_notifications()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::nodes::builtin_registry;
    use crate::reactive::Context;
    use crate::value::ParamData;

    fn session() -> Session {
        Session::new(builtin_registry(Context::empty()), &EngineConfig::default())
    }

    #[test]
    fn decodes_json_commands() {
        let command = Command::from_json(
            r#"{"type": "createLink", "output": ["c", "count"], "input": ["m", "value"]}"#,
        )
        .unwrap();
        assert_eq!(
            command,
            Command::CreateLink {
                output: ParamAddress::new("c", "count"),
                input: ParamAddress::new("m", "value"),
            }
        );

        let command = Command::from_json(r#"{"type": "createNode", "id": "c", "nodeType": "counter"}"#)
            .unwrap();
        assert!(matches!(command, Command::CreateNode { node_type, .. } if node_type == "counter"));
    }

    #[test]
    fn decodes_msgpack_commands() {
        let command = Command::SetNodeParams {
            id: NodeId::from("c"),
            params: [("step".to_owned(), ParamData::from(2))].into_iter().collect(),
        };
        let bytes = rmp_serde::to_vec_named(&command).unwrap();
        assert_eq!(Command::from_msgpack(&bytes).unwrap(), command);
    }

    #[test]
    fn applies_graph_commands() {
        let mut session = session();
        for json in [
            r#"{"type": "createNode", "id": "c", "nodeType": "counter"}"#,
            r#"{"type": "createNode", "id": "m", "nodeType": "monitor"}"#,
            r#"{"type": "createLink", "output": ["c", "count"], "input": ["m", "value"]}"#,
            r#"{"type": "activate"}"#,
        ] {
            session.apply(Command::from_json(json).unwrap()).unwrap();
        }
        assert!(session.is_active());
        assert_eq!(session.graph().links().len(), 1);
        assert!(!session.drain_events().is_empty());

        session.tick_if_active();
        session.tick_if_active();
        assert_eq!(
            session.graph().node("m").unwrap().state()["value"],
            ParamData::from(0)
        );

        session
            .apply(Command::DeleteNode {
                id: NodeId::from("c"),
            })
            .unwrap();
        assert!(session.graph().links().is_empty());

        session.apply(Command::Clear).unwrap();
        assert!(!session.is_active());
        assert_eq!(session.graph().node_count(), 0);
    }

    #[test]
    fn inactive_sessions_do_not_tick() {
        let mut session = session();
        assert!(!session.tick_if_active());
        assert_eq!(session.graph().tick_count(), 0);
    }

    #[test]
    fn bad_commands_surface_errors() {
        let mut session = session();
        assert!(matches!(
            session.apply(Command::CreateNode {
                id: NodeId::from("x"),
                node_type: "reverb".to_owned()
            }),
            Err(GraphError::UnknownNodeType(_))
        ));
        assert!(matches!(
            session.apply_msgpack(&[0xc1]),
            Err(GraphError::MessagePack(_))
        ));
    }

    #[test]
    fn load_project_replaces_the_graph() {
        let mut session = session();
        session
            .apply(Command::CreateNode {
                id: NodeId::from("old"),
                node_type: "monitor".to_owned(),
            })
            .unwrap();

        let project = Project::from_json(r#"{"nodes": [{"id": "new", "type": "counter"}]}"#).unwrap();
        session.apply(Command::LoadProject { project }).unwrap();

        assert!(session.graph().node("old").is_none());
        assert!(session.graph().node("new").is_some());
    }
}
