//! Node Type Registry
//!
//! Maps a type tag (as stored in a saved project or sent by an editor) to the
//! schema and factory of a concrete node type.
//!
//! Factories receive a node that already carries its id, type tag and schema,
//! and populate its ports and behavior. Whatever external resources a node
//! type needs are captured by its factory closure when it is registered, so
//! nothing is looked up by name at runtime.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::address::NodeId;
use super::node::Node;
use super::schema::NodeSchema;
use crate::error::{GraphError, Result};

/// Populates a freshly constructed node.
pub type NodeFactory = Box<dyn Fn(&mut Node) -> Result<()> + Send + Sync>;

struct Entry {
    schema: Arc<NodeSchema>,
    factory: NodeFactory,
}

#[derive(Default)]
pub struct NodeRegistry {
    types: IndexMap<String, Entry>,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node type. Registering the same tag again replaces it.
    pub fn register<F>(&mut self, type_tag: impl Into<String>, schema: NodeSchema, factory: F)
    where
        F: Fn(&mut Node) -> Result<()> + Send + Sync + 'static,
    {
        self.types.insert(
            type_tag.into(),
            Entry {
                schema: Arc::new(schema),
                factory: Box::new(factory),
            },
        );
    }

    /// Builder-style [`NodeRegistry::register`].
    pub fn with<F>(mut self, type_tag: impl Into<String>, schema: NodeSchema, factory: F) -> Self
    where
        F: Fn(&mut Node) -> Result<()> + Send + Sync + 'static,
    {
        self.register(type_tag, schema, factory);
        self
    }

    /// Construct a node of type `type_tag` with the given id.
    pub fn create(&self, type_tag: &str, id: impl Into<NodeId>) -> Result<Node> {
        let entry = self
            .types
            .get(type_tag)
            .ok_or_else(|| GraphError::UnknownNodeType(type_tag.to_owned()))?;

        let mut node = Node::new(id)
            .with_type(type_tag)
            .with_schema(Arc::clone(&entry.schema));
        (entry.factory)(&mut node)?;
        Ok(node)
    }

    /// Schema registered for `type_tag`.
    pub fn schema(&self, type_tag: &str) -> Option<&NodeSchema> {
        self.types.get(type_tag).map(|entry| entry.schema.as_ref())
    }

    /// Whether `type_tag` is registered.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.types.contains_key(type_tag)
    }

    /// Registered type tags and their schemas, in registration order.
    pub fn types(&self) -> impl Iterator<Item = (&str, &NodeSchema)> {
        self.types
            .iter()
            .map(|(tag, entry)| (tag.as_str(), entry.schema.as_ref()))
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}
