//! Graph Nodes
//!
//! A node is a unit of computation with four named port namespaces:
//!
//! - parameters: valued inputs, stored in the node's committed `state`
//! - trigger parameters: inputs bound to a callback
//! - valued outputs: the node's private `output_state`
//! - output triggers: names that fire without a value
//!
//! Parameter and trigger parameter names share one namespace; valued outputs
//! and output triggers share the other. A name may appear once on each side.
//!
//! # State
//!
//! `state` always holds the last committed values. `set_state` merges a patch
//! into the pending state (the node is then dirty) without touching `state`.
//! `commit_changes` folds the pending patch into a copy of `state` and swaps
//! it in, calling the behavior's `node_will_update` before the swap and
//! `node_did_update` after it.
//!
//! Only registered valued parameters can be patched. A key naming anything
//! else, or carrying a value the schema rejects, is dropped at commit with a
//! warning, so a patch can never create a port.
//!
//! # Behaviors
//!
//! A concrete node type is a [`NodeBehavior`] attached to a node. All of its
//! hooks are optional. Hooks receive the node itself so they can read state,
//! fire outputs and report errors. A hook that needs to poke a different node
//! calls [`Node::patch_node`]; the graph merges that patch into its pending
//! patches, so it lands in the next commit phase. Anything else a node type
//! needs (a device handle, a shared [`Context`](crate::reactive::Context)) is
//! handed to it by its factory.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::address::{NodeId, ParamAddress};
use super::event::NodeEvent;
use super::schema::{NodeSchema, PortKind};
use crate::error::{GraphError, PortFamily, Result};
use crate::value::{ParamData, State};

/// Callback bound to a trigger parameter.
pub type TriggerFn = Box<dyn FnMut(&mut Node) + Send>;

/// Lifecycle hooks of a concrete node type.
pub trait NodeBehavior: Send {
    /// The node was registered with a graph.
    fn node_did_create(&mut self, _node: &mut Node) {}

    /// A commit is about to replace `node.state()` with `next`.
    fn node_will_update(&mut self, _node: &mut Node, _next: &State) {}

    /// A commit replaced `prev` with the current `node.state()`.
    fn node_did_update(&mut self, _node: &mut Node, _prev: &State) {}

    /// The node is being removed from its graph.
    fn node_will_be_destroyed(&mut self, _node: &mut Node) {}
}

/// A node in the dataflow graph.
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// Registry tag of the node type, needed to save the node.
    type_tag: Option<String>,

    /// Port layout every `add_*` call is checked against, if any.
    schema: Option<Arc<NodeSchema>>,

    /// Last committed parameter values.
    state: State,

    /// Patches merged since the last commit. `Some` means dirty.
    new_state: Option<State>,

    /// Trigger parameters. The slot is empty while its callback runs.
    triggers: IndexMap<String, Option<TriggerFn>>,

    /// Valued outputs and their current value, if one has been set.
    output_state: IndexMap<String, Option<ParamData>>,

    out_triggers: IndexSet<String>,

    /// Events waiting for the graph to drain them.
    outbox: Vec<NodeEvent>,

    /// Taken out while one of its hooks runs.
    behavior: Option<Box<dyn NodeBehavior>>,
}

impl Node {
    /// Create a bare node with no ports and no behavior.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            type_tag: None,
            schema: None,
            state: State::new(),
            new_state: None,
            triggers: IndexMap::new(),
            output_state: IndexMap::new(),
            out_triggers: IndexSet::new(),
            outbox: Vec::new(),
            behavior: None,
        }
    }

    /// Tag the node with its registry type, which saving requires.
    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Check every later port registration against `schema`.
    pub fn with_schema(mut self, schema: Arc<NodeSchema>) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Attach the lifecycle hooks of a concrete node type.
    pub fn with_behavior(mut self, behavior: impl NodeBehavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Replace the node's behavior. Safe to call from inside a hook.
    pub fn set_behavior(&mut self, behavior: impl NodeBehavior + 'static) {
        self.behavior = Some(Box::new(behavior));
    }

    /// Get the node's ID.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Registry type, if the node was built by a registry.
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// Port layout the node is checked against, if any.
    pub fn schema(&self) -> Option<&NodeSchema> {
        self.schema.as_deref()
    }

    /// Address of one of this node's ports.
    pub fn address(&self, port: &str) -> ParamAddress {
        ParamAddress::new(self.id.clone(), port)
    }

    // ------------------------------------------------------------------
    // Port registration
    // ------------------------------------------------------------------

    /// Register a valued input.
    pub fn add_parameter(&mut self, name: &str, initial: impl Into<ParamData>) -> Result<()> {
        let initial = initial.into();
        self.ensure_free_input(name)?;
        self.validate(name, PortKind::Parameter, Some(&initial))?;

        self.state.insert(name.to_owned(), initial.clone());
        self.emit(NodeEvent::PortAdded {
            address: self.address(name),
            kind: PortKind::Parameter,
            value: Some(initial),
        });
        Ok(())
    }

    /// Register a trigger input bound to `callback`.
    pub fn add_trigger<F>(&mut self, name: &str, callback: F) -> Result<()>
    where
        F: FnMut(&mut Node) + Send + 'static,
    {
        self.ensure_free_input(name)?;
        self.validate(name, PortKind::TriggerParameter, None)?;

        self.triggers.insert(name.to_owned(), Some(Box::new(callback)));
        self.emit(NodeEvent::PortAdded {
            address: self.address(name),
            kind: PortKind::TriggerParameter,
            value: None,
        });
        Ok(())
    }

    /// Register a valued output, optionally with an initial value.
    pub fn add_out_value(&mut self, name: &str, initial: Option<ParamData>) -> Result<()> {
        self.ensure_free_output(name)?;
        self.validate(name, PortKind::OutValue, initial.as_ref())?;

        self.output_state.insert(name.to_owned(), initial.clone());
        self.emit(NodeEvent::PortAdded {
            address: self.address(name),
            kind: PortKind::OutValue,
            value: initial,
        });
        Ok(())
    }

    /// Register an output trigger.
    pub fn add_out_trigger(&mut self, name: &str) -> Result<()> {
        self.ensure_free_output(name)?;
        self.validate(name, PortKind::OutTrigger, None)?;

        self.out_triggers.insert(name.to_owned());
        self.emit(NodeEvent::PortAdded {
            address: self.address(name),
            kind: PortKind::OutTrigger,
            value: None,
        });
        Ok(())
    }

    /// Remove a parameter or trigger parameter.
    ///
    /// A valued parameter is also dropped from the pending patch.
    pub fn remove_parameter(&mut self, name: &str) -> Result<()> {
        if self.state.shift_remove(name).is_some() {
            if let Some(pending) = self.new_state.as_mut() {
                pending.shift_remove(name);
            }
        } else if self.triggers.shift_remove(name).is_none() {
            return Err(self.missing(name, PortFamily::Input));
        }

        self.emit(NodeEvent::ParameterRemoved {
            address: self.address(name),
        });
        Ok(())
    }

    /// Remove a valued output or output trigger.
    pub fn remove_output(&mut self, name: &str) -> Result<()> {
        if self.output_state.shift_remove(name).is_none() && !self.out_triggers.shift_remove(name)
        {
            return Err(self.missing(name, PortFamily::Output));
        }

        self.emit(NodeEvent::OutputRemoved {
            address: self.address(name),
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Last committed parameter values.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Merged patches waiting for the next commit.
    pub fn pending_state(&self) -> Option<&State> {
        self.new_state.as_ref()
    }

    /// Whether a patch is waiting to be committed.
    pub fn is_dirty(&self) -> bool {
        self.new_state.is_some()
    }

    /// Merge `patch` into the pending state. The last write per key wins; keys
    /// from earlier patches are kept. Keys are checked at commit, not here.
    pub fn set_state(&mut self, patch: State) {
        self.new_state.get_or_insert_with(State::new).extend(patch);
    }

    /// Queue `patch` for another node's next commit.
    pub fn patch_node(&mut self, target: impl Into<NodeId>, patch: State) {
        self.emit(NodeEvent::PatchQueued {
            node: target.into(),
            state: patch,
        });
    }

    /// Convenience for a single-key patch.
    pub fn set(&mut self, name: &str, value: impl Into<ParamData>) {
        self.new_state
            .get_or_insert_with(State::new)
            .insert(name.to_owned(), value.into());
    }

    /// Apply the pending patch. Returns `false` (and runs no hooks) when the
    /// node is clean.
    pub fn commit_changes(&mut self) -> bool {
        let Some(patch) = self.new_state.take() else {
            return false;
        };

        let mut next = self.state.clone();
        for (name, value) in patch {
            if let Err(err) = self.check_patch(&name, &value) {
                tracing::warn!(node = %self.id, port = %name, %err, "dropping patch key");
                continue;
            }
            next.insert(name, value);
        }

        self.run_hook(|behavior, node| behavior.node_will_update(node, &next));
        let prev = std::mem::replace(&mut self.state, next);
        self.run_hook(|behavior, node| behavior.node_did_update(node, &prev));

        true
    }

    // ------------------------------------------------------------------
    // Outputs and triggers
    // ------------------------------------------------------------------

    /// Current value of a valued output.
    pub fn output_value(&self, name: &str) -> Option<&ParamData> {
        self.output_state.get(name).and_then(Option::as_ref)
    }

    /// Record a new value on a valued output and fire it.
    pub fn send_out(&mut self, name: &str, value: impl Into<ParamData>) -> Result<()> {
        let Some(slot) = self.output_state.get_mut(name) else {
            return Err(self.missing(name, PortFamily::Exact(PortKind::OutValue)));
        };
        *slot = Some(value.into());

        self.emit(NodeEvent::Fired {
            address: self.address(name),
        });
        Ok(())
    }

    /// Fire an output trigger.
    pub fn trigger_out(&mut self, name: &str) -> Result<()> {
        if !self.out_triggers.contains(name) {
            return Err(self.missing(name, PortFamily::Exact(PortKind::OutTrigger)));
        }

        self.emit(NodeEvent::Fired {
            address: self.address(name),
        });
        Ok(())
    }

    /// Invoke the callback of trigger parameter `name`.
    pub fn trigger(&mut self, name: &str) -> Result<()> {
        let Some(slot) = self.triggers.get_mut(name) else {
            return Err(self.missing(name, PortFamily::Exact(PortKind::TriggerParameter)));
        };

        let Some(mut callback) = slot.take() else {
            tracing::warn!(node = %self.id, port = name, "trigger fired from its own callback; ignored");
            return Ok(());
        };

        callback(self);

        // The callback may have removed its own trigger.
        if let Some(slot @ None) = self.triggers.get_mut(name) {
            *slot = Some(callback);
        }
        Ok(())
    }

    /// Surface an error from this node's own logic. The graph logs it and
    /// forwards it to its notification list; it is never retried.
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.emit(NodeEvent::Error {
            node: self.id.clone(),
            message: message.into(),
        });
    }

    // ------------------------------------------------------------------
    // Membership queries
    // ------------------------------------------------------------------

    /// Valued parameter or trigger parameter.
    pub fn is_parameter(&self, name: &str) -> bool {
        self.is_valued_parameter(name) || self.is_trigger_parameter(name)
    }

    /// Valued output or output trigger.
    pub fn is_output(&self, name: &str) -> bool {
        self.is_valued_output(name) || self.is_trigger_output(name)
    }

    /// Trigger parameter or output trigger.
    pub fn is_trigger(&self, name: &str) -> bool {
        self.is_trigger_parameter(name) || self.is_trigger_output(name)
    }

    /// Valued parameter or valued output.
    pub fn is_valued(&self, name: &str) -> bool {
        self.is_valued_parameter(name) || self.is_valued_output(name)
    }

    /// Exactly a valued parameter.
    pub fn is_valued_parameter(&self, name: &str) -> bool {
        self.state.contains_key(name)
    }

    /// Exactly a trigger parameter.
    pub fn is_trigger_parameter(&self, name: &str) -> bool {
        self.triggers.contains_key(name)
    }

    /// Exactly a valued output.
    pub fn is_valued_output(&self, name: &str) -> bool {
        self.output_state.contains_key(name)
    }

    /// Exactly an output trigger.
    pub fn is_trigger_output(&self, name: &str) -> bool {
        self.out_triggers.contains(name)
    }

    /// Fail with [`GraphError::PortNotFound`] unless `name` is an input.
    pub fn check_parameter(&self, name: &str) -> Result<()> {
        self.check(self.is_parameter(name), name, PortFamily::Input)
    }

    /// Fail with [`GraphError::PortNotFound`] unless `name` is an output.
    pub fn check_output(&self, name: &str) -> Result<()> {
        self.check(self.is_output(name), name, PortFamily::Output)
    }

    /// Fail unless `name` is a trigger parameter.
    pub fn check_trigger(&self, name: &str) -> Result<()> {
        self.check(
            self.is_trigger_parameter(name),
            name,
            PortFamily::Exact(PortKind::TriggerParameter),
        )
    }

    /// Fail unless `name` is a valued parameter.
    pub fn check_valued(&self, name: &str) -> Result<()> {
        self.check(
            self.is_valued_parameter(name),
            name,
            PortFamily::Exact(PortKind::Parameter),
        )
    }

    /// Kind of the input (`output == false`) or output port called `name`.
    pub fn port_kind(&self, name: &str, output: bool) -> Option<PortKind> {
        if output {
            if self.is_valued_output(name) {
                Some(PortKind::OutValue)
            } else if self.is_trigger_output(name) {
                Some(PortKind::OutTrigger)
            } else {
                None
            }
        } else if self.is_valued_parameter(name) {
            Some(PortKind::Parameter)
        } else if self.is_trigger_parameter(name) {
            Some(PortKind::TriggerParameter)
        } else {
            None
        }
    }

    /// Names of all input ports, valued first.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.state
            .keys()
            .chain(self.triggers.keys())
            .map(String::as_str)
    }

    /// Names of all output ports, valued first.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.output_state
            .keys()
            .chain(self.out_triggers.iter())
            .map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Graph plumbing
    // ------------------------------------------------------------------

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<NodeEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn did_create(&mut self) {
        self.run_hook(|behavior, node| behavior.node_did_create(node));
    }

    pub(crate) fn will_be_destroyed(&mut self) {
        self.run_hook(|behavior, node| behavior.node_will_be_destroyed(node));
    }

    fn run_hook<R>(&mut self, f: impl FnOnce(&mut dyn NodeBehavior, &mut Node) -> R) -> Option<R> {
        let mut behavior = self.behavior.take()?;
        let out = f(behavior.as_mut(), self);
        // A hook may have installed a replacement behavior; keep it.
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
        Some(out)
    }

    fn emit(&mut self, event: NodeEvent) {
        self.outbox.push(event);
    }

    fn ensure_free_input(&self, name: &str) -> Result<()> {
        if self.is_parameter(name) {
            return Err(GraphError::DuplicatePort {
                address: self.address(name),
                family: PortFamily::Input,
            });
        }
        Ok(())
    }

    fn ensure_free_output(&self, name: &str) -> Result<()> {
        if self.is_output(name) {
            return Err(GraphError::DuplicatePort {
                address: self.address(name),
                family: PortFamily::Output,
            });
        }
        Ok(())
    }

    fn validate(&self, name: &str, kind: PortKind, value: Option<&ParamData>) -> Result<()> {
        let Some(schema) = &self.schema else {
            return Ok(());
        };
        schema
            .validate(name, kind, value)
            .map_err(|violation| GraphError::Schema {
                address: self.address(name),
                violation,
            })
    }

    fn check_patch(&self, name: &str, value: &ParamData) -> Result<()> {
        self.check_valued(name)?;
        self.validate(name, PortKind::Parameter, Some(value))
    }

    fn check(&self, ok: bool, name: &str, family: PortFamily) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(self.missing(name, family))
        }
    }

    fn missing(&self, name: &str, family: PortFamily) -> GraphError {
        GraphError::PortNotFound {
            address: self.address(name),
            family,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("type_tag", &self.type_tag)
            .field("state", &self.state)
            .field("new_state", &self.new_state)
            .field("triggers", &self.triggers.keys().collect::<Vec<_>>())
            .field("output_state", &self.output_state)
            .field("out_triggers", &self.out_triggers)
            .field("has_behavior", &self.behavior.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::schema::ValueKind;
    use parking_lot::Mutex;

    fn patch(entries: &[(&str, ParamData)]) -> State {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn set_state_merges_patches() {
        let mut node = Node::new("n");
        node.add_parameter("a", 0).unwrap();
        node.add_parameter("b", 0).unwrap();

        node.set_state(patch(&[("a", 1.into())]));
        node.set_state(patch(&[("b", 2.into())]));
        assert_eq!(
            node.pending_state(),
            Some(&patch(&[("a", 1.into()), ("b", 2.into())]))
        );

        node.set_state(patch(&[("a", 3.into())]));
        assert_eq!(
            node.pending_state(),
            Some(&patch(&[("a", 3.into()), ("b", 2.into())]))
        );

        // Committed state is untouched until commit.
        assert_eq!(node.state()["a"], ParamData::from(0));
    }

    #[test]
    fn commit_only_touches_registered_parameters() {
        let schema = Arc::new(
            NodeSchema::new()
                .parameter("step", ValueKind::Number)
                .trigger("increment"),
        );
        let mut node = Node::new("c").with_schema(schema);
        node.add_parameter("step", 1).unwrap();
        node.add_trigger("increment", |_| {}).unwrap();

        node.set_state(patch(&[
            ("increment", "oops".into()),
            ("step", "abc".into()),
            ("ghost", 1.into()),
        ]));
        assert!(node.commit_changes());

        assert_eq!(node.state(), &patch(&[("step", 1.into())]));
        assert!(node.is_trigger_parameter("increment"));
        assert!(!node.is_valued_parameter("increment"));
        assert!(!node.is_parameter("ghost"));
        assert_eq!(node.port_kind("increment", false), Some(PortKind::TriggerParameter));

        node.set("step", 2);
        node.commit_changes();
        assert_eq!(node.state()["step"], ParamData::from(2));
    }

    #[derive(Default)]
    struct Observed {
        will: Vec<(ParamData, ParamData)>,
        did: Vec<(ParamData, ParamData)>,
    }

    struct Recorder(Arc<Mutex<Observed>>);

    impl NodeBehavior for Recorder {
        fn node_will_update(&mut self, node: &mut Node, next: &State) {
            self.0
                .lock()
                .will
                .push((node.state()["x"].clone(), next["x"].clone()));
        }

        fn node_did_update(&mut self, node: &mut Node, prev: &State) {
            self.0
                .lock()
                .did
                .push((node.state()["x"].clone(), prev["x"].clone()));
        }
    }

    #[test]
    fn commit_runs_hooks_around_the_swap() {
        let observed = Arc::new(Mutex::new(Observed::default()));
        let mut node = Node::new("n").with_behavior(Recorder(observed.clone()));
        node.add_parameter("x", 1).unwrap();

        node.set("x", 2);
        assert!(node.is_dirty());
        assert!(node.commit_changes());
        assert!(!node.is_dirty());
        assert_eq!(node.state()["x"], ParamData::from(2));

        {
            let observed = observed.lock();
            // will_update sees the old state and receives the proposed one.
            assert_eq!(observed.will, [(ParamData::from(1), ParamData::from(2))]);
            // did_update sees the new state and receives the old one.
            assert_eq!(observed.did, [(ParamData::from(2), ParamData::from(1))]);
        }

        // Clean commit is a no-op and runs no hooks.
        assert!(!node.commit_changes());
        assert_eq!(observed.lock().will.len(), 1);
        assert_eq!(observed.lock().did.len(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected_per_side() {
        let mut node = Node::new("n");
        node.add_parameter("x", 0).unwrap();

        assert!(matches!(
            node.add_parameter("x", 1),
            Err(GraphError::DuplicatePort { family: PortFamily::Input, .. })
        ));
        assert!(node.add_trigger("x", |_| {}).is_err());

        // Outputs are a separate namespace.
        node.add_out_value("x", None).unwrap();
        assert!(node.add_out_trigger("x").is_err());
    }

    #[test]
    fn outputs_require_registration() {
        let mut node = Node::new("n");
        assert!(node.send_out("missing", 1).is_err());
        assert!(node.trigger_out("missing").is_err());
        assert!(node.trigger("missing").is_err());

        node.add_out_value("out", None).unwrap();
        node.add_out_trigger("done").unwrap();
        // Registering is not firing.
        node.drain_events();

        assert_eq!(node.output_value("out"), None);
        node.send_out("out", 5).unwrap();
        node.trigger_out("done").unwrap();
        assert_eq!(node.output_value("out"), Some(&ParamData::from(5)));

        assert_eq!(
            node.drain_events(),
            [
                NodeEvent::Fired {
                    address: ParamAddress::new("n", "out")
                },
                NodeEvent::Fired {
                    address: ParamAddress::new("n", "done")
                },
            ]
        );
    }

    #[test]
    fn trigger_callback_can_mutate_the_node() {
        let mut node = Node::new("counter");
        node.add_out_value("count", Some(0.into())).unwrap();
        node.add_trigger("increment", |node| {
            let next = node.output_value("count").and_then(ParamData::as_number).unwrap_or(0.0) + 1.0;
            if let Err(err) = node.send_out("count", next) {
                node.report_error(err.to_string());
            }
        })
        .unwrap();

        node.trigger("increment").unwrap();
        node.trigger("increment").unwrap();
        assert_eq!(node.output_value("count"), Some(&ParamData::from(2)));
    }

    #[test]
    fn removal_emits_events_and_clears_pending() {
        let mut node = Node::new("n");
        node.add_parameter("x", 0).unwrap();
        node.add_trigger("go", |_| {}).unwrap();
        node.add_out_trigger("done").unwrap();
        node.drain_events();

        node.set("x", 1);
        node.remove_parameter("x").unwrap();
        assert_eq!(node.pending_state(), Some(&State::new()));
        node.remove_parameter("go").unwrap();
        node.remove_output("done").unwrap();

        assert!(node.remove_parameter("x").is_err());
        assert!(node.remove_output("done").is_err());

        assert_eq!(
            node.drain_events(),
            [
                NodeEvent::ParameterRemoved {
                    address: ParamAddress::new("n", "x")
                },
                NodeEvent::ParameterRemoved {
                    address: ParamAddress::new("n", "go")
                },
                NodeEvent::OutputRemoved {
                    address: ParamAddress::new("n", "done")
                },
            ]
        );
    }

    #[test]
    fn schema_guards_registration() {
        let schema = Arc::new(
            NodeSchema::new()
                .parameter("gain", ValueKind::Number)
                .out_value("level", ValueKind::Number),
        );
        let mut node = Node::new("amp").with_schema(schema);

        node.add_parameter("gain", 1.0).unwrap();
        assert!(matches!(
            node.add_out_value("level", Some("loud".into())),
            Err(GraphError::Schema { .. })
        ));
        assert!(matches!(
            node.add_trigger("mute", |_| {}),
            Err(GraphError::Schema { .. })
        ));
    }

    #[test]
    fn port_queries() {
        let mut node = Node::new("n");
        node.add_parameter("value", 0).unwrap();
        node.add_trigger("go", |_| {}).unwrap();
        node.add_out_value("value", None).unwrap();
        node.add_out_trigger("done").unwrap();

        assert!(node.is_parameter("value") && node.is_output("value"));
        assert!(node.is_trigger("go") && node.is_trigger("done"));
        assert!(node.is_valued("value") && !node.is_valued("go"));
        assert!(node.check_trigger("go").is_ok());
        assert!(node.check_trigger("value").is_err());
        assert!(node.check_valued("value").is_ok());
        assert_eq!(node.port_kind("done", true), Some(PortKind::OutTrigger));
        assert_eq!(node.port_kind("done", false), None);
        assert_eq!(node.parameter_names().collect::<Vec<_>>(), ["value", "go"]);
    }
}
