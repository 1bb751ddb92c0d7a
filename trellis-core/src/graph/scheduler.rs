//! Tick Scheduler
//!
//! [`Graph`] owns the nodes, their wiring and two queues of pending work, and
//! advances everything in discrete ticks. Each tick has two strict phases:
//!
//! 1. **Commit.** Patches queued with [`Graph::add_to_node_state`] (or
//!    forwarded over valued links last tick) are merged into their nodes, and
//!    every dirty node commits. This is where `node_will_update` and
//!    `node_did_update` run.
//! 2. **Propagate.** Every queued `(output, input)` pair is delivered. A
//!    trigger input has its callback invoked right away. A valued input gets
//!    the output's current value queued as a patch, which becomes visible in
//!    the *next* tick's commit phase.
//!
//! Both queues are swapped out before they are processed, so work raised by a
//! hook or callback during a phase always waits for a later pass. A node that
//! fires an output from its update hook reaches its subscribers in the same
//! tick's propagate phase; anything fired during propagation waits a tick.
//! Feedback loops therefore advance one hop per tick instead of recursing.
//!
//! Nothing happens between ticks. If `tick` is never called again, no state
//! changes and no triggers fire.

use indexmap::IndexMap;
use tracing::{debug, error, trace, warn};

use super::address::{Link, NodeId, ParamAddress};
use super::event::NodeEvent;
use super::links::{Links, TriggerQueue};
use super::node::Node;
use crate::error::{GraphError, Result};
use crate::value::State;

/// What one call to [`Graph::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sequence number of this tick, starting at 1.
    pub tick: u64,
    /// Nodes that committed a patch.
    pub committed: usize,
    /// Trigger callbacks invoked.
    pub triggers_fired: usize,
    /// Values queued for delivery next tick.
    pub values_forwarded: usize,
    /// Queued propagations that had nothing to deliver.
    pub skipped: usize,
}

/// The dataflow graph.
#[derive(Debug, Default)]
pub struct Graph {
    /// All nodes, in registration order.
    nodes: IndexMap<NodeId, Node>,

    /// Explicit wiring.
    links: Links,

    /// Propagations waiting for the next propagate phase.
    dirty_triggers: TriggerQueue,

    /// Patches waiting for the next commit phase, per node.
    new_states: IndexMap<NodeId, State>,

    /// Port and error notifications for a transport to forward.
    notifications: Vec<NodeEvent>,

    ticks: u64,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Register a node and run its `node_did_create` hook.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        let id = node.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }

        let (index, _) = self.nodes.insert_full(id.clone(), node);
        if let Some((_, node)) = self.nodes.get_index_mut(index) {
            node.did_create();
        }
        // Also picks up ports registered before the node was added.
        self.collect_events(&id);

        debug!(node = %id, "node added");
        Ok(())
    }

    /// Run the node's `node_will_be_destroyed` hook, remove it, and purge all
    /// links and pending work touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.into()))?;
        node.will_be_destroyed();
        let node_id = node.id().clone();
        self.collect_events(&node_id);

        let Some(node) = self.nodes.shift_remove(id) else {
            return Err(GraphError::NodeNotFound(node_id));
        };

        let purged = self.links.remove_links_for_node(&node_id);
        self.dirty_triggers.discard_node(&node_id);
        self.new_states.shift_remove(&node_id);

        debug!(node = %node_id, purged, "node removed");
        Ok(node)
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Like [`Graph::node`], failing loudly on unknown ids.
    pub fn get_node(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.into()))
    }

    /// Run `f` against a node, then process whatever it emitted (link purges
    /// for removed ports, propagation for fired outputs).
    ///
    /// This is the way for outside code, such as an editor action, to poke a
    /// node directly.
    pub fn with_node_mut<R>(&mut self, id: &str, f: impl FnOnce(&mut Node) -> R) -> Result<R> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.into()))?;
        let out = f(node);
        let node_id = node.id().clone();
        self.collect_events(&node_id);
        Ok(out)
    }

    /// All nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Whether a node with this id is registered.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Queue a patch for a node's next commit. Patches for the same node merge
    /// key by key.
    pub fn add_to_node_state(&mut self, id: &str, patch: State) -> Result<()> {
        let Some(node) = self.nodes.get(id) else {
            return Err(GraphError::NodeNotFound(id.into()));
        };
        let node_id = node.id().clone();
        self.new_states.entry(node_id).or_default().extend(patch);
        Ok(())
    }

    /// Patch queued for `id`'s next commit, if any.
    pub fn pending_state(&self, id: &str) -> Option<&State> {
        self.new_states.get(id)
    }

    // ------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------

    /// Connect an output to an input.
    ///
    /// Both ends must exist and be of the right kind. If the output already
    /// holds a value, a propagation is queued so the new subscriber receives
    /// it without waiting for the producer to fire again. Returns `false` if
    /// the link already existed.
    pub fn add_link(&mut self, output: &ParamAddress, input: &ParamAddress) -> Result<bool> {
        let from = self.get_node(output.node().as_str())?;
        if !from.is_output(output.port()) {
            return Err(GraphError::NotAnOutput(output.clone()));
        }
        let has_value = from.output_value(output.port()).is_some();

        let to = self.get_node(input.node().as_str())?;
        if !to.is_parameter(input.port()) {
            return Err(GraphError::NotAnInput(input.clone()));
        }

        let added = self.links.add(output, input);
        if has_value {
            self.dirty_triggers.push(output, input);
        }

        debug!(%output, %input, added, "link added");
        Ok(added)
    }

    /// Disconnect. Returns `false` if there was no such link.
    pub fn remove_link(&mut self, output: &ParamAddress, input: &ParamAddress) -> bool {
        let removed = self.links.remove(output, input);
        debug!(%output, %input, removed, "link removed");
        removed
    }

    /// The current wiring.
    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Propagations queued for the next propagate phase.
    pub fn pending_triggers(&self) -> &TriggerQueue {
        &self.dirty_triggers
    }

    // ------------------------------------------------------------------
    // Ticking
    // ------------------------------------------------------------------

    /// Run one commit phase followed by one propagate phase.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            committed: self.commit_phase(),
            ..TickReport::default()
        };
        self.propagate_phase(&mut report);

        debug!(
            tick = report.tick,
            committed = report.committed,
            triggers_fired = report.triggers_fired,
            values_forwarded = report.values_forwarded,
            skipped = report.skipped,
            "tick"
        );
        report
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Merge queued patches into their nodes and commit every dirty node.
    /// Returns how many nodes committed.
    pub(crate) fn commit_phase(&mut self) -> usize {
        let patches = std::mem::take(&mut self.new_states);
        for (id, patch) in patches {
            match self.nodes.get_mut(&id) {
                Some(node) => node.set_state(patch),
                None => warn!(node = %id, "dropping patch for missing node"),
            }
        }

        let dirty: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|node| node.is_dirty())
            .map(|node| node.id().clone())
            .collect();

        let mut committed = 0;
        for id in dirty {
            if let Some(node) = self.nodes.get_mut(&id) {
                if node.commit_changes() {
                    committed += 1;
                }
            }
            self.collect_events(&id);
        }
        committed
    }

    fn propagate_phase(&mut self, report: &mut TickReport) {
        let batch = self.dirty_triggers.take();

        for Link { output, input } in batch {
            let Some(target) = self.nodes.get(input.node()) else {
                warn!(%output, %input, "target node vanished");
                report.skipped += 1;
                continue;
            };

            if target.is_trigger_parameter(input.port()) {
                if let Some(target) = self.nodes.get_mut(input.node()) {
                    if let Err(err) = target.trigger(input.port()) {
                        warn!(%input, %err, "trigger delivery failed");
                    }
                }
                self.collect_events(input.node());
                report.triggers_fired += 1;
                trace!(%output, %input, "trigger delivered");
                continue;
            }

            let value = self
                .nodes
                .get(output.node())
                .filter(|source| source.is_valued_output(output.port()))
                .and_then(|source| source.output_value(output.port()))
                .cloned();

            match value {
                Some(value) if target.is_valued_parameter(input.port()) => {
                    let node_id = input.node().clone();
                    self.new_states
                        .entry(node_id)
                        .or_default()
                        .insert(input.port().to_owned(), value);
                    report.values_forwarded += 1;
                    trace!(%output, %input, "value forwarded");
                }
                _ => {
                    trace!(%output, %input, "nothing to deliver");
                    report.skipped += 1;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    fn collect_events(&mut self, id: &NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        for event in node.drain_events() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: NodeEvent) {
        if let NodeEvent::PatchQueued { node, state } = event {
            match self.nodes.get(node.as_str()) {
                Some(_) => self.new_states.entry(node).or_default().extend(state),
                None => warn!(node = %node, "dropping patch for missing node"),
            }
            return;
        }

        match &event {
            NodeEvent::Fired { address } => {
                for input in self.links.get_linked_inputs(address) {
                    self.dirty_triggers.push(address, &input);
                }
                return;
            }
            NodeEvent::ParameterRemoved { address } => {
                let purged = self.links.remove_links_for_input(address);
                self.dirty_triggers.discard_input(address);
                if let Some(patch) = self.new_states.get_mut(address.node()) {
                    patch.shift_remove(address.port());
                }
                debug!(%address, purged, "parameter removed");
            }
            NodeEvent::OutputRemoved { address } => {
                let purged = self.links.remove_links_for_output(address);
                self.dirty_triggers.discard_output(address);
                debug!(%address, purged, "output removed");
            }
            NodeEvent::PortAdded { address, kind, .. } => {
                trace!(%address, ?kind, "port added");
            }
            NodeEvent::Error { node, message } => {
                error!(node = %node, message = %message, "node reported an error");
            }
            NodeEvent::PatchQueued { .. } => return,
        }
        self.notifications.push(event);
    }

    /// Take the port and error notifications raised since the last call.
    pub fn drain_notifications(&mut self) -> Vec<NodeEvent> {
        std::mem::take(&mut self.notifications)
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Drop all pending work, links and nodes without running any hooks.
    ///
    /// Nodes wrapping external resources are not told they are going away;
    /// use [`Graph::teardown`] for that.
    pub fn reset(&mut self) {
        self.dirty_triggers.clear();
        self.new_states.clear();
        self.links.clear();
        self.nodes.clear();
        self.notifications.clear();
        debug!("graph reset");
    }

    /// Run every node's `node_will_be_destroyed` hook, then [`Graph::reset`].
    pub fn teardown(&mut self) {
        let ids: Vec<NodeId> = self.nodes.keys().cloned().collect();
        for id in ids {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.will_be_destroyed();
            }
            self.collect_events(&id);
        }
        self.reset();
    }
}
