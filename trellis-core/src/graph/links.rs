//! Link Registry
//!
//! Edges are stored as a four level map:
//!
//! ```text
//! output node -> output port -> input node -> {input ports}
//! ```
//!
//! A leaf entry is exactly one directed edge, so parallel duplicates cannot
//! exist. Self loops are not rejected.
//!
//! Two types share this structure. [`Links`] is the graph's persistent wiring
//! and supports queries and removal by endpoint. [`TriggerQueue`] is a single
//! tick worklist of propagations waiting to be delivered: it is only filled,
//! taken and drained.
//!
//! Removal by partial address (`remove_links_for_*`) filters every edge. Link
//! counts in a patch are in the tens to low hundreds; if that changes, a
//! reverse input -> output index kept in sync on `add`/`remove` would make
//! these indexed.

use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;

use super::address::{Link, NodeId, ParamAddress};

type InputPorts = IndexSet<String>;
type Inputs = IndexMap<NodeId, InputPorts>;
type OutputPorts = IndexMap<String, Inputs>;

/// Inputs fed by a single output. Most outputs have a handful of subscribers.
pub type LinkedInputs = SmallVec<[ParamAddress; 4]>;

#[derive(Debug, Clone, Default, PartialEq)]
struct LinkMap {
    edges: IndexMap<NodeId, OutputPorts>,
    len: usize,
}

impl LinkMap {
    fn insert(&mut self, output: &ParamAddress, input: &ParamAddress) -> bool {
        let inserted = self
            .edges
            .entry(output.node().clone())
            .or_default()
            .entry(output.port().to_owned())
            .or_default()
            .entry(input.node().clone())
            .or_default()
            .insert(input.port().to_owned());
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn remove(&mut self, output: &ParamAddress, input: &ParamAddress) -> bool {
        let Some(ports) = self.edges.get_mut(output.node()) else {
            return false;
        };
        let Some(inputs) = ports.get_mut(output.port()) else {
            return false;
        };
        let Some(input_ports) = inputs.get_mut(input.node()) else {
            return false;
        };
        if !input_ports.shift_remove(input.port()) {
            return false;
        }

        // Prune empty levels so `node ids present` means `has edges`.
        if input_ports.is_empty() {
            inputs.shift_remove(input.node());
        }
        if inputs.is_empty() {
            ports.shift_remove(output.port());
        }
        if ports.is_empty() {
            self.edges.shift_remove(output.node());
        }
        self.len -= 1;
        true
    }

    fn contains(&self, output: &ParamAddress, input: &ParamAddress) -> bool {
        self.edges
            .get(output.node())
            .and_then(|ports| ports.get(output.port()))
            .and_then(|inputs| inputs.get(input.node()))
            .is_some_and(|input_ports| input_ports.contains(input.port()))
    }

    fn targets(&self, output: &ParamAddress) -> LinkedInputs {
        let Some(inputs) = self
            .edges
            .get(output.node())
            .and_then(|ports| ports.get(output.port()))
        else {
            return LinkedInputs::new();
        };

        inputs
            .iter()
            .flat_map(|(node, ports)| {
                ports
                    .iter()
                    .map(move |port| ParamAddress::new(node.clone(), port.as_str()))
            })
            .collect()
    }

    fn iter(&self) -> impl Iterator<Item = Link> + '_ {
        self.edges.iter().flat_map(|(out_node, ports)| {
            ports.iter().flat_map(move |(out_port, inputs)| {
                inputs.iter().flat_map(move |(in_node, in_ports)| {
                    in_ports.iter().map(move |in_port| Link {
                        output: ParamAddress::new(out_node.clone(), out_port.as_str()),
                        input: ParamAddress::new(in_node.clone(), in_port.as_str()),
                    })
                })
            })
        })
    }

    /// Rebuild keeping only the edges `keep` accepts.
    fn retain(&mut self, mut keep: impl FnMut(&Link) -> bool) -> usize {
        let before = self.len;
        let kept: Vec<Link> = self.iter().filter(|link| keep(link)).collect();

        self.clear();
        for link in &kept {
            self.insert(&link.output, &link.input);
        }
        before - self.len
    }

    fn clear(&mut self) {
        self.edges.clear();
        self.len = 0;
    }
}

/// The graph's explicit wiring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    map: LinkMap,
}

impl Links {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge. Returns `false` if it already existed.
    pub fn add(&mut self, output: &ParamAddress, input: &ParamAddress) -> bool {
        self.map.insert(output, input)
    }

    /// Remove an edge. Returns `false` if it did not exist.
    pub fn remove(&mut self, output: &ParamAddress, input: &ParamAddress) -> bool {
        self.map.remove(output, input)
    }

    /// Whether `output` is linked to `input`.
    pub fn has(&self, output: &ParamAddress, input: &ParamAddress) -> bool {
        self.map.contains(output, input)
    }

    /// Drop every edge ending at `input`. Returns how many were removed.
    pub fn remove_links_for_input(&mut self, input: &ParamAddress) -> usize {
        self.map.retain(|link| &link.input != input)
    }

    /// Drop every edge starting at `output`. Returns how many were removed.
    pub fn remove_links_for_output(&mut self, output: &ParamAddress) -> usize {
        self.map.retain(|link| &link.output != output)
    }

    /// Drop every edge with either endpoint on `node`.
    pub fn remove_links_for_node(&mut self, node: &NodeId) -> usize {
        self.map.retain(|link| !link.touches(node))
    }

    /// All inputs `output` feeds, in link creation order.
    pub fn get_linked_inputs(&self, output: &ParamAddress) -> LinkedInputs {
        self.map.targets(output)
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of distinct `(output, input)` pairs.
    pub fn len(&self) -> usize {
        self.map.len
    }

    /// Whether there is nothing here.
    pub fn is_empty(&self) -> bool {
        self.map.len == 0
    }

    /// Every link, grouped by output node in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Link> + '_ {
        self.map.iter()
    }
}

impl FromIterator<Link> for Links {
    fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
        let mut links = Links::new();
        for link in iter {
            links.add(&link.output, &link.input);
        }
        links
    }
}

/// Propagations waiting to be delivered.
///
/// The graph fills one queue while it drains the previous one, so anything
/// queued during delivery waits for the next tick.
#[derive(Debug, Clone, Default)]
pub struct TriggerQueue {
    map: LinkMap,
}

impl TriggerQueue {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue delivery from `output` to `input`. Queuing the same pair twice
    /// before a drain delivers it once.
    pub fn push(&mut self, output: &ParamAddress, input: &ParamAddress) {
        self.map.insert(output, input);
    }

    /// Take the queued work, leaving this queue empty.
    pub fn take(&mut self) -> TriggerQueue {
        std::mem::take(self)
    }

    /// Forget everything queued from or to `node`.
    pub fn discard_node(&mut self, node: &NodeId) {
        self.map.retain(|link| !link.touches(node));
    }

    /// Forget everything queued to `input`.
    pub fn discard_input(&mut self, input: &ParamAddress) {
        self.map.retain(|link| &link.input != input);
    }

    /// Forget everything queued from `output`.
    pub fn discard_output(&mut self, output: &ParamAddress) {
        self.map.retain(|link| &link.output != output);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of distinct `(output, input)` pairs.
    pub fn len(&self) -> usize {
        self.map.len
    }

    /// Whether there is nothing here.
    pub fn is_empty(&self) -> bool {
        self.map.len == 0
    }
}

impl IntoIterator for TriggerQueue {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter().collect::<Vec<_>>().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(node: &str, port: &str) -> ParamAddress {
        ParamAddress::new(node, port)
    }

    fn sample() -> Links {
        let mut links = Links::new();
        links.add(&addr("a", "out"), &addr("b", "in"));
        links.add(&addr("a", "out"), &addr("c", "in"));
        links.add(&addr("b", "out"), &addr("c", "other"));
        links.add(&addr("c", "out"), &addr("a", "in"));
        links
    }

    #[test]
    fn add_is_set_like() {
        let mut links = Links::new();
        assert!(links.add(&addr("a", "out"), &addr("b", "in")));
        assert!(!links.add(&addr("a", "out"), &addr("b", "in")));
        assert_eq!(links.len(), 1);
        assert!(links.has(&addr("a", "out"), &addr("b", "in")));
        assert!(!links.has(&addr("b", "in"), &addr("a", "out")));
    }

    #[test]
    fn remove_prunes_empty_levels() {
        let mut links = Links::new();
        links.add(&addr("a", "out"), &addr("b", "in"));

        assert!(links.remove(&addr("a", "out"), &addr("b", "in")));
        assert!(!links.remove(&addr("a", "out"), &addr("b", "in")));
        assert!(links.is_empty());
        assert_eq!(links, Links::new());
    }

    #[test]
    fn fan_out_preserves_creation_order() {
        let links = sample();
        assert_eq!(
            links.get_linked_inputs(&addr("a", "out")).as_slice(),
            [addr("b", "in"), addr("c", "in")]
        );
        assert!(links.get_linked_inputs(&addr("z", "out")).is_empty());
    }

    #[test]
    fn remove_by_endpoint() {
        let mut links = sample();
        assert_eq!(links.remove_links_for_input(&addr("c", "in")), 1);
        assert_eq!(links.remove_links_for_output(&addr("b", "out")), 1);
        assert_eq!(links.len(), 2);
        assert!(links.has(&addr("a", "out"), &addr("b", "in")));
        assert!(links.has(&addr("c", "out"), &addr("a", "in")));
    }

    #[test]
    fn remove_for_node_clears_both_directions() {
        let mut links = sample();
        assert_eq!(links.remove_links_for_node(&NodeId::from("a")), 3);

        let remaining: Vec<_> = links.iter().collect();
        assert_eq!(remaining, [Link::new(("b", "out"), ("c", "other"))]);
        assert!(links.iter().all(|link| !link.touches(&NodeId::from("a"))));
    }

    #[test]
    fn trigger_queue_take_leaves_it_empty() {
        let mut queue = TriggerQueue::new();
        queue.push(&addr("a", "out"), &addr("b", "in"));
        queue.push(&addr("a", "out"), &addr("b", "in"));
        queue.push(&addr("b", "out"), &addr("c", "in"));

        let batch = queue.take();
        assert!(queue.is_empty());
        assert_eq!(batch.len(), 2);

        // Work queued while draining lands in the fresh queue.
        for link in batch {
            queue.push(&link.input, &addr("z", "in"));
        }
        assert_eq!(queue.len(), 2);

        queue.discard_node(&NodeId::from("z"));
        assert!(queue.is_empty());
    }
}
