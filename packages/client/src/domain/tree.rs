//! Locally known portion of the conversation tree.

use std::collections::{HashMap, HashSet};

use bough_shared::protocol::{Node, NodeId};

/// Read/write access to the client's partial copy of the tree.
pub trait TreeStore {
    /// Node with the given id, if it has arrived
    fn get(&self, id: &NodeId) -> Option<&Node>;

    /// Record a node. Returns `false` for duplicates and nodes without an id.
    fn add(&mut self, node: Node) -> bool;

    /// Known children of `id` in arrival order
    fn children(&self, id: &NodeId) -> &[NodeId];

    /// Deepest known descendant of `id` (`id` itself when it has no children)
    fn leaf(&self, id: &NodeId) -> NodeId;

    /// Walk from `leaf` toward the root collecting at most `max_length`
    /// nodes. Stops at the first id that is not known locally and returns it
    /// as the next id to query.
    fn get_items(&self, leaf: &NodeId, max_length: usize) -> (Vec<Node>, Option<NodeId>);

    fn seen(&self, id: &NodeId) -> bool;

    fn mark_seen(&mut self, id: &NodeId);
}

/// In-memory [`TreeStore`] with a children index.
#[derive(Debug, Default)]
pub struct MessageTree {
    nodes: HashMap<NodeId, Node>,
    children: HashMap<NodeId, Vec<NodeId>>,
    arrival: HashMap<NodeId, u64>,
    seen: HashSet<NodeId>,
    next_arrival: u64,
}

impl MessageTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }
}

impl TreeStore for MessageTree {
    fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn add(&mut self, node: Node) -> bool {
        if node.id.is_empty() || self.nodes.contains_key(&node.id) {
            return false;
        }
        // Indexed under the parent even when the parent itself is still a gap.
        if let Some(parent) = &node.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(node.id.clone());
        }
        self.arrival.insert(node.id.clone(), self.next_arrival);
        self.next_arrival += 1;
        self.nodes.insert(node.id.clone(), node);
        true
    }

    fn children(&self, id: &NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    fn leaf(&self, id: &NodeId) -> NodeId {
        let arrival = |id: &NodeId| self.arrival.get(id).copied().unwrap_or_default();

        let mut best = (id.clone(), 0usize);
        let mut visited = HashSet::new();
        let mut stack = vec![(id.clone(), 0usize)];
        while let Some((current, depth)) = stack.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let (best_id, best_depth) = &best;
            if depth > *best_depth || (depth == *best_depth && arrival(&current) > arrival(best_id)) {
                best = (current.clone(), depth);
            }
            for child in self.children(&current) {
                stack.push((child.clone(), depth + 1));
            }
        }
        best.0
    }

    fn get_items(&self, leaf: &NodeId, max_length: usize) -> (Vec<Node>, Option<NodeId>) {
        let mut items = Vec::new();
        let mut next = Some(leaf.clone()).filter(|id| !id.is_empty());
        while let Some(id) = next {
            if items.len() >= max_length {
                break;
            }
            match self.nodes.get(&id) {
                Some(node) => {
                    next = node.parent.clone();
                    items.push(node.clone());
                }
                None => return (items, Some(id)),
            }
        }
        (items, None)
    }

    fn seen(&self, id: &NodeId) -> bool {
        self.seen.contains(id)
    }

    fn mark_seen(&mut self, id: &NodeId) {
        self.seen.insert(id.clone());
    }
}
