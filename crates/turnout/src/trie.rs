//! Segment trie backing the route table.
//!
//! Nodes live in a flat arena and refer to each other by index, which keeps
//! parent links cheap and avoids reference cycles. The wildcard child and
//! the per-verb handler table are the only things that distinguish one node
//! from another; matching itself is a plain walk.

use std::collections::HashMap;

use crate::middleware::Handler;

/// Path segment that matches any single literal segment during dispatch.
pub const WILDCARD_SEGMENT: &str = "*";

/// Path segment consulted when a lookup runs off the tree or lands on a
/// node with no handlers. Registered like any other literal segment.
pub const FALLBACK_SEGMENT: &str = "404";

/// Verb that matches any request method at a node.
pub const ANY_METHOD: &str = "*";

/// Index of a node in the arena. The root is always index zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// One path segment's children and handlers.
struct Node {
    /// Back-reference used by the fallback walk; `None` only at the root.
    parent: Option<NodeId>,
    /// Children keyed by exact segment text, `"404"` included.
    literals: HashMap<String, NodeId>,
    /// Child taken when no literal matches. Tagged separately so a literal
    /// `"*"` path segment can never collide with the wildcard.
    wildcard: Option<NodeId>,
    /// Composed handlers keyed by verb.
    methods: HashMap<String, Handler>,
}

impl Node {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            parent,
            literals: HashMap::new(),
            wildcard: None,
            methods: HashMap::new(),
        }
    }
}

/// Result of walking a request path down the trie.
pub(crate) struct Descent {
    /// The terminal node when `matched`, otherwise the last node reached
    /// before a segment found no child.
    pub node: NodeId,
    /// Whether every segment of the path found a child.
    pub matched: bool,
}

/// Arena-backed trie over path segments.
pub(crate) struct SegmentTrie {
    nodes: Vec<Node>,
}

impl SegmentTrie {
    const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None)],
        }
    }

    /// Walks `path` from the root, creating nodes as needed, and returns
    /// the terminal node. Inserting the same path twice returns the same
    /// node without growing the arena.
    pub fn insert(&mut self, path: &str) -> NodeId {
        let mut current = Self::ROOT;
        for segment in segments(path) {
            current = if segment == WILDCARD_SEGMENT {
                match self.nodes[current.0].wildcard {
                    Some(next) => next,
                    None => {
                        let next = self.alloc(current);
                        self.nodes[current.0].wildcard = Some(next);
                        next
                    }
                }
            } else {
                match self.nodes[current.0].literals.get(segment).copied() {
                    Some(next) => next,
                    None => {
                        let next = self.alloc(current);
                        self.nodes[current.0].literals.insert(segment.to_owned(), next);
                        next
                    }
                }
            };
        }
        current
    }

    /// Walks `path` from the root without mutating the trie. Each segment
    /// prefers an exact literal child and falls back to the wildcard child;
    /// the walk stops at the first segment with neither.
    pub fn descend(&self, path: &str) -> Descent {
        let mut current = Self::ROOT;
        for segment in segments(path) {
            let node = &self.nodes[current.0];
            match node.literals.get(segment).copied().or(node.wildcard) {
                Some(next) => current = next,
                None => {
                    return Descent {
                        node: current,
                        matched: false,
                    }
                }
            }
        }
        Descent {
            node: current,
            matched: true,
        }
    }

    /// Finds the nearest fallback node at or above `from`: the first
    /// ancestor-or-self with a literal `"404"` child.
    pub fn fallback(&self, from: NodeId) -> Option<NodeId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            if let Some(found) = node.literals.get(FALLBACK_SEGMENT).copied() {
                return Some(found);
            }
            current = node.parent;
        }
        None
    }

    /// Stores `handler` for `method` at `node`, replacing any previous
    /// handler registered under the same verb.
    pub fn set_handler(&mut self, node: NodeId, method: String, handler: Handler) {
        self.nodes[node.0].methods.insert(method, handler);
    }

    /// Selects the handler for `method` at `node`: an exact verb entry
    /// first, then the any-method entry.
    pub fn handler(&self, node: NodeId, method: &str) -> Option<&Handler> {
        let methods = &self.nodes[node.0].methods;
        methods.get(method).or_else(|| methods.get(ANY_METHOD))
    }

    /// Returns `true` if any verb is registered at `node`.
    pub fn has_handlers(&self, node: NodeId) -> bool {
        !self.nodes[node.0].methods.is_empty()
    }

    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(parent)));
        id
    }
}

/// Splits a path into its trie segments.
///
/// At most one leading and one trailing slash are stripped, so `/a`, `a`,
/// `/a/` and `a/` all address the same node while `/a//` keeps an empty
/// final segment. An empty remainder yields no segments at all, which
/// addresses the root.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let root = trimmed.is_empty();
    trimmed.split('/').filter(move |_| !root)
}
