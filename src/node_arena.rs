use crate::node::{count_overlap, TrieNode, TrieNodeIdx, ROOT};

/// Owns every node of a trie; nodes refer to each other by index.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena {
    pub(crate) nodes: Vec<TrieNode>,
    pub(crate) free_nodes: Vec<TrieNodeIdx>,
}

impl NodeArena {
    /// Creates an arena holding only an empty root.
    pub(crate) fn new() -> Self {
        NodeArena {
            nodes: vec![TrieNode::new()],
            free_nodes: Vec::new(),
        }
    }

    /// Drops every node except a fresh root.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(TrieNode::new());
        self.free_nodes.clear();
    }

    /// Number of nodes currently in use, root included.
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    #[inline(always)]
    pub(crate) fn get_node(&self, idx: TrieNodeIdx) -> &TrieNode {
        &self.nodes[idx.0]
    }

    #[inline(always)]
    pub(crate) fn get_node_mut(&mut self, idx: TrieNodeIdx) -> &mut TrieNode {
        &mut self.nodes[idx.0]
    }

    /// Stores `node`, reusing a released slot when one is available.
    pub(crate) fn allocate(&mut self, node: TrieNode) -> TrieNodeIdx {
        if let Some(idx) = self.free_nodes.pop() {
            self.nodes[idx.0] = node;
            return idx;
        }
        self.nodes.push(node);
        TrieNodeIdx(self.nodes.len() - 1)
    }

    /// Returns a slot to the free list. The caller must already have unlinked it.
    pub(crate) fn release(&mut self, idx: TrieNodeIdx) {
        debug_assert_ne!(idx, ROOT, "the root is never released");
        self.nodes[idx.0] = TrieNode::new();
        self.free_nodes.push(idx);
    }

    /// Gets the child reached over the edge labelled `c`.
    #[inline(always)]
    pub(crate) fn get_child_idx(&self, node_idx: TrieNodeIdx, c: char) -> Option<TrieNodeIdx> {
        let node = self.get_node(node_idx);
        node.child_position(c).ok().map(|pos| node.children[pos].1)
    }

    /// Links `child` under `node_idx`, keeping edges sorted.
    pub(crate) fn add_child(&mut self, node_idx: TrieNodeIdx, c: char, child: TrieNodeIdx) {
        let node = self.get_node_mut(node_idx);
        match node.child_position(c) {
            Ok(pos) => node.children[pos].1 = child,
            Err(pos) => node.children.insert(pos, (c, child)),
        }
    }

    /// Unlinks the edge labelled `c`, returning the detached child.
    pub(crate) fn remove_child(&mut self, node_idx: TrieNodeIdx, c: char) -> Option<TrieNodeIdx> {
        let node = self.get_node_mut(node_idx);
        let pos = node.child_position(c).ok()?;
        Some(node.children.remove(pos).1)
    }

    #[inline(always)]
    pub(crate) fn has_children(&self, node_idx: TrieNodeIdx) -> bool {
        self.get_node(node_idx).child_len() > 0
    }

    /// Folds the only child of a valueless node into it.
    ///
    /// The merged node keeps `node_idx`, so the edge from its parent stays valid.
    pub(crate) fn merge_with_only_child(&mut self, node_idx: TrieNodeIdx) -> bool {
        let node = self.get_node(node_idx);
        if node_idx == ROOT || node.is_terminal() || node.child_len() != 1 {
            return false;
        }
        let (label, child_idx) = node.children[0];

        let child = std::mem::take(self.get_node_mut(child_idx));
        let node = self.get_node_mut(node_idx);
        let mut prefix = Vec::with_capacity(node.prefix.len() + 1 + child.prefix.len());
        prefix.extend_from_slice(&node.prefix);
        prefix.push(label);
        prefix.extend_from_slice(&child.prefix);

        node.prefix = prefix.into_boxed_slice();
        node.children = child.children;
        node.data_idx = child.data_idx;
        self.release(child_idx);

        log::trace!("merged node {} into its parent {}", child_idx.0, node_idx.0);
        true
    }

    /// Finds the node under which every key starting with `prefix` lives.
    ///
    /// Returns the node together with the key characters that precede its own
    /// prefix. `prefix` may end in the middle of that node's prefix.
    pub(crate) fn descend_prefix(&self, prefix: &[char]) -> Option<(TrieNodeIdx, String)> {
        let mut current = ROOT;
        let mut path = String::new();
        let mut rest = prefix;

        loop {
            let node = self.get_node(current);
            let overlap = count_overlap(&node.prefix, rest);
            if overlap == rest.len() {
                return Some((current, path));
            }
            if overlap < node.prefix.len() {
                return None;
            }
            path.extend(node.prefix.iter());
            rest = &rest[overlap..];

            let label = rest[0];
            current = self.get_child_idx(current, label)?;
            path.push(label);
            rest = &rest[1..];
        }
    }

    pub(crate) fn keys_and_indices(&self, root_idx: TrieNodeIdx) -> KeysAndDataIdx<'_> {
        KeysAndDataIdx::new(self, root_idx, String::new())
    }

    pub(crate) fn prefix_keys_and_indices(&self, prefix: &[char]) -> KeysAndDataIdx<'_> {
        match self.descend_prefix(prefix) {
            Some((start, path)) => KeysAndDataIdx::new(self, start, path),
            None => KeysAndDataIdx::empty(self),
        }
    }
}

/// Depth-first walk yielding `(key, data_idx)` for every terminal node.
///
/// Children are pushed in reverse label order, so keys come out sorted.
pub(crate) struct KeysAndDataIdx<'a> {
    arena: &'a NodeArena,
    stack: Vec<(TrieNodeIdx, String)>, // Node index and the key text before its prefix
}

impl<'a> KeysAndDataIdx<'a> {
    fn new(arena: &'a NodeArena, start: TrieNodeIdx, path: String) -> Self {
        KeysAndDataIdx {
            arena,
            stack: vec![(start, path)],
        }
    }

    fn empty(arena: &'a NodeArena) -> Self {
        KeysAndDataIdx {
            arena,
            stack: Vec::new(),
        }
    }
}

impl Iterator for KeysAndDataIdx<'_> {
    type Item = (String, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node_idx, mut key)) = self.stack.pop() {
            let node = self.arena.get_node(node_idx);
            key.extend(node.prefix.iter());

            for &(label, child_idx) in node.children.iter().rev() {
                let mut child_path = key.clone();
                child_path.push(label);
                self.stack.push((child_idx, child_path));
            }

            if let Some(data_idx) = node.data_idx {
                return Some((key, data_idx));
            }
        }

        None
    }
}
