/// Index of a node inside a [`NodeArena`](crate::node_arena::NodeArena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TrieNodeIdx(pub(crate) usize);

/// The root always lives in the first arena slot.
pub(crate) const ROOT: TrieNodeIdx = TrieNodeIdx(0);

#[derive(Clone, Debug, Default)]
pub(crate) struct TrieNode {
    /// Characters consumed after the edge label that leads here.
    pub(crate) prefix: Box<[char]>,
    /// Outgoing edges, sorted by label.
    pub(crate) children: Vec<(char, TrieNodeIdx)>,
    pub(crate) data_idx: Option<usize>,
}

impl TrieNode {
    pub(crate) fn new() -> Self {
        TrieNode::default()
    }

    pub(crate) fn with_prefix(prefix: Box<[char]>, data_idx: Option<usize>) -> Self {
        TrieNode {
            prefix,
            children: Vec::new(),
            data_idx,
        }
    }

    #[inline(always)]
    pub(crate) fn child_len(&self) -> usize {
        self.children.len()
    }

    #[inline(always)]
    pub(crate) fn is_terminal(&self) -> bool {
        self.data_idx.is_some()
    }

    /// Position of the edge labelled `c`, or where it would be inserted.
    #[inline(always)]
    pub(crate) fn child_position(&self, c: char) -> Result<usize, usize> {
        self.children.binary_search_by(|(label, _)| label.cmp(&c))
    }
}

/// Number of leading characters shared by `a` and `b`.
pub(crate) fn count_overlap(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_overlap() {
        let cat: Vec<char> = "cat".chars().collect();
        let car: Vec<char> = "car".chars().collect();
        let cats: Vec<char> = "cats".chars().collect();
        assert_eq!(count_overlap(&cat, &car), 2);
        assert_eq!(count_overlap(&cat, &cats), 3);
        assert_eq!(count_overlap(&cats, &cat), 3);
        assert_eq!(count_overlap(&[], &cat), 0);
    }

    #[test]
    fn test_child_position() {
        let mut node = TrieNode::new();
        node.children.push(('a', TrieNodeIdx(1)));
        node.children.push(('m', TrieNodeIdx(2)));
        assert_eq!(node.child_position('a'), Ok(0));
        assert_eq!(node.child_position('m'), Ok(1));
        assert_eq!(node.child_position('c'), Err(1));
        assert_eq!(node.child_position('z'), Err(2));
        assert!(!node.is_terminal());
    }
}
