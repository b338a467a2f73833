use std::cmp::Ordering;

use itertools::Itertools;
use log::trace;

use crate::{
    error::{CodecError, Result},
    frequency::FrequencyTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        count: usize,
        symbol: char,
    },
    Internal {
        count: usize,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl From<(char, usize)> for Node {
    fn from((symbol, count): (char, usize)) -> Self {
        Node::Leaf { count, symbol }
    }
}

impl Node {
    pub fn count(&self) -> usize {
        match self {
            Node::Leaf { count, .. } | Node::Internal { count, .. } => *count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<char> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Number of edges on the longest path down to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            count: left.count() + right.count(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Nodes are ordered by `(count, smallest symbol in the subtree)`. The lightest node
    /// becomes the left child and the second lightest the right child of the merged node.
    pub fn new(frequencies: &FrequencyTable) -> Result<Self> {
        let trees = Trees::from_iter(frequencies.leaves().into_iter().map_into());
        let root = trees.merge().ok_or(CodecError::EmptyAlphabet)?;
        Ok(Self { root: root.node })
    }

    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(&FrequencyTable::from_text(text))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn weight(&self) -> usize {
        self.root.count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

/// A node waiting in the working list, tagged with the smallest symbol it holds.
/// Subtrees are disjoint so the tag is unique and the ordering is total.
#[derive(Debug)]
struct Subtree {
    lowest_symbol: char,
    node: Node,
}

impl From<Node> for Subtree {
    fn from(node: Node) -> Self {
        Self {
            lowest_symbol: lowest_symbol(&node),
            node,
        }
    }
}

fn lowest_symbol(node: &Node) -> char {
    match node {
        Node::Leaf { symbol, .. } => *symbol,
        Node::Internal { left, right, .. } => lowest_symbol(left).min(lowest_symbol(right)),
    }
}

impl Subtree {
    fn key(&self) -> (usize, char) {
        (self.node.count(), self.lowest_symbol)
    }
}

fn cmp_subtree_desc(a: &Subtree, b: &Subtree) -> Ordering {
    b.key().cmp(&a.key())
}

struct Trees(Vec<Subtree>);

impl FromIterator<Subtree> for Trees {
    fn from_iter<T: IntoIterator<Item = Subtree>>(iter: T) -> Self {
        let sorted_trees = iter.into_iter().sorted_by(cmp_subtree_desc).collect_vec();
        Self(sorted_trees)
    }
}

impl Trees {
    fn merge(mut self) -> Option<Subtree> {
        loop {
            match self.pop_lowest()? {
                PopResult::TreesToMerge { lowest, second_lowest } => {
                    trace!(
                        "merging {:?} with {:?}",
                        lowest.key(),
                        second_lowest.key()
                    );
                    let merged = Subtree {
                        lowest_symbol: lowest.lowest_symbol.min(second_lowest.lowest_symbol),
                        node: Node::merge(lowest.node, second_lowest.node),
                    };
                    self.insert(merged);
                }
                PopResult::Single(tree) => return Some(tree),
            }
        }
    }

    fn pop_lowest(&mut self) -> Option<PopResult> {
        let lowest = self.0.pop()?;

        let item_result = match self.0.pop() {
            Some(second_lowest) => PopResult::TreesToMerge {
                lowest,
                second_lowest,
            },
            None => PopResult::Single(lowest),
        };

        Some(item_result)
    }

    fn insert(&mut self, tree: Subtree) {
        self.0.push(tree);
        self.0.sort_unstable_by(cmp_subtree_desc);
    }
}

enum PopResult {
    TreesToMerge {
        lowest: Subtree,
        second_lowest: Subtree,
    },
    Single(Subtree),
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{error::CodecError, frequency::FrequencyTable};

    use super::{HuffmanTree, Node};

    fn assert_counts_conserved(node: &Node) {
        if let Node::Internal { count, left, right } = node {
            assert_eq!(*count, left.count() + right.count());
            assert_counts_conserved(left);
            assert_counts_conserved(right);
        }
    }

    fn leaf_symbols(node: &Node, symbols: &mut Vec<char>) {
        match node {
            Node::Leaf { symbol, .. } => symbols.push(*symbol),
            Node::Internal { left, right, .. } => {
                leaf_symbols(left, symbols);
                leaf_symbols(right, symbols);
            }
        }
    }

    #[test]
    fn test_merging() {
        // char_mapping test data comes from
        // https://opendsa-server.cs.vt.edu/ODSA/Books/CS3/html/Huffman.html
        let char_mapping = [
            ('Z', 2),
            ('K', 7),
            ('M', 24),
            ('C', 32),
            ('U', 37),
            ('D', 42),
            ('L', 42),
            ('E', 120),
        ];

        let tree = HuffmanTree::new(&char_mapping.into_iter().collect()).unwrap();
        assert_eq!(tree.weight(), 306);
        assert_eq!(tree.depth(), 6);
        assert_counts_conserved(tree.root());

        let mut symbols = vec![];
        leaf_symbols(tree.root(), &mut symbols);
        symbols.sort_unstable();
        assert_eq!(symbols, vec!['C', 'D', 'E', 'K', 'L', 'M', 'U', 'Z']);
    }

    #[test]
    fn test_root_count_is_input_length() {
        let text = "abracadabra alakazam";
        let tree = HuffmanTree::from_text(text).unwrap();
        assert_eq!(tree.weight(), text.chars().count());
        assert_counts_conserved(tree.root());
    }

    #[test]
    fn test_smallest_node_becomes_left_child() {
        let tree = HuffmanTree::from_text("aaabbc").unwrap();
        // c(1) + b(2) -> 3, then a(3) sorts below the merged node because 'a' < 'b'
        let expected = Node::Internal {
            count: 6,
            left: Box::new(Node::Leaf {
                count: 3,
                symbol: 'a',
            }),
            right: Box::new(Node::Internal {
                count: 3,
                left: Box::new(Node::Leaf {
                    count: 1,
                    symbol: 'c',
                }),
                right: Box::new(Node::Leaf {
                    count: 2,
                    symbol: 'b',
                }),
            }),
        };
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_identical_input_builds_identical_trees() {
        let text = "mississippi river banks";
        let first = HuffmanTree::from_text(text).unwrap();
        let second = HuffmanTree::from_text(text).unwrap();
        assert_eq!(first.root(), second.root());
    }

    #[test]
    fn test_single_symbol_root_is_a_leaf() {
        let tree = HuffmanTree::from_text("zzzz").unwrap();
        assert_eq!(
            tree.root(),
            &Node::Leaf {
                count: 4,
                symbol: 'z'
            }
        );
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_empty_alphabet_is_rejected() {
        let err = HuffmanTree::new(&FrequencyTable::default()).unwrap_err();
        assert_eq!(err, CodecError::EmptyAlphabet);
    }

    proptest! {
        #[test]
        fn prop_counts_conserved(text in "\\PC{1,64}") {
            let frequencies = FrequencyTable::from_text(&text);
            let tree = HuffmanTree::new(&frequencies).unwrap();
            prop_assert_eq!(tree.weight(), text.chars().count());
            assert_counts_conserved(tree.root());

            let mut symbols = vec![];
            leaf_symbols(tree.root(), &mut symbols);
            prop_assert_eq!(symbols.len(), frequencies.len());
        }
    }
}
