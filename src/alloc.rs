//! Arena storage for tree nodes.
//!
//! All nodes of a tree live in a single [`NodeArena`], a slab that hands
//! out [`NodeId`] handles at insertion time. The tree references children
//! and leaf siblings exclusively through these ids, which keeps ownership
//! strictly tree-shaped: the doubly-linked leaf chain is a pair of
//! lookup-only ids per leaf, not shared pointers, so no reference cycle
//! can exist and dropping the tree drops every node exactly once.
//!
//! Ids are never reused. The tree has no delete operation, so the arena
//! only ever grows; [`NodeArena::clear`] drops the whole population at
//! once when the tree is reset.

use crate::Node;
use std::ops::{Index, IndexMut};

/// Stable handle to a node within a [`NodeArena`].
///
/// Plain index newtype: `Copy`, compared by value, and meaningless
/// outside the arena that issued it. A `NodeId` stays valid for the
/// lifetime of its tree (nodes are never removed individually).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
	/// Position of the node in the arena's backing storage.
	#[inline]
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

/// Slab of nodes backing one tree.
///
/// Insertion appends and returns the new node's id; access goes through
/// `Index`/`IndexMut` so call sites read as `arena[id]`.
pub(crate) struct NodeArena {
	nodes: Vec<Node>,
}

impl NodeArena {
	/// Creates an empty arena.
	pub(crate) fn new() -> NodeArena {
		NodeArena { nodes: Vec::new() }
	}

	/// Stores `node` and returns its id.
	pub(crate) fn insert(&mut self, node: Node) -> NodeId {
		let id = u32::try_from(self.nodes.len()).expect("node arena exceeded u32 id space");
		self.nodes.push(node);
		NodeId(id)
	}

	/// Number of nodes currently stored.
	///
	/// Used by the invariant checker to bound leaf-chain walks: any walk
	/// longer than the node population proves a cycle.
	pub(crate) fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Drops every node, leaving an empty arena with ids starting over.
	pub(crate) fn clear(&mut self) {
		self.nodes.clear();
	}
}

impl Index<NodeId> for NodeArena {
	type Output = Node;

	#[inline]
	fn index(&self, id: NodeId) -> &Node {
		&self.nodes[id.index()]
	}
}

impl IndexMut<NodeId> for NodeArena {
	#[inline]
	fn index_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.index()]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::LeafNode;

	#[test]
	fn insert_assigns_sequential_ids() {
		let mut arena = NodeArena::new();
		let a = arena.insert(Node::Leaf(LeafNode::new()));
		let b = arena.insert(Node::Leaf(LeafNode::new()));

		assert_ne!(a, b);
		assert_eq!(a.index(), 0);
		assert_eq!(b.index(), 1);
		assert_eq!(arena.len(), 2);
	}

	#[test]
	fn index_reaches_the_stored_node() {
		let mut arena = NodeArena::new();
		let id = arena.insert(Node::Leaf(LeafNode::new()));

		arena[id].as_leaf_mut().keys.push(b"k".to_vec());
		assert_eq!(arena[id].as_leaf().keys.len(), 1);
	}

	#[test]
	fn clear_drops_all_nodes() {
		let mut arena = NodeArena::new();
		for _ in 0..4 {
			arena.insert(Node::Leaf(LeafNode::new()));
		}
		assert_eq!(arena.len(), 4);

		arena.clear();
		assert_eq!(arena.len(), 0);

		// Ids restart from zero after a clear
		let id = arena.insert(Node::Leaf(LeafNode::new()));
		assert_eq!(id.index(), 0);
	}
}
