//! # Vinetree: An In-Memory B+ Tree over Byte Keys
//!
//! This crate provides an ordered map from byte-string keys to byte-string
//! values, implemented as a B+ tree whose leaves form a doubly-linked
//! chain. Point operations descend the tree; iteration walks the chain
//! only, in either direction, without ever re-visiting internal nodes.
//!
//! ## Design Overview
//!
//! ### Key Concepts
//!
//! **Arena-backed nodes**: All nodes live in a single arena owned by the
//! tree and reference each other through copyable ids. Child links and
//! leaf sibling links are ids, not pointers, so ownership stays a strict
//! tree even though the leaf level is doubly linked.
//!
//! **Leaf chain**: Each leaf knows its neighbors in key order. The tree
//! caches the leftmost and rightmost leaf, so an iterator starts at
//! either end in O(1) and advances by following sibling links.
//!
//! **Separator convention**: An internal node with keys `[K0, .., Kn-1]`
//! has `n + 1` children; `Ki` is exactly the smallest key stored in the
//! subtree at `children[i + 1]`. Descent for a key therefore follows the
//! child counted by the number of separators `<=` the key, and lookups,
//! splits, and validation all share this one rule.
//!
//! **Fixed comparator**: Keys compare by unsigned lexicographic byte
//! order (`Ord` on `[u8]`). There are no custom comparators.
//!
//! ### Tree Structure
//!
//! ```text
//!                     ┌──────────────────┐
//!                     │  Internal Node   │  <- Separator keys and child ids
//!                     │  keys:     [K]   │
//!                     │  children: [id]  │
//!                     └────────┬─────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//!        ┌──────────┐    ┌──────────┐    ┌──────────┐
//!        │   Leaf   │◄───┤   Leaf   │◄───┤   Leaf   │  <- prev links
//!        │ keys:[K] ├───►│ keys:[K] ├───►│ keys:[K] │  <- next links
//!        │ vals:[V] │    │ vals:[V] │    │ vals:[V] │
//!        └──────────┘    └──────────┘    └──────────┘
//!             ▲                               ▲
//!         leftmost                        rightmost
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use vinetree::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Insert or overwrite key-value pairs
//! tree.put(b"apple", b"sweet");
//! tree.put(b"banana", b"honey");
//!
//! // Point lookup
//! assert_eq!(tree.get(b"banana"), Some(&b"honey"[..]));
//! assert_eq!(tree.get(b"cherry"), None);
//!
//! // In-order iteration over the leaf chain
//! let keys: Vec<&[u8]> = tree.iter().map(|(k, _)| k).collect();
//! assert_eq!(keys, vec![&b"apple"[..], &b"banana"[..]]);
//! ```
//!
//! ## Threading
//!
//! The tree is single-threaded by design: `put` takes `&mut self`, reads
//! take `&self`, and iterators borrow the tree for their whole life. The
//! borrow checker therefore rules out structural mutation during
//! iteration. The type is `Send`, so a caller who needs sharing can wrap
//! it in a lock of their choosing.

use smallvec::{smallvec, SmallVec};

use std::fmt;

pub mod error;
pub mod iter;
mod alloc;
#[cfg(any(test, feature = "test-utils"))]
pub mod util;

use alloc::{NodeArena, NodeId};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// Smallest usable fan-out. Below 3 a split cannot distribute entries
/// between two halves and a separator.
pub const MIN_ORDER: usize = 3;

/// Largest accepted fan-out. Node slot positions are `u16`, so the order
/// (and with it the one-slot overflow a node holds mid-insert) must stay
/// comfortably inside that range.
pub const MAX_ORDER: usize = 32768;

/// Fan-out used by [`Tree::new`]. Keeps leaves around cache-line-friendly
/// sizes for short keys without making the tree needlessly deep.
pub const DEFAULT_ORDER: usize = 64;

/// Inline slot capacity for per-node storage. Nodes of small-order trees
/// avoid per-node heap allocation entirely; larger orders spill to the
/// heap once a node outgrows this.
const INLINE_SLOTS: usize = 8;

/// Slot storage for one node: keys, values, or child ids.
type Slots<T> = SmallVec<[T; INLINE_SLOTS]>;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered map from byte keys to byte values backed by a B+ tree.
///
/// Keys and values are arbitrary byte strings, including empty ones.
/// Entries are kept in unsigned lexicographic key order; [`Tree::put`]
/// inserts or overwrites, [`Tree::get`] looks up a single key, and
/// [`iter`](Tree::iter)/[`iter_rev`](Tree::iter_rev) traverse the leaf
/// chain in either direction.
///
/// # Structure
///
/// The tree owns every node through an internal arena. It tracks:
/// - The current root (replaced when a root split grows the tree).
/// - The leftmost and rightmost leaf, seeding iterators in O(1).
/// - The fan-out (`order`), fixed at construction.
///
/// There is no delete operation: nodes are created by splits and live as
/// long as the tree (or until [`clear`](Tree::clear) drops them all).
pub struct Tree {
	/// Every node of the tree; children and siblings are arena ids.
	arena: NodeArena,
	/// The current top node. Reassigned whenever a root split occurs.
	root: NodeId,
	/// First leaf in key order.
	leftmost: NodeId,
	/// Last leaf in key order.
	rightmost: NodeId,
	/// Maximum fan-out: a node holds at most `order - 1` keys at rest.
	order: usize,
	/// Number of live entries.
	len: usize,
	/// Levels in the tree; 1 while the root is still a leaf.
	height: usize,
}

impl fmt::Debug for Tree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Tree")
			.field("order", &self.order)
			.field("len", &self.len)
			.field("height", &self.height)
			.finish_non_exhaustive()
	}
}

impl Default for Tree {
	fn default() -> Self {
		Self::new()
	}
}

// ---------------------------------------------------------------------------
// Internal Helper Types
// ---------------------------------------------------------------------------

/// Direction of iterator travel along the leaf chain.
#[derive(Debug, PartialEq, Copy, Clone)]
pub(crate) enum Direction {
	/// Toward higher keys, following `next` links.
	Forward,
	/// Toward lower keys, following `prev` links.
	Reverse,
}

// ---------------------------------------------------------------------------
// Tree Implementation
// ---------------------------------------------------------------------------

impl Tree {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates an empty tree with [`DEFAULT_ORDER`].
	///
	/// The tree starts as a single empty leaf that is simultaneously the
	/// root, the leftmost, and the rightmost node.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let tree = Tree::new();
	/// assert!(tree.is_empty());
	/// assert_eq!(tree.height(), 1);
	/// ```
	pub fn new() -> Tree {
		Tree::with_order(DEFAULT_ORDER).expect("DEFAULT_ORDER is within the valid range")
	}

	/// Creates an empty tree with the given maximum fan-out.
	///
	/// The order is fixed for the life of the tree: every node holds at
	/// most `order - 1` keys, and an internal node at most `order`
	/// children.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidOrder`](error::Error::InvalidOrder) when
	/// `order` lies outside `MIN_ORDER..=MAX_ORDER`.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let tree = Tree::with_order(4).unwrap();
	/// assert_eq!(tree.order(), 4);
	///
	/// assert!(Tree::with_order(2).is_err());
	/// ```
	pub fn with_order(order: usize) -> error::Result<Tree> {
		if !(MIN_ORDER..=MAX_ORDER).contains(&order) {
			return Err(error::Error::InvalidOrder { order });
		}

		let mut arena = NodeArena::new();
		let root = arena.insert(Node::Leaf(LeafNode::new()));

		Ok(Tree {
			arena,
			root,
			leftmost: root,
			rightmost: root,
			order,
			len: 0,
			height: 1,
		})
	}

	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Returns the value stored under `key`, or `None` if the key is
	/// absent.
	///
	/// A missing key is a normal outcome, not an error. Never mutates the
	/// tree.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.put(b"fern", b"frond");
	///
	/// assert_eq!(tree.get(b"fern"), Some(&b"frond"[..]));
	/// assert_eq!(tree.get(b"moss"), None);
	/// ```
	pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
		let leaf = self.arena[self.find_leaf(key)].as_leaf();
		let (pos, exact) = leaf.lower_bound(key);
		if exact {
			Some(&leaf.values[pos as usize])
		} else {
			None
		}
	}

	/// Returns `true` if `key` has an entry in the tree.
	pub fn contains_key(&self, key: &[u8]) -> bool {
		self.get(key).is_some()
	}

	/// Returns the entry with the smallest key, or `None` on an empty
	/// tree. O(1) via the cached leftmost leaf.
	pub fn first_key_value(&self) -> Option<(&[u8], &[u8])> {
		if self.is_empty() {
			return None;
		}
		Some(self.arena[self.leftmost].as_leaf().kv_at(0))
	}

	/// Returns the entry with the largest key, or `None` on an empty
	/// tree. O(1) via the cached rightmost leaf.
	pub fn last_key_value(&self) -> Option<(&[u8], &[u8])> {
		if self.is_empty() {
			return None;
		}
		let leaf = self.arena[self.rightmost].as_leaf();
		Some(leaf.kv_at(leaf.len() - 1))
	}

	/// Descends from the root to the leaf responsible for `key`.
	pub(crate) fn find_leaf(&self, key: &[u8]) -> NodeId {
		let mut current = self.root;
		loop {
			match &self.arena[current] {
				Node::Internal(internal) => {
					current = internal.children[internal.child_index(key) as usize];
				}
				Node::Leaf(_) => return current,
			}
		}
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts `key` with `value`, overwriting any existing value.
	///
	/// An overwrite changes no structure and leaves [`len`](Tree::len)
	/// untouched. A fresh insert may overfill the target leaf, in which
	/// case splits propagate upward along the descent path; when the root
	/// itself splits, a new root with exactly two children is installed
	/// and the height grows by one.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.put(b"fern", b"frond");
	/// tree.put(b"fern", b"replaced");
	///
	/// assert_eq!(tree.get(b"fern"), Some(&b"replaced"[..]));
	/// assert_eq!(tree.len(), 1);
	/// ```
	pub fn put(&mut self, key: &[u8], value: &[u8]) {
		// Descend to the candidate leaf, recording (node, child slot) per
		// level so splits can propagate without recursion.
		let mut path: SmallVec<[(NodeId, u16); 8]> = smallvec![];
		let mut current = self.root;
		loop {
			match &self.arena[current] {
				Node::Internal(internal) => {
					let pos = internal.child_index(key);
					path.push((current, pos));
					current = internal.children[pos as usize];
				}
				Node::Leaf(_) => break,
			}
		}

		let leaf = self.arena[current].as_leaf_mut();
		let (pos, exact) = leaf.lower_bound(key);
		if exact {
			// Overwrite in place: no structural change, no length change.
			let slot = &mut leaf.values[pos as usize];
			slot.clear();
			slot.extend_from_slice(value);
			return;
		}

		leaf.insert_at(pos, key.to_vec(), value.to_vec());
		self.len += 1;

		// Resolve overflow bottom-up. Each split hands one separator and
		// one new right sibling to the parent recorded during descent; an
		// overfull parent splits in turn, until the root itself splits.
		let mut target = current;
		while self.arena[target].is_full(self.order) {
			let (separator, right) = self.split_node(target);
			match path.pop() {
				Some((parent, child_pos)) => {
					self.arena[parent].as_internal_mut().insert_separator(child_pos, separator, right);
					target = parent;
				}
				None => {
					self.grow_root(separator, target, right);
					break;
				}
			}
		}
	}

	/// Splits the overfull node `id` at its median, returning the
	/// separator key for the parent and the id of the new right sibling.
	fn split_node(&mut self, id: NodeId) -> (Vec<u8>, NodeId) {
		let at = (self.order / 2) as u16;
		if self.arena[id].is_leaf() {
			self.split_leaf(id, at)
		} else {
			self.split_internal(id, at)
		}
	}

	/// Leaf split: the right sibling takes the upper half, and the
	/// separator is a copy of its first key, which stays in the right
	/// leaf. Splices the new leaf into the sibling chain in O(1).
	#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
	fn split_leaf(&mut self, id: NodeId, at: u16) -> (Vec<u8>, NodeId) {
		let right = self.arena[id].as_leaf_mut().split(at);
		let separator = right.keys[0].clone();
		let old_next = right.next;
		let right_id = self.arena.insert(Node::Leaf(right));

		// Chain splice: left <-> right <-> old right neighbor.
		self.arena[right_id].as_leaf_mut().prev = Some(id);
		self.arena[id].as_leaf_mut().next = Some(right_id);
		if let Some(next_id) = old_next {
			self.arena[next_id].as_leaf_mut().prev = Some(right_id);
		}

		// The left half keeps its id, so leftmost can never move here;
		// rightmost moves exactly when the old rightmost leaf split.
		if self.rightmost == id {
			self.rightmost = right_id;
		}

		#[cfg(feature = "tracing")]
		tracing::trace!(left = id.index(), right = right_id.index(), "leaf split");

		(separator, right_id)
	}

	/// Internal split: the median key moves up to the parent, the right
	/// sibling takes the keys above it along with their children.
	#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
	fn split_internal(&mut self, id: NodeId, at: u16) -> (Vec<u8>, NodeId) {
		let (separator, right) = self.arena[id].as_internal_mut().split(at);
		let right_id = self.arena.insert(Node::Internal(right));

		#[cfg(feature = "tracing")]
		tracing::trace!(left = id.index(), right = right_id.index(), "internal split");

		(separator, right_id)
	}

	/// Installs a new root with one separator and exactly two children
	/// after the old root split.
	fn grow_root(&mut self, separator: Vec<u8>, left: NodeId, right: NodeId) {
		self.root = self.arena.insert(Node::Internal(InternalNode {
			keys: smallvec![separator],
			children: smallvec![left, right],
		}));
		self.height += 1;

		#[cfg(feature = "tracing")]
		tracing::debug!(height = self.height, "root split: new root installed");
	}

	// -----------------------------------------------------------------------
	// Size and Maintenance
	// -----------------------------------------------------------------------

	/// Number of entries in the tree.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the tree holds no entries.
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of levels: 1 for a single-leaf tree, growing by one per
	/// root split.
	pub fn height(&self) -> usize {
		self.height
	}

	/// The maximum fan-out this tree was created with.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Drops every entry, resetting to the empty single-leaf state. The
	/// order is retained.
	pub fn clear(&mut self) {
		self.arena.clear();
		let root = self.arena.insert(Node::Leaf(LeafNode::new()));
		self.root = root;
		self.leftmost = root;
		self.rightmost = root;
		self.len = 0;
		self.height = 1;

		#[cfg(feature = "tracing")]
		tracing::debug!("tree cleared");
	}
}

// ===========================================================================
// Node
// ===========================================================================

/// A tree node: either an internal router or a leaf.
///
/// A slot in an internal node refers to a child; a slot in a leaf holds a
/// value. Keeping the two in one enum with per-kind storage means a slot
/// can never be read as the wrong kind: the accessors below pattern-match
/// and treat a mismatch as a traversal bug, failing fast instead of
/// misreading data.
pub(crate) enum Node {
	/// An internal (index) node containing separator keys and child ids.
	Internal(InternalNode),
	/// A leaf node containing key-value pairs.
	Leaf(LeafNode),
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Node::Internal(ref internal) => f.debug_tuple("Internal").field(internal).finish(),
			Node::Leaf(ref leaf) => f.debug_tuple("Leaf").field(leaf).finish(),
		}
	}
}

impl Node {
	/// Returns `true` if this is a leaf node.
	#[inline]
	pub(crate) fn is_leaf(&self) -> bool {
		matches!(self, Node::Leaf(_))
	}

	/// Number of keys in the node, whatever its kind.
	#[inline]
	pub(crate) fn len(&self) -> u16 {
		match self {
			Node::Internal(ref internal) => internal.len(),
			Node::Leaf(ref leaf) => leaf.len(),
		}
	}

	/// Returns `true` once the node has consumed its overflow slot and
	/// must split. Nodes hold at most `order - 1` keys at rest; `put`
	/// inserts first and resolves the overflow immediately after.
	#[inline]
	pub(crate) fn is_full(&self, order: usize) -> bool {
		self.len() as usize == order
	}

	/// Returns a reference to the inner leaf node, if this is a leaf.
	///
	/// Returns `None` if this is an internal node.
	#[inline]
	#[allow(dead_code)]
	pub(crate) fn try_as_leaf(&self) -> Option<&LeafNode> {
		match self {
			Node::Leaf(ref leaf) => Some(leaf),
			Node::Internal(_) => None,
		}
	}

	/// Returns a reference to the inner leaf node.
	///
	/// # Panics
	///
	/// Panics if called on an internal node. Use `try_as_leaf()` for a
	/// fallible alternative.
	#[inline]
	pub(crate) fn as_leaf(&self) -> &LeafNode {
		match self {
			Node::Leaf(ref leaf) => leaf,
			Node::Internal(_) => {
				unreachable!("as_leaf() called on internal node - this indicates a tree traversal bug")
			}
		}
	}

	/// Returns a mutable reference to the inner leaf node.
	///
	/// # Panics
	///
	/// Panics if called on an internal node.
	#[inline]
	pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode {
		match self {
			Node::Leaf(ref mut leaf) => leaf,
			Node::Internal(_) => {
				unreachable!("as_leaf_mut() called on internal node - this indicates a tree traversal bug")
			}
		}
	}

	/// Returns a reference to the inner internal node, if this is one.
	///
	/// Returns `None` if this is a leaf node.
	#[inline]
	#[allow(dead_code)]
	pub(crate) fn try_as_internal(&self) -> Option<&InternalNode> {
		match self {
			Node::Internal(ref internal) => Some(internal),
			Node::Leaf(_) => None,
		}
	}

	/// Returns a reference to the inner internal node.
	///
	/// # Panics
	///
	/// Panics if called on a leaf node. Use `try_as_internal()` for a
	/// fallible alternative.
	#[inline]
	pub(crate) fn as_internal(&self) -> &InternalNode {
		match self {
			Node::Internal(ref internal) => internal,
			Node::Leaf(_) => {
				unreachable!("as_internal() called on leaf node - this indicates a tree traversal bug")
			}
		}
	}

	/// Returns a mutable reference to the inner internal node.
	///
	/// # Panics
	///
	/// Panics if called on a leaf node.
	#[inline]
	pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode {
		match self {
			Node::Internal(ref mut internal) => internal,
			Node::Leaf(_) => {
				unreachable!("as_internal_mut() called on leaf node - this indicates a tree traversal bug")
			}
		}
	}
}

// ===========================================================================
// Leaf Node
// ===========================================================================

/// A leaf node, storing the actual key-value pairs.
///
/// Keys are kept sorted; `values[i]` belongs to `keys[i]`. Leaves form a
/// doubly-linked chain in key order through the `next`/`prev` ids, which
/// is what iterators walk. The links are lookup-only references into the
/// tree's arena and carry no ownership.
pub(crate) struct LeafNode {
	/// Sorted array of keys.
	pub(crate) keys: Slots<Vec<u8>>,
	/// Values corresponding to keys (same index).
	pub(crate) values: Slots<Vec<u8>>,
	/// The leaf with the next-larger keys; `None` on the rightmost leaf.
	pub(crate) next: Option<NodeId>,
	/// The leaf with the next-smaller keys; `None` on the leftmost leaf.
	pub(crate) prev: Option<NodeId>,
}

impl fmt::Debug for LeafNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LeafNode")
			.field("keys", &self.keys)
			.field("values", &self.values)
			.field("next", &self.next)
			.field("prev", &self.prev)
			.finish()
	}
}

impl LeafNode {
	/// Creates a new, empty leaf node.
	pub(crate) fn new() -> LeafNode {
		LeafNode {
			keys: smallvec![],
			values: smallvec![],
			next: None,
			prev: None,
		}
	}

	/// Number of key-value pairs in this leaf.
	#[inline]
	pub(crate) fn len(&self) -> u16 {
		self.keys.len() as u16
	}

	/// Binary search for a key, returning position and whether it's an
	/// exact match.
	///
	/// # Returns
	///
	/// `(position, exact_match)` where:
	/// - `position`: Index where the key is or should be inserted
	/// - `exact_match`: `true` if `keys[position] == key`
	#[inline]
	pub(crate) fn lower_bound(&self, key: &[u8]) -> (u16, bool) {
		let mut lower = 0;
		let mut upper = self.len();

		while lower < upper {
			let mid = ((upper - lower) / 2) + lower;
			let mid_key = self.keys[mid as usize].as_slice();

			if key < mid_key {
				upper = mid;
			} else if key > mid_key {
				lower = mid + 1;
			} else {
				return (mid, true);
			}
		}

		// No exact match - lower is the insertion point
		(lower, false)
	}

	/// Returns references to the key and value at the given position.
	#[inline]
	pub(crate) fn kv_at(&self, pos: u16) -> (&[u8], &[u8]) {
		(&self.keys[pos as usize], &self.values[pos as usize])
	}

	/// Inserts a key-value pair at the specified position, shifting
	/// subsequent entries right. The caller resolves any resulting
	/// overflow with a split.
	pub(crate) fn insert_at(&mut self, pos: u16, key: Vec<u8>, value: Vec<u8>) {
		self.keys.insert(pos as usize, key);
		self.values.insert(pos as usize, value);
	}

	/// Splits this leaf, moving entries from `at` onward into a new right
	/// sibling.
	///
	/// The returned leaf inherits this leaf's `next` link; its first key
	/// is the separator the caller copies up to the parent (the key
	/// itself remains in the right leaf). Splicing `prev`/`next` of the
	/// surrounding chain is the caller's job, since it requires the new
	/// node's id.
	pub(crate) fn split(&mut self, at: u16) -> LeafNode {
		LeafNode {
			keys: self.keys.drain(at as usize..).collect(),
			values: self.values.drain(at as usize..).collect(),
			next: self.next.take(),
			prev: None,
		}
	}
}

// ===========================================================================
// Internal Node
// ===========================================================================

/// An internal (index) node, storing separator keys and child ids.
///
/// Internal nodes hold no values - they only route descents.
///
/// # Structure
///
/// ```text
/// keys:       [K0,  K1,  K2,  ...  K(n-1)]
/// children: [C0,  C1,  C2,  C3, ...  C(n)]
///             │    │    │    │         │
///             ▼    ▼    ▼    ▼         ▼
///          < K0  >=K0 >=K1  ...     >= K(n-1)
/// ```
///
/// # Invariants
///
/// - `children.len() == keys.len() + 1`
/// - Keys are sorted in ascending order
/// - `keys[i]` is exactly the smallest key in the subtree at
///   `children[i + 1]`
pub(crate) struct InternalNode {
	/// Separator keys, sorted ascending.
	pub(crate) keys: Slots<Vec<u8>>,
	/// Child node ids; always one more than there are keys.
	pub(crate) children: Slots<NodeId>,
}

impl fmt::Debug for InternalNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InternalNode")
			.field("keys", &self.keys)
			.field("children", &self.children)
			.finish()
	}
}

impl InternalNode {
	/// Number of separator keys in this node.
	#[inline]
	pub(crate) fn len(&self) -> u16 {
		self.keys.len() as u16
	}

	/// Binary search among the separators, returning position and whether
	/// it's an exact match. Same contract as [`LeafNode::lower_bound`].
	#[inline]
	pub(crate) fn lower_bound(&self, key: &[u8]) -> (u16, bool) {
		let mut lower = 0;
		let mut upper = self.len();

		while lower < upper {
			let mid = ((upper - lower) / 2) + lower;
			let mid_key = self.keys[mid as usize].as_slice();

			if key < mid_key {
				upper = mid;
			} else if key > mid_key {
				lower = mid + 1;
			} else {
				return (mid, true);
			}
		}

		(lower, false)
	}

	/// Index of the child to descend into for `key`: the number of
	/// separators `<=` the key. Equality goes right, because a separator
	/// is the smallest key of the subtree to its right.
	#[inline]
	pub(crate) fn child_index(&self, key: &[u8]) -> u16 {
		let (pos, exact) = self.lower_bound(key);
		if exact {
			pos + 1
		} else {
			pos
		}
	}

	/// Inserts the separator produced by splitting the child at
	/// `child_pos`, placing the new right sibling immediately after its
	/// left half. The caller resolves any resulting overflow with a
	/// split.
	///
	/// ```text
	/// Before: keys=[A, B]    children=[c0, c1, c2]   (c1 split)
	/// After:  keys=[A, s, B] children=[c0, c1, r, c2]
	/// ```
	pub(crate) fn insert_separator(&mut self, child_pos: u16, key: Vec<u8>, child: NodeId) {
		self.keys.insert(child_pos as usize, key);
		self.children.insert((child_pos + 1) as usize, child);
	}

	/// Splits this internal node at `at`: the separator key there moves
	/// up to the parent (returned, present in neither half), the new
	/// right sibling takes the keys above it along with their children.
	pub(crate) fn split(&mut self, at: u16) -> (Vec<u8>, InternalNode) {
		let right = InternalNode {
			keys: self.keys.drain((at + 1) as usize..).collect(),
			children: self.children.drain((at + 1) as usize..).collect(),
		};
		let separator = self.keys.pop().expect("split requires at least one key below the median");
		(separator, right)
	}
}

// ===========================================================================
// Test-Only Validation
// ===========================================================================

/// Invariant validation for testing. Walks the whole structure to ensure
/// no operation can have left it inconsistent.
#[cfg(any(test, feature = "test-utils"))]
impl Tree {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// Call after operations in tests to verify structural integrity.
	///
	/// # Invariants Checked
	///
	/// 1. Uniform depth: every leaf sits at the level `height` names
	/// 2. Key ordering: keys strictly ascending within each node
	/// 3. Separator convention: each separator equals the smallest key of
	///    the subtree to its right
	/// 4. Range consistency: every key lies within the bounds inherited
	///    from its ancestors
	/// 5. Capacity: no node exceeds `order - 1` keys; only a root leaf
	///    may be empty
	/// 6. Parallel storage: leaf values and internal children line up
	///    with their keys
	/// 7. Leaf chain: `next`/`prev` agree with the in-order leaf
	///    sequence - no cycles, no gaps - and `leftmost`/`rightmost`
	///    point at the chain ends
	/// 8. Counters: `len` equals the number of stored entries
	pub fn assert_invariants(&self) {
		let mut leaves = Vec::new();
		self.validate_node(self.root, 1, None, None, &mut leaves);

		assert!(!leaves.is_empty(), "a tree always has at least its root leaf");
		assert_eq!(self.leftmost, leaves[0], "leftmost does not point at the first leaf");
		assert_eq!(
			self.rightmost,
			*leaves.last().expect("leaves is non-empty"),
			"rightmost does not point at the last leaf"
		);

		// Walk the chain by id so a cycle is detected rather than looped.
		let mut chain = Vec::new();
		let mut prev = None;
		let mut current = Some(self.leftmost);
		while let Some(id) = current {
			assert!(chain.len() < self.arena.len() + 1, "leaf chain contains a cycle");
			let leaf = self.arena[id].as_leaf();
			assert_eq!(leaf.prev, prev, "prev link of leaf {:?} disagrees with the chain", id);
			chain.push(id);
			prev = Some(id);
			current = leaf.next;
		}
		assert_eq!(chain, leaves, "leaf chain disagrees with the in-order leaf sequence");

		let total: usize = leaves.iter().map(|id| self.arena[*id].as_leaf().keys.len()).sum();
		assert_eq!(self.len, total, "len counter disagrees with stored entries");
	}

	/// Recursively validates the subtree under `id` and returns its
	/// smallest key (`None` only for an empty root leaf).
	///
	/// `level` counts from 1 at the root; leaves must sit at
	/// `level == height`. `lower`/`upper` are the bounds inherited from
	/// ancestors: `lower <= key < upper`.
	fn validate_node<'a>(
		&'a self,
		id: NodeId,
		level: usize,
		lower: Option<&[u8]>,
		upper: Option<&[u8]>,
		leaves: &mut Vec<NodeId>,
	) -> Option<&'a [u8]> {
		match &self.arena[id] {
			Node::Leaf(leaf) => {
				assert_eq!(
					level, self.height,
					"leaf {:?} at level {} but the tree height is {}",
					id, level, self.height
				);
				assert_eq!(
					leaf.keys.len(),
					leaf.values.len(),
					"leaf {:?}: keys.len() {} != values.len() {}",
					id,
					leaf.keys.len(),
					leaf.values.len()
				);
				assert!(
					leaf.keys.len() <= self.order - 1,
					"leaf {:?} holds {} keys, capacity is {}",
					id,
					leaf.keys.len(),
					self.order - 1
				);
				if id != self.root {
					assert!(!leaf.keys.is_empty(), "non-root leaf {:?} is empty", id);
				}

				for i in 1..leaf.keys.len() {
					assert!(
						leaf.keys[i - 1] < leaf.keys[i],
						"leaf {:?} keys not strictly ascending at {}: {:?} >= {:?}",
						id,
						i,
						leaf.keys[i - 1],
						leaf.keys[i]
					);
				}
				for key in &leaf.keys {
					if let Some(lower) = lower {
						assert!(
							key.as_slice() >= lower,
							"leaf {:?} key {:?} below ancestor bound {:?}",
							id,
							key,
							lower
						);
					}
					if let Some(upper) = upper {
						assert!(
							key.as_slice() < upper,
							"leaf {:?} key {:?} not below ancestor bound {:?}",
							id,
							key,
							upper
						);
					}
				}

				leaves.push(id);
				leaf.keys.first().map(|k| k.as_slice())
			}
			Node::Internal(internal) => {
				assert!(
					level < self.height,
					"internal node {:?} at level {} but the tree height is {}",
					id, level, self.height
				);
				assert_eq!(
					internal.children.len(),
					internal.keys.len() + 1,
					"internal {:?}: {} children for {} keys",
					id,
					internal.children.len(),
					internal.keys.len()
				);
				assert!(
					!internal.keys.is_empty(),
					"internal node {:?} has no separators",
					id
				);
				assert!(
					internal.keys.len() <= self.order - 1,
					"internal {:?} holds {} keys, capacity is {}",
					id,
					internal.keys.len(),
					self.order - 1
				);

				for i in 1..internal.keys.len() {
					assert!(
						internal.keys[i - 1] < internal.keys[i],
						"internal {:?} keys not strictly ascending at {}: {:?} >= {:?}",
						id,
						i,
						internal.keys[i - 1],
						internal.keys[i]
					);
				}
				for key in &internal.keys {
					if let Some(lower) = lower {
						assert!(
							key.as_slice() >= lower,
							"internal {:?} separator {:?} below ancestor bound {:?}",
							id,
							key,
							lower
						);
					}
					if let Some(upper) = upper {
						assert!(
							key.as_slice() < upper,
							"internal {:?} separator {:?} not below ancestor bound {:?}",
							id,
							key,
							upper
						);
					}
				}

				let mut subtree_min = None;
				let mut child_lower = lower;
				for (i, child) in internal.children.iter().enumerate() {
					let child_upper = internal.keys.get(i).map(|k| k.as_slice()).or(upper);
					let child_min = self.validate_node(*child, level + 1, child_lower, child_upper, leaves);

					if i == 0 {
						subtree_min = child_min;
					} else {
						// The separator left of this child must be its exact minimum.
						let separator = internal.keys[i - 1].as_slice();
						assert_eq!(
							child_min,
							Some(separator),
							"separator {:?} of internal {:?} is not the smallest key of child {}",
							separator,
							id,
							i
						);
					}
					child_lower = internal.keys.get(i).map(|k| k.as_slice());
				}

				subtree_min
			}
		}
	}
}
