//! Iterators over the leaf chain of a [`Tree`]
use crate::alloc::NodeId;
use crate::error;
use crate::{Direction, Tree};

use std::iter::FusedIterator;

/// A cursor over the entries of a [`Tree`], in key order.
///
/// The direction is chosen at construction ([`Tree::iter`] or
/// [`Tree::iter_rev`]) and fixed for the iterator's life. The cursor
/// starts at one end of the leaf chain - obtained from the tree in O(1) -
/// and advances by following sibling links, never re-descending the tree.
///
/// Two interfaces are available:
/// - [`has_next`](Iter::has_next)/[`try_next`](Iter::try_next), where
///   driving the cursor past its end is reported as
///   [`Error::IteratorExhausted`](error::Error::IteratorExhausted).
/// - The `std::iter::Iterator` impl, which maps exhaustion to `None` for
///   use with `for` loops and adapters.
///
/// The iterator borrows the tree for its whole life, so the borrow
/// checker rules out structural mutation while one exists.
pub struct Iter<'t> {
	tree: &'t Tree,
	/// Leaf under the cursor; `None` once the iterator is exhausted.
	node: Option<NodeId>,
	/// Slot within that leaf. Advancement is eager, so this is always a
	/// valid slot while `node` is `Some`.
	pos: u16,
	direction: Direction,
}

impl<'t> Iter<'t> {
	pub(crate) fn new(tree: &'t Tree, direction: Direction) -> Iter<'t> {
		// An empty tree is a single empty leaf; normalize straight to the
		// exhausted state instead of pointing at an empty slot.
		if tree.is_empty() {
			return Iter { tree, node: None, pos: 0, direction };
		}

		let (node, pos) = match direction {
			Direction::Forward => (tree.leftmost, 0),
			Direction::Reverse => {
				let last = tree.arena[tree.rightmost].as_leaf().len() - 1;
				(tree.rightmost, last)
			}
		};

		Iter { tree, node: Some(node), pos, direction }
	}

	/// Returns `true` if another entry remains.
	#[inline]
	pub fn has_next(&self) -> bool {
		self.node.is_some()
	}

	/// Yields the entry under the cursor and advances.
	///
	/// # Errors
	///
	/// Returns [`Error::IteratorExhausted`](error::Error::IteratorExhausted)
	/// if no entry remains - on every call past the end, never a
	/// fabricated value.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::error::Error;
	/// use vinetree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.put(b"only", b"entry");
	///
	/// let mut iter = tree.iter_rev();
	/// assert!(iter.has_next());
	/// assert_eq!(iter.try_next().unwrap(), (&b"only"[..], &b"entry"[..]));
	///
	/// assert!(!iter.has_next());
	/// assert_eq!(iter.try_next(), Err(Error::IteratorExhausted));
	/// ```
	pub fn try_next(&mut self) -> error::Result<(&'t [u8], &'t [u8])> {
		let id = self.node.ok_or(error::Error::IteratorExhausted)?;
		let leaf = self.tree.arena[id].as_leaf();
		let entry = leaf.kv_at(self.pos);
		self.advance(id, leaf.len());
		Ok(entry)
	}

	/// Moves the cursor one step in the iterator's direction, hopping to
	/// the adjacent leaf (or the exhausted state) at a node edge.
	fn advance(&mut self, id: NodeId, len: u16) {
		match self.direction {
			Direction::Forward => {
				self.pos += 1;
				if self.pos >= len {
					self.node = self.tree.arena[id].as_leaf().next;
					self.pos = 0;
				}
			}
			Direction::Reverse => {
				if self.pos == 0 {
					self.node = self.tree.arena[id].as_leaf().prev;
					if let Some(prev_id) = self.node {
						// Non-root leaves are never empty, so `len - 1` is safe.
						self.pos = self.tree.arena[prev_id].as_leaf().len() - 1;
					}
				} else {
					self.pos -= 1;
				}
			}
		}
	}

	/// Repositions the cursor relative to `key`: a forward iterator
	/// continues from the first entry `>= key`, a reverse iterator from
	/// the last entry `<= key`. Either may leave the iterator exhausted
	/// when no such entry exists.
	///
	/// This is the one operation that re-descends the tree.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.put(b"a", b"1");
	/// tree.put(b"c", b"3");
	///
	/// let mut iter = tree.iter();
	/// iter.seek(b"b");
	/// assert_eq!(iter.try_next().unwrap().0, &b"c"[..]);
	/// ```
	pub fn seek(&mut self, key: &[u8]) {
		let id = self.tree.find_leaf(key);
		let leaf = self.tree.arena[id].as_leaf();
		let (pos, exact) = leaf.lower_bound(key);

		match self.direction {
			Direction::Forward => {
				if pos < leaf.len() {
					self.node = Some(id);
					self.pos = pos;
				} else {
					// Past the last entry of this leaf: continue at its successor.
					self.node = leaf.next;
					self.pos = 0;
				}
			}
			Direction::Reverse => {
				if exact {
					self.node = Some(id);
					self.pos = pos;
				} else if pos > 0 {
					self.node = Some(id);
					self.pos = pos - 1;
				} else {
					// Everything in this leaf lies above `key`: continue at
					// its predecessor.
					self.node = leaf.prev;
					self.pos = match self.node {
						Some(prev_id) => self.tree.arena[prev_id].as_leaf().len() - 1,
						None => 0,
					};
				}
			}
		}
	}
}

impl<'t> Iterator for Iter<'t> {
	type Item = (&'t [u8], &'t [u8]);

	fn next(&mut self) -> Option<Self::Item> {
		self.try_next().ok()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		match self.node {
			Some(_) => (1, Some(self.tree.len)),
			None => (0, Some(0)),
		}
	}
}

impl FusedIterator for Iter<'_> {}

impl Tree {
	/// Returns an iterator over all entries in ascending key order,
	/// starting at the leftmost leaf.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.put(b"b", b"2");
	/// tree.put(b"a", b"1");
	/// tree.put(b"c", b"3");
	///
	/// let keys: Vec<&[u8]> = tree.iter().map(|(k, _)| k).collect();
	/// assert_eq!(keys, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
	/// ```
	pub fn iter(&self) -> Iter<'_> {
		Iter::new(self, Direction::Forward)
	}

	/// Returns an iterator over all entries in descending key order,
	/// starting at the rightmost leaf.
	///
	/// # Example
	///
	/// ```
	/// use vinetree::Tree;
	///
	/// let mut tree = Tree::new();
	/// tree.put(b"a", b"1");
	/// tree.put(b"b", b"2");
	///
	/// let keys: Vec<&[u8]> = tree.iter_rev().map(|(k, _)| k).collect();
	/// assert_eq!(keys, vec![&b"b"[..], &b"a"[..]]);
	/// ```
	pub fn iter_rev(&self) -> Iter<'_> {
		Iter::new(self, Direction::Reverse)
	}
}
