//! # Error Types for the B+ Tree
//!
//! This module defines the error types surfaced by tree construction and
//! by the iterator protocol.
//!
//! ## Error Handling Strategy
//!
//! The tree itself is infallible once built: `put` always succeeds and
//! `get` signals a missing key through `Option`, never through an error.
//! Errors exist at exactly two places:
//!
//! - Construction with an unusable fan-out (`with_order`).
//! - Driving an iterator past its end (`try_next`).
//!
//! ## Iterator Flow
//!
//! ```text
//! Iter constructed
//!      │
//!      ▼
//! has_next()? ──── false ───► try_next() = Err(IteratorExhausted)
//!      │
//!      ▼ (true)
//! try_next() = Ok((key, value)), cursor advances
//! ```
//!
//! Calling `try_next` on an exhausted iterator is a contract violation in
//! the caller, but it is reported as an explicit error rather than a
//! panic so that the caller never receives a fabricated zero value and
//! can still recover.

use thiserror::Error;

/// Errors that can occur when constructing or iterating a tree.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// The requested fan-out cannot support a valid split.
	///
	/// An order below 3 leaves no room to distribute entries between the
	/// two halves of a split plus a separator; orders above
	/// [`MAX_ORDER`](crate::MAX_ORDER) would overflow the `u16` slot
	/// positions used throughout the node layer.
	#[error("invalid tree order {order}: must be between 3 and 32768")]
	InvalidOrder {
		/// The rejected order value.
		order: usize,
	},

	/// `try_next` was called on an iterator with no remaining entries.
	///
	/// This covers both an iterator over an empty tree (exhausted from
	/// construction) and one that has already yielded its final entry.
	/// Check [`has_next`](crate::iter::Iter::has_next) before calling, or
	/// use the `std::iter::Iterator` interface, which maps this case to
	/// `None`.
	#[error("iterator exhausted")]
	IteratorExhausted,
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
