//! # Fixture-Based Tests for Vinetree
//!
//! Tests that load pre-defined tree structures from the JSON files under
//! `tests/fixtures/` via `util::sample_tree` (enabled through the
//! `test-utils` feature), then validate and query them.

use std::path::Path;
use vinetree::util::sample_tree;
use vinetree::Tree;

fn load(name: &str) -> Tree {
	let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
	sample_tree(path)
}

// ===========================================================================
// small.json: a single-leaf tree
// ===========================================================================

#[test]
fn small_fixture_loads() {
	let tree = load("small.json");

	tree.assert_invariants();
	assert_eq!(tree.order(), 4);
	assert_eq!(tree.len(), 3);
	assert_eq!(tree.height(), 1);
}

#[test]
fn small_fixture_lookup() {
	let tree = load("small.json");

	assert_eq!(tree.get(b"banana"), Some(&b"honey"[..]));
	assert_eq!(tree.get(b"apple"), Some(&b"sweet"[..]));
	assert_eq!(tree.get(b"cinnamon"), Some(&b"savoury"[..]));

	// Keys absent from the fixture
	assert_eq!(tree.get(b"coconut"), None);
	assert_eq!(tree.get(b""), None);
}

#[test]
fn small_fixture_iteration() {
	let tree = load("small.json");

	let keys: Vec<&[u8]> = tree.iter().map(|(k, _)| k).collect();
	assert_eq!(keys, vec![&b"apple"[..], &b"banana"[..], &b"cinnamon"[..]]);

	let reversed: Vec<&[u8]> = tree.iter_rev().map(|(k, _)| k).collect();
	assert_eq!(reversed, vec![&b"cinnamon"[..], &b"banana"[..], &b"apple"[..]]);
}

#[test]
fn small_fixture_accepts_new_entries() {
	let mut tree = load("small.json");

	// A fourth key overflows the order-4 root leaf
	tree.put(b"blueberry", b"tart");

	tree.assert_invariants();
	assert_eq!(tree.len(), 4);
	assert_eq!(tree.height(), 2);

	let keys: Vec<&[u8]> = tree.iter().map(|(k, _)| k).collect();
	assert_eq!(keys, vec![&b"apple"[..], &b"banana"[..], &b"blueberry"[..], &b"cinnamon"[..]]);
}

// ===========================================================================
// split.json: a two-level tree with four leaves
// ===========================================================================

#[test]
fn split_fixture_structure() {
	let tree = load("split.json");

	tree.assert_invariants();
	assert_eq!(tree.order(), 4);
	assert_eq!(tree.len(), 8);
	// Rebuilt in fixture order, the drawn shape is exactly what comes out
	assert_eq!(tree.height(), 2);

	assert_eq!(tree.first_key_value(), Some((&b"0001"[..], &b"one"[..])));
	assert_eq!(tree.last_key_value(), Some((&b"0008"[..], &b"eight"[..])));
}

#[test]
fn split_fixture_lookup() {
	let tree = load("split.json");

	let expected: [(&[u8], &[u8]); 8] = [
		(b"0001", b"one"),
		(b"0002", b"two"),
		(b"0003", b"three"),
		(b"0004", b"four"),
		(b"0005", b"five"),
		(b"0006", b"six"),
		(b"0007", b"seven"),
		(b"0008", b"eight"),
	];

	for (k, v) in expected {
		assert_eq!(tree.get(k), Some(v), "Key {:?} not found", k);
	}

	// Keys in the gaps and outside the range
	assert_eq!(tree.get(b"0000"), None);
	assert_eq!(tree.get(b"00045"), None);
	assert_eq!(tree.get(b"0009"), None);
}

#[test]
fn split_fixture_scan() {
	let tree = load("split.json");

	let keys: Vec<&[u8]> = tree.iter().map(|(k, _)| k).collect();
	assert_eq!(keys.len(), 8);
	assert!(keys.windows(2).all(|w| w[0] < w[1]));

	let mut reversed: Vec<&[u8]> = tree.iter_rev().map(|(k, _)| k).collect();
	reversed.reverse();
	assert_eq!(keys, reversed);
}

#[test]
fn split_fixture_seek() {
	let tree = load("split.json");

	// Seek to an existing key
	let mut iter = tree.iter();
	iter.seek(b"0004");
	assert_eq!(iter.try_next().unwrap(), (&b"0004"[..], &b"four"[..]));

	// Seek into a gap between leaves
	iter.seek(b"00045");
	assert_eq!(iter.try_next().unwrap().0, &b"0005"[..]);

	// Reverse seek into the same gap
	let mut rev = tree.iter_rev();
	rev.seek(b"00045");
	assert_eq!(rev.try_next().unwrap().0, &b"0004"[..]);
}

#[test]
fn split_fixture_keeps_growing() {
	let mut tree = load("split.json");

	for i in 9..50u32 {
		let key = format!("{:04}", i);
		tree.put(key.as_bytes(), b"later");
		tree.assert_invariants();
	}

	assert_eq!(tree.len(), 49);
	assert_eq!(tree.get(b"0042"), Some(&b"later"[..]));
	// Fixture entries survive the growth
	assert_eq!(tree.get(b"0003"), Some(&b"three"[..]));
}
