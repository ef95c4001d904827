//! Test helpers for building sample trees from JSON fixtures
use crate::Tree;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct Entry {
	key: String,
	value: String,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TreeNode {
	Internal { keys: Vec<String>, children: Vec<TreeNode> },
	Leaf { entries: Vec<Entry> },
}

#[derive(Deserialize, Debug)]
struct SampleTree {
	order: usize,
	root: TreeNode,
}

fn collect_entries(tree_node: TreeNode, out: &mut Vec<(String, String)>) {
	match tree_node {
		TreeNode::Internal { children, .. } => {
			for child in children {
				collect_entries(child, out);
			}
		}
		TreeNode::Leaf { entries } => {
			for entry in entries {
				out.push((entry.key, entry.value));
			}
		}
	}
}

/// Loads a tree description from a JSON fixture and rebuilds it entry by
/// entry, so a fixture stays loadable even when its drawn shape and the
/// tree's split arithmetic disagree.
pub fn sample_tree<P: AsRef<std::path::Path>>(path: P) -> Tree {
	let file = std::fs::File::open(path).expect("failed to find file");
	let sample: SampleTree = serde_json::from_reader(file).unwrap();

	let mut entries = Vec::new();
	collect_entries(sample.root, &mut entries);

	let mut tree = Tree::with_order(sample.order).expect("fixture order out of range");
	for (key, value) in entries {
		tree.put(key.as_bytes(), value.as_bytes());
	}
	tree
}
