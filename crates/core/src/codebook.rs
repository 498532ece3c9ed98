//! Extraction of the code-to-target mapping from a built tree.

use indexmap::IndexMap;

use crate::tree::Node;
use crate::weights::Alphabet;

/// A root-to-leaf path of alphabet symbols.
///
/// The set of codes extracted from one tree is prefix-free: every target
/// leaf sits at a distinct position in a full n-ary tree.
pub type Code = Vec<String>;

/// Code mapped to `(target, weight)`; one entry per real target.
pub type EncodingMap = IndexMap<Code, (String, u64)>;

/// Walks the tree depth-first, assigning the alphabet symbol at index `i`
/// to the `i`-th child of every internal node.
///
/// Padding leaves contribute no entry.
pub fn extract(root: &Node, alphabet: &Alphabet) -> EncodingMap {
	let mut map = EncodingMap::new();
	let mut path = Code::new();
	walk(root, alphabet, &mut path, &mut map);
	map
}

fn walk(node: &Node, alphabet: &Alphabet, path: &mut Code, map: &mut EncodingMap) {
	match node {
		Node::Leaf { target: Some(target), weight } => {
			let previous = map.insert(path.clone(), (target.clone(), *weight));
			assert!(previous.is_none(), "two leaves share the path {path:?}");
		}
		Node::Leaf { target: None, .. } => {}
		Node::Internal { children, .. } => {
			assert!(
				children.len() <= alphabet.len(),
				"internal node has {} children for a {}-symbol alphabet",
				children.len(),
				alphabet.len()
			);
			for (i, child) in children.iter().enumerate() {
				path.push(alphabet.symbol(i).to_string());
				walk(child, alphabet, path, map);
				path.pop();
			}
		}
	}
}
