//! N-ary prefix tree construction by lowest-weight merging.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::weights::{Alphabet, WeightMap};

/// A node of the merge tree.
///
/// Built once by [`build_tree`], consumed by the extractor, never mutated.
/// Each node exclusively owns its children; there is no sharing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	/// A leaf carrying an optional target. `None` marks a padding leaf
	/// added only to complete the tree shape.
	Leaf {
		/// Weight of the target, zero for padding.
		weight: u64,
		/// Target item, or `None` for padding.
		target: Option<String>,
	},
	/// An internal node whose weight is the sum of its children.
	Internal {
		/// Sum of the children's weights.
		weight: u64,
		/// Children in merge order; the alphabet labels them by index.
		children: Vec<Node>,
	},
}

impl Node {
	/// Weight of this subtree.
	pub fn weight(&self) -> u64 {
		match self {
			Self::Leaf { weight, .. } | Self::Internal { weight, .. } => *weight,
		}
	}
}

/// Computes how many synthetic zero-weight leaves complete the tree shape.
///
/// Returns `(branch_points, padding)` such that `num_elements + padding`
/// leaves merge into a tree where every internal node has exactly
/// `num_branches` children.
pub fn padding(num_elements: usize, num_branches: usize) -> Result<(usize, usize)> {
	if num_branches < 2 {
		return Err(Error::AlphabetTooSmall(num_branches));
	}
	if num_elements < 1 {
		return Err(Error::EmptyWeightMap);
	}
	let branch_points = (num_elements - 1).div_ceil(num_branches - 1);
	let padding = 1 + (num_branches - 1) * branch_points - num_elements;
	Ok((branch_points, padding))
}

/// Heap entry ordered by weight, then by insertion sequence.
///
/// The sequence number makes tie-breaking between equal-weight nodes fully
/// deterministic: repeated runs on identical input produce identical trees.
#[derive(Debug)]
struct HeapEntry {
	weight: u64,
	seq: u64,
	node: Node,
}

impl PartialEq for HeapEntry {
	fn eq(&self, other: &Self) -> bool {
		self.weight == other.weight && self.seq == other.seq
	}
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for HeapEntry {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		(self.weight, self.seq).cmp(&(other.weight, other.seq))
	}
}

/// Builds the optimal n-ary prefix tree for `weights`.
///
/// One leaf per item plus enough zero-weight padding leaves, then repeated
/// merging of the `n` lowest-weight nodes until a single root remains. The
/// greedy grouping minimizes the weighted sum of leaf depths; the padding
/// invariant guarantees every merge consumes exactly `n` nodes.
pub fn build_tree(weights: &WeightMap, alphabet: &Alphabet) -> Result<Node> {
	if weights.is_empty() {
		return Err(Error::EmptyWeightMap);
	}
	let num_branches = alphabet.len();
	let (_, num_padding) = padding(weights.len(), num_branches)?;

	let mut seq = 0u64;
	let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::with_capacity(weights.len() + num_padding);
	for (target, &weight) in weights {
		heap.push(Reverse(HeapEntry {
			weight,
			seq,
			node: Node::Leaf {
				weight,
				target: Some(target.clone()),
			},
		}));
		seq += 1;
	}
	for _ in 0..num_padding {
		heap.push(Reverse(HeapEntry {
			weight: 0,
			seq,
			node: Node::Leaf { weight: 0, target: None },
		}));
		seq += 1;
	}

	while heap.len() > 1 {
		let take = num_branches.min(heap.len());
		let mut weight = 0u64;
		let mut children = Vec::with_capacity(take);
		for _ in 0..take {
			let Some(Reverse(entry)) = heap.pop() else {
				unreachable!("heap length checked above");
			};
			weight += entry.weight;
			children.push(entry.node);
		}
		heap.push(Reverse(HeapEntry {
			weight,
			seq,
			node: Node::Internal { weight, children },
		}));
		seq += 1;
	}

	let Some(Reverse(root)) = heap.pop() else {
		unreachable!("at least one leaf was pushed");
	};
	Ok(root.node)
}
