//! Weight maps, alphabets, and the raw-input helpers that feed them.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Item identifier mapped to a non-negative weight.
///
/// Insertion order is preserved and serves as the deterministic tie-break
/// when equal-weight nodes are merged.
pub type WeightMap = IndexMap<String, u64>;

/// Ordered set of distinct symbols; its length is the branching factor.
///
/// The symbol at index `i` labels the `i`-th child of every internal node.
/// Symbols are strings rather than chars so multi-codepoint symbols work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
	symbols: Vec<String>,
}

impl Alphabet {
	/// Validates and wraps an ordered symbol list.
	pub fn new(symbols: Vec<String>) -> Result<Self> {
		if symbols.len() < 2 {
			return Err(Error::AlphabetTooSmall(symbols.len()));
		}
		for (i, symbol) in symbols.iter().enumerate() {
			if symbols[..i].contains(symbol) {
				return Err(Error::DuplicateSymbol(symbol.clone()));
			}
		}
		Ok(Self { symbols })
	}

	/// Branching factor of trees built over this alphabet.
	pub fn len(&self) -> usize {
		self.symbols.len()
	}

	pub fn is_empty(&self) -> bool {
		self.symbols.is_empty()
	}

	/// Symbol labeling the `i`-th child.
	pub fn symbol(&self, i: usize) -> &str {
		&self.symbols[i]
	}

	pub fn symbols(&self) -> &[String] {
		&self.symbols
	}
}

/// Counts exact occurrences of each line, preserving first-seen order.
pub fn count_occurrences<I, S>(lines: I) -> WeightMap
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut counts = WeightMap::new();
	for line in lines {
		*counts.entry(line.as_ref().to_string()).or_insert(0) += 1;
	}
	counts
}

/// Strips trailing line-continuation backslashes and surrounding whitespace,
/// dropping lines that end up empty.
pub fn sanitize_lines<I, S>(lines: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	lines
		.into_iter()
		.filter_map(|line| {
			let line = line.as_ref().trim_end_matches('\\').trim();
			(!line.is_empty()).then(|| line.to_string())
		})
		.collect()
}

/// Drops entries whose weight is below `min_count`.
pub fn apply_min_count(weights: WeightMap, min_count: u64) -> WeightMap {
	weights.into_iter().filter(|(_, count)| *count >= min_count).collect()
}
