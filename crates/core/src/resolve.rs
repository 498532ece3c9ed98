//! Fixed-point refinement of a code assignment against a conflict oracle.
//!
//! Builds a fresh tree per iteration, rejects codes that are not worth the
//! abbreviation or that collide with names already meaningful in the host
//! environment, repairs collisions by extending the code, and loops until an
//! iteration prunes nothing.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::codebook::{Code, EncodingMap, extract};
use crate::error::Result;
use crate::tree::build_tree;
use crate::weights::{Alphabet, WeightMap};

/// Answers whether a candidate name is already meaningful in the target
/// environment (executables, functions, aliases, keywords).
///
/// Implemented once against the live host and by deterministic doubles in
/// tests. Answers must be stable within one resolution run. A failing query
/// is an error, never a verdict.
pub trait ConflictOracle {
	/// Returns `true` if `name` is already taken.
	fn is_taken(&self, name: &str) -> Result<bool>;
}

/// One line of the final assignment: a code and the target it abbreviates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
	/// The symbol sequence to type.
	pub code: Code,
	/// The item the code expands to.
	pub target: String,
	/// Weight the target carried into the resolution.
	pub weight: u64,
}

/// Original code mapped to its repaired replacement.
type OverrideRegistry = IndexMap<Code, (Code, String, u64)>;

/// Drives tree building and extraction to a stable, non-conflicting,
/// cost-effective assignment.
pub struct Resolver<'a> {
	alphabet: Alphabet,
	oracle: &'a dyn ConflictOracle,
}

impl<'a> Resolver<'a> {
	pub fn new(alphabet: Alphabet, oracle: &'a dyn ConflictOracle) -> Self {
		Self { alphabet, oracle }
	}

	/// Resolves `weights` to a final assignment sorted by weight descending,
	/// then target ascending.
	///
	/// An empty result means no viable codes exist; that is a defined
	/// outcome, not an error. Oracle failures propagate untouched.
	pub fn resolve(&self, mut weights: WeightMap) -> Result<Vec<Assignment>> {
		let mut overrides = OverrideRegistry::new();
		let mut conflict_memo: FxHashSet<Code> = FxHashSet::default();
		let mut iteration = 0u32;

		loop {
			iteration += 1;
			info!(iteration, targets = weights.len(), "resolve.iteration");

			let root = build_tree(&weights, &self.alphabet)?;
			let fresh = extract(&root, &self.alphabet);
			debug!(?fresh, "resolve.encoding_map");

			// Working copy with the repairs of earlier iterations applied,
			// so already-repaired targets skip re-evaluation on convergence.
			let mut working = fresh.clone();
			for (original, (replacement, target, weight)) in &overrides {
				if working.get(original).is_some_and(|(t, _)| t == target) {
					info!(original = ?original, replacement = ?replacement, "resolve.substitute");
					working.shift_remove(original);
					working.insert(replacement.clone(), (target.clone(), *weight));
				}
			}

			let mut pruned = false;
			let mut survivors = WeightMap::new();

			for (code, target, weight) in candidates_in_order(&fresh) {
				// A previously repaired code stands in for the original.
				let effective = match overrides.get(&code) {
					Some((replacement, _, _)) => replacement.clone(),
					None => code.clone(),
				};

				if !worth_abbreviating(&effective, &target) {
					pruned = true;
					info!(code = ?effective, target = %target, "resolve.pruned_roi");
					continue;
				}

				if self.is_conflict(&effective, &mut conflict_memo)? {
					pruned = true;
					info!(code = ?effective, target = %target, "resolve.pruned_conflict");

					match self.augment(&effective, &mut conflict_memo)? {
						Some(repaired) if worth_abbreviating(&repaired, &target) => {
							debug!(code = ?repaired, target = %target, "resolve.repaired");
							overrides.insert(code, (repaired, target.clone(), weight));
							survivors.insert(target, weight);
						}
						_ => {
							info!(target = %target, "resolve.dropped");
						}
					}
					continue;
				}

				survivors.insert(target, weight);
			}

			if !pruned {
				info!(targets = working.len(), "resolve.converged");
				return Ok(sorted_assignments(working));
			}
			if survivors.is_empty() {
				info!("resolve.exhausted");
				return Ok(Vec::new());
			}
			weights = survivors;
		}
	}

	/// Memoized conflict probe: codes once found taken are never re-queried.
	fn is_conflict(&self, code: &Code, memo: &mut FxHashSet<Code>) -> Result<bool> {
		if memo.contains(code) {
			return Ok(true);
		}
		if self.oracle.is_taken(&code.concat())? {
			memo.insert(code.clone());
			return Ok(true);
		}
		Ok(false)
	}

	/// Extends a conflicting code by cycling alphabet symbols until the
	/// oracle clears it.
	///
	/// Bounded at twice the alphabet length of appended symbols; past that
	/// the oracle is treated as never clearing and the candidate is given
	/// up, which keeps a pathological oracle from spinning forever.
	fn augment(&self, code: &Code, memo: &mut FxHashSet<Code>) -> Result<Option<Code>> {
		let mut repaired = code.clone();
		let max_appended = 2 * self.alphabet.len();
		for appended in 0..max_appended {
			let symbol = self.alphabet.symbol(appended % self.alphabet.len());
			repaired.push(symbol.to_string());
			if !self.is_conflict(&repaired, memo)? {
				return Ok(Some(repaired));
			}
		}
		Ok(None)
	}
}

/// True when the code is short enough to pay for itself: its length must be
/// under half the target's length.
fn worth_abbreviating(code: &Code, target: &str) -> bool {
	2 * code.len() < target.chars().count()
}

/// Fresh-map candidates in the fixed evaluation order: weight descending,
/// then target ascending.
fn candidates_in_order(fresh: &EncodingMap) -> Vec<(Code, String, u64)> {
	let mut candidates: Vec<_> = fresh
		.iter()
		.map(|(code, (target, weight))| (code.clone(), target.clone(), *weight))
		.collect();
	candidates.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
	candidates
}

fn sorted_assignments(map: EncodingMap) -> Vec<Assignment> {
	let mut assignments: Vec<_> = map
		.into_iter()
		.map(|(code, (target, weight))| Assignment { code, target, weight })
		.collect();
	assignments.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.target.cmp(&b.target)));
	assignments
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use pretty_assertions::assert_eq;
	use rustc_hash::FxHashSet;

	use super::*;
	use crate::error::Error;

	fn alphabet(symbols: &[&str]) -> Alphabet {
		Alphabet::new(symbols.iter().map(|s| s.to_string()).collect()).expect("test alphabet should be valid")
	}

	fn weights(entries: &[(&str, u64)]) -> WeightMap {
		entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
	}

	/// Oracle double driven by a predicate, counting every live query.
	struct FnOracle<F: Fn(&str) -> bool> {
		taken: F,
		queries: RefCell<Vec<String>>,
	}

	impl<F: Fn(&str) -> bool> FnOracle<F> {
		fn new(taken: F) -> Self {
			Self {
				taken,
				queries: RefCell::new(Vec::new()),
			}
		}
	}

	impl<F: Fn(&str) -> bool> ConflictOracle for FnOracle<F> {
		fn is_taken(&self, name: &str) -> Result<bool> {
			self.queries.borrow_mut().push(name.to_string());
			Ok((self.taken)(name))
		}
	}

	struct FailingOracle;

	impl ConflictOracle for FailingOracle {
		fn is_taken(&self, name: &str) -> Result<bool> {
			Err(Error::Oracle {
				name: name.to_string(),
				reason: "host shell unavailable".to_string(),
			})
		}
	}

	#[test]
	fn clean_oracle_converges_in_one_iteration() {
		let oracle = FnOracle::new(|_| false);
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		let result = resolver
			.resolve(weights(&[("git status", 10), ("cargo build", 7), ("docker ps", 5)]))
			.unwrap();

		assert_eq!(result.len(), 3);
		assert_eq!(result[0].target, "git status");
		assert_eq!(result[0].weight, 10);
		assert_eq!(result[0].code, vec!["j".to_string()]);
		// Sorted by weight descending.
		assert!(result.windows(2).all(|w| w[0].weight >= w[1].weight));
	}

	#[test]
	fn resolution_is_idempotent_on_its_own_output() {
		let oracle = FnOracle::new(|_| false);
		let resolver = Resolver::new(alphabet(&["j", "f", "k"]), &oracle);
		let input = weights(&[("git status", 9), ("cargo build", 7), ("docker ps", 4), ("terraform plan", 2)]);

		let first = resolver.resolve(input).unwrap();
		let echoed: WeightMap = first.iter().map(|a| (a.target.clone(), a.weight)).collect();
		let second = resolver.resolve(echoed).unwrap();
		assert_eq!(first, second);
	}

	#[test]
	fn short_targets_are_pruned_for_poor_roi() {
		let oracle = FnOracle::new(|_| false);
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		// A one-symbol code never beats half of a two-char target.
		let result = resolver.resolve(weights(&[("ls", 50), ("git status", 10)])).unwrap();

		assert_eq!(result.len(), 1);
		assert_eq!(result[0].target, "git status");
	}

	#[test]
	fn single_symbol_conflicts_force_longer_codes() {
		let oracle = FnOracle::new(|name| name.chars().count() < 2);
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		let result = resolver
			.resolve(weights(&[("git status", 10), ("cargo build", 7), ("docker ps", 5)]))
			.unwrap();

		assert_eq!(result.len(), 3);
		for assignment in &result {
			assert!(assignment.code.len() >= 2, "{assignment:?} should have been repaired");
			assert!(2 * assignment.code.len() < assignment.target.chars().count());
		}
	}

	#[test]
	fn repaired_codes_avoid_the_taken_name() {
		// Exactly the highest-value single-symbol code is taken.
		let oracle = FnOracle::new(|name| name == "j");
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		let result = resolver
			.resolve(weights(&[("git status", 10), ("cargo build", 7), ("docker ps", 5)]))
			.unwrap();

		assert_eq!(result.len(), 3);
		let names: Vec<String> = result.iter().map(|a| a.code.concat()).collect();
		assert!(!names.contains(&"j".to_string()));
		// Still bijective on targets.
		let mut targets: Vec<_> = result.iter().map(|a| a.target.clone()).collect();
		targets.sort();
		targets.dedup();
		assert_eq!(targets.len(), 3);
	}

	#[test]
	fn pathological_oracle_terminates_with_empty_result() {
		let oracle = FnOracle::new(|_| true);
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		let result = resolver
			.resolve(weights(&[("git status", 10), ("cargo build", 7)]))
			.unwrap();

		assert!(result.is_empty());
		// Bounded probing: initial probe plus at most 2×alphabet repairs
		// per candidate, single iteration.
		assert!(oracle.queries.borrow().len() <= 2 * (1 + 4));
	}

	#[test]
	fn conflict_memo_avoids_repeat_queries() {
		let oracle = FnOracle::new(|_| true);
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		resolver.resolve(weights(&[("git status", 10), ("cargo build", 7)])).unwrap();

		let queries = oracle.queries.borrow();
		let distinct: FxHashSet<&String> = queries.iter().collect();
		assert_eq!(distinct.len(), queries.len(), "a code was queried twice: {queries:?}");
	}

	#[test]
	fn oracle_failure_propagates() {
		let resolver = Resolver::new(alphabet(&["j", "f"]), &FailingOracle);
		let result = resolver.resolve(weights(&[("git status", 10), ("cargo build", 7)]));
		assert!(matches!(result, Err(Error::Oracle { .. })));
	}

	#[test]
	fn empty_weight_map_is_a_configuration_error() {
		let oracle = FnOracle::new(|_| false);
		let resolver = Resolver::new(alphabet(&["j", "f"]), &oracle);
		assert!(matches!(resolver.resolve(WeightMap::new()), Err(Error::EmptyWeightMap)));
	}
}
