//! Error types for code assignment.

use thiserror::Error;

/// Errors that can occur while building or resolving a code assignment.
#[derive(Debug, Error)]
pub enum Error {
	/// The weight map has no entries; a tree needs at least one leaf.
	#[error("weight map is empty")]
	EmptyWeightMap,

	/// The alphabet has fewer than two symbols.
	#[error("alphabet needs at least 2 symbols, got {0}")]
	AlphabetTooSmall(usize),

	/// The same symbol appears twice in the alphabet.
	#[error("duplicate alphabet symbol: {0:?}")]
	DuplicateSymbol(String),

	/// The host conflict oracle failed to answer a query.
	///
	/// Deliberately not coerced into a conflict verdict either way; the
	/// caller decides what an unanswerable query means.
	#[error("conflict oracle failed for {name:?}: {reason}")]
	Oracle {
		/// The candidate name being probed.
		name: String,
		/// Description of the underlying failure.
		reason: String,
	},

	/// A weight table row could not be parsed.
	#[error("malformed weight table at line {line}: {reason}")]
	Table {
		/// 1-based line number in the input.
		line: usize,
		/// What was wrong with the row.
		reason: String,
	},
}

/// Result type for code assignment operations.
pub type Result<T> = std::result::Result<T, Error>;
