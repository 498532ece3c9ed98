//! Weighted n-ary code assignment.
//!
//! Assigns short symbol sequences to weighted items so that frequent items
//! get the shortest sequences, via Huffman merging generalized to an
//! arbitrary branching factor. A refinement loop then rejects sequences that
//! are not worth the abbreviation or that collide with names already
//! meaningful in the host environment, repairing collisions by extending the
//! sequence, until the assignment reaches a fixed point.

pub use codebook::{Code, EncodingMap, extract};
pub use error::{Error, Result};
pub use resolve::{Assignment, ConflictOracle, Resolver};
pub use tree::{Node, build_tree, padding};
pub use weights::{Alphabet, WeightMap, apply_min_count, count_occurrences, sanitize_lines};

mod codebook;
mod error;
mod resolve;
pub mod table;
mod tree;
mod weights;
