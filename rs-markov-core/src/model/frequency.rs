use std::fmt;

use serde::{Deserialize, Serialize};

/// A single observed next-character for one context.
///
/// `probability` and `cumulative` are only meaningful after the owning
/// table has been finalized.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CharFrequency {
	/// The observed character.
	pub chr: char,
	/// Number of times the character followed the context.
	pub count: usize,
	/// `count / total count` for the owning table.
	pub probability: f64,
	/// Running sum of `probability` over entries in insertion order.
	pub cumulative: f64,
}

/// Ordered multiset of the next-characters observed after one context.
///
/// Entries are kept in first-observation order; later observations
/// increment the existing entry in place. Insertion order is load-bearing:
/// cumulative probabilities and inverse-CDF sampling both iterate in this
/// order, and reordering would change which character a given draw selects.
///
/// ## Responsibilities
/// - Accumulate next-character counts during training
/// - Convert counts into probabilities and cumulative probabilities
/// - Select a character from a uniform draw (inverse-CDF lookup)
///
/// ## Invariants
/// - Each character appears in at most one entry
/// - Every count is strictly positive
/// - After `finalize`: `cumulative` is non-decreasing and its final value
///   is 1.0 within floating-point tolerance
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct FrequencyTable {
	entries: Vec<CharFrequency>,
}

impl FrequencyTable {
	/// Creates an empty table.
	pub(crate) fn new() -> Self {
		Self { entries: Vec::new() }
	}

	/// Records one observation of `chr`.
	///
	/// - If the character was seen before, its count is increased in place
	///   (entry order unchanged).
	/// - Otherwise a new entry is appended with an initial count of 1.
	pub(crate) fn record(&mut self, chr: char) {
		match self.entries.iter_mut().find(|entry| entry.chr == chr) {
			Some(entry) => entry.count += 1,
			None => self.entries.push(CharFrequency {
				chr,
				count: 1,
				probability: 0.0,
				cumulative: 0.0,
			}),
		}
	}

	/// Recomputes `probability` and `cumulative` for all entries, in
	/// insertion order, from the current counts.
	///
	/// Deterministic given the counts. The total count is at least 1 by
	/// construction, since a table is created together with its first
	/// recorded observation.
	pub(crate) fn finalize(&mut self) {
		let total: usize = self.entries.iter().map(|entry| entry.count).sum();
		if total == 0 {
			return;
		}

		let mut running = 0.0;
		for entry in &mut self.entries {
			entry.probability = entry.count as f64 / total as f64;
			running += entry.probability;
			entry.cumulative = running;
		}
	}

	/// Selects a character for a uniform `draw` in `[0.0, 1.0)` by
	/// inverse-CDF lookup.
	///
	/// Scans entries in insertion order and returns the first one whose
	/// cumulative probability is strictly greater than `draw`. If rounding
	/// left the final cumulative value marginally below 1.0 and no entry
	/// qualifies, the last entry is returned, so every draw maps to a real
	/// character.
	///
	/// Returns `None` only for an empty table, which training never
	/// produces.
	pub fn sample(&self, draw: f64) -> Option<char> {
		for entry in &self.entries {
			if entry.cumulative > draw {
				return Some(entry.chr);
			}
		}
		self.entries.last().map(|entry| entry.chr)
	}

	/// Entries in insertion order.
	pub fn entries(&self) -> &[CharFrequency] {
		&self.entries
	}
}

impl fmt::Display for FrequencyTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[")?;
		for entry in &self.entries {
			write!(
				f,
				" ('{}' {} {:.4} {:.4})",
				entry.chr, entry.count, entry.probability, entry.cumulative
			)?;
		}
		write!(f, " ]")
	}
}
