use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::frequency::FrequencyTable;
use crate::io::{build_output_path, read_corpus};

/// Fixed-window character-level Markov model.
///
/// Maps every observed context (exactly `window_length` characters) to the
/// ordered frequency table of the characters that followed it in the
/// training corpus.
///
/// # Responsibilities
/// - Accumulate next-character counts from one or more corpora
/// - Keep every table's probabilities consistent after each training call
/// - Resolve contexts during generation
///
/// # Invariants
/// - `window_length` is >= 1 and fixed for the model's lifetime
/// - Every key in `contexts` is exactly `window_length` characters long
/// - Every table holds at least one entry and is finalized
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MarkovModel {
	/// The context length in characters.
	window_length: usize,

	/// Mapping from a context to the frequencies of its successors.
	contexts: HashMap<String, FrequencyTable>,
}

impl MarkovModel {
	/// Creates a new empty model with the given window length.
	///
	/// # Errors
	/// Returns an error if `window_length` is 0.
	pub fn new(window_length: usize) -> Result<Self, String> {
		if window_length == 0 {
			return Err("window length must be >= 1".to_owned());
		}
		Ok(Self {
			window_length,
			contexts: HashMap::new(),
		})
	}

	/// Builds a model from a corpus file, using a binary cache when one
	/// is available.
	///
	/// A `<corpus stem>.bin` file next to the corpus is decoded with
	/// `postcard` and used if its window length matches the requested one;
	/// otherwise the corpus is read, the model is trained and the cache is
	/// (re)written for future fast loading.
	///
	/// # Errors
	/// Returns an error if `window_length` is 0, the corpus cannot be
	/// read, or the cache cannot be decoded or written.
	pub fn from_corpus_file<P: AsRef<Path>>(
		filepath: P,
		window_length: usize,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let cache_path = build_output_path(&filepath, "bin")?;
		if cache_path.exists() {
			let bytes = std::fs::read(&cache_path)?;
			let model: Self = postcard::from_bytes(&bytes)?;
			if model.window_length == window_length {
				log::info!("Loaded cached model from {}", cache_path.display());
				return Ok(model);
			}
			log::info!(
				"Cached model has window length {}, expected {}: rebuilding",
				model.window_length,
				window_length
			);
		}

		let mut model = Self::new(window_length)?;
		model.train(&read_corpus(&filepath)?);

		let bytes = postcard::to_stdvec(&model)?;
		std::fs::write(&cache_path, bytes)?;

		Ok(model)
	}

	/// Returns the window length of this model.
	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// Number of distinct contexts observed so far.
	pub fn len(&self) -> usize {
		self.contexts.len()
	}

	/// Returns `true` if no context has been observed yet.
	pub fn is_empty(&self) -> bool {
		self.contexts.is_empty()
	}

	/// Trains the model on a corpus.
	///
	/// Slides a `window_length`-character window over the corpus and
	/// records, for each context, the character that followed it. Every
	/// character of the corpus belongs to the alphabet, whitespace and
	/// punctuation included.
	///
	/// Counts accumulate across calls; probabilities are recomputed for
	/// **every** table after each call, not only the ones touched by this
	/// corpus, so the model is always immediately usable.
	///
	/// A corpus shorter than the window yields no observation and leaves
	/// the model unchanged. Not an error.
	pub fn train(&mut self, corpus: &str) {
		let chars: Vec<char> = corpus.chars().collect();
		if chars.len() < self.window_length {
			// Too short to form a single context
			return;
		}

		for i in self.window_length..chars.len() {
			let context: String = chars[i - self.window_length..i].iter().collect();
			let table = self.contexts.entry(context).or_insert_with(FrequencyTable::new);
			table.record(chars[i]);
		}

		for table in self.contexts.values_mut() {
			table.finalize();
		}

		log::debug!("Model holds {} contexts after training", self.contexts.len());
	}

	/// Trains the model on the contents of a text file.
	///
	/// # Errors
	/// Returns an error if the file cannot be read.
	pub fn train_file<P: AsRef<Path>>(&mut self, filepath: P) -> std::io::Result<()> {
		let corpus = read_corpus(filepath)?;
		self.train(&corpus);
		Ok(())
	}

	/// Looks up the frequency table for a context.
	///
	/// Returns `None` if the context was never observed during training;
	/// at generation time this is a dead end.
	pub fn context_table(&self, context: &str) -> Option<&FrequencyTable> {
		self.contexts.get(context)
	}
}

/// Human-readable dump of the whole model, one context per line.
///
/// Inspection aid only; the format carries no compatibility contract.
/// Enumeration order is the map's iteration order, which is stable for a
/// given model instance within one process run.
impl fmt::Display for MarkovModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (context, table) in &self.contexts {
			writeln!(f, "{context} : {table}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_rejects_a_zero_window() {
		assert!(MarkovModel::new(0).is_err());
		assert!(MarkovModel::new(1).is_ok());
	}

	#[test]
	fn train_counts_sliding_windows() {
		let mut model = MarkovModel::new(2).unwrap();
		model.train("abcabd");

		// Observations: "ab"->c, "bc"->a, "ca"->b, "ab"->d
		assert_eq!(model.len(), 3);
		let table = model.context_table("ab").unwrap();
		let successors: Vec<char> = table.entries().iter().map(|entry| entry.chr).collect();
		assert_eq!(successors, vec!['c', 'd']);

		// The trailing window has no successor and is not a context
		assert!(model.context_table("bd").is_none());
	}

	#[test]
	fn train_on_a_corpus_shorter_than_the_window_is_a_no_op() {
		let mut model = MarkovModel::new(4).unwrap();
		model.train("abc");
		assert!(model.is_empty());
	}

	#[test]
	fn train_on_a_corpus_equal_to_the_window_records_nothing() {
		let mut model = MarkovModel::new(3).unwrap();
		model.train("abc");
		assert!(model.is_empty());
	}

	#[test]
	fn every_table_is_finalized_after_train() {
		let mut model = MarkovModel::new(1).unwrap();
		model.train("abracadabra");

		for context in ["a", "b", "r", "c", "d"] {
			let table = model.context_table(context).unwrap();
			let sum: f64 = table.entries().iter().map(|entry| entry.probability).sum();
			assert!((sum - 1.0).abs() < 1e-9, "context {context} not normalized");
			let last = table.entries().last().unwrap();
			assert!((last.cumulative - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn incremental_training_matches_the_combined_corpus() {
		// "abab" in one pass against "ab" then "bab": the two splits
		// observe the same transitions overall
		let mut combined = MarkovModel::new(1).unwrap();
		combined.train("abab");

		let mut incremental = MarkovModel::new(1).unwrap();
		incremental.train("ab");
		incremental.train("bab");

		assert_eq!(combined.len(), incremental.len());
		for context in ["a", "b"] {
			let expected = combined.context_table(context).unwrap().entries();
			let actual = incremental.context_table(context).unwrap().entries();
			assert_eq!(expected.len(), actual.len());
			for (e, a) in expected.iter().zip(actual) {
				assert_eq!(e.chr, a.chr);
				assert_eq!(e.count, a.count);
				assert!((e.probability - a.probability).abs() < 1e-9);
				assert!((e.cumulative - a.cumulative).abs() < 1e-9);
			}
		}
	}

	#[test]
	fn contexts_are_characters_not_bytes() {
		let mut model = MarkovModel::new(2).unwrap();
		model.train("héhé!");

		// Characters: h é h é ! -> "hé"->h, "éh"->é, "hé"->!
		let table = model.context_table("hé").unwrap();
		let successors: Vec<char> = table.entries().iter().map(|entry| entry.chr).collect();
		assert_eq!(successors, vec!['h', '!']);
	}

	#[test]
	fn display_dumps_one_context_per_line() {
		let mut model = MarkovModel::new(1).unwrap();
		model.train("aab");

		let dump = model.to_string();
		assert_eq!(dump.lines().count(), 1);
		assert!(dump.starts_with("a : ["));
		assert!(dump.contains("('a' 1"));
		assert!(dump.contains("('b' 1"));
	}

	#[test]
	fn from_corpus_file_builds_and_reuses_a_cache() {
		let dir = tempfile::tempdir().unwrap();
		let corpus_path = dir.path().join("corpus.txt");
		std::fs::write(&corpus_path, "the theme of the day").unwrap();

		let model = MarkovModel::from_corpus_file(&corpus_path, 3).unwrap();
		assert!(!model.is_empty());
		assert!(dir.path().join("corpus.bin").exists());

		// Second load decodes the cache; same corpus, same model
		let cached = MarkovModel::from_corpus_file(&corpus_path, 3).unwrap();
		assert_eq!(cached.len(), model.len());
		assert_eq!(cached.window_length(), 3);

		// A window mismatch forces a rebuild instead of an error
		let rebuilt = MarkovModel::from_corpus_file(&corpus_path, 2).unwrap();
		assert_eq!(rebuilt.window_length(), 2);
		assert!(!rebuilt.is_empty());
	}

	#[test]
	fn train_file_reads_raw_text() {
		let dir = tempfile::tempdir().unwrap();
		let corpus_path = dir.path().join("corpus.txt");
		std::fs::write(&corpus_path, "ab\ncd").unwrap();

		let mut model = MarkovModel::new(1).unwrap();
		model.train_file(&corpus_path).unwrap();

		// The newline is part of the alphabet
		let table = model.context_table("b").unwrap();
		assert_eq!(table.entries()[0].chr, '\n');
	}

	#[test]
	fn train_file_surfaces_io_errors() {
		let mut model = MarkovModel::new(2).unwrap();
		assert!(model.train_file("no/such/corpus.txt").is_err());
	}
}
