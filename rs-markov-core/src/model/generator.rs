use super::markov_model::MarkovModel;
use super::random::{DrawSource, PseudoRandom};

/// High-level autoregressive text generator.
///
/// Owns a trained `MarkovModel` and a single draw source, and extends a
/// seed text one character at a time: the trailing window of the text so
/// far selects a frequency table, one uniform draw selects the next
/// character within it.
///
/// # Responsibilities
/// - Drive the generation loop (slide window, resolve table, draw, append)
/// - Enforce the documented boundary policies (short seed, dead end)
/// - Manage the draw source (seeded, entropy-based or caller-provided)
pub struct TextGenerator {
	model: MarkovModel,
	source: Box<dyn DrawSource + Send>,
}

impl TextGenerator {
	/// Creates a generator with an entropy-seeded draw source.
	///
	/// Generated texts differ between runs. Good for production.
	pub fn new(model: MarkovModel) -> Self {
		Self {
			model,
			source: Box::new(PseudoRandom::from_entropy()),
		}
	}

	/// Creates a generator with a seeded draw source.
	///
	/// The same seed, model and call arguments produce the same text on
	/// every run. Good for debugging.
	pub fn seeded(model: MarkovModel, seed: u64) -> Self {
		Self {
			model,
			source: Box::new(PseudoRandom::seeded(seed)),
		}
	}

	/// Creates a generator with a caller-provided draw source.
	pub fn with_source(model: MarkovModel, source: Box<dyn DrawSource + Send>) -> Self {
		Self { model, source }
	}

	/// Replaces the draw source with a freshly seeded one.
	pub fn reseed(&mut self, seed: u64) {
		self.source = Box::new(PseudoRandom::seeded(seed));
	}

	/// Read access to the underlying model.
	pub fn model(&self) -> &MarkovModel {
		&self.model
	}

	/// Mutable access to the underlying model, for incremental training.
	pub fn model_mut(&mut self) -> &mut MarkovModel {
		&mut self.model
	}

	/// Generates up to `length` characters after `seed_text`.
	///
	/// Each iteration takes the trailing window of the text produced so
	/// far as the current context, resolves its frequency table and
	/// samples one character from one uniform draw.
	///
	/// Two boundary outcomes are normal results, not failures:
	/// - `seed_text` shorter than the model's window: no context can be
	///   extracted, the seed is returned unchanged.
	/// - Context miss (dead end): the current context was never observed
	///   during training, generation stops and the text accumulated so far
	///   is returned.
	pub fn generate(&mut self, seed_text: &str, length: usize) -> String {
		let window_length = self.model.window_length();
		let mut produced: Vec<char> = seed_text.chars().collect();
		if produced.len() < window_length {
			return seed_text.to_owned();
		}

		for _ in 0..length {
			let context: String = produced[produced.len() - window_length..].iter().collect();
			let table = match self.model.context_table(&context) {
				Some(table) => table,
				// Dead end
				None => break,
			};

			match table.sample(self.source.draw()) {
				Some(next_char) => produced.push(next_char),
				None => break,
			}
		}

		produced.into_iter().collect()
	}
}
