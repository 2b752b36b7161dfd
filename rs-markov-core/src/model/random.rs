use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0.0, 1.0)`.
///
/// Generation consumes exactly one draw per emitted character. The source
/// is injected into `TextGenerator` rather than reached through a global,
/// so multiple models stay isolated and tests can substitute a scripted
/// sequence of draws to exercise sampling boundaries exactly.
pub trait DrawSource {
	/// Returns the next uniform value in `[0.0, 1.0)`.
	fn draw(&mut self) -> f64;
}

/// Default pseudo-random draw source backed by `StdRng`.
///
/// ## Responsibilities
/// - Produce reproducible draw sequences when seeded
/// - Produce entropy-based draws otherwise
///
/// ## Invariants
/// - Every draw is in `[0.0, 1.0)`
/// - One instance serves one generator; draws are consumed sequentially
pub struct PseudoRandom {
	rng: StdRng,
}

impl PseudoRandom {
	/// Creates a seeded source.
	///
	/// The same seed yields the same sequence of draws, and therefore the
	/// same generated text for a fixed model and inputs. Good for debugging.
	pub fn seeded(seed: u64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
		}
	}

	/// Creates an entropy-seeded source.
	///
	/// Generated texts differ between runs. Good for production.
	pub fn from_entropy() -> Self {
		Self {
			rng: StdRng::from_os_rng(),
		}
	}
}

impl DrawSource for PseudoRandom {
	fn draw(&mut self) -> f64 {
		self.rng.random()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn seeded_sources_replay_the_same_sequence() {
		let mut first = PseudoRandom::seeded(42);
		let mut second = PseudoRandom::seeded(42);
		for _ in 0..100 {
			assert_eq!(first.draw(), second.draw());
		}
	}

	#[test]
	fn different_seeds_diverge() {
		let mut first = PseudoRandom::seeded(1);
		let mut second = PseudoRandom::seeded(2);
		let identical = (0..100).filter(|_| first.draw() == second.draw()).count();
		assert!(identical < 100);
	}

	#[test]
	fn draws_stay_in_the_half_open_unit_interval() {
		let mut source = PseudoRandom::seeded(7);
		for _ in 0..1000 {
			let draw = source.draw();
			assert!((0.0..1.0).contains(&draw), "draw out of range: {draw}");
		}
	}
}
