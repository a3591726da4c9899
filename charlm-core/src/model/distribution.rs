use rand::Rng;

use serde::{Deserialize, Serialize};

/// Normalized next-character distribution for one history.
///
/// Entries are kept in the order their character was first observed
/// after the owning history. The order does not change the probability
/// of any character, but it makes sampling with an explicit draw
/// reproducible.
///
/// # Invariants
/// - Every probability is strictly positive (zero counts are never stored)
/// - Probabilities sum to 1.0 within floating-point tolerance
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Distribution {
	entries: Vec<(char, f64)>,
}

impl Distribution {
	/// Builds a distribution from `(character, occurrence)` counts.
	///
	/// Each probability is its count divided by the total. Entries with a
	/// zero count are dropped.
	pub(crate) fn from_counts(counts: &[(char, usize)]) -> Self {
		let total: usize = counts.iter().map(|(_, count)| count).sum();
		if total == 0 {
			return Self { entries: Vec::new() };
		}

		let entries = counts
			.iter()
			.filter(|(_, count)| *count > 0)
			.map(|(c, count)| (*c, *count as f64 / total as f64))
			.collect();

		Self { entries }
	}

	/// Returns the `(character, probability)` pairs in sampling order.
	pub fn entries(&self) -> &[(char, f64)] {
		&self.entries
	}

	/// Returns the probability of `c`, or `None` if it was never observed.
	pub fn probability(&self, c: char) -> Option<f64> {
		self.entries.iter().find(|(entry, _)| *entry == c).map(|(_, p)| *p)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Samples a character using one uniform draw in `[0, 1)` from `rng`.
	///
	/// Returns `None` if the distribution is empty.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<char> {
		let draw: f64 = rng.random();
		self.pick(draw)
	}

	/// Selects the character matching an explicit draw.
	///
	/// Subtracts each probability from `draw` in order and returns the
	/// first character at which the remainder drops to zero or below.
	/// If rounding leaves a positive remainder after the last entry, the
	/// last character is returned.
	///
	/// Returns `None` if the distribution is empty.
	pub fn pick(&self, draw: f64) -> Option<char> {
		let mut x = draw;
		for (c, probability) in &self.entries {
			x -= probability;
			if x <= 0.0 {
				return Some(*c);
			}
		}

		self.entries.last().map(|(c, _)| *c)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn test_from_counts_normalizes() {
		let dist = Distribution::from_counts(&[('a', 3), ('b', 1)]);
		assert_eq!(dist.entries(), &[('a', 0.75), ('b', 0.25)]);
	}

	#[test]
	fn test_from_counts_drops_zero_counts() {
		let dist = Distribution::from_counts(&[('a', 2), ('z', 0), ('b', 2)]);
		assert_eq!(dist.len(), 2);
		assert!(dist.probability('z').is_none());
	}

	#[test]
	fn test_from_counts_empty() {
		assert!(Distribution::from_counts(&[]).is_empty());
		assert!(Distribution::from_counts(&[('a', 0)]).is_empty());
	}

	#[test]
	fn test_pick_walks_cumulative_mass() {
		let dist = Distribution::from_counts(&[('a', 1), ('b', 2), ('c', 1)]);
		assert_eq!(dist.pick(0.0), Some('a'));
		assert_eq!(dist.pick(0.25), Some('a'));
		assert_eq!(dist.pick(0.26), Some('b'));
		assert_eq!(dist.pick(0.75), Some('b'));
		assert_eq!(dist.pick(0.99), Some('c'));
	}

	#[test]
	fn test_pick_exhaustion_falls_to_last() {
		let dist = Distribution::from_counts(&[('a', 1), ('b', 1)]);
		assert_eq!(dist.pick(1.5), Some('b'));
	}

	#[test]
	fn test_pick_empty() {
		assert_eq!(Distribution::from_counts(&[]).pick(0.5), None);
	}

	#[test]
	fn test_sample_frequencies() {
		let dist = Distribution::from_counts(&[('a', 9), ('b', 1)]);
		let mut rng = StdRng::seed_from_u64(42);

		let mut a = 0;
		for _ in 0..10_000 {
			if dist.sample(&mut rng) == Some('a') {
				a += 1;
			}
		}

		assert!((8_700..=9_300).contains(&a), "got {a} 'a' out of 10000");
	}
}
