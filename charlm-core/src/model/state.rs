use super::distribution::Distribution;

/// Transition counts observed after one history during training.
///
/// A `State` corresponds to a fixed `order`-character history (`key`)
/// and stores how many times each next character followed it.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Merge with another state having the same key (parallel learning)
/// - Normalize into a `Distribution` once learning is over
///
/// ## Invariants
/// - All transitions belong to the same `key`
/// - Each transition occurrence count is strictly positive
/// - Transitions keep the order of their first observation
#[derive(Clone, Debug)]
pub(crate) struct State {
	/// Identifier of the state (history of `order` characters).
	key: String,
	/// Outgoing transitions with their number of observations.
	/// Example: [('e', 42), ('a', 3)]
	transitions: Vec<(char, usize)>,
}

impl State {
	/// Creates a new empty state for the given history.
	pub(crate) fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			transitions: Vec::new(),
		}
	}

	/// Records `occurrence` observations of a transition toward `next_char`.
	///
	/// New characters are appended after the ones already seen.
	pub(crate) fn add_transition(&mut self, next_char: char, occurrence: usize) {
		match self.transitions.iter_mut().find(|(c, _)| *c == next_char) {
			Some((_, count)) => *count += occurrence,
			None => self.transitions.push((next_char, occurrence)),
		}
	}

	/// Merges another state for the same history into this one.
	///
	/// Counts are summed; characters unseen here are appended in the
	/// order `other` first observed them.
	pub(crate) fn merge(&mut self, other: State) {
		debug_assert_eq!(self.key, other.key);
		for (next_char, occurrence) in other.transitions {
			self.add_transition(next_char, occurrence);
		}
	}

	/// Converts the accumulated counts into probabilities.
	pub(crate) fn normalize(&self) -> Distribution {
		Distribution::from_counts(&self.transitions)
	}
}
