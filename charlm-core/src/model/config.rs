use rand::SeedableRng;
use rand::rngs::StdRng;

use serde::{Deserialize, Serialize};

use super::trainer::SUBSTITUTE_CHAR;
use crate::error::{CharLmError, Result};

/// Default boundary character.
pub const DEFAULT_SENTINEL: char = '~';

/// Default history length.
pub const DEFAULT_ORDER: usize = 4;

/// Default number of characters produced per generation call.
pub const DEFAULT_N_LETTERS: usize = 1000;

/// Construction parameters of a model.
///
/// # Invariants (checked by `validate`)
/// - `order >= 1`
/// - `sentinel` differs from the substitute character `-`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	/// Number of preceding characters used as context.
	pub order: usize,

	/// Character reserved to mark line boundaries.
	pub sentinel: char,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			order: DEFAULT_ORDER,
			sentinel: DEFAULT_SENTINEL,
		}
	}
}

impl ModelConfig {
	/// Creates a validated configuration.
	pub fn new(order: usize, sentinel: char) -> Result<Self> {
		let config = Self { order, sentinel };
		config.validate()?;
		Ok(config)
	}

	/// Checks the construction invariants.
	///
	/// # Errors
	/// - `InvalidOrder` if `order == 0`
	/// - `InvalidSentinel` if `sentinel == '-'`
	pub fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(CharLmError::InvalidOrder(self.order));
		}
		if self.sentinel == SUBSTITUTE_CHAR {
			return Err(CharLmError::InvalidSentinel(self.sentinel));
		}
		Ok(())
	}
}

/// Parameters of one generation call.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct GenerationInput {
	/// Number of characters to sample (before sentinel runs become line breaks).
	pub n_letters: usize,

	/// Optional seed for a reproducible run. `None` seeds from the OS.
	pub seed: Option<u64>,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			n_letters: DEFAULT_N_LETTERS,
			seed: None,
		}
	}
}

impl GenerationInput {
	/// Builds the random source for this run.
	pub fn rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}
