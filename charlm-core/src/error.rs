//! Error types for charlm.

use thiserror::Error;

/// Result type alias for charlm operations.
pub type Result<T> = std::result::Result<T, CharLmError>;

/// Main error type for charlm.
#[derive(Error, Debug)]
pub enum CharLmError {
	/// The model order must be strictly positive.
	#[error("invalid order {0}: order must be >= 1")]
	InvalidOrder(usize),

	/// The sentinel collides with the character used to rewrite it.
	#[error("invalid sentinel {0:?}: sentinel must differ from the substitute character")]
	InvalidSentinel(char),

	/// Generation reached a history that was never observed during training.
	#[error("history {0:?} not found in model")]
	HistoryNotFound(String),

	/// A table entry exists but holds no transitions.
	#[error("history {0:?} has an empty distribution")]
	EmptyDistribution(String),

	/// Two partial models with different orders cannot be merged.
	#[error("order mismatch: {0} != {1}")]
	OrderMismatch(usize, usize),

	/// Two partial models with different sentinels cannot be merged.
	#[error("sentinel mismatch: {0:?} != {1:?}")]
	SentinelMismatch(char, char),

	/// No model registered under this name.
	#[error("model {0} not found")]
	ModelNotFound(String),

	/// A model with this name is already registered.
	#[error("model {0} already loaded")]
	ModelAlreadyLoaded(String),

	/// Path could not be interpreted.
	#[error("invalid path: {0}")]
	InvalidPath(String),

	/// IO error.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// Model (de)serialization error.
	#[error("serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}
