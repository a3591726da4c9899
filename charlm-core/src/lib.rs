//! Character-level Markov text generation library.
//!
//! This crate provides:
//! - Training of fixed-order character models from corpus lines
//! - Normalized per-history distributions with a pluggable random source
//! - Sliding-window text generation with line-boundary sentinels
//! - Model caching on disk and named model catalogs
//!
//! ```no_run
//! use charlm_core::CharLm;
//!
//! let model = CharLm::train(["hello world", "help me"], 3, '~')?;
//! let text = model.generate(100, &mut rand::rng())?;
//! println!("{text}");
//! # Ok::<(), charlm_core::CharLmError>(())
//! ```

/// Models, training and generation.
pub mod model;

/// Error type and result alias.
pub mod error;

/// Corpus reading and path helpers.
pub mod io;

pub use error::{CharLmError, Result};
pub use model::catalog::ModelCatalog;
pub use model::charlm::CharLm;
pub use model::config::{GenerationInput, ModelConfig};
pub use model::distribution::Distribution;
pub use model::generator::{Generator, generate};
