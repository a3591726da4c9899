//! Character-level Markov model: training, sampling and generation.
//!
//! - Fixed-order models (`CharLm`) and their trainer (`Trainer`)
//! - Per-history next-character distributions (`Distribution`)
//! - The sliding-window generation loop (`Generator`)
//! - Persistence (`store`) and named model collections (`ModelCatalog`)

/// Trained model: the immutable history → distribution table.
pub mod charlm;

/// Normalized next-character distribution and its weighted sampler.
pub mod distribution;

/// Line cleaning, padding and window counting.
///
/// Supports a single sequential pass and a chunked multi-threaded pass.
pub mod trainer;

/// Internal transition counts for one history.
///
/// This module is not exposed publicly.
mod state;

/// Generation loop over a trained model.
pub mod generator;

/// Model and generation parameters.
pub mod config;

/// Postcard serialization and corpus → model caching.
pub mod store;

/// Named collection of models loaded from a directory of corpora.
pub mod catalog;
