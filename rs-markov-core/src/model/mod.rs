//! Top-level module for the Markov generation system.
//!
//! This crate provides a fixed-window character-level text generator, including:
//! - A context model mapping windows to frequency tables (`MarkovModel`)
//! - Ordered per-context frequency tables (`FrequencyTable`)
//! - A seedable uniform draw source (`DrawSource`, `PseudoRandom`)
//! - A high-level generation interface (`TextGenerator`)

/// Ordered next-character frequency tables.
///
/// Handles count accumulation, probability finalization and
/// inverse-CDF character selection.
pub mod frequency;

/// High-level interface for generating text from a trained model.
///
/// Drives the autoregressive loop: slide the context window, resolve
/// the frequency table, draw, sample, append.
pub mod generator;

/// Fixed-window context model.
///
/// Handles corpus ingestion, per-context counting, probability
/// finalization and the human-readable model dump.
pub mod markov_model;

/// Uniform draw source abstraction.
///
/// Seedable for reproducible generation, entropy-based otherwise,
/// and injectable so tests can script exact draw sequences.
pub mod random;
