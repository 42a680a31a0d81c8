//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Cleans raw text and wraps it in boundary tags
//! - **Contractions**: Expands contracted word forms before cleaning

pub mod contractions;
pub mod normalizer;

pub use contractions::{ContractionExpander, ContractionTable, NoContractions};
pub use normalizer::{NormalizerConfig, TextNormalizer};
