//! Text normalization for sequence model input.
//!
//! Raw records go through a fixed pipeline (lower-case, contraction
//! expansion, digit/diacritic/punctuation stripping, whitespace collapsing)
//! and come out ASCII-only, wrapped in `<start>` / `<end>` tags.
//!
//! ```
//! assert_eq!(seqprep_core::normalize("Don't Stop!! 123"), "<start> do not stop <end>");
//! ```

#![warn(missing_docs)]

pub mod analyzer;
pub mod column;

use once_cell::sync::Lazy;

pub use analyzer::{
    ContractionExpander, ContractionTable, NoContractions, NormalizerConfig, TextNormalizer,
};
pub use column::Preprocessor;
pub use seqprep_types::{BoundaryTags, ColumnError, NormalizeError};

static DEFAULT_NORMALIZER: Lazy<TextNormalizer<ContractionTable>> =
    Lazy::new(TextNormalizer::default);

/// Normalizes `text` with the default English normalizer.
///
/// The normalizer is built on first use and shared for the life of the
/// process.
#[inline]
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// The process-wide default normalizer behind [`normalize`].
#[inline]
pub fn default_normalizer() -> &'static TextNormalizer<ContractionTable> {
    &DEFAULT_NORMALIZER
}
