//! Column driver.
//!
//! Applies a [`TextNormalizer`] element-wise over an ordered column of
//! records. Output element *i* always corresponds to input element *i*.

use std::time::Instant;

use rayon::prelude::*;
use seqprep_types::ColumnError;
use tracing::{debug, debug_span, warn};

use crate::analyzer::contractions::{ContractionExpander, ContractionTable};
use crate::analyzer::normalizer::TextNormalizer;

/// Normalizes every record of `column` in order.
///
/// One scratch buffer is reused across rows; each output is copied out at
/// its exact length.
pub fn apply<E, S>(normalizer: &TextNormalizer<E>, column: &[S]) -> Vec<String>
where
    E: ContractionExpander,
    S: AsRef<str>,
{
    let span = debug_span!("apply", rows = column.len());
    let _guard = span.enter();
    let started = Instant::now();

    let mut scratch = String::new();
    let mut out = Vec::with_capacity(column.len());
    for text in column {
        normalizer.normalize_into(text.as_ref(), &mut scratch);
        out.push(scratch.as_str().to_owned());
    }

    debug!(rows = out.len(), elapsed = ?started.elapsed(), "column normalized");
    out
}

/// Same contract as [`apply`], spread over rayon's global pool.
///
/// Order is preserved; the result equals `apply(normalizer, column)`.
pub fn apply_parallel<E, S>(normalizer: &TextNormalizer<E>, column: &[S]) -> Vec<String>
where
    E: ContractionExpander,
    S: AsRef<str> + Sync,
{
    let span = debug_span!("apply", rows = column.len(), parallel = true);
    let _guard = span.enter();
    let started = Instant::now();

    let out: Vec<String> = column
        .par_iter()
        .map(|text| normalizer.normalize(text.as_ref()))
        .collect();

    debug!(rows = out.len(), elapsed = ?started.elapsed(), "column normalized");
    out
}

/// Normalizes a column of raw byte records.
///
/// # Errors
///
/// Stops at the first record that is not valid UTF-8 and returns a
/// [`ColumnError`] carrying its row index. No partial result is returned.
pub fn apply_bytes<E, B>(normalizer: &TextNormalizer<E>, column: &[B]) -> Result<Vec<String>, ColumnError>
where
    E: ContractionExpander,
    B: AsRef<[u8]>,
{
    let span = debug_span!("apply", rows = column.len(), bytes = true);
    let _guard = span.enter();
    let started = Instant::now();

    let mut out = Vec::with_capacity(column.len());
    for (row, bytes) in column.iter().enumerate() {
        let text = normalizer.normalize_bytes(bytes.as_ref()).map_err(|err| {
            warn!(row, error = %err, "record failed to decode");
            ColumnError::new(row, err)
        })?;
        out.push(text);
    }

    debug!(rows = out.len(), elapsed = ?started.elapsed(), "column normalized");
    Ok(out)
}

/// A normalizer bound to the name of the column it cleans.
///
/// Holds no dataset; callers pass the column values to
/// [`transform`](Preprocessor::transform) and store the result themselves.
#[derive(Debug, Clone)]
pub struct Preprocessor<E = ContractionTable> {
    column: String,
    normalizer: TextNormalizer<E>,
}

impl Preprocessor {
    /// Creates a preprocessor for `column` with the default normalizer.
    pub fn new(column: impl Into<String>) -> Self {
        Self::with_normalizer(column, TextNormalizer::default())
    }
}

impl<E: ContractionExpander> Preprocessor<E> {
    /// Creates a preprocessor with an explicit normalizer.
    pub fn with_normalizer(column: impl Into<String>, normalizer: TextNormalizer<E>) -> Self {
        Self {
            column: column.into(),
            normalizer,
        }
    }

    /// Name of the column this preprocessor cleans.
    #[inline]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Underlying normalizer.
    #[inline]
    pub fn normalizer(&self) -> &TextNormalizer<E> {
        &self.normalizer
    }

    /// Normalizes a single record.
    #[inline]
    pub fn process(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Normalizes every value of the column.
    pub fn transform<S: AsRef<str>>(&self, values: &[S]) -> Vec<String> {
        let span = debug_span!("transform", column = %self.column);
        let _guard = span.enter();
        apply(&self.normalizer, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::contractions::NoContractions;
    use seqprep_types::NormalizeError;

    #[test]
    fn apply_preserves_length_and_order() {
        let normalizer = TextNormalizer::default();
        let out = apply(&normalizer, &["A", "B"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], normalizer.normalize("A"));
        assert_eq!(out, vec!["<start> a <end>", "<start> b <end>"]);
    }

    #[test]
    fn apply_empty_column() {
        let normalizer = TextNormalizer::default();
        let column: [&str; 0] = [];
        assert!(apply(&normalizer, &column).is_empty());
        assert!(apply_parallel(&normalizer, &column).is_empty());
    }

    #[test]
    fn apply_owned_strings() {
        let normalizer = TextNormalizer::with_expander(NoContractions);
        let column = vec![String::from("Hello, World!"), String::new()];
        assert_eq!(
            apply(&normalizer, &column),
            vec!["<start> hello world <end>", "<start>  <end>"]
        );
    }

    #[test]
    fn scratch_reuse_does_not_leak_between_rows() {
        let normalizer = TextNormalizer::default();
        let out = apply(&normalizer, &["a much longer first record", "b"]);
        assert_eq!(out[1], "<start> b <end>");
    }

    #[test]
    fn parallel_matches_sequential() {
        let normalizer = TextNormalizer::default();
        let column: Vec<String> = (0..500)
            .map(|i| format!("Row {i}: Don't panic, café #{i}!"))
            .collect();
        assert_eq!(apply_parallel(&normalizer, &column), apply(&normalizer, &column));
    }

    #[test]
    fn apply_bytes_ok() {
        let normalizer = TextNormalizer::default();
        let column = vec![b"It's OK".to_vec(), "Ñandú".as_bytes().to_vec()];
        assert_eq!(
            apply_bytes(&normalizer, &column).unwrap(),
            vec!["<start> it is ok <end>", "<start> nandu <end>"]
        );
    }

    #[test]
    fn apply_bytes_reports_failing_row() {
        let normalizer = TextNormalizer::default();
        let column = vec![b"fine".to_vec(), b"also fine".to_vec(), vec![b'x', 0xff]];
        let err = apply_bytes(&normalizer, &column).unwrap_err();
        assert_eq!(err.row, 2);
        assert_eq!(
            err.source,
            NormalizeError::Decode {
                valid_up_to: 1,
                error_len: Some(1),
            }
        );
    }

    #[test]
    fn preprocessor_process_and_transform() {
        let pre = Preprocessor::new("review");
        assert_eq!(pre.column(), "review");
        assert_eq!(pre.process("We're LIVE!"), "<start> we are live <end>");
        assert_eq!(
            pre.transform(&["X", "Y"]),
            apply(pre.normalizer(), &["X", "Y"])
        );
    }

    #[test]
    fn preprocessor_custom_normalizer() {
        let pre = Preprocessor::with_normalizer("text", TextNormalizer::with_expander(NoContractions));
        assert_eq!(pre.process("can't"), "<start> can't <end>");
    }
}
