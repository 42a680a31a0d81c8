//! Core types shared across the seqprep crates.
//!
//! Keeping the vocabulary in its own crate means the normalizer, the column
//! driver and any downstream consumer agree on:
//!
//! - **Boundary tags**: the literal markers wrapped around every record
//! - **Errors**: the single decoding failure a record can produce

#![warn(missing_docs)]

use core::fmt;
use core::str::Utf8Error;

/// Literal start/end markers wrapped around a normalized record.
///
/// Sequence models use these to learn where a record begins and ends.
/// The markers are separated from the body by exactly one space on each
/// side, even when the body is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryTags {
    /// Marker placed before the body.
    pub start: &'static str,
    /// Marker placed after the body.
    pub end: &'static str,
}

impl BoundaryTags {
    /// The `<start>` / `<end>` pair.
    pub const DEFAULT: Self = Self {
        start: "<start>",
        end: "<end>",
    };

    /// Creates a custom tag pair.
    #[inline(always)]
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self { start, end }
    }

    /// Number of bytes `wrap` adds around a body.
    #[inline(always)]
    pub const fn overhead(&self) -> usize {
        self.start.len() + self.end.len() + 2
    }

    /// Appends `start + " " + body + " " + end` to `out`.
    #[inline]
    pub fn wrap(&self, body: &str, out: &mut String) {
        out.reserve(body.len() + self.overhead());
        out.push_str(self.start);
        out.push(' ');
        out.push_str(body);
        out.push(' ');
        out.push_str(self.end);
    }
}

impl Default for BoundaryTags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BoundaryTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} … {}", self.start, self.end)
    }
}

/// Errors produced while normalizing a record.
///
/// Every stage of the pipeline is total over valid UTF-8, so the only
/// failure is input that cannot be decoded in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Input bytes are not valid UTF-8.
    #[error("invalid UTF-8 in input: {valid_up_to} valid bytes before {}", describe_len(.error_len))]
    Decode {
        /// Length of the longest valid prefix.
        valid_up_to: usize,
        /// Length of the invalid sequence, or `None` if the input ended
        /// in the middle of a character.
        error_len: Option<usize>,
    },
}

fn describe_len(error_len: &Option<usize>) -> String {
    match *error_len {
        Some(n) => format!("an invalid {n}-byte sequence"),
        None => "an incomplete trailing sequence".to_owned(),
    }
}

impl From<Utf8Error> for NormalizeError {
    fn from(err: Utf8Error) -> Self {
        NormalizeError::Decode {
            valid_up_to: err.valid_up_to(),
            error_len: err.error_len(),
        }
    }
}

/// A normalization failure tied to the column row that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("row {row}: {source}")]
pub struct ColumnError {
    /// Zero-based index of the failing record.
    pub row: usize,
    /// Underlying failure.
    #[source]
    pub source: NormalizeError,
}

impl ColumnError {
    /// Creates an error for `row`.
    #[inline(always)]
    pub const fn new(row: usize, source: NormalizeError) -> Self {
        Self { row, source }
    }
}
