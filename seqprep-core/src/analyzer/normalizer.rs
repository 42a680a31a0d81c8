//! Record normalization: the eight-stage cleaning pipeline and its stages
//! as standalone functions.

use std::borrow::Cow;
use std::str;

use seqprep_types::{BoundaryTags, NormalizeError};
use unicode_normalization::char::decompose_compatible;

use super::contractions::{ContractionExpander, ContractionTable};

/// Whitespace as matched by `\s` over ASCII.
#[inline(always)]
const fn is_ascii_ws(b: u8) -> bool {
    matches!(b, b'\t'..=b'\r' | 0x1c..=0x1f | b' ')
}

/// Characters that survive the special-character stage.
#[inline(always)]
const fn is_kept(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'\'' || b == b'-' || is_ascii_ws(b)
}

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Markers wrapped around every result. `None` returns the bare body,
    /// for callers that tag downstream.
    pub tags: Option<BoundaryTags>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            tags: Some(BoundaryTags::DEFAULT),
        }
    }
}

/// Cleans raw text into the tagged, ASCII-only form sequence models consume.
///
/// Stages run in a fixed order:
/// - Lower-case (Unicode-aware, byte-wise for ASCII)
/// - Expand contractions through the configured [`ContractionExpander`]
/// - Remove ASCII digits
/// - Compatibility-decompose and drop everything without an ASCII form
/// - Remove the remaining non-ASCII code points
/// - Remove everything except letters, digits, whitespace, `'` and `-`
/// - Collapse whitespace runs and trim
/// - Wrap in boundary tags
///
/// Stages three to seven run as a single pass over the expanded text.
///
/// # Examples
///
/// ```
/// use seqprep_core::analyzer::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("Don't Stop!! 123"), "<start> do not stop <end>");
/// assert_eq!(normalizer.normalize("Café Münich"), "<start> cafe munich <end>");
/// ```
#[derive(Debug, Clone)]
pub struct TextNormalizer<E = ContractionTable> {
    config: NormalizerConfig,
    expander: E,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default(), ContractionTable::english())
    }
}

impl<E: ContractionExpander> TextNormalizer<E> {
    /// Creates a new normalizer with the specified configuration and expander.
    pub fn new(config: NormalizerConfig, expander: E) -> Self {
        Self { config, expander }
    }

    /// Creates a normalizer with the default configuration.
    pub fn with_expander(expander: E) -> Self {
        Self::new(NormalizerConfig::default(), expander)
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Contraction expander in use.
    #[inline]
    pub fn expander(&self) -> &E {
        &self.expander
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Reuses the buffer's capacity if sufficient, growing only when necessary.
    /// Clears the buffer before writing.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();

        let lowered = to_lower(input);
        let expanded = self.expander.expand(&lowered);

        let tags = self.config.tags;
        out.reserve(expanded.len() + tags.map_or(0, |t| t.overhead()));
        if let Some(tags) = tags {
            out.push_str(tags.start);
            out.push(' ');
        }

        let mut body = BodyWriter::new(out);
        for ch in expanded.chars() {
            if ch.is_ascii() {
                // Original ASCII digits go in the digit stage.
                if !ch.is_ascii_digit() {
                    body.push(ch as u8);
                }
                continue;
            }
            decompose_compatible(ch, |d| {
                if d.is_ascii() && !d.is_ascii_digit() {
                    body.push(d.to_ascii_lowercase() as u8);
                }
            });
        }

        if let Some(tags) = tags {
            out.push(' ');
            out.push_str(tags.end);
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len() + BoundaryTags::DEFAULT.overhead());
        self.normalize_into(input, &mut out);
        out
    }

    /// Decodes `input` as UTF-8, then normalizes it.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Decode`] if `input` is not valid UTF-8.
    pub fn normalize_bytes(&self, input: &[u8]) -> Result<String, NormalizeError> {
        let text = str::from_utf8(input)?;
        Ok(self.normalize(text))
    }
}

/// Appends the collapsed body: whitespace runs become one space, leading
/// and trailing whitespace is dropped, rejected bytes vanish.
struct BodyWriter<'a> {
    out: &'a mut String,
    start: usize,
    pending_space: bool,
}

impl<'a> BodyWriter<'a> {
    #[inline(always)]
    fn new(out: &'a mut String) -> Self {
        let start = out.len();
        Self {
            out,
            start,
            pending_space: false,
        }
    }

    #[inline(always)]
    fn push(&mut self, b: u8) {
        if is_ascii_ws(b) {
            self.pending_space = true;
            return;
        }
        if !is_kept(b) {
            return;
        }
        if self.pending_space && self.out.len() > self.start {
            self.out.push(' ');
        }
        self.pending_space = false;
        self.out.push(b as char);
    }
}

/// Lower-cases with locale-independent Unicode case mapping.
#[inline]
pub fn to_lower(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        if text.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(text.to_ascii_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// Deletes ASCII decimal digits.
pub fn remove_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Compatibility-decomposes `text` and drops whatever has no ASCII form.
///
/// Digits produced by decomposing a non-ASCII character (`²`, `½`) are
/// dropped as well. Capitals produced the same way (`ℌ`, `ᴬ`) are
/// lower-cased, since they bypassed the lower-case stage.
pub fn remove_accents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        decompose_compatible(ch, |d| {
            if d.is_ascii() && !d.is_ascii_digit() {
                out.push(d.to_ascii_lowercase());
            }
        });
    }
    out
}

/// Deletes every code point at or above U+0080.
pub fn remove_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Keeps ASCII letters, digits, whitespace, `'` and `-`.
pub fn remove_special_characters(text: &str) -> String {
    text.chars()
        .filter(|&c| c.is_ascii() && is_kept(c as u8))
        .collect()
}

/// Replaces each whitespace run with one space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars() {
        if ch.is_ascii() && is_ascii_ws(ch as u8) {
            prev_space = true;
            continue;
        }
        if prev_space && !out.is_empty() {
            out.push(' ');
        }
        prev_space = false;
        out.push(ch);
    }
    out
}
