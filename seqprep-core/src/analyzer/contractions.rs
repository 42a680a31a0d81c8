//! Contraction expansion.
//!
//! The normalizer does not hard-code a dictionary. It calls a
//! [`ContractionExpander`], so the table can be swapped or disabled
//! without touching the rest of the pipeline.

use std::borrow::Cow;

use memchr::{memchr, memmem};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Typographic apostrophe, folded to `'` for lookup.
const RIGHT_QUOTE: char = '\u{2019}';

/// Rewrites contracted word forms into their expanded equivalents.
///
/// Implementations are shared read-only across threads by the column
/// driver, hence the `Send + Sync` bound.
pub trait ContractionExpander: Send + Sync {
    /// Expands every known contraction in `text`.
    ///
    /// Returns the input unchanged (borrowed) when nothing matched.
    fn expand<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Pass-through expander.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContractions;

impl ContractionExpander for NoContractions {
    #[inline(always)]
    fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Standard English contractions. Ambiguous forms use the first reading:
/// `'s` is "is", `'d` is "would".
#[rustfmt::skip]
const ENGLISH: &[(&str, &str)] = &[
    ("ain't", "are not"), ("aren't", "are not"), ("can't", "cannot"),
    ("can't've", "cannot have"), ("'cause", "because"), ("could've", "could have"),
    ("couldn't", "could not"), ("couldn't've", "could not have"), ("didn't", "did not"),
    ("doesn't", "does not"), ("don't", "do not"), ("hadn't", "had not"),
    ("hadn't've", "had not have"), ("hasn't", "has not"), ("haven't", "have not"),
    ("he'd", "he would"), ("he'd've", "he would have"), ("he'll", "he will"),
    ("he'll've", "he will have"), ("he's", "he is"), ("how'd", "how did"),
    ("how'd'y", "how do you"), ("how'll", "how will"), ("how's", "how is"),
    ("i'd", "i would"), ("i'd've", "i would have"), ("i'll", "i will"),
    ("i'll've", "i will have"), ("i'm", "i am"), ("i've", "i have"),
    ("isn't", "is not"), ("it'd", "it would"), ("it'd've", "it would have"),
    ("it'll", "it will"), ("it'll've", "it will have"), ("it's", "it is"),
    ("let's", "let us"), ("ma'am", "madam"), ("mayn't", "may not"),
    ("might've", "might have"), ("mightn't", "might not"), ("mightn't've", "might not have"),
    ("must've", "must have"), ("mustn't", "must not"), ("mustn't've", "must not have"),
    ("needn't", "need not"), ("needn't've", "need not have"), ("o'clock", "of the clock"),
    ("oughtn't", "ought not"), ("oughtn't've", "ought not have"), ("shan't", "shall not"),
    ("sha'n't", "shall not"), ("shan't've", "shall not have"), ("she'd", "she would"),
    ("she'd've", "she would have"), ("she'll", "she will"), ("she'll've", "she will have"),
    ("she's", "she is"), ("should've", "should have"), ("shouldn't", "should not"),
    ("shouldn't've", "should not have"), ("so've", "so have"), ("so's", "so is"),
    ("that'd", "that would"), ("that'd've", "that would have"), ("that's", "that is"),
    ("there'd", "there would"), ("there'd've", "there would have"), ("there's", "there is"),
    ("they'd", "they would"), ("they'd've", "they would have"), ("they'll", "they will"),
    ("they'll've", "they will have"), ("they're", "they are"), ("they've", "they have"),
    ("to've", "to have"), ("wasn't", "was not"), ("we'd", "we would"),
    ("we'd've", "we would have"), ("we'll", "we will"), ("we'll've", "we will have"),
    ("we're", "we are"), ("we've", "we have"), ("weren't", "were not"),
    ("what'll", "what will"), ("what'll've", "what will have"), ("what're", "what are"),
    ("what's", "what is"), ("what've", "what have"), ("when's", "when is"),
    ("when've", "when have"), ("where'd", "where did"), ("where's", "where is"),
    ("where've", "where have"), ("who'll", "who will"), ("who'll've", "who will have"),
    ("who's", "who is"), ("who've", "who have"), ("why's", "why is"),
    ("why've", "why have"), ("will've", "will have"), ("won't", "will not"),
    ("won't've", "will not have"), ("would've", "would have"), ("wouldn't", "would not"),
    ("wouldn't've", "would not have"), ("y'all", "you all"), ("y'all'd", "you all would"),
    ("y'all'd've", "you all would have"), ("y'all're", "you all are"), ("y'all've", "you all have"),
    ("you'd", "you would"), ("you'd've", "you would have"), ("you'll", "you will"),
    ("you'll've", "you will have"), ("you're", "you are"), ("you've", "you have"),
];

/// Informal spellings, most of which carry no apostrophe.
#[rustfmt::skip]
const SLANG: &[(&str, &str)] = &[
    ("gonna", "going to"), ("gotta", "got to"), ("wanna", "want to"),
    ("gimme", "give me"), ("lemme", "let me"), ("dunno", "do not know"),
    ("kinda", "kind of"), ("sorta", "sort of"), ("outta", "out of"),
    ("lotta", "lot of"), ("hafta", "have to"), ("gotcha", "got you"),
    ("ya'll", "you all"), ("y'know", "you know"),
];

/// Leftover rules for words missing from the table. Checked in order.
const SUFFIX_RULES: &[(&[u8], &str)] = &[
    (b"n't", " not"),
    (b"'re", " are"),
    (b"'ve", " have"),
    (b"'ll", " will"),
    (b"'m", " am"),
    (b"'d", " would"),
];

/// Word-level contraction dictionary.
///
/// Keys are matched case-insensitively (ASCII) with `’` treated as `'`.
/// Values are stored lower-case. A table is built once and then only read.
///
/// # Examples
///
/// ```
/// use seqprep_core::analyzer::contractions::{ContractionExpander, ContractionTable};
///
/// let table = ContractionTable::english();
/// assert_eq!(table.expand("don't stop"), "do not stop");
/// assert_eq!(table.expand("gonna win"), "going to win");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContractionTable {
    entries: FxHashMap<Box<str>, Box<str>>,
    suffix_rules: bool,
    // Keys without an apostrophe disable the apostrophe fast path.
    bare_keys: bool,
}

impl ContractionTable {
    /// Standard English contractions, slang and suffix rules.
    pub fn english() -> Self {
        let mut table = Self::english_without_slang();
        for &(key, value) in SLANG {
            table.insert(key, value);
        }
        table
    }

    /// Standard English contractions and suffix rules, no slang.
    pub fn english_without_slang() -> Self {
        Self::from_pairs(ENGLISH.iter().copied()).with_suffix_rules(true)
    }

    /// Builds a table from `(contraction, expansion)` pairs.
    ///
    /// Suffix rules start disabled.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs = pairs.into_iter();
        let mut table = Self {
            entries: FxHashMap::with_capacity_and_hasher(pairs.size_hint().0, Default::default()),
            suffix_rules: false,
            bare_keys: false,
        };
        for (key, value) in pairs {
            table.insert(key.as_ref(), value.as_ref());
        }
        table
    }

    /// Enables or disables the generic `n't`, `'re`, `'ve`, `'ll`, `'m`,
    /// `'d` rules for words not found in the table.
    pub fn with_suffix_rules(mut self, enabled: bool) -> Self {
        self.suffix_rules = enabled;
        self
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, key: &str, value: &str) {
        let mut folded = SmallVec::new();
        fold_into(key, &mut folded);
        let Ok(key) = std::str::from_utf8(&folded) else {
            return;
        };
        if memchr(b'\'', key.as_bytes()).is_none() {
            self.bare_keys = true;
        }
        self.entries
            .insert(key.into(), value.to_lowercase().into_boxed_str());
    }

    /// Looks up a single word.
    pub fn get(&self, word: &str) -> Option<&str> {
        let mut key = SmallVec::new();
        fold_into(word, &mut key);
        self.lookup(&key)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when suffix rules are enabled.
    #[inline]
    pub fn suffix_rules(&self) -> bool {
        self.suffix_rules
    }

    #[inline]
    fn lookup(&self, key: &[u8]) -> Option<&str> {
        let key = std::str::from_utf8(key).ok()?;
        self.entries.get(key).map(|v| &**v)
    }

    /// Expands one word into `scratch`. Returns `false` on a miss.
    fn expand_word(&self, word: &str, key: &mut WordKey, scratch: &mut String) -> bool {
        scratch.clear();
        fold_into(word, key);
        if let Some(value) = self.lookup(key) {
            scratch.push_str(value);
            return true;
        }

        let core = word.trim_matches(is_apostrophe);
        if core.is_empty() {
            return false;
        }
        let lead = &word[..word.len() - word.trim_start_matches(is_apostrophe).len()];
        let trail = &word[word.trim_end_matches(is_apostrophe).len()..];

        if core.len() != word.len() {
            fold_into(core, key);
            if let Some(value) = self.lookup(key) {
                scratch.push_str(lead);
                scratch.push_str(value);
                scratch.push_str(trail);
                return true;
            }
        }

        if !self.suffix_rules {
            return false;
        }
        for &(suffix, tail) in SUFFIX_RULES {
            if key.len() <= suffix.len() || !key.ends_with(suffix) {
                continue;
            }
            let stem = &key[..key.len() - suffix.len()];
            if stem.last() == Some(&b'\'') {
                continue;
            }
            let Ok(stem) = std::str::from_utf8(stem) else {
                return false;
            };
            scratch.push_str(lead);
            scratch.push_str(stem);
            scratch.push_str(tail);
            scratch.push_str(trail);
            return true;
        }
        false
    }
}

impl ContractionExpander for ContractionTable {
    fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.entries.is_empty() && !self.suffix_rules {
            return Cow::Borrowed(text);
        }
        if !self.bare_keys && !has_apostrophe(text.as_bytes()) {
            return Cow::Borrowed(text);
        }

        let mut out: Option<String> = None;
        let mut copied = 0usize;
        let mut key = WordKey::new();
        let mut scratch = String::new();
        let mut chars = text.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if !is_word_char(c) {
                continue;
            }
            let mut end = start + c.len_utf8();
            while let Some(&(i, c)) = chars.peek() {
                if !is_word_char(c) {
                    break;
                }
                end = i + c.len_utf8();
                chars.next();
            }

            if self.expand_word(&text[start..end], &mut key, &mut scratch) {
                let buf = out.get_or_insert_with(|| String::with_capacity(text.len() + 16));
                buf.push_str(&text[copied..start]);
                buf.push_str(&scratch);
                copied = end;
            }
        }

        match out {
            Some(mut buf) => {
                buf.push_str(&text[copied..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(text),
        }
    }
}

type WordKey = SmallVec<[u8; 32]>;

#[inline(always)]
fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == RIGHT_QUOTE
}

#[inline(always)]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_apostrophe(c)
}

#[inline]
fn has_apostrophe(bytes: &[u8]) -> bool {
    memchr(b'\'', bytes).is_some() || memmem::find(bytes, "\u{2019}".as_bytes()).is_some()
}

/// Writes the lookup form of `word`: ASCII lower-cased, `’` as `'`.
fn fold_into(word: &str, key: &mut WordKey) {
    key.clear();
    for c in word.chars() {
        if c == RIGHT_QUOTE {
            key.push(b'\'');
        } else if c.is_ascii() {
            key.push(c.to_ascii_lowercase() as u8);
        } else {
            let mut tmp = [0u8; 4];
            key.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
        }
    }
}
