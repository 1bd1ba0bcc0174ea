//! Whole-word masking of unwanted words.
//!
//! Text is split into tokens: maximal runs of word characters (alphanumeric or
//! `_`). A token is masked when it equals one of the configured words, ignoring
//! case, and is replaced by as many `*` as it has characters. Everything that is
//! not a masked token is kept as typed.
//!
//! Masking depends only on the text, never on when or how it was typed.
//! [`WordMask::mask_settled`] covers live input: it leaves the trailing token
//! alone until a boundary character follows it, so a word is not masked while
//! it might still grow into a different one.

use std::collections::BTreeSet;

/// Words masked when no list is configured.
pub const DEFAULT_MASKED_WORDS: &[&str] = &[
    "badword",
    "curse",
    "damn",
    "heck",
    "explicit",
    "profane",
    "inappropriate",
    "offensive",
    "screw",
    "idiot",
];

/// A case-insensitive set of words to mask.
///
/// # Examples
///
/// ```
/// use catalog_browser::tools::WordMask;
///
/// let mask = WordMask::new(["heck"]);
/// assert_eq!(mask.mask("Heck, what the heck?"), "****, what the ****?");
/// assert_eq!(mask.mask("heckle"), "heckle");
/// assert_eq!(mask.mask_settled("oh heck"), "oh heck");
/// assert_eq!(mask.mask_settled("oh heck "), "oh **** ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMask {
    words: BTreeSet<String>,
}

impl Default for WordMask {
    fn default() -> Self {
        Self::new(DEFAULT_MASKED_WORDS.iter().copied())
    }
}

impl WordMask {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Masks every masked token in `text`.
    #[must_use]
    pub fn mask(&self, text: &str) -> String {
        self.apply(text, true)
    }

    /// Masks every masked token that is followed by a boundary character.
    ///
    /// A token running to the end of `text` is left unchanged.
    #[must_use]
    pub fn mask_settled(&self, text: &str) -> String {
        self.apply(text, false)
    }

    /// True if `text` contains at least one masked token.
    #[must_use]
    pub fn contains_masked(&self, text: &str) -> bool {
        tokens(text).any(|(start, end)| self.is_masked(&text[start..end]))
    }

    fn is_masked(&self, token: &str) -> bool {
        self.words.contains(&token.to_lowercase())
    }

    fn apply(&self, text: &str, include_trailing: bool) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;

        for (start, end) in tokens(text) {
            let settled = end < text.len() || include_trailing;
            if settled && self.is_masked(&text[start..end]) {
                out.push_str(&text[copied..start]);
                out.extend(std::iter::repeat('*').take(text[start..end].chars().count()));
                copied = end;
            }
        }

        out.push_str(&text[copied..]);
        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte ranges of the word tokens of `text`, in order.
fn tokens(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut chars = text.char_indices().peekable();
    std::iter::from_fn(move || {
        while chars.next_if(|(_, c)| !is_word_char(*c)).is_some() {}
        let (start, first) = chars.next()?;
        let mut end = start + first.len_utf8();
        while let Some((i, c)) = chars.next_if(|(_, c)| is_word_char(*c)) {
            end = i + c.len_utf8();
        }
        Some((start, end))
    })
}
