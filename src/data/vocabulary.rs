// ============================================================
// Layer 4 - Character Vocabulary
// ============================================================
// Assigns every distinct character in the training corpus a
// positive integer index.
//
//   - Index 0 is reserved for padding and unseen characters
//   - Indices 1..=N go to characters by descending frequency
//   - Equal counts keep first-seen order
//
// Example, corpus ["aab", "bc"]:
//   counts  a:2  b:2  c:1
//   order   a (seen first), b, c
//   indices a→1  b→2  c→3      size() = 4
//
// When `lowercase` is set, text is lowercased both while
// counting and while looking characters up, so encoding
// always sees the same normalisation as the builder did.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index used for left padding and for characters the
/// vocabulary has never seen.
pub const PAD_INDEX: u32 = 0;

/// Immutable character → index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Characters in index order; `chars[i]` has index `i + 1`.
    chars:     Vec<char>,
    index:     HashMap<char, u32>,
    lowercase: bool,
}

impl Vocabulary {
    /// Build a vocabulary from a corpus of texts.
    pub fn build<S: AsRef<str>>(texts: &[S], lowercase: bool) -> Self {
        // (count, first_seen) per character
        let mut stats: HashMap<char, (usize, usize)> = HashMap::new();
        let mut seen = 0usize;

        for text in texts {
            for c in normalise(text.as_ref(), lowercase).chars() {
                let entry = stats.entry(c).or_insert_with(|| {
                    seen += 1;
                    (0, seen)
                });
                entry.0 += 1;
            }
        }

        let mut ranked: Vec<(char, usize, usize)> = stats
            .into_iter()
            .map(|(c, (count, first))| (c, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let chars: Vec<char> = ranked.into_iter().map(|(c, _, _)| c).collect();
        Self::from_chars(chars, lowercase)
    }

    /// Rebuild a vocabulary from its ordered character list.
    /// Used when loading a persisted artifact.
    pub fn from_chars(chars: Vec<char>, lowercase: bool) -> Self {
        let index = chars
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i as u32 + 1))
            .collect();
        Self { chars, index, lowercase }
    }

    /// Number of embedding rows the model needs: distinct
    /// characters plus the reserved padding index. Never 0.
    pub fn size(&self) -> usize {
        self.chars.len() + 1
    }

    /// Index of a character, `PAD_INDEX` if unseen. The caller is
    /// expected to have normalised `c` already.
    pub fn index_of(&self, c: char) -> u32 {
        self.index.get(&c).copied().unwrap_or(PAD_INDEX)
    }

    /// Character at an index, `None` for 0 or out of range.
    #[cfg(test)]
    pub fn char_at(&self, index: u32) -> Option<char> {
        (index as usize).checked_sub(1).and_then(|i| self.chars.get(i)).copied()
    }

    /// Map every character of `text` to its index, with the
    /// vocabulary's normalisation applied. No padding.
    pub fn indices(&self, text: &str) -> Vec<u32> {
        normalise(text, self.lowercase)
            .chars()
            .map(|c| self.index_of(c))
            .collect()
    }
}

fn normalise(text: &str, lowercase: bool) -> std::borrow::Cow<'_, str> {
    if lowercase {
        std::borrow::Cow::Owned(text.to_lowercase())
    } else {
        std::borrow::Cow::Borrowed(text)
    }
}

// ─── Serialised form ────────────────────────────────────────────────────────
// The ordered character list is enough to rebuild the map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub lowercase: bool,
    pub chars:     Vec<char>,
}

impl From<&Vocabulary> for VocabularyRecord {
    fn from(v: &Vocabulary) -> Self {
        Self { lowercase: v.lowercase, chars: v.chars.clone() }
    }
}

impl From<VocabularyRecord> for Vocabulary {
    fn from(r: VocabularyRecord) -> Self {
        Vocabulary::from_chars(r.chars, r.lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_order_with_first_seen_ties() {
        let v = Vocabulary::build(&["aab", "bc"], false);
        assert_eq!(v.index_of('a'), 1);
        assert_eq!(v.index_of('b'), 2);
        assert_eq!(v.index_of('c'), 3);
        assert_eq!(v.size(), 4);
    }

    #[test]
    fn test_most_frequent_gets_index_one() {
        let v = Vocabulary::build(&["xyzzz"], false);
        assert_eq!(v.index_of('z'), 1);
        assert_eq!(v.index_of('x'), 2);
        assert_eq!(v.index_of('y'), 3);
    }

    #[test]
    fn test_zero_is_never_assigned() {
        let v = Vocabulary::build(&["http://example.com/path?q=1"], true);
        for &c in &v.chars {
            assert_ne!(v.index_of(c), PAD_INDEX);
        }
        assert_eq!(v.char_at(0), None);
    }

    #[test]
    fn test_unseen_char_maps_to_zero() {
        let v = Vocabulary::build(&["abc"], false);
        assert_eq!(v.index_of('#'), PAD_INDEX);
    }

    #[test]
    fn test_empty_corpus_is_valid() {
        let texts: [&str; 0] = [];
        let v = Vocabulary::build(&texts, true);
        assert_eq!(v.size(), 1);
        assert!(v.chars.is_empty());
        assert_eq!(v.indices("abc"), vec![0, 0, 0]);
    }

    #[test]
    fn test_lowercase_folds_counts() {
        let v = Vocabulary::build(&["AaB"], true);
        assert_eq!(v.index_of('a'), 1);
        assert_eq!(v.indices("A"), vec![1]);
        assert_eq!(v.size(), 3);
    }

    #[test]
    fn test_deterministic_build() {
        let corpus = ["http://a.com/x", "https://bb.org", "ftp://c.net/?z=1"];
        assert_eq!(Vocabulary::build(&corpus, true), Vocabulary::build(&corpus, true));
    }

    #[test]
    fn test_record_round_trip() {
        let v = Vocabulary::build(&["hello world"], true);
        let rec = VocabularyRecord::from(&v);
        assert_eq!(Vocabulary::from(rec), v);
    }
}
