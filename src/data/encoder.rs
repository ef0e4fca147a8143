// ============================================================
// Layer 4 - Sequence Encoder
// ============================================================
// Turns a URL into exactly `max_len` vocabulary indices.
//
//   1. Map each character to its index (0 when unseen)
//   2. Too long  → keep the LAST max_len indices
//   3. Too short → prepend zeros until max_len
//
// Example with max_len = 6 and a→1 b→2 c→3:
//   "abc"        → [0, 0, 0, 1, 2, 3]
//   "abcabcab"   → [3, 1, 2, 3, 1, 2]
//
// Both ends of the pipeline (training and prediction) go
// through this type, so they cannot drift apart.

use crate::data::vocabulary::{Vocabulary, PAD_INDEX};

/// Default sequence length fed to the classifier.
pub const MAX_LEN: usize = 200;

/// Fixed-length encoder bound to one vocabulary.
#[derive(Debug, Clone)]
pub struct SequenceEncoder {
    vocab:   Vocabulary,
    max_len: usize,
}

impl SequenceEncoder {
    pub fn new(vocab: Vocabulary, max_len: usize) -> Self {
        Self { vocab, max_len }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Encode one string. Output length is always `max_len`.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        pad_or_truncate(self.vocab.indices(text), self.max_len)
    }

    pub fn encode_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<u32>> {
        texts.iter().map(|t| self.encode(t.as_ref())).collect()
    }
}

/// Left-truncate or left-pad `indices` to exactly `max_len`.
pub fn pad_or_truncate(mut indices: Vec<u32>, max_len: usize) -> Vec<u32> {
    if indices.len() > max_len {
        indices.drain(..indices.len() - max_len);
        indices
    } else {
        let mut out = vec![PAD_INDEX; max_len - indices.len()];
        out.append(&mut indices);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> SequenceEncoder {
        let vocab = Vocabulary::build(
            &["http://www.example.com/index.php?id=1", "https://deface.me/~admin"],
            true,
        );
        SequenceEncoder::new(vocab, MAX_LEN)
    }

    fn url_of_len(n: usize) -> String {
        "http://a.com/".chars().cycle().take(n).collect()
    }

    #[test]
    fn test_length_is_always_max_len() {
        let enc = encoder();
        for n in [0, 1, 199, 200, 5000] {
            assert_eq!(enc.encode(&url_of_len(n)).len(), MAX_LEN, "input length {n}");
        }
    }

    #[test]
    fn test_small_example() {
        let vocab = Vocabulary::from_chars(vec!['a', 'b', 'c'], false);
        let enc   = SequenceEncoder::new(vocab, 6);
        assert_eq!(enc.encode("abc"),      vec![0, 0, 0, 1, 2, 3]);
        assert_eq!(enc.encode("abcabcab"), vec![3, 1, 2, 3, 1, 2]);
        assert_eq!(enc.encode(""),         vec![0; 6]);
    }

    #[test]
    fn test_deterministic() {
        let enc = encoder();
        let url = "http://www.example.com/a/b?c=d";
        assert_eq!(enc.encode(url), enc.encode(url));
    }

    #[test]
    fn test_round_trip_after_stripping_padding() {
        let enc = encoder();
        let url = "http://www.example.com/index.php";
        let decoded: String = enc
            .encode(url)
            .into_iter()
            .skip_while(|&i| i == PAD_INDEX)
            .filter_map(|i| enc.vocab().char_at(i))
            .collect();
        assert_eq!(decoded, url);
    }

    #[test]
    fn test_long_input_keeps_tail() {
        let enc  = encoder();
        let url  = url_of_len(450);
        let tail: String = url.chars().skip(450 - MAX_LEN).collect();
        assert_eq!(enc.encode(&url), enc.encode(&tail));
    }

    #[test]
    fn test_unseen_chars_become_padding_index() {
        let enc = encoder();
        let seq = enc.encode("€€");
        assert!(seq.iter().all(|&i| i == PAD_INDEX));
    }

    #[test]
    fn test_batch_matches_single() {
        let enc  = encoder();
        let urls = vec!["http://a.com".to_string(), "x".to_string()];
        let out  = enc.encode_batch(&urls);
        assert_eq!(out[0], enc.encode("http://a.com"));
        assert_eq!(out[1], enc.encode("x"));
    }
}
