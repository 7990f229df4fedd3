//! Node-index bitmaps and their compact range notation.
//!
//! Job and partition tables carry the set of nodes they cover as text such
//! as `"0-3,7,9-10"`. [`NodeBitmap::expand`] turns that into an explicit
//! bitmap and [`NodeBitmap::compress`] produces the canonical text again.

use std::fmt;
use std::str::FromStr;

use super::{Cursor, Error, FormatError, MAX_NODE_INDEX, Result};

const WORD_BITS: u32 = u64::BITS;

/// Set of node indices backed by a growable bit vector.
///
/// The backing vector never ends in an all-zero word, so two bitmaps holding
/// the same indices always compare equal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct NodeBitmap {
    words: Vec<u64>,
}

impl NodeBitmap {
    /// Create an empty bitmap.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Parse range text (`"a-b,c,d-e"`) into a bitmap.
    ///
    /// Empty text yields an empty bitmap.
    pub fn expand(text: &str) -> Result<Self> {
        let mut bitmap = Self::new();
        if text.is_empty() {
            return Ok(bitmap);
        }

        for token in text.split(',') {
            let (start, end) = match token.split_once('-') {
                Some((lo, hi)) => (parse_index(lo, token)?, parse_index(hi, token)?),
                None => {
                    let index = parse_index(token, token)?;
                    (index, index)
                }
            };
            if start > end {
                return Err(FormatError::InvertedRange { start, end }.into());
            }
            bitmap.insert_range(start, end)?;
        }

        Ok(bitmap)
    }

    /// Render the bitmap as canonical range text.
    ///
    /// Runs are ascending and maximal; a run of one index has no dash.
    #[must_use]
    pub fn compress(&self) -> String {
        let mut out = String::new();
        for (start, end) in self.ranges() {
            if !out.is_empty() {
                out.push(',');
            }
            if start == end {
                out.push_str(&start.to_string());
            } else {
                out.push_str(&format!("{start}-{end}"));
            }
        }
        out
    }

    /// Byte length of [`compress`](Self::compress) output, computed without building it.
    #[must_use]
    pub fn compressed_len(&self) -> usize {
        let mut len = 0;
        for (start, end) in self.ranges() {
            if len > 0 {
                len += 1;
            }
            len += decimal_len(start);
            if start != end {
                len += 1 + decimal_len(end);
            }
        }
        len
    }

    /// Add one index. Returns `true` if it was not already present.
    pub fn insert(&mut self, index: u32) -> Result<bool> {
        check_index(index)?;
        self.grow_to(index)?;
        let (word, mask) = locate(index);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        Ok(fresh)
    }

    /// Add every index in `start..=end`.
    pub fn insert_range(&mut self, start: u32, end: u32) -> Result<()> {
        if start > end {
            return Err(FormatError::InvertedRange { start, end }.into());
        }
        check_index(end)?;
        self.grow_to(end)?;

        // Partial masks on the end words, whole words in between
        let (first, first_mask) = locate(start);
        let (last, last_mask) = locate(end);
        let head = !(first_mask - 1);
        let tail = last_mask | (last_mask - 1);
        if first == last {
            self.words[first] |= head & tail;
        } else {
            self.words[first] |= head;
            self.words[first + 1..last].fill(u64::MAX);
            self.words[last] |= tail;
        }
        Ok(())
    }

    /// Whether `index` is in the set.
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        let (word, mask) = locate(index);
        self.words.get(word).is_some_and(|bits| bits & mask != 0)
    }

    /// Number of indices in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Smallest index in the set.
    #[must_use]
    pub fn first(&self) -> Option<u32> {
        self.iter().next()
    }

    /// Largest index in the set.
    #[must_use]
    pub fn last(&self) -> Option<u32> {
        let top = self.words.last()?;
        let word = u32::try_from(self.words.len() - 1).ok()?;
        Some(word * WORD_BITS + (WORD_BITS - 1 - top.leading_zeros()))
    }

    /// Indices in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            word: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Maximal inclusive runs in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let mut indices = self.iter().peekable();
        std::iter::from_fn(move || {
            let start = indices.next()?;
            let mut end = start;
            while indices.next_if(|&next| next == end + 1).is_some() {
                end += 1;
            }
            Some((start, end))
        })
    }

    fn grow_to(&mut self, index: u32) -> Result<()> {
        let needed = (index / WORD_BITS) as usize + 1;
        if needed > self.words.len() {
            self.words
                .try_reserve_exact(needed - self.words.len())
                .map_err(|_| Error::AllocationFailure {
                    what: "node bitmap",
                })?;
            self.words.resize(needed, 0);
        }
        Ok(())
    }
}

/// Ascending iterator over a [`NodeBitmap`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    words: &'a [u64],
    word: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        while self.current == 0 {
            self.word += 1;
            self.current = *self.words.get(self.word)?;
        }
        let bit = self.current.trailing_zeros();
        self.current &= self.current - 1;
        let base = u32::try_from(self.word).ok()? * WORD_BITS;
        Some(base + bit)
    }
}

impl<'a> IntoIterator for &'a NodeBitmap {
    type Item = u32;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl fmt::Display for NodeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compress())
    }
}

impl fmt::Debug for NodeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeBitmap").field(&self.compress()).finish()
    }
}

impl FromStr for NodeBitmap {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::expand(text)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeBitmap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.compress())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NodeBitmap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        Self::expand(&text).map_err(serde::de::Error::custom)
    }
}

impl<B: AsRef<[u8]>> Cursor<B> {
    /// Read range text and expand it into a bitmap.
    pub fn read_node_bitmap(&mut self) -> Result<NodeBitmap> {
        NodeBitmap::expand(&self.read_string()?)
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Cursor<B> {
    /// Write a bitmap as compressed range text.
    pub fn write_node_bitmap(&mut self, bitmap: &NodeBitmap) -> Result<()> {
        self.write_string(&bitmap.compress())
    }
}

/// Encoded size of a bitmap written with [`Cursor::write_node_bitmap`].
#[must_use]
pub fn node_bitmap_len(bitmap: &NodeBitmap) -> usize {
    2 + bitmap.compressed_len()
}

const fn decimal_len(mut value: u32) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

const fn locate(index: u32) -> (usize, u64) {
    ((index / WORD_BITS) as usize, 1 << (index % WORD_BITS))
}

fn check_index(index: u32) -> Result<()> {
    if index > MAX_NODE_INDEX {
        return Err(FormatError::IndexOutOfRange {
            index,
            max: MAX_NODE_INDEX,
        }
        .into());
    }
    Ok(())
}

fn parse_index(digits: &str, token: &str) -> Result<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(token));
    }
    let index: u32 = digits.parse().map_err(|_| invalid(token))?;
    check_index(index)?;
    Ok(index)
}

fn invalid(token: &str) -> Error {
    FormatError::InvalidToken {
        token: token.to_owned(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::cursor::string_len;

    #[test]
    fn test_expand_empty() {
        let bitmap = NodeBitmap::expand("").unwrap();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.len(), 0);
        assert_eq!(bitmap.compress(), "");
    }

    #[test]
    fn test_expand_mixed_ranges() {
        let bitmap = NodeBitmap::expand("0-3,7,9-10").unwrap();
        let indices: Vec<u32> = bitmap.iter().collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 7, 9, 10]);
        assert_eq!(bitmap.first(), Some(0));
        assert_eq!(bitmap.last(), Some(10));
        assert!(!bitmap.contains(8));
    }

    #[test]
    fn test_inverted_range_rejected() {
        assert_eq!(
            NodeBitmap::expand("5-2"),
            Err(Error::Format(FormatError::InvertedRange { start: 5, end: 2 }))
        );
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        for text in ["a", "1,,2", "1-", "-1", "1-2-3", " 1", "1,", "+4", "0x10"] {
            assert!(
                matches!(
                    NodeBitmap::expand(text),
                    Err(Error::Format(FormatError::InvalidToken { .. }))
                ),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_index_limit() {
        let text = format!("{}", MAX_NODE_INDEX + 1);
        assert!(matches!(
            NodeBitmap::expand(&text),
            Err(Error::Format(FormatError::IndexOutOfRange { .. }))
        ));
        assert!(NodeBitmap::expand(&MAX_NODE_INDEX.to_string()).is_ok());
    }

    #[test]
    fn test_compress_merges_adjacent_and_overlapping() {
        let bitmap = NodeBitmap::expand("4,0-2,3,9,8,10-12,11").unwrap();
        assert_eq!(bitmap.compress(), "0-4,8-12");
    }

    #[test]
    fn test_word_boundaries() {
        let bitmap = NodeBitmap::expand("62-65,127,128").unwrap();
        assert_eq!(bitmap.compress(), "62-65,127-128");
        assert_eq!(bitmap.len(), 6);
        assert_eq!(bitmap.last(), Some(128));
    }

    #[test]
    fn test_range_fill_across_words() {
        let bitmap = NodeBitmap::expand("3-200").unwrap();
        assert_eq!(bitmap.len(), 198);
        for index in [3, 63, 64, 127, 128, 200] {
            assert!(bitmap.contains(index), "{index}");
        }
        assert!(!bitmap.contains(2));
        assert!(!bitmap.contains(201));
        assert_eq!(bitmap.compress(), "3-200");

        assert_eq!(NodeBitmap::expand("64-127").unwrap().len(), 64);
        assert_eq!(NodeBitmap::expand("5-5").unwrap().compress(), "5");
        assert_eq!(NodeBitmap::expand("60-67").unwrap().compress(), "60-67");
    }

    #[test]
    fn test_overlapping_full_span_decode_time() {
        use std::time::Instant;

        let text = vec!["0-1048575"; 6553].join(",");
        let mut buf = vec![0u8; string_len(&text)];
        Cursor::new(&mut buf[..]).write_string(&text).unwrap();

        let start = Instant::now();
        let bitmap = Cursor::new(&buf[..]).read_node_bitmap().unwrap();
        let elapsed = start.elapsed();
        println!("Expanded {} bytes of range text in {elapsed:?}", text.len());

        assert_eq!(bitmap.len(), 1_048_576);
        assert_eq!(bitmap.compress(), "0-1048575");
        // Word-at-a-time fill keeps this well under a second even unoptimized
        assert!(elapsed.as_secs() < 10, "Expand too slow: {elapsed:?}");
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut bitmap = NodeBitmap::new();
        assert!(bitmap.insert(70).unwrap());
        assert!(!bitmap.insert(70).unwrap());
        assert_eq!(bitmap, NodeBitmap::expand("70").unwrap());
        assert_eq!(bitmap.to_string(), "70");
    }

    #[test]
    fn test_compressed_len_matches() {
        for text in ["", "0", "9-10", "0-3,7,9-10", "99,1000-1001,65535"] {
            let bitmap = NodeBitmap::expand(text).unwrap();
            assert_eq!(bitmap.compressed_len(), bitmap.compress().len());
            assert_eq!(node_bitmap_len(&bitmap), string_len(&bitmap.compress()));
        }
    }

    #[test]
    fn test_cursor_glue() {
        let bitmap = NodeBitmap::expand("1-4,8").unwrap();
        let mut buf = vec![0u8; node_bitmap_len(&bitmap)];
        let mut cursor = Cursor::new(&mut buf[..]);
        cursor.write_node_bitmap(&bitmap).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(&buf[2..], b"1-4,8");

        let decoded = Cursor::new(&buf[..]).read_node_bitmap().unwrap();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn test_from_str() {
        let bitmap: NodeBitmap = "1-3".parse().unwrap();
        assert_eq!(bitmap.len(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn range_text_strategy() -> impl Strategy<Value = String> {
            prop::collection::vec((0u32..2_000, 0u32..40), 0..12).prop_map(|runs| {
                runs.into_iter()
                    .map(|(start, width)| {
                        if width == 0 {
                            start.to_string()
                        } else {
                            format!("{start}-{}", start + width)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            })
        }

        proptest! {
            /// Property: compressing and re-expanding yields the same set
            #[test]
            fn prop_compress_expand_stable(text in range_text_strategy()) {
                let bitmap = NodeBitmap::expand(&text).unwrap();
                let again = NodeBitmap::expand(&bitmap.compress()).unwrap();
                prop_assert_eq!(&again, &bitmap);
                prop_assert_eq!(again.compress(), bitmap.compress());
            }

            /// Property: range fill agrees with inserting every index
            #[test]
            fn prop_range_fill_matches_btreeset(
                runs in prop::collection::vec((0u32..3_000, 0u32..300), 0..8),
            ) {
                let mut bitmap = NodeBitmap::new();
                let mut expected = std::collections::BTreeSet::new();
                for (start, width) in runs {
                    bitmap.insert_range(start, start + width).unwrap();
                    expected.extend(start..=start + width);
                }
                prop_assert_eq!(bitmap.len(), expected.len());
                prop_assert!(bitmap.iter().eq(expected.iter().copied()));
            }

            /// Property: the bitmap holds exactly the inserted indices
            #[test]
            fn prop_matches_btreeset(indices in prop::collection::btree_set(0u32..5_000, 0..64)) {
                let mut bitmap = NodeBitmap::new();
                for &index in &indices {
                    bitmap.insert(index).unwrap();
                }
                prop_assert_eq!(bitmap.len(), indices.len());
                prop_assert!(bitmap.iter().eq(indices.iter().copied()));
            }
        }
    }
}
