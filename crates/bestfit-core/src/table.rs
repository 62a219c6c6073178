//! Best-fit mapping tables and lookup.
//!
//! A [`MappingTable`] holds the (source, replacement) pairs of one code
//! page, sorted by source code unit so that [`MappingTable::lookup`] can
//! binary search it.

use crate::error::FallbackError;

/// Once the search range holds this many pairs or fewer, lookup switches
/// from bisection to a linear scan.
const LINEAR_SCAN_PAIRS: usize = 3;

/// One best-fit entry: an unmappable UTF-16 code unit and the character
/// the code page can represent in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestFitPair {
    /// The UTF-16 code unit the encoder could not map.
    pub source: u16,
    /// The substitute character.
    pub replacement: char,
}

impl BestFitPair {
    /// Create a new pair.
    pub fn new(source: u16, replacement: char) -> Self {
        Self {
            source,
            replacement,
        }
    }
}

/// An immutable best-fit table for one code page.
///
/// Pairs are sorted by strictly ascending `source`. Unique sources are part
/// of the data contract: with duplicates, which replacement a lookup returns
/// depends on the search path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "Vec<BestFitPair>", try_from = "Vec<BestFitPair>")
)]
pub struct MappingTable {
    pairs: Vec<BestFitPair>,
}

impl MappingTable {
    /// Create a table from pairs already sorted by source.
    ///
    /// The ordering is the caller's guarantee: it is checked only in debug
    /// builds and unchecked in release builds. Use
    /// [`try_from_pairs`](Self::try_from_pairs) for untrusted data.
    pub fn from_pairs(pairs: Vec<BestFitPair>) -> Self {
        debug_assert!(
            pairs.windows(2).all(|w| w[0].source < w[1].source),
            "best-fit pairs must be sorted by strictly ascending source"
        );
        Self { pairs }
    }

    /// Create a table from pairs, rejecting any pair whose source is not
    /// strictly greater than the one before it.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::MalformedTable`] naming the first pair out of
    /// order.
    pub fn try_from_pairs(pairs: Vec<BestFitPair>) -> Result<Self, FallbackError> {
        if let Some(index) = pairs.windows(2).position(|w| w[0].source >= w[1].source) {
            return Err(FallbackError::MalformedTable(format!(
                "source 0x{:04X} at pair {} does not follow 0x{:04X}",
                pairs[index + 1].source,
                index + 1,
                pairs[index].source
            )));
        }
        Ok(Self { pairs })
    }

    /// Create a table from the flattened `[source, replacement, source, ...]`
    /// layout in which code page data ships.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::MalformedTable`] if the data has odd length,
    /// a replacement is a lone surrogate, or sources are not strictly
    /// ascending.
    pub fn from_flat(data: &[u16]) -> Result<Self, FallbackError> {
        if data.len() % 2 != 0 {
            return Err(FallbackError::MalformedTable(format!(
                "flattened table has odd length {}",
                data.len()
            )));
        }
        let pairs = data
            .chunks_exact(2)
            .map(|chunk| {
                let (source, replacement) = (chunk[0], chunk[1]);
                char::from_u32(u32::from(replacement))
                    .map(|replacement| BestFitPair::new(source, replacement))
                    .ok_or_else(|| {
                        FallbackError::MalformedTable(format!(
                            "replacement 0x{replacement:04X} for 0x{source:04X} is a surrogate"
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_pairs(pairs)
    }

    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Find the replacement for `source`.
    ///
    /// Bisects until at most three pairs remain, then scans them linearly.
    pub fn lookup(&self, source: u16) -> Option<char> {
        let pairs = self.pairs.as_slice();
        let mut low = 0;
        let mut high = pairs.len();

        while high - low > LINEAR_SCAN_PAIRS {
            // mid is strictly inside (low, high) here, so the range shrinks
            let mid = low + (high - low) / 2;
            let entry = pairs[mid];
            if entry.source == source {
                return Some(entry.replacement);
            } else if entry.source < source {
                low = mid;
            } else {
                high = mid;
            }
        }

        pairs[low..high]
            .iter()
            .find(|pair| pair.source == source)
            .map(|pair| pair.replacement)
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the table has no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs in ascending source order.
    pub fn as_slice(&self) -> &[BestFitPair] {
        &self.pairs
    }

    /// Iterate over the pairs in ascending source order.
    pub fn iter(&self) -> std::slice::Iter<'_, BestFitPair> {
        self.pairs.iter()
    }
}

impl<'a> IntoIterator for &'a MappingTable {
    type Item = &'a BestFitPair;
    type IntoIter = std::slice::Iter<'a, BestFitPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<BestFitPair>> for MappingTable {
    type Error = FallbackError;

    fn try_from(pairs: Vec<BestFitPair>) -> Result<Self, Self::Error> {
        Self::try_from_pairs(pairs)
    }
}

impl From<MappingTable> for Vec<BestFitPair> {
    fn from(table: MappingTable) -> Self {
        table.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latin_table() -> MappingTable {
        MappingTable::from_pairs(vec![
            BestFitPair::new(0x00C0, 'A'),
            BestFitPair::new(0x00C1, 'A'),
            BestFitPair::new(0x00C7, 'C'),
            BestFitPair::new(0x00D1, 'N'),
            BestFitPair::new(0x0100, 'A'),
            BestFitPair::new(0x0107, 'c'),
            BestFitPair::new(0x2013, '-'),
            BestFitPair::new(0x2018, '\''),
            BestFitPair::new(0x201C, '"'),
            BestFitPair::new(0xFF21, 'A'),
        ])
    }

    // ========== lookup ==========

    #[test]
    fn lookup_finds_latin_capital_a_grave() {
        assert_eq!(latin_table().lookup(0x00C0), Some('A'));
    }

    #[test]
    fn lookup_absent_key_is_none() {
        assert_eq!(latin_table().lookup(0x0041), None);
    }

    #[test]
    fn lookup_first_and_last_entries() {
        let table = latin_table();
        assert_eq!(table.lookup(0x00C0), Some('A'));
        assert_eq!(table.lookup(0xFF21), Some('A'));
    }

    #[test]
    fn lookup_below_and_above_range() {
        let table = latin_table();
        assert_eq!(table.lookup(0x0000), None);
        assert_eq!(table.lookup(0xFFFF), None);
    }

    #[test]
    fn lookup_empty_table() {
        assert_eq!(MappingTable::empty().lookup(0x00C0), None);
    }

    #[test]
    fn lookup_single_pair_table() {
        let table = MappingTable::from_pairs(vec![BestFitPair::new(0x2022, '.')]);
        assert_eq!(table.lookup(0x2022), Some('.'));
        assert_eq!(table.lookup(0x2021), None);
    }

    #[test]
    fn lookup_small_tables_use_linear_scan() {
        for len in 1..=LINEAR_SCAN_PAIRS {
            let pairs = (0..len as u16)
                .map(|i| BestFitPair::new(0x0100 + i * 2, 'x'))
                .collect();
            let table = MappingTable::from_pairs(pairs);
            for i in 0..len as u16 {
                assert_eq!(table.lookup(0x0100 + i * 2), Some('x'));
                assert_eq!(table.lookup(0x0101 + i * 2), None);
            }
        }
    }

    #[test]
    fn lookup_agrees_with_linear_search_on_every_key() {
        // sparse keys, so both hits and misses land between entries
        let pairs: Vec<BestFitPair> = (0..500u16)
            .map(|i| {
                let replacement = char::from(b'a' + (i % 26) as u8);
                BestFitPair::new(i * 7 + 3, replacement)
            })
            .collect();
        let table = MappingTable::from_pairs(pairs.clone());

        for key in 0..=4000u16 {
            let expected = pairs
                .iter()
                .find(|p| p.source == key)
                .map(|p| p.replacement);
            assert_eq!(table.lookup(key), expected, "key 0x{key:04X}");
        }
    }

    #[test]
    fn lookup_is_deterministic() {
        let table = latin_table();
        let first = table.lookup(0x2018);
        for _ in 0..10 {
            assert_eq!(table.lookup(0x2018), first);
        }
    }

    // ========== construction ==========

    #[test]
    fn from_flat_builds_pairs() {
        let table = MappingTable::from_flat(&[0x00C0, 0x0041, 0x00C7, 0x0043]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(0x00C0), Some('A'));
        assert_eq!(table.lookup(0x00C7), Some('C'));
    }

    #[test]
    fn from_flat_rejects_odd_length() {
        let err = MappingTable::from_flat(&[0x00C0, 0x0041, 0x00C7]).unwrap_err();
        assert!(matches!(err, FallbackError::MalformedTable(_)));
        assert!(err.to_string().contains("odd length 3"));
    }

    #[test]
    fn from_flat_rejects_surrogate_replacement() {
        let err = MappingTable::from_flat(&[0x00C0, 0xD800]).unwrap_err();
        assert!(matches!(err, FallbackError::MalformedTable(_)));
    }

    #[test]
    fn from_flat_rejects_unsorted_sources() {
        let err = MappingTable::from_flat(&[0x00C7, 0x0043, 0x00C0, 0x0041]).unwrap_err();
        assert!(matches!(err, FallbackError::MalformedTable(_)));
    }

    #[test]
    fn try_from_pairs_accepts_ascending() {
        let table = MappingTable::try_from_pairs(vec![
            BestFitPair::new(0x00C0, 'A'),
            BestFitPair::new(0x00C7, 'C'),
        ])
        .unwrap();
        assert_eq!(table.lookup(0x00C7), Some('C'));
    }

    #[test]
    fn try_from_pairs_rejects_descending() {
        let err = MappingTable::try_from_pairs(vec![
            BestFitPair::new(500, 'e'),
            BestFitPair::new(400, 'd'),
            BestFitPair::new(300, 'c'),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            FallbackError::MalformedTable(
                "source 0x0190 at pair 1 does not follow 0x01F4".to_string()
            )
        );
    }

    #[test]
    fn try_from_pairs_rejects_duplicates() {
        let pairs = vec![BestFitPair::new(0x00C0, 'A'), BestFitPair::new(0x00C0, 'a')];
        assert!(MappingTable::try_from(pairs).is_err());
    }

    #[test]
    fn table_converts_back_into_pairs() {
        let pairs: Vec<BestFitPair> = latin_table().into();
        assert_eq!(pairs.len(), 10);
        assert_eq!(pairs[0], BestFitPair::new(0x00C0, 'A'));
    }

    #[test]
    fn from_flat_empty() {
        let table = MappingTable::from_flat(&[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn iter_preserves_order() {
        let table = latin_table();
        let sources: Vec<u16> = table.iter().map(|p| p.source).collect();
        let mut sorted = sources.clone();
        sorted.sort_unstable();
        assert_eq!(sources, sorted);
        assert_eq!((&table).into_iter().count(), table.len());
        assert_eq!(table.as_slice()[0], BestFitPair::new(0x00C0, 'A'));
    }
}
