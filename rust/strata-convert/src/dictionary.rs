//! Dictionary pages and the per-leaf decoded value cache.

use std::sync::Arc;

use strata_common::{Result, error::Error, verify_arg};

/// A dictionary page supplied by the decode engine.
///
/// Ids are dense in `[0, size)`.
pub trait Dictionary {
    /// Number of entries in the dictionary.
    fn size(&self) -> usize;

    /// Returns the raw bytes of entry `id`.
    fn decode_to_binary(&self, id: u32) -> Result<&[u8]>;

    /// Largest valid id, or `None` for an empty dictionary or one whose ids
    /// don't fit in `u32`.
    fn max_id(&self) -> Option<u32> {
        self.size()
            .checked_sub(1)
            .and_then(|id| u32::try_from(id).ok())
    }
}

/// An in-memory dictionary over owned byte entries.
#[derive(Debug, Clone, Default)]
pub struct PlainDictionary {
    entries: Vec<Vec<u8>>,
}

impl PlainDictionary {
    pub fn new(entries: Vec<Vec<u8>>) -> PlainDictionary {
        PlainDictionary { entries }
    }

    pub fn from_strs<'a>(entries: impl IntoIterator<Item = &'a str>) -> PlainDictionary {
        PlainDictionary {
            entries: entries.into_iter().map(|s| s.as_bytes().to_vec()).collect(),
        }
    }
}

impl Dictionary for PlainDictionary {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn decode_to_binary(&self, id: u32) -> Result<&[u8]> {
        self.entries
            .get(id as usize)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::invalid_arg("id", format!("{id} not in dictionary")))
    }
}

/// Decodes a UTF-8 byte sequence, replacing invalid sequences with U+FFFD.
pub(crate) fn decode_utf8(bytes: &[u8]) -> Arc<str> {
    Arc::from(String::from_utf8_lossy(bytes))
}

/// Strings of a dictionary page, decoded once and indexed by id.
#[derive(Debug, Clone)]
pub struct DictionaryTable {
    values: Vec<Arc<str>>,
}

impl DictionaryTable {
    /// Decodes every entry of `dictionary` in `[0, max_id]`.
    pub fn decode(dictionary: &dyn Dictionary) -> Result<DictionaryTable> {
        let size = dictionary.size();
        verify_arg!(dictionary, u32::try_from(size.saturating_sub(1)).is_ok());
        let values = match dictionary.max_id() {
            Some(max_id) => (0..=max_id)
                .map(|id| dictionary.decode_to_binary(id).map(decode_utf8))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        log::trace!("decoded dictionary of {} strings", values.len());
        Ok(DictionaryTable { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the cached string for `id`.
    pub fn get(&self, id: u32) -> Result<Arc<str>> {
        let len = self.values.len();
        verify_arg!(id, (id as usize) < len);
        Ok(self.values[id as usize].clone())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts decode calls to observe that each id is decoded once.
    struct CountingDictionary {
        inner: PlainDictionary,
        decodes: Cell<usize>,
    }

    impl Dictionary for CountingDictionary {
        fn size(&self) -> usize {
            self.inner.size()
        }

        fn decode_to_binary(&self, id: u32) -> Result<&[u8]> {
            self.decodes.set(self.decodes.get() + 1);
            self.inner.decode_to_binary(id)
        }
    }

    #[test]
    fn test_table_matches_raw_entries() {
        let dictionary = PlainDictionary::from_strs(["alpha", "", "γάμμα", "delta"]);
        let table = DictionaryTable::decode(&dictionary).unwrap();
        assert_eq!(table.len(), 4);
        for id in 0..=dictionary.max_id().unwrap() {
            let raw = std::str::from_utf8(dictionary.decode_to_binary(id).unwrap()).unwrap();
            assert_eq!(table.get(id).unwrap().as_ref(), raw);
        }
        assert!(table.get(4).is_err());
    }

    #[test]
    fn test_table_decodes_each_id_once() {
        let dictionary = CountingDictionary {
            inner: PlainDictionary::from_strs(["a", "b", "c"]),
            decodes: Cell::new(0),
        };
        let table = DictionaryTable::decode(&dictionary).unwrap();
        for _ in 0..10 {
            table.get(1).unwrap();
            table.get(2).unwrap();
        }
        assert_eq!(dictionary.decodes.get(), 3);
    }

    /// Reports a size without holding the entries.
    struct OversizedDictionary(usize);

    impl Dictionary for OversizedDictionary {
        fn size(&self) -> usize {
            self.0
        }

        fn decode_to_binary(&self, id: u32) -> Result<&[u8]> {
            Err(Error::invalid_arg("id", format!("{id} not materialized")))
        }
    }

    #[test]
    fn test_max_id_range() {
        assert_eq!(OversizedDictionary(1).max_id(), Some(0));
        if let Some(size) = (u32::MAX as usize).checked_add(1) {
            assert_eq!(OversizedDictionary(size).max_id(), Some(u32::MAX));
        }
        if let Some(size) = (u32::MAX as usize).checked_add(2) {
            let dictionary = OversizedDictionary(size);
            assert_eq!(dictionary.max_id(), None);
            assert!(DictionaryTable::decode(&dictionary).is_err());
        }
    }

    #[test]
    fn test_empty_dictionary() {
        let dictionary = PlainDictionary::default();
        assert_eq!(dictionary.max_id(), None);
        let table = DictionaryTable::decode(&dictionary).unwrap();
        assert!(table.is_empty());
        assert!(table.get(0).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dictionary = PlainDictionary::new(vec![vec![b'o', 0xff, b'k']]);
        let table = DictionaryTable::decode(&dictionary).unwrap();
        assert_eq!(table.get(0).unwrap().as_ref(), "o\u{fffd}k");
    }
}
