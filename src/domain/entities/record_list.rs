//! Read-through cache of the storage account contents.

use super::GifRecord;

/// Locally known state of the remote record list.
///
/// Always replaced wholesale from a fetch result; never edited in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecordList {
    /// No fetch has resolved yet.
    #[default]
    NotLoaded,
    /// The storage account does not exist yet.
    Uninitialized,
    /// The last read failed for a reason other than a missing account.
    Unavailable {
        /// Human-readable failure reason.
        reason: String,
    },
    /// Records in program order.
    Loaded(Vec<GifRecord>),
}

impl RecordList {
    /// Returns loaded records, if any.
    #[must_use]
    pub fn records(&self) -> Option<&[GifRecord]> {
        match self {
            Self::Loaded(records) => Some(records),
            _ => None,
        }
    }

    /// Returns whether this is the uninitialized marker.
    #[must_use]
    pub const fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// Returns number of loaded records (zero for markers).
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().map_or(0, <[GifRecord]>::len)
    }

    /// Returns whether no records are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Pubkey;

    #[test]
    fn test_uninitialized_is_distinct_from_empty() {
        assert_ne!(RecordList::Uninitialized, RecordList::Loaded(Vec::new()));
        assert!(RecordList::Uninitialized.records().is_none());
        assert_eq!(RecordList::Loaded(Vec::new()).records(), Some(&[][..]));
    }

    #[test]
    fn test_len_counts_loaded_records_only() {
        let list = RecordList::Loaded(vec![
            GifRecord::new("a", 0, Pubkey::default()),
            GifRecord::new("b", 2, Pubkey::default()),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(RecordList::Uninitialized.len(), 0);
        assert!(RecordList::NotLoaded.is_empty());
    }
}
