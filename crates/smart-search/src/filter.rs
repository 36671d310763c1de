//! Filter engine: matching, identity deduplication and result capping

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::matcher::matches_folded;
use crate::record::{FieldPath, Record};

/// Maximum number of results to keep
///
/// Built from a raw signed value: anything `<= 0` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct ResultCap(Option<usize>);

impl ResultCap {
    pub const UNBOUNDED: ResultCap = ResultCap(None);

    pub fn from_raw(raw: i64) -> Self {
        if raw > 0 {
            Self(usize::try_from(raw).ok())
        } else {
            Self::UNBOUNDED
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.0
    }

    pub fn is_bounded(&self) -> bool {
        self.0.is_some()
    }
}

impl From<i64> for ResultCap {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<ResultCap> for i64 {
    fn from(cap: ResultCap) -> Self {
        cap.0
            .and_then(|limit| i64::try_from(limit).ok())
            .unwrap_or(0)
    }
}

/// Filter `collection` down to the records matching `query`
///
/// Output preserves collection order, contains each record (by identity) at
/// most once and holds at most `cap` entries. An empty query yields no
/// results.
pub fn filter(
    collection: &[Record],
    field_paths: &[FieldPath],
    query: &str,
    cap: ResultCap,
) -> Vec<Record> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let limit = cap.limit().unwrap_or(usize::MAX);
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for record in collection {
        if results.len() >= limit {
            break;
        }
        if !matches_folded(record, field_paths, &needle) {
            continue;
        }
        if seen.insert(record.identity()) {
            results.push(record.clone());
        }
    }

    results
}
