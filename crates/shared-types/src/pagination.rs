//! # Cursor Pagination
//!
//! Page over key-sorted entries either by resuming from a key (`next_key` of a
//! previous page) or by skipping an offset. Callers pass entries in ascending
//! key order; `reverse` walks them from the end.

use crate::errors::PaginationError;
use serde::{Deserialize, Serialize};

/// Client-supplied page selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Resume from this key (inclusive). Mutually exclusive with `offset`.
    #[serde(default)]
    pub key: Vec<u8>,
    /// Number of entries to skip. Mutually exclusive with `key`.
    #[serde(default)]
    pub offset: u64,
    /// Maximum entries to return. Zero selects the default limit.
    #[serde(default)]
    pub limit: u64,
    /// Report the total entry count. Only honoured in offset mode.
    #[serde(default)]
    pub count_total: bool,
    /// Walk entries in descending key order.
    #[serde(default)]
    pub reverse: bool,
}

/// Cursor returned alongside a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Key of the first entry not returned, `None` on the last page.
    pub next_key: Option<Vec<u8>>,
    /// Total entry count when requested, otherwise zero.
    pub total: u64,
}

/// Default and maximum page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 100,
        }
    }
}

/// Select one page out of `entries`, which must be sorted by ascending key.
pub fn paginate<T>(
    entries: Vec<(Vec<u8>, T)>,
    request: Option<&PageRequest>,
    limits: PageLimits,
) -> Result<(Vec<T>, PageResponse), PaginationError> {
    let default_request = PageRequest::default();
    let request = request.unwrap_or(&default_request);

    if !request.key.is_empty() && request.offset > 0 {
        return Err(PaginationError::KeyAndOffset);
    }

    let mut count_total = request.count_total;
    let mut limit = request.limit;
    if limit == 0 {
        limit = limits.default_limit;
        count_total = true;
    }
    let limit = limit.min(limits.max_limit).max(1) as usize;

    let total_entries = entries.len() as u64;
    let mut ordered: Box<dyn Iterator<Item = (Vec<u8>, T)>> = if request.reverse {
        Box::new(entries.into_iter().rev())
    } else {
        Box::new(entries.into_iter())
    };

    if !request.key.is_empty() {
        let start = request.key.clone();
        let reverse = request.reverse;
        let mut remaining =
            ordered.skip_while(move |(key, _)| if reverse { *key > start } else { *key < start });

        let page: Vec<T> = remaining.by_ref().take(limit).map(|(_, value)| value).collect();
        let next_key = remaining.next().map(|(key, _)| key);
        return Ok((page, PageResponse { next_key, total: 0 }));
    }

    let offset = usize::try_from(request.offset).unwrap_or(usize::MAX);
    let page: Vec<T> = ordered
        .by_ref()
        .skip(offset)
        .take(limit)
        .map(|(_, value)| value)
        .collect();
    let next_key = ordered.next().map(|(key, _)| key);

    let total = if count_total { total_entries } else { 0 };
    Ok((page, PageResponse { next_key, total }))
}
