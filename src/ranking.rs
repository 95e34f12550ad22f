use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// A summary with its 1-based position in a ranked list.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<T> {
    pub rank: usize,
    pub item: T,
}

/// Sort `items` with `cmp` and number them 1..N in final order.
///
/// The sort is stable, so equal keys keep their input order. Equal keys
/// still get distinct positions.
pub fn rank_by<T>(
    mut items: Vec<T>,
    mut cmp: impl FnMut(&T, &T) -> Ordering,
) -> Vec<RankedEntry<T>> {
    items.sort_by(|a, b| cmp(a, b));
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| RankedEntry {
            rank: idx + 1,
            item,
        })
        .collect()
}

/// Rank on a single key. Incomparable keys (NaN shares) count as equal.
pub fn rank_by_key<T, K: PartialOrd>(
    items: Vec<T>,
    key: impl Fn(&T) -> K,
    direction: SortDirection,
) -> Vec<RankedEntry<T>> {
    rank_by(items, |a, b| {
        direction.apply(key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal))
    })
}

pub fn top_n<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[..n.min(ranked.len())]
}

/// The last `n` entries of the full order, still in that order.
pub fn bottom_n<T>(ranked: &[T], n: usize) -> &[T] {
    &ranked[ranked.len().saturating_sub(n)..]
}
