use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

/// Partition `items` by `key`, keeping groups in first-seen order and items
/// in input order within each group.
pub fn partition_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match slots.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

/// Second phase of a group-by: turn each group into a summary.
pub fn fold_groups<K, T, S>(
    groups: Vec<(K, Vec<T>)>,
    mut build: impl FnMut(K, Vec<T>) -> S,
) -> Vec<S> {
    groups
        .into_iter()
        .map(|(key, items)| build(key, items))
        .collect()
}

/// Count items per key, first-seen order.
pub fn count_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    fold_groups(partition_by(items, key), |k, group| (k, group.len()))
}

/// Accumulators that can be combined in any order.
///
/// Implementations must be associative and commutative so partial results
/// from separate workers can be merged without changing the totals.
pub trait Merge {
    fn merge(&mut self, other: Self);
}

/// Combine two partial group-by maps. Keys present on both sides are merged,
/// the rest are moved across.
pub fn merge_maps<K, V>(mut left: HashMap<K, V>, right: HashMap<K, V>) -> HashMap<K, V>
where
    K: Eq + Hash,
    V: Merge,
{
    for (key, value) in right {
        match left.entry(key) {
            Entry::Occupied(mut slot) => slot.get_mut().merge(value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Sum(u32, u32);

    impl Merge for Sum {
        fn merge(&mut self, other: Self) {
            self.0 += other.0;
            self.1 += other.1;
        }
    }

    #[test]
    fn partition_keeps_first_seen_order() {
        let groups = partition_by(["b1", "a1", "b2", "c1", "a2"], |s| s.chars().next());
        let keys: Vec<_> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![Some('b'), Some('a'), Some('c')]);
        assert_eq!(groups[0].1, vec!["b1", "b2"]);
        assert_eq!(groups[1].1, vec!["a1", "a2"]);
    }

    #[test]
    fn partition_of_nothing_is_empty() {
        let groups = partition_by(Vec::<u32>::new(), |v| *v);
        assert!(groups.is_empty());
    }

    #[test]
    fn count_by_counts_each_group() {
        let counts = count_by([1, 2, 1, 1, 3], |v| *v);
        assert_eq!(counts, vec![(1, 3), (2, 1), (3, 1)]);
    }

    #[test]
    fn merge_maps_is_order_independent() {
        let a = HashMap::from([("x", Sum(1, 2)), ("y", Sum(3, 0))]);
        let b = HashMap::from([("y", Sum(1, 1)), ("z", Sum(5, 5))]);
        let ab = merge_maps(a.clone(), b.clone());
        let ba = merge_maps(b, a);
        assert_eq!(ab, ba);
        assert_eq!(ab["y"], Sum(4, 1));
        assert_eq!(ab.len(), 3);
    }
}
