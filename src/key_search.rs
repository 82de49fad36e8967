use std::cmp::Ordering;
use std::ops::Bound;

use crate::Compare;

/// search `k` in sorted `entries`, comparing keys only.
/// Returns `Ok(idx)` on a match, `Err(insert_idx)` otherwise, same as `slice::binary_search`
pub(crate) fn binary_search_by<K, V, C: Compare<K>>(
    entries: &[(K, V)],
    k: &K,
    cmp: &C,
) -> Result<usize, usize> {
    // half open [low, high) so empty slices need no special case
    let mut low = 0;
    let mut high = entries.len();

    while low < high {
        let median = low + (high - low) / 2;

        match cmp.compare(k, &entries[median].0) {
            Ordering::Equal => return Ok(median),
            Ordering::Greater => low = median + 1,
            Ordering::Less => high = median,
        }
    }

    Err(low)
}

/// First index whose key is inside the range start `bound`
pub(crate) fn lower_bound<K, V, C: Compare<K>>(
    entries: &[(K, V)],
    bound: Bound<&K>,
    cmp: &C,
) -> usize {
    match bound {
        Bound::Unbounded => 0,
        Bound::Included(k) => match binary_search_by(entries, k, cmp) {
            Ok(idx) | Err(idx) => idx,
        },
        Bound::Excluded(k) => match binary_search_by(entries, k, cmp) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        },
    }
}

/// One past the last index whose key is inside the range end `bound`
pub(crate) fn upper_bound<K, V, C: Compare<K>>(
    entries: &[(K, V)],
    bound: Bound<&K>,
    cmp: &C,
) -> usize {
    match bound {
        Bound::Unbounded => entries.len(),
        Bound::Included(k) => match binary_search_by(entries, k, cmp) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        },
        Bound::Excluded(k) => match binary_search_by(entries, k, cmp) {
            Ok(idx) | Err(idx) => idx,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Natural, Reverse};

    #[test]
    fn test_binary_search() {
        let mut entries = Vec::new();
        for i in 0..64u32 {
            entries.push(((i + 1) * 2, ()));
        }

        let s = |k: u32| binary_search_by(&entries, &k, &Natural);
        assert_eq!(s(1), Err(0));
        assert_eq!(s(2), Ok(0));
        assert_eq!(s(3), Err(1));
        assert_eq!(s(4), Ok(1));
        assert_eq!(s(5), Err(2));
        assert_eq!(s(6), Ok(2));
        assert_eq!(s(7), Err(3));
        assert_eq!(s(8), Ok(3));
        assert_eq!(s(9), Err(4));
        assert_eq!(s(10), Ok(4));
        assert_eq!(s(128), Ok(63));
        assert_eq!(s(129), Err(64));
        assert_eq!(s(130), Err(64));
    }

    #[test]
    fn test_binary_search_empty() {
        let entries: Vec<(i32, ())> = vec![];
        assert_eq!(binary_search_by(&entries, &1, &Natural), Err(0));
        assert_eq!(lower_bound(&entries, Bound::Included(&1), &Natural), 0);
        assert_eq!(upper_bound(&entries, Bound::Included(&1), &Natural), 0);
    }

    #[test]
    fn test_binary_search_agrees_with_std() {
        let entries = (0..100).map(|i| (i * 3, i)).collect::<Vec<_>>();
        let keys = entries.iter().map(|e| e.0).collect::<Vec<_>>();

        for k in -2..305 {
            assert_eq!(
                binary_search_by(&entries, &k, &Natural),
                keys.binary_search(&k),
                "key {k}"
            );
        }
    }

    #[test]
    fn test_binary_search_custom_order() {
        let entries = vec![(9, ()), (7, ()), (3, ()), (1, ())];
        let cmp = Reverse(Natural);

        assert_eq!(binary_search_by(&entries, &7, &cmp), Ok(1));
        assert_eq!(binary_search_by(&entries, &8, &cmp), Err(1));
        assert_eq!(binary_search_by(&entries, &0, &cmp), Err(4));
        assert_eq!(binary_search_by(&entries, &10, &cmp), Err(0));
    }

    #[test]
    fn test_bounds() {
        let entries = vec![(1, ()), (3, ()), (5, ()), (7, ())];

        assert_eq!(lower_bound(&entries, Bound::Unbounded, &Natural), 0);
        assert_eq!(lower_bound(&entries, Bound::Included(&3), &Natural), 1);
        assert_eq!(lower_bound(&entries, Bound::Excluded(&3), &Natural), 2);
        assert_eq!(lower_bound(&entries, Bound::Included(&4), &Natural), 2);
        assert_eq!(lower_bound(&entries, Bound::Excluded(&4), &Natural), 2);

        assert_eq!(upper_bound(&entries, Bound::Unbounded, &Natural), 4);
        assert_eq!(upper_bound(&entries, Bound::Included(&5), &Natural), 3);
        assert_eq!(upper_bound(&entries, Bound::Excluded(&5), &Natural), 2);
        assert_eq!(upper_bound(&entries, Bound::Included(&6), &Natural), 3);
        assert_eq!(upper_bound(&entries, Bound::Excluded(&8), &Natural), 4);
    }
}
