use std::cmp::Ordering;

/// Total order over keys. The map sorts and searches with the same
/// comparator, so the two can never disagree.
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Natural ordering, delegates to `Ord`
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Flips the wrapped comparator.
///
/// # Examples
/// ```rust
/// use lazy_sorted_map::{LazySortedMap, Natural, Reverse};
///
/// let mut map = LazySortedMap::with_comparator(Reverse(Natural));
/// map.insert(1, "a");
/// map.insert(3, "c");
/// map.insert(2, "b");
///
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
/// ```
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reverse<C>(pub C);

impl<K: ?Sized, C: Compare<K>> Compare<K> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}
