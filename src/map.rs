use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeBounds;

use crate::{
    key_search::{binary_search_by, lower_bound, upper_bound},
    Compare, LazyMapError, Natural,
};

/// Ordered map backed by a single `Vec<(K, V)>` which is only sorted when a read needs the order.
///
/// Insertion is an O(1) append. The first ordered read after an out of order insert
/// pays one O(n log n) sort, after that lookups are O(log n) binary searches.
/// Appends that keep keys strictly ascending never make the map dirty, so
/// ordered bulk loads never sort at all.
///
/// Every ordered read takes `&mut self`, since it may sort the storage first.
/// Iterators borrow the map, so it can't be modified while one is alive.
///
/// # Duplicate keys
/// `insert` never checks for an existing key. The deferred sort is stable and
/// collapses equal keys afterwards, keeping the most recently inserted entry.
/// `len` counts stored entries, so it only drops once a read has collapsed them.
///
/// # Example
/// ```rust
/// use lazy_sorted_map::LazySortedMap;
///
/// let mut map = LazySortedMap::new();
/// map.insert(3, "c");
/// map.insert(1, "a");
/// map.insert(2, "b");
/// assert!(!map.is_sorted());
///
/// // first ordered read sorts
/// let kvs = map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
/// assert_eq!(kvs, vec![(1, "a"), (2, "b"), (3, "c")]);
/// assert!(map.is_sorted());
///
/// // update replaces in place
/// assert_eq!(map.update(&2, "B"), Ok("b"));
/// assert_eq!(map.get(&2), Some(&"B"));
///
/// assert!(map.remove(&1));
/// assert!(!map.contains_key(&1));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Clone)]
pub struct LazySortedMap<K, V, C = Natural> {
    entries: Vec<(K, V)>,
    /// true when `entries` is sorted by key and free of duplicates
    sorted: bool,
    cmp: C,
    st: Statistic,
}

impl<K: Ord, V> LazySortedMap<K, V> {
    /// Create an empty map ordered by `K: Ord`
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let map = LazySortedMap::<i32, i32>::new();
    ///
    /// assert!(map.is_empty());
    /// assert!(map.is_sorted());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Create an empty map able to hold `capacity` entries without reallocating
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C: Default> Default for LazySortedMap<K, V, C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            sorted: true,
            cmp: C::default(),
            st: Statistic::default(),
        }
    }
}

impl<K, V, C: Compare<K>> LazySortedMap<K, V, C> {
    /// Create an empty map ordered by `cmp`
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = LazySortedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    /// map.insert(1, ());
    /// map.insert(2, ());
    ///
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 1]);
    /// ```
    #[inline]
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(0, cmp)
    }

    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            sorted: true,
            cmp,
            st: Statistic::default(),
        }
    }

    /// Create a map ordered by `cmp` holding `entries`. Entries go through `insert`,
    /// so an already ascending input stays sorted.
    pub fn from_entries_with_comparator<I>(entries: I, cmp: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut me = Self::with_comparator(cmp);
        me.extend(entries);
        me
    }

    /// Returns the number of stored entries, in any state. O(1)
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns true if the storage is currently sorted, i.e. the next read won't sort
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn statistic(&self) -> &Statistic {
        &self.st
    }

    /// Append a key-value pair. O(1) amortized, never sorts and never fails.
    ///
    /// The map stays sorted only if it was sorted and `k` is strictly greater than
    /// the current last key. An equal key makes it dirty so the next sort collapses it.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert(1, 2);
    /// map.insert(2, 4);
    /// assert!(map.is_sorted());
    ///
    /// map.insert(0, 0);
    /// assert!(!map.is_sorted());
    /// assert_eq!(map.len(), 3);
    /// ```
    pub fn insert(&mut self, k: K, v: V) {
        let in_order = match self.entries.last() {
            Some((last, _)) => self.cmp.compare(&k, last) == Ordering::Greater,
            None => true,
        };

        if in_order {
            self.st.sorted_appends += 1;
        } else {
            self.st.unsorted_appends += 1;
        }

        self.sorted &= in_order;
        self.entries.push((k, v));
    }

    /// Sort the storage now if it is dirty, instead of on the next read. Idempotent.
    pub fn ensure_sorted(&mut self) {
        if self.sorted {
            return;
        }

        let cmp = &self.cmp;
        // stable, so among equal keys the latest insert ends up last
        self.entries.sort_by(|a, b| cmp.compare(&a.0, &b.0));

        let before = self.entries.len();
        self.entries.dedup_by(|later, kept| {
            if cmp.compare(&later.0, &kept.0) == Ordering::Equal {
                std::mem::swap(later, kept);
                true
            } else {
                false
            }
        });

        self.st.sorts += 1;
        self.st.collapsed_duplicates += (before - self.entries.len()) as u64;
        self.sorted = true;
    }

    /// Only valid on sorted storage
    #[inline]
    fn search(&self, k: &K) -> Result<usize, usize> {
        debug_assert!(self.sorted);
        binary_search_by(&self.entries, k, &self.cmp)
    }

    /// Returns a reference to the value for `k`, sorting first if needed.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert(1, 2);
    ///
    /// assert_eq!(map.get(&1), Some(&2));
    /// assert!(map.get(&2).is_none());
    /// ```
    pub fn get(&mut self, k: &K) -> Option<&V> {
        self.get_key_value(k).map(|(_, v)| v)
    }

    pub fn get_key_value(&mut self, k: &K) -> Option<(&K, &V)> {
        self.ensure_sorted();
        let idx = self.search(k).ok()?;
        let (k, v) = &self.entries[idx];
        Some((k, v))
    }

    /// Returns a mut reference to the value for `k`. Changing a value never
    /// affects the order.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert(1, 2);
    /// *map.get_mut(&1).unwrap() += 1;
    /// assert_eq!(map.get(&1), Some(&3));
    /// ```
    pub fn get_mut(&mut self, k: &K) -> Option<&mut V> {
        self.ensure_sorted();
        let idx = self.search(k).ok()?;
        Some(&mut self.entries[idx].1)
    }

    /// Like `get`, but a missing key is an error.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::{LazyMapError, LazySortedMap};
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert("a", 1);
    ///
    /// assert_eq!(map.value_of(&"a"), Ok(&1));
    /// assert_eq!(map.value_of(&"b"), Err(LazyMapError::KeyNotFound));
    /// ```
    pub fn value_of(&mut self, k: &K) -> Result<&V, LazyMapError> {
        self.get(k).ok_or(LazyMapError::KeyNotFound)
    }

    /// Replace the value of an existing key, returning the previous value.
    /// The key must already be present, the map is left untouched otherwise.
    pub fn update(&mut self, k: &K, v: V) -> Result<V, LazyMapError> {
        let slot = self.get_mut(k).ok_or(LazyMapError::KeyNotFound)?;
        Ok(std::mem::replace(slot, v))
    }

    pub fn contains_key(&mut self, k: &K) -> bool {
        self.ensure_sorted();
        self.search(k).is_ok()
    }

    /// Remove `k`. Returns false and changes nothing if it is absent.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert(1, 2);
    ///
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&2));
    /// ```
    pub fn remove(&mut self, k: &K) -> bool {
        self.remove_entry(k).is_some()
    }

    /// Remove `k` and return the stored pair
    pub fn remove_entry(&mut self, k: &K) -> Option<(K, V)> {
        self.ensure_sorted();
        let idx = self.search(k).ok()?;
        // shifting the tail down keeps the storage sorted
        Some(self.entries.remove(idx))
    }

    /// Remove all entries. Capacity and statistic are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sorted = true;
    }

    /// Keep only the entries for which `f` returns true
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        // collapse first so a stale duplicate can't outlive the value shadowing it
        self.ensure_sorted();
        self.entries.retain_mut(|(k, v)| f(k, v));
    }

    /// Returns an iterator over the map in ascending key order.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert(2, 3);
    /// map.insert(1, 2);
    ///
    /// let kvs = map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
    /// assert_eq!(kvs, vec![(1, 2), (2, 3)]);
    /// ```
    pub fn iter(&mut self) -> iter::Iter<'_, K, V> {
        self.ensure_sorted();
        iter::Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&mut self) -> iter::Keys<'_, K, V> {
        self.ensure_sorted();
        iter::Keys {
            inner: self.entries.iter(),
        }
    }

    pub fn values(&mut self) -> iter::Values<'_, K, V> {
        self.ensure_sorted();
        iter::Values {
            inner: self.entries.iter(),
        }
    }

    pub fn values_mut(&mut self) -> iter::ValuesMut<'_, K, V> {
        self.ensure_sorted();
        iter::ValuesMut {
            inner: self.entries.iter_mut(),
        }
    }

    /// Returns an iterator over the entries inside `range`, in ascending key order.
    /// Both ends are located with a binary search. A range whose start lies past
    /// its end yields nothing.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::LazySortedMap;
    ///
    /// let mut map = (0..10).rev().map(|i| (i, i * 10)).collect::<LazySortedMap<_, _>>();
    ///
    /// let keys = map.range(3..6).map(|(k, _)| *k).collect::<Vec<_>>();
    /// assert_eq!(keys, vec![3, 4, 5]);
    ///
    /// let keys = map.range(8..).map(|(k, _)| *k).collect::<Vec<_>>();
    /// assert_eq!(keys, vec![8, 9]);
    /// ```
    pub fn range<R>(&mut self, range: R) -> iter::Iter<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        self.ensure_sorted();
        let start = lower_bound(&self.entries, range.start_bound(), &self.cmp);
        let end = upper_bound(&self.entries, range.end_bound(), &self.cmp);

        let slice = if start < end {
            &self.entries[start..end]
        } else {
            &self.entries[..0]
        };

        iter::Iter {
            inner: slice.iter(),
        }
    }

    pub fn first_key_value(&mut self) -> Option<(&K, &V)> {
        self.ensure_sorted();
        self.entries.first().map(|(k, v)| (k, v))
    }

    pub fn last_key_value(&mut self) -> Option<(&K, &V)> {
        self.ensure_sorted();
        self.entries.last().map(|(k, v)| (k, v))
    }

    /// Remove and return the entry with the smallest key. O(n), the tail shifts down.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.ensure_sorted();
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries.remove(0))
        }
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.ensure_sorted();
        self.entries.pop()
    }

    /// Clone all entries, in ascending key order, into `dest` starting at `offset`.
    /// Fails without writing anything if `dest` can't hold them.
    ///
    /// # Examples
    /// ```rust
    /// use lazy_sorted_map::{LazyMapError, LazySortedMap};
    ///
    /// let mut map = LazySortedMap::new();
    /// map.insert(2, 'b');
    /// map.insert(1, 'a');
    ///
    /// let mut dest = [(0, ' '); 3];
    /// map.copy_to(&mut dest, 1).unwrap();
    /// assert_eq!(dest, [(0, ' '), (1, 'a'), (2, 'b')]);
    ///
    /// assert_eq!(
    ///     map.copy_to(&mut dest, 2),
    ///     Err(LazyMapError::DestinationTooSmall { needed: 2, available: 1 })
    /// );
    /// ```
    pub fn copy_to(&mut self, dest: &mut [(K, V)], offset: usize) -> Result<(), LazyMapError>
    where
        K: Clone,
        V: Clone,
    {
        self.ensure_sorted();

        let needed = self.entries.len();
        let available = dest.len().saturating_sub(offset);
        if offset > dest.len() || available < needed {
            return Err(LazyMapError::DestinationTooSmall { needed, available });
        }

        dest[offset..offset + needed].clone_from_slice(&self.entries);
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for LazySortedMap<K, V, C> {
    /// Prints storage as is, which is insertion biased while dirty
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySortedMap")
            .field("sorted", &self.sorted)
            .field("entries", &self.entries)
            .finish()
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for LazySortedMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.entries.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for LazySortedMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries_with_comparator(iter, C::default())
    }
}

impl<'a, K, V, C: Compare<K>> IntoIterator for &'a mut LazySortedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = iter::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C: Compare<K>> IntoIterator for LazySortedMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = iter::IntoIter<K, V>;

    /// Sorts if needed, then yields owned entries in ascending key order
    fn into_iter(mut self) -> Self::IntoIter {
        self.ensure_sorted();
        iter::IntoIter {
            inner: self.entries.into_iter(),
        }
    }
}

/// Statistic data used to guide the perf tuning
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Statistic {
    /// full sorts performed by reads or `ensure_sorted`
    pub sorts: u64,
    /// inserts which kept a sorted map sorted
    pub sorted_appends: u64,
    pub unsorted_appends: u64,
    /// entries dropped by sorts because a later insert used the same key
    pub collapsed_duplicates: u64,
}

pub mod iter {
    use std::iter::FusedIterator;
    use std::slice;
    use std::vec;

    /// Borrowed iterator over `(&K, &V)` in ascending key order
    pub struct Iter<'a, K, V> {
        pub(super) inner: slice::Iter<'a, (K, V)>,
    }

    impl<'a, K, V> Clone for Iter<'a, K, V> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<'a, K, V> Iterator for Iter<'a, K, V> {
        type Item = (&'a K, &'a V);

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }

        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next().map(|(k, v)| (k, v))
        }
    }

    impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
        fn next_back(&mut self) -> Option<Self::Item> {
            self.inner.next_back().map(|(k, v)| (k, v))
        }
    }

    impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
    impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

    pub struct Keys<'a, K, V> {
        pub(super) inner: slice::Iter<'a, (K, V)>,
    }

    impl<'a, K, V> Clone for Keys<'a, K, V> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<'a, K, V> Iterator for Keys<'a, K, V> {
        type Item = &'a K;

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }

        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next().map(|(k, _)| k)
        }
    }

    impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
        fn next_back(&mut self) -> Option<Self::Item> {
            self.inner.next_back().map(|(k, _)| k)
        }
    }

    impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}
    impl<'a, K, V> FusedIterator for Keys<'a, K, V> {}

    pub struct Values<'a, K, V> {
        pub(super) inner: slice::Iter<'a, (K, V)>,
    }

    impl<'a, K, V> Clone for Values<'a, K, V> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<'a, K, V> Iterator for Values<'a, K, V> {
        type Item = &'a V;

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }

        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next().map(|(_, v)| v)
        }
    }

    impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
        fn next_back(&mut self) -> Option<Self::Item> {
            self.inner.next_back().map(|(_, v)| v)
        }
    }

    impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}
    impl<'a, K, V> FusedIterator for Values<'a, K, V> {}

    pub struct ValuesMut<'a, K, V> {
        pub(super) inner: slice::IterMut<'a, (K, V)>,
    }

    impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
        type Item = &'a mut V;

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }

        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next().map(|(_, v)| v)
        }
    }

    impl<'a, K, V> DoubleEndedIterator for ValuesMut<'a, K, V> {
        fn next_back(&mut self) -> Option<Self::Item> {
            self.inner.next_back().map(|(_, v)| v)
        }
    }

    impl<'a, K, V> ExactSizeIterator for ValuesMut<'a, K, V> {}
    impl<'a, K, V> FusedIterator for ValuesMut<'a, K, V> {}

    /// Owned iterator, ascending key order
    pub struct IntoIter<K, V> {
        pub(super) inner: vec::IntoIter<(K, V)>,
    }

    impl<K, V> Iterator for IntoIter<K, V> {
        type Item = (K, V);

        #[inline]
        fn size_hint(&self) -> (usize, Option<usize>) {
            self.inner.size_hint()
        }

        #[inline]
        fn next(&mut self) -> Option<Self::Item> {
            self.inner.next()
        }
    }

    impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
        fn next_back(&mut self) -> Option<Self::Item> {
            self.inner.next_back()
        }
    }

    impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
    impl<K, V> FusedIterator for IntoIter<K, V> {}
}
