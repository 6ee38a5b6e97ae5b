//! Ordered-unique container with a caller-supplied key extractor
//!
//! Canonical sets of types (implements sets, the implemented-by mapping) are
//! held as sorted, de-duplicated vectors. Compared to a tree map this keeps
//! iteration order explicit, makes membership a binary search, and supports a
//! stable O(n+m) merge of two sets.

/// A vector kept sorted and unique by an extracted key.
///
/// The key extractor is a plain function pointer supplied at construction;
/// two containers built with the same extractor can be merged. Duplicate keys
/// keep the element that was already present.
#[derive(Clone)]
pub struct SortedUniqueVec<K, V>
where
    K: Ord,
{
    items: Vec<V>,
    key: fn(&V) -> K,
}

impl<K, V> SortedUniqueVec<K, V>
where
    K: Ord,
{
    /// Create an empty container with the given key extractor
    #[inline]
    pub fn new(key: fn(&V) -> K) -> Self {
        Self {
            items: Vec::new(),
            key,
        }
    }

    /// Build from an arbitrary vector, sorting and de-duplicating by key
    pub fn from_vec(key: fn(&V) -> K, mut items: Vec<V>) -> Self {
        items.sort_by(|a, b| key(a).cmp(&key(b)));
        items.dedup_by(|a, b| key(a) == key(b));
        Self { items, key }
    }

    /// Insert one element, keeping order; no-op if the key is already present
    pub fn add(&mut self, item: V) {
        let k = (self.key)(&item);
        match self.items.binary_search_by(|v| (self.key)(v).cmp(&k)) {
            Ok(_) => {}
            Err(pos) => self.items.insert(pos, item),
        }
    }

    /// Membership test by key
    #[inline]
    pub fn contains(&self, k: &K) -> bool {
        self.get(k).is_some()
    }

    /// Find an element by key
    pub fn get(&self, k: &K) -> Option<&V> {
        self.items
            .binary_search_by(|v| (self.key)(v).cmp(k))
            .ok()
            .map(|pos| &self.items[pos])
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all elements
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Merge another container into this one.
    ///
    /// Stable O(n+m): the result is the ascending, de-duplicated union of both
    /// inputs, with this container's element winning on duplicate keys.
    /// Merging a container with (a clone of) itself is a no-op.
    pub fn merge(&mut self, other: &Self)
    where
        V: Clone,
    {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.items = other.items.clone();
            return;
        }

        let mut merged = Vec::with_capacity(self.items.len() + other.items.len());
        let mut left = self.items.iter();
        let mut right = other.items.iter();
        let mut a = left.next();
        let mut b = right.next();

        while let (Some(x), Some(y)) = (a, b) {
            match (self.key)(x).cmp(&(self.key)(y)) {
                std::cmp::Ordering::Less => {
                    merged.push(x.clone());
                    a = left.next();
                }
                std::cmp::Ordering::Greater => {
                    merged.push(y.clone());
                    b = right.next();
                }
                std::cmp::Ordering::Equal => {
                    merged.push(x.clone());
                    a = left.next();
                    b = right.next();
                }
            }
        }
        while let Some(x) = a {
            merged.push(x.clone());
            a = left.next();
        }
        while let Some(y) = b {
            merged.push(y.clone());
            b = right.next();
        }

        self.items = merged;
    }

    /// The underlying ascending slice
    #[inline]
    pub fn content(&self) -> &[V] {
        &self.items
    }

    /// Iterate in ascending key order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.items.iter()
    }
}

impl<K, V> PartialEq for SortedUniqueVec<K, V>
where
    K: Ord,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<K, V> Eq for SortedUniqueVec<K, V>
where
    K: Ord,
    V: Eq,
{
}

impl<K, V> std::fmt::Debug for SortedUniqueVec<K, V>
where
    K: Ord,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a SortedUniqueVec<K, V>
where
    K: Ord,
{
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(v: &i32) -> i32 {
        *v
    }

    fn suv(items: Vec<i32>) -> SortedUniqueVec<i32, i32> {
        SortedUniqueVec::from_vec(identity, items)
    }

    #[test]
    fn test_empty_after_default_construction() {
        let data: SortedUniqueVec<i32, i32> = SortedUniqueVec::new(identity);
        assert!(data.is_empty());
        assert_eq!(data.len(), 0);
        assert_eq!(data.content(), &[] as &[i32]);
    }

    #[test]
    fn test_empty_after_clear() {
        let mut data = suv(vec![1, 4, 5, 2]);
        assert!(!data.is_empty());
        assert_eq!(data.len(), 4);

        data.clear();
        assert!(data.is_empty());
        assert_eq!(data.len(), 0);
    }

    #[test]
    fn test_from_unique_vector() {
        let data = suv(vec![1, 4, 5, 2]);
        assert_eq!(data.content(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_from_non_unique_vector() {
        let data = suv(vec![1, 4, 5, 2, 1, 4, 5, 2]);
        assert_eq!(data.content(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_from_sorted_non_unique_vector() {
        let data = suv(vec![1, 1, 2, 2, 4, 4, 5, 5]);
        assert_eq!(data.content(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_add_below_minimum() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.add(0);
        assert_eq!(data.content(), &[0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_add_existing_minimum_is_noop() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.add(1);
        assert_eq!(data.content(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_add_interior() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.add(3);
        assert_eq!(data.content(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_add_existing_maximum_is_noop() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.add(5);
        assert_eq!(data.content(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_add_above_maximum() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.add(6);
        assert_eq!(data.content(), &[1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_merge_self_is_noop() {
        let mut data = suv(vec![1, 2, 4, 5]);
        let copy = data.clone();
        data.merge(&copy);
        assert_eq!(data.content(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_merge_lesser_elements() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.merge(&suv(vec![0, -1, -2]));
        assert_eq!(data.content(), &[-2, -1, 0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_merge_lesser_or_equal_elements() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.merge(&suv(vec![1, 0, -1, -2]));
        assert_eq!(data.content(), &[-2, -1, 0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_merge_interleaved_elements() {
        let mut data = suv(vec![0, 5, 10, 1, 3, 2]);
        data.merge(&suv(vec![-1, 17, 2, 3, 4, 5]));
        assert_eq!(data.content(), &[-1, 0, 1, 2, 3, 4, 5, 10, 17]);
    }

    #[test]
    fn test_merge_disjoint_interleaved_elements() {
        let mut data = suv(vec![0, 5, 10, 1, 3, 2]);
        data.merge(&suv(vec![-1, 17, 4]));
        assert_eq!(data.content(), &[-1, 0, 1, 2, 3, 4, 5, 10, 17]);
    }

    #[test]
    fn test_merge_greater_or_equal_elements() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.merge(&suv(vec![7, 5, 6]));
        assert_eq!(data.content(), &[1, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn test_merge_greater_elements() {
        let mut data = suv(vec![1, 2, 4, 5]);
        data.merge(&suv(vec![7, 8, 6]));
        assert_eq!(data.content(), &[1, 2, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_get_and_contains() {
        let data = suv(vec![3, 1, 2]);
        assert!(data.contains(&2));
        assert!(!data.contains(&4));
        assert_eq!(data.get(&3), Some(&3));
        assert_eq!(data.get(&0), None);
    }
}
