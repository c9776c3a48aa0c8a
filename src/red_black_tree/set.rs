use crate::red_black_tree::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
use crate::red_black_tree::{Error, Result};
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::result;

/// An ordered set of keys implemented using a red black tree.
///
/// Every key is stored at most once. Queries that need a present key or a non-empty tree return
/// an `Error` instead of panicking, and a failed query never changes the tree.
///
/// # Examples
///
/// ```
/// use ordered_tree::red_black_tree::{Error, OrderedTree};
///
/// let mut tree = OrderedTree::new();
/// tree.insert(10);
/// tree.insert(20);
/// tree.insert(30);
///
/// assert!(tree.search(&20));
/// assert_eq!(tree.minimum(), Ok(&10));
/// assert_eq!(tree.successor(&10), Ok(Some(&20)));
/// assert_eq!(tree.height(), 2);
///
/// assert_eq!(tree.delete(&20), Ok(20));
/// assert_eq!(tree.delete(&20), Err(Error::NotFound));
/// assert_eq!(tree.sorted_sequence().collect::<Vec<_>>(), vec![&10, &30]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct OrderedTree<T> {
    map: RedBlackMap<T, ()>,
}

impl<T> OrderedTree<T> {
    /// Constructs a new, empty `OrderedTree<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<u32> = OrderedTree::new();
    /// ```
    pub fn new() -> Self {
        OrderedTree {
            map: RedBlackMap::new(),
        }
    }

    /// Constructs a new, empty `OrderedTree<T>` with room for `capacity` keys before the node
    /// storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<u32> = OrderedTree::with_capacity(1024);
    /// assert!(tree.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedTree {
            map: RedBlackMap::with_capacity(capacity),
        }
    }

    /// Inserts a key into the tree. If an equal key is already present, it is replaced in place
    /// and returned, and the shape of the tree is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.insert(1), None);
    /// assert!(tree.search(&1));
    /// assert_eq!(tree.insert(1), Some(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> Option<T>
    where
        T: Ord,
    {
        self.map.insert(key, ()).map(|pair| pair.0)
    }

    /// Deletes a key from the tree and returns it. Returns `Err(Error::NotFound)` and leaves the
    /// tree unchanged if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::{Error, OrderedTree};
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1);
    /// assert_eq!(tree.delete(&1), Ok(1));
    /// assert_eq!(tree.delete(&1), Err(Error::NotFound));
    /// ```
    pub fn delete<V>(&mut self, key: &V) -> Result<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map
            .remove(key)
            .map(|pair| pair.0)
            .ok_or(Error::NotFound)
    }

    /// Checks if a key exists in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1);
    /// assert!(!tree.search(&0));
    /// assert!(tree.search(&1));
    /// ```
    pub fn search<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Returns the minimum key of the tree, or `Err(Error::EmptyTree)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::{Error, OrderedTree};
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.minimum(), Err(Error::EmptyTree));
    /// tree.insert(3);
    /// tree.insert(1);
    /// assert_eq!(tree.minimum(), Ok(&1));
    /// ```
    pub fn minimum(&self) -> Result<&T> {
        self.map.min().ok_or(Error::EmptyTree)
    }

    /// Returns the maximum key of the tree, or `Err(Error::EmptyTree)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::{Error, OrderedTree};
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.maximum(), Err(Error::EmptyTree));
    /// tree.insert(3);
    /// tree.insert(1);
    /// assert_eq!(tree.maximum(), Ok(&3));
    /// ```
    pub fn maximum(&self) -> Result<&T> {
        self.map.max().ok_or(Error::EmptyTree)
    }

    /// Returns the next larger key after a key of the tree. `Ok(None)` means the key is the
    /// maximum; `Err(Error::NotFound)` means the key is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::{Error, OrderedTree};
    ///
    /// let tree: OrderedTree<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(tree.successor(&1), Ok(Some(&3)));
    /// assert_eq!(tree.successor(&3), Ok(None));
    /// assert_eq!(tree.successor(&2), Err(Error::NotFound));
    /// ```
    pub fn successor<V>(&self, key: &V) -> Result<Option<&T>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.successor(key)
    }

    /// Returns the next smaller key before a key of the tree. `Ok(None)` means the key is the
    /// minimum; `Err(Error::NotFound)` means the key is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::{Error, OrderedTree};
    ///
    /// let tree: OrderedTree<u32> = vec![1, 3].into_iter().collect();
    /// assert_eq!(tree.predecessor(&3), Ok(Some(&1)));
    /// assert_eq!(tree.predecessor(&1), Ok(None));
    /// assert_eq!(tree.predecessor(&2), Err(Error::NotFound));
    /// ```
    pub fn predecessor<V>(&self, key: &V) -> Result<Option<&T>>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.map.predecessor(key)
    }

    /// Returns the keys of the tree in ascending order. The sequence is produced lazily and a new
    /// one can be started at any time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<u32> = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.sorted_sequence().collect::<Vec<_>>(), vec![&1, &2, &3]);
    /// ```
    pub fn sorted_sequence(&self) -> OrderedTreeIter<'_, T> {
        self.iter()
    }

    /// Returns the number of nodes on the longest path from the root to a missing child, or zero
    /// for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// assert_eq!(tree.height(), 0);
    /// tree.insert(10);
    /// tree.insert(20);
    /// tree.insert(30);
    /// assert_eq!(tree.height(), 2);
    /// ```
    pub fn height(&self) -> usize {
        self.map.height()
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the tree holds no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let tree: OrderedTree<u32> = OrderedTree::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every key from the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    /// tree.clear();
    /// assert_eq!(tree.is_empty(), true);
    /// assert_eq!(tree.minimum().is_err(), true);
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns an iterator over the tree. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::red_black_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(1);
    /// tree.insert(3);
    ///
    /// let mut iterator = tree.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> OrderedTreeIter<'_, T> {
        OrderedTreeIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T> IntoIterator for OrderedTree<T> {
    type IntoIter = OrderedTreeIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedTree<T>
where
    T: 'a,
{
    type IntoIter = OrderedTreeIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `OrderedTree<T>`.
///
/// This iterator traverses the elements of the tree in-order and yields owned keys.
pub struct OrderedTreeIntoIter<T> {
    map_iter: RedBlackMapIntoIter<T, ()>,
}

impl<T> Iterator for OrderedTreeIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }
}

/// An iterator for `OrderedTree<T>`.
///
/// This iterator traverses the elements of the tree in-order and yields immutable references.
pub struct OrderedTreeIter<'a, T> {
    map_iter: RedBlackMapIter<'a, T, ()>,
}

impl<'a, T> Iterator for OrderedTreeIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|pair| pair.0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.map_iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for OrderedTreeIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        self.map_iter.next_back().map(|pair| pair.0)
    }
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for OrderedTree<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = OrderedTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for OrderedTree<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> fmt::Debug for OrderedTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Serialize for OrderedTree<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for key in self {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

struct OrderedTreeVisitor<T> {
    marker: PhantomData<fn() -> OrderedTree<T>>,
}

impl<'de, T> Visitor<'de> for OrderedTreeVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = OrderedTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence of keys")
    }

    fn visit_seq<A>(self, mut access: A) -> result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut tree = OrderedTree::new();
        while let Some(key) = access.next_element()? {
            tree.insert(key);
        }
        Ok(tree)
    }
}

impl<'de, T> Deserialize<'de> for OrderedTree<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedTreeVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedTree;
    use crate::red_black_tree::Error;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let tree: OrderedTree<u32> = OrderedTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_tree_queries() {
        let tree: OrderedTree<u32> = OrderedTree::new();
        assert_eq!(tree.minimum(), Err(Error::EmptyTree));
        assert_eq!(tree.maximum(), Err(Error::EmptyTree));
        assert_eq!(tree.height(), 0);
        assert!(!tree.search(&5));
        assert_eq!(tree.successor(&5), Err(Error::NotFound));
        assert_eq!(tree.sorted_sequence().next(), None);
    }

    #[test]
    fn test_insert_replace() {
        let mut tree = OrderedTree::new();
        assert_eq!(tree.insert(1), None);
        assert_eq!(tree.insert(1), Some(1));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_delete() {
        let mut tree = OrderedTree::new();
        tree.insert(1);
        assert_eq!(tree.delete(&1), Ok(1));
        assert!(!tree.search(&1));
        assert_eq!(tree.delete(&1), Err(Error::NotFound));
    }

    #[test]
    fn test_delete_absent_key_leaves_tree_unchanged() {
        let mut tree: OrderedTree<u32> = vec![5, 3, 8, 1].into_iter().collect();
        let before = tree.clone();
        assert_eq!(tree.delete(&4), Err(Error::NotFound));
        assert_eq!(tree, before);
        assert_eq!(
            tree.sorted_sequence().collect::<Vec<&u32>>(),
            before.sorted_sequence().collect::<Vec<&u32>>(),
        );
    }

    #[test]
    fn test_minimum_maximum() {
        let tree: OrderedTree<u32> = vec![1, 3, 5].into_iter().collect();
        assert_eq!(tree.minimum(), Ok(&1));
        assert_eq!(tree.maximum(), Ok(&5));
    }

    #[test]
    fn test_sorted_sequence_is_restartable() {
        let tree: OrderedTree<u32> = vec![2, 7, 1].into_iter().collect();
        let mut first = tree.sorted_sequence();
        assert_eq!(first.next(), Some(&1));
        assert_eq!(
            tree.sorted_sequence().collect::<Vec<&u32>>(),
            vec![&1, &2, &7],
        );
        assert_eq!(first.collect::<Vec<&u32>>(), vec![&2, &7]);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let tree: OrderedTree<u32> = (1..8).collect();
        assert!(tree.height() <= 6);
        assert_eq!(
            tree.sorted_sequence().cloned().collect::<Vec<u32>>(),
            vec![1, 2, 3, 4, 5, 6, 7],
        );
    }

    #[test]
    fn test_into_iter() {
        let tree: OrderedTree<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!(tree.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter_rev() {
        let tree: OrderedTree<u32> = vec![1, 5, 3].into_iter().collect();
        assert_eq!(tree.iter().rev().collect::<Vec<&u32>>(), vec![&5, &3, &1]);
    }

    #[test]
    fn test_debug() {
        let tree: OrderedTree<u32> = vec![2, 1].into_iter().collect();
        assert_eq!(format!("{:?}", tree), "{1, 2}");
    }

    #[test]
    fn test_serde_tokens() {
        let tree: OrderedTree<u32> = vec![3, 1].into_iter().collect();
        assert_tokens(
            &tree,
            &[
                Token::Seq { len: Some(2) },
                Token::U32(1),
                Token::U32(3),
                Token::SeqEnd,
            ],
        );
    }
}
