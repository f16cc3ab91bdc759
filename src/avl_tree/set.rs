use crate::avl_tree::node::Node;
use crate::avl_tree::tree::{self, Tree};
use crate::error::{Error, Result};
use log::debug;

/// An ordered set of `i32` keys implemented using a recursive avl tree.
///
/// Insertion and removal recurse down to the affected leaf and rebalance every node on the way
/// back up, so each call returns the possibly rotated root of the subtree it was given.
///
/// # Examples
///
/// ```
/// use balanced_trees::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.min(), Some(0));
///
/// assert!(set.remove(0));
/// assert!(!set.remove(1));
/// ```
pub struct AvlSet {
    tree: Tree,
    len: usize,
}

impl AvlSet {
    /// Constructs a new, empty `AvlSet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let set = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlSet { tree: None, len: 0 }
    }

    /// Inserts a key into the set. Returns `false` if the key already exists, in which case the
    /// set is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: i32) -> bool {
        let inserted = tree::insert(&mut self.tree, key);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a key from the set. Returns `false` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(set.remove(1));
    /// assert!(!set.remove(1));
    /// ```
    pub fn remove(&mut self, key: i32) -> bool {
        let removed = tree::remove(&mut self.tree, key);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: i32) -> bool {
        tree::contains(&self.tree, key)
    }

    /// Returns the height of the tree. An empty set has height 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let set: AvlSet = (1..=3).collect();
    /// assert_eq!(set.height(), 2);
    /// ```
    pub fn height(&self) -> usize {
        tree::height(&self.tree)
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Clears the set, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.height(), 0);
    /// ```
    pub fn clear(&mut self) {
        let count = tree::dispose(&mut self.tree);
        debug!("Cleared avl set of {} nodes.", count);
        self.len = 0;
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<i32> {
        tree::min(&self.tree)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<i32> {
        tree::max(&self.tree)
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(3);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(1));
    /// assert_eq!(iterator.next(), Some(3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter {
        let mut iter = AvlSetIter { stack: Vec::new() };
        iter.push_left_spine(&self.tree);
        iter
    }

    /// Checks every avl invariant and that the tracked length matches the tree.
    pub fn validate(&self) -> Result<()> {
        let mut count = 0;
        tree::validate(&self.tree, None, None, &mut count)?;
        if count != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: count,
            });
        }
        Ok(())
    }
}

impl Drop for AvlSet {
    fn drop(&mut self) {
        tree::dispose(&mut self.tree);
    }
}

impl_ordered_set!(AvlSet, AvlSetIter);

/// An iterator for `AvlSet`.
///
/// This iterator traverses the keys of the set in-order.
pub struct AvlSetIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> AvlSetIter<'a> {
    fn push_left_spine(&mut self, mut tree: &'a Tree) {
        while let Some(node) = tree {
            self.stack.push(node);
            tree = &node.left;
        }
    }
}

impl<'a> Iterator for AvlSetIter<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(&node.right);
        Some(node.key)
    }
}
