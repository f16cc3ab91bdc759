use crate::arena::{Arena, NodeId};
use crate::error::{Error, Result};
use crate::red_black_tree::node::{Color, Node};
use log::{debug, trace};
use std::cmp::Ordering;
use std::mem;

/// An ordered set of `i32` keys implemented using a red black tree.
///
/// A red black tree is a self-balancing binary search tree where every node is colored red or
/// black, the root is black, no red node has a red child, and every path from a node down to a
/// missing child passes through the same number of black nodes. Nodes live in an `Arena` and keep
/// a link to their parent so that insertion and removal can repair the colors bottom-up.
///
/// # Examples
///
/// ```
/// use balanced_trees::red_black_tree::RedBlackSet;
///
/// let mut set = RedBlackSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.min(), Some(0));
///
/// assert!(set.remove(0));
/// assert!(!set.remove(1));
/// ```
pub struct RedBlackSet {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl RedBlackSet {
    /// Constructs a new, empty `RedBlackSet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let set = RedBlackSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        RedBlackSet {
            arena: Arena::new(),
            root: None,
        }
    }

    fn color(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.arena[id].color)
    }

    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = &mut self.arena[parent];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            },
        }
    }

    fn rotate_left(&mut self, id: NodeId) {
        let child = self.arena[id]
            .right
            .expect("Expected right child node to be `Some`.");

        let inner = self.arena[child].left;
        self.arena[id].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }

        let parent = self.arena[id].parent;
        self.arena[child].parent = parent;
        self.replace_child(parent, id, Some(child));

        self.arena[child].left = Some(id);
        self.arena[id].parent = Some(child);
    }

    fn rotate_right(&mut self, id: NodeId) {
        let child = self.arena[id]
            .left
            .expect("Expected left child node to be `Some`.");

        let inner = self.arena[child].right;
        self.arena[id].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(id);
        }

        let parent = self.arena[id].parent;
        self.arena[child].parent = parent;
        self.replace_child(parent, id, Some(child));

        self.arena[child].right = Some(id);
        self.arena[id].parent = Some(child);
    }

    fn insert_fixup(&mut self, mut id: NodeId) {
        loop {
            let parent = match self.arena[id].parent {
                Some(parent) if self.arena[parent].color == Color::Red => parent,
                _ => break,
            };
            let grandparent = self.arena[parent]
                .parent
                .expect("Expected red node to have a parent.");

            if self.arena[grandparent].left == Some(parent) {
                let uncle = self.arena[grandparent].right;
                if let Some(uncle) = uncle.filter(|uncle| self.arena[*uncle].color == Color::Red) {
                    trace!("Insert case 1 at {}.", self.arena[id].key);
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    id = grandparent;
                    continue;
                }

                if self.arena[parent].right == Some(id) {
                    trace!("Insert case 2 at {}.", self.arena[id].key);
                    id = parent;
                    self.rotate_left(id);
                }

                trace!("Insert case 3 at {}.", self.arena[id].key);
                let parent = self.arena[id]
                    .parent
                    .expect("Expected red node to have a parent.");
                self.arena[parent].color = Color::Black;
                self.arena[grandparent].color = Color::Red;
                self.rotate_right(grandparent);
            } else {
                let uncle = self.arena[grandparent].left;
                if let Some(uncle) = uncle.filter(|uncle| self.arena[*uncle].color == Color::Red) {
                    trace!("Insert case 1 at {}.", self.arena[id].key);
                    self.arena[parent].color = Color::Black;
                    self.arena[uncle].color = Color::Black;
                    self.arena[grandparent].color = Color::Red;
                    id = grandparent;
                    continue;
                }

                if self.arena[parent].left == Some(id) {
                    trace!("Insert case 2 at {}.", self.arena[id].key);
                    id = parent;
                    self.rotate_right(id);
                }

                trace!("Insert case 3 at {}.", self.arena[id].key);
                let parent = self.arena[id]
                    .parent
                    .expect("Expected red node to have a parent.");
                self.arena[parent].color = Color::Black;
                self.arena[grandparent].color = Color::Red;
                self.rotate_left(grandparent);
            }
        }

        if let Some(root) = self.root {
            self.arena[root].color = Color::Black;
        }
    }

    // `id` took the place of a removed black node and carries an extra black. It may be `None`,
    // so its parent is tracked separately.
    fn remove_fixup(&mut self, mut id: Option<NodeId>, mut parent: Option<NodeId>) {
        while id != self.root && self.color(id) == Color::Black {
            let curr_parent = match parent {
                Some(curr_parent) => curr_parent,
                None => break,
            };

            if self.arena[curr_parent].left == id {
                let mut sibling = self.arena[curr_parent]
                    .right
                    .expect("Expected sibling of doubly black node to be `Some`.");

                if self.arena[sibling].color == Color::Red {
                    trace!("Remove case 1 below {}.", self.arena[curr_parent].key);
                    self.arena[sibling].color = Color::Black;
                    self.arena[curr_parent].color = Color::Red;
                    self.rotate_left(curr_parent);
                    sibling = self.arena[curr_parent]
                        .right
                        .expect("Expected sibling of doubly black node to be `Some`.");
                }

                let near = self.arena[sibling].left;
                let far = self.arena[sibling].right;
                if self.color(near) == Color::Black && self.color(far) == Color::Black {
                    trace!("Remove case 2 below {}.", self.arena[curr_parent].key);
                    self.arena[sibling].color = Color::Red;
                    id = Some(curr_parent);
                    parent = self.arena[curr_parent].parent;
                    continue;
                }

                if self.color(far) == Color::Black {
                    trace!("Remove case 3 below {}.", self.arena[curr_parent].key);
                    let near = near.expect("Expected red near nephew to be `Some`.");
                    self.arena[near].color = Color::Black;
                    self.arena[sibling].color = Color::Red;
                    self.rotate_right(sibling);
                    sibling = self.arena[curr_parent]
                        .right
                        .expect("Expected sibling of doubly black node to be `Some`.");
                }

                trace!("Remove case 4 below {}.", self.arena[curr_parent].key);
                self.arena[sibling].color = self.arena[curr_parent].color;
                self.arena[curr_parent].color = Color::Black;
                if let Some(far) = self.arena[sibling].right {
                    self.arena[far].color = Color::Black;
                }
                self.rotate_left(curr_parent);
            } else {
                let mut sibling = self.arena[curr_parent]
                    .left
                    .expect("Expected sibling of doubly black node to be `Some`.");

                if self.arena[sibling].color == Color::Red {
                    trace!("Remove case 1 below {}.", self.arena[curr_parent].key);
                    self.arena[sibling].color = Color::Black;
                    self.arena[curr_parent].color = Color::Red;
                    self.rotate_right(curr_parent);
                    sibling = self.arena[curr_parent]
                        .left
                        .expect("Expected sibling of doubly black node to be `Some`.");
                }

                let near = self.arena[sibling].right;
                let far = self.arena[sibling].left;
                if self.color(near) == Color::Black && self.color(far) == Color::Black {
                    trace!("Remove case 2 below {}.", self.arena[curr_parent].key);
                    self.arena[sibling].color = Color::Red;
                    id = Some(curr_parent);
                    parent = self.arena[curr_parent].parent;
                    continue;
                }

                if self.color(far) == Color::Black {
                    trace!("Remove case 3 below {}.", self.arena[curr_parent].key);
                    let near = near.expect("Expected red near nephew to be `Some`.");
                    self.arena[near].color = Color::Black;
                    self.arena[sibling].color = Color::Red;
                    self.rotate_left(sibling);
                    sibling = self.arena[curr_parent]
                        .left
                        .expect("Expected sibling of doubly black node to be `Some`.");
                }

                trace!("Remove case 4 below {}.", self.arena[curr_parent].key);
                self.arena[sibling].color = self.arena[curr_parent].color;
                self.arena[curr_parent].color = Color::Black;
                if let Some(far) = self.arena[sibling].left {
                    self.arena[far].color = Color::Black;
                }
                self.rotate_right(curr_parent);
            }

            id = self.root;
            parent = None;
        }

        if let Some(id) = id {
            self.arena[id].color = Color::Black;
        }
    }

    fn find_node(&self, key: i32) -> Option<NodeId> {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            curr = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    fn min_node(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.arena[id].left {
            id = left;
        }
        id
    }

    fn max_node(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.arena[id].right {
            id = right;
        }
        id
    }

    /// Inserts a key into the set. Returns `false` if the key already exists, in which case the
    /// set is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: i32) -> bool {
        let mut parent = None;
        let mut is_left = false;
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.arena[id];
            is_left = match key.cmp(&node.key) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => return false,
            };
            parent = Some(id);
            curr = if is_left { node.left } else { node.right };
        }

        let id = self.arena.allocate(Node::new(key, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) if is_left => self.arena[parent].left = Some(id),
            Some(parent) => self.arena[parent].right = Some(id),
        }
        self.insert_fixup(id);
        true
    }

    /// Removes a key from the set. Returns `false` if the key does not exist.
    ///
    /// A node with two children takes the key of its successor, and the successor is unlinked
    /// instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set = RedBlackSet::new();
    /// set.insert(1);
    /// assert!(set.remove(1));
    /// assert!(!set.remove(1));
    /// ```
    pub fn remove(&mut self, key: i32) -> bool {
        let target = match self.find_node(key) {
            Some(target) => target,
            None => return false,
        };

        let (unlinked, child) = match (self.arena[target].left, self.arena[target].right) {
            (None, right) => (target, right),
            (left, None) => (target, left),
            (Some(_), Some(right)) => {
                let successor = self.min_node(right);
                (successor, self.arena[successor].right)
            },
        };

        let parent = self.arena[unlinked].parent;
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        self.replace_child(parent, unlinked, child);

        let Node { key: unlinked_key, color, .. } = self.arena.free(unlinked);
        if unlinked != target {
            self.arena[target].key = unlinked_key;
        }

        if color == Color::Black {
            self.remove_fixup(child, parent);
        }
        true
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: i32) -> bool {
        self.find_node(key).is_some()
    }

    /// Returns the height of the tree, computed with a level-order walk. An empty set has height
    /// 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet = (1..=3).collect();
    /// assert_eq!(set.height(), 2);
    /// ```
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();
        let mut next_level = Vec::new();
        while !level.is_empty() {
            height += 1;
            for id in level.drain(..) {
                let node = &self.arena[id];
                next_level.extend(node.left);
                next_level.extend(node.right);
            }
            mem::swap(&mut level, &mut next_level);
        }
        height
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Clears the set, releasing every node at once.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let mut set: RedBlackSet = (0..10).collect();
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        debug!("Cleared red black set of {} nodes.", self.arena.len());
        self.arena.clear();
        self.root = None;
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<i32> {
        self.root.map(|root| self.arena[self.min_node(root)].key)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<i32> {
        self.root.map(|root| self.arena[self.max_node(root)].key)
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::red_black_tree::RedBlackSet;
    ///
    /// let set: RedBlackSet = vec![3, 1, 2].into_iter().collect();
    /// assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> RedBlackSetIter {
        let mut iter = RedBlackSetIter {
            arena: &self.arena,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    // Returns the black height of the subtree rooted at `id`, counting missing children as one
    // black node.
    fn validate_subtree(
        &self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
        bounds: (Option<i32>, Option<i32>),
        count: &mut usize,
    ) -> Result<usize> {
        let id = match id {
            None => return Ok(1),
            Some(id) => id,
        };
        let node = &self.arena[id];
        let (lower, upper) = bounds;

        if node.parent != parent {
            return Err(Error::ParentMismatch { key: node.key });
        }
        if lower.map_or(false, |lower| node.key <= lower)
            || upper.map_or(false, |upper| node.key >= upper)
        {
            return Err(Error::OrderViolation { key: node.key });
        }
        if node.color == Color::Red
            && (self.color(node.left) == Color::Red || self.color(node.right) == Color::Red)
        {
            return Err(Error::RedViolation { key: node.key });
        }
        *count += 1;

        let left = self.validate_subtree(node.left, Some(id), (lower, Some(node.key)), count)?;
        let right = self.validate_subtree(node.right, Some(id), (Some(node.key), upper), count)?;
        if left != right {
            return Err(Error::BlackHeightMismatch {
                key: node.key,
                left,
                right,
            });
        }

        match node.color {
            Color::Black => Ok(left + 1),
            Color::Red => Ok(left),
        }
    }

    /// Checks every red black invariant, every parent link, and that every allocated node is
    /// reachable.
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = self.root {
            if self.arena[root].color == Color::Red {
                return Err(Error::RedRoot {
                    key: self.arena[root].key,
                });
            }
        }

        let mut count = 0;
        self.validate_subtree(self.root, None, (None, None), &mut count)?;
        if count != self.arena.len() {
            return Err(Error::LengthMismatch {
                expected: self.arena.len(),
                actual: count,
            });
        }
        Ok(())
    }

    /// Returns the number of black nodes on every path from the root to a missing child, not
    /// counting the missing child itself.
    ///
    /// # Panics
    ///
    /// Panics if the paths disagree.
    pub fn black_height(&self) -> usize {
        let mut count = 0;
        match self.validate_subtree(self.root, None, (None, None), &mut count) {
            Ok(black_height) => black_height - 1,
            Err(error) => panic!("Expected a valid red black tree: {}.", error),
        }
    }
}

impl_ordered_set!(RedBlackSet, RedBlackSetIter);

/// An iterator for `RedBlackSet`.
///
/// This iterator traverses the keys of the set in-order.
pub struct RedBlackSetIter<'a> {
    arena: &'a Arena<Node>,
    stack: Vec<NodeId>,
}

impl<'a> RedBlackSetIter<'a> {
    fn push_left_spine(&mut self, mut curr: Option<NodeId>) {
        while let Some(id) = curr {
            self.stack.push(id);
            curr = self.arena[id].left;
        }
    }
}

impl<'a> Iterator for RedBlackSetIter<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena = self.arena;
        let node = &arena[id];
        self.push_left_spine(node.right);
        Some(node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackSet;
    use crate::error::Error;
    use crate::red_black_tree::node::Color;
    use serde_test::{assert_tokens, Token};

    fn color_of(set: &RedBlackSet, key: i32) -> Color {
        let id = set.find_node(key).expect("key should be present");
        set.arena[id].color
    }

    #[test]
    fn test_len_empty() {
        let set = RedBlackSet::new();
        assert_eq!(set.len(), 0);
        assert_eq!(set.height(), 0);
        assert_eq!(set.black_height(), 0);
        assert_eq!(set.validate(), Ok(()));
    }

    #[test]
    fn test_insert() {
        let mut set = RedBlackSet::new();
        assert!(set.insert(1));
        assert!(set.contains(1));
        assert!(!set.insert(1));
        assert_eq!(color_of(&set, 1), Color::Black);
    }

    #[test]
    fn test_insert_recolors_red_uncle() {
        let mut set: RedBlackSet = vec![2, 1, 3].into_iter().collect();
        assert_eq!(color_of(&set, 1), Color::Red);
        assert_eq!(color_of(&set, 3), Color::Red);

        set.insert(4);
        assert_eq!(color_of(&set, 1), Color::Black);
        assert_eq!(color_of(&set, 3), Color::Black);
        assert_eq!(color_of(&set, 4), Color::Red);
        assert_eq!(set.validate(), Ok(()));
    }

    #[test]
    fn test_insert_inner_grandchild() {
        let set: RedBlackSet = vec![3, 1, 2].into_iter().collect();
        let root = set.root.unwrap();
        assert_eq!(set.arena[root].key, 2);
        assert_eq!(set.arena[root].color, Color::Black);
        assert_eq!(color_of(&set, 1), Color::Red);
        assert_eq!(color_of(&set, 3), Color::Red);
    }

    #[test]
    fn test_insert_ascending_sevens() {
        let set: RedBlackSet = vec![10, 20, 30, 40, 50, 60, 70].into_iter().collect();
        assert_eq!(
            set.iter().collect::<Vec<i32>>(),
            vec![10, 20, 30, 40, 50, 60, 70],
        );
        assert_eq!(set.validate(), Ok(()));
        assert_eq!(set.black_height(), 2);
        assert_eq!(set.height(), 4);
    }

    #[test]
    fn test_remove() {
        let mut set = RedBlackSet::new();
        set.insert(1);
        assert!(set.remove(1));
        assert!(!set.contains(1));
        assert!(!set.remove(1));
        assert!(set.is_empty());
        assert_eq!(set.validate(), Ok(()));
    }

    #[test]
    fn test_remove_black_leaf() {
        let mut set: RedBlackSet = (1..=10).collect();
        for key in 1..=10 {
            assert!(set.remove(key));
            assert_eq!(set.validate(), Ok(()));
        }
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_descending() {
        let mut set: RedBlackSet = (0..500).collect();
        for key in (0..500).rev().step_by(2) {
            assert!(set.remove(key));
            assert_eq!(set.validate(), Ok(()));
        }
        assert_eq!(set.len(), 250);
    }

    #[test]
    fn test_validate_detects_red_violation() {
        let mut set: RedBlackSet = vec![2, 1, 3, 4].into_iter().collect();
        let id = set.find_node(3).unwrap();
        set.arena[id].color = Color::Red;
        assert_eq!(set.validate(), Err(Error::RedViolation { key: 3 }));
    }

    #[test]
    fn test_validate_detects_red_root() {
        let mut set: RedBlackSet = vec![1].into_iter().collect();
        let root = set.root.unwrap();
        set.arena[root].color = Color::Red;
        assert_eq!(set.validate(), Err(Error::RedRoot { key: 1 }));
    }

    #[test]
    fn test_validate_detects_black_height_mismatch() {
        let mut set: RedBlackSet = vec![2, 1, 3].into_iter().collect();
        let id = set.find_node(1).unwrap();
        set.arena[id].color = Color::Black;
        assert_eq!(
            set.validate(),
            Err(Error::BlackHeightMismatch {
                key: 2,
                left: 2,
                right: 1
            }),
        );
    }

    #[test]
    fn test_min_max() {
        let set: RedBlackSet = vec![5, 1, 9].into_iter().collect();
        assert_eq!(set.min(), Some(1));
        assert_eq!(set.max(), Some(9));
    }

    #[test]
    fn test_serde() {
        let set: RedBlackSet = vec![2, 1].into_iter().collect();
        assert_tokens(
            &set,
            &[
                Token::Seq { len: Some(2) },
                Token::I32(1),
                Token::I32(2),
                Token::SeqEnd,
            ],
        );
    }
}
