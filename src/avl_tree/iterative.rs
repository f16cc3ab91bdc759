use crate::arena::{Arena, NodeId};
use crate::avl_tree::balance::Rotation;
use crate::error::{Error, Result};
use log::{debug, trace};
use std::cmp::{self, Ordering};

struct Node {
    key: i32,
    height: usize,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(key: i32, parent: Option<NodeId>) -> Self {
        Node {
            key,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }
}

/// An ordered set of `i32` keys implemented using an avl tree with parent links.
///
/// Nodes live in an `Arena` and refer to their children and parent by `NodeId`. After a leaf is
/// attached or a node is unlinked, rebalancing walks up the parent links from the point of the
/// change and stops as soon as the rest of the path is known to be unaffected.
///
/// # Examples
///
/// ```
/// use balanced_trees::avl_tree::IterativeAvlSet;
///
/// let mut set = IterativeAvlSet::new();
/// for key in 1..=7 {
///     set.insert(key);
/// }
///
/// assert_eq!(set.height(), 3);
/// assert!(set.remove(4));
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7]);
/// ```
pub struct IterativeAvlSet {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl IterativeAvlSet {
    /// Constructs a new, empty `IterativeAvlSet`.
    pub fn new() -> Self {
        IterativeAvlSet {
            arena: Arena::new(),
            root: None,
        }
    }

    fn height_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.arena[id].height)
    }

    fn balance_of(&self, id: Option<NodeId>) -> i32 {
        id.map_or(0, |id| {
            let node = &self.arena[id];
            self.height_of(node.left) as i32 - self.height_of(node.right) as i32
        })
    }

    fn update(&mut self, id: NodeId) {
        let node = &self.arena[id];
        let height = cmp::max(self.height_of(node.left), self.height_of(node.right)) + 1;
        self.arena[id].height = height;
    }

    // Points whichever link of `parent` referred to `old` at `new`, or the root if there is no
    // parent.
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

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let child = self.arena[id]
            .right
            .expect("Expected right child node to be `Some`.");
        trace!("Rotating left at {}.", self.arena[id].key);

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

        self.update(id);
        self.update(child);
        child
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let child = self.arena[id]
            .left
            .expect("Expected left child node to be `Some`.");
        trace!("Rotating right at {}.", self.arena[id].key);

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

        self.update(id);
        self.update(child);
        child
    }

    // Rotates at `id` if it is unbalanced and returns the root of the resulting subtree. The
    // height of `id` must already be up to date.
    fn rebalance(&mut self, id: NodeId) -> NodeId {
        let rotation = {
            let node = &self.arena[id];
            Rotation::select(
                self.balance_of(Some(id)),
                || self.balance_of(node.left),
                || self.balance_of(node.right),
            )
        };

        match rotation {
            None => id,
            Some(Rotation::Left) => self.rotate_left(id),
            Some(Rotation::Right) => self.rotate_right(id),
            Some(Rotation::LeftRight) => {
                let child = self.arena[id]
                    .left
                    .expect("Expected left child node to be `Some`.");
                self.rotate_left(child);
                self.rotate_right(id)
            },
            Some(Rotation::RightLeft) => {
                let child = self.arena[id]
                    .right
                    .expect("Expected right child node to be `Some`.");
                self.rotate_right(child);
                self.rotate_left(id)
            },
        }
    }

    // Walks up from the parent of a new leaf. A node that ends up with balance factor 0 did not
    // grow, and after one rotation the subtree is back to its height before the insertion.
    fn insert_fixup(&mut self, start: NodeId) {
        let mut curr = Some(start);
        while let Some(id) = curr {
            self.update(id);
            match self.balance_of(Some(id)) {
                0 => break,
                -1 | 1 => curr = self.arena[id].parent,
                _ => {
                    self.rebalance(id);
                    break;
                },
            }
        }
    }

    // Walks up from the parent of an unlinked node. Rotations may be needed at every level, so
    // the walk only stops once a subtree comes out with the same height it had before.
    fn remove_fixup(&mut self, start: NodeId) {
        let mut curr = Some(start);
        while let Some(id) = curr {
            let old_height = self.arena[id].height;
            self.update(id);
            let subtree = self.rebalance(id);
            if self.arena[subtree].height == old_height {
                break;
            }
            curr = self.arena[subtree].parent;
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
    /// use balanced_trees::avl_tree::IterativeAvlSet;
    ///
    /// let mut set = IterativeAvlSet::new();
    /// assert!(set.insert(1));
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
            Some(parent) => {
                if is_left {
                    self.arena[parent].left = Some(id);
                } else {
                    self.arena[parent].right = Some(id);
                }
                self.insert_fixup(parent);
            },
        }
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
    /// use balanced_trees::avl_tree::IterativeAvlSet;
    ///
    /// let mut set = IterativeAvlSet::new();
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

        let Node { key: unlinked_key, .. } = self.arena.free(unlinked);
        if unlinked != target {
            self.arena[target].key = unlinked_key;
        }

        if let Some(parent) = parent {
            self.remove_fixup(parent);
        }
        true
    }

    /// Checks if a key exists in the set.
    pub fn contains(&self, key: i32) -> bool {
        self.find_node(key).is_some()
    }

    /// Returns the height of the tree. An empty set has height 0.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
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
    pub fn clear(&mut self) {
        debug!("Cleared iterative avl set of {} nodes.", self.arena.len());
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
    pub fn iter(&self) -> IterativeAvlSetIter {
        let mut iter = IterativeAvlSetIter {
            arena: &self.arena,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    fn validate_subtree(
        &self,
        id: Option<NodeId>,
        parent: Option<NodeId>,
        bounds: (Option<i32>, Option<i32>),
        count: &mut usize,
    ) -> Result<usize> {
        let id = match id {
            None => return Ok(0),
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
        *count += 1;

        let left_height =
            self.validate_subtree(node.left, Some(id), (lower, Some(node.key)), count)?;
        let right_height =
            self.validate_subtree(node.right, Some(id), (Some(node.key), upper), count)?;
        let actual = cmp::max(left_height, right_height) + 1;
        if node.height != actual {
            return Err(Error::HeightMismatch {
                key: node.key,
                stored: node.height,
                actual,
            });
        }

        let balance = left_height as i32 - right_height as i32;
        if balance.abs() > 1 {
            return Err(Error::Unbalanced { key: node.key, balance });
        }
        Ok(actual)
    }

    /// Checks every avl invariant, every parent link, and that every allocated node is reachable.
    pub fn validate(&self) -> Result<()> {
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
}

impl_ordered_set!(IterativeAvlSet, IterativeAvlSetIter);

/// An iterator for `IterativeAvlSet`.
///
/// This iterator traverses the keys of the set in-order.
pub struct IterativeAvlSetIter<'a> {
    arena: &'a Arena<Node>,
    stack: Vec<NodeId>,
}

impl<'a> IterativeAvlSetIter<'a> {
    fn push_left_spine(&mut self, mut curr: Option<NodeId>) {
        while let Some(id) = curr {
            self.stack.push(id);
            curr = self.arena[id].left;
        }
    }
}

impl<'a> Iterator for IterativeAvlSetIter<'a> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let arena = self.arena;
        let node = &arena[id];
        self.push_left_spine(node.right);
        Some(node.key)
    }
}
