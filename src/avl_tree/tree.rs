use crate::avl_tree::balance::Rotation;
use crate::avl_tree::node::Node;
use crate::error::{Error, Result};
use std::cmp::{self, Ordering};

pub type Tree = Option<Box<Node>>;

pub fn height(tree: &Tree) -> usize {
    match tree {
        None => 0,
        Some(node) => node.height,
    }
}

fn balance_factor(tree: &Tree) -> i32 {
    tree.as_ref().map_or(0, |node| node.balance())
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let mut child = node
        .right
        .take()
        .expect("Expected right child node to be `Some`.");
    node.right = child.left.take();
    node.update();
    child.left = Some(node);
    child.update();
    child
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let mut child = node
        .left
        .take()
        .expect("Expected left child node to be `Some`.");
    node.left = child.right.take();
    node.update();
    child.right = Some(node);
    child.update();
    child
}

fn rotate(mut node: Box<Node>, rotation: Rotation) -> Box<Node> {
    match rotation {
        Rotation::Left => rotate_left(node),
        Rotation::Right => rotate_right(node),
        Rotation::LeftRight => {
            let child = node
                .left
                .take()
                .expect("Expected left child node to be `Some`.");
            node.left = Some(rotate_left(child));
            rotate_right(node)
        },
        Rotation::RightLeft => {
            let child = node
                .right
                .take()
                .expect("Expected right child node to be `Some`.");
            node.right = Some(rotate_right(child));
            rotate_left(node)
        },
    }
}

// Refreshes the height of the root of `tree` and rotates it if it became unbalanced.
fn balance(tree: &mut Tree) {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return,
    };

    node.update();

    let rotation = Rotation::select(
        node.balance(),
        || balance_factor(&node.left),
        || balance_factor(&node.right),
    );
    if let Some(rotation) = rotation {
        node = rotate(node, rotation);
    }

    *tree = Some(node);
}

// precondition: there exists a minimum node in the tree
fn remove_min(tree: &mut Tree) -> Box<Node> {
    if let Some(node) = tree {
        if node.left.is_some() {
            let min = remove_min(&mut node.left);
            balance(tree);
            return min;
        }
    }

    let mut node = tree.take().expect("Expected a non-empty tree.");
    *tree = node.right.take();
    node
}

pub fn insert(tree: &mut Tree, key: i32) -> bool {
    let inserted = match tree {
        Some(node) => match key.cmp(&node.key) {
            Ordering::Less => insert(&mut node.left, key),
            Ordering::Greater => insert(&mut node.right, key),
            Ordering::Equal => false,
        },
        None => {
            *tree = Some(Box::new(Node::new(key)));
            return true;
        },
    };

    if inserted {
        balance(tree);
    }
    inserted
}

pub fn remove(tree: &mut Tree, key: i32) -> bool {
    let mut node = match tree.take() {
        Some(node) => node,
        None => return false,
    };

    let removed = match key.cmp(&node.key) {
        Ordering::Less => remove(&mut node.left, key),
        Ordering::Greater => remove(&mut node.right, key),
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, right) => {
                *tree = right;
                return true;
            },
            (left, None) => {
                *tree = left;
                return true;
            },
            (left, mut right) => {
                let successor = remove_min(&mut right);
                node.key = successor.key;
                node.left = left;
                node.right = right;
                true
            },
        },
    };

    *tree = Some(node);
    if removed {
        balance(tree);
    }
    removed
}

pub fn contains(tree: &Tree, key: i32) -> bool {
    let mut curr = tree;
    while let Some(node) = curr {
        curr = match key.cmp(&node.key) {
            Ordering::Less => &node.left,
            Ordering::Greater => &node.right,
            Ordering::Equal => return true,
        };
    }
    false
}

pub fn min(tree: &Tree) -> Option<i32> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(left_node) = &curr.left {
            curr = left_node;
        }
        curr.key
    })
}

pub fn max(tree: &Tree) -> Option<i32> {
    tree.as_ref().map(|node| {
        let mut curr = node;
        while let Some(right_node) = &curr.right {
            curr = right_node;
        }
        curr.key
    })
}

// Releases every node with an explicit stack so dropping a deep tree never recurses.
pub fn dispose(tree: &mut Tree) -> usize {
    let mut stack: Vec<Box<Node>> = tree.take().into_iter().collect();
    let mut count = 0;
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
        count += 1;
    }
    count
}

// Returns the height of `tree` after checking order, cached heights and balance factors.
pub fn validate(
    tree: &Tree,
    lower: Option<i32>,
    upper: Option<i32>,
    count: &mut usize,
) -> Result<usize> {
    let node = match tree {
        None => return Ok(0),
        Some(node) => node,
    };

    if lower.map_or(false, |lower| node.key <= lower)
        || upper.map_or(false, |upper| node.key >= upper)
    {
        return Err(Error::OrderViolation { key: node.key });
    }
    *count += 1;

    let left_height = validate(&node.left, lower, Some(node.key), count)?;
    let right_height = validate(&node.right, Some(node.key), upper, count)?;
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

#[cfg(test)]
mod tests {
    use super::{insert, remove, validate, Tree};

    fn keys(tree: &Tree) -> Option<(i32, Option<i32>, Option<i32>)> {
        tree.as_ref().map(|node| {
            (
                node.key,
                node.left.as_ref().map(|child| child.key),
                node.right.as_ref().map(|child| child.key),
            )
        })
    }

    #[test]
    fn test_rotate_left() {
        let mut tree = None;
        insert(&mut tree, 1);
        insert(&mut tree, 2);
        insert(&mut tree, 3);
        assert_eq!(keys(&tree), Some((2, Some(1), Some(3))));
        assert_eq!(super::height(&tree), 2);
    }

    #[test]
    fn test_rotate_right() {
        let mut tree = None;
        insert(&mut tree, 3);
        insert(&mut tree, 2);
        insert(&mut tree, 1);
        assert_eq!(keys(&tree), Some((2, Some(1), Some(3))));
    }

    #[test]
    fn test_rotate_left_right() {
        let mut tree = None;
        insert(&mut tree, 3);
        insert(&mut tree, 1);
        insert(&mut tree, 2);
        assert_eq!(keys(&tree), Some((2, Some(1), Some(3))));
    }

    #[test]
    fn test_rotate_right_left() {
        let mut tree = None;
        insert(&mut tree, 1);
        insert(&mut tree, 3);
        insert(&mut tree, 2);
        assert_eq!(keys(&tree), Some((2, Some(1), Some(3))));
    }

    #[test]
    fn test_remove_two_children_uses_successor() {
        let mut tree = None;
        for key in &[4, 2, 6, 1, 3, 5, 7] {
            insert(&mut tree, *key);
        }
        assert!(remove(&mut tree, 4));
        assert_eq!(keys(&tree), Some((5, Some(2), Some(6))));

        let mut count = 0;
        assert_eq!(validate(&tree, None, None, &mut count), Ok(3));
        assert_eq!(count, 6);
    }

    #[test]
    fn test_remove_rebalances_on_the_way_up() {
        let mut tree = None;
        for key in &[2, 1, 3, 4] {
            insert(&mut tree, *key);
        }
        assert!(remove(&mut tree, 1));
        assert_eq!(keys(&tree), Some((3, Some(2), Some(4))));
    }
}
