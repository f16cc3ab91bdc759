//! Ordered sets of `i32` keys backed by three self-balancing binary search trees.
//!
//! - [`avl_tree::AvlSet`]: an avl tree rebalanced by recursive insertion and removal.
//! - [`avl_tree::IterativeAvlSet`]: an avl tree with parent links that rebalances by walking
//!   upwards from the modified node.
//! - [`red_black_tree::RedBlackSet`]: a red black tree with parent links and the classic insert
//!   and delete fixups.
//!
//! All three implement [`OrderedSet`] so they can be driven and checked interchangeably.
//!
//! # Examples
//!
//! ```
//! use balanced_trees::avl_tree::{AvlSet, IterativeAvlSet};
//! use balanced_trees::red_black_tree::RedBlackSet;
//! use balanced_trees::OrderedSet;
//!
//! fn fill<S: OrderedSet + Default>() -> S {
//!     let mut set = S::default();
//!     for key in &[5, 1, 4, 2, 3, 1] {
//!         set.insert(*key);
//!     }
//!     set.remove(4);
//!     set
//! }
//!
//! assert_eq!(fill::<AvlSet>().to_sorted_vec(), vec![1, 2, 3, 5]);
//! assert_eq!(fill::<IterativeAvlSet>().to_sorted_vec(), vec![1, 2, 3, 5]);
//! assert_eq!(fill::<RedBlackSet>().to_sorted_vec(), vec![1, 2, 3, 5]);
//! ```

#[macro_use]
mod ordered_set;

pub mod arena;
pub mod avl_tree;
mod error;
pub mod red_black_tree;

pub use self::error::{Error, Result};
pub use self::ordered_set::OrderedSet;
