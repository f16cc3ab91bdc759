//! Self-balancing binary search trees where the heights of the two child subtrees of any node
//! differ by at most one.
//!
//! Two variants share the same rotation choice but restore balance differently. `AvlSet` recurses
//! and rebalances on the way back up. `IterativeAvlSet` keeps parent links and walks upwards from
//! the modified node.

mod balance;
mod iterative;
mod node;
mod set;
mod tree;

pub use self::iterative::{IterativeAvlSet, IterativeAvlSetIter};
pub use self::set::{AvlSet, AvlSetIter};
