use std::error;
use std::fmt;
use std::result;

/// A structural invariant violation found by `OrderedSet::validate`.
///
/// Mutating operations never return these: a violation means the balancing code is wrong.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A key is not strictly between the keys of its ancestors.
    OrderViolation { key: i32 },
    /// The cached height of a node differs from the height of its subtree.
    HeightMismatch { key: i32, stored: usize, actual: usize },
    /// The heights of the two subtrees of a node differ by more than one.
    Unbalanced { key: i32, balance: i32 },
    /// A node's parent link does not point at the node that owns it.
    ParentMismatch { key: i32 },
    /// The root of a red black tree is red.
    RedRoot { key: i32 },
    /// A red node has a red child.
    RedViolation { key: i32 },
    /// The two subtrees of a node have different black heights.
    BlackHeightMismatch { key: i32, left: usize, right: usize },
    /// The number of reachable nodes differs from the tracked length.
    LengthMismatch { expected: usize, actual: usize },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OrderViolation { key } => write!(f, "key {} is out of order", key),
            Error::HeightMismatch { key, stored, actual } => write!(
                f,
                "node {} stores height {} but has height {}",
                key, stored, actual,
            ),
            Error::Unbalanced { key, balance } => {
                write!(f, "node {} has balance factor {}", key, balance)
            },
            Error::ParentMismatch { key } => write!(f, "node {} has a stale parent link", key),
            Error::RedRoot { key } => write!(f, "root {} is red", key),
            Error::RedViolation { key } => write!(f, "red node {} has a red child", key),
            Error::BlackHeightMismatch { key, left, right } => write!(
                f,
                "node {} has black heights {} and {}",
                key, left, right,
            ),
            Error::LengthMismatch { expected, actual } => {
                write!(f, "expected {} nodes, found {}", expected, actual)
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
