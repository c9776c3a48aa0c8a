//! Self-balancing binary search tree that uses a color bit to ensure that the tree remains
//! approximately balanced during insertions and deletions.
//!
//! Nodes are stored in an arena and linked to their parent as well as their children, so
//! successor and predecessor queries walk the tree in place.

mod map;
mod node;
mod set;
mod tree;

pub use self::map::{RedBlackMap, RedBlackMapIntoIter, RedBlackMapIter};
pub use self::set::{OrderedTree, OrderedTreeIntoIter, OrderedTreeIter};

use std::error;
use std::fmt;
use std::result;

/// Recoverable failures of ordered tree queries. Neither variant changes the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The key is not in the tree.
    NotFound,
    /// The query needs at least one key.
    EmptyTree,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::EmptyTree => write!(f, "tree is empty"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
