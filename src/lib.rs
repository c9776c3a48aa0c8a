//! Ordered collections backed by an arena-allocated red black tree.
//!
//! `red_black_tree::OrderedTree` is an ordered set of keys with successor, predecessor and
//! sorted-order queries. `red_black_tree::RedBlackMap` is the key-value map it is built on.

pub mod arena;
pub mod red_black_tree;
