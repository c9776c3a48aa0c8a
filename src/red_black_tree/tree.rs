use crate::arena::{Arena, Handle};
use crate::red_black_tree::node::{Color, Link, Node, Side};
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

/// The red black tree engine shared by `RedBlackMap` and `OrderedTree`.
///
/// Nodes live in an arena and refer to each other through handles, so every node can keep a
/// non-owning link to its parent. The tree itself owns only the root link; the number of live
/// nodes is tracked by the arena.
#[derive(Clone)]
pub struct Tree<T, U> {
    pub root: Link,
    pub nodes: Arena<Node<T, U>>,
}

impl<T, U> Tree<T, U> {
    pub fn new() -> Self {
        Tree {
            root: None,
            nodes: Arena::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tree {
            root: None,
            nodes: Arena::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
    }

    fn is_red(&self, link: Link) -> bool {
        match link {
            None => false,
            Some(handle) => self.nodes[handle].is_red(),
        }
    }

    fn child(&self, handle: Handle, side: Side) -> Link {
        self.nodes[handle].child(side)
    }

    fn side_of(&self, parent: Handle, child: Link) -> Side {
        if self.nodes[parent].left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    // Points whatever referred to `old` (its parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, Some(old));
                self.nodes[parent].set_child(side, new);
            },
        }
    }

    /// Rotates `handle` down towards `side`. The child on the opposite side takes its place and
    /// the in-order sequence of keys is unchanged. Colors are not touched.
    fn rotate(&mut self, handle: Handle, side: Side) {
        trace!("rotating {:?} to the {:?}", handle, side);
        let pivot = self
            .child(handle, side.opposite())
            .expect("Expected rotated child node to be `Some`.");

        let inner = self.child(pivot, side);
        self.nodes[handle].set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(handle);
        }

        let parent = self.nodes[handle].parent;
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, handle, Some(pivot));

        self.nodes[pivot].set_child(side, Some(handle));
        self.nodes[handle].parent = Some(pivot);
    }

    pub fn find<V>(&self, key: &V) -> Link
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => curr = node.right,
                Ordering::Equal => return Some(handle),
            }
        }
        None
    }

    // Follows `side` links from `handle` until the sentinel is reached.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(child) = self.child(handle, side) {
            handle = child;
        }
        handle
    }

    pub fn first(&self) -> Link {
        self.root.map(|root| self.extreme(root, Side::Left))
    }

    pub fn last(&self) -> Link {
        self.root.map(|root| self.extreme(root, Side::Right))
    }

    /// Returns the in-order neighbour of `handle` in the direction of `side`: the successor for
    /// `Side::Right` and the predecessor for `Side::Left`.
    pub fn neighbour(&self, handle: Handle, side: Side) -> Link {
        if let Some(child) = self.child(handle, side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut curr = handle;
        let mut parent = self.nodes[handle].parent;
        while let Some(ancestor) = parent {
            if self.child(ancestor, side) != Some(curr) {
                break;
            }
            curr = ancestor;
            parent = self.nodes[ancestor].parent;
        }
        parent
    }

    pub fn floor<V>(&self, key: &V) -> Link
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.bound(key, Side::Left)
    }

    pub fn ceil<V>(&self, key: &V) -> Link
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.bound(key, Side::Right)
    }

    // The closest key on `side` of `key`, or `key` itself if present.
    fn bound<V>(&self, key: &V, side: Side) -> Link
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(handle) = curr {
            let node = &self.nodes[handle];
            let ordering = key.cmp(node.key.borrow());
            match (ordering, side) {
                (Ordering::Equal, _) => return Some(handle),
                (Ordering::Less, Side::Left) => curr = node.left,
                (Ordering::Greater, Side::Right) => curr = node.right,
                (Ordering::Less, Side::Right) => {
                    best = Some(handle);
                    curr = node.left;
                },
                (Ordering::Greater, Side::Left) => {
                    best = Some(handle);
                    curr = node.right;
                },
            }
        }
        best
    }

    /// Longest root-to-sentinel path, counted in nodes.
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(handle) => {
                let node = &self.nodes[handle];
                cmp::max(self.subtree_height(node.left), self.subtree_height(node.right)) + 1
            },
        }
    }

    /// Inserts a key-value pair. An equal key is updated in place and the previous pair is
    /// returned; the shape of the tree does not change in that case.
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)>
    where
        T: Ord,
    {
        let mut parent = None;
        let mut side = Side::Left;
        let mut curr = self.root;
        while let Some(handle) = curr {
            parent = curr;
            let node = &mut self.nodes[handle];
            match key.cmp(&node.key) {
                Ordering::Less => side = Side::Left,
                Ordering::Greater => side = Side::Right,
                Ordering::Equal => {
                    let old_key = mem::replace(&mut node.key, key);
                    let old_value = mem::replace(&mut node.value, value);
                    return Some((old_key, old_value));
                },
            }
            curr = node.child(side);
        }

        let handle = self.nodes.allocate(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(handle),
            Some(parent) => self.nodes[parent].set_child(side, Some(handle)),
        }
        self.insert_fixup(handle);
        None
    }

    // Removes the red-red edge that a freshly attached red node may have created.
    fn insert_fixup(&mut self, mut handle: Handle) {
        while let Some(mut parent) = self.nodes[handle].parent {
            if !self.nodes[parent].is_red() {
                break;
            }

            // a red node is never the root
            let grandparent = self.nodes[parent]
                .parent
                .expect("Expected red node to have a parent.");
            let side = self.side_of(grandparent, Some(parent));
            let uncle = self.child(grandparent, side.opposite());

            if self.is_red(uncle) {
                self.nodes[parent].color = Color::Black;
                if let Some(uncle) = uncle {
                    self.nodes[uncle].color = Color::Black;
                }
                self.nodes[grandparent].color = Color::Red;
                handle = grandparent;
                continue;
            }

            if self.child(parent, side.opposite()) == Some(handle) {
                self.rotate(parent, side);
                handle = parent;
                parent = self.nodes[handle]
                    .parent
                    .expect("Expected rotated node to have a parent.");
            }

            self.nodes[parent].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.nodes[root].color = Color::Black;
        }
    }

    /// Removes a key from the tree and returns the stored pair, or `None` if the key is absent.
    /// A node with two children takes over the pair of its successor, and the successor's node is
    /// the one that gets unlinked.
    pub fn remove<V>(&mut self, key: &V) -> Option<(T, U)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let target = self.find(key)?;
        let spliced = match (self.nodes[target].left, self.nodes[target].right) {
            (Some(_), Some(right)) => self.extreme(right, Side::Left),
            _ => target,
        };

        let child = self.nodes[spliced].left.or(self.nodes[spliced].right);
        let parent = self.nodes[spliced].parent;
        if let Some(child) = child {
            self.nodes[child].parent = parent;
        }
        self.replace_child(parent, spliced, child);

        let Node {
            key: spliced_key,
            value: spliced_value,
            color,
            ..
        } = self.nodes.free(spliced);

        let removed = if spliced == target {
            (spliced_key, spliced_value)
        } else {
            let node = &mut self.nodes[target];
            (
                mem::replace(&mut node.key, spliced_key),
                mem::replace(&mut node.value, spliced_value),
            )
        };

        if color == Color::Black {
            self.remove_fixup(child, parent);
        }
        Some(removed)
    }

    // Resolves the missing black on the path through `link`. The sentinel has no parent link of
    // its own, so the parent is carried alongside.
    fn remove_fixup(&mut self, mut link: Link, mut parent: Link) {
        while link != self.root && !self.is_red(link) {
            let curr_parent = match parent {
                Some(curr_parent) => curr_parent,
                None => break,
            };
            let side = self.side_of(curr_parent, link);
            let mut sibling = self
                .child(curr_parent, side.opposite())
                .expect("Expected deficient node to have a sibling.");

            if self.nodes[sibling].is_red() {
                self.nodes[sibling].color = Color::Black;
                self.nodes[curr_parent].color = Color::Red;
                self.rotate(curr_parent, side);
                sibling = self
                    .child(curr_parent, side.opposite())
                    .expect("Expected deficient node to have a sibling.");
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());
            if !self.is_red(near) && !self.is_red(far) {
                self.nodes[sibling].color = Color::Red;
                link = Some(curr_parent);
                parent = self.nodes[curr_parent].parent;
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.nodes[near].color = Color::Black;
                }
                self.nodes[sibling].color = Color::Red;
                self.rotate(sibling, side.opposite());
                sibling = self
                    .child(curr_parent, side.opposite())
                    .expect("Expected deficient node to have a sibling.");
            }

            self.nodes[sibling].color = self.nodes[curr_parent].color;
            self.nodes[curr_parent].color = Color::Black;
            if let Some(far) = self.child(sibling, side.opposite()) {
                self.nodes[far].color = Color::Black;
            }
            self.rotate(curr_parent, side);
            link = self.root;
            parent = None;
        }

        if let Some(handle) = link {
            self.nodes[handle].color = Color::Black;
        }
    }

    /// Removes every node in order and returns the stored pairs.
    pub fn drain(&mut self) -> Vec<(T, U)> {
        let mut handles = Vec::with_capacity(self.len());
        let mut curr = self.first();
        while let Some(handle) = curr {
            handles.push(handle);
            curr = self.neighbour(handle, Side::Right);
        }

        self.root = None;
        let pairs = handles
            .into_iter()
            .map(|handle| {
                let Node { key, value, .. } = self.nodes.free(handle);
                (key, value)
            })
            .collect();
        self.nodes.clear();
        pairs
    }
}
