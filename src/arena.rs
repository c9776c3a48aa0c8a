//! Slot arena that hands out copyable handles instead of references.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to a value stored in an `Arena<T>`.
///
/// Handles are plain indices, so they can be stored inside the values they point at. This is what
/// allows tree nodes to keep a link to their parent without creating an ownership cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Handle(usize);

#[derive(Clone)]
enum Slot<T> {
    Occupied(T),
    Vacant(Option<usize>),
}

/// An allocator for a single type of object backed by one `Vec`.
///
/// Freed slots are threaded into an intrusive free list and reused by later allocations, so a
/// handle stays valid until the value it refers to is freed. No unsafe code is used.
///
/// # Examples
///
/// ```
/// use ordered_tree::arena::Arena;
///
/// let mut arena = Arena::new();
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(x), 2);
/// assert!(arena.is_empty());
/// ```
#[derive(Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    head: Option<usize>,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::new();
    /// ```
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            head: None,
            len: 0,
        }
    }

    /// Constructs a new, empty `Arena<T>` with room for `capacity` objects before reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::with_capacity(1024);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            head: None,
            len: 0,
        }
    }

    /// Stores an object in the arena and returns a handle to it. Vacant slots are reused before
    /// the arena grows.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> Handle {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                Handle(self.slots.len() - 1)
            },
            Some(index) => {
                match mem::replace(&mut self.slots[index], Slot::Occupied(value)) {
                    Slot::Vacant(next) => {
                        self.head = next;
                        Handle(index)
                    },
                    Slot::Occupied(_) => panic!("Expected the free list to point at a vacant slot."),
                }
            },
        }
    }

    /// Removes an object from the arena and returns it. The slot is recycled by a later
    /// allocation.
    ///
    /// # Panics
    ///
    /// Panics if `handle` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// ```
    pub fn free(&mut self, handle: Handle) -> T {
        let Handle(index) = handle;
        if index >= self.slots.len() {
            panic!("Error: attempting to free invalid slot.");
        }
        match mem::replace(&mut self.slots[index], Slot::Vacant(self.head)) {
            Slot::Occupied(value) => {
                self.head = Some(index);
                self.len -= 1;
                value
            },
            Slot::Vacant(next) => {
                self.slots[index] = Slot::Vacant(next);
                panic!("Error: attempting to free vacant slot.");
            },
        }
    }

    /// Returns an immutable reference to an object in the arena. Returns `None` if the handle
    /// does not refer to a live object.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        match self.slots.get(handle.0) {
            Some(Slot::Occupied(ref value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena. Returns `None` if the handle does
    /// not refer to a live object.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        match self.slots.get_mut(handle.0) {
            Some(Slot::Occupied(ref mut value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every object in the arena. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<Handle> for Arena<T> {
    type Output = T;

    fn index(&self, handle: Handle) -> &Self::Output {
        self.get(handle).expect("Error: handle refers to a vacant slot.")
    }
}

impl<T> IndexMut<Handle> for Arena<T> {
    fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
        self.get_mut(handle).expect("Error: handle refers to a vacant slot.")
    }
}
