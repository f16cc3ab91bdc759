//! Chunked index arena that owns the nodes of the parent-linked trees.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// Number of slots reserved per chunk by `Arena::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// A stable handle to a value stored in an `Arena<T>`.
///
/// Handles stay valid until the value is freed, regardless of how many other values are allocated
/// or freed in the meantime. Trees use them for both child and parent links.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

enum Slot<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// An allocator for values of a single type addressed by `NodeId`.
///
/// Storage grows a chunk at a time, so existing values are never moved. Freed slots are threaded
/// onto a free list and reused last-in first-out. Dropping or clearing the arena releases every
/// value in one pass over the chunks, without following any links between them.
///
/// # Examples
///
/// ```
/// use balanced_trees::arena::Arena;
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
pub struct Arena<T> {
    free_head: Option<NodeId>,
    chunks: Vec<Vec<Slot<T>>>,
    chunk_size: usize,
    len: usize,
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena<T>` with `DEFAULT_CHUNK_SIZE` slots per chunk.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `Arena<T>` with a specific number of slots per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::Arena;
    ///
    /// let arena: Arena<u32> = Arena::with_chunk_size(16);
    /// assert!(arena.is_empty());
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "Expected a positive chunk size.");
        Arena {
            free_head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<T>> {
        self.chunks
            .get(id.0 / self.chunk_size)
            .and_then(|chunk| chunk.get(id.0 % self.chunk_size))
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot<T>> {
        let chunk_size = self.chunk_size;
        self.chunks
            .get_mut(id.0 / chunk_size)
            .and_then(|chunk| chunk.get_mut(id.0 % chunk_size))
    }

    /// Moves a value into the arena and returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn allocate(&mut self, value: T) -> NodeId {
        self.len += 1;

        if let Some(id) = self.free_head.take() {
            let slot = self
                .slot_mut(id)
                .expect("Expected free list to point into the arena.");
            match mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant(next) => self.free_head = next,
                Slot::Occupied(_) => panic!("Expected free list to point at a vacant slot."),
            }
            return id;
        }

        let chunk_size = self.chunk_size;
        if self.chunks.last().map_or(true, |chunk| chunk.len() == chunk_size) {
            self.chunks.push(Vec::with_capacity(chunk_size));
        }
        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        chunk.push(Slot::Occupied(value));
        NodeId(chunk_index * chunk_size + chunk.len() - 1)
    }

    /// Removes a value from the arena and returns it. The slot is reused by the next allocation.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to an occupied slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(x), 0);
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn free(&mut self, id: NodeId) -> T {
        let next = self.free_head;
        let slot = match self.slot_mut(id) {
            Some(slot) => slot,
            None => panic!("Error: attempting to free invalid slot."),
        };
        if let Slot::Vacant(_) = slot {
            panic!("Error: attempting to free vacant slot.");
        }
        match mem::replace(slot, Slot::Vacant(next)) {
            Slot::Occupied(value) => {
                self.len -= 1;
                self.free_head = Some(id);
                value
            },
            Slot::Vacant(_) => unreachable!(),
        }
    }

    /// Returns an immutable reference to a value, or `None` if `id` is invalid or freed.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slot(id) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to a value, or `None` if `id` is invalid or freed.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slot_mut(id) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns the number of values currently allocated.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no values are allocated.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and releases all chunks. Outstanding handles become invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::arena::Arena;
    ///
    /// let mut arena = Arena::new();
    /// let x = arena.allocate(0);
    /// arena.clear();
    /// assert!(arena.is_empty());
    /// assert_eq!(arena.get(x), None);
    /// ```
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: node id out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: node id out of bounds.")
    }
}

#[cfg(test)]
mod tests {
    use super::{Arena, NodeId};

    #[test]
    #[should_panic]
    fn test_free_invalid_slot() {
        let mut arena: Arena<u32> = Arena::new();
        arena.free(NodeId(0));
    }

    #[test]
    #[should_panic]
    fn test_free_vacant_slot() {
        let mut arena = Arena::new();
        let id = arena.allocate(0);
        arena.free(id);
        arena.free(id);
    }

    #[test]
    fn test_allocate() {
        let mut arena = Arena::new();
        assert_eq!(arena.allocate(0), NodeId(0));
        assert_eq!(arena.allocate(0), NodeId(1));
        assert_eq!(arena.allocate(0), NodeId(2));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = Arena::with_chunk_size(2);
        let ids: Vec<NodeId> = (0..5).map(|value| arena.allocate(value)).collect();
        assert_eq!(arena.chunks.len(), 3);
        for (value, id) in ids.into_iter().enumerate() {
            assert_eq!(arena[id], value);
        }
    }

    #[test]
    fn test_free_reuses_slots_lifo() {
        let mut arena = Arena::new();
        let a = arena.allocate(0);
        let b = arena.allocate(1);
        assert_eq!(arena.free(a), 0);
        assert_eq!(arena.free(b), 1);
        assert!(arena.is_empty());
        assert_eq!(arena.allocate(2), b);
        assert_eq!(arena.allocate(3), a);
        assert_eq!(arena.allocate(4), NodeId(2));
    }

    #[test]
    fn test_get_invalid_slot() {
        let arena: Arena<u32> = Arena::new();
        assert_eq!(arena.get(NodeId(0)), None);
    }

    #[test]
    fn test_get_vacant_slot() {
        let mut arena = Arena::new();
        let id = arena.allocate(0);
        arena.free(id);
        assert_eq!(arena.get(id), None);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::new();
        let id = arena.allocate(0);
        *arena.get_mut(id).unwrap() = 1;
        assert_eq!(arena.get(id), Some(&1));
    }

    #[test]
    fn test_clear() {
        let mut arena = Arena::with_chunk_size(2);
        for value in 0..5 {
            arena.allocate(value);
        }
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.allocate(7), NodeId(0));
        assert_eq!(arena.len(), 1);
    }
}
