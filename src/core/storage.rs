use crate::core::EntityHandle;
use crate::error::SimulationError;
use crate::Result;

/// Ordered storage for the children of a grid.
///
/// Items keep their insertion order, which is also the order they are
/// updated in. Handles are never reused within one storage.
#[derive(Debug)]
pub struct ChildStorage<T> {
    items: Vec<(EntityHandle, T)>,
    next_id: u32,
}

/// One slot being updated, with shared views of the slots around it
pub struct SplitSlot<'a, T> {
    /// Handle of the slot being updated
    pub handle: EntityHandle,

    /// The item being updated
    pub item: &'a mut T,

    /// Slots inserted before this one
    pub before: &'a [(EntityHandle, T)],

    /// Slots inserted after this one
    pub after: &'a [(EntityHandle, T)],
}

impl<T> ChildStorage<T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
        }
    }

    /// Appends an item and returns its handle
    pub fn add(&mut self, item: T) -> EntityHandle {
        let handle = EntityHandle(self.next_id);
        self.next_id += 1;
        self.items.push((handle, item));
        handle
    }

    /// Gets a reference to an item by its handle
    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        self.items
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, item)| item)
    }

    /// Gets a mutable reference to an item by its handle
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.items
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, item)| item)
    }

    /// Removes an item, preserving the order of the remaining ones
    pub fn remove(&mut self, handle: EntityHandle) -> Option<T> {
        let index = self.position(handle)?;
        Some(self.items.remove(index).1)
    }

    /// Returns the index of a handle in insertion order
    pub fn position(&self, handle: EntityHandle) -> Option<usize> {
        self.items.iter().position(|(h, _)| *h == handle)
    }

    /// Returns the number of items in the storage
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns all handles in insertion order
    pub fn handles(&self) -> Vec<EntityHandle> {
        self.items.iter().map(|(h, _)| *h).collect()
    }

    /// Iterates over all items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &T)> + '_ {
        self.items.iter().map(|(h, item)| (*h, item))
    }

    /// Iterates mutably over all items in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut T)> + '_ {
        self.items.iter_mut().map(|(h, item)| (*h, item))
    }

    /// Borrows the slot at `index` mutably and every other slot immutably
    pub fn split_slot(&mut self, index: usize) -> Option<SplitSlot<'_, T>> {
        if index >= self.items.len() {
            return None;
        }

        let (before, rest) = self.items.split_at_mut(index);
        let (current, after) = rest.split_first_mut()?;

        Some(SplitSlot {
            handle: current.0,
            item: &mut current.1,
            before,
            after,
        })
    }

    /// Gets an item by its handle, returning an error if not found
    pub fn get_child(&self, handle: EntityHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| SimulationError::ResourceNotFound(format!("Child with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to an item by its handle, returning an error if not found
    pub fn get_child_mut(&mut self, handle: EntityHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| SimulationError::ResourceNotFound(format!("Child with handle {:?} not found", handle)))
    }
}

impl<T> Default for ChildStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
