//! Entity arena with a free list
//!
//! Slots are never destroyed, only recycled. Callers hold [`Handle`]s; a handle
//! carries the slot generation so a stale handle (released, then the slot
//! reused) can't reach the new occupant.

use super::entity::Entity;

/// Reference to an in-use pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Debug)]
struct Slot<T> {
    entity: T,
    generation: u32,
    in_use: bool,
}

/// Pre-allocated, growable store of entities of one kind
#[derive(Debug)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    /// Indices of available slots (popped from the back)
    free: Vec<u32>,
    in_use: usize,
}

impl<T: Entity> Default for EntityPool<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: Entity> EntityPool<T> {
    /// Create a pool with `initial` available entities
    pub fn with_capacity(initial: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(initial),
            free: Vec::with_capacity(initial),
            in_use: 0,
        };
        for _ in 0..initial {
            let index = pool.push_slot();
            pool.free.push(index);
        }
        // Pop order follows allocation order
        pool.free.reverse();
        pool
    }

    fn push_slot(&mut self) -> u32 {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            entity: T::default(),
            generation: 0,
            in_use: false,
        });
        index
    }

    /// Allocate `ceil(in_use / 2)` slots (at least one). One of the new slots
    /// is returned directly, the rest go on the free list.
    fn grow(&mut self) -> u32 {
        let count = self.in_use.div_ceil(2).max(1);
        log::debug!(
            "Pool grow: +{} (in use {}, total {})",
            count,
            self.in_use,
            self.slots.len() + count
        );

        let first = self.push_slot();
        let start = self.slots.len();
        for _ in 1..count {
            self.push_slot();
        }
        self.free
            .extend((start..self.slots.len()).rev().map(|i| i as u32));
        first
    }

    /// Take an entity in its reset state. Never fails; grows when empty.
    pub fn acquire(&mut self) -> Handle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => self.grow(),
        };
        let slot = &mut self.slots[index as usize];
        slot.in_use = true;
        self.in_use += 1;
        Handle {
            index,
            generation: slot.generation,
        }
    }

    /// Return an entity to the pool. Releasing anything that isn't currently
    /// in use (double release, stale handle) is a no-op and returns false.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if !slot.in_use || slot.generation != handle.generation {
            return false;
        }
        Self::reclaim(slot);
        self.free.push(handle.index);
        self.in_use -= 1;
        true
    }

    /// Reset and reclaim every in-use entity
    pub fn release_all(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.in_use {
                Self::reclaim(slot);
                self.free.push(index as u32);
            }
        }
        self.in_use = 0;
    }

    fn reclaim(slot: &mut Slot<T>) {
        slot.entity.reset();
        slot.in_use = false;
        slot.generation = slot.generation.wrapping_add(1);
    }

    /// Release every in-use entity matching `pred`; returns how many were released
    pub fn release_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.in_use && pred(&slot.entity) {
                Self::reclaim(slot);
                self.free.push(index as u32);
                released += 1;
            }
        }
        self.in_use -= released;
        released
    }

    pub fn is_in_use(&self, handle: Handle) -> bool {
        self.slots
            .get(handle.index())
            .is_some_and(|s| s.in_use && s.generation == handle.generation)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index())
            .filter(|s| s.in_use && s.generation == handle.generation)
            .map(|s| &s.entity)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index())
            .filter(|s| s.in_use && s.generation == handle.generation)
            .map(|s| &mut s.entity)
    }

    /// In-use entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.in_use).map(|(i, s)| {
            (
                Handle {
                    index: i as u32,
                    generation: s.generation,
                },
                &s.entity,
            )
        })
    }

    /// In-use entities in slot order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.in_use)
            .map(|(i, s)| {
                (
                    Handle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    &mut s.entity,
                )
            })
    }

    #[inline]
    pub fn available_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn in_use_count(&self) -> usize {
        self.in_use
    }

    #[inline]
    pub fn total_count(&self) -> usize {
        self.slots.len()
    }
}
