/// Stable reference to an entity stored in an [`EntityPool`].
///
/// A handle goes stale once its entity is removed; the slot's generation is
/// bumped so a later occupant is never mistaken for the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Owning collection of entities indexed by generational handles.
///
/// Iteration visits live entities in insertion order regardless of which
/// slots they occupy.
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<Handle>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityPool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, value: T) -> Handle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        };
        self.order.push(handle);
        handle
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Remove and return the entity. Stale handles return `None`.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let value = self.release(handle)?;
        self.order.retain(|&h| h != handle);
        Some(value)
    }

    fn release(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Some(value)
    }

    /// Keep only entities for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        let mut order = std::mem::take(&mut self.order);
        order.retain(|&handle| {
            let alive = self.get(handle).is_some_and(&mut keep);
            if !alive {
                self.release(handle);
            }
            alive
        });
        self.order = order;
    }

    pub fn clear(&mut self) {
        let order = std::mem::take(&mut self.order);
        for handle in order {
            self.release(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live entities with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.order.iter().filter_map(|&handle| {
            self.get(handle).map(|value| (handle, value))
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Mutable access to every live entity, in insertion order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        for &handle in &self.order {
            if let Some(slot) = self.slots.get_mut(handle.index as usize)
                && let Some(value) = slot.value.as_mut()
            {
                f(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut pool = EntityPool::new();
        let a = pool.insert("a");
        let b = pool.insert("b");
        assert_eq!(pool.get(a), Some(&"a"));
        assert_eq!(pool.get(b), Some(&"b"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_removed_handle_goes_stale() {
        let mut pool = EntityPool::new();
        let a = pool.insert(1);
        assert_eq!(pool.remove(a), Some(1));
        assert_eq!(pool.get(a), None);
        assert_eq!(pool.remove(a), None);

        // slot is reused, old handle still stale
        let b = pool.insert(2);
        assert_ne!(a, b);
        assert_eq!(pool.get(a), None);
        assert_eq!(pool.get(b), Some(&2));
    }

    #[test]
    fn test_iteration_keeps_insertion_order_across_slot_reuse() {
        let mut pool = EntityPool::new();
        let a = pool.insert('a');
        pool.insert('b');
        pool.insert('c');
        pool.remove(a);
        pool.insert('d');
        let values: Vec<char> = pool.values().copied().collect();
        assert_eq!(values, vec!['b', 'c', 'd']);
    }

    #[test]
    fn test_retain_preserves_order_and_frees_slots() {
        let mut pool = EntityPool::new();
        let handles: Vec<Handle> = (0..6).map(|i| pool.insert(i)).collect();
        pool.retain(|&v| v % 2 == 0);
        let values: Vec<i32> = pool.values().copied().collect();
        assert_eq!(values, vec![0, 2, 4]);
        assert!(!pool.contains(handles[1]));
        assert!(pool.contains(handles[2]));
    }

    #[test]
    fn test_clear_empties_pool() {
        let mut pool = EntityPool::new();
        let a = pool.insert(1);
        pool.insert(2);
        pool.clear();
        assert!(pool.is_empty());
        assert!(!pool.contains(a));
    }

    #[test]
    fn test_for_each_mut_updates_all() {
        let mut pool = EntityPool::new();
        pool.insert(1);
        pool.insert(2);
        pool.for_each_mut(|v| *v *= 10);
        let values: Vec<i32> = pool.values().copied().collect();
        assert_eq!(values, vec![10, 20]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_pool_matches_vec_model(
                ops in prop::collection::vec((prop::bool::ANY, 0usize..16), 0..100)
            ) {
                let mut pool = EntityPool::new();
                let mut model: Vec<(Handle, usize)> = Vec::new();
                for (step, (insert, pick)) in ops.into_iter().enumerate() {
                    if insert || model.is_empty() {
                        let handle = pool.insert(step);
                        model.push((handle, step));
                    } else {
                        let (handle, value) = model.remove(pick % model.len());
                        prop_assert_eq!(pool.remove(handle), Some(value));
                    }
                    let expected: Vec<usize> = model.iter().map(|&(_, v)| v).collect();
                    let actual: Vec<usize> = pool.values().copied().collect();
                    prop_assert_eq!(actual, expected);
                }
            }
        }
    }
}
