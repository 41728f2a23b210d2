//! Fixed-capacity slot arenas.
//!
//! All slots are allocated up front and never resized. Creating an entity
//! overwrites a slot; destroying one clears its active flag.

use crate::sprite::Body;

#[derive(Clone, Debug)]
pub struct Pool<T, const N: usize> {
    slots: [T; N],
    cursor: usize,
}

impl<T: Default, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self {
            slots: core::array::from_fn(|_| T::default()),
            cursor: 0,
        }
    }
}

impl<T: Body, const N: usize> Pool<T, N> {
    pub fn new() -> Self
    where
        T: Default,
    {
        Self::default()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        N
    }

    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// Round-robin claim. The cursor advances before use, so a fresh pool
    /// hands out slot 1 first. The slot is returned even if active.
    pub fn claim_next(&mut self) -> (usize, &mut T) {
        self.cursor = (self.cursor + 1) % N;
        (self.cursor, &mut self.slots[self.cursor])
    }

    /// First inactive slot scanning from zero.
    pub fn claim_inactive(&mut self) -> Option<(usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.is_active())
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
    }

    pub fn for_each_active(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_active() {
                f(index, slot);
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Sprite;

    type SpritePool = Pool<Sprite, 4>;

    #[test]
    fn claim_next_increments_before_use_and_wraps() {
        let mut pool = SpritePool::new();
        let order: Vec<usize> = (0..6).map(|_| pool.claim_next().0).collect();
        assert_eq!(order, vec![1, 2, 3, 0, 1, 2]);
    }

    #[test]
    fn claim_next_overwrites_active_slots() {
        let mut pool = SpritePool::new();
        for _ in 0..4 {
            pool.claim_next().1.active = true;
        }
        assert_eq!(pool.active_count(), 4);
        let (index, slot) = pool.claim_next();
        assert_eq!(index, 1);
        assert!(slot.active);
    }

    #[test]
    fn claim_inactive_scans_from_zero() {
        let mut pool = SpritePool::new();
        pool.get_mut(0).expect("slot").active = true;
        pool.get_mut(2).expect("slot").active = true;
        assert_eq!(pool.claim_inactive().map(|(i, _)| i), Some(1));

        for i in 0..4 {
            pool.get_mut(i).expect("slot").active = true;
        }
        assert!(pool.claim_inactive().is_none());
    }

    #[test]
    fn active_iteration_is_in_index_order() {
        let mut pool = SpritePool::new();
        pool.get_mut(3).expect("slot").active = true;
        pool.get_mut(1).expect("slot").active = true;
        let seen: Vec<usize> = pool.iter_active().map(|(i, _)| i).collect();
        assert_eq!(seen, vec![1, 3]);

        let mut visited = Vec::new();
        pool.for_each_active(|i, slot| {
            visited.push(i);
            slot.x += 1.0;
        });
        assert_eq!(visited, vec![1, 3]);
        assert_eq!(pool.get(0).expect("slot").x, 0.0);
        assert_eq!(pool.get(1).expect("slot").x, 1.0);

        pool.deactivate_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 4);
    }
}
