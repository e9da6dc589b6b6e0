//! Open-addressing key index over a record's fields.
//!
//! Slots hold positions into the item vector. Probing is linear from
//! `hash & mask`. Inserting a key that is already present overwrites the
//! slot, so lookups resolve to the last field with that key. The table is
//! never resized: when it fills past its load factor it is dropped and
//! rebuilt lazily by the next keyed lookup.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::{Item, Value};

pub(crate) struct HashIndex {
    slots: Box<[Option<usize>]>,
    len: usize,
}

/// Slot count for `field_count` keys: a power of two at least
/// `field_count * 10 / 7`, rounded up.
pub(crate) fn index_capacity(field_count: usize) -> usize {
    field_count
        .max((field_count * 10).div_ceil(7))
        .max(1)
        .next_power_of_two()
}

fn hash_key(key: &Value) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "only the low bits select a slot"
    )]
    let hash = hasher.finish() as usize;
    hash
}

impl HashIndex {
    /// Index every field of `items`.
    pub(crate) fn build(items: &[Item], field_count: usize) -> HashIndex {
        let mut index = HashIndex {
            slots: vec![None; index_capacity(field_count)].into_boxed_slice(),
            len: 0,
        };
        for (position, item) in items.iter().enumerate() {
            if let Item::Field(field) = item {
                index.put(items, field.key(), position);
            }
        }
        index
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    fn put(&mut self, items: &[Item], key: &Value, position: usize) {
        let mask = self.mask();
        let mut slot = hash_key(key) & mask;
        loop {
            match self.slots[slot] {
                None => {
                    self.slots[slot] = Some(position);
                    self.len += 1;
                    return;
                }
                Some(existing) if items[existing].key() == key => {
                    self.slots[slot] = Some(position);
                    return;
                }
                Some(_) => slot = (slot + 1) & mask,
            }
        }
    }

    /// Record a field appended at `position`. Returns `false` when the
    /// table is too full and must be rebuilt.
    pub(crate) fn try_append(&mut self, items: &[Item], position: usize) -> bool {
        let Item::Field(field) = &items[position] else {
            return true;
        };
        if (self.len + 1) * 10 > self.slots.len() * 7 {
            return false;
        }
        self.put(items, field.key(), position);
        true
    }

    /// Position of the last field with `key`.
    pub(crate) fn lookup(&self, items: &[Item], key: &Value) -> Option<usize> {
        let mask = self.mask();
        let mut slot = hash_key(key) & mask;
        loop {
            let position = self.slots[slot]?;
            if items[position].key() == key {
                return Some(position);
            }
            slot = (slot + 1) & mask;
        }
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }
}
