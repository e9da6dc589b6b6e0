//! Bidirectional cursor over a record.

use crate::errors::{index_out_of_bounds, StructureResult};
use crate::{Item, Record};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// A position between items of a record window.
///
/// `set` and `remove` act on the item most recently returned by `next`
/// or `previous`.
pub struct RecordCursor<'a> {
    record: &'a mut Record,
    lower: usize,
    upper: usize,
    index: usize,
    last: Option<Direction>,
}

impl<'a> RecordCursor<'a> {
    pub(crate) fn new(record: &'a mut Record, lower: usize, upper: usize) -> Self {
        RecordCursor {
            record,
            lower,
            upper,
            index: lower,
            last: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    pub fn has_next(&self) -> bool {
        self.index < self.upper
    }

    pub fn has_previous(&self) -> bool {
        self.index > self.lower
    }

    /// Window-relative index of the item `next` would return.
    pub fn next_index(&self) -> usize {
        self.index - self.lower
    }

    /// Window-relative index of the item `previous` would return, or
    /// `None` at the start.
    pub fn previous_index(&self) -> Option<usize> {
        self.next_index().checked_sub(1)
    }

    pub fn previous(&mut self) -> Option<Item> {
        if !self.has_previous() {
            return None;
        }
        self.index -= 1;
        self.last = Some(Direction::Backward);
        self.record.get_item(self.index).cloned()
    }

    /// Move forward over at most `count` items.
    pub fn advance(&mut self, count: usize) {
        self.index = self.index.saturating_add(count).min(self.upper);
        self.last = None;
    }

    fn current(&self) -> StructureResult<usize> {
        match self.last {
            Some(Direction::Forward) => Ok(self.index - 1),
            Some(Direction::Backward) => Ok(self.index),
            None => Err(index_out_of_bounds(self.next_index(), self.upper - self.lower)),
        }
    }

    /// Replace the item last returned.
    pub fn set(&mut self, item: impl Into<Item>) -> StructureResult<Item> {
        let position = self.current()?;
        self.record.set_item(position, item)
    }

    /// Remove the item last returned.
    pub fn remove(&mut self) -> StructureResult<Item> {
        let position = self.current()?;
        let removed = self.record.remove(position)?;
        if self.last == Some(Direction::Forward) {
            self.index -= 1;
        }
        self.upper -= 1;
        self.last = None;
        Ok(removed)
    }

    /// Insert before the cursor; `next` is unaffected.
    pub fn insert(&mut self, item: impl Into<Item>) -> StructureResult<()> {
        self.record.insert(self.index, item)?;
        self.index += 1;
        self.upper += 1;
        self.last = None;
        Ok(())
    }
}

impl Iterator for RecordCursor<'_> {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        if !self.has_next() {
            return None;
        }
        let item = self.record.get_item(self.index).cloned()?;
        self.index += 1;
        self.last = Some(Direction::Forward);
        Some(item)
    }
}
