//! Windows over a contiguous range of a record.

use crate::errors::{index_out_of_bounds, StructureResult};
use crate::item::ABSENT_ITEM;
use crate::value::ABSENT;
use crate::{Field, FieldKind, Item, Record, Text, Value};

/// Borrowed read-only window `[lower, upper)` over a record.
///
/// Keyed reads only see fields inside the window and, like the record
/// itself, resolve duplicates to the last match.
#[derive(Clone, Copy)]
pub struct RecordView<'a> {
    record: &'a Record,
    lower: usize,
    upper: usize,
}

impl<'a> RecordView<'a> {
    pub(crate) fn new(record: &'a Record, lower: usize, upper: usize) -> Self {
        RecordView {
            record,
            lower,
            upper,
        }
    }

    pub fn lower(&self) -> usize {
        self.lower
    }

    pub fn upper(&self) -> usize {
        self.upper
    }

    pub fn as_slice(&self) -> &'a [Item] {
        &self.record.as_slice()[self.lower..self.upper]
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Item> {
        self.as_slice().iter()
    }

    pub fn field_count(&self) -> usize {
        self.iter().filter(|item| item.is_field()).count()
    }

    pub fn head(&self) -> &'a Item {
        self.as_slice().first().unwrap_or(&ABSENT_ITEM)
    }

    /// Item at a position relative to the window.
    pub fn get_item(&self, index: usize) -> Option<&'a Item> {
        self.as_slice().get(index)
    }

    /// Window-relative position of the last field with `key`.
    pub fn index_of(&self, key: impl Into<Value>) -> Option<usize> {
        let key = key.into();
        self.as_slice()
            .iter()
            .rposition(|item| item.is_field() && *item.key() == key)
    }

    pub fn has(&self, key: impl Into<Value>) -> bool {
        self.index_of(key).is_some()
    }

    pub fn get_field(&self, key: impl Into<Value>) -> Option<&'a Field> {
        self.index_of(key)
            .and_then(|index| self.as_slice()[index].as_field())
    }

    pub fn get(&self, key: impl Into<Value>) -> &'a Value {
        self.get_field(key).map_or(&ABSENT, Field::value)
    }

    /// Copy the window into a new record.
    pub fn to_record(&self) -> Record {
        Record::of(self.iter().cloned())
    }
}

impl<'a> IntoIterator for RecordView<'a> {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowed mutable window `[lower, upper)` over a record.
///
/// Positions are relative to the window. Mutations go through the backing
/// record, so they fork shared storage and fail on committed records the
/// same way.
pub struct RecordViewMut<'a> {
    record: &'a mut Record,
    lower: usize,
    upper: usize,
}

impl<'a> RecordViewMut<'a> {
    pub(crate) fn new(record: &'a mut Record, lower: usize, upper: usize) -> Self {
        RecordViewMut {
            record,
            lower,
            upper,
        }
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    pub fn as_view(&self) -> RecordView<'_> {
        RecordView::new(self.record, self.lower, self.upper)
    }

    pub fn get_item(&self, index: usize) -> Option<&Item> {
        self.record.as_slice()[self.lower..self.upper].get(index)
    }

    fn check_index(&self, index: usize, inclusive: bool) -> StructureResult<()> {
        let len = self.len();
        if index > len || (index == len && !inclusive) {
            return Err(index_out_of_bounds(index, len));
        }
        Ok(())
    }

    /// Append at the end of the window. Returns the window length.
    pub fn push(&mut self, item: impl Into<Item>) -> StructureResult<usize> {
        self.record.insert(self.upper, item)?;
        self.upper += 1;
        Ok(self.len())
    }

    pub fn insert(&mut self, index: usize, item: impl Into<Item>) -> StructureResult<()> {
        self.check_index(index, true)?;
        self.record.insert(self.lower + index, item)?;
        self.upper += 1;
        Ok(())
    }

    pub fn set_item(&mut self, index: usize, item: impl Into<Item>) -> StructureResult<Item> {
        self.check_index(index, false)?;
        self.record.set_item(self.lower + index, item)
    }

    pub fn remove(&mut self, index: usize) -> StructureResult<Item> {
        self.check_index(index, false)?;
        let removed = self.record.remove(self.lower + index)?;
        self.upper -= 1;
        Ok(removed)
    }

    /// Remove `delete_count` items at `start` and insert `items` there,
    /// with bounds clamped to the window.
    pub fn splice<I: Into<Item>>(
        &mut self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = I>,
    ) -> StructureResult<Vec<Item>> {
        let len = self.len();
        let start = start.min(len);
        let end = start.saturating_add(delete_count).min(len);
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();
        let inserted = items.len();
        let removed = self.record.splice(self.lower + start, end - start, items)?;
        self.upper = self.upper - removed.len() + inserted;
        Ok(removed)
    }

    /// Remove every item in the window.
    pub fn clear(&mut self) -> StructureResult<()> {
        self.splice(0, self.len(), std::iter::empty::<Item>())?;
        Ok(())
    }

    /// Remove the last field in the window with `key`. Returns `Absent` if
    /// there is none.
    pub fn delete(&mut self, key: impl Into<Value>) -> StructureResult<Item> {
        match self.as_view().index_of(key) {
            Some(index) => self.remove(index),
            None => Ok(Item::absent()),
        }
    }

    fn set_field(
        &mut self,
        kind: Option<FieldKind>,
        key: Value,
        value: Value,
    ) -> StructureResult<&mut Self> {
        match self.as_view().index_of(key.clone()) {
            Some(index) => {
                let kind = kind.unwrap_or_else(|| match self.get_item(index) {
                    Some(Item::Field(field)) => field.kind(),
                    _ => FieldKind::Slot,
                });
                self.set_item(index, Field::new(kind, key, value))?;
            }
            None => {
                let kind = kind.unwrap_or(FieldKind::Slot);
                self.push(Field::new(kind, key, value))?;
            }
        }
        Ok(self)
    }

    /// Set the value of the last field in the window with `key`, appending
    /// a slot at the end of the window if there is none.
    pub fn set(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> StructureResult<&mut Self> {
        self.set_field(None, key.into(), value.into())
    }

    pub fn set_attr(
        &mut self,
        key: impl Into<Text>,
        value: impl Into<Value>,
    ) -> StructureResult<&mut Self> {
        self.set_field(Some(FieldKind::Attr), Value::Text(key.into()), value.into())
    }

    pub fn set_slot(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> StructureResult<&mut Self> {
        self.set_field(Some(FieldKind::Slot), key.into(), value.into())
    }
}
