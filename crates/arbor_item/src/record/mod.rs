//! Ordered heterogeneous records.
//!
//! A [`Record`] is a sequence of [`Item`]s: bare values and keyed fields in
//! insertion order. Items are stored in a vector; keyed lookup goes through
//! a lazily built hash index once a record has enough fields.
//!
//! # Sharing
//!
//! Storage lives behind an `Arc` and is shared between handles until one
//! of them mutates. Mutators take `&mut self` and fork shared storage
//! first, so a mutation through one handle is never visible through
//! another. [`Record::branch`] makes the sharing explicit; the `updated*`
//! family returns a new handle and leaves the receiver untouched.
//!
//! # Commit
//!
//! [`Record::commit`] freezes a record and everything reachable from it.
//! Every mutator on a committed record fails with an immutable error.
//!
//! # Duplicate keys
//!
//! Keyed lookups resolve to the *last* field with a matching key, whether
//! the lookup is served by the index or by a linear scan.

mod cursor;
mod table;
mod view;

pub use cursor::RecordCursor;
pub use view::{RecordView, RecordViewMut};

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use arbor_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use self::table::HashIndex;
use crate::errors::{immutable, index_out_of_bounds, range_out_of_bounds, StructureResult};
use crate::flags::RecordFlags;
use crate::item::ABSENT_ITEM;
use crate::value::ABSENT;
use crate::{Field, FieldKind, Item, Text, Value};

/// Records with fewer fields than this are searched linearly.
const INDEX_THRESHOLD: usize = 8;

/// Smallest capacity a growing record reserves.
const MIN_CAPACITY: usize = 8;

#[derive(Default)]
pub(crate) struct RecordStore {
    items: Vec<Item>,
    field_count: usize,
    index: OnceLock<HashIndex>,
}

impl Clone for RecordStore {
    fn clone(&self) -> Self {
        RecordStore {
            items: self.items.clone(),
            field_count: self.field_count,
            index: OnceLock::new(),
        }
    }
}

impl RecordStore {
    fn from_items(items: Vec<Item>) -> RecordStore {
        let field_count = items.iter().filter(|item| item.is_field()).count();
        RecordStore {
            items,
            field_count,
            index: OnceLock::new(),
        }
    }

    fn lookup(&self, key: &Value) -> Option<usize> {
        if self.field_count == 0 {
            return None;
        }
        if self.field_count < INDEX_THRESHOLD {
            return self
                .items
                .iter()
                .rposition(|item| item.is_field() && item.key() == key);
        }
        self.index
            .get_or_init(|| {
                trace!(fields = self.field_count, "building record index");
                HashIndex::build(&self.items, self.field_count)
            })
            .lookup(&self.items, key)
    }

    fn invalidate(&mut self) {
        self.index.take();
    }

    fn push(&mut self, item: Item) {
        let len = self.items.len();
        if len == self.items.capacity() {
            self.items.reserve_exact(Record::expand(len + 1) - len);
        }
        let is_field = item.is_field();
        self.items.push(item);
        if is_field {
            self.field_count += 1;
            let indexed = self
                .index
                .get_mut()
                .map_or(true, |index| index.try_append(&self.items, len));
            if !indexed {
                self.invalidate();
            }
        }
    }

    fn insert(&mut self, index: usize, item: Item) {
        if item.is_field() {
            self.field_count += 1;
            self.invalidate();
        } else if index < self.items.len() && self.field_count > 0 {
            self.invalidate();
        }
        self.items.insert(index, item);
    }

    fn replace(&mut self, index: usize, item: Item) -> Item {
        let keys_unchanged = match (&self.items[index], &item) {
            (Item::Field(old), Item::Field(new)) => old.key() == new.key(),
            (Item::Value(_), Item::Value(_)) => true,
            _ => false,
        };
        if !keys_unchanged {
            self.invalidate();
        }
        let old = std::mem::replace(&mut self.items[index], item);
        self.field_count = self.field_count + usize::from(self.items[index].is_field())
            - usize::from(old.is_field());
        old
    }

    fn remove(&mut self, index: usize) -> Item {
        let old = self.items.remove(index);
        if old.is_field() {
            self.field_count -= 1;
        }
        if self.field_count > 0 || old.is_field() {
            self.invalidate();
        }
        old
    }

    fn splice(&mut self, start: usize, end: usize, items: Vec<Item>) -> Vec<Item> {
        let removed: Vec<Item> = self.items.splice(start..end, items).collect();
        self.field_count = self.items.iter().filter(|item| item.is_field()).count();
        self.invalidate();
        removed
    }

    fn clear(&mut self) {
        self.items.clear();
        self.field_count = 0;
        self.invalidate();
    }

    /// Set the value of the last field with `key`, or append a new field.
    ///
    /// `kind` of `None` keeps the kind of an existing field and appends
    /// a slot otherwise.
    fn set_field(&mut self, kind: Option<FieldKind>, key: Value, value: Value) {
        match self.lookup(&key) {
            Some(position) => {
                let kind = kind.unwrap_or_else(|| match &self.items[position] {
                    Item::Field(field) => field.kind(),
                    Item::Value(_) => FieldKind::Slot,
                });
                // Same key, so the index stays valid.
                self.items[position] = Item::Field(Field::new(kind, key, value));
            }
            None => {
                let kind = kind.unwrap_or(FieldKind::Slot);
                self.push(Item::Field(Field::new(kind, key, value)));
            }
        }
    }

    fn delete(&mut self, key: &Value) -> Item {
        match self.lookup(key) {
            Some(position) => self.remove(position),
            None => Item::absent(),
        }
    }
}

fn empty_store() -> &'static Arc<RecordStore> {
    static EMPTY: OnceLock<Arc<RecordStore>> = OnceLock::new();
    EMPTY.get_or_init(|| Arc::new(RecordStore::default()))
}

/// An ordered sequence of items with keyed access.
#[derive(Clone)]
pub struct Record {
    store: Arc<RecordStore>,
    flags: RecordFlags,
}

impl Record {
    /// A new, empty, mutable record.
    pub fn new() -> Record {
        Record::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Record {
        Record::from_store(RecordStore {
            items: Vec::with_capacity(capacity),
            ..RecordStore::default()
        })
    }

    /// A mutable record holding `items` in order.
    pub fn of<I: Into<Item>>(items: impl IntoIterator<Item = I>) -> Record {
        Record::from_store(RecordStore::from_items(
            items.into_iter().map(Into::into).collect(),
        ))
    }

    /// The shared committed empty record.
    pub fn empty() -> Record {
        Record {
            store: Arc::clone(empty_store()),
            flags: RecordFlags::IMMUTABLE | RecordFlags::ALIASED,
        }
    }

    fn from_store(store: RecordStore) -> Record {
        Record {
            store: Arc::new(store),
            flags: RecordFlags::empty(),
        }
    }

    /// Capacity a record grows to when it needs room for `n` items:
    /// the next power of two, at least 8.
    pub fn expand(n: usize) -> usize {
        let mut n = n.max(MIN_CAPACITY) - 1;
        let mut shift = 1;
        while shift < usize::BITS {
            n |= n >> shift;
            shift <<= 1;
        }
        n.checked_add(1).unwrap_or(usize::MAX)
    }

    // Reads

    #[inline]
    pub fn len(&self) -> usize {
        self.store.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.items.is_empty()
    }

    pub fn field_count(&self) -> usize {
        self.store.field_count
    }

    pub fn value_count(&self) -> usize {
        self.len() - self.field_count()
    }

    /// No fields. Empty records are both arrays and objects.
    pub fn is_array(&self) -> bool {
        self.field_count() == 0
    }

    /// Only fields.
    pub fn is_object(&self) -> bool {
        self.field_count() == self.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Item] {
        &self.store.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.store.items.iter()
    }

    /// Keys of the fields, in order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().filter(|item| item.is_field()).map(Item::key)
    }

    /// Field values and bare values, in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.iter().map(Item::value)
    }

    /// Key of the first item, if it is an attr.
    pub fn tag(&self) -> Option<&Text> {
        match self.store.items.first() {
            Some(Item::Field(field)) if field.is_attr() => field.key().as_text(),
            _ => None,
        }
    }

    /// First item, or `Absent`.
    pub fn head(&self) -> &Item {
        self.store.items.first().unwrap_or(&ABSENT_ITEM)
    }

    /// Every item after the first.
    pub fn tail(&self) -> RecordView<'_> {
        RecordView::new(self, self.len().min(1), self.len())
    }

    /// The tail as a value: a record for several items, the item's value
    /// for one, `Extant` for none.
    pub fn body(&self) -> Value {
        match self.as_slice() {
            [] | [_] => Value::Extant,
            [_, Item::Value(value)] => value.clone(),
            [_, field @ Item::Field(_)] => Value::Record(Record::of([field.clone()])),
            [_, rest @ ..] => Value::Record(Record::of(rest.iter().cloned())),
        }
    }

    pub fn get_item(&self, index: usize) -> Option<&Item> {
        self.store.items.get(index)
    }

    /// Position of the last field with `key`.
    pub fn index_of(&self, key: impl Into<Value>) -> Option<usize> {
        self.store.lookup(&key.into())
    }

    pub fn has(&self, key: impl Into<Value>) -> bool {
        self.index_of(key).is_some()
    }

    pub fn get_field(&self, key: impl Into<Value>) -> Option<&Field> {
        self.index_of(key)
            .and_then(|position| self.store.items[position].as_field())
    }

    /// Value of the last field with `key`, or `Absent`.
    pub fn get(&self, key: impl Into<Value>) -> &Value {
        self.get_field(key).map_or(&ABSENT, Field::value)
    }

    /// Value of the last field with `key` if that field is an attr.
    pub fn get_attr(&self, key: impl Into<Text>) -> &Value {
        match self.get_field(Value::Text(key.into())) {
            Some(field) if field.is_attr() => field.value(),
            _ => &ABSENT,
        }
    }

    /// Value of the last field with `key` if that field is a slot.
    pub fn get_slot(&self, key: impl Into<Value>) -> &Value {
        match self.get_field(key) {
            Some(field) if field.is_slot() => field.value(),
            _ => &ABSENT,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }

    /// The simplest value equivalent to this record: `Extant` when
    /// empty, the value itself for a lone bare value.
    pub fn flattened(&self) -> Value {
        match self.as_slice() {
            [] => Value::Extant,
            [Item::Value(value)] => value.clone(),
            _ => self.to_value(),
        }
    }

    pub fn unflattened(&self) -> Record {
        self.clone()
    }

    /// Read-only window over the whole record.
    pub fn view(&self) -> RecordView<'_> {
        RecordView::new(self, 0, self.len())
    }

    /// Read-only window over `[lower, upper)`.
    pub fn sub_record(&self, lower: usize, upper: usize) -> StructureResult<RecordView<'_>> {
        self.check_range(lower, upper)?;
        Ok(RecordView::new(self, lower, upper))
    }

    /// Mutable window over `[lower, upper)`.
    pub fn view_mut(&mut self, lower: usize, upper: usize) -> StructureResult<RecordViewMut<'_>> {
        self.check_range(lower, upper)?;
        Ok(RecordViewMut::new(self, lower, upper))
    }

    /// Cursor positioned before the first item.
    pub fn cursor(&mut self) -> RecordCursor<'_> {
        let len = self.len();
        RecordCursor::new(self, 0, len)
    }

    fn check_range(&self, lower: usize, upper: usize) -> StructureResult<()> {
        if lower > upper || upper > self.len() {
            return Err(range_out_of_bounds(lower, upper, self.len()));
        }
        Ok(())
    }

    // Sharing and commit

    pub fn flags(&self) -> RecordFlags {
        self.flags
    }

    pub fn is_immutable(&self) -> bool {
        self.flags.contains(RecordFlags::IMMUTABLE)
    }

    pub fn is_mutable(&self) -> bool {
        !self.is_immutable()
    }

    /// Whether the storage is, or may be, shared with another handle.
    pub fn is_aliased(&self) -> bool {
        self.flags.contains(RecordFlags::ALIASED) || Arc::strong_count(&self.store) > 1
    }

    /// Mark the storage as shared; the next mutation works on a copy.
    pub fn alias(&mut self) {
        self.flags.insert(RecordFlags::ALIASED);
    }

    /// A mutable handle sharing this record's storage.
    pub fn branch(&self) -> Record {
        Record {
            store: Arc::clone(&self.store),
            flags: RecordFlags::ALIASED,
        }
    }

    /// Freeze this record and everything reachable from it. Idempotent.
    pub fn commit(&mut self) -> &mut Self {
        if self.is_immutable() {
            return self;
        }
        debug!(len = self.len(), "committing record");
        ensure_sufficient_stack(|| {
            for item in &mut self.fork_storage().items {
                item.commit();
            }
        });
        self.flags.insert(RecordFlags::IMMUTABLE);
        self
    }

    fn fork_storage(&mut self) -> &mut RecordStore {
        self.flags.remove(RecordFlags::ALIASED);
        if Arc::get_mut(&mut self.store).is_none() {
            trace!(len = self.store.items.len(), "forking shared record storage");
        }
        Arc::make_mut(&mut self.store)
    }

    fn store_mut(&mut self) -> StructureResult<&mut RecordStore> {
        if self.is_immutable() {
            return Err(immutable());
        }
        Ok(self.fork_storage())
    }

    // Mutators

    /// Append an item. Returns the new length.
    pub fn push(&mut self, item: impl Into<Item>) -> StructureResult<usize> {
        let store = self.store_mut()?;
        store.push(item.into());
        Ok(store.items.len())
    }

    pub fn push_all<I: Into<Item>>(
        &mut self,
        items: impl IntoIterator<Item = I>,
    ) -> StructureResult<usize> {
        let store = self.store_mut()?;
        for item in items {
            store.push(item.into());
        }
        Ok(store.items.len())
    }

    pub fn insert(&mut self, index: usize, item: impl Into<Item>) -> StructureResult<()> {
        let len = self.len();
        if index > len {
            return Err(index_out_of_bounds(index, len));
        }
        self.store_mut()?.insert(index, item.into());
        Ok(())
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set_item(&mut self, index: usize, item: impl Into<Item>) -> StructureResult<Item> {
        let len = self.len();
        if index >= len {
            return Err(index_out_of_bounds(index, len));
        }
        Ok(self.store_mut()?.replace(index, item.into()))
    }

    /// Remove `delete_count` items at `start` and insert `items` there.
    /// Out-of-range bounds are clamped.
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
        Ok(self.store_mut()?.splice(start, end, items))
    }

    pub fn remove(&mut self, index: usize) -> StructureResult<Item> {
        let len = self.len();
        if index >= len {
            return Err(index_out_of_bounds(index, len));
        }
        Ok(self.store_mut()?.remove(index))
    }

    /// Remove the last field with `key`. Returns `Absent` if there is none.
    pub fn delete(&mut self, key: impl Into<Value>) -> StructureResult<Item> {
        let key = key.into();
        Ok(self.store_mut()?.delete(&key))
    }

    pub fn clear(&mut self) -> StructureResult<()> {
        self.store_mut()?.clear();
        Ok(())
    }

    /// Set the value of the last field with `key`, appending a slot if
    /// there is none. The existing field keeps its kind.
    pub fn set(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> StructureResult<&mut Self> {
        self.store_mut()?.set_field(None, key.into(), value.into());
        Ok(self)
    }

    /// Like [`set`](Self::set), forcing the field to be an attr.
    pub fn set_attr(
        &mut self,
        key: impl Into<Text>,
        value: impl Into<Value>,
    ) -> StructureResult<&mut Self> {
        self.store_mut()?
            .set_field(Some(FieldKind::Attr), Value::Text(key.into()), value.into());
        Ok(self)
    }

    /// Like [`set`](Self::set), forcing the field to be a slot.
    pub fn set_slot(
        &mut self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> StructureResult<&mut Self> {
        self.store_mut()?
            .set_field(Some(FieldKind::Slot), key.into(), value.into());
        Ok(self)
    }

    // Value semantics. These never fail: they work on a fresh branch.

    fn derive(&self, f: impl FnOnce(&mut RecordStore)) -> Record {
        let mut branch = self.branch();
        f(branch.fork_storage());
        branch
    }

    #[must_use]
    pub fn updated(&self, key: impl Into<Value>, value: impl Into<Value>) -> Record {
        let (key, value) = (key.into(), value.into());
        self.derive(|store| store.set_field(None, key, value))
    }

    #[must_use]
    pub fn updated_attr(&self, key: impl Into<Text>, value: impl Into<Value>) -> Record {
        let (key, value) = (Value::Text(key.into()), value.into());
        self.derive(|store| store.set_field(Some(FieldKind::Attr), key, value))
    }

    #[must_use]
    pub fn updated_slot(&self, key: impl Into<Value>, value: impl Into<Value>) -> Record {
        let (key, value) = (key.into(), value.into());
        self.derive(|store| store.set_field(Some(FieldKind::Slot), key, value))
    }

    #[must_use]
    pub fn appended<I: Into<Item>>(&self, items: impl IntoIterator<Item = I>) -> Record {
        self.derive(|store| {
            for item in items {
                store.push(item.into());
            }
        })
    }

    #[must_use]
    pub fn prepended<I: Into<Item>>(&self, items: impl IntoIterator<Item = I>) -> Record {
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();
        self.derive(|store| {
            store.splice(0, 0, items);
        })
    }

    #[must_use]
    pub fn removed(&self, key: impl Into<Value>) -> Record {
        let key = key.into();
        self.derive(|store| {
            store.delete(&key);
        })
    }

    #[must_use]
    pub fn concat(&self, that: &Record) -> Record {
        self.appended(that.iter().cloned())
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store) || self.store.items == other.store.items
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.store.items.hash(state);
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.store.items.cmp(&other.store.items)
    }
}

impl<I: Into<Item>> FromIterator<I> for Record {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Record::of(iter)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
