//! Key/value members of a record.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::errors::{immutable, StructureResult};
use crate::flags::FieldFlags;
use crate::{Text, Value};

/// Whether a field is metadata (`Attr`) or data (`Slot`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    /// Attribute, written `@key`. Keys are text.
    Attr,
    /// Ordinary keyed member. Keys may be any value.
    Slot,
}

/// A keyed member of a record.
///
/// The key is committed on construction; only the value can change, and
/// only until the field itself is committed.
#[derive(Clone)]
pub struct Field {
    kind: FieldKind,
    key: Value,
    value: Value,
    flags: FieldFlags,
}

impl Field {
    pub fn new(kind: FieldKind, key: impl Into<Value>, value: impl Into<Value>) -> Field {
        let mut key = key.into();
        key.commit();
        Field {
            kind,
            key,
            value: value.into(),
            flags: FieldFlags::empty(),
        }
    }

    pub fn attr(key: impl Into<Text>, value: impl Into<Value>) -> Field {
        Field::new(FieldKind::Attr, Value::Text(key.into()), value)
    }

    pub fn slot(key: impl Into<Value>, value: impl Into<Value>) -> Field {
        Field::new(FieldKind::Slot, key, value)
    }

    /// A slot, or an attr when the key is text starting with `@`.
    pub fn of(key: impl Into<Value>, value: impl Into<Value>) -> Field {
        match key.into() {
            Value::Text(text) if text.starts_with('@') => Field::attr(&text[1..], value),
            key => Field::slot(key, value),
        }
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_attr(&self) -> bool {
        self.kind == FieldKind::Attr
    }

    pub fn is_slot(&self) -> bool {
        self.kind == FieldKind::Slot
    }

    #[inline]
    pub fn key(&self) -> &Value {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    pub fn is_immutable(&self) -> bool {
        self.flags.contains(FieldFlags::IMMUTABLE)
    }

    /// Replace the value in place.
    pub fn set_value(&mut self, value: impl Into<Value>) -> StructureResult<()> {
        if self.is_immutable() {
            return Err(immutable());
        }
        self.value = value.into();
        Ok(())
    }

    pub fn value_mut(&mut self) -> StructureResult<&mut Value> {
        if self.is_immutable() {
            return Err(immutable());
        }
        Ok(&mut self.value)
    }

    /// A mutable copy of this field holding `value`.
    pub fn updated_value(&self, value: impl Into<Value>) -> Field {
        Field {
            kind: self.kind,
            key: self.key.clone(),
            value: value.into(),
            flags: FieldFlags::empty(),
        }
    }

    /// The same key and value under another kind. Attr keys must be text,
    /// so a non-text key always yields a slot.
    pub fn with_kind(&self, kind: FieldKind) -> Field {
        let kind = if self.key.as_text().is_some() {
            kind
        } else {
            FieldKind::Slot
        };
        Field {
            kind,
            key: self.key.clone(),
            value: self.value.clone(),
            flags: FieldFlags::empty(),
        }
    }

    /// Freeze the field and its value. Idempotent.
    pub fn commit(&mut self) -> &mut Self {
        if !self.is_immutable() {
            self.value.commit();
            self.flags.insert(FieldFlags::IMMUTABLE);
        }
        self
    }

    pub fn alias(&mut self) {
        self.value.alias();
    }

    pub fn is_constant(&self) -> bool {
        self.key.is_constant() && self.value.is_constant()
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key == other.key && self.value == other.value
    }
}

impl Eq for Field {}

impl Hash for Field {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.key.hash(state);
        self.value.hash(state);
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.key.cmp(&other.key))
            .then_with(|| self.value.cmp(&other.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn at_prefix_demotes_to_attr() {
        let field = Field::of("@id", 7);
        assert!(field.is_attr());
        assert_eq!(field.key(), &Value::from("id"));

        let plain = Field::of("id", 7);
        assert!(plain.is_slot());
        assert_eq!(plain.key(), &Value::from("id"));

        let numeric = Field::of(3, "three");
        assert!(numeric.is_slot());
    }

    #[test]
    fn commit_blocks_set_value() {
        let mut field = Field::slot("x", 1);
        field.set_value(2).unwrap();
        assert_eq!(field.value(), &Value::from(2));

        field.commit();
        assert!(field.is_immutable());
        let err = field.set_value(3).unwrap_err();
        assert!(err.is_immutable());
        assert!(field.value_mut().is_err());
        assert_eq!(field.value(), &Value::from(2));
    }

    #[test]
    fn updated_value_is_mutable_copy() {
        let mut field = Field::attr("a", 1);
        field.commit();
        let updated = field.updated_value(5);
        assert!(!updated.is_immutable());
        assert!(updated.is_attr());
        assert_eq!(updated.value(), &Value::from(5));
        assert_eq!(field.value(), &Value::from(1));
    }

    #[test]
    fn flags_do_not_affect_equality() {
        let mut committed = Field::slot("k", "v");
        committed.commit();
        assert_eq!(committed, Field::slot("k", "v"));
        assert_ne!(Field::attr("k", "v"), Field::slot("k", "v"));
        assert!(Field::attr("k", "v") < Field::slot("k", "v"));
    }

    #[test]
    fn with_kind_requires_text_key() {
        assert!(Field::slot("k", 1).with_kind(FieldKind::Attr).is_attr());
        assert!(Field::slot(1, 1).with_kind(FieldKind::Attr).is_slot());
    }
}
