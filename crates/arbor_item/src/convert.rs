//! Conversion between structural values and plain JSON data.
//!
//! Import rules:
//!
//! - `null` becomes `Extant`.
//! - Integers above `i64::MAX` keep a `uint64` hint; other numbers are `f64`.
//! - Object keys starting with `@` become attrs, the rest slots.
//! - `{"$key": k, "$value": v}` is a single field (demoted to an attr when
//!   `k` starts with `@`).
//! - An object whose keys are all `$0`, `$1`, ... holds the items of a
//!   mixed record by position.
//!
//! Export is the inverse: arrays for records without fields, objects for
//! records of text-keyed fields, and the indexed `$N` form otherwise.

use serde_json::{Map, Number};

use crate::errors::{coercion_failed, StructureResult};
use crate::{Field, Item, Num, Record, Value};

type Json = serde_json::Value;

const KEY: &str = "$key";
const VALUE: &str = "$value";

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn num_from_json(n: &Number) -> Num {
    match (n.as_u64(), n.is_i64()) {
        (Some(u), false) => Num::uint64(u),
        _ => n.as_f64().map_or(Num::NAN, Num::from),
    }
}

/// `{"$key": k, "$value": v}`, exactly.
fn as_field_object(map: &Map<String, Json>) -> Option<(&Json, &Json)> {
    if map.len() != 2 {
        return None;
    }
    Some((map.get(KEY)?, map.get(VALUE)?))
}

/// Position encoded by a `$N` key.
fn indexed_key(key: &str) -> Option<usize> {
    let digits = key.strip_prefix('$')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl Value {
    /// Import JSON data. Total: every JSON value has a structural form.
    pub fn from_any(json: &Json) -> Value {
        match json {
            Json::Null => Value::Extant,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Num(num_from_json(n)),
            Json::String(s) => Value::from(s.as_str()),
            Json::Array(elements) => Value::Record(record_from_elements(elements)),
            Json::Object(map) => Value::Record(record_from_map(map)),
        }
    }

    /// Export as JSON data.
    ///
    /// `Absent`, `Extant` and non-finite numbers become `null`; expression
    /// nodes export their display form.
    pub fn to_any(&self) -> Json {
        match self {
            Value::Absent | Value::Extant => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Num(n) => num_to_json(*n),
            Value::Text(t) => Json::String(t.to_string()),
            Value::Record(r) => record_to_json(r),
            Value::Selector(_) | Value::Operator(_) | Value::Lambda(_) => {
                Json::String(self.to_string())
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "integral values within 2^53 convert exactly"
)]
fn num_to_json(n: Num) -> Json {
    let v = n.value();
    if n.is_uint64() && v >= 0.0 && v.fract() == 0.0 {
        return Json::Number(Number::from(v as u64));
    }
    if v == 0.0 && v.is_sign_negative() {
        return Number::from_f64(v).map_or(Json::Null, Json::Number);
    }
    match n.to_i64() {
        Some(i) => Json::Number(Number::from(i)),
        None => Number::from_f64(v).map_or(Json::Null, Json::Number),
    }
}

impl Num {
    pub fn from_any(json: &Json) -> StructureResult<Num> {
        match json {
            Json::Number(n) => Ok(num_from_json(n)),
            Json::String(s) => Num::parse(s),
            other => Err(coercion_failed("number", json_kind(other))),
        }
    }
}

impl Field {
    /// Import a `{"$key": k, "$value": v}` object, or a single-entry object.
    pub fn from_any(json: &Json) -> StructureResult<Field> {
        let Json::Object(map) = json else {
            return Err(coercion_failed("field", json_kind(json)));
        };
        if let Some((key, value)) = as_field_object(map) {
            return Ok(Field::of(Value::from_any(key), Value::from_any(value)));
        }
        match map.iter().next() {
            Some((key, value)) if map.len() == 1 => {
                Ok(Field::of(key.as_str(), Value::from_any(value)))
            }
            _ => Err(coercion_failed("field", format!("object of {} entries", map.len()))),
        }
    }
}

impl Item {
    /// Import JSON data, recognising the `$key`/`$value` field form.
    pub fn from_any(json: &Json) -> Item {
        if let Json::Object(map) = json {
            if let Some((key, value)) = as_field_object(map) {
                return Item::Field(Field::of(Value::from_any(key), Value::from_any(value)));
            }
        }
        Item::Value(Value::from_any(json))
    }

    pub fn to_any(&self) -> Json {
        match self {
            Item::Field(field) => field_to_json(field),
            Item::Value(value) => value.to_any(),
        }
    }
}

fn field_to_json(field: &Field) -> Json {
    let key = match (field.is_attr(), field.key()) {
        (true, Value::Text(text)) => Json::String(format!("@{text}")),
        (_, key) => key.to_any(),
    };
    let mut map = Map::new();
    map.insert(KEY.to_owned(), key);
    map.insert(VALUE.to_owned(), field.value().to_any());
    Json::Object(map)
}

fn record_from_elements(elements: &[Json]) -> Record {
    Record::of(elements.iter().map(Item::from_any))
}

fn record_from_map(map: &Map<String, Json>) -> Record {
    if let Some((key, value)) = as_field_object(map) {
        return Record::of([Field::of(Value::from_any(key), Value::from_any(value))]);
    }
    if let Some(items) = indexed_items(map) {
        return Record::of(items);
    }
    Record::of(
        map.iter()
            .map(|(key, value)| Field::of(key.as_str(), Value::from_any(value))),
    )
}

/// Items of a `{"$0": .., "$1": ..}` object, if every key is positional
/// and the positions are exactly `0..len`.
fn indexed_items(map: &Map<String, Json>) -> Option<Vec<Item>> {
    if map.is_empty() {
        return None;
    }
    let mut entries = map
        .iter()
        .map(|(key, value)| Some((indexed_key(key)?, value)))
        .collect::<Option<Vec<_>>>()?;
    entries.sort_by_key(|(position, _)| *position);
    let contiguous = entries
        .iter()
        .enumerate()
        .all(|(expected, (position, _))| expected == *position);
    contiguous.then(|| entries.into_iter().map(|(_, v)| Item::from_any(v)).collect())
}

fn plain_object_key(item: &Item) -> Option<String> {
    let Item::Field(field) = item else {
        return None;
    };
    let text = field.key().as_text()?;
    if field.is_attr() {
        Some(format!("@{text}"))
    } else if text.starts_with('@')
        || text.as_str() == KEY
        || text.as_str() == VALUE
        || indexed_key(text).is_some()
    {
        // Would be read back as an attr, a field object or a position.
        None
    } else {
        Some(text.to_string())
    }
}

/// Whether `value` exports to JSON and reads back equal. `Absent` and
/// non-finite numbers have no JSON form.
fn is_representable(value: &Value) -> bool {
    match value {
        Value::Absent => false,
        Value::Num(n) => n.value().is_finite(),
        Value::Record(record) => record.iter().all(|item| match item {
            Item::Field(field) => is_representable(field.key()) && is_representable(field.value()),
            Item::Value(value) => is_representable(value),
        }),
        _ => true,
    }
}

fn plain_object(record: &Record) -> Option<Json> {
    let mut map = Map::new();
    for item in record {
        map.insert(plain_object_key(item)?, item.value().to_any());
    }
    Some(Json::Object(map))
}

fn indexed_object(record: &Record) -> Json {
    let mut map = Map::new();
    for (position, item) in record.iter().enumerate() {
        map.insert(format!("${position}"), item.to_any());
    }
    Json::Object(map)
}

fn record_to_json(record: &Record) -> Json {
    if record.is_array() {
        return Json::Array(record.values().map(Value::to_any).collect());
    }
    plain_object(record).unwrap_or_else(|| indexed_object(record))
}

/// `Coercion` error unless every value of `record` has a JSON form.
fn check_representable(record: &Record, expected: &'static str) -> StructureResult<()> {
    if record.values().all(is_representable) {
        Ok(())
    } else {
        Err(coercion_failed(expected, "undefined or non-finite value"))
    }
}

impl Record {
    /// Import a JSON array or object.
    pub fn from_any(json: &Json) -> StructureResult<Record> {
        match json {
            Json::Array(_) => Record::from_array(json),
            Json::Object(_) => Record::from_object(json),
            other => Err(coercion_failed("record", json_kind(other))),
        }
    }

    pub fn from_array(json: &Json) -> StructureResult<Record> {
        match json {
            Json::Array(elements) => Ok(record_from_elements(elements)),
            other => Err(coercion_failed("array", json_kind(other))),
        }
    }

    pub fn from_object(json: &Json) -> StructureResult<Record> {
        match json {
            Json::Object(map) => Ok(record_from_map(map)),
            other => Err(coercion_failed("object", json_kind(other))),
        }
    }

    /// Export the values of a record without fields.
    ///
    /// Fails on values JSON cannot carry back: `Absent` and non-finite
    /// numbers, at any depth.
    pub fn to_array(&self) -> StructureResult<Json> {
        if !self.is_array() {
            return Err(coercion_failed("array", "record with fields"));
        }
        check_representable(self, "array")?;
        Ok(Json::Array(self.values().map(Value::to_any).collect()))
    }

    /// Export a record of text-keyed fields. Duplicate keys keep the last
    /// value. Keys that would read back as something else (`@`-prefixed
    /// slots, `$key`, `$value`, `$N`) switch to the indexed form.
    pub fn to_object(&self) -> StructureResult<Json> {
        let text_keyed = self
            .iter()
            .all(|item| item.is_field() && item.key().as_text().is_some());
        if !text_keyed {
            return Err(coercion_failed("object", "record with non-text keys or values"));
        }
        check_representable(self, "object")?;
        Ok(plain_object(self).unwrap_or_else(|| indexed_object(self)))
    }

    pub fn to_any(&self) -> Json {
        record_to_json(self)
    }
}

#[cfg(test)]
mod tests;
