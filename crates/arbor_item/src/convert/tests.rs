use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::errors::StructureErrorKind;
use crate::Text;

#[test]
fn scalars() {
    assert_eq!(Value::from_any(&json!(null)), Value::Extant);
    assert_eq!(Value::from_any(&json!(true)), Value::Bool(true));
    assert_eq!(Value::from_any(&json!(1.5)), Value::from(1.5));
    assert_eq!(Value::from_any(&json!("hi")), Value::from("hi"));

    let big = Value::from_any(&json!(u64::MAX));
    assert!(big.as_num().is_some_and(Num::is_uint64));
    assert_eq!(big.to_any(), json!(u64::MAX));
}

#[test]
fn numbers_export_as_integers_when_integral() {
    assert_eq!(Value::from(3.0).to_any(), json!(3));
    assert_eq!(Value::from(-2.5).to_any(), json!(-2.5));
    assert_eq!(Value::from(f64::NAN).to_any(), json!(null));
    assert_eq!(Value::from(f64::INFINITY).to_any(), json!(null));
    assert_eq!(Value::Absent.to_any(), json!(null));
}

#[test]
fn objects_become_fields() {
    let record = Record::from_object(&json!({"@id": 7, "name": "box", "size": 2})).unwrap();
    assert_eq!(
        record,
        Record::of([Item::attr("id", 7), Item::slot("name", "box"), Item::slot("size", 2)])
    );
    assert_eq!(record.tag().map(Text::as_str), Some("id"));
    assert_eq!(
        record.to_object().unwrap(),
        json!({"@id": 7, "name": "box", "size": 2})
    );
}

#[test]
fn set_then_export() {
    let mut record = Record::of([Item::slot("x", 1), Item::slot("y", 2)]);
    record.set("x", 10).unwrap();
    assert_eq!(record.to_object().unwrap(), json!({"x": 10, "y": 2}));
}

#[test]
fn arrays_round_trip() {
    let json = json!([1, "two", true, [3, 4], {"k": null}]);
    let record = Record::from_array(&json).unwrap();
    assert_eq!(record.len(), 5);
    assert!(record.is_array());
    assert_eq!(record.to_array().unwrap(), json);
}

#[test]
fn mixed_records_use_positions() {
    let record = Record::of([Item::from(1), Item::attr("a", 2), Item::slot(3, "x")]);
    let json = record.to_any();
    assert_eq!(
        json,
        json!({
            "$0": 1,
            "$1": {"$key": "@a", "$value": 2},
            "$2": {"$key": 3, "$value": "x"},
        })
    );
    assert_eq!(Record::from_any(&json).unwrap(), record);
    assert!(record.to_array().is_err());
    assert!(record.to_object().is_err());
}

#[test]
fn field_forms() {
    assert_eq!(
        Item::from_any(&json!({"$key": "k", "$value": [1]})),
        Item::slot("k", Record::of([1]))
    );
    assert_eq!(
        Field::from_any(&json!({"@lang": "en"})).unwrap(),
        Field::attr("lang", "en")
    );
    assert!(Field::from_any(&json!({"a": 1, "b": 2})).is_err());
}

#[test]
fn coercion_errors_name_the_shape() {
    let err = Record::from_array(&json!({"a": 1})).unwrap_err();
    assert_eq!(
        err.kind(),
        &StructureErrorKind::Coercion {
            expected: "array",
            found: "object".to_owned(),
        }
    );
    assert!(Num::from_any(&json!([])).is_err());
    assert_eq!(Num::from_any(&json!("12")).unwrap(), Num::from(12));
    assert!(Num::from_any(&json!("Infinity")).is_err());
}

#[test]
fn reserved_slot_keys_use_positions() {
    let record = Record::of([Item::slot("$key", 1), Item::slot("$value", 2)]);
    assert!(record.is_object());
    let json = record.to_object().unwrap();
    assert_eq!(
        json,
        json!({
            "$0": {"$key": "$key", "$value": 1},
            "$1": {"$key": "$value", "$value": 2},
        })
    );
    assert_eq!(Record::from_object(&json).unwrap(), record);
    assert_eq!(Record::from_any(&record.to_any()).unwrap(), record);

    let positional = Record::of([Item::slot("$0", "a")]);
    assert_eq!(Record::from_object(&positional.to_object().unwrap()).unwrap(), positional);
}

#[test]
fn unrepresentable_values_fail_strict_export() {
    let with_nan = Record::of([Item::from(Num::NAN), Item::from(1)]);
    let err = with_nan.to_array().unwrap_err();
    assert_eq!(
        err.kind(),
        &StructureErrorKind::Coercion {
            expected: "array",
            found: "undefined or non-finite value".to_owned(),
        }
    );
    assert!(Record::of([Item::absent()]).to_array().is_err());
    assert!(Record::of([Record::of([f64::INFINITY])]).to_array().is_err());
    assert!(Record::of([Item::slot("x", f64::NEG_INFINITY)]).to_object().is_err());

    // The lossy export still succeeds.
    assert_eq!(with_nan.to_any(), json!([null, 1]));
}
