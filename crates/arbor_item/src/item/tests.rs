use super::*;
use crate::EPSILON;
use pretty_assertions::assert_eq;

#[test]
fn key_and_value() {
    let field = Item::slot("k", 1);
    assert_eq!(field.key(), &Value::from("k"));
    assert_eq!(field.value(), &Value::from(1));
    assert_eq!(field.to_value(), Value::from(1));

    let bare = Item::from(2);
    assert_eq!(bare.key(), &Value::Absent);
    assert_eq!(bare.value(), &Value::from(2));
}

#[test]
fn type_order_ranks_fields_first() {
    assert_eq!(Item::attr("a", 1).type_order(), 1);
    assert_eq!(Item::slot("a", 1).type_order(), 2);
    assert_eq!(Item::from(Record::new()).type_order(), 3);
    assert_eq!(Item::absent().type_order(), 99);
    assert!(Item::attr("z", 1) < Item::slot("a", 1));
    assert!(Item::slot("z", 1) < Item::from(0));
}

#[test]
fn hash_code_follows_equality() {
    let a = Item::from(Record::of([Item::slot("x", 1), Item::from("y")]));
    let mut b = a.clone();
    b.commit();
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());
    assert_ne!(Item::from(0.0).hash_code(), Item::from(-0.0).hash_code());
    assert_eq!(Item::from(f64::NAN).hash_code(), Item::from(-f64::NAN).hash_code());
}

#[test]
fn equivalence_tolerates_rounding() {
    let a = Item::from(Record::of([Item::slot("x", 0.1 + 0.2)]));
    let b = Item::from(Record::of([Item::slot("x", 0.3)]));
    assert_ne!(a, b);
    assert!(a.equivalent_to(&b, EPSILON));
    assert!(!a.equivalent_to(&Item::from(Record::of([Item::attr("x", 0.3)])), EPSILON));
}

#[test]
fn fields_are_always_definite() {
    let field = Item::slot("k", Value::Absent);
    assert!(field.is_defined());
    assert!(field.is_distinct());
    assert!(field.is_definite());
    assert!(field.is_truthy());
    assert!(!Item::extant().is_definite());
}
