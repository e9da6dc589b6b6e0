//! End-to-end selector scenarios over JSON-shaped documents.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use arbor_eval::{init_tracing, Interpreter, Invoke};
use arbor_item::{BinaryOp, Item, LambdaFunc, Num, Operator, Record, Selector, Value};
use pretty_assertions::assert_eq;
use serde_json::json;

fn catalog() -> Record {
    Record::from_any(&json!({
        "store": "north",
        "items": [
            {"name": "bolt", "price": 2, "stock": 100},
            {"name": "gear", "price": 15, "stock": 0},
            {"name": "shaft", "price": 40, "stock": 3}
        ]
    }))
    .unwrap()
}

fn field(name: &str) -> Item {
    Item::from(Selector::identity().get(name))
}

#[test]
fn get_attr_finds_attribute_value() {
    init_tracing();
    let record = Record::of([Item::attr("a", 1), Item::slot("b", 2)]);
    let mut interpreter = Interpreter::from_scope(record);

    let found = interpreter
        .for_selected(&Selector::identity().get_attr("a"), |scope| {
            scope.peek_scope().map(Item::to_value)
        })
        .unwrap();
    assert_eq!(found, Some(Value::Num(Num::from(1))));

    let missing = interpreter
        .for_selected(&Selector::identity().get_attr("zzz"), |scope| {
            scope.peek_scope().map(Item::to_value)
        })
        .unwrap();
    assert_eq!(missing, None);
}

#[test]
fn select_column_from_imported_json() {
    let mut interpreter = Interpreter::from_scope(catalog());
    let names = Selector::identity().get("items").values().get("name");
    let result = interpreter.evaluate(&Item::from(names)).unwrap();
    assert_eq!(result.to_any(), json!(["bolt", "gear", "shaft"]));
}

#[test]
fn filter_by_predicate() {
    let mut interpreter = Interpreter::from_scope(catalog());
    let in_stock = field("stock").gt(&Item::from(0)).into_value();
    let cheap = field("price").lt(&Item::from(20)).into_value();
    let both = Operator::binary(BinaryOp::And, in_stock, cheap);
    let selector = Selector::identity()
        .get("items")
        .values()
        .filter(both)
        .get("name");
    assert_eq!(
        interpreter.evaluate(&Item::from(selector)).unwrap(),
        Item::from("bolt")
    );
}

#[test]
fn record_templates_read_their_siblings() {
    let mut interpreter = Interpreter::from_scope(catalog());
    let line = Record::of([
        Item::slot("price", 15),
        Item::slot("qty", 4),
        Item::slot("total", field("price").times(&field("qty")).into_value()),
        Item::slot("label", field("nope").into_value()),
    ]);
    let evaluated = interpreter.evaluate(&Item::from(line)).unwrap();
    assert_eq!(evaluated.to_any(), json!({"price": 15, "qty": 4, "total": 60}));
    assert_eq!(interpreter.scope_depth(), 1);
}

#[test]
fn map_selected_restocks_and_writes_back() {
    let mut interpreter = Interpreter::from_scope(catalog());
    let stock = Selector::identity().get("items").values().get("stock");
    interpreter
        .map_selected(&stock, |scope| {
            let current = scope.peek_scope().cloned().unwrap_or_default();
            current.plus(&Item::from(10))
        })
        .unwrap();

    let updated = interpreter.pop_scope().unwrap();
    assert_eq!(
        updated.to_any()["items"],
        json!([
            {"name": "bolt", "price": 2, "stock": 110},
            {"name": "gear", "price": 15, "stock": 10},
            {"name": "shaft", "price": 40, "stock": 13}
        ])
    );
}

#[test]
fn map_selected_deletes_sold_out_items() {
    let mut interpreter = Interpreter::from_scope(catalog());
    let items = Selector::identity().get("items").children();
    interpreter
        .map_selected(&items, |scope| {
            let item = scope.peek_scope().cloned().unwrap_or_default();
            let sold_out = item
                .value()
                .as_record()
                .is_some_and(|r| r.get("stock") == &Value::from(0));
            if sold_out {
                Item::absent()
            } else {
                item
            }
        })
        .unwrap();

    let updated = interpreter.pop_scope().unwrap();
    let names: Vec<_> = updated.to_any()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("bolt"), json!("shaft")]);
}

#[test]
fn original_is_untouched_by_write_back() {
    let original = catalog();
    let mut interpreter = Interpreter::from_scope(original.clone());
    interpreter
        .map_selected(&Selector::identity().get("store"), |_| Item::from("south"))
        .unwrap();
    assert_eq!(original.get("store"), &Value::from("north"));
    assert_eq!(
        interpreter.peek_scope().unwrap().value().as_record().unwrap().get("store"),
        &Value::from("south")
    );
}

#[test]
fn lambdas_apply_across_selections() {
    let total = LambdaFunc::new(
        "item",
        Item::from(Selector::identity().get("item").get("price"))
            .times(&Item::from(Selector::identity().get("item").get("stock")))
            .into_value(),
    );
    let mut interpreter = Interpreter::from_scope(catalog());
    let mut totals = Vec::new();
    interpreter
        .for_selected(&Selector::identity().get("items").values(), |scope| {
            let item = scope.peek_scope().map(Item::to_value)?;
            totals.push(total.invoke(&item, scope).ok()?.to_any());
            None::<()>
        })
        .unwrap();
    assert_eq!(totals, vec![json!(200), json!(0), json!(120)]);
}
