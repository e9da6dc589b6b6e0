use super::*;
use crate::EvalErrorKind;
use arbor_item::{LambdaFunc, Selector, UnaryOp};
use pretty_assertions::assert_eq;

fn get(key: &str) -> Item {
    Item::from(Selector::identity().get(key))
}

fn scope() -> Record {
    Record::of([
        Item::slot("x", 3),
        Item::slot("y", 4),
        Item::slot("flag", false),
    ])
}

// Scope stack

#[test]
fn push_pop_peek() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.peek_scope(), None);
    interp.push_scope(Item::from(1)).unwrap();
    interp.push_scope(Item::from(2)).unwrap();
    assert_eq!(interp.scope_depth(), 2);
    assert_eq!(interp.peek_scope(), Some(&Item::from(2)));
    assert_eq!(interp.get_scope(0), Some(&Item::from(1)));
    assert_eq!(interp.get_scope(2), None);
    assert_eq!(interp.pop_scope().unwrap(), Item::from(2));
    assert_eq!(interp.pop_scope().unwrap(), Item::from(1));
}

#[test]
fn pop_on_empty_stack_fails() {
    let mut interp = Interpreter::new();
    let err = interp.pop_scope().unwrap_err();
    assert_eq!(err.kind(), &EvalErrorKind::ScopeUnderflow);
    assert!(interp.swap_scope(Item::from(1)).is_err());
}

#[test]
fn swap_replaces_top() {
    let mut interp = Interpreter::from_scope(Item::from("a"));
    assert_eq!(interp.swap_scope(Item::from("b")).unwrap(), Item::from("a"));
    assert_eq!(interp.peek_scope(), Some(&Item::from("b")));
    assert_eq!(interp.scope_depth(), 1);
}

#[test]
fn depth_limit_is_enforced() {
    let mut interp = Interpreter::builder().max_scope_depth(2).build().unwrap();
    interp.push_scope(Item::from(1)).unwrap();
    interp.push_scope(Item::from(2)).unwrap();
    let err = interp.push_scope(Item::from(3)).unwrap_err();
    assert_eq!(err.kind(), &EvalErrorKind::ScopeOverflow { limit: 2 });
    assert_eq!(interp.scope_depth(), 2);
}

#[test]
fn builder_defaults_and_scopes() {
    assert_eq!(
        Interpreter::new().settings().max_scope_depth,
        InterpreterSettings::DEFAULT_MAX_SCOPE_DEPTH
    );
    assert_eq!(
        Interpreter::builder().max_scope_depth(0).build().unwrap().settings().max_scope_depth,
        1
    );

    let interp = Interpreter::builder()
        .scope(Item::from("outer"))
        .scope(Item::from("inner"))
        .build()
        .unwrap();
    assert_eq!(interp.get_scope(0), Some(&Item::from("outer")));
    assert_eq!(interp.peek_scope(), Some(&Item::from("inner")));

    let too_many = Interpreter::builder()
        .settings(InterpreterSettings { max_scope_depth: 1 })
        .scope(Item::from(1))
        .scope(Item::from(2))
        .build();
    assert!(too_many.is_err());
}

// Evaluation

#[test]
fn constants_evaluate_to_themselves() {
    let mut interp = Interpreter::new();
    for item in [Item::from(1), Item::from("s"), Item::extant(), Item::absent()] {
        assert_eq!(interp.evaluate(&item).unwrap(), item);
    }
    let lambda = Item::from(LambdaFunc::new("x", Selector::identity().get("x")));
    assert_eq!(interp.evaluate(&lambda).unwrap(), lambda);
}

#[test]
fn operators_fold_against_scope() {
    let mut interp = Interpreter::from_scope(scope());
    assert_eq!(interp.evaluate(&get("x").plus(&get("y"))).unwrap(), Item::from(7));
    assert_eq!(interp.evaluate(&get("x").lt(&get("y"))).unwrap(), Item::from(true));
    assert_eq!(interp.evaluate(&get("x").negative()).unwrap(), Item::from(-3));
    assert_eq!(
        interp.evaluate(&get("missing").plus(&get("x"))).unwrap(),
        Item::absent()
    );
}

#[test]
fn logical_operators_short_circuit() {
    let mut interp = Interpreter::from_scope(scope());
    assert_eq!(interp.evaluate(&get("flag").or(&get("x"))).unwrap(), Item::from(3));
    assert_eq!(interp.evaluate(&get("flag").and(&get("x"))).unwrap(), Item::from(false));
    assert_eq!(interp.evaluate(&get("x").and(&get("y"))).unwrap(), Item::from(4));
    let test = get("flag").unary(UnaryOp::Not);
    assert_eq!(
        interp.evaluate(&test.conditional(&get("x"), &get("y"))).unwrap(),
        Item::from(3)
    );
}

#[test]
fn fields_keep_their_keys() {
    let mut interp = Interpreter::from_scope(scope());
    let field = Item::slot("sum", get("x").plus(&get("y")).into_value());
    assert_eq!(interp.evaluate(&field).unwrap(), Item::slot("sum", 7));
}

#[test]
fn records_are_their_own_scope() {
    let mut interp = Interpreter::new();
    let record = Record::of([
        Item::slot("a", 2),
        Item::slot("b", get("a").times(&Item::from(10)).into_value()),
        get("missing"),
    ]);
    assert_eq!(
        interp.evaluate(&Item::from(record)).unwrap(),
        Item::from(Record::of([Item::slot("a", 2), Item::slot("b", 20)]))
    );
    assert_eq!(interp.scope_depth(), 0);
}

#[test]
fn selectors_flatten_their_selections() {
    let mut interp = Interpreter::from_scope(scope());
    assert_eq!(interp.evaluate(&get("x")).unwrap(), Item::from(3));
    assert_eq!(interp.evaluate(&get("nope")).unwrap(), Item::absent());

    let values = Item::from(Selector::identity().values());
    assert_eq!(
        interp.evaluate(&values).unwrap(),
        Item::from(Record::of([Item::from(3), Item::from(4), Item::from(false)]))
    );
}

#[test]
fn invoke_operator_calls_lambdas() {
    let inc = LambdaFunc::new("n", get("n").plus(&Item::from(1)).into_value());
    let mut interp = Interpreter::from_scope(Record::of([
        Item::slot("inc", inc),
        Item::slot("x", 41),
    ]));
    let call = Item::from(Operator::invoke(Selector::identity().get("inc"), Selector::identity().get("x")));
    assert_eq!(interp.evaluate(&call).unwrap(), Item::from(42));

    let not_callable = Item::from(Operator::invoke(Selector::identity().get("x"), 1));
    assert_eq!(interp.evaluate(&not_callable).unwrap(), Item::absent());
}

#[test]
fn deep_records_evaluate() {
    let mut value = Item::from(1);
    for _ in 0..200 {
        value = Item::from(Record::of([value]));
    }
    let mut interp = Interpreter::new();
    assert_eq!(interp.evaluate(&value).unwrap(), value);
}

#[test]
fn nesting_past_the_limit_fails() {
    let mut value = Item::from(1);
    for _ in 0..10 {
        value = Item::from(Record::of([value]));
    }
    let mut interp = Interpreter::builder().max_scope_depth(4).build().unwrap();
    assert!(interp.evaluate(&value).is_err());
    assert_eq!(interp.scope_depth(), 0);
}

// Substitution

#[test]
fn substitute_resolves_what_it_can() {
    let mut interp = Interpreter::from_scope(scope());
    let expr = get("x").plus(&get("unknown"));
    let substituted = interp.substitute(&expr).unwrap();
    assert_eq!(substituted, Item::from(3).plus(&get("unknown")));
    assert!(!substituted.is_constant());

    assert_eq!(interp.substitute(&get("x").times(&get("y"))).unwrap(), Item::from(12));
}

#[test]
fn substitute_keeps_structure() {
    let mut interp = Interpreter::from_scope(scope());
    let record = Item::from(Record::of([
        Item::slot("a", 3),
        Item::slot("b", get("a").into_value()),
        get("unknown"),
    ]));
    assert_eq!(
        interp.substitute(&record).unwrap(),
        Item::from(Record::of([Item::slot("a", 3), Item::slot("b", 3), get("unknown")]))
    );
}

#[test]
fn substitute_invokes_constant_calls() {
    let double = LambdaFunc::new("n", get("n").times(&Item::from(2)).into_value());
    let mut interp = Interpreter::from_scope(Record::of([Item::slot("double", double)]));
    let call = Item::from(Operator::invoke(Selector::identity().get("double"), 8));
    assert_eq!(interp.substitute(&call).unwrap(), Item::from(16));

    let pending = Item::from(Operator::invoke(
        Selector::identity().get("double"),
        Selector::identity().get("later"),
    ));
    assert!(!interp.substitute(&pending).unwrap().is_constant());
}
