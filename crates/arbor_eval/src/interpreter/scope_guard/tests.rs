use super::*;
use arbor_item::Record;
use pretty_assertions::assert_eq;

#[test]
fn test_scoped_interpreter_drops_on_normal_exit() {
    let mut interp = Interpreter::from_scope(Record::of([1]));
    assert_eq!(interp.scope_depth(), 1);

    {
        let scoped = interp.scoped(Item::from(2)).unwrap();
        assert_eq!(scoped.scope_depth(), 2);
        assert_eq!(scoped.peek_scope(), Some(&Item::from(2)));
    }

    assert_eq!(interp.scope_depth(), 1);
}

#[test]
fn test_scoped_interpreter_drops_on_panic() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let mut interp = Interpreter::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let scoped = interp.scoped(Item::from(1)).unwrap();
        assert_eq!(scoped.scope_depth(), 1);
        panic!("test panic");
    }));

    assert!(result.is_err());
    assert_eq!(interp.scope_depth(), 0);
}

#[test]
fn test_nested_with_scope_unwinds_every_level() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let mut interp = Interpreter::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        interp.with_scope(Item::from(1), |s1| {
            s1.with_scope(Item::from(2), |s2| {
                s2.with_scope(Item::from(3), |s3| -> EvalResult<()> {
                    assert_eq!(s3.scope_depth(), 3);
                    panic!("deep panic");
                })
            })
        })
    }));

    assert!(result.is_err());
    assert_eq!(interp.scope_depth(), 0);
}

#[test]
fn test_with_scope_returns_closure_result() {
    let mut interp = Interpreter::new();
    let depth = interp
        .with_scope(Item::from("x"), |scoped| Ok(scoped.scope_depth()))
        .unwrap();
    assert_eq!(depth, 1);
    assert_eq!(interp.scope_depth(), 0);
}

#[test]
fn test_with_scope_pops_on_error() {
    let mut interp = Interpreter::builder().max_scope_depth(1).build().unwrap();
    let result = interp.with_scope(Item::from(1), |scoped| scoped.push_scope(Item::from(2)));
    assert!(result.is_err());
    assert_eq!(interp.scope_depth(), 0);
}

#[test]
fn test_scoped_respects_depth_limit() {
    let mut interp = Interpreter::builder().max_scope_depth(1).build().unwrap();
    interp.push_scope(Item::from(1)).unwrap();
    assert!(interp.scoped(Item::from(2)).is_err());
    assert_eq!(interp.scope_depth(), 1);
}

#[test]
fn test_unscoped_restores_scope() {
    let mut interp = Interpreter::from_scope(Item::from("outer"));
    interp.push_scope(Item::from("inner")).unwrap();

    {
        let mut unscoped = interp.unscoped().unwrap();
        assert_eq!(unscoped.scope(), &Item::from("inner"));
        assert_eq!(unscoped.scope_depth(), 1);
        assert_eq!(unscoped.peek_scope(), Some(&Item::from("outer")));
        *unscoped.scope_mut() = Item::from("edited");
    }

    assert_eq!(interp.scope_depth(), 2);
    assert_eq!(interp.peek_scope(), Some(&Item::from("edited")));
}

#[test]
fn test_unscoped_on_empty_stack_fails() {
    let mut interp = Interpreter::new();
    assert!(interp.unscoped().is_err());
    assert_eq!(interp.scope_depth(), 0);
}

#[test]
fn test_map_scope_returns_edited_scope() {
    let mut interp = Interpreter::new();
    let result = interp
        .map_scope(Item::from(1), |interp| {
            interp.swap_scope(Item::from(2))?;
            Ok(())
        })
        .unwrap();
    assert_eq!(result, Item::from(2));
    assert_eq!(interp.scope_depth(), 0);
}
