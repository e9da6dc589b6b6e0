//! Selector traversal.
//!
//! Each selector step narrows the innermost scope and hands the narrowed
//! scope to its continuation; `Identity` ends the chain. Steps that find
//! nothing simply produce no selection.
//!
//! [`Interpreter::for_selected`] reads selections. [`Interpreter::map_selected`]
//! replaces them and writes the results back into the enclosing records:
//! - a field result replaces the selected item;
//! - a distinct value result becomes the new value, keeping a selected
//!   field's key;
//! - an `Absent` or `Extant` result removes the selected item.

use arbor_item::{Field, Item, Record, Selector};
use arbor_stack::ensure_sufficient_stack;

use crate::{EvalResult, Interpreter};

/// The record in `scope`, for reading.
fn scope_record(scope: Option<&Item>) -> Option<Record> {
    scope.and_then(|item| item.value().as_record()).cloned()
}

/// The record in `scope`, for writing back.
fn scope_record_mut(scope: &mut Item) -> EvalResult<Option<&mut Record>> {
    let value = match scope {
        Item::Field(field) => field.value_mut()?,
        Item::Value(value) => value,
    };
    Ok(value.as_record_mut())
}

/// Store `new` at `index` in place of `old`. Returns whether an item
/// still occupies `index`.
fn write_back(record: &mut Record, index: usize, old: &Item, new: Item) -> EvalResult<bool> {
    match new {
        Item::Field(_) => {
            record.set_item(index, new)?;
            Ok(true)
        }
        Item::Value(value) if value.is_distinct() => {
            let item = match old {
                Item::Field(field) => Item::Field(field.updated_value(value)),
                Item::Value(_) => Item::Value(value),
            };
            record.set_item(index, item)?;
            Ok(true)
        }
        Item::Value(_) => {
            record.remove(index)?;
            Ok(false)
        }
    }
}

/// Store a transformed key. A distinct value renames the field, `Absent`
/// or `Extant` removes it.
fn write_back_key(record: &mut Record, index: usize, field: &Field, new: Item) -> EvalResult<bool> {
    match new {
        Item::Field(_) => {
            record.set_item(index, new)?;
            Ok(true)
        }
        Item::Value(key) if key.is_distinct() => {
            let renamed = Field::slot(key, field.value().clone()).with_kind(field.kind());
            record.set_item(index, renamed)?;
            Ok(true)
        }
        Item::Value(_) => {
            record.remove(index)?;
            Ok(false)
        }
    }
}

impl Interpreter {
    /// Call `callback` once per selection, with the selection as the
    /// innermost scope. Traversal is depth-first and stops at the first
    /// callback that returns `Some`.
    ///
    /// ```
    /// use arbor_eval::Interpreter;
    /// use arbor_item::{Item, Num, Record, Selector, Value};
    ///
    /// let record = Record::of([Item::attr("a", 1), Item::slot("b", 2)]);
    /// let mut interpreter = Interpreter::from_scope(record);
    /// let found = interpreter
    ///     .for_selected(&Selector::identity().get_attr("a"), |scope| {
    ///         scope.peek_scope().map(Item::to_value)
    ///     })
    ///     .unwrap();
    /// assert_eq!(found, Some(Value::Num(Num::from(1))));
    /// ```
    pub fn for_selected<T, F>(&mut self, selector: &Selector, mut callback: F) -> EvalResult<Option<T>>
    where
        F: FnMut(&mut Interpreter) -> Option<T>,
    {
        self.select(selector, &mut callback)
    }

    fn select<T, F>(&mut self, selector: &Selector, callback: &mut F) -> EvalResult<Option<T>>
    where
        F: FnMut(&mut Interpreter) -> Option<T>,
    {
        ensure_sufficient_stack(|| match selector {
            Selector::Identity => Ok(callback(self)),
            Selector::Get { key, then } => {
                let key = self.evaluate_value(key)?.into_value();
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                match record.get_field(key) {
                    Some(field) => self.select_in(Item::Value(field.value().clone()), then, callback),
                    None => Ok(None),
                }
            }
            Selector::GetAttr { key, then } => {
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                match record.get_field(key.clone()) {
                    Some(field) if field.is_attr() => {
                        self.select_in(Item::Value(field.value().clone()), then, callback)
                    }
                    _ => Ok(None),
                }
            }
            Selector::GetItem { index, then } => {
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                match index.to_index().and_then(|i| record.get_item(i)) {
                    Some(item) => self.select_in(item.clone(), then, callback),
                    None => Ok(None),
                }
            }
            Selector::Keys { then } => {
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                for field in record.iter().filter_map(Item::as_field) {
                    let found = self.select_in(Item::Value(field.key().clone()), then, callback)?;
                    if found.is_some() {
                        return Ok(found);
                    }
                }
                Ok(None)
            }
            Selector::Values { then } => {
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                for value in record.values() {
                    let found = self.select_in(Item::Value(value.clone()), then, callback)?;
                    if found.is_some() {
                        return Ok(found);
                    }
                }
                Ok(None)
            }
            Selector::Children { then } => {
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                for item in &record {
                    let found = self.select_in(item.clone(), then, callback)?;
                    if found.is_some() {
                        return Ok(found);
                    }
                }
                Ok(None)
            }
            Selector::Descendants { then } => {
                let Some(record) = scope_record(self.peek_scope()) else {
                    return Ok(None);
                };
                for item in &record {
                    let found = self.with_scope(item.clone(), |scoped| {
                        if let Some(found) = scoped.select(then, callback)? {
                            return Ok(Some(found));
                        }
                        if item.value().as_record().is_some() {
                            scoped.select(selector, callback)
                        } else {
                            Ok(None)
                        }
                    })?;
                    if found.is_some() {
                        return Ok(found);
                    }
                }
                Ok(None)
            }
            Selector::Filter { predicate, then } => {
                if self.evaluate_value(predicate)?.is_truthy() {
                    self.select(then, callback)
                } else {
                    Ok(None)
                }
            }
            Selector::Literal { item, then } => {
                let literal = self.evaluate(item)?;
                if literal.is_defined() {
                    self.select_in(literal, then, callback)
                } else {
                    Ok(None)
                }
            }
        })
    }

    fn select_in<T, F>(&mut self, scope: Item, then: &Selector, callback: &mut F) -> EvalResult<Option<T>>
    where
        F: FnMut(&mut Interpreter) -> Option<T>,
    {
        self.with_scope(scope, |scoped| scoped.select(then, callback))
    }

    /// Replace every selection with the result of `transform`, writing the
    /// results back into the innermost scope.
    ///
    /// `transform` sees the selection as the innermost scope.
    ///
    /// ```
    /// use arbor_eval::Interpreter;
    /// use arbor_item::{Item, Record, Selector};
    ///
    /// let record = Record::of([Item::slot("a", 1), Item::slot("b", 2)]);
    /// let mut interpreter = Interpreter::from_scope(record);
    /// interpreter
    ///     .map_selected(&Selector::identity().get("a"), |_| Item::absent())
    ///     .unwrap();
    /// assert_eq!(
    ///     interpreter.peek_scope(),
    ///     Some(&Item::from(Record::of([Item::slot("b", 2)])))
    /// );
    /// ```
    pub fn map_selected<F>(&mut self, selector: &Selector, mut transform: F) -> EvalResult<()>
    where
        F: FnMut(&mut Interpreter) -> Item,
    {
        self.map_step(selector, &mut transform)
    }

    fn map_step<F>(&mut self, selector: &Selector, transform: &mut F) -> EvalResult<()>
    where
        F: FnMut(&mut Interpreter) -> Item,
    {
        ensure_sufficient_stack(|| match selector {
            Selector::Identity => {
                let result = transform(self);
                self.swap_scope(result)?;
                Ok(())
            }
            Selector::Get { key, then } => {
                let key = self.evaluate_value(key)?.into_value();
                self.map_field(then, transform, |record| record.index_of(key))
            }
            Selector::GetAttr { key, then } => self.map_field(then, transform, |record| {
                record
                    .index_of(key.clone())
                    .filter(|&i| record.get_item(i).is_some_and(Item::is_attr))
            }),
            Selector::GetItem { index, then } => {
                let mut unscoped = self.unscoped()?;
                let (interpreter, scope) = unscoped.split();
                let Some(record) = scope_record_mut(scope)? else {
                    return Ok(());
                };
                let Some(i) = index.to_index().filter(|&i| i < record.len()) else {
                    return Ok(());
                };
                let old = record.as_slice()[i].clone();
                let new = interpreter.map_scope(old.clone(), |s| s.map_step(then, transform))?;
                write_back(record, i, &old, new)?;
                Ok(())
            }
            Selector::Keys { then } => {
                let mut unscoped = self.unscoped()?;
                let (interpreter, scope) = unscoped.split();
                let Some(record) = scope_record_mut(scope)? else {
                    return Ok(());
                };
                let mut i = 0;
                while let Some(old) = record.get_item(i).cloned() {
                    let kept = match old {
                        Item::Field(field) => {
                            let new = interpreter.map_scope(Item::Value(field.key().clone()), |s| {
                                s.map_step(then, transform)
                            })?;
                            write_back_key(record, i, &field, new)?
                        }
                        Item::Value(_) => true,
                    };
                    if kept {
                        i += 1;
                    }
                }
                Ok(())
            }
            Selector::Values { then } => self.map_each(transform, |s, old, transform| {
                s.map_scope(Item::Value(old.to_value()), |s| s.map_step(then, transform))
            }),
            Selector::Children { then } => self.map_each(transform, |s, old, transform| {
                s.map_scope(old.clone(), |s| s.map_step(then, transform))
            }),
            Selector::Descendants { then } => self.map_each(transform, |s, old, transform| {
                s.map_scope(old.clone(), |s| {
                    s.map_step(then, transform)?;
                    let nested = s.peek_scope().is_some_and(|top| top.value().as_record().is_some());
                    if nested {
                        s.map_step(selector, transform)?;
                    }
                    Ok(())
                })
            }),
            Selector::Filter { predicate, then } => {
                if self.evaluate_value(predicate)?.is_truthy() {
                    self.map_step(then, transform)
                } else {
                    Ok(())
                }
            }
            Selector::Literal { item, then } => {
                // Literals are not part of the scope, so there is nothing to write back.
                let literal = self.evaluate(item)?;
                if literal.is_defined() {
                    self.map_scope(literal, |s| s.map_step(then, transform))?;
                }
                Ok(())
            }
        })
    }

    /// Map the field that `locate` finds in the innermost scope.
    fn map_field<F, L>(&mut self, then: &Selector, transform: &mut F, locate: L) -> EvalResult<()>
    where
        F: FnMut(&mut Interpreter) -> Item,
        L: FnOnce(&Record) -> Option<usize>,
    {
        let mut unscoped = self.unscoped()?;
        let (interpreter, scope) = unscoped.split();
        let Some(record) = scope_record_mut(scope)? else {
            return Ok(());
        };
        let Some(i) = locate(record) else {
            return Ok(());
        };
        let old = record.as_slice()[i].clone();
        let new = interpreter.map_scope(Item::Value(old.to_value()), |s| s.map_step(then, transform))?;
        write_back(record, i, &old, new)?;
        Ok(())
    }

    /// Map every item of the innermost scope through `step`.
    fn map_each<F, S>(&mut self, transform: &mut F, mut step: S) -> EvalResult<()>
    where
        F: FnMut(&mut Interpreter) -> Item,
        S: FnMut(&mut Interpreter, &Item, &mut F) -> EvalResult<Item>,
    {
        let mut unscoped = self.unscoped()?;
        let (interpreter, scope) = unscoped.split();
        let Some(record) = scope_record_mut(scope)? else {
            return Ok(());
        };
        let mut i = 0;
        while let Some(old) = record.get_item(i).cloned() {
            let new = step(interpreter, &old, transform)?;
            if write_back(record, i, &old, new)? {
                i += 1;
            }
        }
        Ok(())
    }
}
