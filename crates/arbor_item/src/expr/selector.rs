use crate::{Item, Num, Text, Value};

/// One narrowing step of a query, followed by the rest of the chain.
///
/// Selectors form a singly linked pipeline terminated by `Identity`.
/// Builder methods append a step at the end of the chain:
///
/// ```
/// use arbor_item::Selector;
///
/// let s = Selector::identity().get("users").children().get_attr("id");
/// assert_eq!(s.to_string(), "$users.*.@id");
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Selector {
    /// Selects the current scope.
    Identity,
    /// Value of the last field with `key`.
    Get { key: Box<Value>, then: Box<Selector> },
    /// Value of the last attr with `key`.
    GetAttr { key: Text, then: Box<Selector> },
    /// Item at a position.
    GetItem { index: Num, then: Box<Selector> },
    /// Every field key.
    Keys { then: Box<Selector> },
    /// Every item value.
    Values { then: Box<Selector> },
    /// Every item.
    Children { then: Box<Selector> },
    /// Every item, recursively, in pre-order.
    Descendants { then: Box<Selector> },
    /// The current scope, if `predicate` evaluates truthy against it.
    Filter {
        predicate: Box<Value>,
        then: Box<Selector>,
    },
    /// The evaluated `item`, regardless of scope.
    Literal { item: Box<Item>, then: Box<Selector> },
}

impl Selector {
    pub fn identity() -> Selector {
        Selector::Identity
    }

    /// A chain that starts from a fixed item.
    pub fn literal(item: impl Into<Item>) -> Selector {
        Selector::Literal {
            item: Box::new(item.into()),
            then: Box::new(Selector::Identity),
        }
    }

    /// The next step, or `None` at the end of the chain.
    pub fn then(&self) -> Option<&Selector> {
        match self {
            Selector::Identity => None,
            Selector::Get { then, .. }
            | Selector::GetAttr { then, .. }
            | Selector::GetItem { then, .. }
            | Selector::Keys { then }
            | Selector::Values { then }
            | Selector::Children { then }
            | Selector::Descendants { then }
            | Selector::Filter { then, .. }
            | Selector::Literal { then, .. } => Some(then),
        }
    }

    /// Number of steps, not counting the terminal `Identity`.
    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut step = self;
        while let Some(next) = step.then() {
            len += 1;
            step = next;
        }
        len
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selector::Identity)
    }

    /// Replace the terminal `Identity` of this chain with `next`.
    #[must_use]
    pub fn and_then(self, next: Selector) -> Selector {
        match self {
            Selector::Identity => next,
            step => step.map_then(|then| then.and_then(next)),
        }
    }

    fn map_then(self, f: impl FnOnce(Selector) -> Selector) -> Selector {
        let wrap = |then: Box<Selector>| Box::new(f(*then));
        match self {
            Selector::Identity => Selector::Identity,
            Selector::Get { key, then } => Selector::Get {
                key,
                then: wrap(then),
            },
            Selector::GetAttr { key, then } => Selector::GetAttr {
                key,
                then: wrap(then),
            },
            Selector::GetItem { index, then } => Selector::GetItem {
                index,
                then: wrap(then),
            },
            Selector::Keys { then } => Selector::Keys { then: wrap(then) },
            Selector::Values { then } => Selector::Values { then: wrap(then) },
            Selector::Children { then } => Selector::Children { then: wrap(then) },
            Selector::Descendants { then } => Selector::Descendants { then: wrap(then) },
            Selector::Filter { predicate, then } => Selector::Filter {
                predicate,
                then: wrap(then),
            },
            Selector::Literal { item, then } => Selector::Literal {
                item,
                then: wrap(then),
            },
        }
    }

    fn step(self, step: Selector) -> Selector {
        self.and_then(step)
    }

    #[must_use]
    pub fn get(self, key: impl Into<Value>) -> Selector {
        self.step(Selector::Get {
            key: Box::new(key.into()),
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn get_attr(self, key: impl Into<Text>) -> Selector {
        self.step(Selector::GetAttr {
            key: key.into(),
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn get_item(self, index: impl Into<Num>) -> Selector {
        self.step(Selector::GetItem {
            index: index.into(),
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn keys(self) -> Selector {
        self.step(Selector::Keys {
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn values(self) -> Selector {
        self.step(Selector::Values {
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn children(self) -> Selector {
        self.step(Selector::Children {
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn descendants(self) -> Selector {
        self.step(Selector::Descendants {
            then: Box::new(Selector::Identity),
        })
    }

    #[must_use]
    pub fn filter(self, predicate: impl Into<Value>) -> Selector {
        self.step(Selector::Filter {
            predicate: Box::new(predicate.into()),
            then: Box::new(Selector::Identity),
        })
    }
}

impl Default for Selector {
    fn default() -> Self {
        Selector::Identity
    }
}
