use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::values::value::Value;

/// A PHP object instance.
///
/// Objects are always handle semantics in PHP (unlike arrays, which are
/// value semantics with copy-on-write): assigning or passing an object
/// copies the handle, not the fields — an `Rc<RefCell<_>>`
/// object-identity pattern where two `PhpObject` handles compare `===`
/// iff they share the same inner allocation.
#[derive(Debug, Clone)]
pub struct PhpObject(Rc<RefCell<ObjectBody>>);

#[derive(Debug)]
struct ObjectBody {
    class: Rc<str>,
    fields: IndexMap<Rc<str>, Value>,
}

impl PhpObject {
    pub fn new(class: impl Into<Rc<str>>) -> PhpObject {
        PhpObject(Rc::new(RefCell::new(ObjectBody {
            class: class.into(),
            fields: IndexMap::new(),
        })))
    }

    pub fn class_name(&self) -> Rc<str> {
        self.0.borrow().class.clone()
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        self.0.borrow().fields.get(field).cloned()
    }

    pub fn set(&self, field: impl Into<Rc<str>>, value: Value) {
        self.0.borrow_mut().fields.insert(field.into(), value);
    }

    pub fn field_count(&self) -> usize {
        self.0.borrow().fields.len()
    }

    /// Identity comparison (`===` between two objects): same allocation.
    pub fn is_same_instance(&self, other: &PhpObject) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The backing allocation's address, used by [`crate::serialize`]
    /// to detect cycles without needing a full identity-comparison API.
    pub fn storage_ptr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Snapshot of `(field, value)` pairs in insertion order, for the
    /// aggregate comparator and `serialize`/`var_export`-style walks.
    pub fn fields_snapshot(&self) -> Vec<(Rc<str>, Value)> {
        self.0
            .borrow()
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
