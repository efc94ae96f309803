use std::rc::Rc;

/// A reference to a registered global constant that has not yet been
/// resolved to its underlying value.
///
/// PHP constants are resolved lazily at the point of use (so that
/// `define()` calls earlier in a script take effect); keeping the name
/// around as its own tagged value, rather than eagerly resolving it,
/// is what the "Constant" and "DelayedClassConstant" value kinds are for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstantRef {
    pub name: Rc<str>,
}

impl ConstantRef {
    pub fn new(name: impl Into<Rc<str>>) -> ConstantRef {
        ConstantRef { name: name.into() }
    }
}

/// A reference to `Class::CONST` that could not be resolved at parse
/// time because the class wasn't known yet (forward-referenced class
/// constants, the original's `W_DelayedClassConstant`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DelayedClassConstantRef {
    pub class: Rc<str>,
    pub constant: Rc<str>,
}

impl DelayedClassConstantRef {
    pub fn new(class: impl Into<Rc<str>>, constant: impl Into<Rc<str>>) -> DelayedClassConstantRef {
        DelayedClassConstantRef {
            class: class.into(),
            constant: constant.into(),
        }
    }
}
