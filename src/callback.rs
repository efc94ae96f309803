//! Callback resolution: turn one of four callable
//! shapes into a bound invocable, and the outer `get_callback` wrapper
//! used at argument-validation boundaries throughout the interpreter.

use crate::error::CallbackError;
use crate::host::Host;
use crate::ident::is_valid_clsname;
use crate::values::object::PhpObject;
use crate::values::value::Value;

/// A callable value already paired with its `this` receiver, per the
/// glossary's "bound invocable". `this` is `None` for a plain function
/// or a static method call.
#[derive(Debug, Clone)]
pub struct BoundInvocable {
    pub callable: Value,
    pub this: Option<PhpObject>,
}

impl BoundInvocable {
    fn function(callable: Value) -> BoundInvocable {
        BoundInvocable { callable, this: None }
    }

    fn method(callable: Value, this: Option<PhpObject>) -> BoundInvocable {
        BoundInvocable { callable, this }
    }

    /// The invocable `get_callback` hands back on a resolution failure
    /// when warnings are requested rather than a hard error: a callable
    /// that resolves to nothing.
    fn null() -> BoundInvocable {
        BoundInvocable { callable: Value::Null, this: None }
    }
}

/// `get_callable`: resolve `v` to a [`BoundInvocable`], trying each of
/// the four callable shapes in turn.
pub fn resolve_callback(host: &dyn Host, v: &Value) -> Result<BoundInvocable, CallbackError> {
    match v.deref_copy() {
        Value::Str(s) => resolve_string_callback(host, s.as_str()),
        Value::Array(arr) => resolve_array_callback(host, &arr),
        Value::Object(obj) => resolve_object_callback(host, &obj),
        other => Err(CallbackError::NotCallable(other.tag())),
    }
}

fn resolve_string_callback(host: &dyn Host, s: &str) -> Result<BoundInvocable, CallbackError> {
    if s.is_empty() {
        return Err(CallbackError::EmptyName);
    }
    match s.split_once("::") {
        Some((class, method)) => resolve_static_method(host, class, method),
        None => host
            .resolve_function(s)
            .map(BoundInvocable::function)
            .ok_or_else(|| CallbackError::UnknownFunction(s.to_owned())),
    }
}

fn resolve_static_method(host: &dyn Host, class: &str, method: &str) -> Result<BoundInvocable, CallbackError> {
    if !host.class_exists(class) {
        return Err(CallbackError::UnknownClass(class.to_owned()));
    }
    host.resolve_method(class, method)
        .map(|callable| BoundInvocable::method(callable, host.current_this()))
        .ok_or_else(|| CallbackError::UnknownMethod {
            class: class.to_owned(),
            method: method.to_owned(),
        })
}

/// Shapes 3 and 4: `[instance, "method"]` and `["Cls", "method"]`.
fn resolve_array_callback(host: &dyn Host, arr: &crate::values::PhpArray) -> Result<BoundInvocable, CallbackError> {
    use crate::values::array_key::ArrayKey;

    let first = arr
        .get(&ArrayKey::Int(0))
        .map(Value::deref_copy)
        .ok_or_else(|| CallbackError::MalformedCallableString("[0, 1] array callback".to_owned()))?;
    let method = arr
        .get(&ArrayKey::Int(1))
        .map(Value::deref_copy)
        .ok_or_else(|| CallbackError::MalformedCallableString("[0, 1] array callback".to_owned()))?;
    let Value::Str(method) = method else {
        return Err(CallbackError::MalformedCallableString(
            "array callback's second element must be a method name string".to_owned(),
        ));
    };
    let method = method.as_str();

    match first {
        Value::Object(instance) => {
            let class = instance.class_name();
            host.resolve_method(&class, method)
                .map(|callable| BoundInvocable::method(callable, Some(instance)))
                .ok_or_else(|| CallbackError::UnknownMethod {
                    class: class.to_string(),
                    method: method.to_owned(),
                })
        }
        Value::Str(class) => {
            let class = class.as_str();
            if !is_valid_clsname(class) {
                return Err(CallbackError::MalformedCallableString(format!(
                    "{class:?} is not a valid class name"
                )));
            }
            resolve_static_method(host, class, method)
        }
        other => Err(CallbackError::NotCallable(other.tag())),
    }
}

/// Shape 5: an invokable object (`__invoke`).
fn resolve_object_callback(host: &dyn Host, obj: &PhpObject) -> Result<BoundInvocable, CallbackError> {
    if !host.is_invokable(obj) {
        return Err(CallbackError::NotCallable(crate::values::ValueTag::Object));
    }
    host.invokable_callable(obj)
        .map(|callable| BoundInvocable::method(callable, Some(obj.clone())))
        .ok_or(CallbackError::NotCallable(crate::values::ValueTag::Object))
}

/// `get_callback(fname, arg_no, v, give_warning)`: the outer,
/// warning-emitting wrapper used at argument-validation boundaries.
/// On failure with `give_warning`, emits PHP's
/// `"<fname>() expects parameter <arg_no> to be a valid callback, <msg>"`
/// and returns a null invocable rather than propagating the error.
pub fn get_callback(
    host: &dyn Host,
    fname: &str,
    arg_no: u32,
    v: &Value,
    give_warning: bool,
) -> BoundInvocable {
    match resolve_callback(host, v) {
        Ok(bound) => bound,
        Err(err) => {
            if give_warning {
                host.warn(&format!(
                    "{fname}() expects parameter {arg_no} to be a valid callback, {err}"
                ));
            }
            BoundInvocable::null()
        }
    }
}
