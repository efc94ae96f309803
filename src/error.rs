use thiserror::Error;

use crate::values::tag::ValueTag;

/// Failures that can occur while coercing or operating on values.
///
/// These are the typed-error channel from the error handling design:
/// recoverable conditions a caller can match on, as opposed to the
/// diagnostic sinks on [`crate::host::Host`] (which never return an
/// `Err`) or the value-level sentinels (`false`/`null`) used for PHP's
/// own div/mod-by-zero and missing-array-item semantics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("comparison stack depth exceeded ({0})")]
    ComparatorDepthExceeded(usize),
}

/// Failures resolving a PHP-style callback.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CallbackError {
    #[error("empty callback name")]
    EmptyName,

    #[error("class {0:?} is not registered")]
    UnknownClass(String),

    #[error("method {method:?} not found on class {class:?}")]
    UnknownMethod { class: String, method: String },

    #[error("function {0:?} is not registered")]
    UnknownFunction(String),

    #[error("value of type {0} is not callable")]
    NotCallable(ValueTag),

    #[error("malformed callback string {0:?}")]
    MalformedCallableString(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_messages_are_stable() {
        let e = ValueError::ComparatorDepthExceeded(3);
        assert_eq!(e.to_string(), "comparison stack depth exceeded (3)");
    }

    #[test]
    fn callback_error_messages_are_stable() {
        let e = CallbackError::UnknownMethod {
            class: "Foo".into(),
            method: "bar".into(),
        };
        assert_eq!(e.to_string(), "method \"bar\" not found on class \"Foo\"");
    }
}
