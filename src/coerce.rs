//! Type coercion kernel: string-to-number parsing and the scalar
//! `bool`/`int`/`float`/`string` conversions PHP applies at dynamic
//! type boundaries.

use crate::host::Host;
use crate::values::{ArrayKey, PhpArray, PhpObject, Value, ValueTag};

const PHP_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\u{0b}', '\0'];

/// The result of parsing a leading numeric prefix out of a string, used
/// by both string→number coercion and by comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }
}

/// Parse the leading numeric prefix of `s`, PHP-style: optional
/// whitespace, optional sign, digits, optional `.digits`, optional
/// `e[+-]?digits`. Returns the parsed number and whether the *entire*
/// trimmed string was consumed (a "well-formed numeric string").
pub fn parse_numeric_prefix(s: &str) -> Option<(Number, bool)> {
    let trimmed_start = s.trim_start_matches(PHP_WHITESPACE);
    let bytes = trimmed_start.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut is_float = false;
    let int_digits_end = i;
    if i < bytes.len() && bytes[i] == b'.' {
        let dot = i;
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > dot + 1 || int_digits_end > digits_start {
            is_float = true;
            i = j;
        }
    }
    if int_digits_end == digits_start && !is_float {
        return None;
    }
    let mantissa_end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_digits_start {
            is_float = true;
            i = j;
        }
    }
    let numeric_part = &trimmed_start[..i];
    let consumed_trailing_ws = trimmed_start[i..].trim_end_matches(PHP_WHITESPACE).is_empty();
    let fully_consumed = consumed_trailing_ws;
    if is_float {
        numeric_part.parse::<f64>().ok().map(|f| (Number::Float(f), fully_consumed))
    } else {
        let end = int_digits_end.max(mantissa_end);
        let int_part = &trimmed_start[..end];
        match int_part.parse::<i64>() {
            Ok(n) => Some((Number::Int(n), fully_consumed)),
            Err(_) => int_part.parse::<f64>().ok().map(|f| (Number::Float(f), fully_consumed)),
        }
    }
}

/// A plain (non-scientific, no leading/trailing junk) decimal integer
/// parse, used by [`crate::values::array_key::ArrayKey::normalize`].
pub fn parse_plain_i64(s: &str) -> Option<i64> {
    s.parse::<i64>().ok()
}

/// Answers "would this string NOT be read back as a canonical integer
/// array key".
pub fn looks_non_numeric(s: &str) -> bool {
    crate::values::array_key::ArrayKey::normalize(s) == crate::values::array_key::ArrayKey::Str(s.into())
}

pub fn as_bool(v: &Value) -> bool {
    match v.deref_copy() {
        Value::Bool(b) => b,
        Value::Int(n) => n != 0,
        Value::Float(x) => x != 0.0 && !x.is_nan(),
        Value::Str(s) => !(s.as_str().is_empty() || s.as_str() == "0"),
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
        Value::Resource(_) => true,
        Value::Constant(_) | Value::DelayedClassConstant(_) => true,
        Value::Reference(_) => unreachable!("deref_copy resolves references"),
    }
}

pub fn as_number(v: &Value) -> Number {
    match v.deref_copy() {
        Value::Int(n) => Number::Int(n),
        Value::Float(x) => Number::Float(x),
        Value::Bool(b) => Number::Int(b as i64),
        Value::Null => Number::Int(0),
        Value::Str(s) => parse_numeric_prefix(s.as_str()).map(|(n, _)| n).unwrap_or(Number::Int(0)),
        Value::Array(a) => Number::Int((!a.is_empty()) as i64),
        _ => Number::Int(1),
    }
}

pub fn as_int(v: &Value) -> i64 {
    match as_number(v) {
        Number::Int(n) => n,
        Number::Float(x) => float_to_int(x),
    }
}

fn float_to_int(x: f64) -> i64 {
    if !x.is_finite() {
        return 0;
    }
    if x >= i64::MAX as f64 {
        return i64::MAX;
    }
    if x <= i64::MIN as f64 {
        return i64::MIN;
    }
    x as i64
}

pub fn as_float(v: &Value) -> f64 {
    as_number(v).as_f64()
}

/// `force_int`: like `as_int`, but strings are scanned for a leading
/// sign+digits run only (no `.`/exponent), per `_force_int_from_str`.
pub fn force_int(v: &Value) -> i64 {
    match v.deref_copy() {
        Value::Str(s) => {
            let bytes = s.as_str().as_bytes();
            let mut i = 0;
            if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
                i += 1;
            }
            let digits_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i == digits_start {
                0
            } else {
                s.as_str()[..i].parse::<i64>().unwrap_or(0)
            }
        }
        other => as_int(&other),
    }
}

/// Is `v` usable as a PHP integer array key without string conversion?
pub fn is_really_int(v: &Value) -> bool {
    matches!(v.deref_copy().tag(), ValueTag::Int)
}

/// `as_string`, with array-to-string producing the `"Array"` sentinel
/// and a diagnostic. This is the bare scalar-cast contract (spec.md
/// §4.1); see [`array_to_string_conversion`] for the distinct,
/// per-element concatenation the original also exposes under that name.
pub fn as_string(v: &Value, host: &dyn Host) -> String {
    match v.deref_copy() {
        Value::Array(_) => {
            host.notice("Array to string conversion");
            "Array".to_owned()
        }
        other => other.to_string(),
    }
}

/// `array_to_string_conversion`: concatenate the string form of every
/// element in insertion order, emitting an "Array to string conversion"
/// notice for each element that is itself a (nested) array — distinct
/// from [`as_string`]'s own array rule, which always collapses the
/// *whole* array to the literal `"Array"` with a single notice.
pub fn array_to_string_conversion(host: &dyn Host, arr: &PhpArray) -> String {
    let mut out = String::new();
    for (_, value) in arr.iter() {
        let value = value.deref_copy();
        if matches!(value, Value::Array(_)) {
            host.notice("Array to string conversion");
        }
        out.push_str(&as_string(&value, host));
    }
    out
}

/// `as_array(v)`: `Object` → its attribute map as an array (insertion
/// order, field names normalized through [`ArrayKey`]); `Array` → self;
/// `Null` → an empty array; anything else → the singleton array `[v]`.
pub fn as_array(v: &Value) -> PhpArray {
    match v.deref_copy() {
        Value::Array(a) => a,
        Value::Object(o) => {
            let mut arr = PhpArray::new();
            for (name, value) in o.fields_snapshot() {
                arr.insert(ArrayKey::normalize(&name), value);
            }
            arr
        }
        Value::Null => PhpArray::new(),
        other => PhpArray::from_list([other]),
    }
}

/// `as_object(v)`: identity if `v` is already an object; otherwise a
/// fresh default object (`Host::default_object_class`, `"stdClass"` by
/// default). An array's entries become the new object's attributes
/// (keyed by their display form); `Null` yields an empty object; any
/// other scalar is stashed under the conventional `scalar` attribute.
pub fn as_object(v: &Value, host: &dyn Host) -> PhpObject {
    match v.deref_copy() {
        Value::Object(o) => o,
        other => {
            let obj = PhpObject::new(host.default_object_class());
            match other {
                Value::Array(arr) => {
                    for (key, value) in arr.iter() {
                        obj.set(key.as_display_string(), value.clone());
                    }
                }
                Value::Null => {}
                scalar => obj.set("scalar", scalar),
            }
            obj
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DefaultHost;

    #[test]
    fn numeric_prefix_of_leading_number_string() {
        let (n, full) = parse_numeric_prefix("  42abc").unwrap();
        assert_eq!(n, Number::Int(42));
        assert!(!full);
    }

    #[test]
    fn numeric_prefix_float_with_exponent() {
        let (n, full) = parse_numeric_prefix("1.5e2").unwrap();
        assert_eq!(n, Number::Float(150.0));
        assert!(full);
    }

    #[test]
    fn as_bool_matches_php_falsy_rules() {
        assert!(!as_bool(&Value::str("0")));
        assert!(as_bool(&Value::str("0.0")));
        assert!(!as_bool(&Value::str("")));
        assert!(!as_bool(&Value::Int(0)));
        assert!(!as_bool(&Value::Float(-0.0)));
        assert!(!as_bool(&Value::Float(f64::NAN)));
    }

    #[test]
    fn force_int_ignores_decimal_point() {
        assert_eq!(force_int(&Value::str("3.9")), 3);
        assert_eq!(force_int(&Value::str("-3.9")), -3);
        assert_eq!(force_int(&Value::str("abc")), 0);
    }

    #[test]
    fn array_to_string_emits_notice_and_sentinel() {
        let host = DefaultHost;
        let arr = crate::values::PhpArray::new();
        assert_eq!(as_string(&Value::Array(arr), &host), "Array");
    }

    #[test]
    fn looks_non_numeric_matches_array_key_normalization() {
        assert!(!looks_non_numeric("42"));
        assert!(looks_non_numeric("042"));
        assert!(looks_non_numeric("abc"));
    }

    #[test]
    fn array_to_string_conversion_concatenates_elements_and_notices_nested_arrays() {
        let host = DefaultHost;
        let inner = PhpArray::new();
        let mut arr = PhpArray::new();
        arr.append(Value::Int(1));
        arr.append(Value::str("x"));
        arr.append(Value::Array(inner));
        assert_eq!(array_to_string_conversion(&host, &arr), "1xArray");
    }

    #[test]
    fn as_array_of_array_is_identity() {
        let mut arr = PhpArray::new();
        arr.append(Value::Int(1));
        let result = as_array(&Value::Array(arr.clone()));
        assert!(result.is_same_storage(&arr));
    }

    #[test]
    fn as_array_of_null_is_empty() {
        let result = as_array(&Value::Null);
        assert!(result.is_empty());
    }

    #[test]
    fn as_array_of_scalar_is_a_singleton() {
        let result = as_array(&Value::Int(5));
        assert_eq!(result.get(&ArrayKey::Int(0)), Some(&Value::Int(5)));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn as_array_of_object_snapshots_its_fields() {
        let obj = PhpObject::new("Point");
        obj.set("x", Value::Int(1));
        obj.set("y", Value::Int(2));
        let result = as_array(&Value::Object(obj));
        assert_eq!(result.get(&ArrayKey::Str("x".into())), Some(&Value::Int(1)));
        assert_eq!(result.get(&ArrayKey::Str("y".into())), Some(&Value::Int(2)));
    }

    #[test]
    fn as_object_of_object_is_identity() {
        let host = DefaultHost;
        let obj = PhpObject::new("Point");
        let result = as_object(&Value::Object(obj.clone()), &host);
        assert!(result.is_same_instance(&obj));
    }

    #[test]
    fn as_object_of_null_has_no_fields() {
        let host = DefaultHost;
        let result = as_object(&Value::Null, &host);
        assert_eq!(result.field_count(), 0);
    }

    #[test]
    fn as_object_of_scalar_uses_the_scalar_field() {
        let host = DefaultHost;
        let result = as_object(&Value::Int(5), &host);
        assert_eq!(result.get("scalar"), Some(Value::Int(5)));
        assert_eq!(result.class_name().as_ref(), "stdClass");
    }

    #[test]
    fn as_object_of_array_copies_entries_as_attributes() {
        let host = DefaultHost;
        let mut arr = PhpArray::new();
        arr.insert(ArrayKey::Str("x".into()), Value::Int(1));
        let result = as_object(&Value::Array(arr), &host);
        assert_eq!(result.get("x"), Some(Value::Int(1)));
    }
}
