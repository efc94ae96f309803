//! Arithmetic, modulo, shift and bitwise operators.
//!
//! Binary arithmetic is generated uniformly over a widen-then-dispatch
//! helper; modulo, shifts and bitwise ops are hand-written since they
//! each need their own sign/overflow handling rather than a generic
//! widen-then-dispatch.

use crate::coerce::{self, Number};
use crate::host::Host;
use crate::values::{PhpArray, Value, ValueTag};

/// The word-width shift mask. The crate
/// targets the 64-bit path; flip to `31` to build for a 32-bit word
/// size.
pub const SHIFT_MASK: u32 = 63;

fn supports_arithmetic(v: &Value) -> bool {
    !matches!(
        v.tag(),
        ValueTag::Array | ValueTag::Object | ValueTag::Constant | ValueTag::DelayedClassConstant
    ) && !v.tag().is_resource()
}

fn number_value(n: Number) -> Value {
    match n {
        Number::Int(i) => Value::Int(i),
        Number::Float(f) => Value::Float(f),
    }
}

/// Widen both operands to a common numeric representation (`Int` if
/// both are integers, `Float` otherwise) and apply `op_i`/`op_f`. When
/// `op_i` overflows, the result is promoted to `Float` by re-running
/// `op_f` on the widened operands — "integer overflow promotes to
/// Float".
fn binop(
    host: &dyn Host,
    left: &Value,
    right: &Value,
    op_i: fn(i64, i64) -> Option<i64>,
    op_f: fn(f64, f64) -> f64,
) -> Value {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if !supports_arithmetic(&left) || !supports_arithmetic(&right) {
        host.fatal("Unsupported operand types");
        return Value::Null;
    }
    match (coerce::as_number(&left), coerce::as_number(&right)) {
        (Number::Int(a), Number::Int(b)) => match op_i(a, b) {
            Some(v) => Value::Int(v),
            None => Value::Float(op_f(a as f64, b as f64)),
        },
        (a, b) => Value::Float(op_f(a.as_f64(), b.as_f64())),
    }
}

/// `add`, with the array-union special case: `add(array, array)` is a
/// left-biased union, not an arithmetic operation.
pub fn add(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left_deref = left.deref_copy();
    let right_deref = right.deref_copy();
    if let (Value::Array(a), Value::Array(b)) = (&left_deref, &right_deref) {
        return Value::Array(array_union(a, b));
    }
    binop(host, &left_deref, &right_deref, i64::checked_add, |a, b| a + b)
}

/// Left-biased array union: every key of `left` wins; keys from `right`
/// not already present in `left` are appended after it, in `right`'s
/// own insertion order.
fn array_union(left: &PhpArray, right: &PhpArray) -> PhpArray {
    let mut result = left.clone();
    for (key, value) in right.iter() {
        if !result.contains_key(key) {
            result.insert(key.clone(), value.clone());
        }
    }
    result
}

pub fn sub(host: &dyn Host, left: &Value, right: &Value) -> Value {
    binop(host, left, right, i64::checked_sub, |a, b| a - b)
}

pub fn mul(host: &dyn Host, left: &Value, right: &Value) -> Value {
    binop(host, left, right, i64::checked_mul, |a, b| a * b)
}

/// `div`: unlike `%`, division by zero does not return `false` — it
/// follows IEEE float semantics (`+Inf`/`-Inf`/`NaN`), with a `warn`
/// diagnostic.
pub fn div(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if !supports_arithmetic(&left) || !supports_arithmetic(&right) {
        host.fatal("Unsupported operand types");
        return Value::Null;
    }
    let a = coerce::as_number(&left);
    let b = coerce::as_number(&right);
    let bf = b.as_f64();
    if bf == 0.0 {
        host.warn("Division by zero");
        let af = a.as_f64();
        return Value::Float(if af == 0.0 {
            f64::NAN
        } else if af > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        });
    }
    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        // `i64::MIN / -1` (and the matching `%`) overflows the type and
        // would panic in debug / wrap in release; PHP just returns the
        // float result here like any other overflowing operation.
        if let Some(0) = x.checked_rem(y) {
            if let Some(q) = x.checked_div(y) {
                return Value::Int(q);
            }
        }
    }
    Value::Float(a.as_f64() / bf)
}

pub fn pow(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if !supports_arithmetic(&left) || !supports_arithmetic(&right) {
        host.fatal("Unsupported operand types");
        return Value::Null;
    }
    match (coerce::as_number(&left), coerce::as_number(&right)) {
        (Number::Int(a), Number::Int(b)) if b >= 0 => {
            let promoted = u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp));
            match promoted {
                Some(v) => Value::Int(v),
                None => Value::Float((a as f64).powf(b as f64)),
            }
        }
        (a, b) => Value::Float(a.as_f64().powf(b.as_f64())),
    }
}

/// `mod`: truncated-toward-zero remainder with PHP's sign correction.
/// Division by zero warns and yields `false`; `-1` always yields `0`.
pub fn modulo(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left = coerce::force_int(left);
    let right = coerce::force_int(right);
    modulo_int(host, left, right)
}

fn modulo_int(host: &dyn Host, left: i64, right: i64) -> Value {
    if right == 0 {
        host.warn("Division by zero");
        return Value::Bool(false);
    }
    if right == -1 {
        return Value::Int(0);
    }
    let mut z = left % right;
    if z != 0 && ((left < 0 && right > 0) || (left > 0 && right < 0)) {
        z -= right;
    }
    Value::Int(z)
}

pub fn lshift(left: &Value, right: &Value) -> Value {
    let left = coerce::force_int(left);
    let right = coerce::force_int(right);
    Value::Int(left.wrapping_shl((right as u32) & SHIFT_MASK))
}

pub fn rshift(left: &Value, right: &Value) -> Value {
    let left = coerce::force_int(left);
    let right = coerce::force_int(right);
    Value::Int(left.wrapping_shr((right as u32) & SHIFT_MASK))
}

/// Byte-wise OR: the longer operand's tail survives untouched. Builds
/// the result as raw bytes and hands them to [`Value::str_bytes`] —
/// never through `String`/`str`, which would force every byte through
/// UTF-8 validation and mangle any result byte `>= 0x80` that doesn't
/// happen to form a valid sequence with its neighbors.
fn string_or(left: &[u8], right: &[u8]) -> Vec<u8> {
    use itertools::{EitherOrBoth, Itertools};

    left.iter()
        .copied()
        .zip_longest(right.iter().copied())
        .map(|pair| match pair {
            EitherOrBoth::Both(a, b) => a | b,
            EitherOrBoth::Left(a) | EitherOrBoth::Right(a) => a,
        })
        .collect()
}

/// Byte-wise AND/XOR: output length is the shorter operand's length.
fn string_bitwise(left: &[u8], right: &[u8], op: fn(u8, u8) -> u8) -> Vec<u8> {
    let n = left.len().min(right.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(op(left[i], right[i]));
    }
    out
}

pub fn bitand(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Value::str_bytes(string_bitwise(a.as_bytes(), b.as_bytes(), |x, y| x & y));
    }
    let _ = host;
    Value::Int(coerce::as_int(&left) & coerce::as_int(&right))
}

pub fn bitxor(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Value::str_bytes(string_bitwise(a.as_bytes(), b.as_bytes(), |x, y| x ^ y));
    }
    let _ = host;
    Value::Int(coerce::as_int(&left) ^ coerce::as_int(&right))
}

pub fn bitor(host: &dyn Host, left: &Value, right: &Value) -> Value {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return Value::str_bytes(string_or(a.as_bytes(), b.as_bytes()));
    }
    let _ = host;
    Value::Int(coerce::as_int(&left) | coerce::as_int(&right))
}

/// `uplus`: unary `+`, a bare numeric coercion.
pub fn uplus(v: &Value) -> Value {
    number_value(coerce::as_number(v))
}

/// `uminus`: unary `-`. `i64::MIN` negation overflows, promoting to
/// `Float` like any other overflowing arithmetic op.
pub fn uminus(v: &Value) -> Value {
    match coerce::as_number(v) {
        Number::Int(n) => n.checked_neg().map(Value::Int).unwrap_or(Value::Float(-(n as f64))),
        Number::Float(f) => Value::Float(-f),
    }
}

/// `uplusplus`: pre/post increment. Strings follow PHP's famous
/// alphanumeric increment (`"z"++ == "aa"`, `"a9"++ == "b0"`) when the
/// string is not itself a well-formed number; `null++` is `1`; `bool`
/// is left untouched.
pub fn uplusplus(v: &Value) -> Value {
    match v.deref_copy() {
        Value::Null => Value::Int(1),
        Value::Int(n) => n.checked_add(1).map(Value::Int).unwrap_or(Value::Float(n as f64 + 1.0)),
        Value::Float(f) => Value::Float(f + 1.0),
        Value::Bool(b) => Value::Bool(b),
        Value::Str(s) => increment_string(s.as_str()),
        other => other,
    }
}

fn increment_string(s: &str) -> Value {
    if s.is_empty() {
        return Value::str("1");
    }
    if let Some((n, true)) = coerce::parse_numeric_prefix(s) {
        return match n {
            Number::Int(i) => i.checked_add(1).map(Value::Int).unwrap_or(Value::Float(i as f64 + 1.0)),
            Number::Float(f) => Value::Float(f + 1.0),
        };
    }
    let mut chars: Vec<char> = s.chars().collect();
    if !chars.iter().all(|c| c.is_ascii_alphanumeric()) {
        return Value::str(s);
    }
    let mut i = chars.len();
    let mut carry = true;
    while carry && i > 0 {
        i -= 1;
        let c = chars[i];
        carry = false;
        chars[i] = match c {
            'z' => {
                carry = true;
                'a'
            }
            'Z' => {
                carry = true;
                'A'
            }
            '9' => {
                carry = true;
                '0'
            }
            c if c.is_ascii_digit() || c.is_ascii_lowercase() || c.is_ascii_uppercase() => {
                ((c as u8) + 1) as char
            }
            c => c,
        };
    }
    if carry {
        let lead = match chars[0] {
            c if c.is_ascii_digit() => '1',
            c if c.is_ascii_uppercase() => 'A',
            _ => 'a',
        };
        chars.insert(0, lead);
    }
    Value::str(chars.into_iter().collect::<String>())
}

/// `uminusminus`: pre/post decrement. Unlike increment, a non-numeric
/// string decrement is a no-op (PHP has no alphanumeric decrement);
/// `null--` stays `null`.
pub fn uminusminus(v: &Value) -> Value {
    match v.deref_copy() {
        Value::Null => Value::Null,
        Value::Int(n) => n.checked_sub(1).map(Value::Int).unwrap_or(Value::Float(n as f64 - 1.0)),
        Value::Float(f) => Value::Float(f - 1.0),
        Value::Bool(b) => Value::Bool(b),
        Value::Str(s) => match coerce::parse_numeric_prefix(s.as_str()) {
            Some((Number::Int(i), true)) => {
                i.checked_sub(1).map(Value::Int).unwrap_or(Value::Float(i as f64 - 1.0))
            }
            Some((Number::Float(f), true)) => Value::Float(f - 1.0),
            _ => Value::Str(s),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DefaultHost;
    use crate::values::array_key::ArrayKey;

    fn h() -> DefaultHost {
        DefaultHost
    }

    #[test]
    fn add_integers_stays_integer() {
        assert_eq!(add(&h(), &Value::Int(2), &Value::Int(3)), Value::Int(5));
    }

    #[test]
    fn add_overflow_promotes_to_float() {
        let v = add(&h(), &Value::Int(i64::MAX), &Value::Int(1));
        assert!(matches!(v, Value::Float(_)));
    }

    #[test]
    fn add_two_arrays_is_left_biased_union() {
        let left = PhpArray::from_pairs([(ArrayKey::Str("x".into()), Value::Int(1))]);
        let right = PhpArray::from_pairs([
            (ArrayKey::Str("x".into()), Value::Int(99)),
            (ArrayKey::Str("y".into()), Value::Int(2)),
        ]);
        let Value::Array(result) = add(&h(), &Value::Array(left), &Value::Array(right)) else {
            panic!("expected array");
        };
        assert_eq!(result.get(&ArrayKey::Str("x".into())), Some(&Value::Int(1)));
        assert_eq!(result.get(&ArrayKey::Str("y".into())), Some(&Value::Int(2)));
    }

    #[test]
    fn modulo_matches_php_sign_rule() {
        assert_eq!(modulo(&h(), &Value::Int(-7), &Value::Int(3)), Value::Int(-1));
        assert_eq!(modulo(&h(), &Value::Int(7), &Value::Int(-3)), Value::Int(1));
    }

    #[test]
    fn modulo_by_zero_warns_and_yields_false() {
        assert_eq!(modulo(&h(), &Value::Int(7), &Value::Int(0)), Value::Bool(false));
    }

    #[test]
    fn modulo_by_negative_one_is_zero() {
        assert_eq!(modulo(&h(), &Value::Int(7), &Value::Int(-1)), Value::Int(0));
    }

    #[test]
    fn div_by_zero_follows_ieee_semantics() {
        assert_eq!(div(&h(), &Value::Int(1), &Value::Int(0)), Value::Float(f64::INFINITY));
        assert_eq!(div(&h(), &Value::Int(-1), &Value::Int(0)), Value::Float(f64::NEG_INFINITY));
        assert!(matches!(div(&h(), &Value::Int(0), &Value::Int(0)), Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn div_of_int_min_by_negative_one_promotes_to_float_without_panicking() {
        let v = div(&h(), &Value::Int(i64::MIN), &Value::Int(-1));
        assert_eq!(v, Value::Float(-(i64::MIN as f64)));
    }

    #[test]
    fn string_or_preserves_longer_tail() {
        assert_eq!(bitor(&h(), &Value::str("AB"), &Value::str("abcd")), Value::str("abcd"));
    }

    #[test]
    fn string_bitwise_ops_preserve_high_bytes_exactly() {
        let left = Value::str_bytes(vec![0xC0, 0x01]);
        let right = Value::str_bytes(vec![0x01, 0xFF]);
        let Value::Str(xored) = bitxor(&h(), &left, &right) else {
            panic!("expected string");
        };
        assert_eq!(xored.as_bytes(), &[0xC0 ^ 0x01, 0x01 ^ 0xFF]);

        let Value::Str(ored) = bitor(&h(), &Value::str_bytes(vec![0x80]), &Value::str_bytes(vec![0x01, 0x02])) else {
            panic!("expected string");
        };
        assert_eq!(ored.as_bytes(), &[0x80 | 0x01, 0x02]);
    }

    #[test]
    fn string_and_truncates_to_shorter() {
        let v = bitand(&h(), &Value::str("abcd"), &Value::str("AB"));
        assert_eq!(v, Value::str("AB"));
    }

    #[test]
    fn shift_masks_by_word_width() {
        assert_eq!(lshift(&Value::Int(1), &Value::Int(64)), lshift(&Value::Int(1), &Value::Int(0)));
    }

    #[test]
    fn increment_alpha_string_carries_and_grows() {
        assert_eq!(uplusplus(&Value::str("z")), Value::str("aa"));
        assert_eq!(uplusplus(&Value::str("a9")), Value::str("b0"));
        assert_eq!(uplusplus(&Value::str("Az")), Value::str("Ba"));
        assert_eq!(uplusplus(&Value::str("zz")), Value::str("aaa"));
    }

    #[test]
    fn increment_numeric_string_increments_numerically() {
        assert_eq!(uplusplus(&Value::str("9")), Value::Int(10));
    }

    #[test]
    fn decrement_nonnumeric_string_is_a_no_op() {
        assert_eq!(uminusminus(&Value::str("abc")), Value::str("abc"));
    }

    #[test]
    fn decrement_null_stays_null() {
        assert_eq!(uminusminus(&Value::Null), Value::Null);
    }
}
