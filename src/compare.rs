//! Loose and strict comparison across all type pairs,
//! including the iterative, stack-bounded aggregate comparator.
//!
//! The aggregate comparator uses an explicit LIFO work stack, not a
//! FIFO queue: the spec's "earliest differing element in natural
//! iteration order wins" means depth-first order — as if this had been
//! written as ordinary recursion — so a pair of nested aggregates found
//! while scanning one array/object must be fully resolved before its
//! later siblings, and long before any pair some earlier level of the
//! traversal already deferred. A plain FIFO queue gives breadth-first
//! order instead, which can pick the wrong earliest-differing element.
//! The trick (mirroring the original's `obj_st`/`new_st` pair): work
//! found while scanning one level is collected into a level-local
//! `deferred` list in encounter order, then pushed onto the stack
//! *reversed* once that level's scan ends — since the stack pops from
//! the end, the reversal makes the first-found item the next one
//! popped, restoring natural order without ever recursing.

use crate::coerce::{self, Number};
use crate::host::Host;
use crate::values::{Value, ValueTag};

/// Three-way compare with an `ignore_order` early-exit hint: callers
/// that only care whether the result is zero may get back `-1` for an
/// unequal pair regardless of true ordering.
fn order<T: PartialOrd>(a: T, b: T, ignore_order: bool) -> i32 {
    if a == b {
        return 0;
    }
    if ignore_order || a < b {
        -1
    } else {
        1
    }
}

fn number_value(n: Number) -> Value {
    match n {
        Number::Int(i) => Value::Int(i),
        Number::Float(f) => Value::Float(f),
    }
}

fn is_aggregate(v: &Value) -> bool {
    matches!(v.tag(), ValueTag::Array | ValueTag::Object)
}

/// Cheap "obviously the same value" check used to short-circuit the
/// aggregate comparator before it does any real work on a pair — a
/// pointer-identity check, approximated by reference/handle identity
/// for aggregates and plain equality for scalars (both O(1), unlike a
/// full structural comparison).
fn is_identical_fast(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => x.is_same_storage(y),
        (Value::Object(x), Value::Object(y)) => x.is_same_instance(y),
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Null, Value::Null) => true,
        (Value::Str(x), Value::Str(y)) => x.as_str() == y.as_str(),
        _ => false,
    }
}

fn compare_strings(left: &str, right: &str, strict: bool, ignore_order: bool) -> i32 {
    if !strict {
        let left_bytes = left.as_bytes();
        let right_bytes = right.as_bytes();
        if left_bytes.len() == 1 && right_bytes.len() == 1 {
            return order(left_bytes[0], right_bytes[0], ignore_order);
        }
        if let Some((right_num, true)) = coerce::parse_numeric_prefix(right) {
            if let Some((left_num, true)) = coerce::parse_numeric_prefix(left) {
                return compare_numbers(left_num, right_num, ignore_order);
            }
        }
    }
    order(left, right, ignore_order)
}

fn compare_numbers(a: Number, b: Number, ignore_order: bool) -> i32 {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => order(x, y, ignore_order),
        _ => order(a.as_f64(), b.as_f64(), ignore_order),
    }
}

/// `compare(left, right, strict, ignore_order)`: the comparator's
/// single public entry point. Returns `-1 | 0 | 1`.
pub fn compare(host: &dyn Host, left: &Value, right: &Value, strict: bool, ignore_order: bool) -> i32 {
    let left = left.deref_copy();
    let right = right.deref_copy();

    if strict && left.tag() != right.tag() {
        return 1;
    }

    match (&left, &right) {
        (Value::Float(a), Value::Float(b)) => order(*a, *b, ignore_order),
        (Value::Int(a), Value::Float(b)) => order(*a as f64, *b, ignore_order),
        (Value::Float(a), Value::Int(b)) => order(*a, *b as f64, ignore_order),
        (Value::Int(a), Value::Int(b)) => order(*a, *b, ignore_order),
        (Value::Array(a), Value::Array(b)) => {
            if a.is_same_storage(b) {
                return 0;
            }
            if a.len() != b.len() {
                return order(a.len(), b.len(), ignore_order);
            }
            compare_aggregates(host, &left, &right, strict, ignore_order, &mut None)
                .expect("unbounded budget never errors")
        }
        (Value::Null, Value::Null) => 0,
        (Value::Null, Value::Bool(b)) => {
            if *b {
                -1
            } else {
                0
            }
        }
        (Value::Bool(a), Value::Null) => {
            if *a {
                1
            } else {
                0
            }
        }
        (Value::Bool(a), Value::Bool(b)) => order(*a, *b, ignore_order),
        (Value::Str(a), Value::Str(b)) => compare_strings(a.as_str(), b.as_str(), strict, ignore_order),
        (Value::Null, Value::Str(s)) => order("", s.as_str(), ignore_order),
        (Value::Str(s), Value::Null) => order(s.as_str(), "", ignore_order),
        (Value::Object(_), Value::Null) => 1,
        (Value::Null, Value::Object(_)) => -1,
        (Value::Object(a), Value::Object(b)) => {
            if a.is_same_instance(b) {
                return 0;
            }
            compare_aggregates(host, &left, &right, strict, ignore_order, &mut None)
                .expect("unbounded budget never errors")
        }
        _ => {
            if left.tag() == ValueTag::Null {
                return if coerce::as_bool(&right) { -1 } else { 0 };
            }
            if right.tag() == ValueTag::Null {
                return if coerce::as_bool(&left) { 1 } else { 0 };
            }
            if left.tag() == ValueTag::Bool || right.tag() == ValueTag::Bool {
                return order(coerce::as_bool(&left), coerce::as_bool(&right), ignore_order);
            }
            if left.tag() == ValueTag::Array {
                return 1;
            }
            if right.tag() == ValueTag::Array {
                return -1;
            }
            if left.tag() == ValueTag::Object {
                return 1;
            }
            if right.tag() == ValueTag::Object {
                return -1;
            }
            let left_num = number_value(coerce::as_number(&left));
            let right_num = number_value(coerce::as_number(&right));
            compare(host, &left_num, &right_num, false, ignore_order)
        }
    }
}

/// Work-stack item: `None` is the deferred sentinel for "an earlier
/// element of this aggregate already proved inequality; once this is
/// reached, the verdict is final".
type WorkItem = Option<(Value, Value, bool)>;

/// A level's deferred work, in encounter order: `Some((left,right))` is
/// a pair still to be resolved (either a nested aggregate, or a leaf
/// mismatch found after this level already had deferred work of its
/// own); `None` is the sentinel for "a key/attribute present on the
/// left side only was found — the verdict is unconditionally `1` once
/// reached, but only after everything found earlier at this level".
type Deferred = Vec<Option<(Value, Value)>>;

/// Push one level's deferred work onto the global stack, reversed: the
/// stack pops from the end, so reversing here makes the first item
/// found at this level the next one popped — restoring the natural,
/// depth-first encounter order without ever recursing.
fn flush_deferred(stack: &mut Vec<WorkItem>, deferred: Deferred, push_strict: bool) {
    for item in deferred.into_iter().rev() {
        stack.push(item.map(|(l, r)| (l, r, push_strict)));
    }
}

/// The iterative aggregate comparator. `budget`, when `Some`, caps the
/// total number of work-stack items this call will pop before giving
/// up with [`ValueError::ComparatorDepthExceeded`] — a guard against a
/// maliciously deep or wide structure (e.g. from `unserialize()`-like
/// input) consuming unbounded heap/time, distinct from Rust call-stack
/// safety (already guaranteed by the explicit work stack itself).
/// [`compare`] calls this with `None` and can never observe the error.
fn compare_aggregates(
    host: &dyn Host,
    left: &Value,
    right: &Value,
    strict: bool,
    ignore_order: bool,
    budget: &mut Option<usize>,
) -> Result<i32, crate::error::ValueError> {
    let mut stack: Vec<WorkItem> = vec![Some((left.clone(), right.clone(), strict))];

    while let Some(item) = stack.pop() {
        if let Some(remaining) = budget.as_mut() {
            if *remaining == 0 {
                return Err(crate::error::ValueError::ComparatorDepthExceeded(stack.len()));
            }
            *remaining -= 1;
        }

        let Some((l, r, strict)) = item else {
            return Ok(1);
        };

        match (&l, &r) {
            (Value::Array(left_arr), Value::Array(right_arr)) => {
                if left_arr.is_same_storage(right_arr) {
                    continue;
                }
                if left_arr.len() != right_arr.len() {
                    return Ok(order(left_arr.len(), right_arr.len(), ignore_order));
                }
                let mut deferred: Deferred = Vec::new();
                let mut right_iter = right_arr.iter();
                for (left_key, left_val) in left_arr.iter() {
                    let (right_key, right_val) = right_iter.next().expect("equal length arrays");
                    let right_val = if left_key == right_key {
                        right_val.clone()
                    } else {
                        match right_arr.get(left_key) {
                            Some(v) => v.clone(),
                            None => {
                                if ignore_order {
                                    return Ok(-1);
                                }
                                deferred.push(None);
                                break;
                            }
                        }
                    };
                    let left_val = left_val.deref_copy();
                    let right_val = right_val.deref_copy();
                    if is_identical_fast(&left_val, &right_val) {
                        continue;
                    }
                    if is_aggregate(&left_val) && is_aggregate(&right_val) {
                        if ignore_order {
                            stack.push(Some((left_val, right_val, strict)));
                        } else {
                            deferred.push(Some((left_val, right_val)));
                        }
                        continue;
                    }
                    let cmp_res = compare(host, &left_val, &right_val, strict, ignore_order);
                    if cmp_res != 0 {
                        if ignore_order || deferred.is_empty() {
                            return Ok(cmp_res);
                        }
                        deferred.push(Some((left_val, right_val)));
                        break;
                    }
                }
                flush_deferred(&mut stack, deferred, strict);
            }
            (Value::Object(left_obj), Value::Object(right_obj)) => {
                if left_obj.is_same_instance(right_obj) {
                    continue;
                }
                if let Some(res) = host.compare_object(left_obj, right_obj) {
                    if res != 0 {
                        return Ok(res as i32);
                    }
                    continue;
                }
                if strict || left_obj.class_name() != right_obj.class_name() {
                    return Ok(1);
                }
                let left_fields = left_obj.fields_snapshot();
                let right_fields = right_obj.fields_snapshot();
                if left_fields.len() != right_fields.len() {
                    return Ok(order(left_fields.len(), right_fields.len(), ignore_order));
                }
                let mut deferred: Deferred = Vec::new();
                let mut right_iter = right_fields.iter();
                for (left_name, left_val) in left_fields.iter() {
                    let right_val = match right_iter.next() {
                        Some((right_name, v)) if right_name == left_name => v.clone(),
                        _ => match right_fields.iter().find(|(n, _)| n == left_name) {
                            Some((_, v)) => v.clone(),
                            None => {
                                if ignore_order {
                                    return Ok(-1);
                                }
                                deferred.push(None);
                                break;
                            }
                        },
                    };
                    let left_val = left_val.deref_copy();
                    let right_val = right_val.deref_copy();
                    if is_identical_fast(&left_val, &right_val) {
                        continue;
                    }
                    // Nested aggregates found while comparing object
                    // fields are queued with `strict = false`, matching
                    // the original — only the leaf comparison itself
                    // uses this frame's `strict`.
                    if is_aggregate(&left_val) && is_aggregate(&right_val) {
                        if ignore_order {
                            stack.push(Some((left_val, right_val, false)));
                        } else {
                            deferred.push(Some((left_val, right_val)));
                        }
                        continue;
                    }
                    let cmp_res = compare(host, &left_val, &right_val, strict, ignore_order);
                    if cmp_res != 0 {
                        if ignore_order || deferred.is_empty() {
                            return Ok(cmp_res);
                        }
                        deferred.push(Some((left_val, right_val)));
                        break;
                    }
                }
                flush_deferred(&mut stack, deferred, false);
            }
            _ => {
                let cmp_res = compare(host, &l, &r, strict, ignore_order);
                if cmp_res != 0 {
                    return Ok(cmp_res);
                }
            }
        }
    }
    Ok(0)
}

/// Work/depth-bounded variant of [`compare`] for aggregate pairs, for
/// callers handling untrusted structural depth (e.g. unserializing
/// attacker-controlled input before it ever reaches script code).
/// Scalar/non-aggregate pairs are cost-free and always delegate to
/// [`compare`]; only array/object pairs consume the budget, counted
/// against the explicit work stack inside [`compare_aggregates`].
pub fn compare_bounded(
    host: &dyn Host,
    left: &Value,
    right: &Value,
    strict: bool,
    ignore_order: bool,
    max_work_items: usize,
) -> Result<i32, crate::error::ValueError> {
    let left = left.deref_copy();
    let right = right.deref_copy();
    if strict && left.tag() != right.tag() {
        return Ok(1);
    }
    match (&left, &right) {
        (Value::Array(a), Value::Array(b)) if !a.is_same_storage(b) => {
            if a.len() != b.len() {
                return Ok(order(a.len(), b.len(), ignore_order));
            }
            let mut budget = Some(max_work_items);
            compare_aggregates(host, &left, &right, strict, ignore_order, &mut budget)
        }
        (Value::Object(a), Value::Object(b)) if !a.is_same_instance(b) => {
            let mut budget = Some(max_work_items);
            compare_aggregates(host, &left, &right, strict, ignore_order, &mut budget)
        }
        _ => Ok(compare(host, &left, &right, strict, ignore_order)),
    }
}

/// `is_w`: identity comparison — strict, tag-sensitive, order-agnostic.
pub fn is_w(host: &dyn Host, a: &Value, b: &Value) -> bool {
    compare(host, a, b, true, true) == 0
}

/// `eq`: loose equality (`==`).
pub fn eq(host: &dyn Host, a: &Value, b: &Value) -> bool {
    compare(host, a, b, false, true) == 0
}

/// `ne`: loose inequality (`!=`).
pub fn ne(host: &dyn Host, a: &Value, b: &Value) -> bool {
    !eq(host, a, b)
}

pub fn lt(host: &dyn Host, a: &Value, b: &Value) -> bool {
    compare(host, a, b, false, false) < 0
}

pub fn gt(host: &dyn Host, a: &Value, b: &Value) -> bool {
    compare(host, a, b, false, false) > 0
}

pub fn le(host: &dyn Host, a: &Value, b: &Value) -> bool {
    compare(host, a, b, false, false) <= 0
}

pub fn ge(host: &dyn Host, a: &Value, b: &Value) -> bool {
    compare(host, a, b, false, false) >= 0
}

/// `str_eq`: the original's helper used when a caller already has two
/// strings (or anything coercible to strings when tags differ) and
/// wants loose equality without re-deriving that from scratch.
pub fn str_eq(host: &dyn Host, a: &Value, b: &Value) -> bool {
    let a = a.deref_copy();
    let b = b.deref_copy();
    if a.tag() != b.tag() {
        let sa = Value::str(crate::coerce::as_string(&a, host));
        let sb = Value::str(crate::coerce::as_string(&b, host));
        return eq(host, &sa, &sb);
    }
    eq(host, &a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DefaultHost;
    use crate::values::{PhpArray, PhpObject, Reference};

    fn c(a: Value, b: Value, strict: bool, ignore_order: bool) -> i32 {
        compare(&DefaultHost, &a, &b, strict, ignore_order)
    }

    #[test]
    fn reflexivity_holds_except_for_nan() {
        assert_eq!(c(Value::Int(5), Value::Int(5), false, false), 0);
        assert_ne!(c(Value::Float(f64::NAN), Value::Float(f64::NAN), false, false), 0);
    }

    #[test]
    fn numeric_strings_promote_loosely_but_not_strictly() {
        assert_eq!(c(Value::str("10"), Value::str("9"), false, false), 1);
        assert_eq!(c(Value::str("10"), Value::str("9"), true, false), -1);
    }

    #[test]
    fn strict_short_circuits_on_tag_mismatch() {
        assert_eq!(c(Value::Int(1), Value::str("1"), true, false), 1);
    }

    #[test]
    fn null_vs_bool_compares_truthiness() {
        assert_eq!(c(Value::Null, Value::Bool(false), false, false), 0);
        assert_eq!(c(Value::Null, Value::Bool(true), false, false), -1);
    }

    #[test]
    fn array_outranks_scalar_in_fallback_arm() {
        let arr = Value::Array(PhpArray::new());
        assert_eq!(c(arr.clone(), Value::Int(1), false, false), 1);
        assert_eq!(c(Value::Int(1), arr, false, false), -1);
    }

    #[test]
    fn arrays_compare_by_length_first() {
        let short = Value::Array(PhpArray::from_list([Value::Int(1)]));
        let long = Value::Array(PhpArray::from_list([Value::Int(1), Value::Int(2)]));
        assert_eq!(c(short, long, false, false), -1);
    }

    #[test]
    fn array_equality_is_insertion_order_independent_for_string_keys() {
        use crate::values::array_key::ArrayKey;
        let a = PhpArray::from_pairs([
            (ArrayKey::Str("x".into()), Value::Int(1)),
            (ArrayKey::Str("y".into()), Value::Int(2)),
        ]);
        let b = PhpArray::from_pairs([
            (ArrayKey::Str("y".into()), Value::Int(2)),
            (ArrayKey::Str("x".into()), Value::Int(1)),
        ]);
        assert_eq!(c(Value::Array(a), Value::Array(b), false, true), 0);
    }

    #[test]
    fn cyclic_arrays_compare_without_blowing_the_stack() {
        let mut a = PhpArray::new();
        a.append(Value::Int(1));
        let cell_a = Reference::new(Value::Array(a));
        {
            let Value::Array(mut inner) = cell_a.deref() else { unreachable!() };
            inner.append(Value::Reference(cell_a.clone()));
            cell_a.store(Value::Array(inner));
        }

        let mut b = PhpArray::new();
        b.append(Value::Int(1));
        let cell_b = Reference::new(Value::Array(b));
        {
            let Value::Array(mut inner) = cell_b.deref() else { unreachable!() };
            inner.append(Value::Reference(cell_b.clone()));
            cell_b.store(Value::Array(inner));
        }

        assert_eq!(
            c(cell_a.deref(), cell_b.deref(), false, true),
            0
        );
    }

    #[test]
    fn objects_fall_back_to_field_by_field_when_no_custom_comparator() {
        let a = PhpObject::new("Point");
        a.set("x", Value::Int(1));
        let b = PhpObject::new("Point");
        b.set("x", Value::Int(1));
        assert_eq!(c(Value::Object(a), Value::Object(b), false, false), 0);
    }

    #[test]
    fn objects_of_different_classes_are_unequal() {
        let a = PhpObject::new("Point");
        let b = PhpObject::new("Vector");
        assert_eq!(c(Value::Object(a), Value::Object(b), false, true), 1);
    }

    #[test]
    fn str_eq_coerces_both_sides_on_tag_mismatch() {
        let host = DefaultHost;
        assert!(str_eq(&host, &Value::Int(1), &Value::str("1")));
    }

    #[test]
    fn compare_bounded_matches_compare_for_generous_budgets() {
        let host = DefaultHost;
        let a = Value::Array(PhpArray::from_list([Value::Int(1), Value::Int(2)]));
        let b = Value::Array(PhpArray::from_list([Value::Int(1), Value::Int(2)]));
        assert_eq!(
            compare_bounded(&host, &a, &b, false, false, 1000).unwrap(),
            compare(&host, &a, &b, false, false)
        );
    }

    #[test]
    fn a_deep_earlier_difference_outranks_a_shallow_later_one() {
        // Left = [[1,0], 2, [9]], Right = [[1,5], 1, [9]].
        // Index 0 is a nested-array pair that differs internally at
        // depth 2 (true verdict -1, decided by 0 vs 5). Index 1 is a
        // plain scalar mismatch (2 vs 1, verdict +1) that comes later
        // in iteration order and must not be allowed to win just
        // because it doesn't require descending into a nested level.
        let left = Value::Array(PhpArray::from_list([
            Value::Array(PhpArray::from_list([Value::Int(1), Value::Int(0)])),
            Value::Int(2),
            Value::Array(PhpArray::from_list([Value::Int(9)])),
        ]));
        let right = Value::Array(PhpArray::from_list([
            Value::Array(PhpArray::from_list([Value::Int(1), Value::Int(5)])),
            Value::Int(1),
            Value::Array(PhpArray::from_list([Value::Int(9)])),
        ]));
        assert_eq!(c(left, right, false, false), -1);
    }

    #[test]
    fn compare_bounded_reports_depth_exceeded_on_wide_nested_structures() {
        use crate::error::ValueError;
        let host = DefaultHost;
        let mut left = PhpArray::new();
        let mut right = PhpArray::new();
        for _ in 0..4 {
            left.append(Value::Array(PhpArray::from_list([Value::Int(1)])));
            right.append(Value::Array(PhpArray::from_list([Value::Int(1)])));
        }
        let err = compare_bounded(&host, &Value::Array(left), &Value::Array(right), false, false, 1)
            .unwrap_err();
        assert!(matches!(err, ValueError::ComparatorDepthExceeded(_)));
    }
}
