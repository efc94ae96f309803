//! Array construction, indexing and iteration surface.
//!
//! Kept apart from [`crate::values::array`] (which owns only the
//! backing storage and its copy-on-write contract) because this layer
//! needs a [`Host`] to emit diagnostics — a distinct concern from the
//! value model itself.

use crate::host::Host;
use crate::values::array_key::ArrayKey;
use crate::values::reference::Reference;
use crate::values::value::Value;
use crate::values::PhpArray;

/// `getitem`: read `key` out of `arr`, optionally emitting an
/// "Undefined array key" notice when it is missing. Always returns
/// `Null` for a missing key, never a separate error sentinel.
pub fn getitem(host: &dyn Host, arr: &PhpArray, key: &ArrayKey, give_notice: bool) -> Value {
    match arr.get(key) {
        Some(v) => v.deref_copy(),
        None => {
            if give_notice {
                host.notice(&format!("Undefined array key {key}"));
            }
            Value::Null
        }
    }
}

/// `setitem`: copy-on-write set — always safe to call on a shared
/// handle, since [`PhpArray::insert`] itself only clones when needed.
/// Kept as its own entry point (rather than just calling `insert`
/// directly): this one never assumes uniqueness, `setitem_maybe_inplace`
/// documents that it does.
pub fn setitem(arr: &PhpArray, key: ArrayKey, value: Value) -> PhpArray {
    let mut copy = arr.clone();
    copy.insert(key, value);
    copy
}

/// `setitem_maybe_inplace`: mutate in place. Safe only when the caller
/// knows `arr` is unique (a fresh constructor result, or the output of
/// `Reference::deref_unique`/an explicit uniqueness check) — calling
/// this on a shared handle is still memory-safe (the underlying
/// `PhpArray::insert` copies on write regardless) but defeats the point
/// of the "maybe inplace" contract, silently falling back to a copy.
pub fn setitem_maybe_inplace(arr: &mut PhpArray, key: ArrayKey, value: Value) {
    arr.insert(key, value);
}

/// `appenditem_maybe_inplace`: `$a[] = value`.
pub fn appenditem_maybe_inplace(arr: &mut PhpArray, value: Value) -> i64 {
    arr.append(value)
}

/// `packitem_maybe_inplace`: like `setitem_maybe_inplace`, but if `key`
/// normalizes to an integer, the key is discarded and the value is
/// appended instead — the "pack" contract used when building an array
/// from a stream of values whose nominal keys are placeholders.
pub fn packitem_maybe_inplace(arr: &mut PhpArray, key: &ArrayKey, value: Value) {
    let is_int_like = match key {
        ArrayKey::Int(_) => true,
        ArrayKey::Str(s) => matches!(ArrayKey::normalize(s), ArrayKey::Int(_)),
    };
    if is_int_like {
        arr.append(value);
    } else {
        arr.insert(key.clone(), value);
    }
}

/// `slice(arr, start, length, keep_keys, keep_str_keys)`. Negative `start` counts from the end; negative `length`
/// encodes "up to `length` elements before the end". Always returns a
/// fresh array respecting insertion order.
pub fn slice(
    arr: &PhpArray,
    start: i64,
    length: Option<i64>,
    keep_keys: bool,
    keep_str_keys: bool,
) -> PhpArray {
    let size = arr.len() as i64;
    if size == 0 {
        return PhpArray::new();
    }
    let start = if start < 0 { (size + start).max(0) } else { start };
    if start > size {
        return PhpArray::new();
    }
    let mut length = match length {
        Some(n) if n < 0 => size + n - start,
        Some(n) => n,
        None => size - start,
    };
    if length <= 0 {
        return PhpArray::new();
    }
    if start + length > size {
        length = size - start;
    }

    let mut next_idx: i64 = 0;
    let mut result = PhpArray::new();
    for (idx, (key, value)) in arr.iter().enumerate() {
        let idx = idx as i64;
        if idx < start {
            continue;
        }
        if idx >= start + length {
            break;
        }
        if keep_keys {
            result.insert(key.clone(), value.clone());
        } else if keep_str_keys && matches!(key, ArrayKey::Str(_)) {
            result.insert(key.clone(), value.clone());
        } else {
            result.insert(ArrayKey::Int(next_idx), value.clone());
            next_idx += 1;
        }
    }
    result
}

/// A scoped snapshot iterator over `(key, value)` pairs in insertion
/// order. Taking a snapshot up front — rather than holding a live
/// borrow of the array — is how this crate satisfies "guaranteed
/// release on all exit paths" without an explicit
/// RAII guard: there is nothing left to release.
pub struct ArrayIter {
    items: std::vec::IntoIter<(ArrayKey, Value)>,
}

impl Iterator for ArrayIter {
    type Item = (ArrayKey, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

/// `iter(arr)`: a scoped iterator. Structural mutation of `arr` while
/// an `ArrayIter` is alive is well-defined here (the iterator already
/// owns its own snapshot) but PHP's own undefined-behavior contract
/// still holds for callers comparing the iterator against a live
/// array handle elsewhere.
pub fn iter(arr: &PhpArray) -> ArrayIter {
    ArrayIter {
        items: arr.to_rdict().into_iter(),
    }
}

/// `create_iter_ref`: a by-reference iterator, used by `foreach (...
/// as &$v)`. Every slot visited is first promoted to a [`Reference`]
/// cell (if it is not one already) so that writes through the yielded
/// reference are visible the next time the array is read. Requesting
/// this over a non-reference value is a fatal error.
pub fn create_iter_ref(host: &dyn Host, v: &Value) -> Option<Vec<(ArrayKey, Reference)>> {
    let Value::Reference(cell) = v else {
        host.fatal("foreach(... as &$v): argument must be a variable");
        return None;
    };
    let inner = cell.deref();
    let Value::Array(mut arr) = inner else {
        host.fatal("foreach(... as &$v): argument must be an array reference");
        return None;
    };
    arr.make_unique();
    let mut out = Vec::with_capacity(arr.len());
    for key in arr.keys().cloned().collect::<Vec<_>>() {
        let current = arr.get(&key).cloned().unwrap_or(Value::Null);
        let slot = match current {
            Value::Reference(r) => r,
            other => {
                let r = Reference::new(other);
                arr.insert(key.clone(), Value::Reference(r.clone()));
                r
            }
        };
        out.push((key, slot));
    }
    cell.store(Value::Array(arr));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DefaultHost;

    #[test]
    fn getitem_missing_key_is_null_with_notice() {
        let host = DefaultHost;
        let arr = PhpArray::new();
        assert_eq!(
            getitem(&host, &arr, &ArrayKey::Int(0), true),
            Value::Null
        );
    }

    #[test]
    fn setitem_does_not_mutate_original() {
        let mut a = PhpArray::new();
        a.append(Value::Int(1));
        let b = setitem(&a, ArrayKey::Int(0), Value::Int(99));
        assert_eq!(a.get(&ArrayKey::Int(0)), Some(&Value::Int(1)));
        assert_eq!(b.get(&ArrayKey::Int(0)), Some(&Value::Int(99)));
    }

    #[test]
    fn pack_ignores_int_like_key_and_appends() {
        let mut a = PhpArray::new();
        a.append(Value::Int(0));
        packitem_maybe_inplace(&mut a, &ArrayKey::Int(5), Value::Int(1));
        packitem_maybe_inplace(&mut a, &ArrayKey::Str("x".into()), Value::Int(2));
        assert_eq!(a.get(&ArrayKey::Int(1)), Some(&Value::Int(1)));
        assert_eq!(a.get(&ArrayKey::Str("x".into())), Some(&Value::Int(2)));
    }

    #[test]
    fn slice_negative_start_counts_from_end() {
        let arr = PhpArray::from_list([
            Value::Int(10),
            Value::Int(20),
            Value::Int(30),
            Value::Int(40),
        ]);
        let out = slice(&arr, -2, Some(1), false, false);
        assert_eq!(out.len(), 1);
        assert_eq!(out.get(&ArrayKey::Int(0)), Some(&Value::Int(30)));
    }

    #[test]
    fn slice_keeps_keys_when_requested() {
        let arr = PhpArray::from_list([Value::Int(1), Value::Int(2), Value::Int(3)]);
        let out = slice(&arr, 1, None, true, false);
        assert_eq!(out.get(&ArrayKey::Int(1)), Some(&Value::Int(2)));
        assert_eq!(out.get(&ArrayKey::Int(2)), Some(&Value::Int(3)));
    }

    #[test]
    fn iter_yields_insertion_order_snapshot() {
        let arr = PhpArray::from_list([Value::Int(1), Value::Int(2)]);
        let collected: Vec<_> = iter(&arr).collect();
        assert_eq!(
            collected,
            vec![
                (ArrayKey::Int(0), Value::Int(1)),
                (ArrayKey::Int(1), Value::Int(2)),
            ]
        );
    }

    #[test]
    fn create_iter_ref_rejects_non_reference() {
        let host = DefaultHost;
        assert!(create_iter_ref(&host, &Value::Int(1)).is_none());
    }

    #[test]
    fn create_iter_ref_writes_back_through_shared_cell() {
        let host = DefaultHost;
        let arr = PhpArray::from_list([Value::Int(1), Value::Int(2)]);
        let cell = Reference::new(Value::Array(arr));
        let v = Value::Reference(cell.clone());
        let refs = create_iter_ref(&host, &v).unwrap();
        refs[0].1.store(Value::Int(99));
        let Value::Array(after) = cell.deref() else {
            panic!("expected array");
        };
        assert_eq!(after.get(&ArrayKey::Int(0)), Some(&Value::Int(99)));
    }
}
