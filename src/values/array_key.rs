use std::fmt;
use std::rc::Rc;

use crate::coerce;

/// A normalized PHP array key: either an integer or a string, never a
/// string that merely *looks* numeric.
///
/// `ArrayKey::normalize` makes that rule concrete: every
/// array-construction and mutation entry point in this crate funnels
/// user-facing keys through it, so a `PhpArray` can never observe the
/// "01" vs `1` duplication PHP itself forbids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    Str(Rc<str>),
}

impl ArrayKey {
    /// Normalize a raw string key: if it is a canonical decimal integer
    /// representation (optional leading `-`, no leading zero unless the
    /// value is exactly `0`, fits in `i64`), fold it to `Int`. Otherwise
    /// keep it as `Str`. This is PHP's array-key canonicalization rule,
    /// applied whenever an array is built from string keys.
    pub fn normalize(raw: &str) -> ArrayKey {
        if let Some(n) = canonical_decimal(raw) {
            ArrayKey::Int(n)
        } else {
            ArrayKey::Str(Rc::from(raw))
        }
    }

    pub fn from_int(n: i64) -> ArrayKey {
        ArrayKey::Int(n)
    }

    pub fn as_display_string(&self) -> String {
        match self {
            ArrayKey::Int(n) => n.to_string(),
            ArrayKey::Str(s) => s.to_string(),
        }
    }
}

fn canonical_decimal(raw: &str) -> Option<i64> {
    let bytes = raw.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let (neg, digits) = match bytes[0] {
        b'-' => (true, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if digits.len() > 1 && digits[0] == b'0' {
        return None;
    }
    if digits == b"0" && neg {
        return None;
    }
    let parsed = coerce::parse_plain_i64(raw)?;
    Some(parsed)
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integers_fold_to_int() {
        assert_eq!(ArrayKey::normalize("0"), ArrayKey::Int(0));
        assert_eq!(ArrayKey::normalize("42"), ArrayKey::Int(42));
        assert_eq!(ArrayKey::normalize("-7"), ArrayKey::Int(-7));
    }

    #[test]
    fn leading_zero_or_non_canonical_stays_string() {
        assert_eq!(ArrayKey::normalize("01"), ArrayKey::Str(Rc::from("01")));
        assert_eq!(ArrayKey::normalize("-0"), ArrayKey::Str(Rc::from("-0")));
        assert_eq!(ArrayKey::normalize("1.0"), ArrayKey::Str(Rc::from("1.0")));
        assert_eq!(ArrayKey::normalize(""), ArrayKey::Str(Rc::from("")));
        assert_eq!(ArrayKey::normalize("abc"), ArrayKey::Str(Rc::from("abc")));
    }
}
