use std::fmt;
use std::rc::Rc;

/// A PHP string value.
///
/// `Const` is the shared-by-handle flavor (the common case — string
/// literals, values copied between arrays), `Owned` is the mutable-builder
/// case produced by in-place string operations once uniqueness has been
/// established. `Bytes` holds a byte sequence that isn't valid UTF-8,
/// produced only by an operation that works over raw bytes rather than
/// text (the string bitwise operators) — spec.md §3 describes a PHP
/// string as "the same logical byte sequence", which `str`/`String` can't
/// represent once a byte lands outside valid UTF-8. All three expose the
/// same read surface; only `Owned` (or a `Const` with strong count 1, see
/// [`crate::values::value::Unique`]) may be mutated in place.
#[derive(Debug, Clone)]
pub enum PhpString {
    Const(Rc<str>),
    Owned(String),
    Bytes { raw: Rc<[u8]>, lossy: Rc<str> },
}

impl PhpString {
    pub fn new(s: impl Into<String>) -> PhpString {
        PhpString::Owned(s.into())
    }

    pub fn shared(s: impl Into<Rc<str>>) -> PhpString {
        PhpString::Const(s.into())
    }

    /// Build from a raw byte sequence, as produced by the string
    /// bitwise operators. Bytes that happen to be valid UTF-8 (the
    /// overwhelming common case — ASCII input never produces anything
    /// else) are stored as plain `Owned` text at no extra cost;
    /// anything else is kept byte-exact in `Bytes` instead of being
    /// passed through `String::from_utf8_lossy`, which would silently
    /// replace every offending byte with U+FFFD.
    pub fn from_bytes(bytes: Vec<u8>) -> PhpString {
        match String::from_utf8(bytes) {
            Ok(s) => PhpString::Owned(s),
            Err(err) => {
                let raw = err.into_bytes();
                let lossy = String::from_utf8_lossy(&raw).into_owned();
                PhpString::Bytes { raw: Rc::from(raw), lossy: Rc::from(lossy) }
            }
        }
    }

    /// Text view. For `Bytes`, this is a lossy rendering (U+FFFD per
    /// invalid byte) meant for the text-oriented consumers elsewhere in
    /// this crate (coercion, comparison, callback name parsing); callers
    /// that need the exact bytes back — round-tripping a bitwise result,
    /// `strlen` — must use [`PhpString::as_bytes`] instead.
    pub fn as_str(&self) -> &str {
        match self {
            PhpString::Const(s) => s,
            PhpString::Owned(s) => s,
            PhpString::Bytes { lossy, .. } => lossy,
        }
    }

    /// The exact byte sequence this string carries (spec.md §3's
    /// "logical byte sequence"), never substituting or dropping a byte.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PhpString::Const(s) => s.as_bytes(),
            PhpString::Owned(s) => s.as_bytes(),
            PhpString::Bytes { raw, .. } => raw,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    /// Promote to an owned, uniquely-mutable buffer, cloning the bytes
    /// if currently shared. Used by in-place string mutators once a
    /// `Unique<PhpString>` capability has been obtained.
    pub fn into_owned_buffer(self) -> String {
        match self {
            PhpString::Owned(s) => s,
            PhpString::Const(s) => s.to_string(),
            PhpString::Bytes { lossy, .. } => lossy.to_string(),
        }
    }

    pub fn to_rc_str(&self) -> Rc<str> {
        match self {
            PhpString::Const(s) => s.clone(),
            PhpString::Owned(s) => Rc::from(s.as_str()),
            PhpString::Bytes { lossy, .. } => lossy.clone(),
        }
    }
}

impl PartialEq for PhpString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for PhpString {}

impl std::hash::Hash for PhpString {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for PhpString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for PhpString {
    fn from(s: &str) -> Self {
        PhpString::Owned(s.to_owned())
    }
}

impl From<String> for PhpString {
    fn from(s: String) -> Self {
        PhpString::Owned(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn const_and_owned_compare_equal() {
        let a = PhpString::shared("abc");
        let b = PhpString::new("abc");
        assert_eq!(a, b);
    }

    #[test]
    fn into_owned_buffer_clones_shared() {
        let shared = PhpString::shared("abc");
        let buf = shared.into_owned_buffer();
        assert_eq!(buf, "abc");
    }

    #[test]
    fn from_bytes_keeps_plain_text_as_owned() {
        let s = PhpString::from_bytes(b"hello".to_vec());
        assert!(matches!(s, PhpString::Owned(_)));
        assert_eq!(s.as_bytes(), b"hello");
    }

    #[test]
    fn from_bytes_preserves_non_utf8_bytes_exactly() {
        let raw = vec![b'A', 0xFF, b'B', 0x80];
        let s = PhpString::from_bytes(raw.clone());
        assert!(matches!(s, PhpString::Bytes { .. }));
        assert_eq!(s.as_bytes(), raw.as_slice());
        assert_eq!(s.len(), raw.len());
        // `as_str` is lossy (for text-oriented consumers); `as_bytes` is not.
        assert_ne!(s.as_str().as_bytes(), raw.as_slice());
    }

    #[test]
    fn equality_and_hash_are_byte_exact_for_non_utf8_strings() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = PhpString::from_bytes(vec![0xFF, b'x']);
        let b = PhpString::from_bytes(vec![0xFF, b'x']);
        let c = PhpString::from_bytes(vec![0xFE, b'x']);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let hash_of = |s: &PhpString| {
            let mut hasher = DefaultHasher::new();
            s.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
