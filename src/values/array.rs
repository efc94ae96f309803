use std::rc::Rc;

use indexmap::IndexMap;

use crate::values::array_key::ArrayKey;
use crate::values::value::Value;

/// A PHP array's backing store: an insertion-ordered map from
/// normalized keys to values, plus the "next free integer key" counter
/// PHP tracks for bare `$a[] = ...` appends.
///
/// Wrapped in `Rc` by [`PhpArray`] itself so cloning an array handle is
/// O(1) — value semantics realized as copy-on-write: mutation only
/// ever happens through [`PhpArray::make_unique`],
/// which clones the backing map the moment it is shared (`Rc` strong
/// count > 1) and is a no-op otherwise.
#[derive(Debug, Clone, Default)]
struct ArrayBody {
    entries: IndexMap<ArrayKey, Value>,
    next_index: i64,
}

#[derive(Debug, Clone)]
pub struct PhpArray(Rc<ArrayBody>);

impl Default for PhpArray {
    fn default() -> Self {
        PhpArray::new()
    }
}

impl PhpArray {
    pub fn new() -> PhpArray {
        PhpArray(Rc::new(ArrayBody::default()))
    }

    /// `from_list`: build an array from consecutive integer-keyed
    /// values, `0, 1, 2, ...` — the common list-literal shape.
    pub fn from_list(values: impl IntoIterator<Item = Value>) -> PhpArray {
        let mut arr = PhpArray::new();
        for v in values {
            arr.append(v);
        }
        arr
    }

    /// `from_pairs`: build an array from `(key, value)` pairs in
    /// insertion order. `allow_bogus` mirrors the original's flag
    /// distinguishing permissive construction (used while parsing
    /// literals, where a non-canonical key is tolerated) from the
    /// strict path; since [`ArrayKey`] is always pre-normalized in this
    /// crate there is nothing bogus left to tolerate, so the flag is
    /// accepted for call-site parity and otherwise unused.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ArrayKey, Value)>) -> PhpArray {
        Self::from_pairs_allow_bogus(pairs, false)
    }

    pub fn from_pairs_allow_bogus(
        pairs: impl IntoIterator<Item = (ArrayKey, Value)>,
        _allow_bogus: bool,
    ) -> PhpArray {
        let mut arr = PhpArray::new();
        for (k, v) in pairs {
            arr.insert(k, v);
        }
        arr
    }

    /// `from_rdict`: build an array from an already-ordered
    /// key→value mapping (the shape a host hands in when it already
    /// maintains insertion order itself, e.g. re-exporting another
    /// ordered map into PHP-array form).
    pub fn from_rdict(pairs: impl IntoIterator<Item = (ArrayKey, Value)>) -> PhpArray {
        Self::from_pairs(pairs)
    }

    /// `get_rdict_from_array`: the inverse of [`PhpArray::from_rdict`] —
    /// snapshot this array back out as ordered pairs.
    pub fn to_rdict(&self) -> Vec<(ArrayKey, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.is_empty()
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        self.0.entries.get(key)
    }

    pub fn contains_key(&self, key: &ArrayKey) -> bool {
        self.0.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.0.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.0.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.entries.values()
    }

    /// Is this handle the sole owner of its backing store? Mirrors the
    /// "uniqueness capability" invariant 1: only a unique handle may be
    /// mutated without being copy-on-write cloned first.
    pub fn is_unique(&self) -> bool {
        Rc::strong_count(&self.0) == 1
    }

    /// Obtain a mutably-usable handle: clones the backing store iff it
    /// is currently shared, otherwise mutates in place. Made into a
    /// method rather than a free function taking a uniqueness token,
    /// since Rust ownership already tracks aliasing through
    /// `Rc::strong_count`.
    pub fn make_unique(&mut self) -> &mut PhpArray {
        if Rc::strong_count(&self.0) != 1 {
            self.0 = Rc::new((*self.0).clone());
        }
        self
    }

    fn body_mut(&mut self) -> &mut ArrayBody {
        self.make_unique();
        Rc::get_mut(&mut self.0).expect("uniqueness just established")
    }

    /// Insert `value` at `key`, normalizing the "next index" counter and
    /// preserving existing insertion order on overwrite (PHP does not
    /// move a key to the end when it already exists).
    pub fn insert(&mut self, key: ArrayKey, value: Value) {
        let bumped_next_index = match key {
            ArrayKey::Int(n) if n >= self.0.next_index => Some(n + 1),
            _ => None,
        };
        let body = self.body_mut();
        body.entries.insert(key, value);
        if let Some(next) = bumped_next_index {
            body.next_index = next;
        }
    }

    /// `$a[] = value`: append at the next free integer key.
    pub fn append(&mut self, value: Value) -> i64 {
        let key = self.0.next_index;
        self.insert(ArrayKey::Int(key), value);
        key
    }

    /// Remove a key, preserving the relative order of the remaining
    /// entries (`IndexMap::shift_remove`) rather than swap-removing,
    /// which PHP's own array iteration order semantics require.
    pub fn remove(&mut self, key: &ArrayKey) -> Option<Value> {
        let body = self.body_mut();
        body.entries.shift_remove(key)
    }

    pub fn next_index(&self) -> i64 {
        self.0.next_index
    }

    /// `Identity`: do these two handles share the same backing
    /// allocation? (Not PHP `===`, which for arrays compares contents —
    /// this is the Rust-level aliasing check copy-on-write relies on.)
    pub fn is_same_storage(&self, other: &PhpArray) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The backing allocation's address, used by [`crate::serialize`]
    /// to detect cycles without needing a full identity-comparison API.
    pub fn storage_ptr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}
