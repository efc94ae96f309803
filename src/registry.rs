//! The three prebuilt, process-wide lookup tables:
//! constants, builtin functions, and builtin classes. Each is sealed
//! (immutable) once built.

use std::collections::HashMap;
use std::rc::Rc;

use crate::values::value::Value;

/// An immutable, exact-match lookup table sealed after construction: a
/// plain `HashMap` wrapper that only exposes `get`, never a mutator,
/// once `seal` has produced it — "built once and frozen" made
/// unrepresentable-to-violate at the type level.
#[derive(Debug, Clone)]
pub struct SealedCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K: std::hash::Hash + Eq, V> SealedCache<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A not-yet-sealed builder for [`SealedCache`]; exists only to keep
/// the mutating half of construction syntactically separate from the
/// sealed, read-only half callers actually hold onto.
#[derive(Debug, Default)]
pub struct SealedCacheBuilder<K, V> {
    entries: HashMap<K, V>,
}

impl<K: std::hash::Hash + Eq, V> SealedCacheBuilder<K, V> {
    pub fn new() -> Self {
        SealedCacheBuilder { entries: HashMap::new() }
    }

    pub fn insert(&mut self, key: K, value: V) -> &mut Self {
        self.entries.insert(key, value);
        self
    }

    pub fn seal(self) -> SealedCache<K, V> {
        SealedCache { entries: self.entries }
    }
}

/// The native int width's `PHP_INT_MAX`/`PHP_INT_SIZE` pair, following
/// whichever word width [`crate::arith::SHIFT_MASK`] targets.
const PHP_INT_MAX: i64 = i64::MAX;
const PHP_INT_SIZE: i64 = if crate::arith::SHIFT_MASK == 63 { 8 } else { 4 };

/// Every case combination of a keyword's letters, e.g. `"null"` →
/// `["null", "nuLl", "nULl", ...]` including the original casing.
/// Only the three literal constants resolve case-insensitively;
/// nothing else does. Rather than a general case-folding lookup layer,
/// every combination is enumerated once at init so the hot constant
/// path stays an exact `HashMap` lookup.
fn case_combinations(word: &str) -> Vec<String> {
    let n = word.len();
    if n > 20 {
        // Pathological-input guard; no real keyword is this long.
        return vec![word.to_owned()];
    }
    let bytes = word.as_bytes();
    (0u32..(1u32 << n))
        .map(|mask| {
            bytes
                .iter()
                .enumerate()
                .map(|(i, &b)| {
                    if (mask >> i) & 1 == 1 {
                        (b as char).to_ascii_uppercase()
                    } else {
                        (b as char).to_ascii_lowercase()
                    }
                })
                .collect::<String>()
        })
        .collect()
}

/// The sealed constants table: module-contributed `(name, value)`
/// pairs, `PHP_INT_MAX`/`PHP_INT_SIZE`, and every case combination of
/// `true`/`false`/`null`.
#[derive(Debug, Clone)]
pub struct ConstantRegistry {
    table: SealedCache<String, Value>,
}

impl ConstantRegistry {
    /// Build the registry from module-contributed constants plus the
    /// fixed entries every PHP runtime carries.
    pub fn new(module_constants: impl IntoIterator<Item = (String, Value)>) -> ConstantRegistry {
        let mut builder = SealedCacheBuilder::new();
        for (name, value) in module_constants {
            builder.insert(name, value);
        }
        builder.insert("PHP_INT_MAX".to_owned(), Value::Int(PHP_INT_MAX));
        builder.insert("PHP_INT_SIZE".to_owned(), Value::Int(PHP_INT_SIZE));
        for combo in case_combinations("true") {
            builder.insert(combo, Value::Bool(true));
        }
        for combo in case_combinations("false") {
            builder.insert(combo, Value::Bool(false));
        }
        for combo in case_combinations("null") {
            builder.insert(combo, Value::Null);
        }
        ConstantRegistry { table: builder.seal() }
    }

    /// Exact-name lookup — case-insensitive only for the three
    /// literals, since every case combination of those was pre-seeded.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.table.get(&name.to_owned())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

/// A builtin function registered at space construction. The function's
/// own behavior lives entirely in the host/standard-library layer;
/// this crate only needs a stable handle to put in the table.
#[derive(Debug, Clone)]
pub struct BuiltinFunction {
    pub name: Rc<str>,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    table: HashMap<Rc<str>, BuiltinFunction>,
}

impl FunctionRegistry {
    pub fn new(builtins: impl IntoIterator<Item = Rc<str>>) -> FunctionRegistry {
        let table = builtins
            .into_iter()
            .map(|name| (name.clone(), BuiltinFunction { name }))
            .collect();
        FunctionRegistry { table }
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinFunction> {
        self.table.get(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

/// A builtin class registered at space construction; same "opaque
/// handle" treatment as [`BuiltinFunction`].
#[derive(Debug, Clone)]
pub struct BuiltinClass {
    pub name: Rc<str>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    table: HashMap<Rc<str>, BuiltinClass>,
}

impl ClassRegistry {
    pub fn new(builtins: impl IntoIterator<Item = Rc<str>>) -> ClassRegistry {
        let table = builtins
            .into_iter()
            .map(|name| (name.clone(), BuiltinClass { name }))
            .collect();
        ClassRegistry { table }
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinClass> {
        self.table.get(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}
