//! The value core of a PHP-style interpreter: value representation,
//! type coercion, comparison, arithmetic, array semantics and the
//! handful of lookup tables the rest of an interpreter leans on.
//!
//! This crate deliberately does not know how to parse PHP, run
//! bytecode, or resolve user-defined classes and methods — those are
//! the job of a *host* interpreter, reached through the narrow
//! [`host::Host`] trait. See `DESIGN.md` for how each piece here is
//! grounded and what is intentionally left to that host.

pub mod arith;
pub mod array_ops;
pub mod callback;
pub mod coerce;
pub mod compare;
pub mod error;
pub mod host;
pub mod ident;
pub mod registry;
pub mod serialize;
pub mod signal;
pub mod space;
pub mod values;

pub use error::{CallbackError, ValueError};
pub use host::Host;
pub use space::ValueSpace;
pub use values::{PhpArray, PhpObject, PhpString, Reference, Resource, ResourceKind, Unique, Value, ValueTag};
