//! The value types making up the sixteen-kind tagged union.

pub mod array;
pub mod array_key;
pub mod constant;
pub mod object;
pub mod reference;
pub mod resource;
pub mod string;
pub mod tag;
pub mod value;

pub use array::PhpArray;
pub use array_key::ArrayKey;
pub use object::PhpObject;
pub use reference::Reference;
pub use resource::{Resource, ResourceKind};
pub use string::PhpString;
pub use tag::ValueTag;
pub use value::{Unique, Value};
