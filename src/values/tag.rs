use std::fmt;

use strum_macros::EnumIter;

/// The sixteen value kinds a [`crate::values::value::Value`] can carry.
///
/// Order matters: it matches the textual names returned by [`type_name`].
/// `EnumIter` replaces a hand-maintained `ALL` array for walking a
/// closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum ValueTag {
    Int,
    Float,
    Str,
    Array,
    Null,
    Bool,
    Object,
    FileRes,
    DirRes,
    StreamContext,
    MysqlLink,
    MysqlResult,
    Constant,
    DelayedClassConstant,
    XmlParserRes,
    McryptRes,
}

impl ValueTag {
    pub fn is_resource(self) -> bool {
        matches!(
            self,
            ValueTag::FileRes
                | ValueTag::DirRes
                | ValueTag::StreamContext
                | ValueTag::MysqlLink
                | ValueTag::MysqlResult
                | ValueTag::XmlParserRes
                | ValueTag::McryptRes
        )
    }
}

/// `get_type_name(tag)`: the name PHP's `gettype()` reports for this tag.
pub fn type_name(tag: ValueTag) -> &'static str {
    match tag {
        ValueTag::Int => "integer",
        ValueTag::Float => "double",
        ValueTag::Str => "string",
        ValueTag::Array => "array",
        ValueTag::Null => "NULL",
        ValueTag::Bool => "boolean",
        ValueTag::Object => "object",
        ValueTag::FileRes
        | ValueTag::DirRes
        | ValueTag::StreamContext
        | ValueTag::MysqlLink
        | ValueTag::MysqlResult
        | ValueTag::XmlParserRes
        | ValueTag::McryptRes => "resource",
        ValueTag::Constant => "constant",
        ValueTag::DelayedClassConstant => "delayed constant",
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", type_name(*self))
    }
}
