//! Lexical validators for variable and class names. Variable names
//! accept only `[A-Za-z_][A-Za-z0-9_]*`; class names additionally
//! accept `\` (the namespace separator) in both the leading and
//! trailing character classes, so they are kept as two distinct
//! validators rather than one shared function.

fn is_varname_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_varname_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_clsname_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'\\'
}

fn is_clsname_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'\\'
}

/// `is_valid_varname`: is `name` usable as a PHP variable name (without
/// the leading `$`)?
pub fn is_valid_varname(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        None => false,
        Some(&first) => {
            is_varname_start(first) && bytes[1..].iter().all(|&b| is_varname_continue(b))
        }
    }
}

/// `is_valid_clsname`: is `name` usable as a class name?
pub fn is_valid_clsname(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        None => false,
        Some(&first) => {
            is_clsname_start(first) && bytes[1..].iter().all(|&b| is_clsname_continue(b))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        assert!(is_valid_varname("foo_bar"));
        assert!(is_valid_varname("_leading"));
        assert!(is_valid_clsname("MyClass1"));
    }

    #[test]
    fn rejects_leading_digit_and_empty() {
        assert!(!is_valid_varname("1foo"));
        assert!(!is_valid_varname(""));
        assert!(!is_valid_clsname(""));
    }

    #[test]
    fn rejects_non_ascii_and_punctuation() {
        assert!(!is_valid_varname("foo-bar"));
        assert!(!is_valid_varname("fo\u{e9}"));
        assert!(!is_valid_clsname("My::Class"));
    }

    #[test]
    fn clsname_accepts_namespace_separator() {
        assert!(is_valid_clsname("\\My\\Name\\Space"));
        assert!(is_valid_clsname("_Foo\\Bar1"));
        assert!(!is_valid_varname("\\Foo"));
    }
}
