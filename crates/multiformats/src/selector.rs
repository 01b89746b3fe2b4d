//! Lookup arguments that accept either a symbolic key or a numeric code.

use std::fmt;

/// A registry lookup argument: a symbolic key such as `"sha2-256"` or a
/// numeric code such as `0x12`.
///
/// Numeric codes are held exactly as supplied so that negative or oversized
/// codes can be reported by the registry that rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Key(String),
    Code(i128),
}

/// Outcome of interpreting a numeric selector as a registry code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeCheck {
    Valid(u64),
    Negative(i64),
    TooLarge(u64),
}

impl Selector {
    /// Returns the key, if this selector is symbolic.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Selector::Key(key) => Some(key),
            Selector::Code(_) => None,
        }
    }

    pub(crate) fn check_code(code: i128) -> CodeCheck {
        if code < 0 {
            CodeCheck::Negative(i64::try_from(code).unwrap_or(i64::MIN))
        } else if code > i128::from(crate::limits::MAX_VARINT_VALUE) {
            CodeCheck::TooLarge(u64::try_from(code).unwrap_or(u64::MAX))
        } else {
            // Bounded above by MAX_VARINT_VALUE, so the narrowing is lossless.
            CodeCheck::Valid(code as u64)
        }
    }
}

/// True if `key` can name a registry entry: non-empty ASCII letters, digits,
/// `-`, `_` and `.`.
pub(crate) fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Key(key) => f.write_str(key),
            Selector::Code(code) => write!(f, "{code:#x}"),
        }
    }
}

impl From<&str> for Selector {
    fn from(key: &str) -> Self {
        Selector::Key(key.to_string())
    }
}

impl From<String> for Selector {
    fn from(key: String) -> Self {
        Selector::Key(key)
    }
}

impl From<&String> for Selector {
    fn from(key: &String) -> Self {
        Selector::Key(key.clone())
    }
}

macro_rules! selector_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Selector {
                fn from(code: $ty) -> Self {
                    Selector::Code(i128::from(code))
                }
            }
        )*
    };
}

selector_from_int!(u8, u16, u32, u64, i8, i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_code_bounds() {
        assert_eq!(Selector::check_code(0), CodeCheck::Valid(0));
        assert_eq!(Selector::check_code(-1), CodeCheck::Negative(-1));
        assert_eq!(
            Selector::check_code(i128::from(u64::MAX)),
            CodeCheck::TooLarge(u64::MAX)
        );
        assert_eq!(
            Selector::check_code(i128::from(i64::MAX)),
            CodeCheck::Valid(i64::MAX as u64)
        );
    }

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("sha2-256"));
        assert!(is_valid_key("BASE32"));
        assert!(is_valid_key("eth_block.v2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key("a/b"));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Selector::from("raw"), Selector::Key("raw".to_string()));
        assert_eq!(Selector::from(0x55), Selector::Code(0x55));
        assert_eq!(Selector::from(0x55u64).to_string(), "0x55");
    }
}
