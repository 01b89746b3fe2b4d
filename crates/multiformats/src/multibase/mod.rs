//! Multibase: text encodings that name their own base.
//!
//! A multibase string is a single prefix character followed by the payload
//! encoded in the base that prefix identifies. The set of bases is a
//! process-wide registry populated with the [`Base`] built-ins on first use
//! and extensible at runtime with [`register_base`].
//!
//! # Example
//!
//! ```rust
//! use multiformats::multibase;
//!
//! let text = multibase::format("base32", b"Decentralize everything!!").unwrap();
//! assert_eq!(text, "birswgzloorzgc3djpjssazlwmvzhs5dinfxgoijb");
//! assert_eq!(multibase::parse(&text).unwrap(), b"Decentralize everything!!");
//! ```

mod base;
pub mod base32;
pub mod base64;
pub mod base_n;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::MultibaseError;
use crate::selector::is_valid_key;

pub use base::Base;
pub use base_n::{Alphabet, decode_hex, encode_hex};

/// Formatter half of a custom base.
pub type FormatFn = Arc<dyn Fn(&[u8]) -> String + Send + Sync>;

/// Parser half of a custom base.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Vec<u8>, MultibaseError> + Send + Sync>;

/// A custom base submitted to [`register_base`].
///
/// A definition supplies either an alphabet, encoded by positional
/// re-basing, or both a formatter and a parser.
#[derive(Clone)]
pub struct BaseDefinition {
    key: String,
    prefix: char,
    alphabet: Option<String>,
    formatter: Option<FormatFn>,
    parser: Option<ParseFn>,
}

impl BaseDefinition {
    /// Starts a definition for `key` identified by `prefix`.
    pub fn new(key: impl Into<String>, prefix: char) -> Self {
        Self {
            key: key.into(),
            prefix,
            alphabet: None,
            formatter: None,
            parser: None,
        }
    }

    /// Encodes with positional re-basing over `symbols`.
    pub fn alphabet(mut self, symbols: impl Into<String>) -> Self {
        self.alphabet = Some(symbols.into());
        self
    }

    /// Sets the formatter.
    pub fn formatter(mut self, f: impl Fn(&[u8]) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Sets the parser.
    pub fn parser(
        mut self,
        f: impl Fn(&str) -> Result<Vec<u8>, MultibaseError> + Send + Sync + 'static,
    ) -> Self {
        self.parser = Some(Arc::new(f));
        self
    }

    fn compile(self) -> Result<Registered, MultibaseError> {
        let invalid = |key: &str, reason| MultibaseError::InvalidDefinition {
            key: key.to_string(),
            reason,
        };
        if !is_valid_key(&self.key) {
            return Err(invalid(&self.key, "key is not a valid identifier"));
        }
        if self.prefix.is_control() || self.prefix.is_whitespace() {
            return Err(invalid(&self.key, "prefix must be a printable character"));
        }
        let codec = match (self.alphabet, self.formatter, self.parser) {
            (Some(symbols), None, None) => {
                let alphabet =
                    Alphabet::new(&symbols).map_err(|reason| invalid(&self.key, reason))?;
                Codec::Alphabet(alphabet)
            }
            (None, Some(format), Some(parse)) => Codec::Functions { format, parse },
            (Some(_), _, _) => {
                return Err(invalid(&self.key, "alphabet cannot be combined with functions"));
            }
            (None, None, _) => return Err(invalid(&self.key, "missing formatter")),
            (None, Some(_), None) => return Err(invalid(&self.key, "missing parser")),
        };
        Ok(Registered {
            key: self.key,
            prefix: self.prefix,
            codec,
        })
    }
}

impl fmt::Debug for BaseDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseDefinition")
            .field("key", &self.key)
            .field("prefix", &self.prefix)
            .field("alphabet", &self.alphabet)
            .field("formatter", &self.formatter.is_some())
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

/// Result of [`inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub prefix: char,
    pub key: String,
}

enum Codec {
    Builtin(Base),
    Alphabet(Alphabet),
    Functions { format: FormatFn, parse: ParseFn },
}

struct Registered {
    key: String,
    prefix: char,
    codec: Codec,
}

impl Registered {
    fn builtin(base: Base) -> Self {
        Self {
            key: base.key().to_string(),
            prefix: base.prefix(),
            codec: Codec::Builtin(base),
        }
    }

    fn format(&self, bytes: &[u8]) -> String {
        match &self.codec {
            Codec::Builtin(base) => base.encode(bytes),
            Codec::Alphabet(alphabet) => alphabet.encode(bytes),
            Codec::Functions { format, .. } => format(bytes),
        }
    }

    fn parse(&self, text: &str) -> Result<Vec<u8>, MultibaseError> {
        match &self.codec {
            Codec::Builtin(base) => base.decode(text),
            Codec::Alphabet(alphabet) => alphabet.decode(text),
            Codec::Functions { parse, .. } => parse(text),
        }
    }
}

#[derive(Clone, Default)]
struct BaseTable {
    by_key: FxHashMap<String, Arc<Registered>>,
    by_prefix: FxHashMap<char, Arc<Registered>>,
}

impl BaseTable {
    fn builtin() -> Self {
        let mut table = Self::default();
        for base in Base::ALL {
            table.insert(Arc::new(Registered::builtin(base)));
        }
        table
    }

    fn insert(&mut self, entry: Arc<Registered>) {
        self.by_key.insert(entry.key.clone(), Arc::clone(&entry));
        self.by_prefix.insert(entry.prefix, entry);
    }

    fn by_key(&self, key: &str) -> Result<&Registered, MultibaseError> {
        self.by_key
            .get(key)
            .map(Arc::as_ref)
            .ok_or_else(|| MultibaseError::UnknownBase { key: key.to_string() })
    }
}

lazy_static! {
    static ref BASES: RwLock<Arc<BaseTable>> = RwLock::new(Arc::new(BaseTable::builtin()));
}

fn snapshot() -> Arc<BaseTable> {
    Arc::clone(&BASES.read().unwrap_or_else(PoisonError::into_inner))
}

/// Formats bytes as a multibase string in the base registered under `key`.
///
/// # Errors
///
/// Returns [`MultibaseError::EmptyInput`] for empty input and
/// [`MultibaseError::UnknownBase`] if `key` is not registered.
pub fn format(key: &str, bytes: &[u8]) -> Result<String, MultibaseError> {
    if bytes.is_empty() {
        return Err(MultibaseError::EmptyInput);
    }
    let table = snapshot();
    let entry = table.by_key(key)?;
    let body = entry.format(bytes);
    let mut out = String::with_capacity(body.len() + entry.prefix.len_utf8());
    out.push(entry.prefix);
    out.push_str(&body);
    Ok(out)
}

/// Formats bytes in the base registered under `key`, without a prefix.
///
/// # Errors
///
/// Returns [`MultibaseError::EmptyInput`] for empty input and
/// [`MultibaseError::UnknownBase`] if `key` is not registered.
pub fn format_without_prefix(key: &str, bytes: &[u8]) -> Result<String, MultibaseError> {
    if bytes.is_empty() {
        return Err(MultibaseError::EmptyInput);
    }
    Ok(snapshot().by_key(key)?.format(bytes))
}

/// Parses a multibase string, dispatching on its prefix character.
///
/// # Errors
///
/// Returns [`MultibaseError::TooShort`] for fewer than two characters,
/// [`MultibaseError::UnknownPrefix`] for an unregistered prefix, and the
/// base's own error for a malformed payload.
pub fn parse(text: &str) -> Result<Vec<u8>, MultibaseError> {
    let mut chars = text.chars();
    let (Some(prefix), Some(_)) = (chars.next(), chars.next()) else {
        return Err(MultibaseError::TooShort {
            len: text.chars().count(),
        });
    };
    let table = snapshot();
    let entry = table
        .by_prefix
        .get(&prefix)
        .ok_or(MultibaseError::UnknownPrefix { prefix })?;
    trace!(%prefix, base = %entry.key, "multibase prefix dispatch");
    entry.parse(&text[prefix.len_utf8()..])
}

/// Parses unprefixed text in the base registered under `key`.
///
/// # Errors
///
/// Returns [`MultibaseError::UnknownBase`] if `key` is not registered, and the
/// base's own error for malformed text.
pub fn parse_without_prefix(key: &str, text: &str) -> Result<Vec<u8>, MultibaseError> {
    snapshot().by_key(key)?.parse(text)
}

/// Identifies the base of a multibase string without decoding it.
pub fn inspect(text: &str) -> Option<Inspection> {
    let prefix = text.chars().next()?;
    let table = snapshot();
    let entry = table.by_prefix.get(&prefix)?;
    Some(Inspection {
        prefix,
        key: entry.key.clone(),
    })
}

/// Registers a custom base.
///
/// # Errors
///
/// Returns [`MultibaseError::InvalidDefinition`] for an incomplete or invalid
/// definition and [`MultibaseError::AlreadyRegistered`] if its key or prefix
/// is already in use.
pub fn register_base(definition: BaseDefinition) -> Result<(), MultibaseError> {
    let entry = definition.compile()?;
    let mut guard = BASES.write().unwrap_or_else(PoisonError::into_inner);

    let existing = guard
        .by_key
        .get(&entry.key)
        .or_else(|| guard.by_prefix.get(&entry.prefix));
    if let Some(existing) = existing {
        return Err(MultibaseError::AlreadyRegistered {
            key: entry.key,
            prefix: entry.prefix,
            existing: existing.key.clone(),
        });
    }

    debug!(key = %entry.key, prefix = %entry.prefix, "registered multibase");
    let mut table = BaseTable::clone(&guard);
    table.insert(Arc::new(entry));
    *guard = Arc::new(table);
    Ok(())
}

/// Removes the base registered under `key`. Unknown keys are ignored.
pub fn unregister_base(key: &str) {
    let mut guard = BASES.write().unwrap_or_else(PoisonError::into_inner);
    let Some(entry) = guard.by_key.get(key).cloned() else {
        return;
    };

    debug!(key, prefix = %entry.prefix, "unregistered multibase");
    let mut table = BaseTable::clone(&guard);
    table.by_key.remove(key);
    table.by_prefix.remove(&entry.prefix);
    *guard = Arc::new(table);
}

/// Lists the registered bases as `(key, prefix)` pairs, ordered by key.
pub fn bases() -> Vec<(String, char)> {
    let table = snapshot();
    let mut out: Vec<_> = table
        .by_key
        .values()
        .map(|entry| (entry.key.clone(), entry.prefix))
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"Decentralize everything!!";

    #[test]
    fn test_format_known_vectors() {
        assert_eq!(
            format("base32", SAMPLE).unwrap(),
            "birswgzloorzgc3djpjssazlwmvzhs5dinfxgoijb"
        );
        assert_eq!(
            format("base16", SAMPLE).unwrap(),
            "f446563656e7472616c697a652065766572797468696e672121"
        );
        assert_eq!(
            format("base58btc", SAMPLE).unwrap(),
            "zUXE7GvtEk8XTXs1GF8HSGbVA9FCX9SEBPe"
        );
        assert_eq!(
            format("base64", SAMPLE).unwrap(),
            "mRGVjZW50cmFsaXplIGV2ZXJ5dGhpbmchIQ"
        );
    }

    #[test]
    fn test_format_errors() {
        assert_eq!(format("base32", &[]), Err(MultibaseError::EmptyInput));
        assert_eq!(
            format("base99", SAMPLE),
            Err(MultibaseError::UnknownBase {
                key: "base99".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("b"), Err(MultibaseError::TooShort { len: 1 }));
        assert_eq!(parse(""), Err(MultibaseError::TooShort { len: 0 }));
        assert_eq!(
            parse("~abc"),
            Err(MultibaseError::UnknownPrefix { prefix: '~' })
        );
    }

    #[test]
    fn test_without_prefix() {
        let body = format_without_prefix("base58btc", b"hello").unwrap();
        assert_eq!(body, "Cn8eVZg");
        assert_eq!(parse_without_prefix("base58btc", &body).unwrap(), b"hello");
    }

    #[test]
    fn test_inspect() {
        assert_eq!(
            inspect("zCn8eVZg"),
            Some(Inspection {
                prefix: 'z',
                key: "base58btc".to_string()
            })
        );
        assert_eq!(inspect("~abc"), None);
        assert_eq!(inspect(""), None);
    }

    #[test]
    fn test_register_conflicts() {
        let taken_key = BaseDefinition::new("base32", '~').alphabet("01");
        assert!(matches!(
            register_base(taken_key),
            Err(MultibaseError::AlreadyRegistered { .. })
        ));

        let taken_prefix = BaseDefinition::new("test-conflict", 'z').alphabet("01");
        assert_eq!(
            register_base(taken_prefix),
            Err(MultibaseError::AlreadyRegistered {
                key: "test-conflict".to_string(),
                prefix: 'z',
                existing: "base58btc".to_string(),
            })
        );
    }

    #[test]
    fn test_register_invalid_definition() {
        let missing = BaseDefinition::new("test-missing", '(');
        assert!(matches!(
            register_base(missing),
            Err(MultibaseError::InvalidDefinition { .. })
        ));

        let no_parser =
            BaseDefinition::new("test-no-parser", '(').formatter(|b| encode_hex(b, false));
        assert!(matches!(
            register_base(no_parser),
            Err(MultibaseError::InvalidDefinition { reason: "missing parser", .. })
        ));

        let bad_alphabet = BaseDefinition::new("test-bad-alphabet", '(').alphabet("aa");
        assert!(matches!(
            register_base(bad_alphabet),
            Err(MultibaseError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn test_register_and_unregister_alphabet() {
        register_base(BaseDefinition::new("test-base3", '3').alphabet("abc")).unwrap();
        let text = format("test-base3", &[0, 7]).unwrap();
        assert_eq!(text, "3acb");
        assert_eq!(parse(&text).unwrap(), vec![0, 7]);
        assert!(bases().contains(&("test-base3".to_string(), '3')));

        unregister_base("test-base3");
        unregister_base("test-base3");
        assert_eq!(parse(&text), Err(MultibaseError::UnknownPrefix { prefix: '3' }));
    }

    #[test]
    fn test_lookups_racing_registration_see_whole_entries() {
        const KEY: &str = "test-race-base";

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..500 {
                    register_base(BaseDefinition::new(KEY, '6').alphabet("01234567")).unwrap();
                    unregister_base(KEY);
                }
            });
            for _ in 0..3 {
                scope.spawn(|| {
                    for _ in 0..500 {
                        match format(KEY, &[0x2a]) {
                            Ok(text) => assert_eq!(text, "652"),
                            Err(err) => assert_eq!(
                                err,
                                MultibaseError::UnknownBase {
                                    key: KEY.to_string()
                                }
                            ),
                        }
                        match parse("652") {
                            Ok(bytes) => assert_eq!(bytes, vec![0x2a]),
                            Err(err) => {
                                assert_eq!(err, MultibaseError::UnknownPrefix { prefix: '6' })
                            }
                        }
                        if let Some(found) = inspect("652") {
                            assert_eq!(found.key, KEY);
                        }
                    }
                });
            }
        });

        assert!(inspect("652").is_none());
    }

    #[test]
    fn test_register_functions() {
        register_base(
            BaseDefinition::new("test-reversed-hex", '(')
                .formatter(|bytes| encode_hex(bytes, false).chars().rev().collect())
                .parser(|text| decode_hex(&text.chars().rev().collect::<String>())),
        )
        .unwrap();
        let text = format("test-reversed-hex", &[0x12, 0x34]).unwrap();
        assert_eq!(text, "(4321");
        assert_eq!(parse(&text).unwrap(), vec![0x12, 0x34]);
        unregister_base("test-reversed-hex");
    }
}
