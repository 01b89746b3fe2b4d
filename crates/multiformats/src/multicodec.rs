//! Multicodec: a bijective registry of symbolic keys and numeric codes.
//!
//! Codes tag content types (`raw`, `dag-cbor`), serialization formats and
//! the other multiformats. The registry starts with the built-in table and
//! can be extended at runtime; no two keys ever share a code.
//!
//! ```rust
//! use multiformats::multicodec;
//!
//! assert_eq!(multicodec::resolve_code("dag-cbor").unwrap(), 0x71);
//! assert_eq!(multicodec::resolve_key(0x55).unwrap(), "raw");
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::MulticodecError;
use crate::selector::{CodeCheck, Selector, is_valid_key};

/// Built-in codec table.
pub const BUILTIN_CODECS: &[(&str, u64)] = &[
    // multiformats
    ("multicodec", 0x30),
    ("multihash", 0x31),
    ("multiaddr", 0x32),
    ("multibase", 0x33),
    // serialization
    ("protobuf", 0x50),
    ("cbor", 0x51),
    ("raw", 0x55),
    ("rlp", 0x60),
    ("bencode", 0x63),
    ("json", 0x0200),
    ("messagepack", 0x0201),
    // ipld
    ("dag-pb", 0x70),
    ("dag-cbor", 0x71),
    ("libp2p-key", 0x72),
    ("git-raw", 0x78),
    ("torrent-info", 0x7b),
    ("torrent-file", 0x7c),
    ("dag-jose", 0x85),
    ("eth-block", 0x90),
    ("bitcoin-block", 0xb0),
    ("bitcoin-tx", 0xb1),
    ("zcash-block", 0xc0),
    ("zcash-tx", 0xc1),
    ("dag-json", 0x0129),
];

#[derive(Clone, Default)]
struct CodecTable {
    by_key: FxHashMap<Arc<str>, u64>,
    by_code: FxHashMap<u64, Arc<str>>,
}

impl CodecTable {
    fn builtin() -> Self {
        let mut table = Self::default();
        for &(key, code) in BUILTIN_CODECS {
            table.insert(Arc::from(key), code);
        }
        table
    }

    fn insert(&mut self, key: Arc<str>, code: u64) {
        self.by_key.insert(Arc::clone(&key), code);
        self.by_code.insert(code, key);
    }
}

lazy_static! {
    static ref CODECS: RwLock<Arc<CodecTable>> = RwLock::new(Arc::new(CodecTable::builtin()));
}

fn snapshot() -> Arc<CodecTable> {
    Arc::clone(&CODECS.read().unwrap_or_else(PoisonError::into_inner))
}

fn valid_code(code: i128) -> Result<u64, MulticodecError> {
    match Selector::check_code(code) {
        CodeCheck::Valid(code) => Ok(code),
        CodeCheck::Negative(code) => Err(MulticodecError::NegativeCode { code }),
        CodeCheck::TooLarge(code) => Err(MulticodecError::CodeTooLarge { code }),
    }
}

/// Registers `key` under `code`.
///
/// Registering a pair that is already present is a no-op.
///
/// # Errors
///
/// Returns [`MulticodecError::InvalidKey`], [`MulticodecError::NegativeCode`]
/// or [`MulticodecError::CodeTooLarge`] for arguments that cannot name an
/// entry, and [`MulticodecError::KeyConflict`] or
/// [`MulticodecError::CodeConflict`] if either half is already bound to
/// something else.
pub fn register_codec(key: &str, code: impl Into<i128>) -> Result<(), MulticodecError> {
    if !is_valid_key(key) {
        return Err(MulticodecError::InvalidKey {
            key: key.to_string(),
        });
    }
    let code = valid_code(code.into())?;

    let mut guard = CODECS.write().unwrap_or_else(PoisonError::into_inner);
    match (guard.by_key.get(key), guard.by_code.get(&code)) {
        (Some(&existing), _) if existing == code => return Ok(()),
        (Some(&existing), _) => {
            return Err(MulticodecError::KeyConflict {
                key: key.to_string(),
                existing,
            });
        }
        (None, Some(existing)) => {
            return Err(MulticodecError::CodeConflict {
                code,
                existing: existing.to_string(),
            });
        }
        (None, None) => {}
    }

    debug!(key, code, "registered multicodec");
    let mut table = CodecTable::clone(&guard);
    table.insert(Arc::from(key), code);
    *guard = Arc::new(table);
    Ok(())
}

/// Removes `key` and its code. Unknown keys are ignored.
pub fn unregister_codec(key: &str) {
    let mut guard = CODECS.write().unwrap_or_else(PoisonError::into_inner);
    let Some(&code) = guard.by_key.get(key) else {
        return;
    };

    debug!(key, code, "unregistered multicodec");
    let mut table = CodecTable::clone(&guard);
    table.by_key.remove(key);
    table.by_code.remove(&code);
    *guard = Arc::new(table);
}

/// Resolves a key or code to its registered key.
///
/// # Errors
///
/// Returns [`MulticodecError::NegativeCode`] or
/// [`MulticodecError::CodeTooLarge`] for out-of-range codes, and
/// [`MulticodecError::UnknownKey`] / [`MulticodecError::UnknownCode`] if
/// the selector is not registered.
pub fn resolve_key(selector: impl Into<Selector>) -> Result<String, MulticodecError> {
    let table = snapshot();
    match selector.into() {
        Selector::Key(key) => {
            if table.by_key.contains_key(key.as_str()) {
                Ok(key)
            } else {
                Err(MulticodecError::UnknownKey { key })
            }
        }
        Selector::Code(code) => {
            let code = valid_code(code)?;
            table
                .by_code
                .get(&code)
                .map(|key| key.to_string())
                .ok_or(MulticodecError::UnknownCode { code })
        }
    }
}

/// Resolves a key or code to its registered code.
///
/// # Errors
///
/// Same as [`resolve_key`].
pub fn resolve_code(selector: impl Into<Selector>) -> Result<u64, MulticodecError> {
    let table = snapshot();
    match selector.into() {
        Selector::Key(key) => match table.by_key.get(key.as_str()) {
            Some(&code) => Ok(code),
            None => Err(MulticodecError::UnknownKey { key }),
        },
        Selector::Code(code) => {
            let code = valid_code(code)?;
            if table.by_code.contains_key(&code) {
                Ok(code)
            } else {
                Err(MulticodecError::UnknownCode { code })
            }
        }
    }
}

/// Returns the code registered under `key`.
pub fn code_of(key: &str) -> Option<u64> {
    snapshot().by_key.get(key).copied()
}

/// Returns the key registered under `code`.
pub fn key_of(code: u64) -> Option<String> {
    snapshot().by_code.get(&code).map(|key| key.to_string())
}

/// Lists the registered codecs as `(key, code)` pairs, ordered by code.
pub fn codecs() -> Vec<(String, u64)> {
    let table = snapshot();
    let mut out: Vec<_> = table
        .by_code
        .iter()
        .map(|(&code, key)| (key.to_string(), code))
        .collect();
    out.sort_by_key(|&(_, code)| code);
    out
}
