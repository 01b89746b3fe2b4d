//! Multihash: a digest tagged with the algorithm that produced it.
//!
//! Canonical form: `varint(code) ‖ varint(len) ‖ digest`.
//!
//! ```rust
//! use multiformats::multihash::Multihash;
//!
//! let mh = Multihash::decode(&[0x11, 0x04, 0x0b, 0xee, 0xc7, 0xb8]).unwrap();
//! assert_eq!(mh.name(), "sha1");
//! assert_eq!(mh.digest_hex(), "0beec7b8");
//! ```

mod algorithm;
mod digest;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHasher;

use crate::codec::{Reader, Writer, varint};
use crate::error::{MultihashError, VarintError};
use crate::limits::MAX_DIGEST_LEN;
use crate::meta::{Meta, Metadata};
use crate::multibase::{decode_hex, encode_hex};
use crate::selector::{CodeCheck, Selector};

pub use algorithm::Algorithm;
pub use digest::{DigestFn, HashFunctions};

/// Resolves an algorithm key or code. Numeric codes need not be in the
/// [`Algorithm`] table.
pub(crate) fn resolve_algorithm(selector: Selector) -> Result<u64, MultihashError> {
    match selector {
        Selector::Key(key) => Algorithm::from_key(&key)
            .map(Algorithm::code)
            .ok_or(MultihashError::UnknownAlgorithm { key }),
        Selector::Code(code) => match Selector::check_code(code) {
            CodeCheck::Valid(code) => Ok(code),
            CodeCheck::Negative(code) => Err(MultihashError::NegativeCode { code }),
            CodeCheck::TooLarge(value) => Err(VarintError::Unsupported { value }.into()),
        },
    }
}

/// Returns the algorithm key for `code`, or the code in hex if unknown.
pub(crate) fn algorithm_name(code: u64) -> String {
    match Algorithm::from_code(code) {
        Some(algorithm) => algorithm.key().to_string(),
        None => format!("{code:#x}"),
    }
}

/// An immutable multihash.
///
/// Equality, ordering and hashing are defined on the canonical bytes;
/// attached metadata is ignored.
#[derive(Clone)]
pub struct Multihash {
    bytes: Arc<[u8]>,
    code: u64,
    digest_start: usize,
    hash: OnceLock<u64>,
    meta: Meta,
}

impl Multihash {
    /// Wraps `digest` as produced by `algorithm` (a key or a numeric code).
    ///
    /// # Errors
    ///
    /// Returns [`MultihashError::UnknownAlgorithm`] for an unknown key,
    /// [`MultihashError::NegativeCode`] for a negative code,
    /// [`MultihashError::EmptyDigest`] for an empty digest and
    /// [`MultihashError::DigestTooLong`] above [`MAX_DIGEST_LEN`].
    pub fn new(algorithm: impl Into<Selector>, digest: &[u8]) -> Result<Self, MultihashError> {
        let code = resolve_algorithm(algorithm.into())?;
        Self::from_parts(code, digest)
    }

    /// Like [`Multihash::new`], taking the digest as hex.
    ///
    /// # Errors
    ///
    /// Returns [`MultihashError::Multibase`] for malformed hex, otherwise as
    /// [`Multihash::new`].
    pub fn from_hex(algorithm: impl Into<Selector>, hex: &str) -> Result<Self, MultihashError> {
        let digest = decode_hex(hex)?;
        Self::new(algorithm, &digest)
    }

    fn from_parts(code: u64, digest: &[u8]) -> Result<Self, MultihashError> {
        if digest.is_empty() {
            return Err(MultihashError::EmptyDigest);
        }
        if digest.len() > MAX_DIGEST_LEN {
            return Err(MultihashError::DigestTooLong {
                len: digest.len(),
                max: MAX_DIGEST_LEN,
            });
        }
        let mut writer = Writer::with_capacity(varint::encoded_len(code) + 4 + digest.len());
        writer.write_varint(code)?;
        writer.write_prefixed(digest)?;
        let bytes = writer.into_bytes();
        Ok(Self {
            digest_start: bytes.len() - digest.len(),
            bytes: bytes.into(),
            code,
            hash: OnceLock::new(),
            meta: Meta::default(),
        })
    }

    /// Decodes a multihash that spans all of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`MultihashError::TrailingBytes`] if bytes remain after the
    /// digest, otherwise as [`Multihash::read_at`].
    pub fn decode(bytes: &[u8]) -> Result<Self, MultihashError> {
        let mut reader = Reader::new(bytes);
        let mh = Self::read(&mut reader)?;
        if !reader.is_empty() {
            return Err(MultihashError::TrailingBytes {
                count: reader.remaining_len(),
            });
        }
        Ok(mh)
    }

    /// Decodes a multihash starting at `offset`, returning it with the number
    /// of bytes consumed. Bytes after the digest are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MultihashError::Varint`] for truncated or overlong input,
    /// [`MultihashError::EmptyDigest`] for a zero length and
    /// [`MultihashError::DigestTooLong`] above [`MAX_DIGEST_LEN`].
    pub fn read_at(bytes: &[u8], offset: usize) -> Result<(Self, usize), MultihashError> {
        if offset > bytes.len() {
            return Err(VarintError::Truncated {
                context: "multihash.code",
            }
            .into());
        }
        let mut reader = Reader::at(bytes, offset);
        let mh = Self::read(&mut reader)?;
        Ok((mh, reader.position() - offset))
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, MultihashError> {
        let start = reader.position();
        let code = reader.read_varint("multihash.code")?;
        let digest = reader
            .read_prefixed(MAX_DIGEST_LEN, "multihash.digest")?
            .map_err(|len| MultihashError::DigestTooLong {
                len,
                max: MAX_DIGEST_LEN,
            })?;
        if digest.is_empty() {
            return Err(MultihashError::EmptyDigest);
        }
        let bytes: Arc<[u8]> = reader.consumed_since(start).into();
        Ok(Self {
            digest_start: bytes.len() - digest.len(),
            bytes,
            code,
            hash: OnceLock::new(),
            meta: Meta::default(),
        })
    }

    /// Writes the canonical bytes into `buffer` at `offset`, returning the
    /// number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`VarintError::OutOfBounds`] (wrapped) if the buffer is too
    /// small.
    pub fn write_at(&self, buffer: &mut [u8], offset: usize) -> Result<usize, MultihashError> {
        Ok(varint::write_slice_at(&self.bytes, buffer, offset)?)
    }

    /// Returns the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a copy of the canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the algorithm code.
    pub fn code(&self) -> u64 {
        self.code
    }

    /// Returns the algorithm, if the code is a known one.
    pub fn algorithm(&self) -> Option<Algorithm> {
        Algorithm::from_code(self.code)
    }

    /// Returns the algorithm key, or the code in hex if it is not known.
    pub fn name(&self) -> String {
        algorithm_name(self.code)
    }

    /// Returns the digest.
    pub fn digest(&self) -> &[u8] {
        &self.bytes[self.digest_start..]
    }

    /// Returns the digest as lower-case hex.
    pub fn digest_hex(&self) -> String {
        encode_hex(self.digest(), false)
    }

    /// Returns the digest length in bytes.
    pub fn length(&self) -> usize {
        self.bytes.len() - self.digest_start
    }

    /// Returns the digest length in bits.
    pub fn bits(&self) -> usize {
        self.length() * 8
    }

    /// Recomputes the digest of `content` and compares it with this one.
    ///
    /// # Errors
    ///
    /// Returns [`MultihashError::UnsupportedAlgorithm`] if `functions` has no
    /// entry for this algorithm.
    pub fn verify(
        &self,
        content: &[u8],
        functions: &HashFunctions,
    ) -> Result<bool, MultihashError> {
        let computed = functions.compute(self.code, content)?;
        Ok(computed == self.digest())
    }

    /// Returns the cached hash of the canonical bytes.
    pub fn hash_code(&self) -> u64 {
        *self.hash.get_or_init(|| {
            let mut hasher = FxHasher::default();
            hasher.write(&self.bytes);
            hasher.finish()
        })
    }

    /// Returns a copy carrying `key = value` in its metadata.
    pub fn with_meta(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            meta: self.meta.with(key, value),
            ..self.clone()
        }
    }

    /// Returns the attached metadata.
    pub fn meta(&self) -> Option<&Metadata> {
        self.meta.get()
    }
}

/// Checks `content` against `mh`.
///
/// Returns `Ok(None)` when either argument is absent.
///
/// # Errors
///
/// Same as [`Multihash::verify`].
pub fn test(
    mh: Option<&Multihash>,
    content: Option<&[u8]>,
    functions: &HashFunctions,
) -> Result<Option<bool>, MultihashError> {
    match (mh, content) {
        (Some(mh), Some(content)) => mh.verify(content, functions).map(Some),
        _ => Ok(None),
    }
}

impl PartialEq for Multihash {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Multihash {}

impl PartialOrd for Multihash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Multihash {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code
            .cmp(&other.code)
            .then_with(|| self.digest().cmp(other.digest()))
    }
}

impl Hash for Multihash {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Debug for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multihash")
            .field("algorithm", &self.name())
            .field("digest", &self.digest_hex())
            .finish()
    }
}

/// Renders the canonical bytes as lower-case hex.
impl fmt::Display for Multihash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(&self.bytes, false))
    }
}

impl FromStr for Multihash {
    type Err = MultihashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(&decode_hex(s)?)
    }
}
