//! Content identifiers.
//!
//! A CID names content by the codec it is encoded with and the multihash of
//! its bytes. Two versions exist:
//!
//! - **v0**: a bare 34-byte sha2-256 multihash, rendered as base58btc with
//!   no multibase prefix (always 46 characters beginning with `Qm`).
//! - **v1**: `varint(1) ‖ varint(codec) ‖ multihash`, rendered as a
//!   multibase string (base32 by default).
//!
//! ```rust
//! use multiformats::{Cid, HashFunctions};
//!
//! let mh = HashFunctions::default().digest("sha2-256", b"foo bar baz").unwrap();
//! let cid = Cid::v0(mh).unwrap();
//! assert_eq!(cid.to_string(), "Qmd8kgzaFLGYtTS1zfF37qKGgYQd5yKcQMyBeSa8UkUz4W");
//! assert_eq!(cid.to_v1().to_string().len(), 59);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHasher;
use tracing::trace;

use crate::codec::{Reader, Writer, varint};
use crate::error::{CidError, VarintError};
use crate::limits::{CID_V0_LEN, CID_V0_TEXT_LEN};
use crate::meta::{Meta, Metadata};
use crate::multibase::{self, Base};
use crate::multicodec;
use crate::multihash::{Algorithm, Multihash};
use crate::selector::Selector;

/// Base used for v1 text when none is requested.
pub const DEFAULT_CID_BASE: &str = "base32";

const DEFAULT_V1_BASE: Base = Base::Base32;

/// Codec implied by a v0 CID (`raw`).
const V0_CODEC: u64 = 0x55;

/// Multihash header of every v0 CID: sha2-256, 32 bytes.
const V0_HEADER: [u8; 2] = [0x12, 0x20];

/// CID version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    V0,
    V1,
}

impl Version {
    /// Returns the numeric version.
    pub fn number(self) -> u64 {
        match self {
            Version::V0 => 0,
            Version::V1 => 1,
        }
    }
}

/// An immutable content identifier.
///
/// Equality, ordering and hashing are defined on the canonical bytes.
#[derive(Clone)]
pub struct Cid {
    version: Version,
    codec: u64,
    multihash: Multihash,
    bytes: Arc<[u8]>,
    hash: OnceLock<u64>,
    meta: Meta,
}

impl Cid {
    /// Creates a v1 CID.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::Multicodec`] if `codec` is not registered.
    pub fn new(codec: impl Into<Selector>, multihash: Multihash) -> Result<Self, CidError> {
        let codec = multicodec::resolve_code(codec)?;
        Self::v1_from_parts(codec, multihash)
    }

    /// Creates a legacy v0 CID.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::InvalidV0Hash`] unless `multihash` is sha2-256 with
    /// a 32-byte digest.
    pub fn v0(multihash: Multihash) -> Result<Self, CidError> {
        if multihash.algorithm() != Some(Algorithm::Sha2_256) || multihash.length() != 32 {
            return Err(CidError::InvalidV0Hash {
                code: multihash.code(),
                len: multihash.length(),
            });
        }
        let bytes: Arc<[u8]> = multihash.as_bytes().into();
        Ok(Self {
            version: Version::V0,
            codec: V0_CODEC,
            multihash,
            bytes,
            hash: OnceLock::new(),
            meta: Meta::default(),
        })
    }

    fn v1_from_parts(codec: u64, multihash: Multihash) -> Result<Self, CidError> {
        let mut writer =
            Writer::with_capacity(2 + varint::encoded_len(codec) + multihash.as_bytes().len());
        writer.write_varint(Version::V1.number())?;
        writer.write_varint(codec)?;
        writer.write_bytes(multihash.as_bytes());
        Ok(Self {
            version: Version::V1,
            codec,
            multihash,
            bytes: writer.into_bytes().into(),
            hash: OnceLock::new(),
            meta: Meta::default(),
        })
    }

    /// Converts to v1, keeping the codec and multihash. A v1 CID is returned
    /// unchanged.
    pub fn to_v1(&self) -> Self {
        match self.version {
            Version::V1 => self.clone(),
            Version::V0 => {
                let mut writer = Writer::with_capacity(2 + self.bytes.len());
                writer.write_byte(0x01);
                writer.write_byte(V0_CODEC as u8);
                writer.write_bytes(&self.bytes);
                Self {
                    version: Version::V1,
                    codec: V0_CODEC,
                    multihash: self.multihash.clone(),
                    bytes: writer.into_bytes().into(),
                    hash: OnceLock::new(),
                    meta: self.meta.clone(),
                }
            }
        }
    }

    /// Decodes a CID that spans all of `bytes`.
    ///
    /// Exactly 34 bytes beginning `0x12 0x20` are a v0 CID; anything else is
    /// read as v1 framing.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::UnsupportedVersion`] for a version other than 1,
    /// [`CidError::TrailingBytes`] if bytes remain after the multihash, and
    /// the nested error for a bad codec or multihash.
    pub fn decode(bytes: &[u8]) -> Result<Self, CidError> {
        if is_v0(bytes) {
            trace!("decoding CID v0");
            return Self::v0(Multihash::decode(bytes)?);
        }
        let mut reader = Reader::new(bytes);
        let cid = Self::read_v1(&mut reader)?;
        if !reader.is_empty() {
            return Err(CidError::TrailingBytes {
                count: reader.remaining_len(),
            });
        }
        Ok(cid)
    }

    /// Decodes a CID starting at `offset`, returning it with the number of
    /// bytes consumed.
    ///
    /// A v0 CID is recognized by its `0x12 0x20` header and occupies exactly
    /// 34 bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Cid::decode`], except that trailing bytes are allowed.
    pub fn read_at(bytes: &[u8], offset: usize) -> Result<(Self, usize), CidError> {
        let Some(tail) = bytes.get(offset..) else {
            return Err(VarintError::Truncated {
                context: "cid.version",
            }
            .into());
        };
        if tail.len() >= CID_V0_LEN && tail.starts_with(&V0_HEADER) {
            trace!(offset, "reading CID v0");
            let cid = Self::v0(Multihash::decode(&tail[..CID_V0_LEN])?)?;
            return Ok((cid, CID_V0_LEN));
        }
        let mut reader = Reader::new(tail);
        let cid = Self::read_v1(&mut reader)?;
        Ok((cid, reader.position()))
    }

    fn read_v1(reader: &mut Reader<'_>) -> Result<Self, CidError> {
        let start = reader.position();
        let version = reader.read_varint("cid.version")?;
        if version != Version::V1.number() {
            return Err(CidError::UnsupportedVersion { version });
        }
        let codec = reader.read_varint("cid.codec")?;
        let codec = multicodec::resolve_code(codec)?;
        let multihash = Multihash::read(reader)?;
        Ok(Self {
            version: Version::V1,
            codec,
            multihash,
            bytes: reader.consumed_since(start).into(),
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
    pub fn write_at(&self, buffer: &mut [u8], offset: usize) -> Result<usize, CidError> {
        Ok(varint::write_slice_at(&self.bytes, buffer, offset)?)
    }

    /// Renders the CID as text.
    ///
    /// With no base, v0 renders as bare base58btc and v1 as base32, both
    /// through the built-in encodings, exactly as [`Display`](fmt::Display)
    /// does. A v0 CID accepts only `base58btc`; a v1 CID accepts any
    /// registered base.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::UnsupportedForV0`] for a v0 CID and any base other
    /// than base58btc, and [`CidError::Multibase`] for an unregistered base.
    pub fn format(&self, base: Option<&str>) -> Result<String, CidError> {
        match (self.version, base) {
            (_, None) => Ok(self.default_text()),
            (Version::V0, Some(key)) if key == Base::Base58Btc.key() => Ok(self.default_text()),
            (Version::V0, Some(key)) => Err(CidError::UnsupportedForV0 {
                base: key.to_string(),
            }),
            (Version::V1, Some(key)) => Ok(multibase::format(key, &self.bytes)?),
        }
    }

    fn default_text(&self) -> String {
        match self.version {
            Version::V0 => Base::Base58Btc.encode(&self.bytes),
            Version::V1 => {
                let mut text = String::from(DEFAULT_V1_BASE.prefix());
                text.push_str(&DEFAULT_V1_BASE.encode(&self.bytes));
                text
            }
        }
    }

    /// Parses CID text.
    ///
    /// A 46-character string beginning `Qm` is a v0 CID in bare base58btc;
    /// anything else must be a multibase string.
    ///
    /// # Errors
    ///
    /// Returns [`CidError::Multibase`] for undecodable text, otherwise as
    /// [`Cid::decode`].
    pub fn parse(text: &str) -> Result<Self, CidError> {
        if text.len() == CID_V0_TEXT_LEN && text.starts_with("Qm") {
            trace!(%text, "detected CID v0 text");
            let bytes = Base::Base58Btc.decode(text)?;
            return Self::decode(&bytes);
        }
        Self::decode(&multibase::parse(text)?)
    }

    /// Returns the version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the codec code.
    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// Returns the codec key, if the code is still registered.
    pub fn codec_key(&self) -> Option<String> {
        multicodec::key_of(self.codec)
    }

    /// Returns the multihash.
    pub fn multihash(&self) -> &Multihash {
        &self.multihash
    }

    /// Returns the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a copy of the canonical bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
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

fn is_v0(bytes: &[u8]) -> bool {
    bytes.len() == CID_V0_LEN && bytes.starts_with(&V0_HEADER)
}

impl PartialEq for Cid {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Cid {}

impl PartialOrd for Cid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl Hash for Cid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cid")
            .field("version", &self.version)
            .field("codec", &format_args!("{:#x}", self.codec))
            .field("multihash", &self.multihash)
            .finish()
    }
}

/// Renders the default text form: bare base58btc for v0, base32 for v1.
impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default_text())
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
