//! Error types for the multiformats codecs, registries and value types.

use thiserror::Error;

/// Error classification shared by every error in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// MF001: truncated, overlong, wrong-length or otherwise malformed input
    MalformedInput,
    /// MF002: unregistered algorithm, codec, base, prefix or protocol
    UnknownIdentifier,
    /// MF003: value rejected while constructing a value
    InvalidConstruction,
    /// MF004: registration collides with an existing registry entry
    RegistryConflict,
}

impl ErrorKind {
    /// Returns the error code string (e.g., "MF001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "MF001",
            ErrorKind::UnknownIdentifier => "MF002",
            ErrorKind::InvalidConstruction => "MF003",
            ErrorKind::RegistryConflict => "MF004",
        }
    }
}

/// Error from the varint codec and the framing reader built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarintError {
    #[error("[MF003] varint value {value} is negative")]
    Negative { value: i64 },

    #[error("[MF003] varint value {value} exceeds 63 bits")]
    Unsupported { value: u64 },

    #[error("[MF001] varint exceeds maximum length (9 bytes) while reading {context}")]
    Overlong { context: &'static str },

    #[error("[MF001] unexpected end of input while reading {context}")]
    Truncated { context: &'static str },

    #[error("[MF001] non-minimal varint encoding while reading {context}")]
    NonMinimal { context: &'static str },

    #[error("[MF001] buffer of {available} bytes cannot hold {needed} bytes at offset {offset}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl VarintError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            VarintError::Negative { .. } | VarintError::Unsupported { .. } => {
                ErrorKind::InvalidConstruction
            }
            _ => ErrorKind::MalformedInput,
        }
    }
}

/// Error from multibase formatting, parsing or registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultibaseError {
    #[error("[MF003] cannot format empty input")]
    EmptyInput,

    #[error("[MF002] unknown base: {key}")]
    UnknownBase { key: String },

    #[error("[MF001] multibase string of {len} characters is too short")]
    TooShort { len: usize },

    #[error("[MF002] unknown multibase prefix: {prefix:?}")]
    UnknownPrefix { prefix: char },

    #[error("[MF001] invalid character {ch:?} at position {position}")]
    InvalidCharacter { ch: char, position: usize },

    #[error("[MF001] encoded length {len} is not valid for this base")]
    InvalidLength { len: usize },

    #[error("[MF004] base {key} ({prefix:?}) conflicts with registered base {existing}")]
    AlreadyRegistered {
        key: String,
        prefix: char,
        existing: String,
    },

    #[error("[MF003] invalid definition for base {key}: {reason}")]
    InvalidDefinition { key: String, reason: &'static str },
}

impl MultibaseError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MultibaseError::UnknownBase { .. } | MultibaseError::UnknownPrefix { .. } => {
                ErrorKind::UnknownIdentifier
            }
            MultibaseError::EmptyInput | MultibaseError::InvalidDefinition { .. } => {
                ErrorKind::InvalidConstruction
            }
            MultibaseError::AlreadyRegistered { .. } => ErrorKind::RegistryConflict,
            _ => ErrorKind::MalformedInput,
        }
    }
}

/// Error from the multicodec registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MulticodecError {
    #[error("[MF003] invalid codec key: {key:?}")]
    InvalidKey { key: String },

    #[error("[MF003] codec code {code} is negative")]
    NegativeCode { code: i64 },

    #[error("[MF003] codec code {code} exceeds 63 bits")]
    CodeTooLarge { code: u64 },

    #[error("[MF004] codec key {key} is already registered to {existing:#x}")]
    KeyConflict { key: String, existing: u64 },

    #[error("[MF004] codec code {code:#x} is already registered to {existing}")]
    CodeConflict { code: u64, existing: String },

    #[error("[MF002] unknown codec key: {key}")]
    UnknownKey { key: String },

    #[error("[MF002] unknown codec code: {code:#x}")]
    UnknownCode { code: u64 },
}

impl MulticodecError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MulticodecError::InvalidKey { .. }
            | MulticodecError::NegativeCode { .. }
            | MulticodecError::CodeTooLarge { .. } => ErrorKind::InvalidConstruction,
            MulticodecError::KeyConflict { .. } | MulticodecError::CodeConflict { .. } => {
                ErrorKind::RegistryConflict
            }
            MulticodecError::UnknownKey { .. } | MulticodecError::UnknownCode { .. } => {
                ErrorKind::UnknownIdentifier
            }
        }
    }
}

/// Error from multihash construction, decoding or verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultihashError {
    #[error("[MF002] unknown hash algorithm: {key}")]
    UnknownAlgorithm { key: String },

    #[error("[MF003] hash algorithm code {code} is negative")]
    NegativeCode { code: i64 },

    #[error("[MF003] multihash digest is empty")]
    EmptyDigest,

    #[error("[MF001] digest length {len} exceeds maximum {max}")]
    DigestTooLong { len: usize, max: usize },

    #[error("[MF001] {count} trailing bytes after multihash")]
    TrailingBytes { count: usize },

    #[error("[MF002] no digest function registered for {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error(transparent)]
    Varint(#[from] VarintError),

    #[error(transparent)]
    Multibase(#[from] MultibaseError),
}

impl MultihashError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MultihashError::UnknownAlgorithm { .. }
            | MultihashError::UnsupportedAlgorithm { .. } => ErrorKind::UnknownIdentifier,
            MultihashError::NegativeCode { .. } | MultihashError::EmptyDigest => {
                ErrorKind::InvalidConstruction
            }
            MultihashError::DigestTooLong { .. } | MultihashError::TrailingBytes { .. } => {
                ErrorKind::MalformedInput
            }
            MultihashError::Varint(e) => e.kind(),
            MultihashError::Multibase(e) => e.kind(),
        }
    }
}

/// Error from CID construction, decoding, formatting or parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidError {
    #[error("[MF001] unsupported CID version: {version}")]
    UnsupportedVersion { version: u64 },

    #[error("[MF003] CID v0 can only be rendered as base58btc, not {base}")]
    UnsupportedForV0 { base: String },

    #[error("[MF003] CID v0 needs a 32-byte sha2-256 multihash, got {code:#x} with {len} bytes")]
    InvalidV0Hash { code: u64, len: usize },

    #[error("[MF001] {count} trailing bytes after CID")]
    TrailingBytes { count: usize },

    #[error(transparent)]
    Varint(#[from] VarintError),

    #[error(transparent)]
    Multibase(#[from] MultibaseError),

    #[error(transparent)]
    Multicodec(#[from] MulticodecError),

    #[error(transparent)]
    Multihash(#[from] MultihashError),
}

impl CidError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CidError::UnsupportedVersion { .. } | CidError::TrailingBytes { .. } => {
                ErrorKind::MalformedInput
            }
            CidError::UnsupportedForV0 { .. } | CidError::InvalidV0Hash { .. } => {
                ErrorKind::InvalidConstruction
            }
            CidError::Varint(e) => e.kind(),
            CidError::Multibase(e) => e.kind(),
            CidError::Multicodec(e) => e.kind(),
            CidError::Multihash(e) => e.kind(),
        }
    }
}

/// Error from multiaddr construction, parsing, decoding or sequence access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("[MF002] unknown protocol: {name:?}")]
    UnknownProtocol { name: String },

    #[error("[MF002] unknown protocol code: {code}")]
    UnknownProtocolCode { code: u64 },

    #[error("[MF003] protocol {protocol} requires a value")]
    MissingValue { protocol: &'static str },

    #[error("[MF003] protocol {protocol} does not take a value")]
    UnexpectedValue { protocol: &'static str },

    #[error("[MF003] invalid value for {protocol}: {reason}")]
    InvalidValue {
        protocol: &'static str,
        reason: String,
    },

    #[error("[MF001] address text must start with '/': {text:?}")]
    MissingLeadingSlash { text: String },

    #[error("[MF003] index {index} out of bounds for address with {len} entries")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("[MF003] cannot pop from an empty address")]
    EmptyAddress,

    #[error(transparent)]
    Varint(#[from] VarintError),
}

impl AddressError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AddressError::UnknownProtocol { .. } | AddressError::UnknownProtocolCode { .. } => {
                ErrorKind::UnknownIdentifier
            }
            AddressError::MissingLeadingSlash { .. } => ErrorKind::MalformedInput,
            AddressError::Varint(e) => e.kind(),
            _ => ErrorKind::InvalidConstruction,
        }
    }
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Varint(#[from] VarintError),

    #[error(transparent)]
    Multibase(#[from] MultibaseError),

    #[error(transparent)]
    Multicodec(#[from] MulticodecError),

    #[error(transparent)]
    Multihash(#[from] MultihashError),

    #[error(transparent)]
    Cid(#[from] CidError),

    #[error(transparent)]
    Address(#[from] AddressError),
}

impl Error {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Varint(e) => e.kind(),
            Error::Multibase(e) => e.kind(),
            Error::Multicodec(e) => e.kind(),
            Error::Multihash(e) => e.kind(),
            Error::Cid(e) => e.kind(),
            Error::Address(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_kind_is_preserved() {
        let err = CidError::from(MultihashError::from(VarintError::Truncated {
            context: "multihash.code",
        }));
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(err.kind().code(), "MF001");

        let err = Error::from(MulticodecError::CodeConflict {
            code: 0x55,
            existing: "raw".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::RegistryConflict);
    }

    #[test]
    fn test_messages_carry_offending_value() {
        let err = MultibaseError::UnknownPrefix { prefix: 'x' };
        assert_eq!(err.to_string(), "[MF002] unknown multibase prefix: 'x'");

        let err = MulticodecError::UnknownCode { code: 0x99 };
        assert_eq!(err.to_string(), "[MF002] unknown codec code: 0x99");
    }
}
