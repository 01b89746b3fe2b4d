//! Wire-format limits enforced by the encoders and decoders.
//!
//! Decoders operate on untrusted input, so every length read from the wire
//! is checked against one of these bounds before anything is allocated.

/// Maximum number of bytes in a varint (9 groups of 7 bits).
pub const MAX_VARINT_BYTES: usize = 9;

/// Largest value a varint can carry (63 bits of payload).
pub const MAX_VARINT_VALUE: u64 = (1 << 63) - 1;

/// Maximum digest length accepted in a multihash (1 MiB).
pub const MAX_DIGEST_LEN: usize = 1 << 20;

/// Maximum length of a variable-length multiaddr value (hostnames, peer ids).
pub const MAX_ADDRESS_VALUE_LEN: usize = 1024;

/// Length of a legacy CID v0 in bytes (sha2-256 multihash).
pub const CID_V0_LEN: usize = 34;

/// Length of the text form of a CID v0.
pub const CID_V0_TEXT_LEN: usize = 46;
