//! Well-known hash algorithm codes.

use std::fmt;

macro_rules! algorithms {
    ($($variant:ident => ($key:literal, $code:literal),)*) => {
        /// A hash algorithm with a registered multihash code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Algorithm {
            $($variant,)*
        }

        impl Algorithm {
            /// Every known algorithm, ordered by code.
            pub const ALL: &'static [Algorithm] = &[$(Algorithm::$variant,)*];

            /// Returns the algorithm's symbolic key.
            pub fn key(self) -> &'static str {
                match self {
                    $(Algorithm::$variant => $key,)*
                }
            }

            /// Returns the algorithm's multihash code.
            pub fn code(self) -> u64 {
                match self {
                    $(Algorithm::$variant => $code,)*
                }
            }

            /// Looks up an algorithm by code.
            pub fn from_code(code: u64) -> Option<Algorithm> {
                match code {
                    $($code => Some(Algorithm::$variant),)*
                    _ => None,
                }
            }

            /// Looks up an algorithm by key.
            pub fn from_key(key: &str) -> Option<Algorithm> {
                match key {
                    $($key => Some(Algorithm::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

algorithms! {
    Identity => ("identity", 0x00),
    Sha1 => ("sha1", 0x11),
    Sha2_256 => ("sha2-256", 0x12),
    Sha2_512 => ("sha2-512", 0x13),
    Sha3_512 => ("sha3-512", 0x14),
    Sha3_384 => ("sha3-384", 0x15),
    Sha3_256 => ("sha3-256", 0x16),
    Sha3_224 => ("sha3-224", 0x17),
    Shake128 => ("shake-128", 0x18),
    Shake256 => ("shake-256", 0x19),
    Keccak224 => ("keccak-224", 0x1a),
    Keccak256 => ("keccak-256", 0x1b),
    Keccak384 => ("keccak-384", 0x1c),
    Keccak512 => ("keccak-512", 0x1d),
    Sha2_384 => ("sha2-384", 0x20),
    Murmur3_128 => ("murmur3-128", 0x22),
    Murmur3_32 => ("murmur3-32", 0x23),
    DblSha2_256 => ("dbl-sha2-256", 0x56),
    Md4 => ("md4", 0xd4),
    Md5 => ("md5", 0xd5),
    Blake2b256 => ("blake2b-256", 0xb220),
    Blake2b512 => ("blake2b-512", 0xb240),
    Blake2s128 => ("blake2s-128", 0xb250),
    Blake2s256 => ("blake2s-256", 0xb260),
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
