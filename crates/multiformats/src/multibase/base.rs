//! Built-in multibase encodings.

use crate::error::MultibaseError;
use crate::multibase::base_n;
use crate::multibase::{base32, base64};

/// A built-in multibase encoding.
///
/// Upper-case variants share their lower-case sibling's alphabet and parser;
/// they differ only in the case the formatter emits and in their prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    Base2,
    Base8,
    Base10,
    Base16,
    Base16Upper,
    Base32,
    Base32Upper,
    Base32Pad,
    Base32PadUpper,
    Base32Hex,
    Base32HexUpper,
    Base32HexPad,
    Base32HexPadUpper,
    Base32Z,
    Base36,
    Base36Upper,
    Base58Btc,
    Base58Flickr,
    Base64,
    Base64Pad,
    Base64Url,
    Base64UrlPad,
}

impl Base {
    /// Every built-in base, in registration order.
    pub const ALL: [Base; 22] = [
        Base::Base2,
        Base::Base8,
        Base::Base10,
        Base::Base16,
        Base::Base16Upper,
        Base::Base32,
        Base::Base32Upper,
        Base::Base32Pad,
        Base::Base32PadUpper,
        Base::Base32Hex,
        Base::Base32HexUpper,
        Base::Base32HexPad,
        Base::Base32HexPadUpper,
        Base::Base32Z,
        Base::Base36,
        Base::Base36Upper,
        Base::Base58Btc,
        Base::Base58Flickr,
        Base::Base64,
        Base::Base64Pad,
        Base::Base64Url,
        Base::Base64UrlPad,
    ];

    /// Returns the registry key.
    pub fn key(self) -> &'static str {
        match self {
            Base::Base2 => "base2",
            Base::Base8 => "base8",
            Base::Base10 => "base10",
            Base::Base16 => "base16",
            Base::Base16Upper => "BASE16",
            Base::Base32 => "base32",
            Base::Base32Upper => "BASE32",
            Base::Base32Pad => "base32pad",
            Base::Base32PadUpper => "BASE32PAD",
            Base::Base32Hex => "base32hex",
            Base::Base32HexUpper => "BASE32HEX",
            Base::Base32HexPad => "base32hexpad",
            Base::Base32HexPadUpper => "BASE32HEXPAD",
            Base::Base32Z => "base32z",
            Base::Base36 => "base36",
            Base::Base36Upper => "BASE36",
            Base::Base58Btc => "base58btc",
            Base::Base58Flickr => "base58flickr",
            Base::Base64 => "base64",
            Base::Base64Pad => "base64pad",
            Base::Base64Url => "base64url",
            Base::Base64UrlPad => "base64urlpad",
        }
    }

    /// Returns the multibase prefix character.
    pub fn prefix(self) -> char {
        match self {
            Base::Base2 => '0',
            Base::Base8 => '7',
            Base::Base10 => '9',
            Base::Base16 => 'f',
            Base::Base16Upper => 'F',
            Base::Base32 => 'b',
            Base::Base32Upper => 'B',
            Base::Base32Pad => 'c',
            Base::Base32PadUpper => 'C',
            Base::Base32Hex => 'v',
            Base::Base32HexUpper => 'V',
            Base::Base32HexPad => 't',
            Base::Base32HexPadUpper => 'T',
            Base::Base32Z => 'h',
            Base::Base36 => 'k',
            Base::Base36Upper => 'K',
            Base::Base58Btc => 'z',
            Base::Base58Flickr => 'Z',
            Base::Base64 => 'm',
            Base::Base64Pad => 'M',
            Base::Base64Url => 'u',
            Base::Base64UrlPad => 'U',
        }
    }

    /// Looks up a built-in base by key.
    pub fn from_key(key: &str) -> Option<Base> {
        Base::ALL.into_iter().find(|base| base.key() == key)
    }

    /// Looks up a built-in base by prefix.
    pub fn from_prefix(prefix: char) -> Option<Base> {
        Base::ALL.into_iter().find(|base| base.prefix() == prefix)
    }

    /// True if the formatter emits upper-case letters.
    fn is_upper(self) -> bool {
        matches!(
            self,
            Base::Base16Upper
                | Base::Base32Upper
                | Base::Base32PadUpper
                | Base::Base32HexUpper
                | Base::Base32HexPadUpper
                | Base::Base36Upper
        )
    }

    /// True if this base belongs to a case-insensitive family, whose shared
    /// alphabet is lower-case.
    fn is_case_insensitive(self) -> bool {
        matches!(
            self,
            Base::Base16
                | Base::Base16Upper
                | Base::Base32
                | Base::Base32Upper
                | Base::Base32Pad
                | Base::Base32PadUpper
                | Base::Base32Hex
                | Base::Base32HexUpper
                | Base::Base32HexPad
                | Base::Base32HexPadUpper
                | Base::Base36
                | Base::Base36Upper
        )
    }

    /// Encodes bytes without a multibase prefix.
    pub fn encode(self, bytes: &[u8]) -> String {
        let text = match self {
            Base::Base2 => base_n::BASE2.encode(bytes),
            Base::Base8 => base_n::BASE8.encode(bytes),
            Base::Base10 => base_n::BASE10.encode(bytes),
            Base::Base16 | Base::Base16Upper => base_n::encode_hex(bytes, false),
            Base::Base32 | Base::Base32Upper => base32::encode(bytes, &base32::RFC4648, false),
            Base::Base32Pad | Base::Base32PadUpper => base32::encode(bytes, &base32::RFC4648, true),
            Base::Base32Hex | Base::Base32HexUpper => base32::encode(bytes, &base32::HEX, false),
            Base::Base32HexPad | Base::Base32HexPadUpper => {
                base32::encode(bytes, &base32::HEX, true)
            }
            Base::Base32Z => base32::encode(bytes, &base32::Z_BASE, false),
            Base::Base36 | Base::Base36Upper => base_n::BASE36.encode(bytes),
            Base::Base58Btc => base_n::BASE58_BTC.encode(bytes),
            Base::Base58Flickr => base_n::BASE58_FLICKR.encode(bytes),
            Base::Base64 => base64::encode(bytes, &base64::STANDARD, false),
            Base::Base64Pad => base64::encode(bytes, &base64::STANDARD, true),
            Base::Base64Url => base64::encode(bytes, &base64::URL_SAFE, false),
            Base::Base64UrlPad => base64::encode(bytes, &base64::URL_SAFE, true),
        };
        if self.is_upper() {
            text.to_ascii_uppercase()
        } else {
            text
        }
    }

    /// Decodes text without a multibase prefix.
    ///
    /// # Errors
    ///
    /// Returns [`MultibaseError::InvalidCharacter`] or
    /// [`MultibaseError::InvalidLength`] for malformed text.
    pub fn decode(self, text: &str) -> Result<Vec<u8>, MultibaseError> {
        let normalized;
        let text = if self.is_case_insensitive() {
            normalized = text.to_ascii_lowercase();
            normalized.as_str()
        } else {
            text
        };
        match self {
            Base::Base2 => base_n::BASE2.decode(text),
            Base::Base8 => base_n::BASE8.decode(text),
            Base::Base10 => base_n::BASE10.decode(text),
            Base::Base16 | Base::Base16Upper => base_n::decode_hex(text),
            Base::Base32 | Base::Base32Upper | Base::Base32Pad | Base::Base32PadUpper => {
                base32::decode(text, &base32::RFC4648)
            }
            Base::Base32Hex
            | Base::Base32HexUpper
            | Base::Base32HexPad
            | Base::Base32HexPadUpper => base32::decode(text, &base32::HEX),
            Base::Base32Z => base32::decode(text, &base32::Z_BASE),
            Base::Base36 | Base::Base36Upper => base_n::BASE36.decode(text),
            Base::Base58Btc => base_n::BASE58_BTC.decode(text),
            Base::Base58Flickr => base_n::BASE58_FLICKR.decode(text),
            Base::Base64 | Base::Base64Pad => base64::decode(text, &base64::STANDARD),
            Base::Base64Url | Base::Base64UrlPad => base64::decode(text, &base64::URL_SAFE),
        }
    }
}
