//! Positional re-basing over an arbitrary alphabet, plus base16.
//!
//! Base-N encoding treats the input as one big-endian integer and rewrites it
//! in the target radix. Leading zero bytes have no positional weight, so each
//! one is carried across as a single leading zero digit.

use std::borrow::Cow;

use crate::error::MultibaseError;

const INVALID: u8 = 0xFF;

/// An ordered set of ASCII digit symbols.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Cow<'static, [u8]>,
    lookup: [u8; 128],
}

impl Alphabet {
    /// Builds an alphabet from trusted static symbols.
    pub(crate) const fn from_static(symbols: &'static [u8]) -> Self {
        let mut lookup = [INVALID; 128];
        let mut i = 0;
        while i < symbols.len() {
            lookup[symbols[i] as usize] = i as u8;
            i += 1;
        }
        Self {
            symbols: Cow::Borrowed(symbols),
            lookup,
        }
    }

    /// Builds an alphabet from user-supplied symbols.
    ///
    /// # Errors
    ///
    /// Returns a reason if the alphabet has fewer than two symbols, contains a
    /// non-ASCII or control character, or repeats a symbol.
    pub fn new(symbols: &str) -> Result<Self, &'static str> {
        if symbols.len() < 2 {
            return Err("alphabet needs at least two symbols");
        }
        let mut lookup = [INVALID; 128];
        for (i, byte) in symbols.bytes().enumerate() {
            if !byte.is_ascii_graphic() {
                return Err("alphabet symbols must be printable ASCII");
            }
            if lookup[byte as usize] != INVALID {
                return Err("alphabet symbols must be distinct");
            }
            lookup[byte as usize] = i as u8;
        }
        Ok(Self {
            symbols: Cow::Owned(symbols.as_bytes().to_vec()),
            lookup,
        })
    }

    /// Returns the radix of this alphabet.
    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the symbol for digit `index`.
    #[inline]
    pub(crate) fn symbol(&self, index: u8) -> char {
        self.symbols[index as usize] as char
    }

    /// Returns the digit value of `ch`, if it belongs to the alphabet.
    #[inline]
    pub(crate) fn digit(&self, ch: char) -> Option<u8> {
        let code = ch as usize;
        if code >= 128 {
            return None;
        }
        match self.lookup[code] {
            INVALID => None,
            digit => Some(digit),
        }
    }

    /// Encodes bytes as digits of this alphabet.
    pub fn encode(&self, bytes: &[u8]) -> String {
        let radix = self.radix() as u32;
        let zeros = bytes.iter().take_while(|&&b| b == 0).count();

        // Little-endian digits in the target radix.
        let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 2);
        for &byte in &bytes[zeros..] {
            let mut carry = u32::from(byte);
            for digit in digits.iter_mut() {
                carry += u32::from(*digit) << 8;
                *digit = (carry % radix) as u8;
                carry /= radix;
            }
            while carry > 0 {
                digits.push((carry % radix) as u8);
                carry /= radix;
            }
        }

        let mut out = String::with_capacity(zeros + digits.len());
        for _ in 0..zeros {
            out.push(self.symbols[0] as char);
        }
        for &digit in digits.iter().rev() {
            out.push(self.symbols[digit as usize] as char);
        }
        out
    }

    /// Decodes digits of this alphabet back into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MultibaseError::InvalidCharacter`] for any character outside
    /// the alphabet.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, MultibaseError> {
        let radix = self.radix() as u32;
        let zero = self.symbols[0] as char;
        let zeros = text.chars().take_while(|&c| c == zero).count();

        // Little-endian bytes.
        let mut bytes: Vec<u8> = Vec::with_capacity(text.len());
        for (position, ch) in text.chars().enumerate().skip(zeros) {
            let digit = self
                .digit(ch)
                .ok_or(MultibaseError::InvalidCharacter { ch, position })?;
            let mut carry = u32::from(digit);
            for byte in bytes.iter_mut() {
                carry += u32::from(*byte) * radix;
                *byte = (carry & 0xFF) as u8;
                carry >>= 8;
            }
            while carry > 0 {
                bytes.push((carry & 0xFF) as u8);
                carry >>= 8;
            }
        }

        let mut out = vec![0u8; zeros];
        out.extend(bytes.iter().rev());
        Ok(out)
    }
}

pub(crate) static BASE2: Alphabet = Alphabet::from_static(b"01");
pub(crate) static BASE8: Alphabet = Alphabet::from_static(b"01234567");
pub(crate) static BASE10: Alphabet = Alphabet::from_static(b"0123456789");
pub(crate) static BASE36: Alphabet = Alphabet::from_static(b"0123456789abcdefghijklmnopqrstuvwxyz");
pub(crate) static BASE58_BTC: Alphabet =
    Alphabet::from_static(b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz");
pub(crate) static BASE58_FLICKR: Alphabet =
    Alphabet::from_static(b"123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ");

// =============================================================================
// BASE16
// =============================================================================

const HEX_LOWER: &[u8; 16] = b"0123456789abcdef";
const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Encodes bytes as hexadecimal.
pub fn encode_hex(bytes: &[u8], upper: bool) -> String {
    let table = if upper { HEX_UPPER } else { HEX_LOWER };
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(table[(byte >> 4) as usize] as char);
        out.push(table[(byte & 0x0F) as usize] as char);
    }
    out
}

/// Decodes hexadecimal text in either letter case.
///
/// # Errors
///
/// Returns [`MultibaseError::InvalidLength`] for an odd number of characters
/// and [`MultibaseError::InvalidCharacter`] for non-hex characters.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, MultibaseError> {
    if text.len() % 2 != 0 {
        return Err(MultibaseError::InvalidLength { len: text.len() });
    }
    let mut out = Vec::with_capacity(text.len() / 2);
    let mut high = 0u8;
    for (position, ch) in text.chars().enumerate() {
        let nibble = ch
            .to_digit(16)
            .ok_or(MultibaseError::InvalidCharacter { ch, position })? as u8;
        if position % 2 == 0 {
            high = nibble << 4;
        } else {
            out.push(high | nibble);
        }
    }
    Ok(out)
}
