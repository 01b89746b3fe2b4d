//! Base32 group packing (RFC 4648 and variants).
//!
//! Input is consumed in groups of 5 bytes (40 bits), each emitted as 8
//! characters of 5 bits. A short tail group emits only the characters that
//! carry input bits, optionally followed by `=` padding up to 8.

use crate::error::MultibaseError;
use crate::multibase::base_n::Alphabet;

pub(crate) static RFC4648: Alphabet = Alphabet::from_static(b"abcdefghijklmnopqrstuvwxyz234567");
pub(crate) static HEX: Alphabet = Alphabet::from_static(b"0123456789abcdefghijklmnopqrstuv");
pub(crate) static Z_BASE: Alphabet = Alphabet::from_static(b"ybndrfg8ejkmcpqxot1uwisza345h769");

/// Characters emitted for a tail group of 0..=4 bytes.
const TAIL_CHARS: [usize; 5] = [0, 2, 4, 5, 7];

/// Padding characters following a tail group of 0..=4 bytes.
const TAIL_PADDING: [usize; 5] = [0, 6, 4, 3, 1];

/// Encodes bytes with the given 32-symbol alphabet.
pub fn encode(bytes: &[u8], alphabet: &Alphabet, pad: bool) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    for chunk in bytes.chunks(5) {
        let mut group = [0u8; 8];
        group[3..3 + chunk.len()].copy_from_slice(chunk);
        let bits = u64::from_be_bytes(group);

        let chars = if chunk.len() == 5 { 8 } else { TAIL_CHARS[chunk.len()] };
        for i in 0..chars {
            let index = (bits >> (35 - 5 * i)) & 0x1F;
            out.push(alphabet.symbol(index as u8));
        }
        if pad && chunk.len() < 5 {
            for _ in 0..TAIL_PADDING[chunk.len()] {
                out.push('=');
            }
        }
    }
    out
}

/// Decodes base32 text, accepting padded or unpadded input.
///
/// # Errors
///
/// Returns [`MultibaseError::InvalidCharacter`] for characters outside the
/// alphabet and [`MultibaseError::InvalidLength`] for a tail group that
/// cannot be produced by [`encode`].
pub fn decode(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, MultibaseError> {
    let trimmed = text.trim_end_matches('=');
    let chars: Vec<char> = trimmed.chars().collect();
    let mut out = Vec::with_capacity(chars.len() * 5 / 8);

    for (group_index, chunk) in chars.chunks(8).enumerate() {
        let bytes_out = match chunk.len() {
            8 => 5,
            7 => 4,
            5 => 3,
            4 => 2,
            2 => 1,
            _ => return Err(MultibaseError::InvalidLength { len: text.len() }),
        };

        let mut bits = 0u64;
        for (i, &ch) in chunk.iter().enumerate() {
            let digit = alphabet.digit(ch).ok_or(MultibaseError::InvalidCharacter {
                ch,
                position: group_index * 8 + i,
            })?;
            bits = (bits << 5) | u64::from(digit);
        }
        bits <<= 5 * (8 - chunk.len());

        let group = bits.to_be_bytes();
        out.extend_from_slice(&group[3..3 + bytes_out]);
    }
    Ok(out)
}
