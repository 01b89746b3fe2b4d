//! Base64 group packing (RFC 4648 standard and URL-safe alphabets).
//!
//! Input is consumed in groups of 3 bytes (24 bits), each emitted as 4
//! characters of 6 bits.

use crate::error::MultibaseError;
use crate::multibase::base_n::Alphabet;

pub(crate) static STANDARD: Alphabet =
    Alphabet::from_static(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/");
pub(crate) static URL_SAFE: Alphabet =
    Alphabet::from_static(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_");

/// Characters emitted for a tail group of 0..=2 bytes.
const TAIL_CHARS: [usize; 3] = [0, 2, 3];

/// Padding characters following a tail group of 0..=2 bytes.
const TAIL_PADDING: [usize; 3] = [0, 2, 1];

/// Encodes bytes with the given 64-symbol alphabet.
pub fn encode(bytes: &[u8], alphabet: &Alphabet, pad: bool) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let mut group = [0u8; 4];
        group[1..1 + chunk.len()].copy_from_slice(chunk);
        let bits = u32::from_be_bytes(group);

        let chars = if chunk.len() == 3 { 4 } else { TAIL_CHARS[chunk.len()] };
        for i in 0..chars {
            let index = (bits >> (18 - 6 * i)) & 0x3F;
            out.push(alphabet.symbol(index as u8));
        }
        if pad && chunk.len() < 3 {
            for _ in 0..TAIL_PADDING[chunk.len()] {
                out.push('=');
            }
        }
    }
    out
}

/// Decodes base64 text, accepting padded or unpadded input.
///
/// # Errors
///
/// Returns [`MultibaseError::InvalidCharacter`] for characters outside the
/// alphabet and [`MultibaseError::InvalidLength`] for a single dangling
/// character.
pub fn decode(text: &str, alphabet: &Alphabet) -> Result<Vec<u8>, MultibaseError> {
    let trimmed = text.trim_end_matches('=');
    let chars: Vec<char> = trimmed.chars().collect();
    let mut out = Vec::with_capacity(chars.len() * 3 / 4);

    for (group_index, chunk) in chars.chunks(4).enumerate() {
        let bytes_out = match chunk.len() {
            4 => 3,
            3 => 2,
            2 => 1,
            _ => return Err(MultibaseError::InvalidLength { len: text.len() }),
        };

        let mut bits = 0u32;
        for (i, &ch) in chunk.iter().enumerate() {
            let digit = alphabet.digit(ch).ok_or(MultibaseError::InvalidCharacter {
                ch,
                position: group_index * 4 + i,
            })?;
            bits = (bits << 6) | u32::from(digit);
        }
        bits <<= 6 * (4 - chunk.len());

        let group = bits.to_be_bytes();
        out.extend_from_slice(&group[1..1 + bytes_out]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4648_vectors() {
        let cases: [(&[u8], &str, &str); 6] = [
            (b"f", "Zg", "Zg=="),
            (b"fo", "Zm8", "Zm8="),
            (b"foo", "Zm9v", "Zm9v"),
            (b"foob", "Zm9vYg", "Zm9vYg=="),
            (b"fooba", "Zm9vYmE", "Zm9vYmE="),
            (b"foobar", "Zm9vYmFy", "Zm9vYmFy"),
        ];
        for (input, unpadded, padded) in cases {
            assert_eq!(encode(input, &STANDARD, false), unpadded);
            assert_eq!(encode(input, &STANDARD, true), padded);
            assert_eq!(decode(unpadded, &STANDARD).unwrap(), input);
            assert_eq!(decode(padded, &STANDARD).unwrap(), input);
        }
    }

    #[test]
    fn test_url_safe_alphabet() {
        let bytes = [0xFB, 0xFF, 0xBF];
        assert_eq!(encode(&bytes, &STANDARD, false), "+/+/");
        assert_eq!(encode(&bytes, &URL_SAFE, false), "-_-_");
        assert_eq!(decode("-_-_", &URL_SAFE).unwrap(), bytes);
        assert!(decode("-_-_", &STANDARD).is_err());
    }

    #[test]
    fn test_dangling_character() {
        assert_eq!(
            decode("Zm9vY", &STANDARD),
            Err(MultibaseError::InvalidLength { len: 5 })
        );
    }
}
