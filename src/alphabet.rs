//! Restricted alphabets (X.891 8.2.5, 9.2).
//!
//! A restricted alphabet of N characters packs each character into k bits,
//! with k the smallest width where 2^k > N. The all-ones code is never a
//! character, so the last octet is padded with 1-bits. The built-in numeric
//! and date-time alphabets have 15 characters and therefore 4 bits each.

use crate::bitstream::{BitReader, BitWriter};
use crate::constants::{DATE_TIME_ALPHABET, DATE_TIME_CHARACTERS, NUMERIC_ALPHABET, NUMERIC_CHARACTERS};
use crate::{Error, Result};

/// Erster Identifier für Alphabete aus dem Vokabular.
pub const FIRST_VOCABULARY_ALPHABET: u32 = 16;

/// Largest identifier an alphabet can have on the wire.
pub const LAST_ALPHABET: u32 = 255;

/// Returns the characters of a built-in alphabet.
pub fn builtin(id: u32) -> Option<&'static str> {
    match id {
        NUMERIC_ALPHABET => Some(NUMERIC_CHARACTERS),
        DATE_TIME_ALPHABET => Some(DATE_TIME_CHARACTERS),
        _ => None,
    }
}

/// Checks that `characters` can serve as an alphabet: at least two
/// characters, all distinct.
pub fn validate(characters: &str) -> Result<()> {
    let chars: Vec<char> = characters.chars().collect();
    if chars.len() < 2 {
        return Err(Error::InvalidValue(format!("restricted alphabet '{characters}' needs at least two characters")));
    }
    for (i, c) in chars.iter().enumerate() {
        if chars[..i].contains(c) {
            return Err(Error::InvalidValue(format!("restricted alphabet repeats '{c}'")));
        }
    }
    Ok(())
}

/// Bits per character for an alphabet of `size` characters.
pub fn bits_per_character(size: usize) -> u8 {
    let mut bits = 1u8;
    while (1usize << bits) <= size {
        bits += 1;
    }
    bits
}

/// Packs `text` using `alphabet`.
///
/// # Errors
///
/// `InvalidValue` when `text` contains a character outside the alphabet.
pub fn encode(alphabet: &str, text: &str) -> Result<Vec<u8>> {
    let chars: Vec<char> = alphabet.chars().collect();
    let bits = bits_per_character(chars.len());
    let mut writer = BitWriter::new();
    for c in text.chars() {
        let Some(code) = chars.iter().position(|&a| a == c) else {
            return Err(Error::InvalidValue(format!("character '{c}' is not in restricted alphabet '{alphabet}'")));
        };
        writer.write_bits(code as u64, bits);
    }
    // Auffüllen mit 1-Bits bis zur Oktettgrenze
    let fill = (8 - writer.bits_in_octet()) % 8;
    writer.write_bits(u64::MAX, fill);
    Ok(writer.into_vec())
}

/// Unpacks octets produced by [`encode`].
pub fn decode(alphabet: &str, data: &[u8]) -> Result<String> {
    let chars: Vec<char> = alphabet.chars().collect();
    let bits = bits_per_character(chars.len());
    let terminator = (1u64 << bits) - 1;
    let mut reader = BitReader::new(data);
    let mut out = String::new();
    while reader.remaining_bits() >= usize::from(bits) {
        let code = reader.read_bits(bits)?;
        if code == terminator {
            break;
        }
        match chars.get(code as usize) {
            Some(&c) => out.push(c),
            None => return Err(Error::InvalidValue(format!("code {code} outside restricted alphabet"))),
        }
    }
    Ok(out)
}
