//! String items of the byte stream (X.891 C.13-C.15, C.19, C.22).
//!
//! Three shapes exist:
//! - identifying strings (prefixes, namespace names, local names, PI targets,
//!   URIs): a table index or a literal that is always added (C.13);
//! - non-identifying strings (attribute values, comments, PI data): empty,
//!   an index, a literal with an optional add-to-table bit, or octets from a
//!   restricted alphabet or encoding algorithm (C.14, C.19);
//! - character chunks: like non-identifying strings but starting on the
//!   third bit of an octet and with C.24 lengths (C.15).
//!
//! Alle Strings werden als UTF-8 geschrieben; UTF-16 ist nicht vorgesehen.

use crate::bitstream::{BitReader, BitWriter};
use crate::constants::{
    CHARACTER_CHUNK_ADD_TO_TABLE_FLAG, CHARACTER_CHUNK_UTF8_FLAG, NISTRING_ADD_TO_TABLE_FLAG, NISTRING_EMPTY,
    NISTRING_UTF8_FLAG,
};
use crate::string_table::{CompactIdResult, StringTable};
use crate::{Error, Result, integer, length};

/// Where the octets of an encoded string come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctetSource {
    /// Restricted alphabet with this identifier.
    RestrictedAlphabet(u32),
    /// Encoding algorithm with this identifier.
    EncodingAlgorithm(u32),
}

impl OctetSource {
    fn id(self) -> u32 {
        match self {
            Self::RestrictedAlphabet(id) | Self::EncodingAlgorithm(id) => id,
        }
    }
}

/// Prüft ob ein String ausschließlich aus XML-Whitespace besteht (SP/TAB/CR/LF).
pub(crate) fn is_xml_whitespace(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

/// Octet-string literal on the second bit: C.22 length, then the octets.
fn encode_octets_on_second_bit(writer: &mut BitWriter, octets: &[u8]) -> Result<()> {
    length::encode_on_second_bit(writer, octets.len())?;
    writer.write_octets(octets);
    Ok(())
}

/// Writes an identifying string, octet-aligned (C.13).
///
/// Bekannte Strings werden als Index ('1' + C.25) geschrieben, neue als
/// Literal ('0' + C.22) und in die Tabelle aufgenommen.
pub fn encode_identifying_string(writer: &mut BitWriter, table: &mut StringTable, value: &str) -> Result<()> {
    debug_assert!(writer.is_aligned(), "C.13 starts on an octet boundary");
    if value.is_empty() {
        return Err(Error::InvalidValue(format!("empty {} string", table.kind().name())));
    }
    match table.obtain_index(value)? {
        CompactIdResult::Hit(index) => {
            log::trace!("{} hit {index}: {value}", table.kind().name());
            writer.write_bit(true);
            integer::encode_on_second_bit(writer, integer::index_to_value(index)?)
        }
        CompactIdResult::Miss(index) => {
            log::trace!("{} miss, added as {index}: {value}", table.kind().name());
            writer.write_bit(false);
            encode_octets_on_second_bit(writer, value.as_bytes())
        }
    }
}

/// Writes an identifying string literal without consulting a table.
///
/// Used in the initial vocabulary, where entries are listed rather than
/// referenced.
pub fn encode_identifying_literal(writer: &mut BitWriter, value: &str) -> Result<()> {
    debug_assert!(writer.is_aligned(), "C.22 literal starts on an octet boundary");
    writer.write_bit(false);
    encode_octets_on_second_bit(writer, value.as_bytes())
}

/// Writes a non-identifying string literal (C.14 literal form, C.19).
///
/// With `add` unset this is also the layout of a plain C.19 character
/// string: two padding bits, the UTF-8 discriminant, then a C.23 length.
pub fn encode_non_identifying_literal(writer: &mut BitWriter, value: &str, add: bool) -> Result<()> {
    debug_assert!(writer.is_aligned(), "C.14 starts on an octet boundary");
    if value.is_empty() {
        writer.write_octet(NISTRING_EMPTY);
        return Ok(());
    }
    let flags = (if add { NISTRING_ADD_TO_TABLE_FLAG } else { 0 }) | NISTRING_UTF8_FLAG;
    writer.write_bits(u64::from(flags >> 4), 4);
    length::encode_on_fifth_bit(writer, value.len())?;
    writer.write_octets(value.as_bytes());
    Ok(())
}

/// Writes a non-identifying string (C.14).
///
/// With `indexing` set, a known value becomes an index and a new one a
/// literal added to `table`; otherwise the value is always a plain literal.
pub fn encode_non_identifying_string(
    writer: &mut BitWriter,
    table: &mut StringTable,
    value: &str,
    indexing: bool,
) -> Result<()> {
    if value.is_empty() || !indexing {
        return encode_non_identifying_literal(writer, value, false);
    }
    match table.obtain_index(value)? {
        CompactIdResult::Hit(index) => {
            log::trace!("{} hit {index}", table.kind().name());
            writer.write_bit(true);
            integer::encode_on_second_bit(writer, integer::index_to_value(index)?)
        }
        CompactIdResult::Miss(index) => {
            log::trace!("{} miss, added as {index}", table.kind().name());
            encode_non_identifying_literal(writer, value, true)
        }
    }
}

/// Writes a non-identifying string whose octets come from a restricted
/// alphabet or an encoding algorithm (C.14, C.19.3).
pub fn encode_encoded_non_identifying_string(writer: &mut BitWriter, source: OctetSource, octets: &[u8]) -> Result<()> {
    debug_assert!(writer.is_aligned(), "C.14 starts on an octet boundary");
    // '0' + add-Bit '0' + Diskriminante, dann 8 Bit Identifier
    let discriminant: u64 = match source {
        OctetSource::RestrictedAlphabet(_) => 0b10,
        OctetSource::EncodingAlgorithm(_) => 0b11,
    };
    writer.write_bits(discriminant, 4);
    writer.write_bits(u64::from(source.id()), 8);
    length::encode_on_fifth_bit(writer, octets.len())?;
    writer.write_octets(octets);
    Ok(())
}

/// Writes the body of a character chunk, starting on the third bit (C.15).
pub fn encode_character_chunk(
    writer: &mut BitWriter,
    table: &mut StringTable,
    value: &str,
    indexing: bool,
) -> Result<()> {
    debug_assert_eq!(writer.bits_in_octet(), 2, "C.15 starts on the third bit");
    if indexing {
        match table.obtain_index(value)? {
            CompactIdResult::Hit(index) => {
                log::trace!("content chunk hit {index}");
                writer.write_bit(true);
                return integer::encode_on_fourth_bit(writer, integer::index_to_value(index)?);
            }
            CompactIdResult::Miss(index) => {
                log::trace!("content chunk miss, added as {index}");
            }
        }
    }
    let add = if indexing { CHARACTER_CHUNK_ADD_TO_TABLE_FLAG } else { 0 };
    // Bits 3-6: Index-Bit '0', add-Bit, UTF-8-Diskriminante
    writer.write_bits(u64::from((add | CHARACTER_CHUNK_UTF8_FLAG) >> 2), 4);
    length::encode_on_seventh_bit(writer, value.len())?;
    writer.write_octets(value.as_bytes());
    Ok(())
}

/// Writes an encoded character chunk body, starting on the third bit (C.15).
pub fn encode_encoded_character_chunk(writer: &mut BitWriter, source: OctetSource, octets: &[u8]) -> Result<()> {
    debug_assert_eq!(writer.bits_in_octet(), 2, "C.15 starts on the third bit");
    let discriminant: u64 = match source {
        OctetSource::RestrictedAlphabet(_) => 0b10,
        OctetSource::EncodingAlgorithm(_) => 0b11,
    };
    // Index-Bit '0', add-Bit '0', Diskriminante
    writer.write_bits(discriminant, 4);
    writer.write_bits(u64::from(source.id()), 8);
    length::encode_on_seventh_bit(writer, octets.len())?;
    writer.write_octets(octets);
    Ok(())
}

/// Reads `len` octets as UTF-8.
pub fn read_utf8(reader: &mut BitReader, len: usize) -> Result<String> {
    let octets = reader.read_octets(len)?;
    String::from_utf8(octets.to_vec()).map_err(|_| Error::InvalidValue("string is not UTF-8".into()))
}
