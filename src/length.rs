//! Octet-string and sequence lengths (X.891 C.21-C.24).
//!
//! Längen sind immer >= 1: leere Inhalte werden vorher abgefangen und nie
//! durch diese Codecs geschickt.
//!
//! | Start   | small    | medium      | large          |
//! |---------|----------|-------------|----------------|
//! | 2nd bit | 1..=64   | 65..=320    | 321..=2^32     |
//! | 5th bit | 1..=8    | 9..=264     | 265..=2^32     |
//! | 7th bit | 1..=2    | 3..=258     | 259..=2^32     |
//! | C.21    | 1..=128  | 129..=2^20  | -              |

use crate::bitstream::{BitReader, BitWriter};
use crate::constants::{
    INTEGER_MAXIMUM, OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG,
    OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG, OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT,
    OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT, OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG,
    OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG, OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT,
    OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT, OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG,
    OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG, OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT,
    OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT, OCTET_STRING_LENGTH_MAXIMUM,
    SEQUENCE_LENGTH_MEDIUM_FLAG, SEQUENCE_LENGTH_SMALL_LIMIT,
};
use crate::{Error, Result};

/// Tier-Parameter einer Längenfamilie.
struct LengthTiers {
    /// Bits, die im ersten Oktett für Flag + kleinen Wert übrig sind.
    tail_bits: u8,
    small_limit: u64,
    medium_limit: u64,
    medium_flag: u8,
    large_flag: u8,
}

const SECOND_BIT: LengthTiers = LengthTiers {
    tail_bits: 7,
    small_limit: OCTET_STRING_LENGTH_2ND_BIT_SMALL_LIMIT,
    medium_limit: OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_LIMIT,
    medium_flag: OCTET_STRING_LENGTH_2ND_BIT_MEDIUM_FLAG,
    large_flag: OCTET_STRING_LENGTH_2ND_BIT_LARGE_FLAG,
};

const FIFTH_BIT: LengthTiers = LengthTiers {
    tail_bits: 4,
    small_limit: OCTET_STRING_LENGTH_5TH_BIT_SMALL_LIMIT,
    medium_limit: OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_LIMIT,
    medium_flag: OCTET_STRING_LENGTH_5TH_BIT_MEDIUM_FLAG,
    large_flag: OCTET_STRING_LENGTH_5TH_BIT_LARGE_FLAG,
};

const SEVENTH_BIT: LengthTiers = LengthTiers {
    tail_bits: 2,
    small_limit: OCTET_STRING_LENGTH_7TH_BIT_SMALL_LIMIT,
    medium_limit: OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_LIMIT,
    medium_flag: OCTET_STRING_LENGTH_7TH_BIT_MEDIUM_FLAG,
    large_flag: OCTET_STRING_LENGTH_7TH_BIT_LARGE_FLAG,
};

impl LengthTiers {
    fn encode(&self, writer: &mut BitWriter, length: usize) -> Result<()> {
        debug_assert_eq!(writer.bits_in_octet(), 8 - self.tail_bits, "length tier misaligned");
        let len = length as u64;
        if len == 0 || len > OCTET_STRING_LENGTH_MAXIMUM {
            return Err(Error::IntegerOutOfRange(len));
        }
        if len <= self.small_limit {
            writer.write_bits(len - 1, self.tail_bits);
        } else if len <= self.medium_limit {
            writer.write_bits(u64::from(self.medium_flag), self.tail_bits);
            writer.write_bits(len - self.small_limit - 1, 8);
        } else {
            writer.write_bits(u64::from(self.large_flag), self.tail_bits);
            writer.write_bits(len - self.medium_limit - 1, 32);
        }
        Ok(())
    }

    fn decode(&self, reader: &mut BitReader) -> Result<usize> {
        let tail = reader.read_bits(self.tail_bits)?;
        let small_mask = 1u64 << (self.tail_bits - 1);
        let len = if tail & small_mask == 0 {
            tail + 1
        } else if tail == u64::from(self.medium_flag) {
            reader.read_bits(8)? + self.small_limit + 1
        } else if tail == u64::from(self.large_flag) {
            reader.read_bits(32)? + self.medium_limit + 1
        } else {
            return Err(Error::InvalidTierPrefix(tail as u8));
        };
        usize::try_from(len).map_err(|_| Error::IntegerOutOfRange(len))
    }
}

/// Encodes a non-empty octet-string length starting on the second bit (C.22).
pub fn encode_on_second_bit(writer: &mut BitWriter, length: usize) -> Result<()> {
    SECOND_BIT.encode(writer, length)
}

/// Decodes a length starting on the second bit (C.22).
pub fn decode_on_second_bit(reader: &mut BitReader) -> Result<usize> {
    SECOND_BIT.decode(reader)
}

/// Encodes a non-empty octet-string length starting on the fifth bit (C.23).
pub fn encode_on_fifth_bit(writer: &mut BitWriter, length: usize) -> Result<()> {
    FIFTH_BIT.encode(writer, length)
}

/// Decodes a length starting on the fifth bit (C.23).
pub fn decode_on_fifth_bit(reader: &mut BitReader) -> Result<usize> {
    FIFTH_BIT.decode(reader)
}

/// Encodes a non-empty octet-string length starting on the seventh bit (C.24).
pub fn encode_on_seventh_bit(writer: &mut BitWriter, length: usize) -> Result<()> {
    SEVENTH_BIT.encode(writer, length)
}

/// Decodes a length starting on the seventh bit (C.24).
pub fn decode_on_seventh_bit(reader: &mut BitReader) -> Result<usize> {
    SEVENTH_BIT.decode(reader)
}

/// Encodes the length of a sequence, octet-aligned (C.21).
pub fn encode_sequence_length(writer: &mut BitWriter, length: usize) -> Result<()> {
    debug_assert!(writer.is_aligned(), "C.21 starts on an octet boundary");
    let len = length as u64;
    if len == 0 || len > u64::from(INTEGER_MAXIMUM) {
        return Err(Error::IntegerOutOfRange(len));
    }
    let small = u64::from(SEQUENCE_LENGTH_SMALL_LIMIT);
    if len <= small {
        writer.write_octet((len - 1) as u8);
    } else {
        let x = len - small - 1;
        writer.write_bits(u64::from(SEQUENCE_LENGTH_MEDIUM_FLAG) | (x >> 16), 8);
        writer.write_bits(x & 0xFFFF, 16);
    }
    Ok(())
}

/// Decodes the length of a sequence (C.21).
pub fn decode_sequence_length(reader: &mut BitReader) -> Result<usize> {
    let first = reader.read_octet()?;
    if first & 0x80 == 0 {
        Ok(usize::from(first) + 1)
    } else if first & 0xF0 == SEQUENCE_LENGTH_MEDIUM_FLAG {
        let low = reader.read_bits(16)? as usize;
        Ok(((usize::from(first & 0x0F) << 16) | low) + SEQUENCE_LENGTH_SMALL_LIMIT as usize + 1)
    } else {
        Err(Error::InvalidTierPrefix(first))
    }
}
