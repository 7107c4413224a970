//! Integers in the range 1 to 2^20 (X.891 C.25-C.28).
//!
//! Table indices travel as `index + 1`. The tier is picked by how many bits of
//! the current octet a structural tag already used: the writer must be
//! positioned on the named bit before calling the matching function.
//!
//! | Start   | small      | medium        | large            | large-large        |
//! |---------|------------|---------------|------------------|--------------------|
//! | 2nd bit | 1..=64     | 65..=8256     | 8257..=2^20      | -                  |
//! | 3rd bit | 1..=32     | 33..=2080     | 2081..=526368    | 526369..=2^20      |
//! | 4th bit | 1..=16     | 17..=1040     | 1041..=263184    | 263185..=2^20      |

use crate::bitstream::{BitReader, BitWriter};
use crate::constants::{
    INTEGER_2ND_BIT_LARGE_FLAG, INTEGER_2ND_BIT_MEDIUM_FLAG, INTEGER_2ND_BIT_MEDIUM_LIMIT,
    INTEGER_2ND_BIT_SMALL_LIMIT, INTEGER_3RD_BIT_LARGE_FLAG, INTEGER_3RD_BIT_LARGE_LARGE_FLAG,
    INTEGER_3RD_BIT_LARGE_LIMIT, INTEGER_3RD_BIT_MEDIUM_FLAG, INTEGER_3RD_BIT_MEDIUM_LIMIT,
    INTEGER_3RD_BIT_SMALL_LIMIT, INTEGER_4TH_BIT_LARGE_FLAG, INTEGER_4TH_BIT_LARGE_LARGE_FLAG,
    INTEGER_4TH_BIT_LARGE_LIMIT, INTEGER_4TH_BIT_MEDIUM_FLAG, INTEGER_4TH_BIT_MEDIUM_LIMIT,
    INTEGER_4TH_BIT_SMALL_LIMIT, INTEGER_MAXIMUM,
};
use crate::{Error, Result};

/// Prüft den Wertebereich 1..=2^20.
#[inline]
fn check_range(value: u64) -> Result<u32> {
    if value == 0 || value > u64::from(INTEGER_MAXIMUM) {
        return Err(Error::IntegerOutOfRange(value));
    }
    Ok(value as u32)
}

/// Converts a zero-based table index to the one-based wire integer.
#[inline]
pub fn index_to_value(index: usize) -> Result<u64> {
    let value = index as u64 + 1;
    check_range(value)?;
    Ok(value)
}

/// Encodes an integer starting on the second bit of an octet (C.25).
pub fn encode_on_second_bit(writer: &mut BitWriter, value: u64) -> Result<()> {
    debug_assert_eq!(writer.bits_in_octet(), 1, "C.25 must start on the second bit");
    let v = check_range(value)?;
    if v <= INTEGER_2ND_BIT_SMALL_LIMIT {
        writer.write_bits(u64::from(v - 1), 7);
    } else if v <= INTEGER_2ND_BIT_MEDIUM_LIMIT {
        let x = v - (INTEGER_2ND_BIT_SMALL_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_2ND_BIT_MEDIUM_FLAG) | u64::from(x >> 8), 7);
        writer.write_bits(u64::from(x & 0xFF), 8);
    } else {
        let x = v - (INTEGER_2ND_BIT_MEDIUM_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_2ND_BIT_LARGE_FLAG) | u64::from(x >> 16), 7);
        writer.write_bits(u64::from(x & 0xFFFF), 16);
    }
    Ok(())
}

/// Decodes an integer starting on the second bit of an octet (C.25).
pub fn decode_on_second_bit(reader: &mut BitReader) -> Result<u32> {
    let tail = reader.read_bits(7)? as u32;
    decode_second_bit_tail(reader, tail)
}

fn decode_second_bit_tail(reader: &mut BitReader, tail: u32) -> Result<u32> {
    if tail & 0x40 == 0 {
        Ok(tail + 1)
    } else if tail & 0x60 == u32::from(INTEGER_2ND_BIT_MEDIUM_FLAG) {
        let low = reader.read_bits(8)? as u32;
        Ok((((tail & 0x1F) << 8) | low) + INTEGER_2ND_BIT_SMALL_LIMIT + 1)
    } else if tail & 0x70 == u32::from(INTEGER_2ND_BIT_LARGE_FLAG) {
        let low = reader.read_bits(16)? as u32;
        Ok((((tail & 0x0F) << 16) | low) + INTEGER_2ND_BIT_MEDIUM_LIMIT + 1)
    } else {
        Err(Error::InvalidTierPrefix(tail as u8))
    }
}

/// Writes the empty-string form of C.26: seven `1` bits after the caller's bit.
pub fn encode_empty_on_second_bit(writer: &mut BitWriter) {
    debug_assert_eq!(writer.bits_in_octet(), 1, "C.26 must start on the second bit");
    writer.write_bits(0x7F, 7);
}

/// Decodes C.26: `None` for the empty string, otherwise the C.25 integer.
pub fn decode_index_or_empty_on_second_bit(reader: &mut BitReader) -> Result<Option<u32>> {
    let tail = reader.read_bits(7)? as u32;
    if tail == 0x7F {
        return Ok(None);
    }
    decode_second_bit_tail(reader, tail).map(Some)
}

/// Encodes an integer starting on the third bit of an octet (C.27).
pub fn encode_on_third_bit(writer: &mut BitWriter, value: u64) -> Result<()> {
    debug_assert_eq!(writer.bits_in_octet(), 2, "C.27 must start on the third bit");
    let v = check_range(value)?;
    if v <= INTEGER_3RD_BIT_SMALL_LIMIT {
        writer.write_bits(u64::from(v - 1), 6);
    } else if v <= INTEGER_3RD_BIT_MEDIUM_LIMIT {
        let x = v - (INTEGER_3RD_BIT_SMALL_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_3RD_BIT_MEDIUM_FLAG) | u64::from(x >> 8), 6);
        writer.write_bits(u64::from(x & 0xFF), 8);
    } else if v <= INTEGER_3RD_BIT_LARGE_LIMIT {
        let x = v - (INTEGER_3RD_BIT_MEDIUM_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_3RD_BIT_LARGE_FLAG) | u64::from(x >> 16), 6);
        writer.write_bits(u64::from(x & 0xFFFF), 16);
    } else {
        // '110000', vier Padding-Bits, 20 Bits Wert
        let x = v - (INTEGER_3RD_BIT_LARGE_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_3RD_BIT_LARGE_LARGE_FLAG), 6);
        writer.write_bits(u64::from(x), 24);
    }
    Ok(())
}

/// Decodes an integer starting on the third bit of an octet (C.27).
pub fn decode_on_third_bit(reader: &mut BitReader) -> Result<u32> {
    let tail = reader.read_bits(6)? as u32;
    if tail & 0x20 == 0 {
        Ok(tail + 1)
    } else if tail & 0x38 == u32::from(INTEGER_3RD_BIT_MEDIUM_FLAG) {
        let low = reader.read_bits(8)? as u32;
        Ok((((tail & 0x07) << 8) | low) + INTEGER_3RD_BIT_SMALL_LIMIT + 1)
    } else if tail & 0x38 == u32::from(INTEGER_3RD_BIT_LARGE_FLAG) {
        let low = reader.read_bits(16)? as u32;
        Ok((((tail & 0x07) << 16) | low) + INTEGER_3RD_BIT_MEDIUM_LIMIT + 1)
    } else if tail == u32::from(INTEGER_3RD_BIT_LARGE_LARGE_FLAG) {
        let rest = reader.read_bits(24)? as u32;
        if rest > 0xF_FFFF {
            return Err(Error::InvalidTierPrefix(tail as u8));
        }
        Ok(rest + INTEGER_3RD_BIT_LARGE_LIMIT + 1)
    } else {
        Err(Error::InvalidTierPrefix(tail as u8))
    }
}

/// Encodes an integer starting on the fourth bit of an octet (C.28).
pub fn encode_on_fourth_bit(writer: &mut BitWriter, value: u64) -> Result<()> {
    debug_assert_eq!(writer.bits_in_octet(), 3, "C.28 must start on the fourth bit");
    let v = check_range(value)?;
    if v <= INTEGER_4TH_BIT_SMALL_LIMIT {
        writer.write_bits(u64::from(v - 1), 5);
    } else if v <= INTEGER_4TH_BIT_MEDIUM_LIMIT {
        let x = v - (INTEGER_4TH_BIT_SMALL_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_4TH_BIT_MEDIUM_FLAG) | u64::from(x >> 8), 5);
        writer.write_bits(u64::from(x & 0xFF), 8);
    } else if v <= INTEGER_4TH_BIT_LARGE_LIMIT {
        let x = v - (INTEGER_4TH_BIT_MEDIUM_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_4TH_BIT_LARGE_FLAG) | u64::from(x >> 16), 5);
        writer.write_bits(u64::from(x & 0xFFFF), 16);
    } else {
        let x = v - (INTEGER_4TH_BIT_LARGE_LIMIT + 1);
        writer.write_bits(u64::from(INTEGER_4TH_BIT_LARGE_LARGE_FLAG), 5);
        writer.write_bits(u64::from(x), 24);
    }
    Ok(())
}

/// Decodes an integer starting on the fourth bit of an octet (C.28).
pub fn decode_on_fourth_bit(reader: &mut BitReader) -> Result<u32> {
    let tail = reader.read_bits(5)? as u32;
    if tail & 0x10 == 0 {
        Ok(tail + 1)
    } else if tail & 0x1C == u32::from(INTEGER_4TH_BIT_MEDIUM_FLAG) {
        let low = reader.read_bits(8)? as u32;
        Ok((((tail & 0x03) << 8) | low) + INTEGER_4TH_BIT_SMALL_LIMIT + 1)
    } else if tail & 0x1C == u32::from(INTEGER_4TH_BIT_LARGE_FLAG) {
        let low = reader.read_bits(16)? as u32;
        Ok((((tail & 0x03) << 16) | low) + INTEGER_4TH_BIT_MEDIUM_LIMIT + 1)
    } else if tail == u32::from(INTEGER_4TH_BIT_LARGE_LARGE_FLAG) {
        let rest = reader.read_bits(24)? as u32;
        if rest > 0xF_FFFF {
            return Err(Error::InvalidTierPrefix(tail as u8));
        }
        Ok(rest + INTEGER_4TH_BIT_LARGE_LIMIT + 1)
    } else {
        Err(Error::InvalidTierPrefix(tail as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Schreibt `lead` Bits Tag (alle 0) und danach den Wert; liefert die Oktette.
    fn encode_after(lead: u8, value: u64) -> Result<Vec<u8>> {
        let mut w = BitWriter::new();
        w.write_bits(0, lead);
        match lead {
            1 => encode_on_second_bit(&mut w, value)?,
            2 => encode_on_third_bit(&mut w, value)?,
            3 => encode_on_fourth_bit(&mut w, value)?,
            _ => unreachable!(),
        }
        assert!(w.is_aligned(), "tier must end on an octet boundary");
        Ok(w.into_vec())
    }

    fn decode_after(lead: u8, data: &[u8]) -> u32 {
        let mut r = BitReader::new(data);
        r.read_bits(lead).unwrap();
        let value = match lead {
            1 => decode_on_second_bit(&mut r).unwrap(),
            2 => decode_on_third_bit(&mut r).unwrap(),
            3 => decode_on_fourth_bit(&mut r).unwrap(),
            _ => unreachable!(),
        };
        assert!(r.is_at_end());
        value
    }

    #[test]
    fn second_bit_tier_boundaries() {
        for (value, len) in [(63, 1), (64, 1), (65, 2), (8255, 2), (8256, 2), (8257, 3)] {
            let data = encode_after(1, value).unwrap();
            assert_eq!(data.len(), len, "value {value}");
            assert_eq!(u64::from(decode_after(1, &data)), value);
        }
    }

    #[test]
    fn second_bit_exact_bytes() {
        assert_eq!(encode_after(1, 1).unwrap(), vec![0x00]);
        assert_eq!(encode_after(1, 64).unwrap(), vec![0x3F]);
        assert_eq!(encode_after(1, 65).unwrap(), vec![0x40, 0x00]);
        assert_eq!(encode_after(1, 8256).unwrap(), vec![0x5F, 0xFF]);
        assert_eq!(encode_after(1, 8257).unwrap(), vec![0x60, 0x00, 0x00]);
        assert_eq!(encode_after(1, 1 << 20).unwrap(), vec![0x6F, 0xDF, 0xBF]);
    }

    #[test]
    fn second_bit_maximum() {
        let data = encode_after(1, u64::from(INTEGER_MAXIMUM)).unwrap();
        assert_eq!(decode_after(1, &data), INTEGER_MAXIMUM);
    }

    #[test]
    fn out_of_range_rejected() {
        assert_eq!(encode_after(1, 1_048_577), Err(Error::IntegerOutOfRange(1_048_577)));
        assert_eq!(encode_after(2, 0), Err(Error::IntegerOutOfRange(0)));
        assert_eq!(encode_after(3, u64::MAX), Err(Error::IntegerOutOfRange(u64::MAX)));
    }

    #[test]
    fn index_to_value_is_one_based() {
        assert_eq!(index_to_value(0), Ok(1));
        assert_eq!(index_to_value((1 << 20) - 1), Ok(1 << 20));
        assert!(index_to_value(1 << 20).is_err());
    }

    #[test]
    fn third_bit_tier_boundaries() {
        let cases = [
            (32, 1),
            (33, 2),
            (2080, 2),
            (2081, 3),
            (526_368, 3),
            (526_369, 4),
            (1 << 20, 4),
        ];
        for (value, len) in cases {
            let data = encode_after(2, value).unwrap();
            assert_eq!(data.len(), len, "value {value}");
            assert_eq!(u64::from(decode_after(2, &data)), value);
        }
    }

    #[test]
    fn third_bit_large_large_layout() {
        // '00' Tag, '110000', vier Nullbits, 20 Bits (0)
        assert_eq!(encode_after(2, 526_369).unwrap(), vec![0x30, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn fourth_bit_tier_boundaries() {
        let cases = [
            (16, 1),
            (17, 2),
            (1040, 2),
            (1041, 3),
            (263_184, 3),
            (263_185, 4),
            (1 << 20, 4),
        ];
        for (value, len) in cases {
            let data = encode_after(3, value).unwrap();
            assert_eq!(data.len(), len, "value {value}");
            assert_eq!(u64::from(decode_after(3, &data)), value);
        }
    }

    #[test]
    fn fourth_bit_medium_flag() {
        // 17 → '100' + 10 Bits 0
        assert_eq!(encode_after(3, 17).unwrap(), vec![0x10, 0x00]);
    }

    #[test]
    fn empty_string_form() {
        let mut w = BitWriter::new();
        w.write_bit(true);
        encode_empty_on_second_bit(&mut w);
        let data = w.into_vec();
        assert_eq!(data, vec![0xFF]);

        let mut r = BitReader::new(&data);
        r.read_bit().unwrap();
        assert_eq!(decode_index_or_empty_on_second_bit(&mut r).unwrap(), None);

        let data = encode_after(1, 70).unwrap();
        let mut r = BitReader::new(&data);
        r.read_bit().unwrap();
        assert_eq!(decode_index_or_empty_on_second_bit(&mut r).unwrap(), Some(70));
    }

    #[test]
    fn terminator_bits_select_no_tier() {
        // '1111' ist für Terminatoren reserviert
        let mut r = BitReader::new(&[0x78]);
        r.read_bit().unwrap();
        assert_eq!(decode_on_second_bit(&mut r), Err(Error::InvalidTierPrefix(0x78)));
    }
}
