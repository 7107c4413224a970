//! Boolean algorithm (X.891 10.7).
//!
//! Die ersten vier Bits geben an, wie viele Bits im letzten Oktett ungenutzt
//! sind; danach folgt ein Bit pro Wert.

use super::{BuiltInAlgorithm, TypedValue, wrong_kind};
use crate::bitstream::{BitReader, BitWriter};
use crate::{Error, Result};

pub(super) fn to_octets(value: &TypedValue) -> Result<Vec<u8>> {
    let TypedValue::Booleans(values) = value else {
        return Err(wrong_kind(BuiltInAlgorithm::Boolean, value));
    };
    let used = 4 + values.len();
    let unused = (8 - used % 8) % 8;
    let mut writer = BitWriter::new();
    writer.write_bits(unused as u64, 4);
    for &b in values {
        writer.write_bit(b);
    }
    Ok(writer.into_vec())
}

pub(super) fn from_octets(data: &[u8]) -> Result<TypedValue> {
    let Some(&first) = data.first() else {
        return Err(Error::InvalidValue("boolean algorithm needs at least one octet".into()));
    };
    let unused = usize::from(first >> 4);
    let total = data.len() * 8;
    if unused > 7 || total < 4 + unused {
        return Err(Error::InvalidValue(format!("boolean algorithm: {unused} unused bits in {} octets", data.len())));
    }
    let count = total - 4 - unused;
    let mut reader = BitReader::new(data);
    reader.read_bits(4)?;
    let values = (0..count).map(|_| reader.read_bit()).collect::<Result<Vec<_>>>()?;
    Ok(TypedValue::Booleans(values))
}

pub(super) fn from_text(text: &str) -> Result<TypedValue> {
    text.split_whitespace()
        .map(|word| match word {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(Error::InvalidValue(format!("invalid boolean value: {other}"))),
        })
        .collect::<Result<Vec<_>>>()
        .map(TypedValue::Booleans)
}

pub(super) fn to_text(value: &TypedValue) -> Result<String> {
    let TypedValue::Booleans(values) = value else {
        return Err(wrong_kind(BuiltInAlgorithm::Boolean, value));
    };
    Ok(values.iter().map(|b| if *b { "true" } else { "false" }).collect::<Vec<_>>().join(" "))
}
