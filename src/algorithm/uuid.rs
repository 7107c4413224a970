//! UUID algorithm (X.891 10.10).
//!
//! Each UUID is two 64-bit words, most significant first, written like the
//! long algorithm. Text form: whitespace separated `8-4-4-4-12` hex groups.

use super::{BuiltInAlgorithm, TypedValue, numeric, wrong_kind};
use crate::{Error, Result};

const GROUP_WIDTHS: [usize; 5] = [8, 4, 4, 4, 12];

pub(super) fn to_octets(value: &TypedValue) -> Result<Vec<u8>> {
    let TypedValue::Longs(words) = value else {
        return Err(wrong_kind(BuiltInAlgorithm::Uuid, value));
    };
    if !words.len().is_multiple_of(2) {
        return Err(Error::InvalidValue(format!("uuid algorithm needs word pairs, got {} words", words.len())));
    }
    numeric::to_octets(BuiltInAlgorithm::Long, value)
}

pub(super) fn from_octets(data: &[u8]) -> Result<TypedValue> {
    if !data.len().is_multiple_of(16) {
        return Err(Error::InvalidValue(format!("{} octets are not a whole number of UUIDs", data.len())));
    }
    numeric::from_octets(BuiltInAlgorithm::Long, data)
}

/// Parses one UUID into its (msb, lsb) words.
fn parse_uuid(text: &str) -> Result<(i64, i64)> {
    let invalid = || Error::InvalidValue(format!("invalid UUID string: {text}"));
    let groups: Vec<&str> = text.split('-').collect();
    if groups.len() != GROUP_WIDTHS.len() {
        return Err(invalid());
    }
    let mut value: u128 = 0;
    for (group, &width) in groups.iter().zip(GROUP_WIDTHS.iter()) {
        if group.len() != width || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let part = u64::from_str_radix(group, 16).map_err(|_| invalid())?;
        value = (value << (width * 4)) | u128::from(part);
    }
    Ok(((value >> 64) as u64 as i64, value as u64 as i64))
}

fn format_uuid(out: &mut String, msb: i64, lsb: i64) {
    let value = (u128::from(msb as u64) << 64) | u128::from(lsb as u64);
    let hex = format!("{value:032x}");
    let mut start = 0;
    for (i, width) in GROUP_WIDTHS.into_iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.push_str(&hex[start..start + width]);
        start += width;
    }
}

pub(super) fn from_text(text: &str) -> Result<TypedValue> {
    let mut words = Vec::new();
    for word in text.split_whitespace() {
        let (msb, lsb) = parse_uuid(word)?;
        words.push(msb);
        words.push(lsb);
    }
    Ok(TypedValue::Longs(words))
}

pub(super) fn to_text(value: &TypedValue) -> Result<String> {
    let TypedValue::Longs(words) = value else {
        return Err(wrong_kind(BuiltInAlgorithm::Uuid, value));
    };
    if !words.len().is_multiple_of(2) {
        return Err(Error::InvalidValue(format!("uuid algorithm needs word pairs, got {} words", words.len())));
    }
    let mut out = String::with_capacity(words.len() / 2 * 37);
    for (i, pair) in words.chunks_exact(2).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        format_uuid(&mut out, pair[0], pair[1]);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[test]
    fn words_of_sample() {
        let value = from_text(SAMPLE).unwrap();
        let TypedValue::Longs(words) = &value else { panic!("expected longs") };
        assert_eq!(words[0] as u64, 0x3fa8_5f64_5717_4562);
        assert_eq!(words[1] as u64, 0xb3fc_2c96_3f66_afa6);
    }

    #[test]
    fn sample_survives_octets() {
        let octets = to_octets(&from_text(SAMPLE).unwrap()).unwrap();
        assert_eq!(octets.len(), 16);
        assert_eq!(to_text(&from_octets(&octets).unwrap()).unwrap(), SAMPLE);
    }

    #[test]
    fn output_is_lowercase() {
        let value = from_text(&SAMPLE.to_uppercase()).unwrap();
        assert_eq!(to_text(&value).unwrap(), SAMPLE);
    }

    #[test]
    fn several_uuids_single_space() {
        let text = format!("{SAMPLE}\n  00000000-0000-0000-0000-000000000001");
        let value = from_text(&text).unwrap();
        assert_eq!(
            to_text(&value).unwrap(),
            format!("{SAMPLE} 00000000-0000-0000-0000-000000000001")
        );
    }

    #[test]
    fn malformed_rejected() {
        assert!(from_text("3fa85f64-5717-4562-b3fc").is_err());
        assert!(from_text("3fa85f6-45717-4562-b3fc-2c963f66afa6").is_err());
        assert!(from_text("+fa85f64-5717-4562-b3fc-2c963f66afa6").is_err());
        assert!(to_octets(&TypedValue::Longs(vec![1])).is_err());
        assert!(from_octets(&[0; 8]).is_err());
    }
}
