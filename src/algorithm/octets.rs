//! Hexadecimal, base64 and CDATA algorithms (X.891 10.2, 10.3, 10.11).

use base64::Engine;

use super::{BuiltInAlgorithm, TypedValue, wrong_kind};
use crate::{Error, Result};

pub(super) fn to_octets(algorithm: BuiltInAlgorithm, value: &TypedValue) -> Result<Vec<u8>> {
    match value {
        TypedValue::Octets(data) => Ok(data.clone()),
        other => Err(wrong_kind(algorithm, other)),
    }
}

pub(super) fn hex_from_text(text: &str) -> Result<TypedValue> {
    let trimmed: String = text.split_whitespace().collect();
    if !trimmed.is_ascii() || !trimmed.len().is_multiple_of(2) {
        return Err(Error::InvalidValue(format!("invalid hexadecimal: {text}")));
    }
    let bytes: Result<Vec<u8>> = (0..trimmed.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&trimmed[i..i + 2], 16)
                .map_err(|_| Error::InvalidValue(format!("invalid hex: {}", &trimmed[i..i + 2])))
        })
        .collect();
    Ok(TypedValue::Octets(bytes?))
}

pub(super) fn hex_to_text(value: &TypedValue) -> Result<String> {
    match value {
        TypedValue::Octets(data) => Ok(data.iter().map(|b| format!("{b:02X}")).collect()),
        other => Err(wrong_kind(BuiltInAlgorithm::Hexadecimal, other)),
    }
}

pub(super) fn base64_from_text(text: &str) -> Result<TypedValue> {
    let compact: String = text.split_whitespace().collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map(TypedValue::Octets)
        .map_err(|_| Error::InvalidValue(format!("invalid base64: {text}")))
}

pub(super) fn base64_to_text(value: &TypedValue) -> Result<String> {
    match value {
        TypedValue::Octets(data) => Ok(base64::engine::general_purpose::STANDARD.encode(data)),
        other => Err(wrong_kind(BuiltInAlgorithm::Base64, other)),
    }
}

pub(super) fn cdata_to_octets(value: &TypedValue) -> Result<Vec<u8>> {
    match value {
        TypedValue::Text(text) => Ok(text.as_bytes().to_vec()),
        other => Err(wrong_kind(BuiltInAlgorithm::Cdata, other)),
    }
}

pub(super) fn cdata_from_octets(data: &[u8]) -> Result<TypedValue> {
    String::from_utf8(data.to_vec())
        .map(TypedValue::Text)
        .map_err(|_| Error::InvalidValue("CDATA section is not UTF-8".into()))
}
