//! Short, int, long, float and double algorithms (X.891 10.4-10.8).
//!
//! Values are written big-endian at fixed width, one after the other.

use std::fmt::Display;
use std::str::FromStr;

use super::{BuiltInAlgorithm, TypedValue, wrong_kind};
use crate::{Error, Result};

fn width(algorithm: BuiltInAlgorithm) -> usize {
    match algorithm {
        BuiltInAlgorithm::Short => 2,
        BuiltInAlgorithm::Int | BuiltInAlgorithm::Float => 4,
        BuiltInAlgorithm::Long | BuiltInAlgorithm::Double => 8,
        _ => unreachable!("{} is not numeric", algorithm.name()),
    }
}

pub(super) fn to_octets(algorithm: BuiltInAlgorithm, value: &TypedValue) -> Result<Vec<u8>> {
    let out = match (algorithm, value) {
        (BuiltInAlgorithm::Short, TypedValue::Shorts(v)) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        (BuiltInAlgorithm::Int, TypedValue::Ints(v)) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        (BuiltInAlgorithm::Long, TypedValue::Longs(v)) => v.iter().flat_map(|x| x.to_be_bytes()).collect(),
        (BuiltInAlgorithm::Float, TypedValue::Floats(v)) => v.iter().flat_map(|x| x.to_bits().to_be_bytes()).collect(),
        (BuiltInAlgorithm::Double, TypedValue::Doubles(v)) => {
            v.iter().flat_map(|x| x.to_bits().to_be_bytes()).collect()
        }
        (_, other) => return Err(wrong_kind(algorithm, other)),
    };
    Ok(out)
}

pub(super) fn from_octets(algorithm: BuiltInAlgorithm, data: &[u8]) -> Result<TypedValue> {
    let size = width(algorithm);
    if data.len() % size != 0 {
        return Err(Error::InvalidValue(format!(
            "{} octets are not a multiple of {size} for the {} algorithm",
            data.len(),
            algorithm.name()
        )));
    }
    let chunks = data.chunks_exact(size);
    // chunks_exact liefert genau `size` Bytes pro Stück
    let value = match algorithm {
        BuiltInAlgorithm::Short => {
            TypedValue::Shorts(chunks.map(|c| i16::from_be_bytes([c[0], c[1]])).collect())
        }
        BuiltInAlgorithm::Int => TypedValue::Ints(chunks.map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]])).collect()),
        BuiltInAlgorithm::Float => {
            TypedValue::Floats(chunks.map(|c| f32::from_bits(u32::from_be_bytes([c[0], c[1], c[2], c[3]]))).collect())
        }
        BuiltInAlgorithm::Long => TypedValue::Longs(chunks.map(|c| i64::from_be_bytes(eight(c))).collect()),
        BuiltInAlgorithm::Double => {
            TypedValue::Doubles(chunks.map(|c| f64::from_bits(u64::from_be_bytes(eight(c)))).collect())
        }
        _ => unreachable!("{} is not numeric", algorithm.name()),
    };
    Ok(value)
}

fn eight(c: &[u8]) -> [u8; 8] {
    [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]
}

fn parse_list<T: FromStr>(algorithm: BuiltInAlgorithm, text: &str) -> Result<Vec<T>> {
    text.split_whitespace()
        .map(|word| {
            word.parse::<T>()
                .map_err(|_| Error::InvalidValue(format!("invalid {} value: {word}", algorithm.name())))
        })
        .collect()
}

/// Akzeptiert auch die XML-Schema-Lexik INF/-INF.
fn parse_float_list<T: FromStr>(algorithm: BuiltInAlgorithm, text: &str) -> Result<Vec<T>> {
    text.split_whitespace()
        .map(|word| {
            let normalized = match word {
                "INF" | "Infinity" => "inf",
                "-INF" | "-Infinity" => "-inf",
                other => other,
            };
            normalized
                .parse::<T>()
                .map_err(|_| Error::InvalidValue(format!("invalid {} value: {word}", algorithm.name())))
        })
        .collect()
}

pub(super) fn from_text(algorithm: BuiltInAlgorithm, text: &str) -> Result<TypedValue> {
    Ok(match algorithm {
        BuiltInAlgorithm::Short => TypedValue::Shorts(parse_list(algorithm, text)?),
        BuiltInAlgorithm::Int => TypedValue::Ints(parse_list(algorithm, text)?),
        BuiltInAlgorithm::Long => TypedValue::Longs(parse_list(algorithm, text)?),
        BuiltInAlgorithm::Float => TypedValue::Floats(parse_float_list(algorithm, text)?),
        BuiltInAlgorithm::Double => TypedValue::Doubles(parse_float_list(algorithm, text)?),
        _ => unreachable!("{} is not numeric", algorithm.name()),
    })
}

fn join<T: Display>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

fn join_float<T: Display + Copy + Into<f64>>(values: &[T]) -> String {
    values
        .iter()
        .map(|&v| {
            let f: f64 = v.into();
            if f.is_infinite() {
                if f > 0.0 { "INF".to_owned() } else { "-INF".to_owned() }
            } else if f.is_nan() {
                "NaN".to_owned()
            } else {
                v.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(super) fn to_text(algorithm: BuiltInAlgorithm, value: &TypedValue) -> Result<String> {
    match (algorithm, value) {
        (BuiltInAlgorithm::Short, TypedValue::Shorts(v)) => Ok(join(v)),
        (BuiltInAlgorithm::Int, TypedValue::Ints(v)) => Ok(join(v)),
        (BuiltInAlgorithm::Long, TypedValue::Longs(v)) => Ok(join(v)),
        (BuiltInAlgorithm::Float, TypedValue::Floats(v)) => Ok(join_float(v)),
        (BuiltInAlgorithm::Double, TypedValue::Doubles(v)) => Ok(join_float(v)),
        (_, other) => Err(wrong_kind(algorithm, other)),
    }
}
