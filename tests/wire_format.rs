//! Wire-Format-Tests: Tier-Grenzen der Ganzzahlen, Tabellenverhalten und
//! Algorithmus-Dispatch, geprüft an den geschriebenen Bytes.

use std::sync::Arc;

use fastinfoset::{
    AlgorithmData, AlgorithmRef, BuiltInAlgorithm, Encoder, EncoderOptions, EncodingAlgorithm, Error, TableKind,
    TypedValue,
};

include!("common/decoder.rs");

/// Encoder mit geöffnetem Dokument und Wurzelelement `r`.
fn with_root(has_attributes: bool) -> Encoder {
    let mut encoder = Encoder::default();
    encoder.open_document().unwrap();
    encoder.open_element("", "r", "r", &[], has_attributes).unwrap();
    encoder
}

fn empty(encoder: &mut Encoder, local: &str) {
    encoder.open_element("", local, local, &[], false).unwrap();
    encoder.close_element().unwrap();
}

/// Schließt Wurzel und Dokument; der Test-Leser muss die Bytes verstehen.
fn finish(mut encoder: Encoder) -> Vec<u8> {
    encoder.close_element().unwrap();
    encoder.close_document().unwrap();
    let bytes = encoder.finish().unwrap();
    decode_fi(&bytes);
    bytes
}

fn tail(bytes: &[u8], n: usize) -> &[u8] {
    &bytes[bytes.len() - n..]
}

// ============================================================================
// Tier-Grenzen
// ============================================================================

/// Attributnamen (zweites Bit): Index 63 klein, Index 64 mittel.
#[test]
fn second_bit_small_to_medium() {
    let mut enc = with_root(true);
    for i in 0..=64 {
        let name = format!("a{i}");
        enc.emit_attribute("", &name, &name, "").unwrap();
    }
    enc.open_element("", "c", "c", &[], true).unwrap();
    enc.emit_attribute("", "a63", "a63", "").unwrap();
    enc.emit_attribute("", "a64", "a64", "").unwrap();
    enc.close_element().unwrap();
    let bytes = finish(enc);
    assert_eq!(
        tail(&bytes, 10),
        &[0x7C, 0x00, b'c', 0x3F, 0xFF, 0x40, 0x00, 0xFF, 0xFF, 0xFF]
    );
}

/// Attributwerte (zweites Bit): Index 8255 mittel, Index 8256 groß.
#[test]
fn second_bit_medium_to_large() {
    fn value_element(enc: &mut Encoder, value: &str) {
        enc.open_element("", "v", "v", &[], true).unwrap();
        enc.emit_attribute("", "a", "a", value).unwrap();
        enc.close_element().unwrap();
    }
    let mut enc = with_root(false);
    for k in 0..8257 {
        value_element(&mut enc, &k.to_string());
    }
    value_element(&mut enc, "8255");
    value_element(&mut enc, "8256");
    let bytes = finish(enc);
    assert_eq!(
        tail(&bytes, 13),
        &[0xFF, 0x41, 0x00, 0xDF, 0xFF, 0xFF, 0x41, 0x00, 0xE0, 0x00, 0x00, 0xFF, 0xFF]
    );
}

/// Elementnamen (drittes Bit): Index 31 klein, Index 32 mittel.
#[test]
fn third_bit_small_to_medium() {
    let mut enc = with_root(false);
    for k in 1..=32 {
        empty(&mut enc, &format!("e{k}"));
    }
    empty(&mut enc, "e31");
    empty(&mut enc, "e32");
    let bytes = finish(enc);
    assert_eq!(tail(&bytes, 7), &[0xF0, 0x1F, 0xF0, 0x20, 0x00, 0xFF, 0xF0]);
}

/// Elementnamen (drittes Bit): Index 2079 mittel, Index 2080 groß.
#[test]
fn third_bit_medium_to_large() {
    let mut enc = with_root(false);
    for k in 1..=2080 {
        empty(&mut enc, &format!("n{k}"));
    }
    empty(&mut enc, "n2079");
    empty(&mut enc, "n2080");
    let bytes = finish(enc);
    assert_eq!(tail(&bytes, 9), &[0xF0, 0x27, 0xFF, 0xF0, 0x28, 0x00, 0x00, 0xFF, 0xF0]);
}

/// Text-Chunks (viertes Bit): Index 15 klein, Index 16 mittel.
#[test]
fn fourth_bit_small_to_medium() {
    let mut enc = with_root(false);
    for k in 0..17 {
        enc.emit_text(&format!("t{k}")).unwrap();
    }
    enc.emit_text("t15").unwrap();
    enc.emit_text("t16").unwrap();
    let bytes = finish(enc);
    assert_eq!(tail(&bytes, 4), &[0xAF, 0xB0, 0x00, 0xFF]);
}

// ============================================================================
// Vokabular
// ============================================================================

/// Einträge behalten ihren Index, Tabellen wachsen nur.
#[test]
fn tables_only_grow() {
    let mut enc = with_root(false);
    empty(&mut enc, "a");
    empty(&mut enc, "b");
    let before: Vec<String> =
        enc.vocabulary().table(TableKind::LocalName).entries().into_iter().map(str::to_string).collect();

    empty(&mut enc, "a");
    empty(&mut enc, "c");
    let after = enc.vocabulary().table(TableKind::LocalName).entries();
    assert_eq!(after.len(), before.len() + 1);
    assert!(before.iter().zip(&after).all(|(b, a)| b == a));
    assert_eq!(enc.vocabulary().lookup(TableKind::LocalName, "c"), Some(3));
    finish(enc);
}

/// Ohne retain_vocabulary beginnt jedes Dokument mit leeren Tabellen.
#[test]
fn second_document_starts_fresh() {
    let mut enc = Encoder::default();
    for _ in 0..2 {
        enc.open_document().unwrap();
        empty(&mut enc, "root");
        enc.close_document().unwrap();
        let bytes = enc.take_output().unwrap();
        assert_eq!(&bytes[5..], &[0x3C, 0x03, b'r', b'o', b'o', b't', 0xFF]);
        decode_fi(&bytes);
    }
}

// ============================================================================
// Encoding-Algorithmen
// ============================================================================

fn typed_text_error(reference: AlgorithmRef) -> Error {
    let mut enc = with_root(false);
    enc.emit_typed_text(&AlgorithmData::new(reference, TypedValue::Ints(vec![1]))).unwrap_err()
}

#[test]
fn algorithm_identifier_out_of_range() {
    assert_eq!(typed_text_error(AlgorithmRef::Id(1_048_577)), Error::IntegerOutOfRange(1_048_577));
    assert_eq!(typed_text_error(AlgorithmRef::Id(256)), Error::IntegerOutOfRange(256));
}

#[test]
fn reserved_and_unregistered_identifiers() {
    assert_eq!(typed_text_error(AlgorithmRef::Id(10)), Error::ReservedAlgorithmIdentifier(10));
    assert_eq!(typed_text_error(AlgorithmRef::Id(31)), Error::ReservedAlgorithmIdentifier(31));
    assert!(matches!(typed_text_error(AlgorithmRef::Id(32)), Error::AlgorithmNotRegistered(_)));
    assert!(matches!(typed_text_error(AlgorithmRef::Uri("urn:none".into())), Error::AlgorithmNotRegistered(_)));
}

/// UUID-Werte: Text → Oktette → Text.
#[test]
fn uuid_survives_the_stream() {
    let uuid = "123e4567-e89b-12d3-a456-426614174000";
    let mut enc = with_root(false);
    enc.emit_typed_text(&AlgorithmData::new(BuiltInAlgorithm::Uuid, TypedValue::Text(uuid.into())))
        .unwrap();
    let bytes = finish(enc);

    let lines = decode_fi(&bytes);
    let chunk = lines.iter().find_map(|l| l.strip_prefix("CH #8:")).expect("UUID-Chunk");
    assert_eq!(chunk, "123e4567e89b12d3a456426614174000");

    let octets: Vec<u8> = (0..16).map(|i| u8::from_str_radix(&chunk[2 * i..2 * i + 2], 16).unwrap()).collect();
    let value = BuiltInAlgorithm::Uuid.from_octets(&octets).unwrap();
    assert_eq!(BuiltInAlgorithm::Uuid.to_text(&value).unwrap(), uuid);
}

/// Kehrt die Oktette um; genug, um den Dispatch zu beobachten.
struct Reversed;

impl EncodingAlgorithm for Reversed {
    fn to_octets(&self, value: &TypedValue) -> fastinfoset::Result<Vec<u8>> {
        match value {
            TypedValue::Octets(octets) => Ok(octets.iter().rev().copied().collect()),
            other => Err(Error::InvalidValue(format!("reversed cannot encode {}", other.kind()))),
        }
    }

    fn from_octets(&self, octets: &[u8]) -> fastinfoset::Result<TypedValue> {
        Ok(TypedValue::Octets(octets.iter().rev().copied().collect()))
    }

    fn from_text(&self, text: &str) -> fastinfoset::Result<TypedValue> {
        Ok(TypedValue::Octets(text.as_bytes().to_vec()))
    }

    fn to_text(&self, value: &TypedValue) -> fastinfoset::Result<String> {
        match value {
            TypedValue::Octets(octets) => Ok(String::from_utf8_lossy(octets).into_owned()),
            other => Err(Error::InvalidValue(format!("reversed cannot render {}", other.kind()))),
        }
    }
}

/// Anwendungs-Algorithmen: URI im Header, Identifier 32 im Inhalt.
#[test]
fn application_algorithm_by_uri_and_id() {
    let mut enc = Encoder::default();
    assert_eq!(enc.register_algorithm("urn:reversed", Arc::new(Reversed)).unwrap(), 32);
    enc.open_document().unwrap();
    enc.open_element("", "r", "r", &[], true).unwrap();
    let by_uri = AlgorithmData::new(AlgorithmRef::Uri("urn:reversed".into()), TypedValue::Octets(vec![1, 2, 3]));
    enc.emit_attribute("", "k", "k", &by_uri).unwrap();
    enc.emit_typed_text(&AlgorithmData::new(AlgorithmRef::Id(32), TypedValue::Text("ab".into()))).unwrap();
    enc.close_element().unwrap();
    enc.close_document().unwrap();
    let bytes = enc.finish().unwrap();

    // Initial Vocabulary: nur die Algorithmus-Liste
    assert_eq!(&bytes[4..8], &[0x10, 0x04, 0x00, 0x00]);
    assert_eq!(
        decode_fi(&bytes),
        vec!["SD", "SE {}r", "AT {}k=#32:030201", "CH #32:6261", "EE", "ED"]
    );
}

/// Registrierung ist nur zwischen Dokumenten erlaubt.
#[test]
fn registration_inside_document_rejected() {
    let mut enc = with_root(false);
    let err = enc.register_algorithm("urn:late", Arc::new(Reversed)).unwrap_err();
    assert!(matches!(err, Error::OrderingViolation { .. }));
}

// ============================================================================
// Restricted Alphabets
// ============================================================================

#[test]
fn numeric_alphabet_chunk() {
    let mut enc = with_root(false);
    enc.emit_restricted_text(0, "12.5").unwrap();
    let bytes = finish(enc);
    assert!(decode_fi(&bytes).contains(&"CH 12.5".to_string()));
}

#[test]
fn undefined_alphabets_rejected() {
    let mut enc = with_root(false);
    assert!(matches!(enc.emit_restricted_text(2, "x"), Err(Error::InvalidValue(_))));
    let mut enc = with_root(false);
    assert!(matches!(enc.emit_restricted_text(16, "x"), Err(Error::InvalidValue(_))));
    let mut enc = with_root(false);
    assert_eq!(enc.emit_restricted_text(256, "x"), Err(Error::IntegerOutOfRange(256)));
}
