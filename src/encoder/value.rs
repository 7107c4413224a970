use crate::algorithm::BuiltInAlgorithm;
use crate::alphabet;
use crate::constants::NISTRING_EMPTY;
use crate::encoder::Encoder;
use crate::event::{AlgorithmData, AttributeValue};
use crate::string::{
    OctetSource, encode_character_chunk, encode_encoded_character_chunk, encode_encoded_non_identifying_string,
    encode_non_identifying_string,
};
use crate::string_table::TableKind;
use crate::{Error, Result};

/// Identifikation eines Character Chunks: '10'.
const CHARACTER_CHUNK_BITS: u64 = 0b10;

impl Encoder {
    /// Encodiert einen Attributwert als C.14, octet-aligned.
    ///
    /// Text unter der Größengrenze kommt in die Attributwert-Tabelle,
    /// algorithmische Werte werden als Identifier + Oktette geschrieben.
    pub(super) fn encode_attribute_value(&mut self, value: AttributeValue<'_>) -> Result<()> {
        match value {
            AttributeValue::Text(text) => {
                let indexing = self.options.indexes_attribute_value(text);
                encode_non_identifying_string(
                    &mut self.writer,
                    self.vocabulary.table_mut(TableKind::AttributeValue),
                    text,
                    indexing,
                )
            }
            AttributeValue::Encoded(data) => {
                let (id, octets) = self.algorithm_octets(data)?;
                if octets.is_empty() {
                    self.writer.write_octet(NISTRING_EMPTY);
                    return Ok(());
                }
                encode_encoded_non_identifying_string(&mut self.writer, OctetSource::EncodingAlgorithm(id), &octets)
            }
        }
    }

    /// Schreibt einen Text-Chunk (X.891 C.7).
    pub(super) fn encode_text_chunk(&mut self, text: &str) -> Result<()> {
        let indexing = self.options.indexes_character_chunk(text);
        self.writer.write_bits(CHARACTER_CHUNK_BITS, 2);
        encode_character_chunk(
            &mut self.writer,
            self.vocabulary.table_mut(TableKind::CharacterContentChunk),
            text,
            indexing,
        )
    }

    /// Schreibt einen Chunk aus Alphabet- oder Algorithmus-Oktetten.
    pub(super) fn encode_octet_chunk(&mut self, source: OctetSource, octets: &[u8]) -> Result<()> {
        self.writer.write_bits(CHARACTER_CHUNK_BITS, 2);
        encode_encoded_character_chunk(&mut self.writer, source, octets)
    }

    /// CDATA-Abschnitt als Chunk über den eingebauten CDATA-Algorithmus.
    pub(super) fn encode_cdata_chunk(&mut self, text: &str) -> Result<()> {
        let source = OctetSource::EncodingAlgorithm(BuiltInAlgorithm::Cdata.id());
        self.encode_octet_chunk(source, text.as_bytes())
    }

    /// Resolves the algorithm of `data` and converts its value.
    pub(super) fn algorithm_octets(&self, data: &AlgorithmData) -> Result<(u32, Vec<u8>)> {
        let (id, algorithm) = self.algorithms.lookup(&data.algorithm)?;
        let octets = algorithm.encode(&data.value)?;
        Ok((id, octets))
    }

    /// Packs `text` with the alphabet `id`: 0 and 1 are built in, 16 and up
    /// come from the vocabulary.
    pub(super) fn alphabet_octets(&self, id: u32, text: &str) -> Result<Vec<u8>> {
        if id > alphabet::LAST_ALPHABET {
            return Err(Error::IntegerOutOfRange(u64::from(id)));
        }
        let Some(characters) = self.vocabulary.restricted_alphabet(id) else {
            return Err(Error::InvalidValue(format!("restricted alphabet {id} is not defined")));
        };
        alphabet::encode(characters, text)
    }
}
