//! Document header (X.891 7.2, 12).
//!
//! Aufbau:
//! - [XML-Deklaration] (optional): `<?xml encoding='finf'?>`
//! - Identifikation und Version: `E0 00 00 01`
//! - Flag-Oktett: welche optionalen Komponenten folgen
//! - [Initial Vocabulary]: geerbte Tabellen oder die URI eines externen Vokabulars
//! - [Notations], [Unparsed Entities]: jeweils Liste + Terminator
//! - [Standalone], [Version]

use crate::algorithm::AlgorithmRegistry;
use crate::bitstream::BitWriter;
use crate::constants::{
    DOCUMENT_INITIAL_VOCABULARY_FLAG, DOCUMENT_NOTATIONS_FLAG, DOCUMENT_STANDALONE_FLAG,
    DOCUMENT_UNPARSED_ENTITIES_FLAG, DOCUMENT_VERSION_FLAG, HEADER, INITIAL_VOCABULARY_ATTRIBUTE_NAME_SURROGATES_FLAG,
    INITIAL_VOCABULARY_ATTRIBUTE_VALUES_FLAG, INITIAL_VOCABULARY_CONTENT_CHARACTER_CHUNKS_FLAG,
    INITIAL_VOCABULARY_ELEMENT_NAME_SURROGATES_FLAG, INITIAL_VOCABULARY_ENCODING_ALGORITHMS_FLAG,
    INITIAL_VOCABULARY_EXTERNAL_VOCABULARY_FLAG, INITIAL_VOCABULARY_LOCAL_NAMES_FLAG,
    INITIAL_VOCABULARY_NAMESPACE_NAMES_FLAG, INITIAL_VOCABULARY_OTHER_NCNAMES_FLAG,
    INITIAL_VOCABULARY_OTHER_STRINGS_FLAG, INITIAL_VOCABULARY_OTHER_URIS_FLAG, INITIAL_VOCABULARY_PREFIXES_FLAG,
    INITIAL_VOCABULARY_RESTRICTED_ALPHABETS_FLAG, NAME_SURROGATE_NAME_FLAG, NAME_SURROGATE_PREFIX_FLAG, NOTATIONS,
    NOTATIONS_PUBLIC_IDENTIFIER_FLAG, NOTATIONS_SYSTEM_IDENTIFIER_FLAG, TERMINATOR, UNPARSED_ENTITIES,
    UNPARSED_ENTITIES_PUBLIC_IDENTIFIER_FLAG, XML_DECLARATION,
};
use crate::event::{DocumentProperties, Notation, UnparsedEntity};
use crate::options::EncoderOptions;
use crate::qname::{NameTableKind, QualifiedNameTable};
use crate::string::{encode_identifying_literal, encode_identifying_string, encode_non_identifying_literal, encode_non_identifying_string};
use crate::string_table::{StringTable, TableKind};
use crate::vocabulary::{SharedVocabulary, Vocabulary};
use crate::{Error, Result, integer, length};

/// Identifier-Tabellen: Einträge als C.22, sonst als C.19.
const IDENTIFIER_TABLES: [(TableKind, u8); 5] = [
    (TableKind::Prefix, INITIAL_VOCABULARY_PREFIXES_FLAG),
    (TableKind::NamespaceName, INITIAL_VOCABULARY_NAMESPACE_NAMES_FLAG),
    (TableKind::LocalName, INITIAL_VOCABULARY_LOCAL_NAMES_FLAG),
    (TableKind::OtherNcName, INITIAL_VOCABULARY_OTHER_NCNAMES_FLAG),
    (TableKind::OtherUri, INITIAL_VOCABULARY_OTHER_URIS_FLAG),
];

const CHARACTER_TABLES: [(TableKind, u8); 3] = [
    (TableKind::AttributeValue, INITIAL_VOCABULARY_ATTRIBUTE_VALUES_FLAG),
    (TableKind::CharacterContentChunk, INITIAL_VOCABULARY_CONTENT_CHARACTER_CHUNKS_FLAG),
    (TableKind::OtherString, INITIAL_VOCABULARY_OTHER_STRINGS_FLAG),
];

/// Writes everything before the first child of the document.
pub(crate) fn encode_header(
    writer: &mut BitWriter,
    options: &EncoderOptions,
    properties: &DocumentProperties,
    vocabulary: &mut Vocabulary,
    algorithms: &AlgorithmRegistry,
) -> Result<()> {
    if options.xml_declaration() {
        writer.write_octets(XML_DECLARATION);
    }
    writer.write_octets(&HEADER);

    let inherited = vocabulary.parent().filter(|p| p.external_uri().is_some() || !p.is_empty()).cloned();
    let initial_vocabulary = inherited.is_some() || algorithms.application_count() > 0;

    let mut flags = 0u8;
    if initial_vocabulary {
        flags |= DOCUMENT_INITIAL_VOCABULARY_FLAG;
    }
    if !properties.notations.is_empty() {
        flags |= DOCUMENT_NOTATIONS_FLAG;
    }
    if !properties.unparsed_entities.is_empty() {
        flags |= DOCUMENT_UNPARSED_ENTITIES_FLAG;
    }
    if properties.standalone.is_some() {
        flags |= DOCUMENT_STANDALONE_FLAG;
    }
    if properties.version.is_some() {
        flags |= DOCUMENT_VERSION_FLAG;
    }
    writer.write_octet(flags);

    if initial_vocabulary {
        encode_initial_vocabulary(writer, inherited.as_ref(), algorithms)?;
    }
    if !properties.notations.is_empty() {
        for notation in &properties.notations {
            encode_notation(writer, vocabulary, notation)?;
        }
        writer.write_octet(TERMINATOR);
    }
    if !properties.unparsed_entities.is_empty() {
        for entity in &properties.unparsed_entities {
            encode_unparsed_entity(writer, vocabulary, entity)?;
        }
        writer.write_octet(TERMINATOR);
    }
    if let Some(standalone) = properties.standalone {
        writer.write_octet(u8::from(standalone));
    }
    if let Some(version) = &properties.version {
        encode_non_identifying_string(writer, vocabulary.table_mut(TableKind::OtherString), version, false)?;
    }
    Ok(())
}

/// Entries a table adds beyond the implicit `xml` ones.
fn listed_entries(table: &StringTable) -> Vec<&str> {
    let mut entries = table.entries();
    entries.drain(..table.builtin_len());
    entries
}

fn encode_initial_vocabulary(
    writer: &mut BitWriter,
    inherited: Option<&SharedVocabulary>,
    algorithms: &AlgorithmRegistry,
) -> Result<()> {
    let external = inherited.and_then(SharedVocabulary::external_uri);
    // Bei externem Vokabular kennt der Leser die Tabellen bereits
    let listed = inherited.filter(|_| external.is_none());

    let mut first = 0u8;
    let mut second = 0u8;
    if external.is_some() {
        first |= INITIAL_VOCABULARY_EXTERNAL_VOCABULARY_FLAG;
    }
    if algorithms.application_count() > 0 {
        first |= INITIAL_VOCABULARY_ENCODING_ALGORITHMS_FLAG;
    }
    if let Some(shared) = listed {
        if !listed_entries(shared.table(TableKind::RestrictedAlphabet)).is_empty() {
            first |= INITIAL_VOCABULARY_RESTRICTED_ALPHABETS_FLAG;
        }
        for (kind, flag) in IDENTIFIER_TABLES.into_iter().chain(CHARACTER_TABLES) {
            if listed_entries(shared.table(kind)).is_empty() {
                continue;
            }
            match kind {
                TableKind::Prefix | TableKind::NamespaceName => first |= flag,
                _ => second |= flag,
            }
        }
        if !shared.names(NameTableKind::Element).is_empty() {
            second |= INITIAL_VOCABULARY_ELEMENT_NAME_SURROGATES_FLAG;
        }
        if !shared.names(NameTableKind::Attribute).is_empty() {
            second |= INITIAL_VOCABULARY_ATTRIBUTE_NAME_SURROGATES_FLAG;
        }
    }
    writer.write_octet(first);
    writer.write_octet(second);

    if let Some(uri) = external {
        log::debug!("announcing external vocabulary {uri}");
        encode_identifying_literal(writer, uri)?;
    }
    if let Some(shared) = listed {
        encode_character_sequence(writer, &listed_entries(shared.table(TableKind::RestrictedAlphabet)))?;
    }
    if algorithms.application_count() > 0 {
        let uris: Vec<&str> = algorithms.uris().collect();
        encode_identifier_sequence(writer, &uris)?;
    }
    let Some(shared) = listed else {
        return Ok(());
    };
    for (kind, _) in IDENTIFIER_TABLES {
        encode_identifier_sequence(writer, &listed_entries(shared.table(kind)))?;
    }
    for (kind, _) in CHARACTER_TABLES {
        encode_character_sequence(writer, &listed_entries(shared.table(kind)))?;
    }
    for kind in [NameTableKind::Element, NameTableKind::Attribute] {
        encode_name_surrogates(writer, shared, shared.names(kind))?;
    }
    log::debug!("initial vocabulary written");
    Ok(())
}

/// C.21 Länge + C.22 Einträge; leere Listen werden gar nicht geschrieben.
fn encode_identifier_sequence(writer: &mut BitWriter, entries: &[&str]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    length::encode_sequence_length(writer, entries.len())?;
    for entry in entries {
        encode_identifying_literal(writer, entry)?;
    }
    Ok(())
}

/// C.21 Länge + C.19 Einträge.
fn encode_character_sequence(writer: &mut BitWriter, entries: &[&str]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    length::encode_sequence_length(writer, entries.len())?;
    for entry in entries {
        encode_non_identifying_literal(writer, entry, false)?;
    }
    Ok(())
}

fn encode_name_surrogates(writer: &mut BitWriter, shared: &SharedVocabulary, table: &QualifiedNameTable) -> Result<()> {
    let names = table.names();
    if names.is_empty() {
        return Ok(());
    }
    length::encode_sequence_length(writer, names.len())?;
    let index_of = |kind: TableKind, value: &str| {
        shared
            .table(kind)
            .lookup(value)
            .ok_or_else(|| Error::unresolved_namespace(kind.name(), value.to_owned()))
    };
    for name in names {
        let mut flags = 0u8;
        if !name.prefix.is_empty() {
            flags |= NAME_SURROGATE_PREFIX_FLAG;
        }
        if !name.namespace_name.is_empty() {
            flags |= NAME_SURROGATE_NAME_FLAG;
        }
        writer.write_octet(flags);
        if !name.prefix.is_empty() {
            write_surrogate_index(writer, index_of(TableKind::Prefix, &name.prefix)?)?;
        }
        if !name.namespace_name.is_empty() {
            write_surrogate_index(writer, index_of(TableKind::NamespaceName, &name.namespace_name)?)?;
        }
        write_surrogate_index(writer, index_of(TableKind::LocalName, &name.local_name)?)?;
    }
    Ok(())
}

/// Padding-Bit '0' + C.25.
fn write_surrogate_index(writer: &mut BitWriter, index: usize) -> Result<()> {
    writer.write_bit(false);
    integer::encode_on_second_bit(writer, integer::index_to_value(index)?)
}

fn encode_notation(writer: &mut BitWriter, vocabulary: &mut Vocabulary, notation: &Notation) -> Result<()> {
    let mut tag = NOTATIONS;
    if notation.system_identifier.is_some() {
        tag |= NOTATIONS_SYSTEM_IDENTIFIER_FLAG;
    }
    if notation.public_identifier.is_some() {
        tag |= NOTATIONS_PUBLIC_IDENTIFIER_FLAG;
    }
    writer.write_octet(tag);
    encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherNcName), &notation.name)?;
    if let Some(system) = &notation.system_identifier {
        encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherUri), system)?;
    }
    if let Some(public) = &notation.public_identifier {
        encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherUri), public)?;
    }
    Ok(())
}

fn encode_unparsed_entity(writer: &mut BitWriter, vocabulary: &mut Vocabulary, entity: &UnparsedEntity) -> Result<()> {
    let mut tag = UNPARSED_ENTITIES;
    if entity.public_identifier.is_some() {
        tag |= UNPARSED_ENTITIES_PUBLIC_IDENTIFIER_FLAG;
    }
    writer.write_octet(tag);
    encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherNcName), &entity.name)?;
    encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherUri), &entity.system_identifier)?;
    if let Some(public) = &entity.public_identifier {
        encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherUri), public)?;
    }
    encode_identifying_string(writer, vocabulary.table_mut(TableKind::OtherNcName), &entity.notation_name)?;
    Ok(())
}
