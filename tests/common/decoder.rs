// Minimaler Fast-Infoset-Leser für Round-Trip- und Wire-Format-Tests.
//
// Wird per `include!` eingebunden. Liest genau die Formen, die der Encoder
// schreibt, führt eigene Tabellen mit und liefert eine Zeile pro Item:
//   SD, ED, SE {ns}qname, NS prefix=uri, AT {ns}qname=value, CH text,
//   CD text, CM text, PI target data, DT system public, ER name, EE,
//   NO/UE (Header-Deklarationen), SA, VE
// Algorithmus-Werte erscheinen als `#id:hex`, fehlende Identifier als `-`.

/// Decoded string value: text or raw algorithm octets.
#[derive(Debug, Clone, PartialEq)]
enum DecodedValue {
    Text(String),
    Encoded(u32, Vec<u8>),
}

impl DecodedValue {
    fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Encoded(id, octets) => format!("#{id}:{}", hex(octets)),
        }
    }
}

fn hex(octets: &[u8]) -> String {
    octets.iter().map(|b| format!("{b:02x}")).collect()
}

fn malformed<T>(what: impl Into<String>) -> fastinfoset::Result<T> {
    Err(fastinfoset::Error::InvalidValue(what.into()))
}

#[derive(Debug, Clone)]
struct DecodedName {
    prefix: String,
    namespace_name: String,
    local_name: String,
}

impl DecodedName {
    fn render(&self) -> String {
        if self.prefix.is_empty() {
            format!("{{{}}}{}", self.namespace_name, self.local_name)
        } else {
            format!("{{{}}}{}:{}", self.namespace_name, self.prefix, self.local_name)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Tbl {
    Prefix,
    Namespace,
    Local,
    OtherNcName,
    OtherUri,
    AttributeValue,
    Chunk,
    OtherString,
}

/// Leser-Zustand: Tabellen in Encoder-Reihenfolge plus Ausgabezeilen.
#[derive(Debug)]
struct FiReader {
    prefixes: Vec<String>,
    namespaces: Vec<String>,
    local_names: Vec<String>,
    other_ncnames: Vec<String>,
    other_uris: Vec<String>,
    attribute_values: Vec<String>,
    chunks: Vec<String>,
    other_strings: Vec<String>,
    alphabets: Vec<String>,
    algorithm_uris: Vec<String>,
    element_names: Vec<DecodedName>,
    attribute_names: Vec<DecodedName>,
    /// Vokabular eines externen URIs ist bereits geladen.
    external: Option<String>,
    lines: Vec<String>,
    /// Ein Doppel-Terminator hat auch den umgebenden Container beendet.
    carry: bool,
}

impl FiReader {
    fn new() -> Self {
        Self {
            prefixes: vec!["xml".to_string()],
            namespaces: vec![fastinfoset::constants::XML_NAMESPACE.to_string()],
            local_names: Vec::new(),
            other_ncnames: Vec::new(),
            other_uris: Vec::new(),
            attribute_values: Vec::new(),
            chunks: Vec::new(),
            other_strings: Vec::new(),
            alphabets: Vec::new(),
            algorithm_uris: Vec::new(),
            element_names: Vec::new(),
            attribute_names: Vec::new(),
            external: None,
            lines: Vec::new(),
            carry: false,
        }
    }

    /// Leser, der das externe Vokabular `uri` bereits kennt.
    fn with_external(uri: &str, shared: &fastinfoset::SharedVocabulary) -> Self {
        use fastinfoset::qname::NameTableKind;
        use fastinfoset::TableKind;

        let owned = |kind: TableKind| -> Vec<String> {
            shared.table(kind).entries().into_iter().map(str::to_string).collect()
        };
        let names = |kind: NameTableKind| -> Vec<DecodedName> {
            shared
                .names(kind)
                .names()
                .into_iter()
                .map(|name| DecodedName {
                    prefix: name.prefix.to_string(),
                    namespace_name: name.namespace_name.to_string(),
                    local_name: name.local_name.to_string(),
                })
                .collect()
        };
        let mut reader = Self::new();
        reader.prefixes = owned(TableKind::Prefix);
        reader.namespaces = owned(TableKind::NamespaceName);
        reader.local_names = owned(TableKind::LocalName);
        reader.other_ncnames = owned(TableKind::OtherNcName);
        reader.other_uris = owned(TableKind::OtherUri);
        reader.attribute_values = owned(TableKind::AttributeValue);
        reader.chunks = owned(TableKind::CharacterContentChunk);
        reader.other_strings = owned(TableKind::OtherString);
        reader.alphabets = owned(TableKind::RestrictedAlphabet);
        reader.element_names = names(NameTableKind::Element);
        reader.attribute_names = names(NameTableKind::Attribute);
        reader.external = Some(uri.to_string());
        reader
    }

    fn table(&mut self, table: Tbl) -> &mut Vec<String> {
        match table {
            Tbl::Prefix => &mut self.prefixes,
            Tbl::Namespace => &mut self.namespaces,
            Tbl::Local => &mut self.local_names,
            Tbl::OtherNcName => &mut self.other_ncnames,
            Tbl::OtherUri => &mut self.other_uris,
            Tbl::AttributeValue => &mut self.attribute_values,
            Tbl::Chunk => &mut self.chunks,
            Tbl::OtherString => &mut self.other_strings,
        }
    }

    fn indexed(&mut self, table: Tbl, value: u32) -> fastinfoset::Result<String> {
        match self.table(table).get(value as usize - 1) {
            Some(entry) => Ok(entry.clone()),
            None => malformed(format!("{table:?} index {} out of table", value - 1)),
        }
    }

    // ------------------------------------------------------------------------
    // Dokument und Header
    // ------------------------------------------------------------------------

    fn read_document(mut self, bytes: &[u8]) -> fastinfoset::Result<Vec<String>> {
        let mut bytes = bytes;
        if bytes.starts_with(b"<?xml") {
            let Some(end) = bytes.windows(2).position(|w| w == b"?>") else {
                return malformed("unterminated XML declaration");
            };
            bytes = &bytes[end + 2..];
        }
        let mut r = fastinfoset::bitstream::BitReader::new(bytes);
        if r.read_octets(4)? != fastinfoset::constants::HEADER {
            return malformed("not a Fast Infoset document");
        }
        self.lines.push("SD".into());
        let flags = r.read_octet()?;
        if flags & 0xE0 != 0 {
            return malformed(format!("unsupported document flags {flags:#04x}"));
        }
        if flags & 0x10 != 0 {
            self.read_initial_vocabulary(&mut r)?;
        }
        if flags & 0x08 != 0 {
            self.read_notations(&mut r)?;
        }
        if flags & 0x04 != 0 {
            self.read_unparsed_entities(&mut r)?;
        }
        if flags & 0x02 != 0 {
            let standalone = r.read_octet()?;
            self.lines.push(format!("SA {standalone}"));
        }
        if flags & 0x01 != 0 {
            let version = self.non_identifying(&mut r, Some(Tbl::OtherString))?;
            self.lines.push(format!("VE {}", version.render()));
        }
        self.read_children(&mut r)?;
        if !r.is_at_end() {
            return malformed(format!("{} trailing bits", r.remaining_bits()));
        }
        self.lines.push("ED".into());
        Ok(self.lines)
    }

    fn read_initial_vocabulary(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        let first = r.read_octet()?;
        let second = r.read_octet()?;
        if first & 0x10 != 0 {
            let uri = identifying_literal(r)?;
            if self.external.as_deref() != Some(uri.as_str()) {
                return malformed(format!("unknown external vocabulary {uri}"));
            }
        }
        if first & 0x08 != 0 {
            for _ in 0..fastinfoset::length::decode_sequence_length(r)? {
                let alphabet = self.non_identifying(r, None)?.render();
                self.alphabets.push(alphabet);
            }
        }
        if first & 0x04 != 0 {
            for _ in 0..fastinfoset::length::decode_sequence_length(r)? {
                let uri = identifying_literal(r)?;
                self.algorithm_uris.push(uri);
            }
        }
        let identifiers = [
            (first & 0x02, Tbl::Prefix),
            (first & 0x01, Tbl::Namespace),
            (second & 0x80, Tbl::Local),
            (second & 0x40, Tbl::OtherNcName),
            (second & 0x20, Tbl::OtherUri),
        ];
        for (present, table) in identifiers {
            if present == 0 {
                continue;
            }
            for _ in 0..fastinfoset::length::decode_sequence_length(r)? {
                let entry = identifying_literal(r)?;
                self.table(table).push(entry);
            }
        }
        let characters = [
            (second & 0x10, Tbl::AttributeValue),
            (second & 0x08, Tbl::Chunk),
            (second & 0x04, Tbl::OtherString),
        ];
        for (present, table) in characters {
            if present == 0 {
                continue;
            }
            for _ in 0..fastinfoset::length::decode_sequence_length(r)? {
                let entry = self.non_identifying(r, None)?.render();
                self.table(table).push(entry);
            }
        }
        if second & 0x02 != 0 {
            let names = self.read_surrogates(r)?;
            self.element_names.extend(names);
        }
        if second & 0x01 != 0 {
            let names = self.read_surrogates(r)?;
            self.attribute_names.extend(names);
        }
        Ok(())
    }

    fn read_surrogates(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<Vec<DecodedName>> {
        let count = fastinfoset::length::decode_sequence_length(r)?;
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            let flags = r.read_octet()?;
            let mut surrogate_index = |reader: &mut Self, table: Tbl| -> fastinfoset::Result<String> {
                r.read_bit()?;
                let value = fastinfoset::integer::decode_on_second_bit(r)?;
                reader.indexed(table, value)
            };
            let prefix = if flags & 0x02 != 0 { surrogate_index(self, Tbl::Prefix)? } else { String::new() };
            let namespace_name = if flags & 0x01 != 0 { surrogate_index(self, Tbl::Namespace)? } else { String::new() };
            let local_name = surrogate_index(self, Tbl::Local)?;
            names.push(DecodedName { prefix, namespace_name, local_name });
        }
        Ok(names)
    }

    fn read_notations(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        loop {
            let tag = r.read_octet()?;
            if tag == 0xF0 {
                return Ok(());
            }
            if tag & 0xFC != 0xC0 {
                return malformed(format!("notation tag {tag:#04x}"));
            }
            let name = self.identifying(r, Tbl::OtherNcName)?;
            let system = self.optional_uri(r, tag & 0x02 != 0)?;
            let public = self.optional_uri(r, tag & 0x01 != 0)?;
            self.lines.push(format!("NO {name} {system} {public}"));
        }
    }

    fn read_unparsed_entities(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        loop {
            let tag = r.read_octet()?;
            if tag == 0xF0 {
                return Ok(());
            }
            if tag & 0xFE != 0xD0 {
                return malformed(format!("unparsed entity tag {tag:#04x}"));
            }
            let name = self.identifying(r, Tbl::OtherNcName)?;
            let system = self.identifying(r, Tbl::OtherUri)?;
            let public = self.optional_uri(r, tag & 0x01 != 0)?;
            let notation = self.identifying(r, Tbl::OtherNcName)?;
            self.lines.push(format!("UE {name} {system} {public} {notation}"));
        }
    }

    fn optional_uri(&mut self, r: &mut fastinfoset::bitstream::BitReader, present: bool) -> fastinfoset::Result<String> {
        if present { self.identifying(r, Tbl::OtherUri) } else { Ok("-".into()) }
    }

    // ------------------------------------------------------------------------
    // Inhalt
    // ------------------------------------------------------------------------

    /// Liest Kinder bis zum Terminator des Containers.
    fn read_children(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        loop {
            if std::mem::take(&mut self.carry) {
                return Ok(());
            }
            let Some(tag) = r.peek_octet() else {
                return malformed("missing terminator");
            };
            match tag {
                0xF0 => {
                    r.read_octet()?;
                    return Ok(());
                }
                0xFF => {
                    r.read_octet()?;
                    self.carry = true;
                    return Ok(());
                }
                0xE1 => self.read_processing_instruction(r)?,
                0xE2 => {
                    r.read_octet()?;
                    let text = self.non_identifying(r, Some(Tbl::OtherString))?;
                    self.lines.push(format!("CM {}", text.render()));
                }
                _ if tag & 0x80 == 0 => self.read_element(r)?,
                _ if tag & 0xC0 == 0x80 => {
                    r.read_bits(2)?;
                    let line = match self.read_chunk(r)? {
                        DecodedValue::Encoded(9, octets) => format!("CD {}", String::from_utf8_lossy(&octets)),
                        value => format!("CH {}", value.render()),
                    };
                    self.lines.push(line);
                }
                _ if tag & 0xFC == 0xC4 => self.read_document_type(r)?,
                _ if tag & 0xFC == 0xC8 => {
                    r.read_octet()?;
                    let name = self.identifying(r, Tbl::OtherNcName)?;
                    let system = self.optional_uri(r, tag & 0x02 != 0)?;
                    let public = self.optional_uri(r, tag & 0x01 != 0)?;
                    self.lines.push(format!("ER {name} {system} {public}"));
                }
                _ => return malformed(format!("unexpected item tag {tag:#04x}")),
            }
        }
    }

    fn read_document_type(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        let tag = r.read_octet()?;
        let system = self.optional_uri(r, tag & 0x02 != 0)?;
        let public = self.optional_uri(r, tag & 0x01 != 0)?;
        self.lines.push(format!("DT {system} {public}"));
        loop {
            match r.peek_octet() {
                Some(0xE1) => self.read_processing_instruction(r)?,
                Some(0xF0) => {
                    r.read_octet()?;
                    return Ok(());
                }
                other => return malformed(format!("document type declaration ended by {other:?}")),
            }
        }
    }

    fn read_processing_instruction(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        r.read_octet()?;
        let target = self.identifying(r, Tbl::OtherNcName)?;
        let data = self.non_identifying(r, Some(Tbl::OtherString))?;
        self.lines.push(format!("PI {target} {}", data.render()));
        Ok(())
    }

    fn read_element(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        r.read_bit()?;
        let has_attributes = r.read_bit()?;
        let mut declarations = Vec::new();
        let mut ahead = *r;
        if ahead.read_bits(6)? == 0x38 {
            r.read_bits(6)?;
            loop {
                let tag = r.read_octet()?;
                if tag == 0xF0 {
                    break;
                }
                if tag & 0xFC != 0xCC {
                    return malformed(format!("namespace attribute tag {tag:#04x}"));
                }
                let prefix = if tag & 0x02 != 0 { self.identifying(r, Tbl::Prefix)? } else { String::new() };
                let uri = if tag & 0x01 != 0 { self.identifying(r, Tbl::Namespace)? } else { String::new() };
                declarations.push(format!("NS {prefix}={uri}"));
            }
            // Padding vor dem Namen auf dem dritten Bit
            r.read_bits(2)?;
        }
        let name = self.read_element_name(r)?;
        self.lines.push(format!("SE {}", name.render()));
        self.lines.extend(declarations);
        if has_attributes {
            loop {
                match r.peek_octet() {
                    Some(0xF0) => {
                        r.read_octet()?;
                        break;
                    }
                    Some(0xFF) => {
                        // Ende der Attribute und des Elements
                        r.read_octet()?;
                        self.lines.push("EE".into());
                        return Ok(());
                    }
                    _ => self.read_attribute(r)?,
                }
            }
        }
        self.read_children(r)?;
        self.lines.push("EE".into());
        Ok(())
    }

    fn read_element_name(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<DecodedName> {
        let mut ahead = *r;
        let tail = ahead.read_bits(6)?;
        if tail & 0x3C == 0x3C {
            r.read_bits(6)?;
            let name = self.read_literal_name(r, tail)?;
            self.element_names.push(name.clone());
            return Ok(name);
        }
        let value = fastinfoset::integer::decode_on_third_bit(r)?;
        match self.element_names.get(value as usize - 1) {
            Some(name) => Ok(name.clone()),
            None => malformed(format!("element name index {} out of table", value - 1)),
        }
    }

    fn read_attribute(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<()> {
        if r.read_bit()? {
            return malformed("attribute must start with bit 0");
        }
        let mut ahead = *r;
        let tail = ahead.read_bits(7)?;
        let name = if tail >> 2 == 0b11110 {
            r.read_bits(7)?;
            let name = self.read_literal_name(r, tail)?;
            self.attribute_names.push(name.clone());
            name
        } else {
            let value = fastinfoset::integer::decode_on_second_bit(r)?;
            match self.attribute_names.get(value as usize - 1) {
                Some(name) => name.clone(),
                None => return malformed(format!("attribute name index {} out of table", value - 1)),
            }
        };
        let value = self.non_identifying(r, Some(Tbl::AttributeValue))?;
        self.lines.push(format!("AT {}={}", name.render(), value.render()));
        Ok(())
    }

    /// Literal-Name nach den Flag-Bits `..pn` in `flags`.
    fn read_literal_name(&mut self, r: &mut fastinfoset::bitstream::BitReader, flags: u64) -> fastinfoset::Result<DecodedName> {
        let prefix = if flags & 0x02 != 0 { self.identifying(r, Tbl::Prefix)? } else { String::new() };
        let namespace_name = if flags & 0x01 != 0 { self.identifying(r, Tbl::Namespace)? } else { String::new() };
        let local_name = self.identifying(r, Tbl::Local)?;
        Ok(DecodedName { prefix, namespace_name, local_name })
    }

    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------

    /// C.13: Index oder Literal, das in die Tabelle kommt.
    fn identifying(&mut self, r: &mut fastinfoset::bitstream::BitReader, table: Tbl) -> fastinfoset::Result<String> {
        if r.read_bit()? {
            let value = fastinfoset::integer::decode_on_second_bit(r)?;
            return self.indexed(table, value);
        }
        let len = fastinfoset::length::decode_on_second_bit(r)?;
        let text = fastinfoset::string::read_utf8(r, len)?;
        self.table(table).push(text.clone());
        Ok(text)
    }

    /// C.14 ab dem ersten Bit.
    fn non_identifying(&mut self, r: &mut fastinfoset::bitstream::BitReader, table: Option<Tbl>) -> fastinfoset::Result<DecodedValue> {
        if r.peek_octet() == Some(0xFF) {
            r.read_octet()?;
            return Ok(DecodedValue::Text(String::new()));
        }
        if r.read_bit()? {
            let value = fastinfoset::integer::decode_on_second_bit(r)?;
            let Some(table) = table else {
                return malformed("index into a string without table");
            };
            return self.indexed(table, value).map(DecodedValue::Text);
        }
        let add = r.read_bit()?;
        let discriminant = r.read_bits(2)?;
        let value = self.octet_string(r, discriminant, fastinfoset::length::decode_on_fifth_bit)?;
        if let (true, DecodedValue::Text(text), Some(table)) = (add, &value, table) {
            self.table(table).push(text.clone());
        }
        Ok(value)
    }

    /// C.15 ab dem dritten Bit.
    fn read_chunk(&mut self, r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<DecodedValue> {
        if r.read_bit()? {
            let value = fastinfoset::integer::decode_on_fourth_bit(r)?;
            return self.indexed(Tbl::Chunk, value).map(DecodedValue::Text);
        }
        let add = r.read_bit()?;
        let discriminant = r.read_bits(2)?;
        let value = self.octet_string(r, discriminant, fastinfoset::length::decode_on_seventh_bit)?;
        if let (true, DecodedValue::Text(text)) = (add, &value) {
            self.chunks.push(text.clone());
        }
        Ok(value)
    }

    fn octet_string(
        &mut self,
        r: &mut fastinfoset::bitstream::BitReader,
        discriminant: u64,
        read_len: fn(&mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<usize>,
    ) -> fastinfoset::Result<DecodedValue> {
        match discriminant {
            0b00 => {
                let len = read_len(r)?;
                fastinfoset::string::read_utf8(r, len).map(DecodedValue::Text)
            }
            0b10 => {
                let id = r.read_bits(8)? as u32;
                let len = read_len(r)?;
                let octets = r.read_octets(len)?;
                let alphabet = match fastinfoset::alphabet::builtin(id) {
                    Some(builtin) => builtin.to_string(),
                    None => match self.alphabets.get((id as usize).wrapping_sub(16)) {
                        Some(alphabet) => alphabet.clone(),
                        None => return malformed(format!("unknown restricted alphabet {id}")),
                    },
                };
                fastinfoset::alphabet::decode(&alphabet, octets).map(DecodedValue::Text)
            }
            0b11 => {
                let id = r.read_bits(8)? as u32;
                let len = read_len(r)?;
                Ok(DecodedValue::Encoded(id, r.read_octets(len)?.to_vec()))
            }
            _ => malformed("UTF-16 strings are not written by the encoder"),
        }
    }
}

/// C.22-Literal ohne Tabelle (Initial Vocabulary).
fn identifying_literal(r: &mut fastinfoset::bitstream::BitReader) -> fastinfoset::Result<String> {
    if r.read_bit()? {
        return malformed("initial vocabulary entries are literals");
    }
    let len = fastinfoset::length::decode_on_second_bit(r)?;
    fastinfoset::string::read_utf8(r, len)
}

/// Liest ein Dokument ohne vorgegebenes Vokabular.
fn decode_fi(bytes: &[u8]) -> Vec<String> {
    FiReader::new().read_document(bytes).expect("Fast-Infoset-Dokument lesen")
}

/// Vergleichsform: benachbarte CH-Zeilen verbunden, sonst unverändert.
fn canonical(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for line in lines {
        if let (Some(text), Some(last)) = (line.strip_prefix("CH "), out.last_mut())
            && last.starts_with("CH ")
        {
            last.push_str(text);
            continue;
        }
        out.push(line.clone());
    }
    out
}
