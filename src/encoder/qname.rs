use crate::constants::{
    ATTRIBUTE_LITERAL_QNAME_FLAG, LITERAL_QNAME_NAMESPACE_NAME_FLAG, LITERAL_QNAME_PREFIX_FLAG, NAMESPACE_ATTRIBUTE,
    NAMESPACE_ATTRIBUTE_NAME_FLAG, NAMESPACE_ATTRIBUTE_PREFIX_FLAG,
};
use crate::encoder::Encoder;
use crate::qname::NameTableKind;
use crate::string::encode_identifying_string;
use crate::string_table::TableKind;
use crate::{Result, integer};

impl Encoder {
    /// Encodiert ein Namespace-Attribut (X.891 C.12): Tag-Oktett mit
    /// Präsenz-Flags, dann Prefix und Namespace-Name als C.13.
    pub(super) fn encode_namespace_attribute(&mut self, prefix: &str, namespace_name: &str) -> Result<()> {
        let mut tag = NAMESPACE_ATTRIBUTE;
        if !prefix.is_empty() {
            tag |= NAMESPACE_ATTRIBUTE_PREFIX_FLAG;
        }
        if !namespace_name.is_empty() {
            tag |= NAMESPACE_ATTRIBUTE_NAME_FLAG;
        }
        self.writer.write_octet(tag);
        if !prefix.is_empty() {
            encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::Prefix), prefix)?;
        }
        if !namespace_name.is_empty() {
            encode_identifying_string(
                &mut self.writer,
                self.vocabulary.table_mut(TableKind::NamespaceName),
                namespace_name,
            )?;
        }
        Ok(())
    }

    /// Encodiert einen Element-Namen ab dem dritten Bit (X.891 C.18, C.27).
    ///
    /// Bekannte Namen (gleicher Prefix, Namespace und Local-Name) als Index,
    /// neue als Literal `1111` + Flags, gefolgt von Prefix, Namespace und
    /// Local-Name; danach ist der Name registriert.
    pub(super) fn encode_element_name(
        &mut self,
        prefix: &str,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
    ) -> Result<()> {
        debug_assert_eq!(self.writer.bits_in_octet(), 2, "element name starts on the third bit");
        if let Some(known) = self.vocabulary.names(NameTableKind::Element).find(prefix, namespace_name, local_name) {
            log::trace!("element name hit {}: {qname}", known.index);
            let value = integer::index_to_value(known.index)?;
            return integer::encode_on_third_bit(&mut self.writer, value);
        }
        self.writer.write_bits(0b1111, 4);
        self.encode_literal_name(NameTableKind::Element, prefix, namespace_name, qname, local_name)
    }

    /// Encodiert einen Attribut-Namen ab dem zweiten Bit (X.891 C.17, C.25).
    pub(super) fn encode_attribute_name(
        &mut self,
        prefix: &str,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
    ) -> Result<()> {
        debug_assert_eq!(self.writer.bits_in_octet(), 1, "attribute name starts on the second bit");
        if let Some(known) = self.vocabulary.names(NameTableKind::Attribute).find(prefix, namespace_name, local_name) {
            log::trace!("attribute name hit {}: {qname}", known.index);
            let value = integer::index_to_value(known.index)?;
            return integer::encode_on_second_bit(&mut self.writer, value);
        }
        // '1111' + ein Padding-Bit
        self.writer.write_bits(u64::from(ATTRIBUTE_LITERAL_QNAME_FLAG >> 2), 5);
        self.encode_literal_name(NameTableKind::Attribute, prefix, namespace_name, qname, local_name)
    }

    /// Schreibt die Flags und Bestandteile eines Literal-Namens (X.891 C.18)
    /// und trägt ihn in die Namenstabelle ein.
    fn encode_literal_name(
        &mut self,
        kind: NameTableKind,
        prefix: &str,
        namespace_name: &str,
        qname: &str,
        local_name: &str,
    ) -> Result<()> {
        let mut flags = 0u8;
        if !prefix.is_empty() {
            flags |= LITERAL_QNAME_PREFIX_FLAG;
        }
        if !namespace_name.is_empty() {
            flags |= LITERAL_QNAME_NAMESPACE_NAME_FLAG;
        }
        self.writer.write_bits(u64::from(flags), 2);
        if !prefix.is_empty() {
            encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::Prefix), prefix)?;
        }
        if !namespace_name.is_empty() {
            encode_identifying_string(
                &mut self.writer,
                self.vocabulary.table_mut(TableKind::NamespaceName),
                namespace_name,
            )?;
        }
        encode_identifying_string(&mut self.writer, self.vocabulary.table_mut(TableKind::LocalName), local_name)?;
        let name = match kind {
            NameTableKind::Element => self.vocabulary.add_element_name(namespace_name, qname, local_name)?,
            NameTableKind::Attribute => self.vocabulary.add_attribute_name(namespace_name, qname, local_name)?,
        };
        log::trace!("{} miss, added as {}: {qname}", kind.name(), name.index);
        Ok(())
    }
}
