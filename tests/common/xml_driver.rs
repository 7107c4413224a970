// Baum-Adapter für Tests: speist ein roxmltree-Dokument in den Encoder und
// erzeugt die erwarteten Zeilen für den Vergleich mit `decode_fi`.
//
// Wird per `include!` eingebunden, zusammen mit `common/decoder.rs`.

fn parse_xml(xml: &str) -> roxmltree::Document<'_> {
    let opts = roxmltree::ParsingOptions { allow_dtd: true, ..Default::default() };
    roxmltree::Document::parse_with_options(xml, opts).expect("XML parsen")
}

/// Prefix, unter dem `namespace_name` an `node` sichtbar ist.
fn prefix_in_scope(node: roxmltree::Node, namespace_name: &str) -> String {
    if namespace_name.is_empty() {
        return String::new();
    }
    node.namespaces()
        .find(|ns| ns.uri() == namespace_name)
        .and_then(|ns| ns.name())
        .unwrap_or("")
        .to_string()
}

/// Wie [`prefix_in_scope`], aber nie der Default-Namespace (Attribute).
fn attribute_prefix_in_scope(node: roxmltree::Node, namespace_name: &str) -> String {
    if namespace_name.is_empty() {
        return String::new();
    }
    node.namespaces()
        .filter(|ns| ns.name().is_some())
        .find(|ns| ns.uri() == namespace_name)
        .and_then(|ns| ns.name())
        .unwrap_or("")
        .to_string()
}

/// Deklarationen, die `node` gegenüber dem Elternelement neu einführt, in
/// Dokumentreihenfolge. Ein aufgehobener Default-Namespace wird als `("", "")`
/// geliefert.
fn new_bindings(node: roxmltree::Node) -> Vec<(String, String)> {
    let parent = node.parent_element();
    let inherited = |prefix| parent.and_then(|p| p.lookup_namespace_uri(prefix)).unwrap_or("").to_string();
    let mut bindings: Vec<(String, String)> = node
        .namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| inherited(ns.name()) != ns.uri())
        .map(|ns| (ns.name().unwrap_or("").to_string(), ns.uri().to_string()))
        .collect();
    let default_now = node.lookup_namespace_uri(None).unwrap_or("");
    if default_now.is_empty() && !inherited(None).is_empty() && !bindings.iter().any(|(p, _)| p.is_empty()) {
        bindings.push((String::new(), String::new()));
    }
    bindings
}

fn qualified(prefix: &str, local: &str) -> String {
    if prefix.is_empty() { local.to_string() } else { format!("{prefix}:{local}") }
}

/// Encodiert `xml` über die Encoder-Methoden.
fn feed_xml(encoder: &mut fastinfoset::Encoder, xml: &str) -> fastinfoset::Result<()> {
    let doc = parse_xml(xml);
    encoder.open_document()?;
    for child in doc.root().children() {
        feed_node(encoder, child)?;
    }
    encoder.close_document()
}

fn feed_node(encoder: &mut fastinfoset::Encoder, node: roxmltree::Node) -> fastinfoset::Result<()> {
    match node.node_type() {
        roxmltree::NodeType::Element => {
            let bindings: Vec<fastinfoset::NamespaceBinding> = new_bindings(node)
                .iter()
                .map(|(prefix, uri)| fastinfoset::NamespaceBinding::new(prefix.as_str(), uri.as_str()))
                .collect();
            let namespace_name = node.tag_name().namespace().unwrap_or("");
            let local = node.tag_name().name();
            let qname = qualified(&prefix_in_scope(node, namespace_name), local);
            let has_attributes = node.attributes().next().is_some();
            encoder.open_element(namespace_name, &qname, local, &bindings, has_attributes)?;
            for attribute in node.attributes() {
                let namespace_name = attribute.namespace().unwrap_or("");
                let qname = qualified(&attribute_prefix_in_scope(node, namespace_name), attribute.name());
                encoder.emit_attribute(namespace_name, &qname, attribute.name(), attribute.value())?;
            }
            for child in node.children() {
                feed_node(encoder, child)?;
            }
            encoder.close_element()
        }
        roxmltree::NodeType::Text => encoder.emit_text(node.text().unwrap_or("")),
        roxmltree::NodeType::Comment => encoder.emit_comment(node.text().unwrap_or("")),
        roxmltree::NodeType::PI => match node.pi() {
            Some(pi) => encoder.emit_processing_instruction(pi.target, pi.value.unwrap_or("")),
            None => Ok(()),
        },
        roxmltree::NodeType::Root => Ok(()),
    }
}

/// Encodiert `xml` mit `options` zu einem Fast-Infoset-Dokument.
fn encode_xml(xml: &str, options: fastinfoset::EncoderOptions) -> Vec<u8> {
    let mut encoder = fastinfoset::Encoder::new(options);
    feed_xml(&mut encoder, xml).expect("XML encodieren");
    encoder.finish().expect("Ausgabe abholen")
}

/// Erwartete Vergleichszeilen direkt aus dem XML-Baum.
fn expected_lines(xml: &str) -> Vec<String> {
    let doc = parse_xml(xml);
    let mut lines = vec!["SD".to_string()];
    for child in doc.root().children() {
        // Whitespace auf Dokumentebene wird nicht encodiert
        if child.is_text() {
            continue;
        }
        expected_node(child, &mut lines);
    }
    lines.push("ED".into());
    canonical(&lines)
}

fn expected_node(node: roxmltree::Node, lines: &mut Vec<String>) {
    match node.node_type() {
        roxmltree::NodeType::Element => {
            let namespace_name = node.tag_name().namespace().unwrap_or("");
            let qname = qualified(&prefix_in_scope(node, namespace_name), node.tag_name().name());
            lines.push(format!("SE {{{namespace_name}}}{qname}"));
            for (prefix, uri) in new_bindings(node) {
                lines.push(format!("NS {prefix}={uri}"));
            }
            for attribute in node.attributes() {
                let namespace_name = attribute.namespace().unwrap_or("");
                let qname = qualified(&attribute_prefix_in_scope(node, namespace_name), attribute.name());
                lines.push(format!("AT {{{namespace_name}}}{qname}={}", attribute.value()));
            }
            for child in node.children() {
                expected_node(child, lines);
            }
            lines.push("EE".into());
        }
        roxmltree::NodeType::Text => lines.push(format!("CH {}", node.text().unwrap_or(""))),
        roxmltree::NodeType::Comment => lines.push(format!("CM {}", node.text().unwrap_or(""))),
        roxmltree::NodeType::PI => {
            if let Some(pi) = node.pi() {
                lines.push(format!("PI {} {}", pi.target, pi.value.unwrap_or("")));
            }
        }
        roxmltree::NodeType::Root => {}
    }
}
