use std::sync::Arc;

use crate::constants::{XML_NAMESPACE, XML_PREFIX};

/// In-scope namespace bindings, innermost last.
///
/// `xml` ist immer gebunden, der Default-Namespace ist anfangs leer.
#[derive(Debug, Clone)]
pub(super) struct NamespaceScope {
    bindings: Vec<(Arc<str>, Arc<str>)>,
    /// Länge von `bindings` beim Öffnen jedes Elements.
    marks: Vec<usize>,
}

impl Default for NamespaceScope {
    fn default() -> Self {
        Self {
            bindings: vec![(XML_PREFIX.into(), XML_NAMESPACE.into())],
            marks: Vec::new(),
        }
    }
}

impl NamespaceScope {
    pub(super) fn push_element(&mut self) {
        self.marks.push(self.bindings.len());
    }

    pub(super) fn pop_element(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    pub(super) fn bind(&mut self, prefix: &str, namespace_name: &str) {
        self.bindings.push((prefix.into(), namespace_name.into()));
    }

    /// Namespace bound to `prefix`; the unbound default namespace is empty.
    pub(super) fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| &**p == prefix)
            .map(|(_, ns)| &**ns)
            .or(if prefix.is_empty() { Some("") } else { None })
    }

    /// A non-empty prefix currently bound to `namespace_name`.
    pub(super) fn prefix_for(&self, namespace_name: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .filter(|(p, ns)| !p.is_empty() && &**ns == namespace_name)
            .map(|(p, _)| &**p)
            .find(|p| self.resolve(p) == Some(namespace_name))
    }

    pub(super) fn depth(&self) -> usize {
        self.marks.len()
    }

    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }
}
