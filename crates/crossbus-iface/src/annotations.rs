//! Annotation store and language-tag resolution
//!
//! Every describable entity (interface, member, property, member-argument)
//! carries an insertion-ordered name→value annotation map. Human-readable
//! descriptions are stored in the same map under the DocString naming
//! convention: `org.alljoyn.Bus.DocString` for the tag-less default document
//! and `org.alljoyn.Bus.DocString.<lang>` for an RFC 5646 language tag.
//!
//! The resolution algorithm shared by all four entity kinds lives here, see
//! [`resolve_description`].

use crate::translator::Translator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Namespace prefix for documentation annotations.
pub const DOC_STRING: &str = "org.alljoyn.Bus.DocString";

/// Annotation marking an interface as requiring end-to-end security.
pub const SECURE: &str = "org.alljoyn.Bus.Secure";

/// Insertion-ordered mapping from annotation name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationMap {
    entries: IndexMap<String, String>,
}

impl AnnotationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an annotation. Returns false when the name is already present;
    /// the stored value is left unchanged in that case.
    pub fn try_insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, value.into());
        true
    }

    /// Exact-name lookup, no fallback.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// True when an annotation with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of stored annotations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no annotations are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate name/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// True when any DocString annotation is present.
    pub fn has_doc_string(&self) -> bool {
        self.entries.keys().any(|n| doc_string_language(n).is_some())
    }

    /// Collect the language tags of all DocString annotations into `out`.
    pub fn collect_doc_string_languages(&self, out: &mut BTreeSet<String>) {
        for name in self.entries.keys() {
            if let Some(lang) = doc_string_language(name) {
                out.insert(lang.to_owned());
            }
        }
    }
}

/// Annotation name for a description in the given language. The empty tag
/// maps to the bare DocString name.
pub fn doc_string_name(language_tag: &str) -> String {
    if language_tag.is_empty() {
        DOC_STRING.to_owned()
    } else {
        format!("{DOC_STRING}.{language_tag}")
    }
}

/// Language tag of a DocString annotation name, or `None` when the name is
/// not in the DocString namespace. The bare name yields the empty tag.
pub fn doc_string_language(annotation_name: &str) -> Option<&str> {
    if annotation_name == DOC_STRING {
        return Some("");
    }
    annotation_name
        .strip_prefix(DOC_STRING)?
        .strip_prefix('.')
        .filter(|tag| !tag.is_empty())
}

/// Strip the rightmost `-subtag` component of an RFC 5646 language tag,
/// e.g. `en-US` → `en`. Returns `None` at the most general non-empty tag.
pub fn more_general_language_tag(language_tag: &str) -> Option<&str> {
    language_tag
        .rfind('-')
        .map(|idx| &language_tag[..idx])
        .filter(|tag| !tag.is_empty())
}

/// Count-then-fill enumeration over name/value pairs.
///
/// With `out` absent the total number of pairs is returned. With a buffer,
/// up to `out.len()` pairs are written in iteration order and the number
/// written is returned, independent of the total.
pub(crate) fn fill_pairs<'a>(
    pairs: impl Iterator<Item = (&'a str, &'a str)>,
    out: Option<&mut [(String, String)]>,
) -> usize {
    match out {
        None => pairs.count(),
        Some(buf) => {
            let mut written = 0;
            for (slot, (name, value)) in buf.iter_mut().zip(pairs) {
                *slot = (name.to_owned(), value.to_owned());
                written += 1;
            }
            written
        }
    }
}

/// Resolve the description of one entity for a requested language.
///
/// Resolution order, first success wins:
/// 1. exact-match DocString annotation for the requested tag;
/// 2. DocString annotations at progressively more general tags
///    (`en-US` → `en`), stopping at the most general non-empty tag;
/// 3. the translator, keyed by the entity's tag-less legacy description;
/// 4. the legacy description itself, only when the requested tag equals the
///    interface's declared description language (or both are empty).
///
/// An empty legacy description counts as absent; overall failure is `None`,
/// distinct from an empty-string description stored under a DocString tag.
pub(crate) fn resolve_description(
    annotations: &AnnotationMap,
    legacy_description: &str,
    declared_language: &str,
    language_tag: &str,
    translator: Option<&dyn Translator>,
) -> Option<String> {
    let mut tag = language_tag;
    loop {
        if let Some(text) = annotations.get(&doc_string_name(tag)) {
            return Some(text.to_owned());
        }
        match more_general_language_tag(tag) {
            Some(general) => tag = general,
            None => break,
        }
    }

    if let Some(translator) = translator {
        if !legacy_description.is_empty() {
            if let Some(text) =
                translator.translate(declared_language, language_tag, legacy_description)
            {
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }

    if !legacy_description.is_empty() && language_tag == declared_language {
        return Some(legacy_description.to_owned());
    }

    None
}
