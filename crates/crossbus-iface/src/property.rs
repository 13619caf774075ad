//! Exposed attribute descriptors
//!
//! A [`Property`] describes one readable and/or writable attribute of an
//! interface. Change-notification behavior is declared through
//! [`PropertyFlags`] and collapses to one canonical
//! `EmitsChangedSignal` annotation value; cacheability is derived from that
//! value rather than stored.

use crate::annotations::{fill_pairs, AnnotationMap};
use crate::signature::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Annotation name declaring how property changes are signalled.
pub const EMITS_CHANGED_ANNOTATION: &str = "org.freedesktop.DBus.Property.EmitsChangedSignal";

/// Access rights of a property, a bitmask of read and write.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PropAccess(pub u8);

impl PropAccess {
    /// Read access
    pub const READ: Self = Self(1);
    /// Write access
    pub const WRITE: Self = Self(2);
    /// Read and write access
    pub const READ_WRITE: Self = Self(3);

    /// True when the property can be read
    pub fn can_read(self) -> bool {
        self.0 & Self::READ.0 != 0
    }

    /// True when the property can be written
    pub fn can_write(self) -> bool {
        self.0 & Self::WRITE.0 != 0
    }

    /// The token rendered into the introspection `access` attribute. A zero
    /// access value is accepted but renders an empty token.
    pub fn as_xml_token(self) -> &'static str {
        match (self.can_read(), self.can_write()) {
            (true, true) => "readwrite",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "",
        }
    }
}

impl fmt::Display for PropAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_xml_token())
    }
}

/// Change-notification flags attached to a property at construction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFlags {
    /// Changes are signalled with the new value
    pub emits_changed: bool,
    /// Changes are signalled without the new value
    pub invalidates: bool,
    /// The value never changes for the lifetime of the object
    pub const_value: bool,
}

impl PropertyFlags {
    /// No flags set: changes are not signalled.
    pub const NONE: Self = Self {
        emits_changed: false,
        invalidates: false,
        const_value: false,
    };

    /// Set the emits-changed flag
    pub fn with_emits_changed(mut self) -> Self {
        self.emits_changed = true;
        self
    }

    /// Set the invalidates flag
    pub fn with_invalidates(mut self) -> Self {
        self.invalidates = true;
        self
    }

    /// Set the const flag
    pub fn with_const(mut self) -> Self {
        self.const_value = true;
        self
    }

    /// The canonical `EmitsChangedSignal` annotation value for this flag
    /// combination, `None` when no flag is set. Precedence when several
    /// flags are combined: `const` over `true` over `invalidates`.
    pub fn emits_changed_value(self) -> Option<&'static str> {
        if self.const_value {
            Some("const")
        } else if self.emits_changed {
            Some("true")
        } else if self.invalidates {
            Some("invalidates")
        } else {
            None
        }
    }
}

/// Description of one exposed attribute of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) signature: Signature,
    pub(crate) access: PropAccess,
    pub(crate) flags: PropertyFlags,
    pub(crate) annotations: AnnotationMap,
    pub(crate) description: String,
}

impl Property {
    pub(crate) fn new(
        name: impl Into<String>,
        signature: Signature,
        access: PropAccess,
        flags: PropertyFlags,
    ) -> Self {
        Self {
            name: name.into(),
            signature,
            access,
            flags,
            annotations: AnnotationMap::new(),
            description: String::new(),
        }
    }

    /// Property name, unique within the owning interface's property namespace
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type signature of the property value
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Access rights
    pub fn access(&self) -> PropAccess {
        self.access
    }

    /// The declarative change-notification flags
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Tag-less legacy description; empty when unset
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The effective `EmitsChangedSignal` value: derived from the flag set,
    /// falling back to a user-added annotation of the same name.
    pub fn emits_changed_value(&self) -> Option<&str> {
        self.flags
            .emits_changed_value()
            .or_else(|| self.annotations.get(EMITS_CHANGED_ANNOTATION))
    }

    /// A property is cacheable iff its effective `EmitsChangedSignal` value
    /// is `"true"` or `"const"`. An `"invalidates"` declaration alone is not
    /// cacheable: peers learn that the value changed but never learn the new
    /// value.
    pub fn cacheable(&self) -> bool {
        matches!(self.emits_changed_value(), Some("true") | Some("const"))
    }

    /// Annotation name/value pairs derived from the flag set.
    pub fn derived_annotations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.flags
            .emits_changed_value()
            .map(|v| (EMITS_CHANGED_ANNOTATION, v))
            .into_iter()
    }

    /// All annotations in enumeration order: the derived change-notification
    /// annotation first, then user-added annotations in insertion order.
    pub fn all_annotations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.derived_annotations().chain(self.annotations.iter())
    }

    /// Exact-name annotation lookup across derived and stored annotations.
    pub fn get_annotation(&self, name: &str) -> Option<&str> {
        self.all_annotations()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Count-then-fill enumeration of all annotations.
    pub fn get_annotations(&self, out: Option<&mut [(String, String)]>) -> usize {
        fill_pairs(self.all_annotations(), out)
    }

    pub(crate) fn add_annotation(&mut self, name: &str, value: &str) -> bool {
        if self.derived_annotations().any(|(n, _)| n == name) {
            return false;
        }
        self.annotations.try_insert(name, value)
    }

    /// True when the property carries description text.
    pub(crate) fn has_description_text(&self) -> bool {
        !self.description.is_empty() || self.annotations.has_doc_string()
    }
}
