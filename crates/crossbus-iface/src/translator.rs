//! Translator capability for locale-specific introspection text
//!
//! A translator is owned by the caller and merely associated with an
//! interface description, or passed per introspection call. This crate never
//! inspects how a translation is produced; it treats the translator as a
//! synchronous pure function from (source language, target language, key) to
//! optional text.

use std::sync::Arc;

/// External capability resolving a lookup key and target language to display
/// text.
///
/// When a translator is associated with an interface, the tag-less legacy
/// description of each entity is treated as a lookup key rather than display
/// text: during description resolution the key is handed to the translator
/// together with the requested language.
pub trait Translator: Send + Sync {
    /// Resolve `key` into text in `target_language`.
    ///
    /// `source_language` is the language the key itself is written in (the
    /// interface's declared description language; may be empty). Returns
    /// `None` when no translation is available.
    fn translate(
        &self,
        source_language: &str,
        target_language: &str,
        key: &str,
    ) -> Option<String>;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(
        &self,
        source_language: &str,
        target_language: &str,
        key: &str,
    ) -> Option<String> {
        (**self).translate(source_language, target_language, key)
    }
}

impl<T: Translator + ?Sized> Translator for Arc<T> {
    fn translate(
        &self,
        source_language: &str,
        target_language: &str,
        key: &str,
    ) -> Option<String> {
        (**self).translate(source_language, target_language, key)
    }
}
