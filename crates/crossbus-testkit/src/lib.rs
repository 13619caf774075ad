//! Test utilities for the Crossbus workspace
//!
//! Canned translators and interface fixtures shared by unit and integration
//! tests. Nothing here is intended for production use.

use crossbus_iface::{
    InterfaceDescription, MemberFlags, PropAccess, PropertyFlags, Result, SecurityPolicy,
    Translator,
};
use indexmap::IndexMap;

/// Dictionary-backed translator: maps `(target_language, key)` to text.
#[derive(Debug, Default, Clone)]
pub struct MapTranslator {
    entries: IndexMap<(String, String), String>,
}

impl MapTranslator {
    /// Create an empty translator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a translation of `key` into `target_language`.
    pub fn with_entry(
        mut self,
        target_language: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.entries
            .insert((target_language.into(), key.into()), text.into());
        self
    }
}

impl Translator for MapTranslator {
    fn translate(
        &self,
        _source_language: &str,
        target_language: &str,
        key: &str,
    ) -> Option<String> {
        self.entries
            .get(&(target_language.to_owned(), key.to_owned()))
            .cloned()
    }
}

/// Translator that never resolves anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTranslator;

impl Translator for NullTranslator {
    fn translate(&self, _: &str, _: &str, _: &str) -> Option<String> {
        None
    }
}

/// The round-trip fixture: `com.example.Demo` with a `Ping` method, a
/// read-only `Counter` property, and an English member description. Returned
/// un-activated so tests can keep mutating it.
pub fn demo_interface() -> Result<InterfaceDescription> {
    let mut iface = InterfaceDescription::new("com.example.Demo", SecurityPolicy::Inherit);
    iface.add_method("Ping", "s", "s", &["in", "out"], MemberFlags::NONE, "")?;
    iface.add_property("Counter", "i", PropAccess::READ)?;
    iface.set_description_language("en")?;
    iface.set_member_description_for_language("Ping", "Pings the service", "en")?;
    Ok(iface)
}

/// A signal-heavy fixture exercising every routing flag and the
/// change-notification property variants.
pub fn signal_heavy_interface() -> Result<InterfaceDescription> {
    let mut iface = InterfaceDescription::new("com.example.Signals", SecurityPolicy::Required);
    iface.add_signal(
        "Sessioncast",
        "s",
        &["text"],
        MemberFlags::NONE.with_sessioncast(),
        "",
    )?;
    iface.add_signal(
        "Sessionless",
        "s",
        &["text"],
        MemberFlags::NONE.with_sessionless(),
        "",
    )?;
    iface.add_signal(
        "Unicast",
        "s",
        &["text"],
        MemberFlags::NONE.with_unicast(),
        "",
    )?;
    iface.add_signal(
        "Broadcast",
        "s",
        &["text"],
        MemberFlags::NONE.with_global_broadcast(),
        "",
    )?;
    iface.add_property_with_flags(
        "Live",
        "i",
        PropAccess::READ,
        PropertyFlags::NONE.with_emits_changed(),
    )?;
    iface.add_property_with_flags(
        "Volatile",
        "i",
        PropAccess::READ,
        PropertyFlags::NONE.with_invalidates(),
    )?;
    iface.add_property_with_flags(
        "Fixed",
        "s",
        PropAccess::READ,
        PropertyFlags::NONE.with_const(),
    )?;
    Ok(iface)
}
