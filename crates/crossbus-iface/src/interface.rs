//! The interface description aggregate
//!
//! An [`InterfaceDescription`] is built by a factory, mutated through the
//! `add_*`/`set_*` API, then frozen with [`InterfaceDescription::activate`].
//! After activation every structural mutation fails with
//! [`IfaceError::InterfaceActivated`] and the value is safe for
//! unsynchronized concurrent reads; only translator attachment remains
//! permitted, since it is not content mutation.
//!
//! [`InterfaceBuilder`] layers a consuming, compile-time-enforced builder on
//! top for callers that prefer the freeze to be unrepresentable rather than
//! checked.

use crate::annotations::{doc_string_name, fill_pairs, resolve_description, AnnotationMap};
use crate::errors::{IfaceError, Result};
use crate::introspect;
use crate::member::{Member, MemberFlags, MemberKind};
use crate::property::{PropAccess, Property, PropertyFlags};
use crate::signature::Signature;
use crate::translator::Translator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Security policy of an interface, fixed at construction.
///
/// A `Required` interface only talks to authenticated peers; an interface
/// with no policy of its own inherits the policy of the objects that
/// implement it; `Off` exempts the interface even on secure objects (the
/// introspection interface itself must stay reachable, for example).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityPolicy {
    /// Inherit the security of the implementing object
    #[default]
    Inherit,
    /// End-to-end authentication is required
    Required,
    /// Security does not apply to this interface
    Off,
}

/// Static description of a message-bus interface: its methods, signals,
/// properties, annotations, and multi-language documentation.
#[derive(Clone, Serialize, Deserialize)]
pub struct InterfaceDescription {
    pub(crate) name: String,
    pub(crate) sec_policy: SecurityPolicy,
    pub(crate) activated: bool,
    pub(crate) members: IndexMap<String, Member>,
    pub(crate) properties: IndexMap<String, Property>,
    pub(crate) annotations: AnnotationMap,
    pub(crate) description: String,
    pub(crate) description_language: String,
    #[serde(skip)]
    pub(crate) translator: Option<Arc<dyn Translator>>,
}

impl InterfaceDescription {
    /// Create an empty interface with a fully qualified name and a security
    /// policy. The name is immutable afterwards.
    pub fn new(name: impl Into<String>, sec_policy: SecurityPolicy) -> Self {
        Self {
            name: name.into(),
            sec_policy,
            activated: false,
            members: IndexMap::new(),
            properties: IndexMap::new(),
            annotations: AnnotationMap::new(),
            description: String::new(),
            description_language: String::new(),
            translator: None,
        }
    }

    /// Start a consuming builder for this interface name and policy.
    pub fn builder(name: impl Into<String>, sec_policy: SecurityPolicy) -> InterfaceBuilder {
        InterfaceBuilder::new(name, sec_policy)
    }

    /// Fully qualified interface name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The security policy fixed at construction
    pub fn security_policy(&self) -> SecurityPolicy {
        self.sec_policy
    }

    /// True when the policy is [`SecurityPolicy::Required`]
    pub fn is_secure(&self) -> bool {
        self.sec_policy == SecurityPolicy::Required
    }

    /// True once [`activate`](Self::activate) has been called
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Freeze the interface. From here on only queries, introspection, and
    /// translator attachment are legal; the value may be shared freely
    /// across threads.
    pub fn activate(&mut self) {
        debug!(interface = %self.name, "interface activated");
        self.activated = true;
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.activated {
            Err(IfaceError::interface_activated(&self.name))
        } else {
            Ok(())
        }
    }

    fn member_entity(&self, member: &str) -> String {
        format!("{}.{}", self.name, member)
    }

    fn arg_entity(&self, member: &str, arg: &str) -> String {
        format!("{}.{}.{}", self.name, member, arg)
    }

    // ---- member registry ---------------------------------------------------

    /// Add a method or signal.
    ///
    /// `arg_names` aligns positionally with the concatenation of input then
    /// output signature elements. The name is the sole registry key: a
    /// second add with the same name fails regardless of signatures, and the
    /// original member is left untouched. Signals always store an empty
    /// output signature.
    pub fn add_member(
        &mut self,
        kind: MemberKind,
        name: &str,
        input_signature: impl Into<Signature>,
        output_signature: impl Into<Signature>,
        arg_names: &[&str],
        flags: MemberFlags,
        access_perms: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        if self.members.contains_key(name) {
            return Err(IfaceError::member_already_exists(&self.name, name));
        }
        let member = Member::new(
            kind,
            name,
            input_signature.into(),
            output_signature.into(),
            arg_names,
            flags,
            access_perms,
        );
        debug!(interface = %self.name, member = name, ?kind, "member added");
        self.members.insert(name.to_owned(), member);
        Ok(())
    }

    /// Add a method-call member.
    pub fn add_method(
        &mut self,
        name: &str,
        input_signature: impl Into<Signature>,
        output_signature: impl Into<Signature>,
        arg_names: &[&str],
        flags: MemberFlags,
        access_perms: &str,
    ) -> Result<()> {
        self.add_member(
            MemberKind::MethodCall,
            name,
            input_signature,
            output_signature,
            arg_names,
            flags,
            access_perms,
        )
    }

    /// Add a signal member.
    pub fn add_signal(
        &mut self,
        name: &str,
        signature: impl Into<Signature>,
        arg_names: &[&str],
        flags: MemberFlags,
        access_perms: &str,
    ) -> Result<()> {
        self.add_member(
            MemberKind::Signal,
            name,
            signature,
            Signature::empty(),
            arg_names,
            flags,
            access_perms,
        )
    }

    /// Legacy three-argument signal registration: all flags default to none,
    /// so the signal carries no routing hints. Kept for compatibility.
    pub fn add_signal_legacy(
        &mut self,
        name: &str,
        signature: impl Into<Signature>,
        arg_names: &[&str],
    ) -> Result<()> {
        self.add_signal(name, signature, arg_names, MemberFlags::NONE, "")
    }

    /// Look up a member by name.
    pub fn get_member(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Look up a member by name, methods only.
    pub fn get_method(&self, name: &str) -> Option<&Member> {
        self.members.get(name).filter(|m| m.is_method())
    }

    /// Look up a member by name, signals only.
    pub fn get_signal(&self, name: &str) -> Option<&Member> {
        self.members.get(name).filter(|m| m.is_signal())
    }

    /// Check for a member's existence. When a signature is supplied the
    /// member must also match it exactly, which is a stricter check than
    /// name-only lookup.
    pub fn has_member(&self, name: &str, in_sig: Option<&str>, out_sig: Option<&str>) -> bool {
        match self.members.get(name) {
            None => false,
            Some(m) => {
                in_sig.map_or(true, |s| m.input_signature().as_str() == s)
                    && out_sig.map_or(true, |s| m.output_signature().as_str() == s)
            }
        }
    }

    /// Count-then-fill enumeration of members in insertion order. `None`
    /// returns the total count; a buffer is filled up to its length and the
    /// number written is returned, independent of the total.
    pub fn get_members<'a>(&'a self, out: Option<&mut [Option<&'a Member>]>) -> usize {
        match out {
            None => self.members.len(),
            Some(buf) => {
                let mut written = 0;
                for (slot, member) in buf.iter_mut().zip(self.members.values()) {
                    *slot = Some(member);
                    written += 1;
                }
                written
            }
        }
    }

    /// Iterate members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    // ---- property registry -------------------------------------------------

    /// Add a property. The access bits are stored as given; zero is accepted
    /// and simply renders no access token.
    pub fn add_property(
        &mut self,
        name: &str,
        signature: impl Into<Signature>,
        access: PropAccess,
    ) -> Result<()> {
        self.add_property_with_flags(name, signature, access, PropertyFlags::NONE)
    }

    /// Add a property with change-notification flags.
    pub fn add_property_with_flags(
        &mut self,
        name: &str,
        signature: impl Into<Signature>,
        access: PropAccess,
        flags: PropertyFlags,
    ) -> Result<()> {
        self.ensure_mutable()?;
        if self.properties.contains_key(name) {
            return Err(IfaceError::property_already_exists(&self.name, name));
        }
        debug!(interface = %self.name, property = name, "property added");
        self.properties
            .insert(name.to_owned(), Property::new(name, signature.into(), access, flags));
        Ok(())
    }

    /// Look up a property by name.
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Check for a property's existence.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// True when the interface has any properties.
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }

    /// True when any property is cacheable.
    pub fn has_cacheable_properties(&self) -> bool {
        self.properties.values().any(Property::cacheable)
    }

    /// Count-then-fill enumeration of properties in insertion order.
    pub fn get_properties<'a>(&'a self, out: Option<&mut [Option<&'a Property>]>) -> usize {
        match out {
            None => self.properties.len(),
            Some(buf) => {
                let mut written = 0;
                for (slot, property) in buf.iter_mut().zip(self.properties.values()) {
                    *slot = Some(property);
                    written += 1;
                }
                written
            }
        }
    }

    /// Iterate properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    // ---- annotations -------------------------------------------------------

    /// Add an interface-level annotation.
    pub fn add_annotation(&mut self, name: &str, value: &str) -> Result<()> {
        self.ensure_mutable()?;
        if !self.annotations.try_insert(name, value) {
            return Err(IfaceError::annotation_already_exists(&self.name, name));
        }
        Ok(())
    }

    /// Exact-name interface annotation lookup.
    pub fn get_annotation(&self, name: &str) -> Option<&str> {
        self.annotations.get(name)
    }

    /// Count-then-fill enumeration of interface annotations.
    pub fn get_annotations(&self, out: Option<&mut [(String, String)]>) -> usize {
        fill_pairs(self.annotations.iter(), out)
    }

    /// Add an annotation to an existing member. Names derived from the
    /// member's flag set collide like stored ones.
    pub fn add_member_annotation(&mut self, member: &str, name: &str, value: &str) -> Result<()> {
        self.ensure_mutable()?;
        let entity = self.member_entity(member);
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        if !m.add_annotation(name, value) {
            return Err(IfaceError::annotation_already_exists(entity, name));
        }
        Ok(())
    }

    /// Annotation lookup on an existing member; `None` for unknown members.
    pub fn get_member_annotation(&self, member: &str, name: &str) -> Option<&str> {
        self.members.get(member)?.get_annotation(name)
    }

    /// Add an annotation to an existing property.
    pub fn add_property_annotation(
        &mut self,
        property: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let entity = self.member_entity(property);
        let iface = self.name.clone();
        let p = self
            .properties
            .get_mut(property)
            .ok_or_else(|| IfaceError::no_such_property(iface, property))?;
        if !p.add_annotation(name, value) {
            return Err(IfaceError::annotation_already_exists(entity, name));
        }
        Ok(())
    }

    /// Annotation lookup on an existing property; `None` for unknown
    /// properties.
    pub fn get_property_annotation(&self, property: &str, name: &str) -> Option<&str> {
        self.properties.get(property)?.get_annotation(name)
    }

    /// Add an annotation to one argument of an existing member. The argument
    /// name is free-form: signatures are opaque here, so arguments cannot be
    /// validated against them.
    pub fn add_arg_annotation(
        &mut self,
        member: &str,
        arg: &str,
        name: &str,
        value: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let entity = self.arg_entity(member, arg);
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        if !m.add_arg_annotation(arg, name, value) {
            return Err(IfaceError::annotation_already_exists(entity, name));
        }
        Ok(())
    }

    /// Annotation lookup on a member argument; `None` for unknown members or
    /// arguments.
    pub fn get_arg_annotation(&self, member: &str, arg: &str, name: &str) -> Option<&str> {
        self.members.get(member)?.get_arg_annotation(arg, name)
    }

    // ---- descriptions ------------------------------------------------------

    /// Set the tag-less legacy description of the interface. When a
    /// translator is associated this text doubles as the translator lookup
    /// key.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        self.ensure_mutable()?;
        self.description = description.to_owned();
        Ok(())
    }

    /// Tag-less legacy description; empty when unset.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declare the language of the legacy descriptions. Pre-activation only.
    pub fn set_description_language(&mut self, language: &str) -> Result<()> {
        self.ensure_mutable()?;
        self.description_language = language.to_owned();
        Ok(())
    }

    /// Declared language of the legacy descriptions; empty means untagged.
    pub fn description_language(&self) -> &str {
        &self.description_language
    }

    /// Store the interface description for one language as a DocString
    /// annotation.
    pub fn set_description_for_language(&mut self, description: &str, language: &str) -> Result<()> {
        self.ensure_mutable()?;
        if !self.annotations.try_insert(doc_string_name(language), description) {
            return Err(IfaceError::description_already_exists(&self.name, language));
        }
        Ok(())
    }

    /// Resolve the interface description for a language (exact DocString,
    /// then generalized tags, then the translator, then the legacy
    /// default-language text). `None` means no description, distinct from an
    /// empty one.
    pub fn get_description_for_language(&self, language: &str) -> Option<String> {
        resolve_description(
            &self.annotations,
            &self.description,
            &self.description_language,
            language,
            self.translator.as_deref(),
        )
    }

    /// Set the tag-less legacy description of a member.
    pub fn set_member_description(&mut self, member: &str, description: &str) -> Result<()> {
        self.ensure_mutable()?;
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        m.description = description.to_owned();
        Ok(())
    }

    /// Legacy description setter that also documents the member as a
    /// sessionless signal. Kept for compatibility; new code passes the flag
    /// to [`add_signal`](Self::add_signal).
    pub fn set_member_description_sessionless(
        &mut self,
        member: &str,
        description: &str,
        is_sessionless: bool,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        m.description = description.to_owned();
        if is_sessionless {
            m.flags.sessionless = true;
        }
        Ok(())
    }

    /// Store a member description for one language as a DocString annotation
    /// on that member.
    pub fn set_member_description_for_language(
        &mut self,
        member: &str,
        description: &str,
        language: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let entity = self.member_entity(member);
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        if !m.annotations.try_insert(doc_string_name(language), description) {
            return Err(IfaceError::description_already_exists(entity, language));
        }
        Ok(())
    }

    /// Resolve a member description for a language; `None` for unknown
    /// members or when nothing matches.
    pub fn get_member_description_for_language(
        &self,
        member: &str,
        language: &str,
    ) -> Option<String> {
        let m = self.members.get(member)?;
        resolve_description(
            &m.annotations,
            &m.description,
            &self.description_language,
            language,
            self.translator.as_deref(),
        )
    }

    /// Set the tag-less legacy description of a property.
    pub fn set_property_description(&mut self, property: &str, description: &str) -> Result<()> {
        self.ensure_mutable()?;
        let iface = self.name.clone();
        let p = self
            .properties
            .get_mut(property)
            .ok_or_else(|| IfaceError::no_such_property(iface, property))?;
        p.description = description.to_owned();
        Ok(())
    }

    /// Store a property description for one language as a DocString
    /// annotation on that property.
    pub fn set_property_description_for_language(
        &mut self,
        property: &str,
        description: &str,
        language: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let entity = self.member_entity(property);
        let iface = self.name.clone();
        let p = self
            .properties
            .get_mut(property)
            .ok_or_else(|| IfaceError::no_such_property(iface, property))?;
        if !p.annotations.try_insert(doc_string_name(language), description) {
            return Err(IfaceError::description_already_exists(entity, language));
        }
        Ok(())
    }

    /// Resolve a property description for a language.
    pub fn get_property_description_for_language(
        &self,
        property: &str,
        language: &str,
    ) -> Option<String> {
        let p = self.properties.get(property)?;
        resolve_description(
            &p.annotations,
            &p.description,
            &self.description_language,
            language,
            self.translator.as_deref(),
        )
    }

    /// Set the tag-less legacy description of a member argument.
    pub fn set_arg_description(&mut self, member: &str, arg: &str, description: &str) -> Result<()> {
        self.ensure_mutable()?;
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        m.arg_descriptions.insert(arg.to_owned(), description.to_owned());
        Ok(())
    }

    /// Store an argument description for one language as a DocString
    /// annotation on that argument.
    pub fn set_arg_description_for_language(
        &mut self,
        member: &str,
        arg: &str,
        description: &str,
        language: &str,
    ) -> Result<()> {
        self.ensure_mutable()?;
        let entity = self.arg_entity(member, arg);
        let iface = self.name.clone();
        let m = self
            .members
            .get_mut(member)
            .ok_or_else(|| IfaceError::no_such_member(iface, member))?;
        let annotations = m.arg_annotations.entry(arg.to_owned()).or_default();
        if !annotations.try_insert(doc_string_name(language), description) {
            return Err(IfaceError::description_already_exists(entity, language));
        }
        Ok(())
    }

    /// Resolve an argument description for a language.
    pub fn get_arg_description_for_language(
        &self,
        member: &str,
        arg: &str,
        language: &str,
    ) -> Option<String> {
        let m = self.members.get(member)?;
        let empty = AnnotationMap::new();
        let annotations = m.arg_annotations.get(arg).unwrap_or(&empty);
        let legacy = m.arg_descriptions.get(arg).map(String::as_str).unwrap_or("");
        resolve_description(
            annotations,
            legacy,
            &self.description_language,
            language,
            self.translator.as_deref(),
        )
    }

    /// Associate a translator. This is not content mutation and is permitted
    /// after activation; the translator is owned by the caller.
    pub fn set_description_translator(&mut self, translator: Option<Arc<dyn Translator>>) {
        self.translator = translator;
    }

    /// The associated translator, if any.
    pub fn description_translator(&self) -> Option<Arc<dyn Translator>> {
        self.translator.clone()
    }

    /// True when any entity of the interface carries a legacy description or
    /// a DocString annotation.
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
            || self.annotations.has_doc_string()
            || self.members.values().any(Member::has_description_text)
            || self.properties.values().any(Property::has_description_text)
    }

    /// The set of all available description languages: the union of every
    /// DocString language tag across the interface, members, properties and
    /// member arguments, plus the declared description language when any
    /// legacy description exists.
    pub fn description_languages(&self) -> BTreeSet<String> {
        let mut languages = BTreeSet::new();
        self.annotations.collect_doc_string_languages(&mut languages);
        for member in self.members.values() {
            member.annotations.collect_doc_string_languages(&mut languages);
            for arg_annotations in member.arg_annotations.values() {
                arg_annotations.collect_doc_string_languages(&mut languages);
            }
        }
        for property in self.properties.values() {
            property.annotations.collect_doc_string_languages(&mut languages);
        }

        let has_legacy = !self.description.is_empty()
            || self.members.values().any(|m| {
                !m.description.is_empty() || m.arg_descriptions.values().any(|d| !d.is_empty())
            })
            || self.properties.values().any(|p| !p.description.is_empty());
        if has_legacy && !self.description_language.is_empty() {
            languages.insert(self.description_language.clone());
        }
        languages
    }

    // ---- introspection -----------------------------------------------------

    /// Render the interface as a self-contained introspection XML fragment.
    ///
    /// `indent` is the number of spaces before the interface element.
    /// Descriptions are emitted only when `language` is supplied; an explicit
    /// `translator` takes precedence over the associated one. Output is
    /// byte-for-byte reproducible for identical state.
    pub fn introspect(
        &self,
        indent: usize,
        language: Option<&str>,
        translator: Option<&dyn Translator>,
    ) -> String {
        let translator = translator.or(self.translator.as_deref());
        introspect::render(self, indent, language, translator)
    }
}

impl PartialEq for InterfaceDescription {
    /// Equality covers the name, member set and property set, independent of
    /// insertion order. Interface annotations, descriptions and translator
    /// association do not participate.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && keyed_map_eq(&self.members, &other.members)
            && keyed_map_eq(&self.properties, &other.properties)
    }
}

impl Eq for InterfaceDescription {}

fn keyed_map_eq<V: PartialEq>(a: &IndexMap<String, V>, b: &IndexMap<String, V>) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
}

impl fmt::Debug for InterfaceDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceDescription")
            .field("name", &self.name)
            .field("sec_policy", &self.sec_policy)
            .field("activated", &self.activated)
            .field("members", &self.members)
            .field("properties", &self.properties)
            .field("annotations", &self.annotations)
            .field("description", &self.description)
            .field("description_language", &self.description_language)
            .field("translator", &self.translator.as_ref().map(|_| "<translator>"))
            .finish()
    }
}

/// Consuming builder over [`InterfaceDescription`]. `build()` activates, so
/// holders of the result cannot mutate by construction.
#[derive(Debug)]
pub struct InterfaceBuilder {
    iface: InterfaceDescription,
}

impl InterfaceBuilder {
    /// Start building an interface with the given name and security policy.
    pub fn new(name: impl Into<String>, sec_policy: SecurityPolicy) -> Self {
        Self {
            iface: InterfaceDescription::new(name, sec_policy),
        }
    }

    /// Add a method with no flags or access restrictions.
    pub fn method(
        mut self,
        name: &str,
        input_signature: &str,
        output_signature: &str,
        arg_names: &[&str],
    ) -> Result<Self> {
        self.iface
            .add_method(name, input_signature, output_signature, arg_names, MemberFlags::NONE, "")?;
        Ok(self)
    }

    /// Add a method with flags and an access-permission string.
    pub fn method_with(
        mut self,
        name: &str,
        input_signature: &str,
        output_signature: &str,
        arg_names: &[&str],
        flags: MemberFlags,
        access_perms: &str,
    ) -> Result<Self> {
        self.iface
            .add_method(name, input_signature, output_signature, arg_names, flags, access_perms)?;
        Ok(self)
    }

    /// Add a signal with no flags.
    pub fn signal(mut self, name: &str, signature: &str, arg_names: &[&str]) -> Result<Self> {
        self.iface.add_signal_legacy(name, signature, arg_names)?;
        Ok(self)
    }

    /// Add a signal with flags and an access-permission string.
    pub fn signal_with(
        mut self,
        name: &str,
        signature: &str,
        arg_names: &[&str],
        flags: MemberFlags,
        access_perms: &str,
    ) -> Result<Self> {
        self.iface.add_signal(name, signature, arg_names, flags, access_perms)?;
        Ok(self)
    }

    /// Add a property.
    pub fn property(mut self, name: &str, signature: &str, access: PropAccess) -> Result<Self> {
        self.iface.add_property(name, signature, access)?;
        Ok(self)
    }

    /// Add a property with change-notification flags.
    pub fn property_with(
        mut self,
        name: &str,
        signature: &str,
        access: PropAccess,
        flags: PropertyFlags,
    ) -> Result<Self> {
        self.iface.add_property_with_flags(name, signature, access, flags)?;
        Ok(self)
    }

    /// Add an interface-level annotation.
    pub fn annotation(mut self, name: &str, value: &str) -> Result<Self> {
        self.iface.add_annotation(name, value)?;
        Ok(self)
    }

    /// Set the tag-less legacy description.
    pub fn description(mut self, description: &str) -> Self {
        // Cannot fail: the builder's interface is never activated.
        let _ = self.iface.set_description(description);
        self
    }

    /// Declare the language of the legacy descriptions.
    pub fn description_language(mut self, language: &str) -> Self {
        let _ = self.iface.set_description_language(language);
        self
    }

    /// Store the interface description for one language.
    pub fn description_for_language(mut self, description: &str, language: &str) -> Result<Self> {
        self.iface.set_description_for_language(description, language)?;
        Ok(self)
    }

    /// Store a member description for one language.
    pub fn member_description_for_language(
        mut self,
        member: &str,
        description: &str,
        language: &str,
    ) -> Result<Self> {
        self.iface
            .set_member_description_for_language(member, description, language)?;
        Ok(self)
    }

    /// Store a property description for one language.
    pub fn property_description_for_language(
        mut self,
        property: &str,
        description: &str,
        language: &str,
    ) -> Result<Self> {
        self.iface
            .set_property_description_for_language(property, description, language)?;
        Ok(self)
    }

    /// Activate and return the frozen interface.
    pub fn build(mut self) -> InterfaceDescription {
        self.iface.activate();
        self.iface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn demo() -> InterfaceDescription {
        let mut iface = InterfaceDescription::new("com.example.Demo", SecurityPolicy::Inherit);
        iface
            .add_method("Ping", "s", "s", &["in", "out"], MemberFlags::NONE, "")
            .unwrap();
        iface.add_property("Counter", "i", PropAccess::READ).unwrap();
        iface
    }

    #[test]
    fn test_member_name_is_sole_key() {
        let mut iface = demo();
        let err = iface
            .add_method("Ping", "i", "i", &["a", "b"], MemberFlags::NONE, "")
            .unwrap_err();
        assert_matches!(err, IfaceError::MemberAlreadyExists { .. });
        // Original member unchanged.
        assert_eq!(iface.get_member("Ping").unwrap().input_signature().as_str(), "s");
    }

    #[test]
    fn test_member_and_property_namespaces_are_independent() {
        let mut iface = demo();
        iface.add_property("Ping", "b", PropAccess::READ_WRITE).unwrap();
        iface
            .add_signal("Counter", "i", &["value"], MemberFlags::NONE, "")
            .unwrap();
        assert!(iface.has_member("Counter", None, None));
        assert!(iface.has_property("Ping"));
    }

    #[test]
    fn test_has_member_signature_check_is_stricter() {
        let iface = demo();
        assert!(iface.has_member("Ping", None, None));
        assert!(iface.has_member("Ping", Some("s"), Some("s")));
        assert!(!iface.has_member("Ping", Some("i"), Some("s")));
        assert!(!iface.has_member("Ping", Some("s"), Some("")));
    }

    #[test]
    fn test_kind_filtered_lookups() {
        let mut iface = demo();
        iface
            .add_signal("Changed", "i", &["value"], MemberFlags::NONE, "")
            .unwrap();
        assert!(iface.get_method("Ping").is_some());
        assert!(iface.get_signal("Ping").is_none());
        assert!(iface.get_signal("Changed").is_some());
        assert!(iface.get_method("Changed").is_none());
    }

    #[test]
    fn test_activation_freezes_every_mutation() {
        let mut iface = demo();
        iface.set_description("demo interface").unwrap();
        iface.activate();
        let before = iface.clone();

        assert_matches!(
            iface.add_method("Other", "", "", &[], MemberFlags::NONE, ""),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.add_property("Other", "i", PropAccess::READ),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.add_annotation("com.example.A", "1"),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.add_member_annotation("Ping", "com.example.A", "1"),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.set_description("other"),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.set_description_language("en"),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.set_description_for_language("text", "en"),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.set_member_description_for_language("Ping", "text", "en"),
            Err(IfaceError::InterfaceActivated { .. })
        );
        assert_matches!(
            iface.set_arg_description("Ping", "in", "text"),
            Err(IfaceError::InterfaceActivated { .. })
        );

        assert_eq!(iface, before);
        assert_eq!(iface.description(), "demo interface");
    }

    #[test]
    fn test_translator_attachment_survives_activation() {
        struct Nop;
        impl Translator for Nop {
            fn translate(&self, _: &str, _: &str, _: &str) -> Option<String> {
                None
            }
        }
        let mut iface = demo();
        iface.activate();
        iface.set_description_translator(Some(Arc::new(Nop)));
        assert!(iface.description_translator().is_some());
    }

    #[test]
    fn test_annotation_operations_on_missing_entities() {
        let mut iface = demo();
        assert_matches!(
            iface.add_member_annotation("Nope", "a", "1"),
            Err(IfaceError::NoSuchMember { .. })
        );
        assert_matches!(
            iface.add_property_annotation("Nope", "a", "1"),
            Err(IfaceError::NoSuchProperty { .. })
        );
        assert_eq!(iface.get_member_annotation("Nope", "a"), None);
        assert_eq!(iface.get_arg_annotation("Ping", "nope", "a"), None);
    }

    #[test]
    fn test_duplicate_description_for_language() {
        let mut iface = demo();
        iface.set_description_for_language("first", "en").unwrap();
        assert_matches!(
            iface.set_description_for_language("second", "en"),
            Err(IfaceError::DescriptionAlreadyExists { .. })
        );
        // Tag-less legacy description never conflicts with tagged ones.
        iface.set_description("legacy").unwrap();
        assert_eq!(iface.get_description_for_language("en").as_deref(), Some("first"));
    }

    #[test]
    fn test_equality_is_order_independent() {
        let mut a = InterfaceDescription::new("com.example.Eq", SecurityPolicy::Inherit);
        a.add_method("A", "s", "", &["x"], MemberFlags::NONE, "").unwrap();
        a.add_method("B", "i", "", &["y"], MemberFlags::NONE, "").unwrap();
        a.add_property("P", "i", PropAccess::READ).unwrap();
        a.add_property("Q", "u", PropAccess::WRITE).unwrap();

        let mut b = InterfaceDescription::new("com.example.Eq", SecurityPolicy::Inherit);
        b.add_property("Q", "u", PropAccess::WRITE).unwrap();
        b.add_method("B", "i", "", &["y"], MemberFlags::NONE, "").unwrap();
        b.add_property("P", "i", PropAccess::READ).unwrap();
        b.add_method("A", "s", "", &["x"], MemberFlags::NONE, "").unwrap();

        assert_eq!(a, b);

        b.add_method("C", "", "", &[], MemberFlags::NONE, "").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_builder_builds_activated() {
        let iface = InterfaceDescription::builder("com.example.Built", SecurityPolicy::Required)
            .method("Ping", "s", "s", &["in", "out"])
            .unwrap()
            .property("Counter", "i", PropAccess::READ)
            .unwrap()
            .description_language("en")
            .build();
        assert!(iface.is_activated());
        assert!(iface.is_secure());
        assert!(iface.has_member("Ping", Some("s"), Some("s")));
    }

    #[test]
    fn test_description_languages_union() {
        let mut iface = demo();
        iface.set_description_language("de").unwrap();
        iface.set_description("Schlüssel").unwrap();
        iface.set_description_for_language("iface", "en").unwrap();
        iface
            .set_member_description_for_language("Ping", "member", "fr")
            .unwrap();
        iface
            .set_arg_description_for_language("Ping", "in", "arg", "es")
            .unwrap();
        iface
            .set_property_description_for_language("Counter", "prop", "nl")
            .unwrap();
        let languages = iface.description_languages();
        let expected: BTreeSet<String> =
            ["de", "en", "fr", "es", "nl"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(languages, expected);
    }

    #[test]
    fn test_has_description_scans_all_entities() {
        let mut iface = demo();
        assert!(!iface.has_description());
        iface.set_arg_description("Ping", "in", "the input").unwrap();
        assert!(iface.has_description());
    }
}
