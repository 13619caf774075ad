//! Method and signal descriptors
//!
//! A [`Member`] describes one method call or signal of an interface. Routing
//! hints (sessioncast, sessionless, unicast, global broadcast) and the
//! no-reply/deprecated markers are stored once, in [`MemberFlags`]; the
//! equivalent wire annotations and the boolean accessors are both derived
//! from that single representation on demand.

use crate::annotations::{fill_pairs, AnnotationMap};
use crate::signature::Signature;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Annotation name marking a method call as expecting no reply.
pub const NO_REPLY_ANNOTATION: &str = "org.freedesktop.DBus.Method.NoReply";
/// Annotation name marking a member as deprecated.
pub const DEPRECATED_ANNOTATION: &str = "org.freedesktop.DBus.Deprecated";
/// Annotation name classifying a signal as sessioncast.
pub const SESSIONCAST_ANNOTATION: &str = "org.alljoyn.Bus.Signal.Sessioncast";
/// Annotation name classifying a signal as sessionless.
pub const SESSIONLESS_ANNOTATION: &str = "org.alljoyn.Bus.Signal.Sessionless";
/// Annotation name classifying a signal as unicast.
pub const UNICAST_ANNOTATION: &str = "org.alljoyn.Bus.Signal.Unicast";
/// Annotation name classifying a signal as global broadcast.
pub const GLOBAL_BROADCAST_ANNOTATION: &str = "org.alljoyn.Bus.Signal.GlobalBroadcast";
/// Annotation name carrying a member's access-permission requirement string.
pub const ACCESS_PERMS_ANNOTATION: &str = "org.alljoyn.Bus.Member.AccessPermissions";

/// The kind of a member: a callable method or an emitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    /// A method call with optional input and output arguments
    MethodCall,
    /// A signal; signals carry input arguments only
    Signal,
}

/// Declarative flags attached to a member at construction time.
///
/// This set is the single source of truth for the flag/annotation dual
/// representation: [`Member::derived_annotations`] and the
/// `is_*` accessors both read from here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFlags {
    /// Method calls marked no-reply expect no response message
    pub no_reply: bool,
    /// Member is deprecated and may disappear in a future revision
    pub deprecated: bool,
    /// Signal is delivered to every participant of the emitting session
    pub sessioncast: bool,
    /// Signal is delivered outside any session
    pub sessionless: bool,
    /// Signal is delivered to a single recipient
    pub unicast: bool,
    /// Signal is broadcast beyond the local segment
    pub global_broadcast: bool,
}

impl MemberFlags {
    /// No flags set. The legacy signal-registration form defaults to this.
    pub const NONE: Self = Self {
        no_reply: false,
        deprecated: false,
        sessioncast: false,
        sessionless: false,
        unicast: false,
        global_broadcast: false,
    };

    /// Set the no-reply flag
    pub fn with_no_reply(mut self) -> Self {
        self.no_reply = true;
        self
    }

    /// Set the deprecated flag
    pub fn with_deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Set the sessioncast routing flag
    pub fn with_sessioncast(mut self) -> Self {
        self.sessioncast = true;
        self
    }

    /// Set the sessionless routing flag
    pub fn with_sessionless(mut self) -> Self {
        self.sessionless = true;
        self
    }

    /// Set the unicast routing flag
    pub fn with_unicast(mut self) -> Self {
        self.unicast = true;
        self
    }

    /// Set the global-broadcast routing flag
    pub fn with_global_broadcast(mut self) -> Self {
        self.global_broadcast = true;
        self
    }
}

/// Description of one method or signal exposed by an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub(crate) kind: MemberKind,
    pub(crate) name: String,
    pub(crate) input_signature: Signature,
    pub(crate) output_signature: Signature,
    pub(crate) arg_names: Vec<String>,
    pub(crate) flags: MemberFlags,
    pub(crate) annotations: AnnotationMap,
    pub(crate) arg_annotations: IndexMap<String, AnnotationMap>,
    pub(crate) arg_descriptions: IndexMap<String, String>,
    pub(crate) access_perms: String,
    pub(crate) description: String,
}

impl Member {
    pub(crate) fn new(
        kind: MemberKind,
        name: impl Into<String>,
        input_signature: Signature,
        output_signature: Signature,
        arg_names: &[&str],
        flags: MemberFlags,
        access_perms: impl Into<String>,
    ) -> Self {
        // Signals never carry output arguments.
        let output_signature = match kind {
            MemberKind::Signal => Signature::empty(),
            MemberKind::MethodCall => output_signature,
        };
        Self {
            kind,
            name: name.into(),
            input_signature,
            output_signature,
            arg_names: arg_names.iter().map(|n| (*n).to_owned()).collect(),
            flags,
            annotations: AnnotationMap::new(),
            arg_annotations: IndexMap::new(),
            arg_descriptions: IndexMap::new(),
            access_perms: access_perms.into(),
            description: String::new(),
        }
    }

    /// Member kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Member name, unique within the owning interface's member namespace
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signature of the input arguments
    pub fn input_signature(&self) -> &Signature {
        &self.input_signature
    }

    /// Signature of the output arguments; always empty for a signal
    pub fn output_signature(&self) -> &Signature {
        &self.output_signature
    }

    /// Argument names, positionally aligned with the concatenation of input
    /// then output signature elements
    pub fn arg_names(&self) -> &[String] {
        &self.arg_names
    }

    /// The declarative flag set
    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    /// Authorization requirement string, empty when unrestricted
    pub fn access_permissions(&self) -> &str {
        &self.access_perms
    }

    /// Tag-less legacy description (a translator lookup key when a translator
    /// is in play); empty when unset
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True for signal members
    pub fn is_signal(&self) -> bool {
        self.kind == MemberKind::Signal
    }

    /// True for method-call members
    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::MethodCall
    }

    /// True when this member is a sessioncast signal
    pub fn is_sessioncast_signal(&self) -> bool {
        self.is_signal() && self.flags.sessioncast
    }

    /// True when this member is a sessionless signal
    pub fn is_sessionless_signal(&self) -> bool {
        self.is_signal() && self.flags.sessionless
    }

    /// True when this member is a unicast signal
    pub fn is_unicast_signal(&self) -> bool {
        self.is_signal() && self.flags.unicast
    }

    /// True when this member is a global-broadcast signal
    pub fn is_global_broadcast_signal(&self) -> bool {
        self.is_signal() && self.flags.global_broadcast
    }

    /// True when this member is a no-reply method call
    pub fn is_no_reply(&self) -> bool {
        self.is_method() && self.flags.no_reply
    }

    /// True when this member is deprecated
    pub fn is_deprecated(&self) -> bool {
        self.flags.deprecated
    }

    /// Annotation name/value pairs derived from the flag set.
    ///
    /// These precede user-added annotations in every enumeration and shadow
    /// them in lookups, keeping the two representations consistent without
    /// storing the facts twice.
    pub fn derived_annotations(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut derived: Vec<(&str, &str)> = Vec::new();
        if self.is_no_reply() {
            derived.push((NO_REPLY_ANNOTATION, "true"));
        }
        if self.flags.deprecated {
            derived.push((DEPRECATED_ANNOTATION, "true"));
        }
        if self.is_sessioncast_signal() {
            derived.push((SESSIONCAST_ANNOTATION, "true"));
        }
        if self.is_sessionless_signal() {
            derived.push((SESSIONLESS_ANNOTATION, "true"));
        }
        if self.is_unicast_signal() {
            derived.push((UNICAST_ANNOTATION, "true"));
        }
        if self.is_global_broadcast_signal() {
            derived.push((GLOBAL_BROADCAST_ANNOTATION, "true"));
        }
        derived.into_iter()
    }

    /// All annotations in enumeration order: derived flag annotations first,
    /// then user-added annotations in insertion order.
    pub fn all_annotations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.derived_annotations().chain(self.annotations.iter())
    }

    /// Exact-name annotation lookup across derived and stored annotations.
    pub fn get_annotation(&self, name: &str) -> Option<&str> {
        self.all_annotations()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Count-then-fill enumeration of all annotations. `None` returns the
    /// total count; a buffer is filled in enumeration order up to its length
    /// and the number written is returned.
    pub fn get_annotations(&self, out: Option<&mut [(String, String)]>) -> usize {
        fill_pairs(self.all_annotations(), out)
    }

    /// Annotation lookup on one argument. Unknown argument names are
    /// absence, not an error.
    pub fn get_arg_annotation(&self, arg_name: &str, name: &str) -> Option<&str> {
        self.arg_annotations.get(arg_name)?.get(name)
    }

    /// Count-then-fill enumeration of one argument's annotations. An unknown
    /// argument has zero annotations.
    pub fn get_arg_annotations(
        &self,
        arg_name: &str,
        out: Option<&mut [(String, String)]>,
    ) -> usize {
        match self.arg_annotations.get(arg_name) {
            Some(map) => fill_pairs(map.iter(), out),
            None => 0,
        }
    }

    /// Tag-less legacy description of one argument; `None` when unset.
    pub fn arg_description(&self, arg_name: &str) -> Option<&str> {
        self.arg_descriptions
            .get(arg_name)
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }

    pub(crate) fn add_annotation(&mut self, name: &str, value: &str) -> bool {
        if self.derived_annotations().any(|(n, _)| n == name) {
            return false;
        }
        self.annotations.try_insert(name, value)
    }

    pub(crate) fn add_arg_annotation(&mut self, arg_name: &str, name: &str, value: &str) -> bool {
        self.arg_annotations
            .entry(arg_name.to_owned())
            .or_default()
            .try_insert(name, value)
    }

    /// True when the member or any of its arguments carries description text.
    pub(crate) fn has_description_text(&self) -> bool {
        !self.description.is_empty()
            || self.annotations.has_doc_string()
            || self.arg_descriptions.values().any(|d| !d.is_empty())
            || self.arg_annotations.values().any(AnnotationMap::has_doc_string)
    }
}
