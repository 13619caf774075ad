//! Crossbus interface descriptions - the IDL layer of the message bus
//!
//! This crate statically describes the methods, signals, and properties a
//! remote-invocable bus object exposes, and renders that description into a
//! canonical introspection XML document consumed by peers. Everything the
//! marshaling, routing, and security layers decide downstream hangs off this
//! metadata: member signatures gate argument marshaling, access-permission
//! strings gate authorization, and per-member routing flags gate message
//! delivery.
//!
//! ## Lifecycle
//!
//! An [`InterfaceDescription`] is created empty, populated through the
//! `add_*`/`set_*` API, then frozen with
//! [`activate`](InterfaceDescription::activate):
//!
//! ```rust
//! use crossbus_iface::{InterfaceDescription, MemberFlags, PropAccess, SecurityPolicy};
//!
//! let mut iface = InterfaceDescription::new("com.example.Demo", SecurityPolicy::Inherit);
//! iface.add_method("Ping", "s", "s", &["in", "out"], MemberFlags::NONE, "")?;
//! iface.add_property("Counter", "i", PropAccess::READ)?;
//! iface.set_description_language("en")?;
//! iface.set_member_description_for_language("Ping", "Pings the service", "en")?;
//! iface.activate();
//!
//! let xml = iface.introspect(0, Some("en"), None);
//! assert!(xml.contains("<method name=\"Ping\">"));
//! # Ok::<(), crossbus_iface::IfaceError>(())
//! ```
//!
//! After activation the value is logically immutable and safe for
//! unsynchronized concurrent reads; only queries, introspection, and
//! translator attachment remain legal. [`InterfaceBuilder`] offers the same
//! construction as a consuming builder whose `build()` activates.
//!
//! ## What this crate does not do
//!
//! Signature strings are opaque tokens validated by the marshaling layer;
//! bus attachment, transports, authentication handshakes, and session
//! management are external collaborators that consume frozen descriptions or
//! supply a [`Translator`].

pub mod annotations;
pub mod errors;
pub mod interface;
mod introspect;
pub mod member;
pub mod property;
pub mod signature;
pub mod translator;

pub use annotations::{AnnotationMap, DOC_STRING, SECURE};
pub use errors::{IfaceError, Result};
pub use interface::{InterfaceBuilder, InterfaceDescription, SecurityPolicy};
pub use member::{Member, MemberFlags, MemberKind};
pub use property::{PropAccess, Property, PropertyFlags, EMITS_CHANGED_ANNOTATION};
pub use signature::Signature;
pub use translator::Translator;
