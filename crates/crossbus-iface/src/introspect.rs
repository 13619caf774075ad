//! Deterministic introspection XML rendering
//!
//! The renderer walks the aggregate in registry insertion order and emits a
//! self-contained interface element. Child order is fixed forever: the
//! security annotation, interface annotations, the interface description,
//! then properties, then members. Every non-core-schema fact (routing
//! flags, access permissions, security requirement, DocString text) is an
//! annotation child element, never a custom attribute, so the document
//! schema stays uniform across all annotation sources.
//!
//! Output is byte-for-byte reproducible for identical input state.

use crate::annotations::{doc_string_name, resolve_description, AnnotationMap, SECURE};
use crate::interface::InterfaceDescription;
use crate::member::{Member, ACCESS_PERMS_ANNOTATION};
use crate::property::Property;
use crate::signature::split_complete_types;
use crate::translator::Translator;
use tracing::trace;

/// Characters per indentation level below the interface element.
const INDENT_STEP: usize = 2;

pub(crate) fn render(
    iface: &InterfaceDescription,
    indent: usize,
    language: Option<&str>,
    translator: Option<&dyn Translator>,
) -> String {
    trace!(interface = %iface.name, ?language, "rendering introspection XML");

    let i0 = " ".repeat(indent);
    let i1 = " ".repeat(indent + INDENT_STEP);
    let i2 = " ".repeat(indent + 2 * INDENT_STEP);

    let mut xml = String::new();
    xml.push_str(&format!("{i0}<interface name=\"{}\">\n", escape(&iface.name)));

    if iface.is_secure() {
        push_annotation(&mut xml, &i1, SECURE, "true");
    }
    for (name, value) in iface.annotations.iter() {
        push_annotation(&mut xml, &i1, name, value);
    }
    if let Some((name, value)) = description_annotation(
        &iface.annotations,
        &iface.description,
        &iface.description_language,
        language,
        translator,
    ) {
        push_annotation(&mut xml, &i1, &name, &value);
    }

    for property in iface.properties.values() {
        render_property(&mut xml, iface, property, &i1, &i2, language, translator);
    }
    for member in iface.members.values() {
        render_member(&mut xml, iface, member, &i1, &i2, language, translator);
    }

    xml.push_str(&format!("{i0}</interface>\n"));
    xml
}

fn render_property(
    xml: &mut String,
    iface: &InterfaceDescription,
    property: &Property,
    i1: &str,
    i2: &str,
    language: Option<&str>,
    translator: Option<&dyn Translator>,
) {
    let open = format!(
        "{i1}<property name=\"{}\" type=\"{}\" access=\"{}\"",
        escape(property.name()),
        escape(property.signature().as_str()),
        property.access().as_xml_token(),
    );

    let mut children = String::new();
    for (name, value) in property.all_annotations() {
        push_annotation(&mut children, i2, name, value);
    }
    if let Some((name, value)) = description_annotation(
        &property.annotations,
        &property.description,
        &iface.description_language,
        language,
        translator,
    ) {
        push_annotation(&mut children, i2, &name, &value);
    }

    if children.is_empty() {
        xml.push_str(&open);
        xml.push_str("/>\n");
    } else {
        xml.push_str(&open);
        xml.push_str(">\n");
        xml.push_str(&children);
        xml.push_str(&format!("{i1}</property>\n"));
    }
}

fn render_member(
    xml: &mut String,
    iface: &InterfaceDescription,
    member: &Member,
    i1: &str,
    i2: &str,
    language: Option<&str>,
    translator: Option<&dyn Translator>,
) {
    let element = if member.is_signal() { "signal" } else { "method" };
    let open = format!("{i1}<{element} name=\"{}\"", escape(member.name()));

    let mut children = String::new();
    render_args(&mut children, iface, member, i2, language, translator);

    for (name, value) in member.all_annotations() {
        push_annotation(&mut children, i2, name, value);
    }
    if !member.access_permissions().is_empty() {
        push_annotation(&mut children, i2, ACCESS_PERMS_ANNOTATION, member.access_permissions());
    }
    if let Some((name, value)) = description_annotation(
        &member.annotations,
        &member.description,
        &iface.description_language,
        language,
        translator,
    ) {
        push_annotation(&mut children, i2, &name, &value);
    }

    if children.is_empty() {
        xml.push_str(&open);
        xml.push_str("/>\n");
    } else {
        xml.push_str(&open);
        xml.push_str(">\n");
        xml.push_str(&children);
        xml.push_str(&format!("{i1}</{element}>\n"));
    }
}

/// Emit the argument elements of one member: input arguments first, then
/// output arguments, each paired positionally with the member's argument
/// names. Method arguments carry a direction attribute; signal arguments are
/// undirected.
fn render_args(
    xml: &mut String,
    iface: &InterfaceDescription,
    member: &Member,
    indent: &str,
    language: Option<&str>,
    translator: Option<&dyn Translator>,
) {
    let arg_indent = format!("{indent}{}", " ".repeat(INDENT_STEP));
    let in_types = split_complete_types(member.input_signature().as_str());
    let out_types = split_complete_types(member.output_signature().as_str());
    let directed = member.is_method();

    let directions = in_types
        .iter()
        .map(|t| (*t, "in"))
        .chain(out_types.iter().map(|t| (*t, "out")));

    for (position, (arg_type, direction)) in directions.enumerate() {
        let arg_name = member.arg_names().get(position).map(String::as_str);

        let mut open = format!("{indent}<arg");
        if let Some(name) = arg_name {
            open.push_str(&format!(" name=\"{}\"", escape(name)));
        }
        open.push_str(&format!(" type=\"{}\"", escape(arg_type)));
        if directed {
            open.push_str(&format!(" direction=\"{direction}\""));
        }

        let mut children = String::new();
        if let Some(name) = arg_name {
            let empty = AnnotationMap::new();
            let annotations = member.arg_annotations.get(name).unwrap_or(&empty);
            for (ann_name, ann_value) in annotations.iter() {
                push_annotation(&mut children, &arg_indent, ann_name, ann_value);
            }
            let legacy = member
                .arg_descriptions
                .get(name)
                .map(String::as_str)
                .unwrap_or("");
            if let Some((ann_name, ann_value)) = description_annotation(
                annotations,
                legacy,
                &iface.description_language,
                language,
                translator,
            ) {
                push_annotation(&mut children, &arg_indent, &ann_name, &ann_value);
            }
        }

        if children.is_empty() {
            xml.push_str(&open);
            xml.push_str("/>\n");
        } else {
            xml.push_str(&open);
            xml.push_str(">\n");
            xml.push_str(&children);
            xml.push_str(&format!("{indent}</arg>\n"));
        }
    }
}

/// The DocString annotation to emit for a resolved description, or `None`
/// when no language was requested, nothing resolves, or the exact-tag
/// DocString is already stored (and therefore already emitted verbatim).
fn description_annotation(
    annotations: &AnnotationMap,
    legacy: &str,
    declared_language: &str,
    language: Option<&str>,
    translator: Option<&dyn Translator>,
) -> Option<(String, String)> {
    let language = language?;
    let name = doc_string_name(language);
    if annotations.contains(&name) {
        return None;
    }
    let resolved = resolve_description(annotations, legacy, declared_language, language, translator)?;
    Some((name, resolved))
}

fn push_annotation(xml: &mut String, indent: &str, name: &str, value: &str) {
    xml.push_str(&format!(
        "{indent}<annotation name=\"{}\" value=\"{}\"/>\n",
        escape(name),
        escape(value)
    ));
}

/// Escape XML-reserved characters for attribute values.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
