//! Contract tests for the interface registries: name uniqueness, freeze
//! semantics, count-then-fill enumeration, and equality.

use assert_matches::assert_matches;
use crossbus_iface::{
    IfaceError, InterfaceDescription, MemberFlags, PropAccess, SecurityPolicy,
};
use crossbus_testkit::demo_interface;

#[test]
fn second_add_with_used_name_fails_and_preserves_original() {
    let mut iface = demo_interface().unwrap();

    let err = iface
        .add_method("Ping", "i", "u", &["x", "y"], MemberFlags::NONE.with_no_reply(), "admin")
        .unwrap_err();
    assert_matches!(err, IfaceError::MemberAlreadyExists { .. });

    let ping = iface.get_member("Ping").unwrap();
    assert_eq!(ping.input_signature().as_str(), "s");
    assert_eq!(ping.output_signature().as_str(), "s");
    assert_eq!(ping.arg_names(), &["in".to_owned(), "out".to_owned()]);
    assert!(!ping.is_no_reply());
    assert_eq!(ping.access_permissions(), "");

    let err = iface.add_property("Counter", "u", PropAccess::WRITE).unwrap_err();
    assert_matches!(err, IfaceError::PropertyAlreadyExists { .. });
    assert_eq!(iface.get_property("Counter").unwrap().signature().as_str(), "i");
    assert_eq!(iface.get_property("Counter").unwrap().access(), PropAccess::READ);
}

#[test]
fn activation_freezes_structure_and_content() {
    let mut iface = demo_interface().unwrap();
    iface.activate();
    let before = iface.clone();

    let calls: Vec<IfaceError> = vec![
        iface
            .add_method("M", "", "", &[], MemberFlags::NONE, "")
            .unwrap_err(),
        iface.add_property("P", "i", PropAccess::READ).unwrap_err(),
        iface.add_annotation("com.example.A", "v").unwrap_err(),
        iface
            .add_member_annotation("Ping", "com.example.A", "v")
            .unwrap_err(),
        iface
            .add_property_annotation("Counter", "com.example.A", "v")
            .unwrap_err(),
        iface
            .add_arg_annotation("Ping", "in", "com.example.A", "v")
            .unwrap_err(),
        iface.set_description("text").unwrap_err(),
        iface.set_description_language("fr").unwrap_err(),
        iface.set_description_for_language("text", "fr").unwrap_err(),
        iface.set_member_description("Ping", "text").unwrap_err(),
        iface
            .set_member_description_for_language("Ping", "text", "fr")
            .unwrap_err(),
        iface.set_property_description("Counter", "text").unwrap_err(),
        iface
            .set_property_description_for_language("Counter", "text", "fr")
            .unwrap_err(),
        iface.set_arg_description("Ping", "in", "text").unwrap_err(),
        iface
            .set_arg_description_for_language("Ping", "in", "text", "fr")
            .unwrap_err(),
    ];
    for err in calls {
        assert_matches!(err, IfaceError::InterfaceActivated { .. });
    }

    assert_eq!(iface, before);
    assert_eq!(iface.description_language(), "en");
}

#[test]
fn freeze_guard_fires_before_entity_lookup() {
    // The freeze guard fires before entity lookup: a frozen interface
    // reports InterfaceActivated even for unknown member names.
    let mut iface = demo_interface().unwrap();
    iface.activate();
    assert_matches!(
        iface.set_member_description("Nope", "text").unwrap_err(),
        IfaceError::InterfaceActivated { .. }
    );

    let mut open = demo_interface().unwrap();
    assert_matches!(
        open.set_member_description("Nope", "text").unwrap_err(),
        IfaceError::NoSuchMember { .. }
    );
    assert_matches!(
        open.set_property_description("Nope", "text").unwrap_err(),
        IfaceError::NoSuchProperty { .. }
    );
}

#[test]
fn count_then_fill_members() {
    let mut iface = InterfaceDescription::new("com.example.Fill", SecurityPolicy::Inherit);
    for name in ["A", "B", "C"] {
        iface
            .add_method(name, "s", "", &["x"], MemberFlags::NONE, "")
            .unwrap();
    }

    assert_eq!(iface.get_members(None), 3);

    let mut small = vec![None; 2];
    assert_eq!(iface.get_members(Some(&mut small)), 2);
    assert_eq!(small[0].unwrap().name(), "A");
    assert_eq!(small[1].unwrap().name(), "B");

    let mut large = vec![None; 5];
    assert_eq!(iface.get_members(Some(&mut large)), 3);
    assert_eq!(large[2].unwrap().name(), "C");
    assert!(large[3].is_none());
    assert!(large[4].is_none());
}

#[test]
fn count_then_fill_annotations() {
    let mut iface = InterfaceDescription::new("com.example.Ann", SecurityPolicy::Inherit);
    iface.add_annotation("com.example.One", "1").unwrap();
    iface.add_annotation("com.example.Two", "2").unwrap();

    assert_eq!(iface.get_annotations(None), 2);

    let mut buf = vec![(String::new(), String::new()); 1];
    assert_eq!(iface.get_annotations(Some(&mut buf)), 1);
    assert_eq!(buf[0], ("com.example.One".to_owned(), "1".to_owned()));
}

#[test]
fn empty_interface_counts() {
    let iface = InterfaceDescription::new("com.example.Empty", SecurityPolicy::Off);
    assert_eq!(iface.get_members(None), 0);
    assert_eq!(iface.get_properties(None), 0);
    assert!(!iface.has_properties());
    assert!(!iface.has_cacheable_properties());
    assert!(!iface.has_description());

    let mut buf = vec![None; 4];
    assert_eq!(iface.get_members(Some(&mut buf)), 0);
    assert!(buf.iter().all(Option::is_none));
}

#[test]
fn legacy_signal_form_defaults_all_flags() {
    let mut iface = InterfaceDescription::new("com.example.Legacy", SecurityPolicy::Inherit);
    iface.add_signal_legacy("Changed", "i", &["value"]).unwrap();
    let signal = iface.get_signal("Changed").unwrap();
    assert_eq!(signal.flags(), MemberFlags::NONE);
    assert!(!signal.is_sessionless_signal());
    assert!(!signal.is_sessioncast_signal());
    assert!(!signal.is_unicast_signal());
    assert!(!signal.is_global_broadcast_signal());
}

#[test]
fn sessionless_description_compat_sets_flag() {
    let mut iface = InterfaceDescription::new("com.example.Compat", SecurityPolicy::Inherit);
    iface.add_signal_legacy("Tick", "u", &["count"]).unwrap();
    iface
        .set_member_description_sessionless("Tick", "emitted each second", true)
        .unwrap();
    let tick = iface.get_signal("Tick").unwrap();
    assert!(tick.is_sessionless_signal());
    assert_eq!(tick.description(), "emitted each second");
}

#[test]
fn equality_ignores_annotations_and_iteration_order() {
    let mut a = InterfaceDescription::new("com.example.Eq", SecurityPolicy::Inherit);
    a.add_method("First", "s", "s", &["a", "b"], MemberFlags::NONE, "")
        .unwrap();
    a.add_signal("Second", "i", &["v"], MemberFlags::NONE.with_sessionless(), "")
        .unwrap();
    a.add_property("Third", "u", PropAccess::READ_WRITE).unwrap();

    let mut b = InterfaceDescription::new("com.example.Eq", SecurityPolicy::Inherit);
    b.add_property("Third", "u", PropAccess::READ_WRITE).unwrap();
    b.add_signal("Second", "i", &["v"], MemberFlags::NONE.with_sessionless(), "")
        .unwrap();
    b.add_method("First", "s", "s", &["a", "b"], MemberFlags::NONE, "")
        .unwrap();

    assert_eq!(a, b);

    // Interface-level annotations do not participate in equality.
    b.add_annotation("com.example.Extra", "x").unwrap();
    assert_eq!(a, b);

    // Member content does.
    let mut c = a.clone();
    c.add_member_annotation("First", "com.example.Extra", "x").unwrap();
    assert_ne!(a, c);
}

#[test]
fn serde_round_trip_preserves_content() {
    let mut iface = demo_interface().unwrap();
    iface.activate();

    let json = serde_json::to_string(&iface).unwrap();
    let back: InterfaceDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(back, iface);
    assert!(back.is_activated());
    assert_eq!(back.description_language(), "en");
    assert_eq!(
        back.get_member_annotation("Ping", "org.alljoyn.Bus.DocString.en"),
        Some("Pings the service")
    );
}

#[test]
fn names_are_case_sensitive_keys() {
    let mut iface = InterfaceDescription::new("com.example.Case", SecurityPolicy::Inherit);
    iface
        .add_method("ping", "", "", &[], MemberFlags::NONE, "")
        .unwrap();
    iface
        .add_method("Ping", "", "", &[], MemberFlags::NONE, "")
        .unwrap();
    assert!(iface.has_member("ping", None, None));
    assert!(iface.has_member("Ping", None, None));
}
