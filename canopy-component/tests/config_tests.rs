mod common;

use canopy_component::{
    Aspect, AttributeHost, Class, Component, Config, Declarations, Error, Events, ListenerKey,
    Value, change_method_name,
};
use common::{Counter, Recorder, init_tracing, v};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::rc::Rc;

fn widget_class() -> Rc<Class> {
    Rc::new(
        Class::new("A")
            .attrs(
                Declarations::new()
                    .value("color", "#fff")
                    .value("size", v(json!({"width": 100, "height": 100}))),
            )
            .define("show", |c, _| {
                c.trigger("show", &[]);
                Ok(Value::Undefined)
            })
            .define("hide", |_, _| Ok(Value::Undefined)),
    )
}

// ── Listener keys ────────────────────────────────────────────────

#[test]
fn listener_keys_parse() {
    let cases = [
        ("onShow", ListenerKey::On("show".into())),
        ("onChangeColor", ListenerKey::On("change:color".into())),
        ("onChangeXY", ListenerKey::On("change:xY".into())),
        ("onChange", ListenerKey::On("change".into())),
        ("beforeShow", ListenerKey::Before("show".into())),
        ("afterHideAll", ListenerKey::After("hideAll".into())),
    ];
    for (key, expected) in cases {
        assert_eq!(ListenerKey::parse(key).unwrap(), expected, "{key}");
    }
}

#[test]
fn malformed_listener_keys_are_rejected() {
    for key in ["show", "onshow", "on", "before", "aftershow", "On", ""] {
        assert!(
            matches!(ListenerKey::parse(key), Err(Error::InvalidConfig(_))),
            "{key}"
        );
    }
}

#[test]
fn change_method_names() {
    assert_eq!(change_method_name("color"), "_onChangeColor");
    assert_eq!(change_method_name("xy"), "_onChangeXy");
    assert_eq!(change_method_name("_id"), "_onChange_id");
    assert_eq!(change_method_name("émoji"), "_onChangeÉmoji");
    assert_eq!(change_method_name(""), "_onChange");
}

// ── Config-declared listeners ────────────────────────────────────

#[test]
fn config_listeners_are_wired() {
    init_tracing();
    let counter = Counter::new();
    let config = Config::new()
        .with("color", "#f00")
        .with("size", v(json!({"width": 200})))
        .listener("onShow", counter.hook())
        .listener("afterShow", counter.hook())
        .listener("beforeShow", counter.hook())
        .listener("onChangeColor", counter.hook());
    let mut a = Component::new(&widget_class(), config).unwrap();

    a.call("show", &[]).unwrap();
    assert_eq!(counter.get(), 3);

    counter.reset();
    a.set("color", "#0f0").unwrap();
    assert_eq!(counter.get(), 1);
}

#[test]
fn config_listener_gets_change_args() {
    let seen = Recorder::new();
    let rec = seen.clone();
    let config = Config::new().listener("onChangeColor", move |_, args| {
        rec.push(args);
        Ok(Value::Undefined)
    });
    let mut a = Component::new(&widget_class(), config).unwrap();
    a.set("color", "#000").unwrap();
    assert_eq!(
        seen.calls(),
        vec![vec![Value::from("#000"), Value::from("#fff"), Value::from("color")]]
    );
}

#[test]
fn before_listener_can_veto() {
    let counter = Counter::new();
    let shown = counter.clone();
    let config = Config::new()
        .listener("beforeShow", |_, _| Ok(Value::Bool(false)))
        .listener("onShow", move |_, _| {
            shown.incr();
            Ok(Value::Undefined)
        });
    let mut a = Component::new(&widget_class(), config).unwrap();
    assert!(a.call("show", &[]).unwrap().is_undefined());
    assert_eq!(counter.get(), 0);
}

#[test]
fn hook_on_unknown_method_fails_construction() {
    let config = Config::new().listener("beforeFly", |_, _| Ok(Value::Undefined));
    let err = Component::new(&widget_class(), config).err();
    assert!(matches!(err, Some(Error::NoSuchMethod { ref method }) if method == "fly"));
}

#[test]
fn bad_listener_key_fails_construction() {
    let config = Config::new().listener("whenShown", |_, _| Ok(Value::Undefined));
    assert!(matches!(
        Component::new(&widget_class(), config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn failing_event_listener_does_not_propagate() {
    init_tracing();
    let config = Config::new().listener("onShow", |_, _| Err(Error::InvalidConfig("boom".into())));
    let mut a = Component::new(&widget_class(), config).unwrap();
    assert!(a.call("show", &[]).is_ok());
}

#[test]
fn failing_after_listener_propagates() {
    let config = Config::new().listener("afterHide", |_, _| Err(Error::InvalidConfig("boom".into())));
    let mut a = Component::new(&widget_class(), config).unwrap();
    assert!(matches!(a.call("hide", &[]), Err(Error::InvalidConfig(_))));
    assert!(a.interceptors().is_wrapped("hide"));
}

#[test]
fn listener_values_do_not_become_attributes() {
    let config = Config::new().listener("onShow", |_, _| Ok(Value::Undefined));
    let a = Component::new(&widget_class(), config).unwrap();
    assert!(a.get("onShow").is_undefined());
    assert_eq!(a.attributes().names(), vec!["color".to_string(), "size".to_string()]);
}

// ── JSON configs ─────────────────────────────────────────────────

#[test]
fn config_from_json() {
    let config = Config::from_json(r##"{"color": "#abc", "size": {"height": 5}, "extra": [1]}"##).unwrap();
    let a = Component::new(&widget_class(), config).unwrap();
    assert_eq!(a.get("color"), Value::from("#abc"));
    assert_eq!(a.get("size"), v(json!({"width": 100, "height": 5})));
    assert_eq!(a.get("extra"), v(json!([1])));
    assert!(!a.attributes().is_declared("extra"));
}

#[test]
fn config_from_json_preserves_key_order() {
    let config = Config::from_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
    let keys: Vec<&str> = config.values().keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn non_object_json_is_rejected() {
    assert!(matches!(Config::from_json("[1, 2]"), Err(Error::InvalidConfig(_))));
    assert!(matches!(Config::from_json("{"), Err(Error::Serialization(_))));
}

#[test]
fn config_accessors() {
    let mut config = Config::new().with("a", 1);
    assert_eq!(config.insert("a", 2), Some(Value::from(1)));
    assert_eq!(config.get("a"), Some(&Value::from(2)));
    assert_eq!(config.remove("a"), Some(Value::from(2)));
    assert!(config.values().is_empty());

    config.add_listener("onShow", canopy_component::method(|_, _| Ok(Value::Undefined)));
    assert_eq!(config.listener_keys().collect::<Vec<_>>(), vec!["onShow"]);
}
