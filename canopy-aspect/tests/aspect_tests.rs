use canopy_aspect::{Aspect, Hook, Interceptors, Method, method};
use canopy_types::{Error, Value};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

struct Dialog {
    methods: HashMap<&'static str, Method<Dialog>>,
    interceptors: Interceptors<Dialog>,
    counter: i64,
    log: Vec<String>,
}

impl Dialog {
    fn new() -> Self {
        let mut methods: HashMap<&'static str, Method<Dialog>> = HashMap::new();
        methods.insert(
            "show",
            method(|d: &mut Dialog, args: &[Value]| {
                d.counter += 1;
                d.log.push(format!("show({})", render(args)));
                Ok(Value::from("shown"))
            }),
        );
        methods.insert(
            "hide",
            method(|d: &mut Dialog, _: &[Value]| {
                d.counter -= 1;
                d.log.push("hide".into());
                Ok(Value::Undefined)
            }),
        );
        Self {
            methods,
            interceptors: Interceptors::new(),
            counter: 0,
            log: Vec::new(),
        }
    }
}

impl Aspect for Dialog {
    fn interceptors(&self) -> &Interceptors<Self> {
        &self.interceptors
    }

    fn interceptors_mut(&mut self) -> &mut Interceptors<Self> {
        &mut self.interceptors
    }

    fn resolve_method(&self, name: &str) -> Option<Method<Self>> {
        self.methods.get(name).cloned()
    }
}

fn render(args: &[Value]) -> String {
    args.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

fn logging(tag: &'static str, ret: Value) -> Hook<Dialog> {
    method(move |d: &mut Dialog, args: &[Value]| {
        d.log.push(format!("{tag}({})", render(args)));
        Ok(ret.clone())
    })
}

// ── before ───────────────────────────────────────────────────────

#[test]
fn before_runs_ahead_of_method_with_same_args() {
    let mut d = Dialog::new();
    d.before("show", logging("b", Value::Undefined)).unwrap();

    let ret = d.invoke("show", &[Value::from(1), Value::from("a")]).unwrap();
    assert_eq!(ret, Value::from("shown"));
    assert_eq!(d.log, vec!["b(1,a)", "show(1,a)"]);
}

#[test]
fn before_returning_false_vetoes_the_call() {
    let mut d = Dialog::new();
    d.before("show", logging("veto", Value::Bool(false))).unwrap();
    d.after("show", logging("after", Value::Undefined)).unwrap();

    let ret = d.invoke("show", &[]).unwrap();
    assert!(ret.is_undefined());
    assert_eq!(d.counter, 0);
    assert_eq!(d.log, vec!["veto()"]);
}

#[test]
fn only_literal_false_vetoes() {
    for ret in [Value::Undefined, Value::from(""), Value::from(true), Value::from(0), Value::Null] {
        let mut d = Dialog::new();
        d.before("show", logging("b", ret)).unwrap();
        d.invoke("show", &[]).unwrap();
        assert_eq!(d.counter, 1);
    }
}

#[test]
fn veto_stops_remaining_before_hooks() {
    let mut d = Dialog::new();
    d.before("show", logging("first", Value::Bool(false))).unwrap();
    d.before("show", logging("second", Value::Undefined)).unwrap();
    d.invoke("show", &[]).unwrap();
    assert_eq!(d.log, vec!["first()"]);
}

// ── after ────────────────────────────────────────────────────────

#[test]
fn after_receives_return_value_then_args() {
    let mut d = Dialog::new();
    d.after("show", logging("a", Value::from("ignored"))).unwrap();

    let ret = d.invoke("show", &[Value::from(1), Value::from(2)]).unwrap();
    assert_eq!(ret, Value::from("shown"));
    assert_eq!(d.log, vec!["show(1,2)", "a(shown,1,2)"]);
}

#[test]
fn hooks_run_in_registration_order_with_duplicates() {
    let mut d = Dialog::new();
    let hook = logging("h", Value::Undefined);
    d.before("hide", hook.clone()).unwrap();
    d.before("hide", logging("other", Value::Undefined)).unwrap();
    d.before("hide", hook).unwrap();
    d.invoke("hide", &[]).unwrap();
    assert_eq!(d.log, vec!["h()", "other()", "h()", "hide"]);
}

#[test]
fn space_separated_names_wrap_each_method() {
    let mut d = Dialog::new();
    d.after("show hide", logging("done", Value::Undefined)).unwrap();
    d.invoke("show", &[]).unwrap();
    d.invoke("hide", &[]).unwrap();
    assert_eq!(d.log, vec!["show()", "done(shown)", "hide", "done(undefined)"]);
    assert_eq!(d.interceptors().names(), vec!["hide", "show"]);
}

#[test]
fn hooks_can_mutate_the_host() {
    let mut d = Dialog::new();
    d.before(
        "show",
        method(|d: &mut Dialog, _: &[Value]| {
            d.counter += 10;
            Ok(Value::Undefined)
        }),
    )
    .unwrap();
    d.invoke("show", &[]).unwrap();
    assert_eq!(d.counter, 11);
}

#[test]
fn hooks_may_call_other_methods() {
    let mut d = Dialog::new();
    d.after(
        "show",
        method(|d: &mut Dialog, _: &[Value]| d.invoke("hide", &[])),
    )
    .unwrap();
    d.invoke("show", &[]).unwrap();
    assert_eq!(d.counter, 0);
    assert_eq!(d.log, vec!["show()", "hide"]);
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn unknown_method_fails_at_registration() {
    let mut d = Dialog::new();
    let err = d.before("fly", logging("x", Value::Undefined)).err();
    assert!(matches!(err, Some(Error::NoSuchMethod { ref method }) if method == "fly"));
}

#[test]
fn failed_registration_leaves_registry_untouched() {
    let mut d = Dialog::new();
    assert!(d.after("show fly", logging("x", Value::Undefined)).is_err());
    assert!(d.interceptors().is_empty());
}

#[test]
fn invoking_unknown_method_fails() {
    let mut d = Dialog::new();
    assert!(matches!(d.invoke("fly", &[]), Err(Error::NoSuchMethod { .. })));
}

#[test]
fn hook_error_propagates() {
    let mut d = Dialog::new();
    d.before(
        "show",
        method(|_: &mut Dialog, _: &[Value]| Err(Error::InvalidConfig("boom".into()))),
    )
    .unwrap();
    assert!(matches!(d.invoke("show", &[]), Err(Error::InvalidConfig(_))));
    assert_eq!(d.counter, 0);
}

// ── Registry ─────────────────────────────────────────────────────

#[test]
fn unwrapped_method_is_called_directly() {
    let mut d = Dialog::new();
    assert_eq!(d.invoke("show", &[]).unwrap(), Value::from("shown"));
    assert!(!d.interceptors().is_wrapped("show"));
}

#[test]
fn wrapper_keeps_first_captured_original() {
    let mut d = Dialog::new();
    d.before("show", logging("b", Value::Undefined)).unwrap();
    d.methods.insert("show", method(|_: &mut Dialog, _: &[Value]| Ok(Value::from("new"))));
    d.after("show", logging("a", Value::Undefined)).unwrap();

    assert_eq!(d.invoke("show", &[]).unwrap(), Value::from("shown"));
    let wrapper = d.interceptors().get("show").unwrap();
    assert_eq!(wrapper.before_hooks().len(), 1);
    assert_eq!(wrapper.after_hooks().len(), 1);
}

#[test]
fn clear_restores_plain_methods() {
    let mut d = Dialog::new();
    d.before("show", logging("veto", Value::Bool(false))).unwrap();
    d.interceptors_mut().clear();
    assert_eq!(d.invoke("show", &[]).unwrap(), Value::from("shown"));
}
