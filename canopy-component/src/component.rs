//! The composed component.

use crate::class::Class;
use crate::config::{Config, ListenerKey, change_method_name};
use canopy_aspect::{Aspect, Hook, Interceptors, Method, method};
use canopy_attrs::{AttributeHost, Attributes, Change, SetOptions, change_event};
use canopy_events::{EventBus, Events, handler};
use canopy_types::{ComponentId, Error, Map, Result, Value};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// One instance of a [`Class`].
///
/// Owns its attribute store, listeners and interceptors exclusively; the
/// class (and with it the attribute schema) is shared.
pub struct Component {
    id: ComponentId,
    class: Rc<Class>,
    attrs: Attributes<Component>,
    events: EventBus<Component>,
    interceptors: Interceptors<Component>,
    destroyed: bool,
}

impl Component {
    /// Constructs an instance of `class`.
    ///
    /// In order: initializers run (most derived first) and may rewrite the
    /// config; attributes are initialized from the schema and the config
    /// values without any notification; config-declared listeners are
    /// wired; every `_onChange<Name>` method of the class is registered for
    /// `change:<name>`; setup hooks run (root first).
    pub fn new(class: &Rc<Class>, mut config: Config) -> Result<Self> {
        let mut component = Self {
            id: ComponentId::new(),
            class: Rc::clone(class),
            attrs: Attributes::new(class.schema()),
            events: EventBus::new(),
            interceptors: Interceptors::new(),
            destroyed: false,
        };

        for init in class.initializers() {
            init(&mut component, &mut config)?;
        }

        let (values, listeners) = config.into_parts();
        component.init_attrs(&values)?;
        component.wire_config_listeners(listeners)?;
        component.wire_change_methods();

        for setup in class.setups() {
            setup(&mut component)?;
        }

        debug!(
            id = %component.id,
            class = class.name(),
            attributes = component.attrs.names().len(),
            "component constructed"
        );
        Ok(component)
    }

    /// Shorthand for [`Component::new`] with an empty config.
    pub fn with_defaults(class: &Rc<Class>) -> Result<Self> {
        Self::new(class, Config::new())
    }

    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.id
    }

    #[must_use]
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// Calls method `name` through its interceptors, if any.
    ///
    /// Besides class methods, every component answers to `get`, `set`,
    /// `change` and `destroy`, and those can be wrapped like any other
    /// method. Hooks on them only see calls made by name; the typed
    /// accessors of [`AttributeHost`] are not intercepted.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Value> {
        self.invoke(name, args)
    }

    /// Destroys the component through the `destroy` method, so hooks on
    /// `destroy` run and a class may override it. Without an override this
    /// is [`Component::teardown`].
    pub fn destroy(&mut self) -> Result<()> {
        self.invoke("destroy", &[]).map(|_| ())
    }

    /// Detaches every listener and drops all attribute values and
    /// interceptors. Later calls do nothing.
    pub fn teardown(&mut self) {
        if self.destroyed {
            trace!(id = %self.id, "component already destroyed");
            return;
        }
        let listeners = self.events.len();
        self.off(None, None);
        self.attrs.clear();
        self.interceptors.clear();
        self.destroyed = true;
        debug!(id = %self.id, class = self.class.name(), listeners, "component destroyed");
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn wire_config_listeners(&mut self, listeners: Vec<(String, Hook<Component>)>) -> Result<()> {
        for (key, hook) in listeners {
            match ListenerKey::parse(&key)? {
                ListenerKey::On(event) => {
                    trace!(id = %self.id, %event, "wiring config listener");
                    self.on(&event, handler(move |c: &mut Component, args: &[Value]| {
                        if let Err(e) = hook(c, args) {
                            warn!(id = %c.id, listener = %key, error = %e, "event listener failed");
                        }
                    }));
                }
                ListenerKey::Before(method) => {
                    self.before(&method, hook)?;
                }
                ListenerKey::After(method) => {
                    self.after(&method, hook)?;
                }
            }
        }
        Ok(())
    }

    fn wire_change_methods(&mut self) {
        for attribute in self.attrs.names() {
            let method_name = change_method_name(&attribute);
            let Some(method) = self.class.method(&method_name).cloned() else {
                continue;
            };
            trace!(id = %self.id, %attribute, method = %method_name, "wiring change method");
            self.on(&change_event(&attribute), change_listener(method, method_name));
        }
    }
}

fn change_listener(method: Method<Component>, name: String) -> canopy_events::Handler<Component> {
    handler(move |c: &mut Component, args: &[Value]| {
        if let Err(e) = method(c, args) {
            warn!(id = %c.id, method = %name, error = %e, "change method failed");
        }
    })
}

// ============================================================================
// Built-in methods
// ============================================================================

/// The methods every component has. A class method of the same name
/// shadows the built-in one.
fn builtin(name: &str) -> Option<Method<Component>> {
    let found = match name {
        "get" => method(|c: &mut Component, args: &[Value]| {
            let attribute = attribute_arg("get", args)?;
            Ok(c.get(attribute))
        }),
        "set" => method(|c: &mut Component, args: &[Value]| {
            match args.first() {
                Some(Value::Object(values)) => {
                    let options = set_options("set", args.get(1))?;
                    c.set_many(values.clone(), options)?;
                }
                _ => {
                    let attribute = attribute_arg("set", args)?;
                    let value = args.get(1).cloned().unwrap_or_default();
                    let options = set_options("set", args.get(2))?;
                    c.set_with(attribute, value, options)?;
                }
            }
            Ok(Value::Undefined)
        }),
        "change" => method(|c: &mut Component, _: &[Value]| {
            c.change();
            Ok(Value::Undefined)
        }),
        "destroy" => method(|c: &mut Component, _: &[Value]| {
            c.teardown();
            Ok(Value::Undefined)
        }),
        _ => return None,
    };
    Some(found)
}

fn attribute_arg<'a>(method: &str, args: &'a [Value]) -> Result<&'a str> {
    args.first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::invalid_arguments(method, "expected an attribute name first"))
}

/// Reads `{silent, overwrite}` call options. Missing means defaults.
fn set_options(method: &str, value: Option<&Value>) -> Result<SetOptions> {
    let options: &Map = match value {
        None | Some(Value::Undefined | Value::Null) => return Ok(SetOptions::default()),
        Some(Value::Object(options)) => options,
        Some(other) => {
            return Err(Error::invalid_arguments(
                method,
                format!("options must be an object, got {other}"),
            ));
        }
    };
    let flag = |key: &str| options.get(key).and_then(Value::as_bool).unwrap_or(false);
    Ok(SetOptions::new()
        .silent(flag("silent"))
        .overwrite(flag("overwrite")))
}

impl Events for Component {
    fn event_bus(&self) -> &EventBus<Self> {
        &self.events
    }

    fn event_bus_mut(&mut self) -> &mut EventBus<Self> {
        &mut self.events
    }
}

impl Aspect for Component {
    fn interceptors(&self) -> &Interceptors<Self> {
        &self.interceptors
    }

    fn interceptors_mut(&mut self) -> &mut Interceptors<Self> {
        &mut self.interceptors
    }

    fn resolve_method(&self, name: &str) -> Option<Method<Self>> {
        self.class.method(name).cloned().or_else(|| builtin(name))
    }
}

impl AttributeHost for Component {
    fn attributes(&self) -> &Attributes<Self> {
        &self.attrs
    }

    fn attributes_mut(&mut self) -> &mut Attributes<Self> {
        &mut self.attrs
    }

    fn notify_change(&mut self, change: &Change) {
        self.trigger(&change_event(&change.attribute), &change.args());
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("class", &self.class.name())
            .field("attrs", &self.attrs)
            .field("interceptors", &self.interceptors)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
