//! Class definitions: single-parent inheritance, method tables, hooks and
//! the memoized attribute schema.

use crate::component::Component;
use crate::config::Config;
use canopy_aspect::Method;
use canopy_attrs::{Declarations, Schema};
use canopy_types::{Result, Value};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Runs before attributes are initialized and may rewrite the config.
pub type Initializer = Rc<dyn Fn(&mut Component, &mut Config) -> Result<()>>;

/// Runs once the component is fully constructed.
pub type Setup = Rc<dyn Fn(&mut Component) -> Result<()>>;

/// A class definition.
///
/// Classes are built once, wrapped in an `Rc` and shared by every instance
/// and every subclass. The attribute schema is resolved from the whole
/// chain on first use and cached for the lifetime of the class.
pub struct Class {
    name: String,
    parent: Option<Rc<Class>>,
    attrs: Declarations<Component>,
    methods: HashMap<String, Method<Component>>,
    initializers: Vec<Initializer>,
    setups: Vec<Setup>,
    schema: OnceCell<Rc<Schema<Component>>>,
}

impl Class {
    /// Starts a root class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            attrs: Declarations::new(),
            methods: HashMap::new(),
            initializers: Vec::new(),
            setups: Vec::new(),
            schema: OnceCell::new(),
        }
    }

    /// Starts a subclass of `self`.
    #[must_use]
    pub fn extend(self: &Rc<Self>, name: impl Into<String>) -> Class {
        let mut class = Class::new(name);
        class.parent = Some(Rc::clone(self));
        class
    }

    // ================================================================
    // Builder
    // ================================================================

    /// Sets this level's attribute declarations.
    #[must_use]
    pub fn attrs(mut self, attrs: Declarations<Component>) -> Self {
        self.attrs = attrs;
        self
    }

    /// Defines (or overrides) method `name`.
    #[must_use]
    pub fn define<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Component, &[Value]) -> Result<Value> + 'static,
    {
        self.methods.insert(name.into(), Rc::new(f));
        self
    }

    /// Adds a construction hook that runs before attribute initialization.
    ///
    /// Hooks run from the most derived class to the root, each seeing the
    /// config as left by the previous one.
    #[must_use]
    pub fn initialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Component, &mut Config) -> Result<()> + 'static,
    {
        self.initializers.push(Rc::new(f));
        self
    }

    /// Adds a hook that runs after construction, root class first.
    #[must_use]
    pub fn setup<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Component) -> Result<()> + 'static,
    {
        self.setups.push(Rc::new(f));
        self
    }

    // ================================================================
    // Queries
    // ================================================================

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The immediate ancestor, for explicit calls to an overridden method.
    #[must_use]
    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }

    /// This class followed by its ancestors, nearest first.
    pub fn ancestry(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |c| c.parent.as_deref())
    }

    /// This level's own declarations.
    #[must_use]
    pub fn declarations(&self) -> &Declarations<Component> {
        &self.attrs
    }

    /// Looks up `name`, walking up the chain until a level defines it.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&Method<Component>> {
        self.ancestry().find_map(|c| c.methods.get(name))
    }

    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Whether `self` is `other` or descends from it.
    #[must_use]
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestry().any(|c| std::ptr::eq(c, other))
    }

    /// The merged attribute schema of the whole chain, resolved once.
    pub fn schema(&self) -> Rc<Schema<Component>> {
        self.schema
            .get_or_init(|| {
                let mut levels: Vec<&Declarations<Component>> =
                    self.ancestry().map(|c| &c.attrs).collect();
                levels.reverse();
                let schema = Schema::resolve(levels);
                debug!(class = %self.name, attributes = schema.len(), "resolved attribute schema");
                Rc::new(schema)
            })
            .clone()
    }

    pub(crate) fn initializers(&self) -> Vec<Initializer> {
        self.ancestry()
            .flat_map(|c| c.initializers.iter().cloned())
            .collect()
    }

    pub(crate) fn setups(&self) -> Vec<Setup> {
        let mut levels: Vec<&Class> = self.ancestry().collect();
        levels.reverse();
        levels
            .into_iter()
            .flat_map(|c| c.setups.iter().cloned())
            .collect()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("attrs", &self.attrs.len())
            .field("methods", &methods)
            .finish_non_exhaustive()
    }
}
