//! Raw attribute declarations, one [`Declarations`] per class level.
//!
//! A declaration is either a bare default ([`AttrDecl::Value`]) or a full
//! specification ([`AttrDecl::Spec`]). The variant is chosen by the caller,
//! never sniffed from the shape of the value, so a default that happens to
//! be an object with a `value` or `setter` key is still just a default.

use canopy_types::{Result, Value};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Computes the exposed value of an attribute from its stored value.
///
/// Virtual attributes receive [`Value::Undefined`]. Getters should be pure;
/// they may read other attributes through the host.
pub type Getter<H> = Rc<dyn Fn(&H, &Value) -> Value>;

/// Transforms an incoming value into the value to store.
///
/// A setter may itself `set` other attributes on the host before returning.
pub type Setter<H> = Rc<dyn Fn(&mut H, Value) -> Result<Value>>;

/// Full declaration shape. Every field is optional; an absent field inherits
/// the ancestor's resolved field.
pub struct AttrSpec<H> {
    pub(crate) value: Option<Value>,
    pub(crate) getter: Option<Getter<H>>,
    pub(crate) setter: Option<Setter<H>>,
    pub(crate) read_only: Option<bool>,
}

impl<H> AttrSpec<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: None,
            getter: None,
            setter: None,
            read_only: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn getter<F>(mut self, f: F) -> Self
    where
        F: Fn(&H, &Value) -> Value + 'static,
    {
        self.getter = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn setter<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut H, Value) -> Result<Value> + 'static,
    {
        self.setter = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }
}

impl<H> Default for AttrSpec<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for AttrSpec<H> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            read_only: self.read_only,
        }
    }
}

// Manual Debug impl since callbacks aren't Debug
impl<H> fmt::Debug for AttrSpec<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrSpec")
            .field("value", &self.value)
            .field("has_getter", &self.getter.is_some())
            .field("has_setter", &self.setter.is_some())
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// One attribute declaration at one class level.
pub enum AttrDecl<H> {
    /// A bare default. Plain-object defaults deep-merge over the ancestor's.
    Value(Value),
    /// A full specification.
    Spec(AttrSpec<H>),
}

impl<H> Clone for AttrDecl<H> {
    fn clone(&self) -> Self {
        match self {
            AttrDecl::Value(v) => AttrDecl::Value(v.clone()),
            AttrDecl::Spec(s) => AttrDecl::Spec(s.clone()),
        }
    }
}

impl<H> fmt::Debug for AttrDecl<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrDecl::Value(v) => f.debug_tuple("Value").field(v).finish(),
            AttrDecl::Spec(s) => f.debug_tuple("Spec").field(s).finish(),
        }
    }
}

impl<H> From<AttrSpec<H>> for AttrDecl<H> {
    fn from(spec: AttrSpec<H>) -> Self {
        AttrDecl::Spec(spec)
    }
}

/// The raw, ordered declarations of a single class level.
pub struct Declarations<H> {
    entries: IndexMap<String, AttrDecl<H>>,
}

impl<H> Declarations<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Declares `name` with a bare default.
    #[must_use]
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.declare(name, AttrDecl::Value(value.into()))
    }

    /// Declares `name` with a full specification.
    #[must_use]
    pub fn spec(self, name: impl Into<String>, spec: AttrSpec<H>) -> Self {
        self.declare(name, AttrDecl::Spec(spec))
    }

    /// Declares `name`. A repeated name replaces the earlier declaration in
    /// place.
    #[must_use]
    pub fn declare(mut self, name: impl Into<String>, decl: AttrDecl<H>) -> Self {
        self.entries.insert(name.into(), decl);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrDecl<H>)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> Default for Declarations<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for Declarations<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<H> fmt::Debug for Declarations<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
