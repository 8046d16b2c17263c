//! Schema resolution across an inheritance chain.
//!
//! [`Schema::resolve`] folds class-level [`Declarations`] from the most
//! distant ancestor down to the class itself. Resolution is pure: the result
//! depends only on the declarations, so callers are free to memoize it per
//! class.

use crate::decl::{AttrDecl, Declarations, Getter, Setter};
use canopy_types::{Value, merged};
use indexmap::IndexMap;
use std::fmt;

/// The merged declaration of one attribute.
pub struct Attribute<H> {
    default: Option<Value>,
    getter: Option<Getter<H>>,
    setter: Option<Setter<H>>,
    read_only: bool,
}

impl<H> Attribute<H> {
    fn empty() -> Self {
        Self {
            default: None,
            getter: None,
            setter: None,
            read_only: false,
        }
    }

    /// Folds one level's declaration over this resolved attribute.
    ///
    /// Present fields override; absent fields keep the ancestor's. A plain
    /// object default is merged over a plain object ancestor default, any
    /// other default replaces it.
    fn apply(&mut self, decl: &AttrDecl<H>) {
        let (value, getter, setter, read_only) = match decl {
            AttrDecl::Value(v) => (Some(v), None, None, None),
            AttrDecl::Spec(s) => (
                s.value.as_ref(),
                s.getter.as_ref(),
                s.setter.as_ref(),
                s.read_only,
            ),
        };

        if let Some(value) = value {
            self.default = Some(match (&self.default, value) {
                (Some(Value::Object(prev)), Value::Object(next)) => Value::Object(merged(prev, next)),
                _ => value.clone(),
            });
        }
        if let Some(getter) = getter {
            self.getter = Some(getter.clone());
        }
        if let Some(setter) = setter {
            self.setter = Some(setter.clone());
        }
        if let Some(read_only) = read_only {
            self.read_only = read_only;
        }
    }

    /// The class-level default, if any level declared one.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[must_use]
    pub fn getter(&self) -> Option<&Getter<H>> {
        self.getter.as_ref()
    }

    #[must_use]
    pub fn setter(&self) -> Option<&Setter<H>> {
        self.setter.as_ref()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// A getter with neither a stored default nor a setter: recomputed on
    /// every read and never held in the value store.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.default.is_none() && self.getter.is_some() && self.setter.is_none()
    }
}

impl<H> fmt::Debug for Attribute<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("default", &self.default)
            .field("has_getter", &self.getter.is_some())
            .field("has_setter", &self.setter.is_some())
            .field("read_only", &self.read_only)
            .finish()
    }
}

/// A merged attribute schema, shared read-only by every instance of a class.
pub struct Schema<H> {
    attributes: IndexMap<String, Attribute<H>>,
}

impl<H> Schema<H> {
    /// A schema with no attributes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            attributes: IndexMap::new(),
        }
    }

    /// Resolves the chain `levels`, ordered from the most distant ancestor
    /// to the class itself.
    ///
    /// Attribute order is first-declaration order across the chain.
    /// Malformed declarations are accepted as they are.
    pub fn resolve<'a, I>(levels: I) -> Self
    where
        I: IntoIterator<Item = &'a Declarations<H>>,
        H: 'a,
    {
        let mut schema = Self::empty();
        for level in levels {
            for (name, decl) in level.iter() {
                schema
                    .attributes
                    .entry(name.to_string())
                    .or_insert_with(Attribute::empty)
                    .apply(decl);
            }
        }
        schema
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Attribute<H>> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Whether `name` is declared with a setter.
    #[must_use]
    pub fn has_setter(&self, name: &str) -> bool {
        self.get(name).is_some_and(|a| a.setter.is_some())
    }

    /// Whether `name` is declared read-only.
    #[must_use]
    pub fn is_read_only(&self, name: &str) -> bool {
        self.get(name).is_some_and(|a| a.read_only)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute<H>)> {
        self.attributes.iter().map(|(n, a)| (n.as_str(), a))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<H> Default for Schema<H> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<H> fmt::Debug for Schema<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
