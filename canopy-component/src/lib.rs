//! Canopy components.
//!
//! A [`Class`] bundles attribute declarations, methods and construction
//! hooks, and may extend one parent class. [`Component::new`] builds an
//! instance that composes the three capabilities of the workspace:
//!
//! - [`Events`]: `on` / `off` / `trigger`
//! - [`AttributeHost`]: `get` / `set` / `change`, announcing each change
//!   as a `change:<name>` event with `(value, previous, name)`
//! - [`Aspect`]: `before` / `after` hooks around methods called through
//!   [`Component::call`]
//!
//! ```ignore
//! let point = Rc::new(Class::new("Point").attrs(
//!     Declarations::new().value("x", 0).value("y", 0),
//! ));
//! let mut p = Component::new(&point, Config::new().with("x", 10))?;
//! p.listen("change:y", |_, args| println!("y is now {}", args[0]));
//! p.set("y", 5)?;
//! ```

mod class;
mod component;
mod config;

pub use class::{Class, Initializer, Setup};
pub use component::Component;
pub use config::{Config, ListenerKey, change_method_name};

pub use canopy_aspect::{Aspect, Hook, Method, method};
pub use canopy_attrs::{AttrDecl, AttrSpec, AttributeHost, Change, Declarations, SetOptions, change_event};
pub use canopy_events::{Events, Handler, handler};
pub use canopy_types::{ComponentId, Error, Handle, Map, Result, Value};
