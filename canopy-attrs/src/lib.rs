//! Attribute engine for Canopy.
//!
//! Attributes are declared per class level ([`Declarations`]), folded along
//! the inheritance chain into a [`Schema`], and stored per instance in
//! [`Attributes`]. The [`AttributeHost`] trait layers the accessor
//! semantics on top:
//!
//! - **Getters and setters**: computed reads, transformed writes, and
//!   setters that fan out into other attributes
//! - **Read-only attributes**: any `set` fails with [`Error::ReadOnly`]
//! - **Deep merge**: plain-object writes merge into the stored object
//!   unless [`SetOptions::overwrite`] is set
//! - **Change tracking**: a write that changes the exposed value is
//!   announced through [`AttributeHost::notify_change`], or recorded in the
//!   pending [`ChangeSet`] when silent and replayed by
//!   [`AttributeHost::change`]
//!
//! The host decides how a [`Change`] is delivered; `canopy-component` turns
//! it into a `change:<name>` event.
//!
//! [`Error::ReadOnly`]: canopy_types::Error::ReadOnly

mod changes;
mod decl;
mod host;
mod options;
mod schema;
mod store;

pub use canopy_types::{Error, Result};
pub use changes::{Change, ChangeSet};
pub use decl::{AttrDecl, AttrSpec, Declarations, Getter, Setter};
pub use host::AttributeHost;
pub use options::SetOptions;
pub use schema::{Attribute, Schema};
pub use store::Attributes;

/// Name of the event announcing a change of `attribute`.
#[must_use]
pub fn change_event(attribute: &str) -> String {
    format!("change:{attribute}")
}
