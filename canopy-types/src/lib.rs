//! Core type definitions for Canopy.
//!
//! This crate defines the host-agnostic types shared by every other crate
//! in the workspace:
//! - [`Value`]: the dynamic attribute value (plain data plus opaque handles)
//! - [`Map`]: insertion-ordered string-keyed mapping used for plain objects
//! - [`Handle`]: an opaque, shared reference that is never cloned or merged
//! - [`ComponentId`]: time-ordered identifier for component instances
//! - [`merge`] and friends: the deep-merge rules applied to plain objects
//!
//! Nothing here knows about schemas, events or interception; those live in
//! `canopy-attrs`, `canopy-events` and `canopy-aspect`.

mod ids;
mod map;
mod merge;
mod value;

pub use ids::ComponentId;
pub use map::Map;
pub use merge::{merge, merge_value, merged};
pub use value::{Handle, Value};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the attribute engine, the interceptor and component
/// construction.
///
/// All of these are programming errors surfaced synchronously to the caller;
/// nothing in Canopy retries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A read-only attribute was the target of a `set`.
    #[error("attribute '{attribute}' is read-only")]
    ReadOnly { attribute: String },

    /// Interception or dynamic dispatch named something that is not a method.
    #[error("no such method: '{method}'")]
    NoSuchMethod { method: String },

    /// A method called by name got arguments it cannot use.
    #[error("invalid arguments to '{method}': {reason}")]
    InvalidArguments { method: String, reason: String },

    /// Construction config could not be interpreted.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::ReadOnly`].
    pub fn read_only(attribute: impl Into<String>) -> Self {
        Self::ReadOnly {
            attribute: attribute.into(),
        }
    }

    pub fn invalid_arguments(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`Error::NoSuchMethod`].
    pub fn no_such_method(method: impl Into<String>) -> Self {
        Self::NoSuchMethod {
            method: method.into(),
        }
    }
}
