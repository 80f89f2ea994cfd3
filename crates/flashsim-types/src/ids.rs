//! Counter-backed identifier newtypes.
//!
//! Identity in the simulator is a plain monotonically increasing integer
//! handed out by the `IdGenerator` in `flashsim-core`. Wrapping the raw
//! value in a distinct type per counter prevents an event id from being
//! compared against an application I/O id at compile time.
//!
//! Fresh values come from the generator. [`EventId::from_raw`] exists for
//! restoring recorded traces and for tests.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around [`u64`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw counter value.
            pub const fn from_raw(value: u64) -> Self {
                Self(value)
            }

            /// Return the raw counter value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Globally unique, creation-ordered identity of a single event instance.
    ///
    /// Every event ever created in a run gets a distinct value, including
    /// derived children and internally generated sub-operations.
    EventId
}

define_id! {
    /// Identity of the originating application-level request.
    ///
    /// Shared by every event derived from the same application I/O, which is
    /// how internal maintenance work is attributed back to its cause.
    ApplicationIoId
}

/// Opaque, non-owning handle to caller-held payload data.
///
/// The event core never dereferences, copies, or frees what this handle
/// refers to. Callers typically use it as a key into their own buffer arena
/// or slab. Handles are deliberately not serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadHandle(u64);

impl PayloadHandle {
    /// Wrap a caller-defined key.
    pub const fn new(key: u64) -> Self {
        Self(key)
    }

    /// Return the caller-defined key.
    pub const fn key(self) -> u64 {
        self.0
    }
}
