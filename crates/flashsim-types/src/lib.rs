//! Shared value types for the FlashSim SSD simulator.
//!
//! Every component of the simulator (scheduler, garbage collector, address
//! translator, bus model) exchanges `Event` records from `flashsim-core`,
//! which are built from the types defined here.
//!
//! # Modules
//!
//! - [`ids`] -- Counter-backed identifier newtypes and the opaque payload handle
//! - [`enums`] -- Event type tags and address granularity levels
//! - [`address`] -- Physical flash address with a granularity classification

pub mod address;
pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use address::Address;
pub use enums::{AddressValidity, EventType};
pub use ids::{ApplicationIoId, EventId, PayloadHandle};
