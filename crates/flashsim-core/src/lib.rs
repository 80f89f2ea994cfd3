//! Event model for the FlashSim SSD simulator.
//!
//! An [`Event`] is the unit of work that flows through the simulated device:
//! command issue, bus transfer, erase, merge, garbage collection, and mapping
//! maintenance are all represented as events. Schedulers, translators, and
//! the bus model communicate only by passing events, so global timing
//! statistics and causal attribution depend on the bookkeeping done here.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `flashsim-config.yaml` and
//!   device geometry validation.
//! - [`identity`] -- [`IdGenerator`], the pair of monotonic identity counters.
//! - [`context`] -- [`SimulationContext`], identity plus geometry for one run.
//! - [`event`] -- The [`Event`] record, its derivation rules, and its
//!   diagnostic trace line.
//!
//! # Failure Model
//!
//! Invariant violations (negative start time, out-of-range logical address,
//! wrong address granularity) indicate a corrupted simulation setup. Every
//! check has a fallible `try_` form returning [`EventError`]; the plain form
//! logs the violation and panics. Adding a non-positive time delta is not an
//! error and is silently ignored.
//!
//! # Usage
//!
//! ```
//! use flashsim_core::{DeviceGeometry, Event, SimulationContext};
//! use flashsim_types::{Address, EventType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let context = SimulationContext::new(DeviceGeometry::new(10, 100)?);
//!
//! let mut write = Event::try_new(&context, EventType::Write, 100, 1, 0.0)?;
//! write.try_set_address(Address::page(0, 0, 0, 3, 12))?;
//! write.incr_bus_wait_time(2.5);
//! write.incr_time_taken(200.0);
//!
//! // A garbage collection pass relocating the same data keeps the lineage.
//! let mut relocation = write.derive(&context);
//! relocation.set_garbage_collection_op(true);
//! assert_eq!(relocation.application_io_id(), write.application_io_id());
//! assert_ne!(relocation.id(), write.id());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod event;
pub mod identity;

// Re-export primary types at crate root.
pub use config::{ConfigError, DeviceGeometry, SimulationConfig};
pub use context::SimulationContext;
pub use event::Event;
pub use identity::IdGenerator;

use flashsim_types::{AddressValidity, EventType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Invariant violations detected while building or annotating an event.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// The start time is negative or not finite.
    #[error("invalid start time {start_time}: must be a finite value >= 0")]
    NegativeStartTime {
        /// The rejected start time.
        start_time: f64,
    },

    /// The logical address lies outside the device's addressable range.
    #[error("invalid logical address, too big: {logical_address} (limit {limit})")]
    LogicalAddressOutOfRange {
        /// The rejected logical address.
        logical_address: u64,
        /// Exclusive upper bound (`addressable_block_count * block_size`).
        limit: u64,
    },

    /// A read- or write-class event was given a non-page address.
    #[error("{event_type:?} events need a page address, got {actual:?} granularity")]
    AddressGranularity {
        /// The type of the event being annotated.
        event_type: EventType,
        /// Granularity of the rejected address.
        actual: AddressValidity,
    },
}
