//! Run-scoped identity counters for events.
//!
//! Two monotonically increasing counters live here: one minting an
//! [`EventId`] for every event instance, one minting an [`ApplicationIoId`]
//! for every originating application request. Both are held in a single
//! [`IdGenerator`] that callers pass by reference to event construction,
//! so a simulation run owns its identity space instead of sharing a
//! free-floating static.
//!
//! # Concurrency
//!
//! Increments are atomic `fetch_add`s, so ids stay unique and ordered per
//! counter even if events are created from several threads. [`reset`]
//! is not synchronized with in-flight creation; sequencing it between runs
//! is the caller's job.
//!
//! [`reset`]: IdGenerator::reset

use std::sync::atomic::{AtomicU64, Ordering};

use flashsim_types::{ApplicationIoId, EventId};
use tracing::info;

/// Shared generator for event and application I/O identities.
#[derive(Debug, Default)]
pub struct IdGenerator {
    /// Next raw value handed out as an [`EventId`].
    next_event_id: AtomicU64,

    /// Next raw value handed out as an [`ApplicationIoId`].
    next_application_io_id: AtomicU64,
}

impl IdGenerator {
    /// Create a generator with both counters at zero.
    pub const fn new() -> Self {
        Self {
            next_event_id: AtomicU64::new(0),
            next_application_io_id: AtomicU64::new(0),
        }
    }

    /// Mint a fresh event identity.
    pub fn next_event_id(&self) -> EventId {
        EventId::from_raw(self.next_event_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Mint a fresh application I/O identity.
    pub fn next_application_io_id(&self) -> ApplicationIoId {
        ApplicationIoId::from_raw(self.next_application_io_id.fetch_add(1, Ordering::Relaxed))
    }

    /// The event identity the next call to [`next_event_id`] will return.
    ///
    /// [`next_event_id`]: Self::next_event_id
    pub fn peek_event_id(&self) -> EventId {
        EventId::from_raw(self.next_event_id.load(Ordering::Relaxed))
    }

    /// The application identity the next call to [`next_application_io_id`]
    /// will return.
    ///
    /// [`next_application_io_id`]: Self::next_application_io_id
    pub fn peek_application_io_id(&self) -> ApplicationIoId {
        ApplicationIoId::from_raw(self.next_application_io_id.load(Ordering::Relaxed))
    }

    /// Reset both counters to zero for a fresh, independent run.
    ///
    /// Events from a previous run that are still alive will collide with
    /// events created afterwards.
    pub fn reset(&self) {
        let events = self.next_event_id.swap(0, Ordering::Relaxed);
        let application_ios = self.next_application_io_id.swap(0, Ordering::Relaxed);
        info!(events, application_ios, "Identity counters reset");
    }
}
