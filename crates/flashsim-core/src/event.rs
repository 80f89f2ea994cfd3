//! The [`Event`] record.
//!
//! An event is created once per application I/O with [`Event::new`], or once
//! per internally spawned sub-operation with [`Event::derive`]. It is then
//! mutated in place as it moves through the simulated pipeline: the
//! translator resolves its address, the bus and device stages accumulate
//! time, and maintenance code annotates it with attribution flags.
//!
//! # Timing
//!
//! Four clocks are tracked, all in simulated microseconds:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `start_time` | When the operation was issued |
//! | `os_wait_time` | Queueing in the host/OS stage |
//! | `bus_wait_time` | Queueing for bus arbitration |
//! | `time_taken` | Service time accumulated by whichever stage holds the event |
//!
//! Accumulators only grow. Every `incr_*` method ignores non-positive
//! deltas so stages can report elapsed time unconditionally.
//!
//! # Derivation
//!
//! [`Event::derive`] is the copy constructor used when one event spawns
//! another (a garbage collection pass deriving reads, writes, and erases
//! from an original request). The child gets a fresh [`EventId`] but keeps
//! the parent's [`ApplicationIoId`], so maintenance work stays attributable.
//! `os_wait_time`, the payload, and all addresses are not carried over.

use std::io;

use flashsim_types::{Address, ApplicationIoId, EventId, EventType, PayloadHandle};
use serde::Serialize;
use tracing::{debug, error, trace};

use crate::EventError;
use crate::context::SimulationContext;

/// Tag value meaning "no caller-assigned tag".
pub const UNSET_TAG: i32 = -1;

/// One simulated I/O or internal-maintenance operation.
#[derive(Debug, Serialize)]
pub struct Event {
    /// Operation requested.
    event_type: EventType,
    /// Logical offset requested by the originating application I/O.
    logical_address: u64,
    /// Number of addressable units covered.
    size: u32,
    /// Resolved physical address.
    address: Address,
    /// Target of a merge.
    merge_address: Option<Address>,
    /// Address being superseded by a relocation.
    replace_address: Option<Address>,
    /// Log block address used by hybrid mapping schemes.
    log_address: Option<Address>,
    /// Caller-owned data; never copied or released here.
    #[serde(skip)]
    payload: Option<PayloadHandle>,
    /// Simulated issue time.
    start_time: f64,
    /// Accumulated service time.
    time_taken: f64,
    /// Accumulated bus arbitration delay.
    bus_wait_time: f64,
    /// Accumulated host queue delay.
    os_wait_time: f64,
    /// Unique identity of this instance.
    id: EventId,
    /// Identity of the originating application request.
    application_io_id: ApplicationIoId,
    /// Placeholder that stages skip without side effects.
    noop: bool,
    /// Work done on behalf of garbage collection.
    garbage_collection_op: bool,
    /// Work done on behalf of mapping-table upkeep.
    mapping_op: bool,
    /// Direct, unmodified representation of an application request.
    original_application_io: bool,
    /// Data age bucket for garbage collection events.
    age_class: i32,
    /// Opaque caller correlation value.
    tag: i32,
}

impl Default for Event {
    /// The `NotValid` sentinel. Consumes no identity values.
    fn default() -> Self {
        Self {
            event_type: EventType::NotValid,
            logical_address: 0,
            size: 0,
            address: Address::default(),
            merge_address: None,
            replace_address: None,
            log_address: None,
            payload: None,
            start_time: 0.0,
            time_taken: 0.0,
            bus_wait_time: 0.0,
            os_wait_time: 0.0,
            id: EventId::default(),
            application_io_id: ApplicationIoId::default(),
            noop: false,
            garbage_collection_op: false,
            mapping_op: false,
            original_application_io: false,
            age_class: 0,
            tag: UNSET_TAG,
        }
    }
}

impl Event {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Create an event for a new application request.
    ///
    /// Validates the start time and the logical address against the
    /// context's geometry, then assigns a fresh [`EventId`] and a fresh
    /// [`ApplicationIoId`]. Nothing is minted if validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NegativeStartTime`] or
    /// [`EventError::LogicalAddressOutOfRange`].
    pub fn try_new(
        context: &SimulationContext,
        event_type: EventType,
        logical_address: u64,
        size: u32,
        start_time: f64,
    ) -> Result<Self, EventError> {
        check_start_time(start_time)?;
        let geometry = context.geometry();
        if !geometry.contains_logical_address(logical_address) {
            return Err(EventError::LogicalAddressOutOfRange {
                logical_address,
                limit: geometry.logical_address_limit(),
            });
        }

        let ids = context.ids();
        Ok(Self {
            event_type,
            logical_address,
            size,
            start_time,
            id: ids.next_event_id(),
            application_io_id: ids.next_application_io_id(),
            ..Self::default()
        })
    }

    /// Create an event for a new application request, aborting the run on
    /// an invariant violation.
    ///
    /// # Panics
    ///
    /// Panics if [`try_new`](Self::try_new) would return an error.
    #[track_caller]
    pub fn new(
        context: &SimulationContext,
        event_type: EventType,
        logical_address: u64,
        size: u32,
        start_time: f64,
    ) -> Self {
        fatal(Self::try_new(
            context,
            event_type,
            logical_address,
            size,
            start_time,
        ))
    }

    /// Derive a child event that stays attributed to the same application
    /// request.
    ///
    /// Copies the type, logical address, size, start time, time taken, bus
    /// wait time, flags, age class, and tag. Assigns a fresh [`EventId`];
    /// inherits the [`ApplicationIoId`]. The OS wait time, payload, and all
    /// addresses start out empty.
    ///
    /// `context` must be the run that minted `self`; the child's id comes
    /// from the same counter, so it always differs from the parent's.
    #[must_use]
    pub fn derive(&self, context: &SimulationContext) -> Self {
        let child = Self {
            event_type: self.event_type,
            logical_address: self.logical_address,
            size: self.size,
            start_time: self.start_time,
            time_taken: self.time_taken,
            bus_wait_time: self.bus_wait_time,
            id: context.ids().next_event_id(),
            application_io_id: self.application_io_id,
            noop: self.noop,
            garbage_collection_op: self.garbage_collection_op,
            mapping_op: self.mapping_op,
            original_application_io: self.original_application_io,
            age_class: self.age_class,
            tag: self.tag,
            ..Self::default()
        };
        trace!(
            parent = %self.id,
            child = %child.id,
            app_id = %self.application_io_id,
            "Derived event"
        );
        child
    }

    /// Whether this is a real operation rather than the `NotValid` sentinel.
    pub const fn is_valid(&self) -> bool {
        self.event_type.is_valid()
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Unique identity of this instance.
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Identity of the originating application request.
    pub const fn application_io_id(&self) -> ApplicationIoId {
        self.application_io_id
    }

    /// Reattribute this event to another application request.
    pub const fn set_application_io_id(&mut self, value: ApplicationIoId) {
        self.application_io_id = value;
    }

    // -----------------------------------------------------------------------
    // Operation and addressing
    // -----------------------------------------------------------------------

    /// Operation requested.
    pub const fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Change the operation type.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::AddressGranularity`] if the new type needs a
    /// page address and the already-resolved address is coarser. An
    /// unresolved address is accepted.
    pub const fn try_set_event_type(&mut self, event_type: EventType) -> Result<(), EventError> {
        if event_type.requires_page_address() && self.address.is_set() && !self.address.is_page()
        {
            return Err(EventError::AddressGranularity {
                event_type,
                actual: self.address.valid,
            });
        }
        self.event_type = event_type;
        Ok(())
    }

    /// Change the operation type, aborting the run if the resolved address
    /// no longer fits it.
    ///
    /// # Panics
    ///
    /// Panics if [`try_set_event_type`](Self::try_set_event_type) would
    /// return an error.
    #[track_caller]
    pub fn set_event_type(&mut self, event_type: EventType) {
        fatal(self.try_set_event_type(event_type));
    }

    /// Logical offset requested by the originating application I/O.
    pub const fn logical_address(&self) -> u64 {
        self.logical_address
    }

    /// Number of addressable units covered.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Resolved physical address.
    pub const fn address(&self) -> &Address {
        &self.address
    }

    /// Set the resolved physical address.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::AddressGranularity`] if this is a read- or
    /// write-class event and `address` is not page-granular.
    pub const fn try_set_address(&mut self, address: Address) -> Result<(), EventError> {
        if self.event_type.requires_page_address() && !address.is_page() {
            return Err(EventError::AddressGranularity {
                event_type: self.event_type,
                actual: address.valid,
            });
        }
        self.address = address;
        Ok(())
    }

    /// Set the resolved physical address, aborting the run on a granularity
    /// mismatch.
    ///
    /// # Panics
    ///
    /// Panics if [`try_set_address`](Self::try_set_address) would return an
    /// error.
    #[track_caller]
    pub fn set_address(&mut self, address: Address) {
        fatal(self.try_set_address(address));
    }

    /// Target of a merge, if set.
    pub const fn merge_address(&self) -> Option<&Address> {
        self.merge_address.as_ref()
    }

    /// Set the merge target.
    pub const fn set_merge_address(&mut self, address: Address) {
        self.merge_address = Some(address);
    }

    /// Address being superseded by a relocation, if set.
    pub const fn replace_address(&self) -> Option<&Address> {
        self.replace_address.as_ref()
    }

    /// Set the address being superseded.
    pub const fn set_replace_address(&mut self, address: Address) {
        self.replace_address = Some(address);
    }

    /// Log block address, if set.
    pub const fn log_address(&self) -> Option<&Address> {
        self.log_address.as_ref()
    }

    /// Set the log block address.
    pub const fn set_log_address(&mut self, address: Address) {
        self.log_address = Some(address);
    }

    // -----------------------------------------------------------------------
    // Payload
    // -----------------------------------------------------------------------

    /// Caller-owned payload handle, if attached.
    pub const fn payload(&self) -> Option<PayloadHandle> {
        self.payload
    }

    /// Attach a caller-owned payload handle, replacing any previous one.
    pub const fn set_payload(&mut self, payload: PayloadHandle) {
        self.payload = Some(payload);
    }

    /// Detach and return the payload handle.
    pub const fn take_payload(&mut self) -> Option<PayloadHandle> {
        self.payload.take()
    }

    // -----------------------------------------------------------------------
    // Timing
    // -----------------------------------------------------------------------

    /// Simulated issue time.
    pub const fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Move the issue time.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NegativeStartTime`] if `value` is negative or
    /// not finite.
    pub fn try_set_start_time(&mut self, value: f64) -> Result<(), EventError> {
        check_start_time(value)?;
        self.start_time = value;
        Ok(())
    }

    /// Move the issue time, aborting the run on an invalid value.
    ///
    /// # Panics
    ///
    /// Panics if [`try_set_start_time`](Self::try_set_start_time) would
    /// return an error.
    #[track_caller]
    pub fn set_start_time(&mut self, value: f64) {
        fatal(self.try_set_start_time(value));
    }

    /// Accumulated service time.
    pub const fn time_taken(&self) -> f64 {
        self.time_taken
    }

    /// Add service time. Non-positive deltas are ignored. Returns the new
    /// total.
    pub const fn incr_time_taken(&mut self, delta: f64) -> f64 {
        accumulate(&mut self.time_taken, delta)
    }

    /// Accumulated bus arbitration delay.
    pub const fn bus_wait_time(&self) -> f64 {
        self.bus_wait_time
    }

    /// Add bus arbitration delay. Non-positive deltas are ignored. Returns
    /// the new total.
    pub const fn incr_bus_wait_time(&mut self, delta: f64) -> f64 {
        accumulate(&mut self.bus_wait_time, delta)
    }

    /// Accumulated host queue delay.
    pub const fn os_wait_time(&self) -> f64 {
        self.os_wait_time
    }

    /// Add host queue delay. Non-positive deltas are ignored. Returns the
    /// new total.
    pub const fn incr_os_wait_time(&mut self, delta: f64) -> f64 {
        accumulate(&mut self.os_wait_time, delta)
    }

    /// `start_time + time_taken`.
    pub const fn current_time(&self) -> f64 {
        self.start_time + self.time_taken
    }

    /// When the request reached the device: `start_time + os_wait_time`.
    pub const fn ssd_submission_time(&self) -> f64 {
        self.start_time + self.os_wait_time
    }

    // -----------------------------------------------------------------------
    // Annotations
    // -----------------------------------------------------------------------

    /// Whether stages should skip this event.
    pub const fn is_noop(&self) -> bool {
        self.noop
    }

    /// Mark or unmark this event as a placeholder.
    pub const fn set_noop(&mut self, value: bool) {
        self.noop = value;
    }

    /// Whether this is garbage collection work.
    pub const fn is_garbage_collection_op(&self) -> bool {
        self.garbage_collection_op
    }

    /// Flag this event as garbage collection work.
    pub const fn set_garbage_collection_op(&mut self, value: bool) {
        self.garbage_collection_op = value;
    }

    /// Whether this is mapping-table upkeep.
    pub const fn is_mapping_op(&self) -> bool {
        self.mapping_op
    }

    /// Flag this event as mapping-table upkeep.
    pub const fn set_mapping_op(&mut self, value: bool) {
        self.mapping_op = value;
    }

    /// Whether this event is the direct representation of an application
    /// request.
    pub const fn is_original_application_io(&self) -> bool {
        self.original_application_io
    }

    /// Mark this event as the direct representation of an application
    /// request.
    pub const fn set_original_application_io(&mut self, value: bool) {
        self.original_application_io = value;
    }

    /// Data age bucket. Only meaningful for garbage collection events.
    pub const fn age_class(&self) -> i32 {
        self.age_class
    }

    /// Set the data age bucket.
    pub const fn set_age_class(&mut self, value: i32) {
        self.age_class = value;
    }

    /// Caller correlation tag, [`UNSET_TAG`] by default.
    pub const fn tag(&self) -> i32 {
        self.tag
    }

    /// Set the caller correlation tag.
    pub const fn set_tag(&mut self, value: i32) {
        self.tag = value;
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Write the diagnostic trace line, newline-terminated, to `out`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by `out`.
    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{self}")
    }

    /// Emit the event as a structured `debug` record.
    pub fn trace(&self) {
        debug!(
            id = %self.id,
            app_id = %self.application_io_id,
            event_type = %self.event_type,
            logical_address = self.logical_address,
            address = %self.address,
            start_time = self.start_time,
            os_wait_time = self.os_wait_time,
            bus_wait_time = self.bus_wait_time,
            current_time = self.current_time(),
            garbage_collection = self.garbage_collection_op,
            mapping = self.mapping_op,
            application = self.original_application_io,
            "Event"
        );
    }
}

impl core::fmt::Display for Event {
    /// `<code> <logical>\t<address>\tTime[start, os, bus, os+bus, now] ID: <id>  appID: <app>`
    /// followed by ` GC` or ` MAPPING`, ` APP`, and ` age class: <n>` for
    /// garbage collection events. Times are truncated to whole units.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let os_wait = self.os_wait_time.trunc();
        let bus_wait = self.bus_wait_time.trunc();
        write!(
            f,
            "{} {}\t{}\tTime[{}, {}, {}, {}, {}] ID: {}  appID: {}",
            self.event_type.short_code(),
            self.logical_address,
            self.address,
            self.start_time.trunc(),
            os_wait,
            bus_wait,
            os_wait + bus_wait,
            self.current_time().trunc(),
            self.id,
            self.application_io_id,
        )?;

        if self.garbage_collection_op {
            f.write_str(" GC")?;
        } else if self.mapping_op {
            f.write_str(" MAPPING")?;
        }
        if self.original_application_io {
            f.write_str(" APP")?;
        }
        if self.event_type == EventType::GarbageCollection {
            write!(f, " age class: {}", self.age_class)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const fn check_start_time(start_time: f64) -> Result<(), EventError> {
    if start_time.is_finite() && start_time >= 0.0 {
        Ok(())
    } else {
        Err(EventError::NegativeStartTime { start_time })
    }
}

const fn accumulate(total: &mut f64, delta: f64) -> f64 {
    if delta > 0.0 {
        *total += delta;
    }
    *total
}

/// Unwrap an invariant check, logging and aborting on violation.
#[track_caller]
#[allow(clippy::panic)]
fn fatal<T>(result: Result<T, EventError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!(%err, "Event invariant violated");
            panic!("{err}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use flashsim_types::AddressValidity;

    use super::*;
    use crate::config::DeviceGeometry;

    /// Geometry with a logical address range of exactly 1000.
    fn context() -> SimulationContext {
        SimulationContext::new(DeviceGeometry::new(10, 100).unwrap())
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn new_event_has_fresh_identity_and_clean_state() {
        let ctx = context();
        let event = Event::new(&ctx, EventType::Write, 100, 1, 0.0);

        assert_eq!(event.id(), EventId::from_raw(0));
        assert_eq!(event.application_io_id(), ApplicationIoId::from_raw(0));
        assert_eq!(event.event_type(), EventType::Write);
        assert_eq!(event.logical_address(), 100);
        assert_eq!(event.size(), 1);
        assert!(!event.is_noop());
        assert!(!event.is_garbage_collection_op());
        assert!(!event.is_mapping_op());
        assert!(!event.is_original_application_io());
        assert_eq!(event.age_class(), 0);
        assert_eq!(event.tag(), UNSET_TAG);
        assert!(event.payload().is_none());
        assert!(!event.address().is_set());
        assert!(approx_eq(event.time_taken(), 0.0));
        assert!(approx_eq(event.bus_wait_time(), 0.0));
        assert!(approx_eq(event.os_wait_time(), 0.0));
    }

    #[test]
    fn both_counters_advance_per_new_event() {
        let ctx = context();
        let first = Event::new(&ctx, EventType::Read, 0, 1, 0.0);
        let second = Event::new(&ctx, EventType::Read, 1, 1, 0.0);
        assert_eq!(second.id().into_inner(), first.id().into_inner() + 1);
        assert_eq!(
            second.application_io_id().into_inner(),
            first.application_io_id().into_inner() + 1
        );
    }

    #[test]
    fn logical_address_upper_bound_is_exclusive() {
        let ctx = context();
        assert!(Event::try_new(&ctx, EventType::Write, 999, 1, 0.0).is_ok());
        assert_eq!(
            Event::try_new(&ctx, EventType::Write, 1000, 1, 0.0).unwrap_err(),
            EventError::LogicalAddressOutOfRange {
                logical_address: 1000,
                limit: 1000,
            }
        );
    }

    #[test]
    fn rejected_construction_mints_nothing() {
        let ctx = context();
        let _ = Event::try_new(&ctx, EventType::Write, 5000, 1, 0.0);
        let _ = Event::try_new(&ctx, EventType::Write, 1, 1, -1.0);
        assert_eq!(ctx.ids().peek_event_id(), EventId::from_raw(0));
        assert_eq!(ctx.ids().peek_application_io_id(), ApplicationIoId::from_raw(0));
    }

    #[test]
    fn negative_and_non_finite_start_times_are_rejected() {
        let ctx = context();
        for start in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Event::try_new(&ctx, EventType::Read, 0, 1, start),
                Err(EventError::NegativeStartTime { .. })
            ));
        }
    }

    #[test]
    #[should_panic(expected = "invalid logical address")]
    fn new_aborts_on_out_of_range_address() {
        let ctx = context();
        let _ = Event::new(&ctx, EventType::Write, 1000, 1, 0.0);
    }

    #[test]
    #[should_panic(expected = "invalid start time")]
    fn new_aborts_on_negative_start_time() {
        let ctx = context();
        let _ = Event::new(&ctx, EventType::Write, 0, 1, -3.0);
    }

    #[test]
    fn default_event_is_sentinel() {
        let event = Event::default();
        assert_eq!(event.event_type(), EventType::NotValid);
        assert!(!event.is_valid());
    }

    #[test]
    fn derive_keeps_lineage_and_resets_host_state() {
        let ctx = context();
        let mut parent = Event::new(&ctx, EventType::Write, 42, 4, 10.0);
        parent.set_address(Address::page(0, 1, 0, 7, 3));
        parent.set_merge_address(Address::block(0, 1, 0, 8));
        parent.set_payload(PayloadHandle::new(77));
        parent.incr_time_taken(5.0);
        parent.incr_bus_wait_time(2.0);
        parent.incr_os_wait_time(9.0);
        parent.set_garbage_collection_op(true);
        parent.set_original_application_io(true);
        parent.set_noop(true);
        parent.set_age_class(3);
        parent.set_tag(12);

        let child = parent.derive(&ctx);

        assert_ne!(child.id(), parent.id());
        assert_eq!(child.application_io_id(), parent.application_io_id());
        assert_eq!(child.event_type(), EventType::Write);
        assert_eq!(child.logical_address(), 42);
        assert_eq!(child.size(), 4);
        assert!(approx_eq(child.start_time(), 10.0));
        assert!(approx_eq(child.time_taken(), 5.0));
        assert!(approx_eq(child.bus_wait_time(), 2.0));
        assert!(child.is_garbage_collection_op());
        assert!(child.is_original_application_io());
        assert!(child.is_noop());
        assert_eq!(child.age_class(), 3);
        assert_eq!(child.tag(), 12);

        assert!(approx_eq(child.os_wait_time(), 0.0));
        assert!(child.payload().is_none());
        assert!(!child.address().is_set());
        assert!(child.merge_address().is_none());

        // The parent still owns its payload handle.
        assert_eq!(parent.payload(), Some(PayloadHandle::new(77)));
    }

    #[test]
    fn derive_does_not_consume_application_ids() {
        let ctx = context();
        let parent = Event::new(&ctx, EventType::Read, 0, 1, 0.0);
        let _child = parent.derive(&ctx);
        assert_eq!(ctx.ids().peek_application_io_id(), ApplicationIoId::from_raw(1));
        assert_eq!(ctx.ids().peek_event_id(), EventId::from_raw(2));
    }

    #[test]
    fn increments_ignore_non_positive_deltas() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Read, 0, 1, 0.0);

        assert!(approx_eq(event.incr_time_taken(4.0), 4.0));
        assert!(approx_eq(event.incr_time_taken(-2.0), 4.0));
        assert!(approx_eq(event.incr_time_taken(0.0), 4.0));
        assert!(approx_eq(event.incr_time_taken(f64::NAN), 4.0));

        assert!(approx_eq(event.incr_bus_wait_time(-1.0), 0.0));
        assert!(approx_eq(event.incr_bus_wait_time(1.5), 1.5));

        assert!(approx_eq(event.incr_os_wait_time(0.0), 0.0));
        assert!(approx_eq(event.incr_os_wait_time(3.0), 3.0));
    }

    #[test]
    fn current_and_submission_times_track_accumulators() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Read, 0, 1, 100.0);
        assert!(approx_eq(event.current_time(), 100.0));

        event.incr_time_taken(25.0);
        event.incr_time_taken(5.5);
        assert!(approx_eq(event.current_time(), 130.5));

        event.incr_os_wait_time(7.0);
        assert!(approx_eq(event.ssd_submission_time(), 107.0));
        assert!(approx_eq(event.current_time(), 130.5));
    }

    #[test]
    fn set_start_time_accepts_zero_and_rejects_negative() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Read, 0, 1, 50.0);
        assert!(event.try_set_start_time(0.0).is_ok());
        assert!(approx_eq(event.start_time(), 0.0));
        assert!(event.try_set_start_time(-1.0).is_err());
        assert!(approx_eq(event.start_time(), 0.0));
    }

    #[test]
    fn page_class_events_reject_coarser_addresses() {
        let ctx = context();
        for event_type in [
            EventType::Read,
            EventType::ReadCommand,
            EventType::ReadTransfer,
            EventType::Write,
        ] {
            let mut event = Event::new(&ctx, event_type, 0, 1, 0.0);
            assert_eq!(
                event.try_set_address(Address::block(0, 0, 0, 1)),
                Err(EventError::AddressGranularity {
                    event_type,
                    actual: AddressValidity::Block,
                })
            );
            assert!(!event.address().is_set());
            assert!(event.try_set_address(Address::page(0, 0, 0, 1, 2)).is_ok());
        }
    }

    #[test]
    fn maintenance_events_accept_block_addresses() {
        let ctx = context();
        for event_type in [EventType::Erase, EventType::Merge, EventType::GarbageCollection] {
            let mut event = Event::new(&ctx, event_type, 0, 1, 0.0);
            let block = Address::block(1, 0, 1, 9);
            event.set_address(block);
            assert_eq!(event.address(), &block);
        }
    }

    #[test]
    #[should_panic(expected = "need a page address")]
    fn set_address_aborts_on_granularity_mismatch() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Write, 0, 1, 0.0);
        event.set_address(Address::block(0, 0, 0, 1));
    }

    #[test]
    fn retyping_checks_resolved_address() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Erase, 0, 1, 0.0);
        event.set_address(Address::block(0, 0, 0, 4));
        assert!(event.try_set_event_type(EventType::Write).is_err());
        assert_eq!(event.event_type(), EventType::Erase);

        let mut unresolved = Event::new(&ctx, EventType::Trim, 0, 1, 0.0);
        assert!(unresolved.try_set_event_type(EventType::Write).is_ok());
        assert_eq!(unresolved.event_type(), EventType::Write);
    }

    #[test]
    #[should_panic(expected = "need a page address")]
    fn set_event_type_aborts_when_address_too_coarse() {
        let ctx = context();
        let mut erase = Event::new(&ctx, EventType::Erase, 0, 1, 0.0);
        erase.set_address(Address::block(0, 0, 0, 4));
        erase.set_event_type(EventType::Write);
    }

    #[test]
    fn derived_ids_always_differ_from_parent() {
        let ctx = context();
        let parent = Event::new(&ctx, EventType::Write, 0, 1, 0.0);
        let child = parent.derive(&ctx);
        let grandchild = child.derive(&ctx);
        assert_ne!(child.id(), parent.id());
        assert_ne!(grandchild.id(), child.id());
        assert_ne!(grandchild.id(), parent.id());
    }

    #[test]
    fn payload_can_be_taken_back() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Write, 0, 1, 0.0);
        event.set_payload(PayloadHandle::new(1));
        assert_eq!(event.take_payload(), Some(PayloadHandle::new(1)));
        assert!(event.payload().is_none());
    }

    #[test]
    fn display_renders_trace_line() {
        let ctx = context();
        let mut event = Event::new(&ctx, EventType::Write, 100, 1, 10.0);
        event.set_address(Address::page(0, 1, 0, 7, 3));
        event.incr_os_wait_time(2.7);
        event.incr_bus_wait_time(3.9);
        event.incr_time_taken(20.2);
        event.set_original_application_io(true);

        assert_eq!(
            event.to_string(),
            "W 100\t(0, 1, 0, 7, 3, 5)\tTime[10, 2, 3, 5, 30] ID: 0  appID: 0 APP"
        );
    }

    #[test]
    fn display_annotates_maintenance_work() {
        let ctx = context();
        let mut gc = Event::new(&ctx, EventType::GarbageCollection, 0, 1, 0.0);
        gc.set_garbage_collection_op(true);
        gc.set_mapping_op(true);
        gc.set_age_class(2);
        let line = gc.to_string();
        assert!(line.starts_with("GC 0\t"));
        assert!(line.ends_with(" GC age class: 2"));
        assert!(!line.contains("MAPPING"));

        let mut mapping = Event::new(&ctx, EventType::Read, 0, 1, 0.0);
        mapping.set_mapping_op(true);
        assert!(mapping.to_string().ends_with(" MAPPING"));
    }

    #[test]
    fn print_writes_one_line() {
        let event = Event::default();
        let mut out = Vec::new();
        event.print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "<NOT VALID> 0\t(0, 0, 0, 0, 0, 0)\tTime[0, 0, 0, 0, 0] ID: 0  appID: 0\n"
        );
    }
}
