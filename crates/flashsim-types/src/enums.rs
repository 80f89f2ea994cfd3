//! Enumeration types for the FlashSim event core.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event Types
// ---------------------------------------------------------------------------

/// The operation an event requests.
///
/// The set is closed. [`EventType::NotValid`] is the sentinel carried by a
/// default-constructed event and must never reach an execution stage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Sentinel for an uninitialized event.
    #[default]
    NotValid,
    /// Full page read (command plus transfer).
    Read,
    /// Read command phase: the die senses the page into its register.
    ReadCommand,
    /// Read transfer phase: the register contents cross the bus.
    ReadTransfer,
    /// Page program.
    Write,
    /// Block erase.
    Erase,
    /// Block merge (log block folded into a data block).
    Merge,
    /// Host discard of a logical range.
    Trim,
    /// Garbage collection pass.
    GarbageCollection,
    /// On-die page copy that bypasses the bus.
    CopyBack,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::NotValid,
        Self::Read,
        Self::ReadCommand,
        Self::ReadTransfer,
        Self::Write,
        Self::Erase,
        Self::Merge,
        Self::Trim,
        Self::GarbageCollection,
        Self::CopyBack,
    ];

    /// Short code used in diagnostic trace lines.
    pub const fn short_code(self) -> &'static str {
        match self {
            Self::NotValid => "<NOT VALID>",
            Self::Read => "R",
            Self::ReadCommand => "C",
            Self::ReadTransfer => "T",
            Self::Write => "W",
            Self::Erase => "E",
            Self::Merge => "M",
            Self::Trim => "D",
            Self::GarbageCollection => "GC",
            Self::CopyBack => "CB",
        }
    }

    /// Whether the resolved address of this operation must be page-granular.
    pub const fn requires_page_address(self) -> bool {
        matches!(
            self,
            Self::Read | Self::ReadCommand | Self::ReadTransfer | Self::Write
        )
    }

    /// Whether this is a real operation rather than the sentinel.
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::NotValid)
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.short_code())
    }
}

// ---------------------------------------------------------------------------
// Address Granularity
// ---------------------------------------------------------------------------

/// How much of an [`Address`](crate::Address) is meaningful.
///
/// Levels are ordered from coarsest to finest: an address valid to
/// [`AddressValidity::Block`] has meaningful package, die, plane, and block
/// fields but an unspecified page.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressValidity {
    /// No field is meaningful.
    #[default]
    None,
    /// Package only.
    Package,
    /// Package and die.
    Die,
    /// Package, die, and plane.
    Plane,
    /// Down to the erase block.
    Block,
    /// Down to the page.
    Page,
}

impl AddressValidity {
    /// Numeric rank (0 for `None` through 5 for `Page`), as printed in traces.
    pub const fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Package => 1,
            Self::Die => 2,
            Self::Plane => 3,
            Self::Block => 4,
            Self::Page => 5,
        }
    }
}
