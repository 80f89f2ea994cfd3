//! Physical flash address.
//!
//! An [`Address`] names a location in the package/die/plane/block/page
//! hierarchy together with an [`AddressValidity`] saying how deep the
//! address is meaningful. Fields below the validity level are carried but
//! must not be interpreted.

use serde::{Deserialize, Serialize};

use crate::enums::AddressValidity;

/// A location in the flash hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// Package index within the device.
    pub package: u32,
    /// Die index within the package.
    pub die: u32,
    /// Plane index within the die.
    pub plane: u32,
    /// Block index within the plane.
    pub block: u32,
    /// Page index within the block.
    pub page: u32,
    /// Deepest level at which this address is meaningful.
    pub valid: AddressValidity,
}

impl Address {
    /// Build an address from explicit parts.
    pub const fn new(
        package: u32,
        die: u32,
        plane: u32,
        block: u32,
        page: u32,
        valid: AddressValidity,
    ) -> Self {
        Self {
            package,
            die,
            plane,
            block,
            page,
            valid,
        }
    }

    /// Build a page-granular address.
    pub const fn page(package: u32, die: u32, plane: u32, block: u32, page: u32) -> Self {
        Self::new(package, die, plane, block, page, AddressValidity::Page)
    }

    /// Build a block-granular address. The page field is zeroed.
    pub const fn block(package: u32, die: u32, plane: u32, block: u32) -> Self {
        Self::new(package, die, plane, block, 0, AddressValidity::Block)
    }

    /// Whether this address resolves down to a single page.
    pub const fn is_page(&self) -> bool {
        matches!(self.valid, AddressValidity::Page)
    }

    /// Whether any level of this address is meaningful.
    pub const fn is_set(&self) -> bool {
        !matches!(self.valid, AddressValidity::None)
    }

    /// Return a copy reduced to the coarser `validity` level.
    ///
    /// Fields below the new level are zeroed. Asking for a finer level than
    /// the address already has returns it unchanged.
    #[must_use]
    pub fn truncated(&self, validity: AddressValidity) -> Self {
        if validity >= self.valid {
            return *self;
        }
        let keep = |level: AddressValidity, value: u32| if validity >= level { value } else { 0 };
        Self {
            package: keep(AddressValidity::Package, self.package),
            die: keep(AddressValidity::Die, self.die),
            plane: keep(AddressValidity::Plane, self.plane),
            block: keep(AddressValidity::Block, self.block),
            page: keep(AddressValidity::Page, self.page),
            valid: validity,
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {})",
            self.package,
            self.die,
            self.plane,
            self.block,
            self.page,
            self.valid.rank()
        )
    }
}
