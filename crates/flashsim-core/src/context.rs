//! Run-scoped context handed to event construction.
//!
//! A [`SimulationContext`] bundles the identity generator and the validated
//! device geometry for one simulation run. Components that create events hold
//! a shared reference to it; starting a new independent run goes through
//! [`begin_run`](SimulationContext::begin_run).

use tracing::info;

use crate::config::{ConfigError, DeviceGeometry, SimulationConfig};
use crate::identity::IdGenerator;

/// Identity space plus geometry for a single simulation run.
#[derive(Debug)]
pub struct SimulationContext {
    ids: IdGenerator,
    geometry: DeviceGeometry,
}

impl SimulationContext {
    /// Create a context with fresh counters over the given geometry.
    pub const fn new(geometry: DeviceGeometry) -> Self {
        Self {
            ids: IdGenerator::new(),
            geometry,
        }
    }

    /// Validate the configured geometry and create a context from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGeometry`] if the geometry is unusable.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry.validate()?;
        info!(
            addressable_blocks = geometry.addressable_block_count(),
            block_size = geometry.block_size(),
            logical_address_limit = geometry.logical_address_limit(),
            "Simulation context created"
        );
        Ok(Self::new(geometry))
    }

    /// The identity generator for this run.
    pub const fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// The device geometry for this run.
    pub const fn geometry(&self) -> &DeviceGeometry {
        &self.geometry
    }

    /// Start a fresh, independent run by resetting both identity counters.
    ///
    /// Any event still alive from the previous run shares its ids with
    /// events created afterwards.
    pub fn begin_run(&self) {
        info!("Beginning new simulation run");
        self.ids.reset();
    }
}
