//! Configuration loading and typed config structures for the FlashSim
//! simulator.
//!
//! The canonical configuration lives in `flashsim-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, a loader that reads the file, and [`GeometryConfig::validate`],
//! which turns the raw numbers into a [`DeviceGeometry`] the event core can
//! trust.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The device geometry is unusable.
    #[error("invalid device geometry: {reason}")]
    InvalidGeometry {
        /// Explanation of what is wrong with the geometry.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulator configuration.
///
/// Mirrors the structure of `flashsim-config.yaml`. All fields have
/// defaults, so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Flash device geometry.
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }
}

/// Raw flash device geometry, as written in the configuration file.
///
/// Nothing here is checked until [`validate`](Self::validate) is called.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeometryConfig {
    /// Number of flash packages in the device.
    #[serde(default = "default_packages")]
    pub packages: u64,

    /// Dies per package.
    #[serde(default = "default_dies_per_package")]
    pub dies_per_package: u64,

    /// Planes per die.
    #[serde(default = "default_planes_per_die")]
    pub planes_per_die: u64,

    /// Erase blocks per plane.
    #[serde(default = "default_blocks_per_plane")]
    pub blocks_per_plane: u64,

    /// Pages per erase block (the block size in addressable units).
    #[serde(default = "default_pages_per_block")]
    pub pages_per_block: u64,

    /// Percentage of physical blocks exposed to the host (1..=100). The
    /// remainder is over-provisioned spare area.
    #[serde(default = "default_over_provisioning_percent")]
    pub over_provisioning_percent: u64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            packages: default_packages(),
            dies_per_package: default_dies_per_package(),
            planes_per_die: default_planes_per_die(),
            blocks_per_plane: default_blocks_per_plane(),
            pages_per_block: default_pages_per_block(),
            over_provisioning_percent: default_over_provisioning_percent(),
        }
    }
}

impl GeometryConfig {
    /// Check the raw numbers and derive the addressable range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGeometry`] if any dimension is zero,
    /// the over-provisioning percentage is outside 1..=100, the products
    /// overflow, or no block would be addressable.
    pub fn validate(&self) -> Result<DeviceGeometry, ConfigError> {
        let dimensions = [
            ("packages", self.packages),
            ("dies_per_package", self.dies_per_package),
            ("planes_per_die", self.planes_per_die),
            ("blocks_per_plane", self.blocks_per_plane),
            ("pages_per_block", self.pages_per_block),
        ];
        if let Some((name, _)) = dimensions.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidGeometry {
                reason: format!("{name} must be at least 1"),
            });
        }
        if !(1..=100).contains(&self.over_provisioning_percent) {
            return Err(ConfigError::InvalidGeometry {
                reason: format!(
                    "over_provisioning_percent must be in 1..=100, got {}",
                    self.over_provisioning_percent
                ),
            });
        }

        let overflow = || ConfigError::InvalidGeometry {
            reason: "device geometry overflows u64".to_owned(),
        };
        let physical_blocks = self
            .packages
            .checked_mul(self.dies_per_package)
            .and_then(|n| n.checked_mul(self.planes_per_die))
            .and_then(|n| n.checked_mul(self.blocks_per_plane))
            .ok_or_else(overflow)?;
        let addressable_blocks = physical_blocks
            .checked_mul(self.over_provisioning_percent)
            .and_then(|n| n.checked_div(100))
            .ok_or_else(overflow)?;
        if addressable_blocks == 0 {
            return Err(ConfigError::InvalidGeometry {
                reason: "no addressable blocks after over-provisioning".to_owned(),
            });
        }

        DeviceGeometry::new(addressable_blocks, self.pages_per_block)
    }
}

/// Validated geometry facts the event core depends on.
///
/// Only the addressable block count and block size matter to events: their
/// product is the exclusive upper bound on logical addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGeometry {
    addressable_block_count: u64,
    block_size: u64,
    logical_address_limit: u64,
}

impl DeviceGeometry {
    /// Build a geometry from its two defining constants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGeometry`] if either value is zero or
    /// their product overflows.
    pub fn new(addressable_block_count: u64, block_size: u64) -> Result<Self, ConfigError> {
        if addressable_block_count == 0 || block_size == 0 {
            return Err(ConfigError::InvalidGeometry {
                reason: "addressable block count and block size must be at least 1".to_owned(),
            });
        }
        let logical_address_limit = addressable_block_count
            .checked_mul(block_size)
            .ok_or_else(|| ConfigError::InvalidGeometry {
                reason: "logical address space overflows u64".to_owned(),
            })?;
        Ok(Self {
            addressable_block_count,
            block_size,
            logical_address_limit,
        })
    }

    /// Number of blocks visible to the host.
    pub const fn addressable_block_count(&self) -> u64 {
        self.addressable_block_count
    }

    /// Pages per block.
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Exclusive upper bound on logical addresses.
    pub const fn logical_address_limit(&self) -> u64 {
        self.logical_address_limit
    }

    /// Whether `logical_address` falls inside the addressable range.
    pub const fn contains_logical_address(&self, logical_address: u64) -> bool {
        logical_address < self.logical_address_limit
    }
}

/// Logging configuration.
///
/// The library only emits `tracing` events and never installs a subscriber.
/// The embedding binary reads `level` to build its subscriber filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the host's subscriber filter (trace, debug, info, warn,
    /// error). Not consulted by this crate.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_packages() -> u64 {
    4
}

const fn default_dies_per_package() -> u64 {
    2
}

const fn default_planes_per_die() -> u64 {
    2
}

const fn default_blocks_per_plane() -> u64 {
    256
}

const fn default_pages_per_block() -> u64 {
    64
}

const fn default_over_provisioning_percent() -> u64 {
    70
}

fn default_log_level() -> String {
    "info".to_owned()
}
