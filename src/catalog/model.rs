//! Catalog record types.
//!
//! These mirror the resource hierarchy of the imaging service:
//!
//! ```text
//! Collection ─┬─ Experiment ──── Channel
//!             │       │
//!             │       └── CoordinateFrame (shared, referenced by name)
//! ```
//!
//! All records are read-only once loaded. The parser only ever sees a
//! [`ResolvedChannel`], the joined view of one channel and its parents.

use serde::{Deserialize, Serialize};

use crate::error::Axis;

// =============================================================================
// Collection
// =============================================================================

/// Top-level grouping of experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Numeric identifier, used in lookup keys
    pub id: u64,

    /// Unique collection name
    pub name: String,

    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Coordinate Frame
// =============================================================================

/// Physical unit of a voxel edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoxelUnit {
    Nanometers,
    Micrometers,
    Millimeters,
    Centimeters,
}

/// Bounding box and voxel geometry of an experiment's volume at
/// native (resolution 0) scale.
///
/// Extents are half-open: `[x_start, x_stop)` and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFrame {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,

    pub x_start: u64,
    pub x_stop: u64,
    pub y_start: u64,
    pub y_stop: u64,
    pub z_start: u64,
    pub z_stop: u64,

    pub x_voxel_size: f64,
    pub y_voxel_size: f64,
    pub z_voxel_size: f64,
    pub voxel_unit: VoxelUnit,
}

impl CoordinateFrame {
    /// Native extent `(start, stop)` along a spatial axis.
    ///
    /// Returns `None` for [`Axis::Time`], which is not part of the frame.
    pub fn extent(&self, axis: Axis) -> Option<(u64, u64)> {
        match axis {
            Axis::X => Some((self.x_start, self.x_stop)),
            Axis::Y => Some((self.y_start, self.y_stop)),
            Axis::Z => Some((self.z_start, self.z_stop)),
            Axis::Time => None,
        }
    }

    /// Voxel edge length along a spatial axis.
    pub fn voxel_size(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::X => Some(self.x_voxel_size),
            Axis::Y => Some(self.y_voxel_size),
            Axis::Z => Some(self.z_voxel_size),
            Axis::Time => None,
        }
    }

    /// Check the structural invariants of the frame.
    pub fn validate(&self) -> Result<(), String> {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if let Some((start, stop)) = self.extent(axis) {
                if stop <= start {
                    return Err(format!(
                        "{} extent [{}, {}) is empty",
                        axis, start, stop
                    ));
                }
            }
            if let Some(size) = self.voxel_size(axis) {
                if !size.is_finite() || size <= 0.0 {
                    return Err(format!("{} voxel size must be positive, got {}", axis, size));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Experiment
// =============================================================================

/// How an experiment's resolution pyramid downsamples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum HierarchyMethod {
    /// Every axis halves at each resolution step.
    Isotropic,

    /// x/y halve at every step; z stops halving past `break_resolution`.
    Anisotropic { break_resolution: u32 },
}

impl HierarchyMethod {
    /// Number of halvings applied to `axis` at `resolution`.
    pub fn downsample_shift(&self, axis: Axis, resolution: u32) -> u32 {
        match (self, axis) {
            (HierarchyMethod::Anisotropic { break_resolution }, Axis::Z) => {
                resolution.min(*break_resolution)
            }
            _ => resolution,
        }
    }
}

/// A single imaging experiment within a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: u64,
    pub name: String,

    /// Parent collection name (filled in from the enclosing collection on load)
    #[serde(default)]
    pub collection: String,

    /// Coordinate frame name
    pub coord_frame: String,

    #[serde(default)]
    pub description: String,

    /// Number of levels in the resolution pyramid (>= 1)
    pub num_hierarchy_levels: u32,

    pub hierarchy: HierarchyMethod,

    /// Largest valid time sample index
    #[serde(default)]
    pub max_time_sample: u64,
}

impl Experiment {
    pub fn validate(&self) -> Result<(), String> {
        if self.num_hierarchy_levels == 0 {
            return Err("num_hierarchy_levels must be at least 1".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Channel
// =============================================================================

/// Voxel datatype stored in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelDatatype {
    Uint8,
    Uint16,
    Uint64,
}

/// A data channel within an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    pub name: String,

    /// Parent experiment name (filled in from the enclosing experiment on load)
    #[serde(default)]
    pub experiment: String,

    #[serde(default)]
    pub description: String,

    pub datatype: ChannelDatatype,
}

// =============================================================================
// Resolved view
// =============================================================================

/// A channel joined with its experiment, collection and coordinate frame.
///
/// This is the only catalog data the address parser reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedChannel {
    pub collection: Collection,
    pub experiment: Experiment,
    pub channel: Channel,
    pub coord_frame: CoordinateFrame,
}
