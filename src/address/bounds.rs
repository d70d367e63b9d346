//! Coordinate-frame bounds checking.
//!
//! A coerced address is checked against the experiment it names:
//!
//! 1. The resolution must exist in the experiment's hierarchy.
//! 2. Each spatial range must fit inside the frame extent downsampled to
//!    that resolution.
//! 3. The time range must not run past the last time sample.
//!
//! # Downsampling
//!
//! At resolution `r` an axis extent `[start, stop)` becomes
//! `[start >> s, stop >> s)`, where `s` is the number of halvings the
//! hierarchy applies to that axis:
//!
//! | hierarchy                  | x, y | z                     |
//! |----------------------------|------|-----------------------|
//! | isotropic                  | `r`  | `r`                   |
//! | anisotropic, break `b`     | `r`  | `min(r, b)`           |
//!
//! Ranges that overlap the boundary are rejected, never clamped. Saturated
//! ranges, whose coordinates ran past `u64::MAX`, are always out of bounds.

use crate::catalog::ResolvedChannel;
use crate::error::{AddressError, Axis};

use super::coerce::{AddressShape, AxisRange, CoercedAddress};

/// Validates coerced addresses against one resolved channel.
#[derive(Debug, Clone, Copy)]
pub struct FrameValidator<'a> {
    channel: &'a ResolvedChannel,
}

impl<'a> FrameValidator<'a> {
    pub fn new(channel: &'a ResolvedChannel) -> Self {
        Self { channel }
    }

    /// Effective `[min, max)` for `axis` at `resolution`.
    ///
    /// For [`Axis::Time`] this is `[0, max_time_sample + 1)` regardless of
    /// resolution.
    pub fn effective_extent(&self, axis: Axis, resolution: u32) -> (u64, u64) {
        let Some((start, stop)) = self.channel.coord_frame.extent(axis) else {
            return (
                0,
                self.channel.experiment.max_time_sample.saturating_add(1),
            );
        };

        let shift = self
            .channel
            .experiment
            .hierarchy
            .downsample_shift(axis, resolution);

        (downsample(start, shift), downsample(stop, shift))
    }

    /// Check that `resolution` exists in the hierarchy.
    pub fn check_resolution(&self, resolution: u32) -> Result<(), AddressError> {
        let levels = self.channel.experiment.num_hierarchy_levels;
        if resolution >= levels {
            return Err(AddressError::ResolutionOutOfRange { resolution, levels });
        }
        Ok(())
    }

    /// Check one range against its effective extent.
    pub fn check_axis(
        &self,
        axis: Axis,
        range: AxisRange,
        resolution: u32,
    ) -> Result<(), AddressError> {
        let (min, max) = self.effective_extent(axis, resolution);
        if range.is_saturated() || range.start() < min || range.stop() > max {
            return Err(AddressError::OutOfBounds {
                axis,
                start: range.start(),
                stop: range.stop(),
                min,
                max,
                resolution,
            });
        }
        Ok(())
    }

    /// Run every check, failing on the first violation.
    ///
    /// Axes are checked in x, y, z, t order.
    pub fn validate(&self, address: &CoercedAddress) -> Result<(), AddressError> {
        self.check_resolution(address.resolution)?;

        for axis in [Axis::X, Axis::Y, Axis::Z, Axis::Time] {
            self.check_axis(axis, address.range(axis), address.resolution)?;
        }

        if let AddressShape::Tile { orientation, .. } = address.shape {
            let orthogonal = orientation.orthogonal_axis();
            debug_assert_eq!(
                address.range(orthogonal).span(),
                1,
                "{} tile must be one voxel deep along {}",
                orientation,
                orthogonal
            );
        }

        Ok(())
    }
}

/// Floor-divide `value` by `2^shift`.
fn downsample(value: u64, shift: u32) -> u64 {
    value.checked_shr(shift).unwrap_or(0)
}
