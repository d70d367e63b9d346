//! Argument coercion.
//!
//! Turns the raw tokens laid out by [`AddressGrammar`] into typed values:
//! a resolution level and half-open ranges for x, y, z and time.
//!
//! # Tile Ranges
//!
//! Each index segment stays bound to its axis. The two axes spanning the
//! orientation plane take tile-grid indices, the orthogonal axis takes a
//! voxel coordinate:
//!
//! ```text
//! xy/512/2/3/4/9   →  x: [1536, 2048)  y: [2048, 2560)  z: [9, 10)
//! xz/512/2/3/4/9   →  x: [1536, 2048)  y: [4, 5)        z: [4608, 5120)
//! ```
//!
//! # Time Ranges
//!
//! | segments      | range          |
//! |---------------|----------------|
//! | none          | `[0, 1)`       |
//! | `t`           | `[t, t+1)`     |
//! | `t/s` (tile)  | `[t, s)`       |
//! | `t:s` (cutout)| `[t, s)`       |
//!
//! # Large Values
//!
//! Any run of digits is numeric, however long. A coordinate past `u64::MAX`
//! produces a saturated [`AxisRange`], which bounds checking always rejects
//! as out of bounds. A resolution past `u32::MAX` saturates to `u32::MAX`.

use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;
use std::ops::Range;

use serde::Serialize;

use crate::catalog::ResourcePath;
use crate::error::{AddressError, Axis};

use super::grammar::{AddressGrammar, CutoutFields, Orientation, RequestKind, TileFields};

const NON_NEGATIVE_INTEGER: &str = "a non-negative integer";
const RANGE: &str = "a 'start:stop' range of non-negative integers";

// =============================================================================
// AxisRange
// =============================================================================

/// A non-empty half-open interval `[start, stop)`.
///
/// A saturated range stands for coordinates past `u64::MAX`; its bounds are
/// clamped and it never passes bounds checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AxisRange {
    start: u64,
    stop: u64,
    #[serde(skip)]
    saturated: bool,
}

impl AxisRange {
    /// Build a range, rejecting `stop <= start`.
    pub fn new(axis: Axis, start: u64, stop: u64) -> Result<Self, AddressError> {
        if stop <= start {
            return Err(AddressError::InvalidRange { axis, start, stop });
        }
        Ok(Self {
            start,
            stop,
            saturated: false,
        })
    }

    fn saturated(start: u64) -> Self {
        Self {
            start,
            stop: u64::MAX,
            saturated: true,
        }
    }

    /// The range `[index, index + 1)`.
    fn single(axis: Axis, index: Integer<'_>) -> Result<Self, AddressError> {
        match index.exact().and_then(|start| start.checked_add(1)) {
            Some(stop) => Self::new(axis, index.value, stop),
            None => Ok(Self::saturated(index.value)),
        }
    }

    /// The range `[start, stop)` from two tokens, ordered exactly even when
    /// they do not fit in `u64`.
    fn between(axis: Axis, start: Integer<'_>, stop: Integer<'_>) -> Result<Self, AddressError> {
        if stop.cmp_exact(&start) != Ordering::Greater {
            return Err(AddressError::InvalidRange {
                axis,
                start: start.value,
                stop: stop.value,
            });
        }
        if start.saturated || stop.saturated {
            return Ok(Self::saturated(start.value));
        }
        Self::new(axis, start.value, stop.value)
    }

    /// Tile `index` of `tile_size` voxels: `[index * size, (index + 1) * size)`.
    fn tile(axis: Axis, index: Integer<'_>, tile_size: Integer<'_>) -> Result<Self, AddressError> {
        if tile_size.value == 0 {
            return Self::new(axis, 0, 0);
        }
        let bounds = index.exact().zip(tile_size.exact()).and_then(|(index, size)| {
            let start = index.checked_mul(size)?;
            Some((start, start.checked_add(size)?))
        });
        match bounds {
            Some((start, stop)) => Self::new(axis, start, stop),
            None => Ok(Self::saturated(index.value.saturating_mul(tile_size.value))),
        }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn stop(&self) -> u64 {
        self.stop
    }

    pub fn span(&self) -> u64 {
        self.stop - self.start
    }

    pub fn as_range(&self) -> Range<u64> {
        self.start..self.stop
    }

    /// Whether the requested coordinates ran past `u64::MAX`.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

// =============================================================================
// Coerced Address
// =============================================================================

/// Kind-specific coerced fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressShape {
    Tile {
        orientation: Orientation,
        tile_size: u64,
    },
    Cutout,
}

impl AddressShape {
    pub fn kind(&self) -> RequestKind {
        match self {
            AddressShape::Tile { .. } => RequestKind::Tile,
            AddressShape::Cutout => RequestKind::Cutout,
        }
    }
}

/// A fully typed address that has not yet been checked against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercedAddress {
    pub resource: ResourcePath,
    pub shape: AddressShape,
    pub resolution: u32,
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
    pub time: AxisRange,
}

impl CoercedAddress {
    /// Range along `axis`.
    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Time => self.time,
        }
    }
}

// =============================================================================
// Coercion
// =============================================================================

/// Convert grammar fields into a [`CoercedAddress`].
///
/// # Errors
///
/// - `TypeError` for any token that is not a non-negative integer (or
///   `start:stop` pair where a range is expected). Integers too large for
///   `u64` are numeric and coerce to saturated ranges instead.
/// - `InvalidRange` for a range with `stop <= start`, including a zero
///   tile size
pub fn coerce(
    resource: ResourcePath,
    grammar: AddressGrammar<'_>,
) -> Result<CoercedAddress, AddressError> {
    match grammar {
        AddressGrammar::Tile(fields) => coerce_tile(resource, fields),
        AddressGrammar::Cutout(fields) => coerce_cutout(resource, fields),
    }
}

fn coerce_tile(
    resource: ResourcePath,
    fields: TileFields<'_>,
) -> Result<CoercedAddress, AddressError> {
    let tile_size = parse_integer("tile_size", fields.tile_size)?;
    let resolution = parse_resolution(fields.resolution)?;
    let orientation = fields.orientation;

    let axis_range = |axis: Axis,
                      field: &'static str,
                      token: &str|
     -> Result<AxisRange, AddressError> {
        let index = parse_integer(field, token)?;
        if axis == orientation.orthogonal_axis() {
            AxisRange::single(axis, index)
        } else {
            AxisRange::tile(axis, index, tile_size)
        }
    };

    let x = axis_range(Axis::X, "x_index", fields.x_index)?;
    let y = axis_range(Axis::Y, "y_index", fields.y_index)?;
    let z = axis_range(Axis::Z, "z_index", fields.z_index)?;

    let time = match (fields.time, fields.time_stop) {
        (None, _) => default_time(),
        (Some(t), None) => AxisRange::single(Axis::Time, parse_integer("time", t)?)?,
        (Some(t), Some(s)) => AxisRange::between(
            Axis::Time,
            parse_integer("time", t)?,
            parse_integer("time_stop", s)?,
        )?,
    };

    Ok(CoercedAddress {
        resource,
        shape: AddressShape::Tile {
            orientation,
            tile_size: tile_size.value,
        },
        resolution,
        x,
        y,
        z,
        time,
    })
}

fn coerce_cutout(
    resource: ResourcePath,
    fields: CutoutFields<'_>,
) -> Result<CoercedAddress, AddressError> {
    let resolution = parse_resolution(fields.resolution)?;
    let x = parse_range(Axis::X, "x_range", fields.x_range)?;
    let y = parse_range(Axis::Y, "y_range", fields.y_range)?;
    let z = parse_range(Axis::Z, "z_range", fields.z_range)?;

    let time = match fields.time_range {
        None => default_time(),
        Some(token) if token.contains(':') => parse_range(Axis::Time, "time_range", token)?,
        Some(token) => AxisRange::single(Axis::Time, parse_integer("time_range", token)?)?,
    };

    Ok(CoercedAddress {
        resource,
        shape: AddressShape::Cutout,
        resolution,
        x,
        y,
        z,
        time,
    })
}

fn default_time() -> AxisRange {
    AxisRange {
        start: 0,
        stop: 1,
        saturated: false,
    }
}

// =============================================================================
// Integer Tokens
// =============================================================================

/// A non-negative integer token, saturated at `u64::MAX`.
#[derive(Debug, Clone, Copy)]
struct Integer<'a> {
    value: u64,
    saturated: bool,
    digits: &'a str,
}

impl<'a> Integer<'a> {
    /// Parse a digit string of any length. `None` if it is not numeric.
    fn parse(token: &'a str) -> Option<Self> {
        match token.parse::<u64>() {
            Ok(value) => Some(Self {
                value,
                saturated: false,
                digits: token,
            }),
            Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(Self {
                value: u64::MAX,
                saturated: true,
                digits: token,
            }),
            Err(_) => None,
        }
    }

    fn exact(&self) -> Option<u64> {
        (!self.saturated).then_some(self.value)
    }

    /// Numeric comparison on the digits themselves.
    fn cmp_exact(&self, other: &Self) -> Ordering {
        if !self.saturated && !other.saturated {
            return self.value.cmp(&other.value);
        }
        let a = significant_digits(self.digits);
        let b = significant_digits(other.digits);
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

fn significant_digits(token: &str) -> &str {
    token.trim_start_matches('+').trim_start_matches('0')
}

fn parse_integer<'a>(field: &'static str, token: &'a str) -> Result<Integer<'a>, AddressError> {
    Integer::parse(token).ok_or_else(|| AddressError::TypeError {
        field,
        expected: NON_NEGATIVE_INTEGER,
        value: token.to_string(),
    })
}

/// Resolutions past `u32::MAX` saturate; no hierarchy is that deep.
fn parse_resolution(token: &str) -> Result<u32, AddressError> {
    let resolution = parse_integer("resolution", token)?;
    Ok(u32::try_from(resolution.value).unwrap_or(u32::MAX))
}

fn parse_range(axis: Axis, field: &'static str, token: &str) -> Result<AxisRange, AddressError> {
    let type_error = || AddressError::TypeError {
        field,
        expected: RANGE,
        value: token.to_string(),
    };

    let (start, stop) = token.split_once(':').ok_or_else(type_error)?;
    let start = Integer::parse(start).ok_or_else(type_error)?;
    let stop = Integer::parse(stop).ok_or_else(type_error)?;
    AxisRange::between(axis, start, stop)
}
