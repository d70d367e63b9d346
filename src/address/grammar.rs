//! Addressing grammars.
//!
//! The request-type segment picks one of two closed layouts for the
//! segments following the channel name:
//!
//! ```text
//! tile:   {orientation}/{tile_size}/{resolution}/{x}/{y}/{z}[/{time}[/{time_stop}]]
//! cutout: {resolution}/{x0}:{x1}/{y0}:{y1}/{z0}:{z1}[/{t0}:{t1}]
//! ```
//!
//! Selection happens once, here. Later stages match on [`AddressGrammar`]
//! and never re-inspect raw tokens to decide what kind of request they are
//! handling.

use std::fmt;

use serde::Serialize;

use crate::error::{AddressError, AddressForm, Axis};

// =============================================================================
// Request Kind
// =============================================================================

/// The request-type segment of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Tile,
    Cutout,
}

impl RequestKind {
    /// Parse the request-type token.
    pub fn from_token(token: &str) -> Result<Self, AddressError> {
        match token {
            "tile" => Ok(RequestKind::Tile),
            "cutout" => Ok(RequestKind::Cutout),
            other => Err(AddressError::UnsupportedAddressForm {
                form: AddressForm::Kind,
                token: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Tile => "tile",
            RequestKind::Cutout => "cutout",
        }
    }

    /// Required argument segments after the channel name.
    pub fn min_args(&self) -> usize {
        match self {
            RequestKind::Tile => 6,
            RequestKind::Cutout => 4,
        }
    }

    /// Required plus optional (time) argument segments.
    pub fn max_args(&self) -> usize {
        match self {
            RequestKind::Tile => 8,
            RequestKind::Cutout => 5,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Orientation
// =============================================================================

/// Plane of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Xy,
    Xz,
    Yz,
}

impl Orientation {
    pub fn from_token(token: &str) -> Result<Self, AddressError> {
        match token {
            "xy" => Ok(Orientation::Xy),
            "xz" => Ok(Orientation::Xz),
            "yz" => Ok(Orientation::Yz),
            other => Err(AddressError::UnsupportedAddressForm {
                form: AddressForm::Orientation,
                token: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Xy => "xy",
            Orientation::Xz => "xz",
            Orientation::Yz => "yz",
        }
    }

    /// The two axes spanning the tile plane.
    pub fn plane_axes(&self) -> [Axis; 2] {
        match self {
            Orientation::Xy => [Axis::X, Axis::Y],
            Orientation::Xz => [Axis::X, Axis::Z],
            Orientation::Yz => [Axis::Y, Axis::Z],
        }
    }

    /// The axis perpendicular to the tile plane; its span is always 1.
    pub fn orthogonal_axis(&self) -> Axis {
        match self {
            Orientation::Xy => Axis::Z,
            Orientation::Xz => Axis::Y,
            Orientation::Yz => Axis::X,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Grammar
// =============================================================================

/// Positional tile fields, still as raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFields<'a> {
    pub orientation: Orientation,
    pub tile_size: &'a str,
    pub resolution: &'a str,
    pub x_index: &'a str,
    pub y_index: &'a str,
    pub z_index: &'a str,
    pub time: Option<&'a str>,
    pub time_stop: Option<&'a str>,
}

/// Positional cutout fields, still as raw tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoutFields<'a> {
    pub resolution: &'a str,
    pub x_range: &'a str,
    pub y_range: &'a str,
    pub z_range: &'a str,
    pub time_range: Option<&'a str>,
}

/// The argument layout selected by the request kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressGrammar<'a> {
    Tile(TileFields<'a>),
    Cutout(CutoutFields<'a>),
}

impl<'a> AddressGrammar<'a> {
    /// Lay out `args` (the segments after the channel name) according to `kind`.
    ///
    /// # Errors
    ///
    /// - `MalformedPath` if the segment count does not fit the layout
    /// - `UnsupportedAddressForm` for an unknown tile orientation
    pub fn select(kind: RequestKind, args: &'a [String]) -> Result<Self, AddressError> {
        if args.len() < kind.min_args() || args.len() > kind.max_args() {
            return Err(AddressError::malformed(format!(
                "{} request takes {} to {} arguments after the channel, got {}",
                kind,
                kind.min_args(),
                kind.max_args(),
                args.len()
            )));
        }

        let arg = |i: usize| args[i].as_str();
        let optional = |i: usize| args.get(i).map(String::as_str);

        match kind {
            RequestKind::Tile => Ok(AddressGrammar::Tile(TileFields {
                orientation: Orientation::from_token(arg(0))?,
                tile_size: arg(1),
                resolution: arg(2),
                x_index: arg(3),
                y_index: arg(4),
                z_index: arg(5),
                time: optional(6),
                time_stop: optional(7),
            })),
            RequestKind::Cutout => Ok(AddressGrammar::Cutout(CutoutFields {
                resolution: arg(0),
                x_range: arg(1),
                y_range: arg(2),
                z_range: arg(3),
                time_range: optional(4),
            })),
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            AddressGrammar::Tile(_) => RequestKind::Tile,
            AddressGrammar::Cutout(_) => RequestKind::Cutout,
        }
    }
}
