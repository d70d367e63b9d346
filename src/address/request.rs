//! The validated request object.

use std::ops::Range;

use serde::Serialize;

use crate::catalog::{ChannelDatatype, ResolvedChannel, ResourcePath};
use crate::error::Axis;

use super::coerce::{AddressShape, AxisRange, CoercedAddress};
use super::grammar::{Orientation, RequestKind};
use super::keys;

/// A fully validated tile or cutout address.
///
/// Only [`AddressParser`](super::AddressParser) builds these, and only
/// after every range has been checked against the coordinate frame, so
/// every value of this type satisfies `start < stop` on each axis and
/// lies inside the frame at its resolution. There are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAddress {
    kind: RequestKind,
    collection: String,
    experiment: String,
    channel: String,
    boss_key: String,
    lookup_key: String,
    datatype: ChannelDatatype,
    resolution: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tile_size: Option<u64>,
    x: AxisRange,
    y: AxisRange,
    z: AxisRange,
    time: AxisRange,
    boss_key_list: Vec<String>,
}

impl ParsedAddress {
    /// Assemble from a validated address and the channel it was checked against.
    pub(crate) fn assemble(address: CoercedAddress, channel: &ResolvedChannel) -> Self {
        let boss_key = keys::boss_key(channel);
        let boss_key_list = keys::boss_key_list(&boss_key, address.resolution, address.time);

        let (orientation, tile_size) = match address.shape {
            AddressShape::Tile {
                orientation,
                tile_size,
            } => (Some(orientation), Some(tile_size)),
            AddressShape::Cutout => (None, None),
        };

        Self {
            kind: address.shape.kind(),
            collection: address.resource.collection,
            experiment: address.resource.experiment,
            channel: address.resource.channel,
            lookup_key: keys::lookup_key(channel),
            boss_key,
            datatype: channel.channel.datatype,
            resolution: address.resolution,
            orientation,
            tile_size,
            x: address.x,
            y: address.y,
            z: address.z,
            time: address.time,
            boss_key_list,
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn resource(&self) -> ResourcePath {
        ResourcePath::new(&self.collection, &self.experiment, &self.channel)
    }

    /// `collection&experiment&channel`
    pub fn boss_key(&self) -> &str {
        &self.boss_key
    }

    /// Id-based counterpart of [`boss_key`](Self::boss_key).
    pub fn lookup_key(&self) -> &str {
        &self.lookup_key
    }

    /// One key per time index, ordered by increasing time.
    pub fn boss_key_list(&self) -> &[String] {
        &self.boss_key_list
    }

    pub fn datatype(&self) -> ChannelDatatype {
        self.datatype
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Tile orientation; `None` for cutouts.
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Tile edge length; `None` for cutouts.
    pub fn tile_size(&self) -> Option<u64> {
        self.tile_size
    }

    pub fn range(&self, axis: Axis) -> AxisRange {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Time => self.time,
        }
    }

    pub fn x_start(&self) -> u64 {
        self.x.start()
    }

    pub fn x_stop(&self) -> u64 {
        self.x.stop()
    }

    pub fn x_span(&self) -> u64 {
        self.x.span()
    }

    pub fn y_start(&self) -> u64 {
        self.y.start()
    }

    pub fn y_stop(&self) -> u64 {
        self.y.stop()
    }

    pub fn y_span(&self) -> u64 {
        self.y.span()
    }

    pub fn z_start(&self) -> u64 {
        self.z.start()
    }

    pub fn z_stop(&self) -> u64 {
        self.z.stop()
    }

    pub fn z_span(&self) -> u64 {
        self.z.span()
    }

    /// Time samples as a half-open range.
    pub fn time(&self) -> Range<u64> {
        self.time.as_range()
    }
}
