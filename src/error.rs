use std::fmt;

use thiserror::Error;

/// A spatial or temporal axis of an addressed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    /// Time sample axis
    Time,
}

impl Axis {
    /// Short lowercase name used in messages and JSON ("x", "y", "z", "t").
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::Time => "t",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of catalog record named in a lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Collection,
    Experiment,
    Channel,
    CoordinateFrame,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Collection => "Collection",
            Entity::Experiment => "Experiment",
            Entity::Channel => "Channel",
            Entity::CoordinateFrame => "Coordinate frame",
        })
    }
}

/// The address token that was not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressForm {
    /// The request-type segment (`tile`, `cutout`)
    Kind,
    /// The tile orientation segment (`xy`, `xz`, `yz`)
    Orientation,
}

impl fmt::Display for AddressForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressForm::Kind => "request type",
            AddressForm::Orientation => "orientation",
        })
    }
}

/// A catalog lookup miss, naming the first missing record in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} not found: {name}")]
pub struct NotFound {
    pub entity: Entity,
    pub name: String,
}

impl NotFound {
    pub fn new(entity: Entity, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
        }
    }
}

/// Reasons a request address is rejected.
///
/// Every variant is terminal: the parser returns the first violated
/// constraint and never builds a partial address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Wrong segment count or unparseable path structure
    #[error("Malformed path: {reason}")]
    MalformedPath { reason: String },

    /// Unknown request type or orientation token
    #[error("Unsupported {form}: '{token}'")]
    UnsupportedAddressForm { form: AddressForm, token: String },

    /// A segment expected to be numeric is not
    #[error("Type error: {field} must be {expected}, got '{value}'")]
    TypeError {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    /// A range whose stop does not exceed its start
    #[error("Invalid {axis} range: stop {stop} must be greater than start {start}")]
    InvalidRange { axis: Axis, start: u64, stop: u64 },

    /// A named collection, experiment, channel or frame does not exist
    #[error("{entity} not found: {name}")]
    ResourceNotFound { entity: Entity, name: String },

    /// Resolution outside the experiment's hierarchy
    #[error("Invalid resolution: {resolution} (experiment has {levels} levels, valid range: 0-{})", .levels.saturating_sub(1))]
    ResolutionOutOfRange { resolution: u32, levels: u32 },

    /// A range exceeding the resolution-adjusted extent
    #[error("{axis} range [{start}, {stop}) is outside [{min}, {max}) at resolution {resolution}")]
    OutOfBounds {
        axis: Axis,
        start: u64,
        stop: u64,
        min: u64,
        max: u64,
        resolution: u32,
    },
}

impl AddressError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        AddressError::MalformedPath {
            reason: reason.into(),
        }
    }

    /// Stable snake_case identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AddressError::MalformedPath { .. } => "malformed_path",
            AddressError::UnsupportedAddressForm { .. } => "unsupported_address_form",
            AddressError::TypeError { .. } => "type_error",
            AddressError::InvalidRange { .. } => "invalid_range",
            AddressError::ResourceNotFound { .. } => "resource_not_found",
            AddressError::ResolutionOutOfRange { .. } => "resolution_out_of_range",
            AddressError::OutOfBounds { .. } => "out_of_bounds",
        }
    }
}

impl From<NotFound> for AddressError {
    fn from(err: NotFound) -> Self {
        AddressError::ResourceNotFound {
            entity: err.entity,
            name: err.name,
        }
    }
}

/// Errors raised while loading or fetching catalog records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The catalog document could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// The catalog document is not valid JSON for the record schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// Two records of the same kind share a name within one parent
    #[error("Duplicate {entity}: {name}")]
    Duplicate { entity: Entity, name: String },

    /// A record names a parent that does not exist
    #[error("{entity} '{name}' references missing {parent}")]
    DanglingReference {
        entity: Entity,
        name: String,
        parent: String,
    },

    /// A record violates a structural invariant
    #[error("Invalid {entity} '{name}': {reason}")]
    InvalidRecord {
        entity: Entity,
        name: String,
        reason: String,
    },

    /// Lookup miss
    #[error(transparent)]
    NotFound(#[from] NotFound),

    /// The backing store failed
    #[error("Catalog backend error: {0}")]
    Backend(String),
}
