//! Address parser pipeline.
//!
//! ```text
//!  path ──► tokenize ──► select grammar ──► coerce ──► validate ──► keys ──► ParsedAddress
//!           (Tokenized)                     (Coerced)   (Validated) (Keyed)  (Ready)
//!                │              │              │            │
//!                └──────────────┴──────────────┴────────────┴──► AddressError (Rejected)
//! ```
//!
//! Each stage either hands a fully typed value to the next or stops with
//! the first error. Nothing is retried and nothing partial escapes.
//!
//! The pipeline is split in two so async callers can look up the catalog
//! between the stages that need no catalog data ([`AddressParser::coerce`])
//! and the ones that do ([`AddressParser::resolve`]).

use tracing::debug;

use crate::catalog::ResourceCatalog;
use crate::error::AddressError;

use super::bounds::FrameValidator;
use super::coerce::{coerce, CoercedAddress};
use super::grammar::AddressGrammar;
use super::request::ParsedAddress;
use super::tokenizer::{tokenize, TokenizedPath};

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Leading path segment accepted as the API version (e.g. `v1`)
    pub api_version_prefix: String,
}

impl ParserConfig {
    pub fn new(api_version_prefix: impl Into<String>) -> Self {
        Self {
            api_version_prefix: api_version_prefix.into(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_VERSION)
    }
}

/// Parses tile and cutout paths into [`ParsedAddress`] values.
///
/// The parser holds no mutable state and can be shared freely across
/// threads; parsing the same path twice yields equal results.
///
/// # Example
///
/// ```ignore
/// use boss_address::address::{AddressParser, ParserConfig};
/// use boss_address::catalog::InMemoryCatalog;
///
/// let catalog = InMemoryCatalog::from_path("catalog.json")?;
/// let parser = AddressParser::new(ParserConfig::default());
///
/// let address = parser.parse("/v1/tile/col1/exp1/channel1/xy/512/2/0/0/1/", &catalog)?;
/// assert_eq!(address.boss_key_list(), ["col1&exp1&channel1&2&0"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AddressParser {
    config: ParserConfig,
}

impl AddressParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `path` and validate it against `catalog`.
    pub fn parse<C: ResourceCatalog + ?Sized>(
        &self,
        path: &str,
        catalog: &C,
    ) -> Result<ParsedAddress, AddressError> {
        let coerced = self.coerce(path)?;
        self.resolve(coerced, catalog)
    }

    /// Run the catalog-independent stages: tokenize, select grammar, coerce.
    ///
    /// # Errors
    ///
    /// `MalformedPath`, `UnsupportedAddressForm`, `TypeError` or
    /// `InvalidRange`.
    pub fn coerce(&self, path: &str) -> Result<CoercedAddress, AddressError> {
        let TokenizedPath {
            kind,
            resource,
            args,
            ..
        } = tokenize(path, &self.config.api_version_prefix).map_err(|e| reject(path, e))?;

        let grammar = AddressGrammar::select(kind, &args).map_err(|e| reject(path, e))?;
        coerce(resource, grammar).map_err(|e| reject(path, e))
    }

    /// Run the catalog-dependent stages: resolve names, check bounds,
    /// derive keys.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, `ResolutionOutOfRange` or `OutOfBounds`.
    pub fn resolve<C: ResourceCatalog + ?Sized>(
        &self,
        address: CoercedAddress,
        catalog: &C,
    ) -> Result<ParsedAddress, AddressError> {
        let resource = address.resource.to_string();

        let channel = catalog
            .resolve(&address.resource)
            .map_err(|e| reject(&resource, e.into()))?;

        FrameValidator::new(&channel)
            .validate(&address)
            .map_err(|e| reject(&resource, e))?;

        let parsed = ParsedAddress::assemble(address, &channel);
        debug!(
            kind = %parsed.kind(),
            boss_key = parsed.boss_key(),
            resolution = parsed.resolution(),
            keys = parsed.boss_key_list().len(),
            "Parsed address"
        );
        Ok(parsed)
    }
}

fn reject(subject: &str, error: AddressError) -> AddressError {
    debug!(subject, error_kind = error.kind(), "Rejected address: {}", error);
    error
}
