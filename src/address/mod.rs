//! Request-address parsing.
//!
//! This module turns tile and cutout paths into validated
//! [`ParsedAddress`] values carrying the storage keys needed to fetch the
//! addressed data.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────┐   ┌──────────────────┐   ┌──────┐
//! │ tokenizer │──►│ grammar  │──►│ coerce   │──►│ bounds           │──►│ keys │
//! │ (split)   │   │ (layout) │   │ (types)  │   │ (FrameValidator) │   │      │
//! └───────────┘   └──────────┘   └──────────┘   └────────┬─────────┘   └──────┘
//!                                                        │
//!                                                 ResourceCatalog
//! ```
//!
//! # Components
//!
//! - [`AddressParser`]: pipeline driver, configured with [`ParserConfig`]
//! - [`tokenize`]: structural split into version, kind, names and arguments
//! - [`AddressGrammar`]: closed tile/cutout layout chosen from the kind
//! - [`coerce()`]: typed resolution and [`AxisRange`]s
//! - [`FrameValidator`]: resolution and coordinate-frame bounds checks
//! - [`keys`]: boss key, lookup key and per-time-sample key list
//! - [`ParsedAddress`]: the immutable result

mod bounds;
mod coerce;
mod grammar;
pub mod keys;
mod parser;
mod request;
mod tokenizer;

pub use bounds::FrameValidator;
pub use coerce::{coerce, AddressShape, AxisRange, CoercedAddress};
pub use grammar::{AddressGrammar, CutoutFields, Orientation, RequestKind, TileFields};
pub use parser::{AddressParser, ParserConfig, DEFAULT_API_VERSION};
pub use request::ParsedAddress;
pub use tokenizer::{tokenize, TokenizedPath};
