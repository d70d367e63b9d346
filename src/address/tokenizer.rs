//! Structural path splitting.
//!
//! Splits `/{version}/{kind}/{collection}/{experiment}/{channel}/{args...}/`
//! into its parts. Nothing here interprets the argument segments; that is
//! left to [`super::grammar`] and [`super::coerce`].

use crate::catalog::ResourcePath;
use crate::error::AddressError;

use super::grammar::RequestKind;

/// A path split into its fixed prefix and argument segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedPath {
    /// API version segment, if the path carried one
    pub version: Option<String>,

    pub kind: RequestKind,

    pub resource: ResourcePath,

    /// Percent-decoded segments after the channel name
    pub args: Vec<String>,
}

/// Split `path` into segments.
///
/// A leading segment equal to `api_version_prefix` is consumed as the
/// version. Trailing slashes are ignored; empty interior segments are not.
///
/// # Errors
///
/// - `MalformedPath` for empty paths, empty segments, segments that do not
///   percent-decode to UTF-8, or fewer segments than `kind` requires
/// - `UnsupportedAddressForm` if the request-type segment is unknown
pub fn tokenize(path: &str, api_version_prefix: &str) -> Result<TokenizedPath, AddressError> {
    let trimmed = path.trim_end_matches('/');
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Err(AddressError::malformed("empty path"));
    }

    let mut segments = Vec::new();
    for (position, raw) in trimmed.split('/').enumerate() {
        if raw.is_empty() {
            return Err(AddressError::malformed(format!(
                "empty segment at position {}",
                position
            )));
        }
        let decoded = urlencoding::decode(raw).map_err(|_| {
            AddressError::malformed(format!("segment {} is not valid UTF-8", position))
        })?;
        segments.push(decoded.into_owned());
    }

    let mut segments = segments.into_iter().peekable();

    let version = if !api_version_prefix.is_empty()
        && segments.peek().map(String::as_str) == Some(api_version_prefix)
    {
        segments.next()
    } else {
        None
    };

    let kind_token = segments
        .next()
        .ok_or_else(|| AddressError::malformed("missing request type"))?;
    let kind = RequestKind::from_token(&kind_token)?;

    let rest: Vec<String> = segments.collect();
    let required = 3 + kind.min_args();
    if rest.len() < required {
        return Err(AddressError::malformed(format!(
            "{} request needs at least {} segments after the request type, got {}",
            kind,
            required,
            rest.len()
        )));
    }

    let mut rest = rest.into_iter();
    let mut name = || rest.next().unwrap_or_default();
    let resource = ResourcePath::new(name(), name(), name());
    let args = rest.collect();

    Ok(TokenizedPath {
        version,
        kind,
        resource,
        args,
    })
}
