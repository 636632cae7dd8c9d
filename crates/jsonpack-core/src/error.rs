//! Error types for pack and unpack operations.

use thiserror::Error;

/// Errors that can occur while packing a value tree.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The input was not valid JSON, or a serde conversion failed
    /// (`pack_json` / `pack_from` paths).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value outside the supported kinds, e.g. an unsigned integer above
    /// `i64::MAX`.
    #[error("unsupported value kind: {0}")]
    Unsupported(String),

    /// The top-level value was not an object or an array. The structure
    /// grammar has no root form for bare scalars.
    #[error("top-level value must be an object or an array")]
    ScalarRoot,

    /// The tree nests deeper than [`MAX_DEPTH`](crate::MAX_DEPTH) levels.
    #[error("value tree nests too deeply")]
    TooDeep,
}

/// Errors that can occur while unpacking packed text. Each malformed-input
/// condition gets its own kind so callers can report what was wrong with a
/// rejected payload.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The packed text did not split into exactly four `^`-delimited
    /// sections.
    #[error("expected 4 sections, found {found}")]
    SectionCount { found: usize },

    /// A base-36 numeral (integer dictionary entry or structure token)
    /// failed to parse.
    #[error("invalid base-36 numeral {text:?}")]
    Int { text: String },

    /// A float dictionary entry failed to parse.
    #[error("invalid float literal {text:?}")]
    Float { text: String },

    /// The structure section did not begin with an object or array marker.
    #[error("structure does not start with an object or array marker")]
    BadLeadingToken,

    /// The structure section ended before every open container was closed.
    #[error("structure ended inside an unclosed container")]
    UnexpectedEnd,

    /// A leaf reference pointed at or past the end of the combined
    /// dictionary.
    #[error("dictionary offset {offset} out of range for {len} entries")]
    OffsetOutOfRange { offset: i64, len: usize },

    /// An object key token resolved to something other than a string.
    #[error("object key does not resolve to a string")]
    NonStringKey,

    /// Containers nest deeper than [`MAX_DEPTH`](crate::MAX_DEPTH) levels.
    #[error("packed structure nests too deeply")]
    TooDeep,

    /// Serializing the decoded tree failed (`unpack_json` / `unpack_into`
    /// paths).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
