//! # jsonpack-core
//!
//! Pure-Rust encoder and decoder for a compact, reversible text encoding of
//! JSON-shaped data.
//!
//! The format reduces payload size by collecting every distinct string,
//! integer, and float into per-kind dictionaries, then describing the tree
//! shape as a terse token grammar that addresses those dictionaries by
//! base-36 index. A value that appears a thousand times costs one dictionary
//! entry plus a thousand short references.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonpack_core::{pack_json, unpack_json};
//!
//! let packed = pack_json(r#"{"a":1,"b":1}"#).unwrap();
//! assert_eq!(packed, "a|b^1^^$0|2|1|2]");
//!
//! let json = unpack_json(&packed).unwrap();
//! assert_eq!(json, r#"{"a":1,"b":1}"#);
//! ```
//!
//! ## Wire format
//!
//! `STRINGS^INTEGERS^FLOATS^STRUCTURE` — four sections joined by `^`.
//! Dictionary entries within a section are separated by `|`; strings are
//! escaped (space becomes `+`, the delimiter characters become `%`-sequences)
//! and integers are base-36. The structure section uses `$` (object), `@`
//! (array), `]` (close), base-36 dictionary offsets, and five literal
//! negative tokens for `true`/`false`/`null`/`""`/undefined.
//!
//! ## Modules
//!
//! - [`encoder`] — value tree → packed string (`pack`, `pack_json`, `pack_from`)
//! - [`decoder`] — packed string → value tree (`unpack`, `unpack_json`, `unpack_into`)
//! - [`value`] — the [`Value`] tree all operations consume and produce
//! - [`error`] — [`EncodeError`] / [`DecodeError`]
//!
//! Both directions are pure, synchronous transformations with no state shared
//! across calls; concurrent use needs no locking.

mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod value;

pub use decoder::{unpack, unpack_into, unpack_json};
pub use encoder::{pack, pack_from, pack_json};
pub use error::{DecodeError, EncodeError};
pub use value::Value;

/// Maximum container nesting accepted by [`pack`] and [`unpack`].
///
/// The format itself places no bound on depth; this cap exists so that
/// hostile or runaway inputs fail with an error instead of exhausting the
/// stack.
pub const MAX_DEPTH: usize = 128;
