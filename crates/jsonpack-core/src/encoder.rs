//! Encoder — value tree to packed text.
//!
//! One walk over the tree interns every distinct scalar into its per-kind
//! dictionary (strings, integers, floats, each in first-seen order) and
//! records the tree shape as a flat token list. Rendering then writes each
//! leaf as a base-36 offset into the *combined* dictionary (string offsets
//! are raw indices, integer offsets are shifted by the string count, float
//! offsets by strings plus integers), so the decoder can resolve every leaf
//! against one concatenated list. Booleans, null, and the empty string never
//! enter a dictionary; they are written as fixed negative tokens.
//!
//! Dictionaries live only for the duration of one [`pack`] call. There is no
//! cross-call state: packing equal trees twice produces identical output and
//! concurrent calls never interact.
//!
//! # Example
//! ```
//! use jsonpack_core::pack_json;
//! let packed = pack_json(r#"{"a":1,"b":1}"#).unwrap();
//! // one dictionary entry for 1, referenced twice
//! assert_eq!(packed, "a|b^1^^$0|2|1|2]");
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::codec::{self, Sentinel};
use crate::error::EncodeError;
use crate::value::Value;
use crate::MAX_DEPTH;

/// Pack a value tree into the four-section wire string.
///
/// The root must be an object or an array; the structure grammar has no way
/// to express a bare scalar root that the decoder would accept.
pub fn pack(value: &Value) -> Result<String, EncodeError> {
    if !matches!(value, Value::Array(_) | Value::Object(_)) {
        return Err(EncodeError::ScalarRoot);
    }

    let mut dict = Dictionary::new();
    let mut tokens = Vec::new();
    build_tokens(value, &mut dict, &mut tokens, 0)?;

    let mut packed = dict.strings.join("|");
    packed.push('^');
    let ints: Vec<String> = dict.ints.iter().map(|n| codec::to_base36(*n)).collect();
    packed.push_str(&ints.join("|"));
    packed.push('^');
    let floats: Vec<String> = dict.floats.iter().map(|f| codec::format_float(*f)).collect();
    packed.push_str(&floats.join("|"));
    packed.push('^');
    render_structure(&tokens, &dict, &mut packed);
    Ok(packed)
}

/// Parse a JSON string and pack it.
pub fn pack_json(json: &str) -> Result<String, EncodeError> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    pack(&Value::from_json(&parsed)?)
}

/// Pack any serializable value.
///
/// serde supplies the record field descriptors: `#[serde(rename)]` gives a
/// field its external key, `#[serde(skip)]` omits it, and declaration order
/// fixes the key order.
pub fn pack_from<T: Serialize>(value: &T) -> Result<String, EncodeError> {
    let json = serde_json::to_value(value)?;
    pack(&Value::from_json(&json)?)
}

/// The three per-call dictionaries plus their interning indexes.
///
/// Strings are stored pre-escaped (the form that goes on the wire) but
/// interned by raw value, so equal strings share one entry no matter what
/// escaping does to them.
struct Dictionary {
    strings: Vec<String>,
    string_index: HashMap<String, usize>,
    ints: Vec<i64>,
    int_index: HashMap<i64, usize>,
    floats: Vec<f64>,
    float_index: HashMap<u64, usize>,
}

impl Dictionary {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            string_index: HashMap::new(),
            ints: Vec::new(),
            int_index: HashMap::new(),
            floats: Vec::new(),
            float_index: HashMap::new(),
        }
    }

    fn intern_string(&mut self, s: &str) -> usize {
        if let Some(&index) = self.string_index.get(s) {
            return index;
        }
        let index = self.strings.len();
        self.strings.push(codec::escape(s));
        self.string_index.insert(s.to_string(), index);
        index
    }

    fn intern_int(&mut self, n: i64) -> usize {
        if let Some(&index) = self.int_index.get(&n) {
            return index;
        }
        let index = self.ints.len();
        self.ints.push(n);
        self.int_index.insert(n, index);
        index
    }

    fn intern_float(&mut self, f: f64) -> usize {
        // keyed by bit pattern since f64 is not Eq
        if let Some(&index) = self.float_index.get(&f.to_bits()) {
            return index;
        }
        let index = self.floats.len();
        self.floats.push(f);
        self.float_index.insert(f.to_bits(), index);
        index
    }
}

/// One element of the flat structure description. Leaf variants carry the
/// index *within their own dictionary*; the combined-offset shift happens at
/// render time, once section sizes are final.
enum Tok {
    ObjectStart,
    ArrayStart,
    End,
    Str(usize),
    Int(usize),
    Float(usize),
    Sentinel(Sentinel),
}

/// Walk the tree, interning scalars and appending tokens in traversal order.
fn build_tokens(
    value: &Value,
    dict: &mut Dictionary,
    tokens: &mut Vec<Tok>,
    depth: usize,
) -> Result<(), EncodeError> {
    if depth > MAX_DEPTH {
        return Err(EncodeError::TooDeep);
    }
    match value {
        Value::Null => tokens.push(Tok::Sentinel(Sentinel::Null)),
        Value::Bool(true) => tokens.push(Tok::Sentinel(Sentinel::True)),
        Value::Bool(false) => tokens.push(Tok::Sentinel(Sentinel::False)),
        Value::String(s) if s.is_empty() => tokens.push(Tok::Sentinel(Sentinel::Empty)),
        Value::String(s) => tokens.push(Tok::Str(dict.intern_string(s))),
        Value::Int(n) => tokens.push(Tok::Int(dict.intern_int(*n))),
        // A float constructed directly may still be integral; narrow it the
        // same way the JSON conversion does.
        Value::Float(f) => match Value::from_f64(*f) {
            Value::Int(n) => tokens.push(Tok::Int(dict.intern_int(n))),
            _ => tokens.push(Tok::Float(dict.intern_float(*f))),
        },
        Value::Array(items) => {
            tokens.push(Tok::ArrayStart);
            for item in items {
                build_tokens(item, dict, tokens, depth + 1)?;
            }
            tokens.push(Tok::End);
        }
        Value::Object(fields) => {
            tokens.push(Tok::ObjectStart);
            for (key, val) in fields {
                if key.is_empty() {
                    tokens.push(Tok::Sentinel(Sentinel::Empty));
                } else {
                    tokens.push(Tok::Str(dict.intern_string(key)));
                }
                build_tokens(val, dict, tokens, depth + 1)?;
            }
            tokens.push(Tok::End);
        }
    }
    Ok(())
}

/// Render the token list as structure text.
///
/// A separator goes before any leaf or container start that follows a
/// completed sibling; nothing follows a container start and nothing precedes
/// a close, which is exactly the grammar's "no trailing separator" rule.
fn render_structure(tokens: &[Tok], dict: &Dictionary, out: &mut String) {
    let int_base = dict.strings.len();
    let float_base = int_base + dict.ints.len();
    let mut needs_sep = false;
    for tok in tokens {
        match tok {
            Tok::ObjectStart => {
                if needs_sep {
                    out.push('|');
                }
                out.push('$');
                needs_sep = false;
            }
            Tok::ArrayStart => {
                if needs_sep {
                    out.push('|');
                }
                out.push('@');
                needs_sep = false;
            }
            Tok::End => {
                out.push(']');
                needs_sep = true;
            }
            Tok::Str(index) => push_leaf(out, &mut needs_sep, &codec::to_base36(*index as i64)),
            Tok::Int(index) => push_leaf(
                out,
                &mut needs_sep,
                &codec::to_base36((int_base + index) as i64),
            ),
            Tok::Float(index) => push_leaf(
                out,
                &mut needs_sep,
                &codec::to_base36((float_base + index) as i64),
            ),
            Tok::Sentinel(s) => push_leaf(out, &mut needs_sep, &(*s as i64).to_string()),
        }
    }
}

fn push_leaf(out: &mut String, needs_sep: &mut bool, text: &str) {
    if *needs_sep {
        out.push('|');
    }
    out.push_str(text);
    *needs_sep = true;
}
