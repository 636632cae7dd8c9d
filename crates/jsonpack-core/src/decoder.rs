//! Decoder — packed text back to a value tree.
//!
//! Decoding works purely from the packed string. The text splits on `^` into
//! exactly four sections; the first three rebuild one combined dictionary
//! (decoded strings, then integers, then floats, the same concatenation
//! order the encoder used to compute offsets), and the fourth is lexed
//! character by character into a flat token stream. A recursive-descent
//! parser then rebuilds the tree, resolving non-negative leaf tokens against
//! the combined dictionary and negative tokens against the sentinel table.
//!
//! The token cursor is a field of an explicit parser struct threaded through
//! the recursion, never ambient state, so concurrent decodes are
//! independent.

use serde::de::DeserializeOwned;

use crate::codec::{self, Sentinel};
use crate::error::DecodeError;
use crate::value::Value;
use crate::MAX_DEPTH;

/// Unpack a packed string into a value tree.
///
/// A single trailing newline run is tolerated (files and pipes usually add
/// one); everything else must be exact wire text.
pub fn unpack(packed: &str) -> Result<Value, DecodeError> {
    let packed = packed.trim_end_matches('\n');
    let sections: Vec<&str> = packed.split('^').collect();
    if sections.len() != 4 {
        return Err(DecodeError::SectionCount {
            found: sections.len(),
        });
    }
    let dict = load_dictionary(sections[0], sections[1], sections[2])?;
    let tokens = tokenize(sections[3])?;
    let mut parser = Parser {
        tokens: &tokens,
        dict: &dict,
        pos: 0,
    };
    parser.parse_root()
}

/// Unpack and serialize the result as minified JSON text.
pub fn unpack_json(packed: &str) -> Result<String, DecodeError> {
    let value = unpack(packed)?;
    Ok(serde_json::to_string(&value.to_json())?)
}

/// Unpack into any deserializable type — the typed counterpart of
/// [`pack_from`](crate::pack_from).
pub fn unpack_into<T: DeserializeOwned>(packed: &str) -> Result<T, DecodeError> {
    let value = unpack(packed)?;
    Ok(serde_json::from_value(value.to_json())?)
}

/// One entry of the combined dictionary.
enum Entry {
    Str(String),
    Int(i64),
    Float(f64),
}

/// Decode the three dictionary sections into the combined list.
///
/// An empty section contributes zero entries; `"".split('|')` would
/// otherwise fabricate one empty string.
fn load_dictionary(strings: &str, ints: &str, floats: &str) -> Result<Vec<Entry>, DecodeError> {
    let mut dict = Vec::new();
    if !strings.is_empty() {
        for entry in strings.split('|') {
            dict.push(Entry::Str(codec::unescape(entry)));
        }
    }
    if !ints.is_empty() {
        for entry in ints.split('|') {
            dict.push(Entry::Int(codec::from_base36(entry)?));
        }
    }
    if !floats.is_empty() {
        for entry in floats.split('|') {
            let parsed = entry.parse::<f64>().map_err(|_| DecodeError::Float {
                text: entry.to_string(),
            })?;
            dict.push(Entry::Float(parsed));
        }
    }
    Ok(dict)
}

/// A structural marker or a numeric leaf token. Negative leaves are
/// sentinels; non-negative leaves are combined-dictionary offsets.
#[derive(Clone, Copy)]
enum Token {
    ObjectStart,
    ArrayStart,
    End,
    Leaf(i64),
}

/// Lex the structure section.
///
/// Characters accumulate into a numeral until a separator or structural
/// marker flushes it as a base-36 leaf token. The separator itself never
/// becomes a token; it exists only to terminate numerals.
fn tokenize(structure: &str) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::new();
    let mut numeral = String::new();
    for ch in structure.chars() {
        match ch {
            '|' | '$' | '@' | ']' => {
                if !numeral.is_empty() {
                    tokens.push(Token::Leaf(codec::from_base36(&numeral)?));
                    numeral.clear();
                }
                match ch {
                    '$' => tokens.push(Token::ObjectStart),
                    '@' => tokens.push(Token::ArrayStart),
                    ']' => tokens.push(Token::End),
                    _ => {}
                }
            }
            other => numeral.push(other),
        }
    }
    if !numeral.is_empty() {
        tokens.push(Token::Leaf(codec::from_base36(&numeral)?));
    }
    Ok(tokens)
}

/// Recursive-descent parser over the token stream. `pos` is the one shared
/// cursor; every recursive call advances it through the same slice.
struct Parser<'a> {
    tokens: &'a [Token],
    dict: &'a [Entry],
    pos: usize,
}

impl Parser<'_> {
    fn next(&mut self) -> Result<Token, DecodeError> {
        let token = *self
            .tokens
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    /// The root must open a container. Tokens after the root container
    /// closes are ignored.
    fn parse_root(&mut self) -> Result<Value, DecodeError> {
        match self.next()? {
            Token::ObjectStart => self.parse_object(0),
            Token::ArrayStart => self.parse_array(0),
            _ => Err(DecodeError::BadLeadingToken),
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep);
        }
        let mut items = Vec::new();
        loop {
            match self.next()? {
                Token::End => return Ok(Value::Array(items)),
                Token::ObjectStart => items.push(self.parse_object(depth + 1)?),
                Token::ArrayStart => items.push(self.parse_array(depth + 1)?),
                Token::Leaf(token) => items.push(self.leaf(token)?),
            }
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep);
        }
        let mut fields = Vec::new();
        loop {
            let key = match self.next()? {
                Token::End => return Ok(Value::Object(fields)),
                Token::Leaf(token) => self.key(token)?,
                Token::ObjectStart | Token::ArrayStart => {
                    return Err(DecodeError::NonStringKey)
                }
            };
            let value = match self.next()? {
                // a key with no value means the container is malformed
                Token::End => return Err(DecodeError::UnexpectedEnd),
                Token::ObjectStart => self.parse_object(depth + 1)?,
                Token::ArrayStart => self.parse_array(depth + 1)?,
                Token::Leaf(token) => self.leaf(token)?,
            };
            fields.push((key, value));
        }
    }

    /// Resolve a leaf token: sentinels directly, offsets via the combined
    /// dictionary. `get` enforces the strict `offset < len` bound; an offset
    /// equal to the dictionary length is already out of range.
    fn leaf(&self, token: i64) -> Result<Value, DecodeError> {
        if token < 0 {
            return match Sentinel::from_token(token) {
                Some(Sentinel::True) => Ok(Value::Bool(true)),
                Some(Sentinel::False) => Ok(Value::Bool(false)),
                Some(Sentinel::Null) | Some(Sentinel::Undefined) => Ok(Value::Null),
                Some(Sentinel::Empty) => Ok(Value::String(String::new())),
                None => Err(self.out_of_range(token)),
            };
        }
        match self.dict.get(token as usize) {
            Some(Entry::Str(s)) => Ok(Value::String(s.clone())),
            Some(Entry::Int(n)) => Ok(Value::Int(*n)),
            Some(Entry::Float(f)) => Ok(Value::Float(*f)),
            None => Err(self.out_of_range(token)),
        }
    }

    /// Resolve an object key token: the empty-string sentinel or a string
    /// dictionary entry, nothing else.
    fn key(&self, token: i64) -> Result<String, DecodeError> {
        if token == Sentinel::Empty as i64 {
            return Ok(String::new());
        }
        if token < 0 {
            return Err(DecodeError::NonStringKey);
        }
        match self.dict.get(token as usize) {
            Some(Entry::Str(s)) => Ok(s.clone()),
            Some(_) => Err(DecodeError::NonStringKey),
            None => Err(self.out_of_range(token)),
        }
    }

    fn out_of_range(&self, offset: i64) -> DecodeError {
        DecodeError::OffsetOutOfRange {
            offset,
            len: self.dict.len(),
        }
    }
}
