// Stream name encoding for table streams
//
// Structured-storage stream names are limited to 31 UTF-16 code units,
// so table names are packed into a private code-unit range: characters
// of the MIME-like alphabet [0-9A-Za-z._] become 6-bit indices and two
// consecutive alphabet characters share one output unit.

use crate::types::MAX_STREAM_NAME;
use std::fmt;
use thiserror::Error;

/// First output unit of every table stream name
pub const TABLE_MARKER: u16 = 0x4840;

/// Bias of a unit holding a single alphabet character
const SINGLE_BASE: u16 = 0x4800;

/// Bias of a unit holding two folded alphabet characters
const PAIR_BASE: u16 = 0x3800;

/// The 64-entry alphabet, indexed by the encoded 6-bit value
pub const MIME_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz._";

/// Stream name encoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamNameError {
    /// The encoded name does not fit in a stream name
    #[error("stream name for {name:?} exceeds {limit} code units")]
    Overflow { name: String, limit: usize },
}

/// Result type for stream name encoding
pub type StreamNameResult<T> = Result<T, StreamNameError>;

/// An encoded stream name, without its terminator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamName(Vec<u16>);

impl StreamName {
    /// Encoded UTF-16 code units
    pub fn units(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name usable as a host file name.
    ///
    /// Encoded units never fall in the surrogate range, and surrogates
    /// passed through from the input stay paired, so this is lossless for
    /// names produced by [`encode_name`].
    pub fn to_file_name(&self) -> String {
        char::decode_utf16(self.0.iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_file_name())
    }
}

/// Map a code unit to its 6-bit alphabet index
pub fn mime_index(ch: u16) -> Option<u16> {
    match ch {
        0x30..=0x39 => Some(ch - 0x30),      // 0-9
        0x41..=0x5a => Some(ch - 0x41 + 10), // A-Z
        0x61..=0x7a => Some(ch - 0x61 + 36), // a-z
        0x2e => Some(62),                    // .
        0x5f => Some(63),                    // _
        _ => None,
    }
}

/// Encode a table (or table+qualifier) name as a stream name.
///
/// Pure function of its inputs. Encoding stops at the first NUL, the
/// input terminator. Characters outside the alphabet pass through as a
/// single unit. Fails with [`StreamNameError::Overflow`] when
/// the output, counting the table marker and the terminator, would exceed
/// [`MAX_STREAM_NAME`] units.
pub fn encode_name(is_table: bool, name: &str) -> StreamNameResult<StreamName> {
    let input: Vec<u16> = name.encode_utf16().take_while(|&unit| unit != 0).collect();
    let mut out = Vec::with_capacity(MAX_STREAM_NAME);

    if is_table {
        out.push(TABLE_MARKER);
    }

    let mut pos = 0;
    loop {
        // every pass writes one unit, the terminator included
        if out.len() >= MAX_STREAM_NAME {
            return Err(StreamNameError::Overflow {
                name: name.to_string(),
                limit: MAX_STREAM_NAME,
            });
        }
        if pos == input.len() {
            return Ok(StreamName(out));
        }

        let ch = input[pos];
        pos += 1;

        let unit = match mime_index(ch) {
            Some(low) => match input.get(pos).copied().and_then(mime_index) {
                Some(high) => {
                    pos += 1;
                    PAIR_BASE + low + (high << 6)
                }
                None => SINGLE_BASE + low,
            },
            None => ch,
        };
        out.push(unit);
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
