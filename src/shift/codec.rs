//! Persisted string form of an axis membership: decimal vertex indices joined
//! with `,`. The empty string is the empty set.

use std::collections::BTreeSet;
use thiserror::Error;

pub type VertexIndex = u32;

pub type IndexSet = BTreeSet<VertexIndex>;

pub const SEPARATOR: &str = ",";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexSetError {
    #[error("invalid vertex index {token:?} at position {position}")]
    InvalidToken { token: String, position: usize },
}

/// Parses a persisted index list, rejecting the whole string on the first
/// token that is not a non-negative decimal integer.
pub fn decode(s: &str) -> Result<IndexSet, IndexSetError> {
    let mut out = IndexSet::new();
    if s.is_empty() {
        return Ok(out);
    }

    for (position, raw) in s.split(SEPARATOR).enumerate() {
        let token = raw.trim();
        // `u32::from_str` accepts a leading '+', which never appears in our output.
        let valid = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
        let index = if valid {
            token.parse::<VertexIndex>().ok()
        } else {
            None
        };
        match index {
            Some(index) => {
                out.insert(index);
            }
            None => {
                return Err(IndexSetError::InvalidToken {
                    token: raw.to_string(),
                    position,
                });
            }
        }
    }
    Ok(out)
}

/// Encodes indices in ascending order. Duplicates in the input collapse.
pub fn encode<I>(indices: I) -> String
where
    I: IntoIterator<Item = VertexIndex>,
{
    let sorted: IndexSet = indices.into_iter().collect();
    let parts: Vec<String> = sorted.iter().map(|index| index.to_string()).collect();
    parts.join(SEPARATOR)
}
