//! Record codec
//!
//! Moves an ordered record set between memory and the textual form stored
//! under a level key.
//!
//! ## Stored Format
//! ```text
//! {"players":[{"name":"A","score":10,...},{"name":"B","score":8,...}]}
//! ```
//! The array order is the ranked order. Extension fields of each record sit
//! next to `name` and `score`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoreError};
use crate::record::PlayerRecord;

/// Envelope written on encode (borrows the records)
#[derive(Serialize)]
struct EncodeEnvelope<'a, T> {
    players: &'a [T],
}

/// Envelope read on decode
///
/// A missing or `null` `players` field reads as an empty set, which is what
/// an empty object `{}` holds.
#[derive(Deserialize)]
#[serde(bound = "T: PlayerRecord")]
struct DecodeEnvelope<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_empty")]
    players: Vec<T>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: PlayerRecord,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Encode an ordered record set
///
/// The output is parsed back before returning, so text that [`decode`]
/// would reject (e.g. an extension field shadowing `name` or `score`) is an
/// [`ScoreError::Encode`] and never reaches the store.
pub fn encode<T: PlayerRecord>(records: &[T]) -> Result<String> {
    let text = serde_json::to_string(&EncodeEnvelope { players: records })
        .map_err(|e| ScoreError::Encode(e.to_string()))?;

    let decoded = decode::<T>(&text)
        .map_err(|e| ScoreError::Encode(format!("record set does not read back: {}", e)))?;
    if decoded.len() != records.len() {
        return Err(ScoreError::Encode(format!(
            "record set does not read back: wrote {} records, read {}",
            records.len(),
            decoded.len()
        )));
    }

    Ok(text)
}

/// Encode with indentation, for display
pub fn encode_pretty<T: PlayerRecord>(records: &[T]) -> Result<String> {
    serde_json::to_string_pretty(&EncodeEnvelope { players: records })
        .map_err(|e| ScoreError::Encode(e.to_string()))
}

/// Decode an ordered record set
///
/// Blank text decodes to an empty set. Text that does not parse into the
/// expected shape is a [`ScoreError::Decode`]; callers decide whether to
/// recover.
pub fn decode<T: PlayerRecord>(text: &str) -> Result<Vec<T>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let envelope: DecodeEnvelope<T> =
        serde_json::from_str(text).map_err(|e| ScoreError::Decode(e.to_string()))?;
    Ok(envelope.players)
}
