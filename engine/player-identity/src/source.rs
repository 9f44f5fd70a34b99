//! Decoding of provider payloads into reconciliation input
//!
//! This is where caller contract violations surface: a payload that is not a
//! list of rows is rejected here, before anything reaches the matcher.

use crate::error::{IdentityError, Result};
use crate::types::{CanonicalPlayer, ForeignRecord};
use serde_json::Value;

/// Decode canonical players
///
/// Accepts a JSON array of players, or Sleeper's `/players/nfl` dump: an
/// object keyed by player ID. For the keyed form the key fills in a missing
/// `player_id`, and players come out in key order.
pub fn parse_players(json: &str) -> Result<Vec<CanonicalPlayer>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => decode_rows(rows),
        Value::Object(entries) => entries
            .into_iter()
            .map(|(key, mut entry)| {
                if let Value::Object(fields) = &mut entry {
                    fields.entry("player_id").or_insert(Value::String(key));
                }
                serde_json::from_value(entry).map_err(IdentityError::from)
            })
            .collect(),
        other => Err(IdentityError::invalid_input(format!(
            "expected a player array or an object keyed by player id, found {}",
            kind(&other)
        ))),
    }
}

/// Decode provider records
///
/// Accepts a JSON array of rows, or an object carrying them under `players`
/// as the FantasyPros API does. Individual rows never fail to decode; a row
/// with unusable fields simply offers fewer identity keys.
pub fn parse_records(json: &str) -> Result<Vec<ForeignRecord>> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => Ok(rows.into_iter().map(ForeignRecord::from_row).collect()),
        Value::Object(mut body) => match body.remove("players") {
            Some(Value::Array(rows)) => Ok(rows.into_iter().map(ForeignRecord::from_row).collect()),
            Some(other) => Err(IdentityError::invalid_input(format!(
                "expected 'players' to be an array, found {}",
                kind(&other)
            ))),
            None => Err(IdentityError::invalid_input("object payload has no 'players' array")),
        },
        other => Err(IdentityError::invalid_input(format!(
            "expected a record array, found {}",
            kind(&other)
        ))),
    }
}

fn decode_rows(rows: Vec<Value>) -> Result<Vec<CanonicalPlayer>> {
    rows.into_iter().map(|row| serde_json::from_value(row).map_err(IdentityError::from)).collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
