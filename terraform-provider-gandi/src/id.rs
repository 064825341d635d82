//! Resource identifier codec
//!
//! The host stores every resource id as a string while the Gandi API uses
//! 64-bit integers. Compound ids join their parts with [`SEPARATOR`]:
//!
//! | Resource | Id |
//! |----------|----|
//! | zone | `"{zone_id}"` |
//! | zone version | `"{zone_id}_{version}"` |
//! | record | `"{record_id}"` |

use crate::error::{ResourceError, Result};

/// Separator between the parts of a compound id
pub const SEPARATOR: char = '_';

/// Join integer parts into a resource id
pub fn encode(parts: &[i64]) -> String {
    parts
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Split a resource id into exactly `arity` integer parts
pub fn decode(id: &str, arity: usize) -> Result<Vec<i64>> {
    let segments: Vec<&str> = id.split(SEPARATOR).collect();
    if segments.len() != arity {
        return Err(ResourceError::MalformedId {
            id: id.to_string(),
            reason: format!("expected {arity} part(s), found {}", segments.len()),
        });
    }

    segments
        .into_iter()
        .map(|segment| {
            segment
                .parse::<i64>()
                .map_err(|e| ResourceError::MalformedId {
                    id: id.to_string(),
                    reason: format!("'{segment}' is not an integer: {e}"),
                })
        })
        .collect()
}

pub fn encode_zone_id(zone_id: i64) -> String {
    encode(&[zone_id])
}

pub fn decode_zone_id(id: &str) -> Result<i64> {
    decode(id, 1).map(|parts| parts[0])
}

pub fn encode_zone_version_id(zone_id: i64, version: i64) -> String {
    encode(&[zone_id, version])
}

/// Returns `(zone_id, version)`
pub fn decode_zone_version_id(id: &str) -> Result<(i64, i64)> {
    decode(id, 2).map(|parts| (parts[0], parts[1]))
}

pub fn encode_record_id(record_id: i64) -> String {
    encode(&[record_id])
}

pub fn decode_record_id(id: &str) -> Result<i64> {
    decode(id, 1).map(|parts| parts[0])
}
