// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON wire format for queue entries.

use chrono::{SecondsFormat, Utc};

use crate::error::LogramError;
use crate::types::QueueEntry;

/// Serializes an entry for storage in the pending queue. Pure; no I/O.
pub fn encode_entry(entry: &QueueEntry) -> Result<String, LogramError> {
    serde_json::to_string(entry).map_err(|e| LogramError::Codec {
        message: "failed to encode queue entry".into(),
        source: Some(Box::new(e)),
    })
}

/// Parses a stored payload back into an entry.
///
/// Anything that is not a JSON object is rejected.
pub fn decode_entry(payload: &str) -> Result<QueueEntry, LogramError> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|e| LogramError::Codec {
        message: "payload is not valid JSON".into(),
        source: Some(Box::new(e)),
    })?;
    if !value.is_object() {
        return Err(LogramError::Codec {
            message: "payload is not a JSON object".into(),
            source: None,
        });
    }
    serde_json::from_value(value).map_err(|e| LogramError::Codec {
        message: "payload does not match the entry shape".into(),
        source: Some(Box::new(e)),
    })
}

/// Current UTC time in the ISO-8601 form stored in `QueueEntry::time`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}
