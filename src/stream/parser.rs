//! Frame payload parsing
//!
//! Converts a decoded frame payload into a typed event stamped with the
//! local receive time.

use chrono::Utc;
use serde_json::Value;

use crate::stream::events::{ReceivedEvent, StreamEvent, StreamParseError};

/// Parse one frame payload into a typed stream event.
///
/// The `type` tag is inspected before full deserialization so an
/// unrecognized tag is reported as `UnknownEventType` instead of a
/// generic serde error. A successful parse stamps the local receive
/// time; any timestamp the sender put in the payload is ignored.
pub fn parse_frame(payload: &str) -> Result<ReceivedEvent, StreamParseError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| StreamParseError::InvalidJson {
            source: e.to_string(),
        })?;

    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(StreamParseError::MissingType)?
        .to_string();

    if !StreamEvent::KNOWN_TYPES.contains(&tag.as_str()) {
        return Err(StreamParseError::UnknownEventType(tag));
    }

    let event: StreamEvent =
        serde_json::from_value(value).map_err(|e| StreamParseError::InvalidPayload {
            event_type: tag,
            source: e.to_string(),
        })?;

    Ok(ReceivedEvent {
        event,
        received_at: Utc::now(),
    })
}
