//! Streaming wire format for the planner event stream.
//!
//! The planner streams its response as newline-terminated frames of the
//! form `data: <json>\n`, where the JSON payload carries a `type` tag
//! discriminating the event.
//!
//! # Module structure
//! - `decoder` - FrameDecoder: raw body chunks -> complete frame payloads
//! - `events` - Event type definitions (StreamEvent, ReceivedEvent, StreamParseError)
//! - `parser` - Parsing logic (parse_frame)

mod decoder;
mod events;
mod parser;

// Re-export public types
pub use decoder::FrameDecoder;
pub use events::{ReceivedEvent, StreamEvent, StreamParseError};
pub use parser::parse_frame;
