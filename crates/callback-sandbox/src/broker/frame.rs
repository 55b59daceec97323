//! Server-Sent Events framing for observer streams.

use crate::model::BroadcastEvent;

/// SSE event name used for every frame.
pub const SSE_EVENT_NAME: &str = "message";

/// Encodes `event` as one SSE frame: `event:message\ndata:<json>\n\n`.
///
/// The JSON is compact, so the data never spans multiple lines.
pub fn encode_sse(event: &BroadcastEvent) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(event)?;
    Ok(format!("event:{SSE_EVENT_NAME}\ndata:{data}\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_layout() {
        let event = BroadcastEvent::new("callback", json!({ "status": "SUCCESS" }));
        let frame = encode_sse(&event).unwrap();
        assert_eq!(
            frame,
            "event:message\ndata:{\"type\":\"callback\",\"payload\":{\"status\":\"SUCCESS\"}}\n\n"
        );
    }

    #[test]
    fn test_multiline_strings_stay_on_one_data_line() {
        let event = BroadcastEvent::new("callback", json!({ "message": "line1\nline2" }));
        let frame = encode_sse(&event).unwrap();
        assert_eq!(frame.matches('\n').count(), 3);
    }
}
