//! Message types for the consumer.

use std::collections::HashMap;

/// Header carrying the transaction id.
pub const TRANSACTION_ID_HEADER: &str = "X-Request-Id";

/// Header naming the system the content originates from.
pub const ORIGIN_SYSTEM_ID_HEADER: &str = "Origin-System-Id";

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Transaction ids of synthetic monitoring traffic contain this marker.
pub const SYNTHETIC_REQUEST_PREFIX: &str = "SYNTHETIC-REQ-MON";

pub const AUDIO_CONTENT_TYPE_MARKER: &str = "ft-upp-audio";
pub const ARTICLE_CONTENT_TYPE_MARKER: &str = "ft-upp-article";

/// A message received from the queue, detached from the broker client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueMessage {
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl QueueMessage {
    pub fn new(headers: HashMap<String, String>, body: impl Into<String>) -> Self {
        Self {
            headers,
            body: body.into(),
        }
    }

    /// Header value by name; names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_ignores_case() {
        let message = QueueMessage::default()
            .with_header("x-request-id", "tid_1")
            .with_header(ORIGIN_SYSTEM_ID_HEADER, "http://cmdb.ft.com/systems/cct");

        assert_eq!(message.header(TRANSACTION_ID_HEADER), Some("tid_1"));
        assert_eq!(
            message.header("origin-system-id"),
            Some("http://cmdb.ft.com/systems/cct")
        );
        assert_eq!(message.header(CONTENT_TYPE_HEADER), None);
    }
}
