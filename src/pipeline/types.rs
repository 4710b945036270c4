//! Shared types for the inspection pipeline.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::channels::QueueMessage;

// ── Inbound record ──────────────────────────────────────────────────

/// Client data as published on the candidates topic.
///
/// Missing fields decode to their zero value; `surname` and `email` are
/// expected to be present but are not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub patronymic: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub approve: i32,
}

impl ClientRecord {
    /// Decode a message value.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

/// A client waiting for a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub id: i64,
    pub client: ClientRecord,
}

impl CandidateRecord {
    /// Build a candidate from a raw queue message.
    ///
    /// Never fails: an unusable key gives id 0 and an undecodable value is
    /// logged and replaced by an empty client.
    pub fn from_message(message: &QueueMessage) -> Self {
        let id = parse_candidate_id(message.key.as_deref());

        let client = match ClientRecord::decode(message.payload.as_deref().unwrap_or_default()) {
            Ok(client) => client,
            Err(e) => {
                warn!(
                    id,
                    partition = message.partition,
                    offset = message.offset,
                    error = %e,
                    "Error decoding candidate payload"
                );
                ClientRecord::default()
            }
        };

        Self { id, client }
    }
}

/// Parse a message key as a decimal id; anything unusable is 0.
pub fn parse_candidate_id(key: Option<&[u8]>) -> i64 {
    key.and_then(|k| std::str::from_utf8(k).ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

// ── Decision ────────────────────────────────────────────────────────

/// Outcome of an inspection. Encoded on the wire as `1` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn as_i32(self) -> i32 {
        match self {
            Verdict::Approve => 1,
            Verdict::Reject => -1,
        }
    }
}

impl From<Verdict> for i32 {
    fn from(v: Verdict) -> Self {
        v.as_i32()
    }
}

impl TryFrom<i32> for Verdict {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Verdict::Approve),
            -1 => Ok(Verdict::Reject),
            other => Err(format!("approve must be 1 or -1, got {other}")),
        }
    }
}

/// Decision sent to the recipient: `{"id": .., "approve": 1 | -1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: i64,
    pub approve: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(key: Option<&str>, payload: Option<&str>) -> QueueMessage {
        QueueMessage {
            key: key.map(|k| k.as_bytes().to_vec()),
            payload: payload.map(|p| p.as_bytes().to_vec()),
            partition: 0,
            offset: 7,
        }
    }

    #[test]
    fn client_round_trip_keeps_all_fields() {
        let raw = serde_json::json!({
            "surname": "Ivanov",
            "name": "Ivan",
            "patronymic": "Ivanovich",
            "email": "ivanov@example.com",
            "approve": 1
        });
        let client: ClientRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&client).unwrap(), raw);
    }

    #[test]
    fn missing_approve_defaults_to_zero() {
        let client =
            ClientRecord::decode(br#"{"surname":"Petrova","email":"p@example.com"}"#).unwrap();
        assert_eq!(client.surname, "Petrova");
        assert_eq!(client.name, "");
        assert_eq!(client.approve, 0);
    }

    #[test]
    fn wrong_field_type_is_a_decode_error() {
        assert!(ClientRecord::decode(br#"{"surname":"X","approve":"yes"}"#).is_err());
    }

    #[test]
    fn candidate_id_from_key() {
        assert_eq!(parse_candidate_id(Some(b"42")), 42);
        assert_eq!(parse_candidate_id(Some(b"-3")), -3);
        assert_eq!(parse_candidate_id(Some(b"abc")), 0);
        assert_eq!(parse_candidate_id(Some(b"12abc")), 0);
        assert_eq!(parse_candidate_id(Some(b"")), 0);
        assert_eq!(parse_candidate_id(Some(&[0xff, 0xfe])), 0);
        assert_eq!(parse_candidate_id(None), 0);
    }

    #[test]
    fn candidate_from_message() {
        let candidate = CandidateRecord::from_message(&message(
            Some("42"),
            Some(r#"{"surname":"Ivanov","email":"a@b.com"}"#),
        ));
        assert_eq!(candidate.id, 42);
        assert_eq!(candidate.client.surname, "Ivanov");
        assert_eq!(candidate.client.email, "a@b.com");
    }

    #[test]
    fn malformed_payload_still_yields_candidate() {
        let candidate = CandidateRecord::from_message(&message(Some("9"), Some("{not json")));
        assert_eq!(candidate.id, 9);
        assert_eq!(candidate.client, ClientRecord::default());

        let tombstone = CandidateRecord::from_message(&message(Some("nope"), None));
        assert_eq!(tombstone.id, 0);
        assert_eq!(tombstone.client, ClientRecord::default());
    }

    #[test]
    fn decision_wire_format() {
        let approve = DecisionRecord { id: 42, approve: Verdict::Approve };
        let reject = DecisionRecord { id: 42, approve: Verdict::Reject };
        assert_eq!(serde_json::to_string(&approve).unwrap(), r#"{"id":42,"approve":1}"#);
        assert_eq!(serde_json::to_string(&reject).unwrap(), r#"{"id":42,"approve":-1}"#);
    }

    #[test]
    fn verdict_rejects_other_values() {
        assert!(serde_json::from_str::<DecisionRecord>(r#"{"id":1,"approve":0}"#).is_err());
        assert!(serde_json::from_str::<DecisionRecord>(r#"{"id":1,"approve":2}"#).is_err());
        let back: DecisionRecord = serde_json::from_str(r#"{"id":1,"approve":-1}"#).unwrap();
        assert_eq!(back.approve, Verdict::Reject);
    }
}
