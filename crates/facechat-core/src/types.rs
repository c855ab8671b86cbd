use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Chat wire types
// =============================================================================

/// Body of `POST /chat`, both on the relay and on the inference backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Uniform reply envelope `{ "response": text }`.
///
/// The relay returns this shape on success and on failure alike.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEnvelope {
    pub response: String,
}

impl ChatEnvelope {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

// =============================================================================
// Face backend wire types
// =============================================================================

/// Status value the face backend uses for a successful call.
pub const STATUS_SUCCESS: &str = "success";

/// Body of `POST /register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    /// `data:` URI with a base64 payload.
    pub image: String,
}

/// Body of `POST /recognize`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizeRequest {
    /// `data:` URI with a base64 payload.
    pub image: String,
}

/// Body of `POST /delete-name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteNameRequest {
    pub name: String,
}

/// Response shape shared by every face backend endpoint.
///
/// Only `status` is always present. `names` accompanies a successful
/// recognition, `data` a successful listing, `message` the maintenance
/// endpoints and `reason` any non-success status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBackendResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `[name, timestamp]` rows from `GET /list-db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<(String, String)>>,
}

impl FaceBackendResponse {
    pub fn success() -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            ..Self::default()
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            reason: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// A face known to the backend registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredFace {
    pub name: String,
    /// Registration time as reported by the backend. `None` when the
    /// backend sent a timestamp that is not ISO 8601.
    pub registered_at: Option<NaiveDateTime>,
}

impl RegisteredFace {
    /// Build from a `[name, timestamp]` row.
    pub fn from_row((name, timestamp): (String, String)) -> Self {
        Self {
            name,
            registered_at: timestamp.parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let json = serde_json::to_string(&ChatRequest::new("hello")).unwrap();
        assert_eq!(json, r#"{"message":"hello"}"#);
    }

    #[test]
    fn test_chat_envelope_wire_shape() {
        let env: ChatEnvelope = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(env, ChatEnvelope::new("hi"));
    }

    #[test]
    fn test_face_response_success_with_names() {
        let resp: FaceBackendResponse =
            serde_json::from_str(r#"{"status":"success","names":["Alice","Bob"]}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(
            resp.names,
            Some(vec!["Alice".to_string(), "Bob".to_string()])
        );
        assert!(resp.reason.is_none());
    }

    #[test]
    fn test_face_response_failure_with_reason() {
        let resp: FaceBackendResponse =
            serde_json::from_str(r#"{"status":"error","reason":"No face detected"}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.reason.as_deref(), Some("No face detected"));
    }

    #[test]
    fn test_face_response_missing_status_is_rejected() {
        let result = serde_json::from_str::<FaceBackendResponse>(r#"{"names":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_face_response_listing_rows() {
        let resp: FaceBackendResponse = serde_json::from_str(
            r#"{"status":"success","data":[["Alice","2024-05-01T10:20:30.123456"]]}"#,
        )
        .unwrap();
        let rows = resp.data.unwrap();
        let face = RegisteredFace::from_row(rows[0].clone());
        assert_eq!(face.name, "Alice");
        let at = face.registered_at.unwrap();
        assert_eq!(at.format("%Y-%m-%d").to_string(), "2024-05-01");
    }

    #[test]
    fn test_registered_face_bad_timestamp() {
        let face = RegisteredFace::from_row(("Bob".to_string(), "yesterday".to_string()));
        assert_eq!(face.name, "Bob");
        assert!(face.registered_at.is_none());
    }

    #[test]
    fn test_failure_constructor_omits_empty_fields() {
        let json = serde_json::to_string(&FaceBackendResponse::failure("nope")).unwrap();
        assert_eq!(json, r#"{"status":"error","reason":"nope"}"#);
    }
}
