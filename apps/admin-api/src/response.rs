//! # Response Envelope
//!
//! Every endpoint answers with the same JSON shape:
//! `{success: bool, data?, error?, code?, count?}`.

use serde::Serialize;

/// The uniform API envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Short machine-readable error code, when the failure carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success with payload.
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            count: None,
        }
    }

    /// Success with payload and a count (list endpoints, batch outcomes).
    pub fn with_count(data: T, count: u64) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            count: Some(count),
        }
    }
}

impl ApiResponse<()> {
    /// Failure envelope.
    pub fn err(message: impl Into<String>, code: Option<&str>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
            code: code.map(|c| c.to_string()),
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_omits_error_fields() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(ApiResponse::err("boom", Some("query_failed"))).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert_eq!(json["code"], "query_failed");
        assert!(json.get("data").is_none());
    }
}
