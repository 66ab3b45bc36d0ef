//! Common DTOs used across the API

use serde::Serialize;

/// Standard API response wrapper
///
/// The typed replacement for the loose response envelope of earlier
/// iterations: success flag, payload, and an optional message.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,

    /// Response data
    pub data: T,

    /// Response message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    /// Create a success response with data and message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.data, 42);
        assert!(response.message.is_none());
    }

    #[test]
    fn test_message_not_serialized_when_none() {
        let response = ApiResponse::success("ok");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("message"));

        let response = ApiResponse::with_message("ok", "created");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("created"));
    }
}
