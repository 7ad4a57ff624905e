//! 공통 API 응답 봉투
//!
//! 모든 피드백 API 응답은 `{ success, data?, error? }` 형태를 사용합니다.

use serde::{Deserialize, Serialize};

/// API 응답 봉투
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 성공 응답을 생성합니다.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// 실패 응답을 생성합니다.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let response = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let response: ApiResponse<()> = ApiResponse::error("boom");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("data").is_none());
    }
}
