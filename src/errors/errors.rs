//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 피드백 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 에러 분류
//!
//! 연결 부트스트랩 단계별로 에러를 구분합니다:
//!
//! - `ConfigurationError`: 어떤 연결 전략도 유효한 연결 정보를 만들지 못한 경우
//! - `ConnectionError`: 연결 수립 중 전송 계층 오류가 발생한 경우
//! - `DatabaseUnavailable`: 빌드용 목(mock) 연결이 런타임에 사용되었거나
//!   상태 점검(ping)이 실패한 경우
//!
//! 세 경우 모두 요청을 처리할 수 없는 상태이므로 503으로 변환됩니다.
//! 프로세스는 종료되지 않고 이후 요청도 동일하게 응답합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn submit(data: CreateFeedbackRequest) -> Result<Feedback, AppError> {
//!     if data.name.trim().is_empty() {
//!         return Err(AppError::ValidationError("이름은 필수입니다".to_string()));
//!     }
//!
//!     let feedback = repo.insert(data.into()).await?;
//!     Ok(feedback)
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 서비스에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// 연결 설정 해석 실패 (503 Service Unavailable)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 연결 수립 중 전송 계층 오류 (503 Service Unavailable)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 데이터베이스 사용 불가 (503 Service Unavailable)
    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    /// 데이터베이스 작업 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와
    /// `{ "success": false, "error": ... }` 형태의 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;

        let status = match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigurationError(_)
            | AppError::ConnectionError(_)
            | AppError::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// `validator` 검증 실패를 ValidationError로 변환합니다.
    ///
    /// 필드별 메시지를 한 줄로 합쳐 클라이언트가 원인을 파악할 수 있게 합니다.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let detail = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                messages.push(format!("{}: {}", field, detail));
            }
        }

        messages.sort();
        AppError::ValidationError(messages.join(", "))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        AppError::DatabaseError(error.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("name is required".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Feedback not found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_configuration_error_response() {
        let error = AppError::ConfigurationError("MONGODB_PASSWORD is required".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_connection_error_response() {
        let error = AppError::ConnectionError("Server selection timed out".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_database_unavailable_response() {
        let error = AppError::DatabaseUnavailable("ping failed".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());
        let response = error.error_response();

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_conversion() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1, message = "이름은 필수입니다"))]
            name: String,
        }

        let probe = Probe {
            name: String::new(),
        };
        let error: AppError = probe.validate().unwrap_err().into();

        match error {
            AppError::ValidationError(msg) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("이름은 필수입니다"));
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }
}
