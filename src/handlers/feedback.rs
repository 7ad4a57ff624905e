//! # Feedback HTTP Handlers
//!
//! 피드백 제출과 목록 조회 HTTP 엔드포인트를 처리하는 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/api/feedback` | 새 피드백 제출 | 201 Created |
//! | `GET` | `/api/feedback` | 피드백 목록 조회 | 200 OK |
//!
//! 모든 응답은 `{ success, data?, error? }` 봉투를 사용합니다.
//! 데이터베이스를 사용할 수 없는 상태에서는 503이 반환됩니다.

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::domain::dto::feedback::{ApiResponse, CreateFeedbackRequest};
use crate::errors::AppError;
use crate::services::FeedbackService;

/// 새 피드백을 제출합니다.
///
/// 요청 본문의 형식 검증(길이, 공백)을 먼저 수행한 뒤 서비스에 위임합니다.
///
/// # Examples
///
/// ```bash
/// curl -X POST http://localhost:8080/api/feedback \
///   -H "Content-Type: application/json" \
///   -d '{"name":"Alice","message":"Great service!"}'
/// ```
#[post("")]
pub async fn submit_feedback(
    service: web::Data<FeedbackService>,
    payload: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = service.submit_feedback(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}

/// 최근 피드백 목록을 조회합니다. 제출 시간 내림차순입니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/api/feedback
/// ```
#[get("")]
pub async fn list_feedback(
    service: web::Data<FeedbackService>,
) -> Result<HttpResponse, AppError> {
    let feedbacks = service.list_feedback().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(feedbacks)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};

    use super::*;
    use crate::config::data_config::Environment;
    use crate::config::mongo_config::ResolverEnv;
    use crate::db::{Database, connection::ConnectionManager};

    fn sentinel_service() -> Arc<FeedbackService> {
        let manager = Arc::new(ConnectionManager::with_env(ResolverEnv {
            uri: Some("mongodb://localhost:27017".to_string()),
            password: None,
            mode: Environment::Development,
        }));
        Arc::new(FeedbackService::new(Arc::new(Database::new(manager))))
    }

    #[actix_web::test]
    async fn test_submit_rejects_invalid_payload() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sentinel_service()))
                .service(web::scope("/api/feedback").service(submit_feedback)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/feedback")
            .set_json(serde_json::json!({ "name": "", "message": "Hello" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_submit_without_database_returns_503() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sentinel_service()))
                .service(web::scope("/api/feedback").service(submit_feedback)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/api/feedback")
            .set_json(serde_json::json!({ "name": "Alice", "message": "Hello" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[actix_web::test]
    async fn test_list_without_database_returns_503() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sentinel_service()))
                .service(web::scope("/api/feedback").service(list_feedback)),
        )
        .await;

        let request = test::TestRequest::get().uri("/api/feedback").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], false);
    }
}
