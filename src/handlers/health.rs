//! # Health Check Handlers
//!
//! 로드밸런서나 모니터링 시스템에서 서비스 상태를 확인하는 데 사용되는
//! 헬스체크 엔드포인트들입니다.
//!
//! - `GET /api/health` - 데이터베이스 상태 점검을 포함한 상세 헬스체크
//! - `GET /api/health/simple` - 프로세스 생존 여부만 확인하는 간이 헬스체크

use actix_web::{HttpResponse, get, web};
use log::error;
use serde_json::json;

use crate::db::Database;

/// 서비스 이름 (헬스체크 응답용)
const SERVICE_NAME: &str = "feedbackhub";

/// 상세 헬스체크 엔드포인트
///
/// 데이터베이스 상태 점검을 수행하고 연결 정보(환경, 데이터베이스,
/// 사용자, 클러스터)를 함께 보고합니다.
///
/// # Returns
///
/// * `200 OK` - 데이터베이스 상태 점검 성공
/// * `503 Service Unavailable` - 설정/연결/상태 점검 실패
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/api/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2024-01-01T00:00:00+00:00",
///   "service": "feedbackhub",
///   "version": "1.0.0",
///   "database": {
///     "status": "connected",
///     "environment": "production",
///     "database": "feedbackhub_prod_db",
///     "user": "feedbackhub",
///     "cluster": "cluster0.is0hvmh.mongodb.net"
///   }
/// }
/// ```
#[get("/api/health")]
pub async fn health_check(database: web::Data<Database>) -> HttpResponse {
    match database.get_database().await {
        Ok(_) => {
            let mut database_report = json!({ "status": "connected" });
            if let Some(config) = database.config().await {
                database_report["environment"] = json!(config.environment.as_str());
                database_report["database"] = json!(config.database);
                database_report["user"] = json!(config.username);
                if let Some(cluster) = config.cluster_label() {
                    database_report["cluster"] = json!(cluster);
                }
            }

            HttpResponse::Ok().json(json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "database": database_report
            }))
        }
        Err(failure) => {
            error!("Health check failed: {}", failure);

            let mut database_report = json!({
                "status": "disconnected",
                "error": failure.to_string()
            });
            if let Some(config) = database.config().await {
                database_report["environment"] = json!(config.environment.as_str());
                database_report["database"] = json!(config.database);
                database_report["user"] = json!(config.username);
                if let Some(cluster) = config.cluster_label() {
                    database_report["cluster"] = json!(cluster);
                }
            }

            HttpResponse::ServiceUnavailable().json(json!({
                "status": "unhealthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "database": database_report
            }))
        }
    }
}

/// 간이 헬스체크 엔드포인트
///
/// 데이터베이스 점검 없이 프로세스 생존 여부만 보고합니다.
///
/// # Examples
///
/// ```bash
/// curl http://localhost:8080/api/health/simple
/// ```
#[get("/api/health/simple")]
pub async fn simple_health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Service is running"
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};

    use super::*;
    use crate::config::data_config::Environment;
    use crate::config::mongo_config::ResolverEnv;
    use crate::db::connection::ConnectionManager;

    fn sentinel_database() -> Arc<Database> {
        let manager = Arc::new(ConnectionManager::with_env(ResolverEnv {
            uri: Some("mongodb://localhost:27017".to_string()),
            password: None,
            mode: Environment::Development,
        }));
        Arc::new(Database::new(manager))
    }

    #[actix_web::test]
    async fn test_simple_health_is_always_healthy() {
        let app = test::init_service(App::new().service(simple_health_check)).await;

        let request = test::TestRequest::get()
            .uri("/api/health/simple")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), actix_web::http::StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "feedbackhub");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_health_reports_unhealthy_without_database() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::from(sentinel_database()))
                .service(health_check),
        )
        .await;

        let request = test::TestRequest::get().uri("/api/health").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );

        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["database"]["status"], "disconnected");
        // 빌드용 목 연결이라도 연결 정보는 보고됨
        assert_eq!(body["database"]["environment"], "build");
        assert_eq!(body["database"]["database"], "feedbackhub");
        // 빌드용 목 연결에는 클러스터 라벨이 없음
        assert!(body["database"].get("cluster").is_none());
    }
}
