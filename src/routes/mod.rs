//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별로 그룹화하여 제공합니다.
//! 피드백 관련 라우트와 헬스체크 엔드포인트를 포함합니다.
//!
//! # Features
//!
//! - 피드백 제출/목록 API 엔드포인트
//! - 상세/간이 헬스체크 엔드포인트
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{App, web};
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_web::web;

use crate::handlers;

/// 모든 라우트를 설정합니다
///
/// 기능별로 분할된 라우트들을 통합하여 애플리케이션에 등록합니다.
///
/// # Arguments
///
/// * `cfg` - Actix-web 서비스 설정 객체
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoints
    cfg.service(handlers::health::simple_health_check);
    cfg.service(handlers::health::health_check);

    // Feature-specific routes
    configure_feedback_routes(cfg);
}

/// 피드백 관련 라우트를 설정합니다
///
/// # Available Routes
///
/// - `POST /api/feedback` - 새 피드백 제출
/// - `GET /api/feedback` - 피드백 목록 조회
///
/// # Examples
///
/// ```bash
/// curl -X POST http://localhost:8080/api/feedback \
///   -H "Content-Type: application/json" \
///   -d '{"name":"Alice","message":"Great service!"}'
///
/// curl http://localhost:8080/api/feedback
/// ```
fn configure_feedback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/feedback")
            .service(handlers::feedback::submit_feedback)
            .service(handlers::feedback::list_feedback),
    );
}
