//! 피드백허브 백엔드 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동합니다.
//! MongoDB 연결을 부트스트랩하고 피드백 수집 REST API를 제공합니다.
//!
//! 연결 부트스트랩이 실패해도 프로세스는 종료되지 않습니다.
//! 서버는 그대로 기동하며 데이터베이스가 필요한 요청은 503으로 응답합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

use feedbackhub_backend::config::{RateLimitConfig, ServerConfig};
use feedbackhub_backend::db::{Database, connection::ConnectionManager};
use feedbackhub_backend::middlewares::PrefixRewrite;
use feedbackhub_backend::routes::configure_all_routes;
use feedbackhub_backend::services::FeedbackService;
use feedbackhub_backend::utils::display_terminal::{print_boxed_title, print_sub_task};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    print_boxed_title("🚀 FEEDBACKHUB BACKEND");
    info!("🚀 피드백허브 백엔드 시작중...");

    // 데이터 스토어 초기화
    let (database, feedback_service) = initialize_data_stores().await;

    // HTTP 서버 시작
    start_http_server(database, feedback_service).await
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
/// 개발환경과 운영환경을 구분하여 설정을 관리합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// # Examples
///
/// ```bash
/// # 개발 환경
/// PROFILE=dev cargo run
///
/// # 운영 환경
/// PROFILE=prod cargo run
/// ```
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            // 기본 .env 파일 로드
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 RUST_LOG를 기반으로 로깅 레벨을 설정합니다.
/// 기본값은 info 레벨이며, actix_web은 debug 레벨로 설정됩니다.
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB 연결을 부트스트랩하고 서비스 컴포넌트를 구성합니다
///
/// 연결 관리자는 싱글톤 레지스트리를 통해 프로세스당 하나만 생성됩니다.
/// 연결 시도는 즉시 수행하되 실패해도 애플리케이션은 종료되지 않습니다.
/// 실패한 시도는 프로세스 수명 동안 종결 상태로 유지되며, 이후의 요청들은
/// 동일한 결과를 관찰하고 503으로 응답합니다.
///
/// # Returns
///
/// * `(Arc<Database>, Arc<FeedbackService>)` - 데이터베이스 액세서와 피드백 서비스
async fn initialize_data_stores() -> (Arc<Database>, Arc<FeedbackService>) {
    info!("📡 데이터베이스 연결 중...");

    let database = Arc::new(Database::new(ConnectionManager::shared()));
    let feedback_service = Arc::new(FeedbackService::new(Arc::clone(&database)));

    match database.get_database().await {
        Ok(_) => {
            print_sub_task("Database", "Connected");

            // 조회 정렬용 인덱스 준비 (실패해도 치명적이지 않음)
            if let Err(e) = feedback_service.init().await {
                warn!("⚠️ 인덱스 준비 실패: {}", e);
            }
        }
        Err(e) => {
            print_sub_task("Database", "Unavailable");
            error!("⚠️ 데이터베이스 없이 기동합니다: {}", e);
        }
    }

    (database, feedback_service)
}

/// CORS 설정을 구성합니다
///
/// 프론트엔드와의 통신을 위한 CORS(Cross-Origin Resource Sharing) 설정을 구성합니다.
/// 개발환경에서 로컬호스트 간 통신을 허용합니다.
///
/// # Returns
///
/// * `Cors` - 구성된 CORS 미들웨어
///
/// # Allowed Origins
///
/// * `http://localhost:3000` - 프론트엔드 개발 서버
/// * `http://localhost:8080` - 자체 서버
/// * `127.0.0.1` 동등한 주소들
fn configure_cors() -> Cors {
    Cors::default()
        // 허용할 Origin 설정
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        // 허용할 HTTP 메서드
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        // 허용할 헤더
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ACCESS_CONTROL_REQUEST_METHOD,
        ])
        // Preflight 요청 캐시 시간 (초)
        .max_age(3600)
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Actix-web 기반 HTTP 서버를 설정하고 실행합니다.
/// Rate Limiting, CORS, 로깅, 보안 응답 헤더, 경로 정규화,
/// 대체 진입 경로 재작성 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(
    database: Arc<Database>,
    feedback_service: Arc<FeedbackService>,
) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/api/health", bind_address);
    info!("📍 Feedback API: http://{}/api/feedback", bind_address);

    // Rate Limiting 설정
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(RateLimitConfig::per_second())
        .burst_size(RateLimitConfig::burst_size())
        .use_headers()
        .finish()
        .unwrap();

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        RateLimitConfig::per_second(),
        RateLimitConfig::burst_size()
    );

    let database_data = web::Data::from(database);
    let service_data = web::Data::from(feedback_service);

    HttpServer::new(move || {
        // CORS 설정
        let cors = configure_cors();

        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            // 기존 미들웨어들
            .wrap(cors)
            .wrap(middleware::Logger::default())
            // 보안 응답 헤더
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY"))
                    .add(("X-XSS-Protection", "1; mode=block")),
            )
            .wrap(middleware::NormalizePath::trim())
            // 대체 진입 경로 재작성 (라우팅 전에 적용)
            .wrap(PrefixRewrite::green())
            // 주입 컴포넌트
            .app_data(database_data.clone())
            .app_data(service_data.clone())
            // 라우트 설정
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(4) // 워커 스레드 수
    .run()
    .await
}
