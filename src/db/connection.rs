//! 연결 관리자 모듈
//!
//! MongoDB 연결 수립과 프로세스 전역 재사용을 담당합니다.
//!
//! 연결 시도는 프로세스당 정확히 한 번 수행됩니다. 완료된 시도(성공/실패)는
//! 비동기 원스셀에 저장되어 이후의 모든 호출자와 동시 호출자가 같은 결과를
//! 관찰합니다. 실패한 시도는 해당 프로세스에서 종결이며, 새 시도는 새 프로세스에서만
//! 일어납니다.
//!
//! 빌드용 목 연결 정보는 네트워크 연결을 전혀 시도하지 않고 즉시
//! "사용 불가" 센티널 핸들로 귀결됩니다.
//!
//! # 상태 전이
//!
//! ```text
//! UNINITIALIZED ──get_connection()──▶ CONNECTING ──▶ CONNECTED (종결)
//!                                         │
//!                                         └────────▶ FAILED    (종결)
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use mongodb::{Client, options::ClientOptions};
use tokio::sync::OnceCell;

use crate::config::mongo_config::{ConnectionStrategy, MongoConfig, ResolverEnv};
use crate::core::registry::ServiceLocator;
use crate::errors::AppError;

/// 연결 핸들
///
/// 연결 관리자가 소유하며 모든 호출자가 읽기 전용으로 공유합니다.
pub enum ConnectionHandle {
    /// 실제 MongoDB 클라이언트 (연결 풀 포함)
    Connected(Client),
    /// 빌드용 목 연결 - 런타임에 사용되면 데이터베이스 사용 불가 에러
    Unavailable,
}

/// 수립이 완료된 연결
pub struct EstablishedConnection {
    /// 해석된 연결 정보
    pub config: MongoConfig,
    /// 연결 핸들
    pub handle: ConnectionHandle,
}

/// 종결된 연결 실패
///
/// 설정 해석 실패(연결 정보 없음)와 전송 계층 실패(연결 정보 있음)를
/// 모두 표현합니다. 헬스체크가 실패 상태에서도 연결 정보를 보고할 수
/// 있도록 해석에 성공한 설정을 함께 보관합니다.
#[derive(Debug, Clone)]
pub struct ConnectionFailure {
    /// 해석에 성공했던 연결 정보 (설정 단계 실패면 `None`)
    pub config: Option<MongoConfig>,
    /// 실패 원인 메시지 (비밀번호 미포함)
    pub message: String,
}

impl ConnectionFailure {
    /// 실패를 적절한 애플리케이션 에러로 변환합니다.
    pub fn to_app_error(&self) -> AppError {
        match self.config {
            Some(_) => AppError::ConnectionError(self.message.clone()),
            None => AppError::ConfigurationError(self.message.clone()),
        }
    }
}

/// MongoDB 연결 관리자
///
/// 환경 스냅샷을 보관하고, 첫 요청 시점에 연결을 수립하여
/// 완료된 결과를 프로세스 수명 동안 재사용합니다.
pub struct ConnectionManager {
    /// 연결 해석에 사용할 환경 스냅샷
    env: ResolverEnv,
    /// 완료된 연결 시도 (성공 또는 종결 실패)
    slot: OnceCell<Result<EstablishedConnection, ConnectionFailure>>,
}

impl ConnectionManager {
    /// 현재 프로세스 환경으로 새 연결 관리자를 생성합니다.
    pub fn new() -> Self {
        Self::with_env(ResolverEnv::from_process())
    }

    /// 지정한 환경 스냅샷으로 연결 관리자를 생성합니다.
    pub fn with_env(env: ResolverEnv) -> Self {
        Self {
            env,
            slot: OnceCell::new(),
        }
    }

    /// 프로세스 전역 연결 관리자를 반환합니다.
    ///
    /// 싱글톤 레지스트리에 지연 등록되므로 워커별 앱 팩토리나
    /// 반복 생성되는 테스트 하네스에서 호출해도 관리자는 하나만 만들어집니다.
    pub fn shared() -> Arc<ConnectionManager> {
        ServiceLocator::get_or_init(|| Arc::new(ConnectionManager::new()))
    }

    /// 연결을 반환합니다. 필요하면 최초 1회 수립합니다.
    ///
    /// 동시에 N번 호출되어도 실제 연결 시도는 한 번만 일어나며,
    /// 모든 호출자가 동일한 결과를 관찰합니다.
    pub async fn get_connection(&self) -> &Result<EstablishedConnection, ConnectionFailure> {
        self.slot.get_or_init(|| self.establish()).await
    }

    /// 연결 정보를 해석하고 연결을 수립합니다.
    ///
    /// 빌드용 목 연결 정보는 네트워크 연결 없이 즉시 센티널 핸들로 귀결됩니다.
    async fn establish(&self) -> Result<EstablishedConnection, ConnectionFailure> {
        let config = match MongoConfig::resolve(&self.env) {
            Ok(config) => config,
            Err(error) => {
                let message = error.to_string();
                error!("❌ MongoDB 연결 정보 해석 실패: {}", message);
                return Err(ConnectionFailure {
                    config: None,
                    message,
                });
            }
        };

        if config.strategy == ConnectionStrategy::Build {
            warn!(
                "🧱 빌드용 목 연결 정보 감지: database={} - 네트워크 연결을 건너뜁니다",
                config.database
            );
            return Ok(EstablishedConnection {
                config,
                handle: ConnectionHandle::Unavailable,
            });
        }

        match Self::connect(&config).await {
            Ok(client) => {
                info!(
                    "✅ MongoDB 연결 성공: '{}' 사용자",
                    config.username
                );
                info!("📊 Database: {}", config.database);
                info!("🌍 Environment: {}", config.environment.as_str());
                if let Some(cluster) = config.cluster_label() {
                    info!("🔗 Cluster: {}", cluster);
                }
                Ok(EstablishedConnection {
                    config,
                    handle: ConnectionHandle::Connected(client),
                })
            }
            Err(error) => {
                let message = error.to_string();
                error!("❌ MongoDB 연결 실패:");
                error!("   Environment: {}", config.environment.as_str());
                error!("   User: {}", config.username);
                error!("   Database: {}", config.database);
                error!("   Error: {}", message);
                Err(ConnectionFailure {
                    config: Some(config),
                    message,
                })
            }
        }
    }

    /// 클라이언트를 구성하고 연결을 검증합니다.
    async fn connect(config: &MongoConfig) -> Result<Client, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;

        // 전송 계층 신뢰성 옵션
        client_options.max_pool_size = Some(10);
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.connect_timeout = Some(Duration::from_secs(10));

        // URI에 앱 이름이 없으면 기본값 설정 (모니터링 및 로깅에 유용)
        if client_options.app_name.is_none() {
            client_options.app_name = Some("feedbackhub".to_string());
        }

        let client = Client::with_options(client_options)?;

        // 연결 테스트
        client
            .database(&config.database)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        Ok(client)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}
