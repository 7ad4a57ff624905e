//! MongoDB 연결 설정 해석 모듈
//!
//! 환경 변수 스냅샷으로부터 MongoDB 연결 정보를 결정적으로 해석합니다.
//! 고정된 순서의 연결 전략을 차례로 시도하여 첫 성공을 채택합니다:
//!
//! 1. **빌드 감지** (`build`) - URI가 플레이스홀더 호스트를 가리키는 경우.
//!    아티팩트 빌드 중 네트워크 연결을 시도하지 않도록 목(mock) 연결 정보를 반환합니다.
//! 2. **직접 URI** (`direct-uri`) - `MONGODB_URI`가 실제 호스트를 가리키는 경우.
//!    URI 경로에서 데이터베이스 이름을 파싱합니다.
//! 3. **관리형 클러스터** (`managed`) - `MONGODB_PASSWORD`가 설정된 경우.
//!    고정 클러스터 호스트와 환경별 사용자/데이터베이스 쌍으로 URI를 조합합니다.
//! 4. **로컬 데몬 폴백** (`local-fallback`) - 개발 환경에서만. 사이드카 컨테이너
//!    호스트(`mongo`)를 가리키는 연결 정보를 구성합니다.
//!
//! 모든 전략이 실패하면 필요한 환경 변수를 나열하는 설정 에러를 반환합니다.
//!
//! ## 환경별 사용자 분리
//!
//! 개발과 프로덕션은 같은 클러스터 호스트와 비밀번호를 공유하지만
//! 서로 다른 사용자/데이터베이스 쌍을 사용합니다:
//!
//! | 환경 | 사용자 | 데이터베이스 |
//! |------|--------|--------------|
//! | development | `feedbackhub-local` | `feedbackhub_local_db` |
//! | production | `feedbackhub` | `feedbackhub_prod_db` |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::mongo_config::{MongoConfig, ResolverEnv};
//!
//! let env = ResolverEnv::from_process();
//! let config = MongoConfig::resolve(&env)?;
//!
//! println!("strategy: {}", config.strategy.as_str());
//! println!("database: {}", config.database);
//! ```

use std::env;

use log::{debug, info};

use crate::config::data_config::Environment;
use crate::errors::AppError;

/// 관리형 클러스터 호스트
const CLUSTER_HOST: &str = "cluster0.is0hvmh.mongodb.net";

/// URI 경로에 데이터베이스가 없을 때 사용하는 기본 이름
const DEFAULT_DATABASE: &str = "feedbackhub";

/// 개발 환경 사용자/데이터베이스 쌍
const DEV_USERNAME: &str = "feedbackhub-local";
const DEV_DATABASE: &str = "feedbackhub_local_db";

/// 프로덕션 환경 사용자/데이터베이스 쌍
const PROD_USERNAME: &str = "feedbackhub";
const PROD_DATABASE: &str = "feedbackhub_prod_db";

/// 로컬 데몬 폴백이 가리키는 사이드카 호스트
const LOCAL_FALLBACK_HOST: &str = "mongo";

/// URI에 사용자 정보가 없을 때의 주체(principal) 표기
const ANONYMOUS_PRINCIPAL: &str = "anonymous";

/// 로컬 데몬 기본 주소로 취급하는 호스트 (경로 없이 지정된 경우 플레이스홀더)
const LOCAL_DAEMON_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// 항상 플레이스홀더로 취급하는 호스트
const PLACEHOLDER_HOSTS: &[&str] = &["placeholder"];

/// 연결 전략 태그
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStrategy {
    /// 빌드 감지 - 네트워크 연결 없이 목 연결 정보 사용
    Build,
    /// 직접 URI - `MONGODB_URI`를 그대로 사용
    DirectUri,
    /// 관리형 클러스터 - 비밀번호로 연결 문자열 조합
    Managed,
    /// 로컬 데몬 폴백 - 사이드카 컨테이너 주소 사용
    LocalFallback,
}

impl ConnectionStrategy {
    /// 로그와 헬스체크에 사용하는 전략 태그 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStrategy::Build => "build",
            ConnectionStrategy::DirectUri => "direct-uri",
            ConnectionStrategy::Managed => "managed",
            ConnectionStrategy::LocalFallback => "local-fallback",
        }
    }
}

/// 연결 정보에 기록되는 환경 라벨
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentLabel {
    Development,
    Production,
    /// 빌드 중 생성된 목 연결 정보
    Build,
}

impl EnvironmentLabel {
    /// 라벨 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentLabel::Development => "development",
            EnvironmentLabel::Production => "production",
            EnvironmentLabel::Build => "build",
        }
    }

    /// 실행 환경으로부터 연결 라벨을 도출합니다.
    fn from_mode(mode: &Environment) -> Self {
        if mode.is_development() {
            EnvironmentLabel::Development
        } else {
            EnvironmentLabel::Production
        }
    }
}

/// 연결 해석에 필요한 환경 변수 스냅샷
///
/// 해석 로직이 프로세스 전역 상태 대신 명시적인 입력만 보도록
/// 필요한 변수들을 한 번에 캡처합니다.
#[derive(Debug, Clone)]
pub struct ResolverEnv {
    /// `MONGODB_URI` 값 (빈 문자열은 미설정으로 취급)
    pub uri: Option<String>,
    /// `MONGODB_PASSWORD` 값
    pub password: Option<String>,
    /// 실행 환경 (`ENVIRONMENT`/`NODE_ENV`)
    pub mode: Environment,
}

impl ResolverEnv {
    /// 현재 프로세스의 환경 변수에서 스냅샷을 생성합니다.
    pub fn from_process() -> Self {
        Self {
            uri: env::var("MONGODB_URI")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            password: env::var("MONGODB_PASSWORD")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            mode: Environment::current(),
        }
    }
}

/// 해석이 완료된 MongoDB 연결 정보
///
/// 연결 관리자가 실제 연결을 수립할 때와, 헬스체크가 연결 상태를
/// 보고할 때 사용됩니다. `uri`에는 비밀번호가 포함될 수 있으므로
/// 로그에는 [`MongoConfig::redacted_uri`]만 사용합니다.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB 연결 URI
    pub uri: String,
    /// 사용할 데이터베이스 이름 (항상 비어있지 않음)
    pub database: String,
    /// 연결 주체 (사용자 이름)
    pub username: String,
    /// 연결 환경 라벨
    pub environment: EnvironmentLabel,
    /// 채택된 연결 전략
    pub strategy: ConnectionStrategy,
}

/// 개별 연결 전략 함수 시그니처
type StrategyFn = fn(&ResolverEnv) -> Result<MongoConfig, AppError>;

/// 시도 순서가 고정된 전략 테이블. 첫 성공이 채택됩니다.
const STRATEGIES: &[(&str, StrategyFn)] = &[
    ("build", strategy_build_phase),
    ("direct-uri", strategy_direct_uri),
    ("managed", strategy_managed_credentials),
    ("local-fallback", strategy_local_daemon),
];

impl MongoConfig {
    /// 환경 스냅샷으로부터 연결 정보를 해석합니다.
    ///
    /// 전략 테이블을 순서대로 시도하여 첫 번째 성공을 반환합니다.
    /// 모든 전략이 실패하면 필요한 환경 변수를 나열하는
    /// `ConfigurationError`를 반환합니다.
    ///
    /// # Arguments
    ///
    /// * `env` - 환경 변수 스냅샷
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let config = MongoConfig::resolve(&ResolverEnv::from_process())?;
    /// ```
    pub fn resolve(env: &ResolverEnv) -> Result<Self, AppError> {
        for (tag, strategy) in STRATEGIES {
            match strategy(env) {
                Ok(config) => {
                    info!(
                        "🔧 연결 전략 '{}' 채택: environment={}, user={}, database={}",
                        config.strategy.as_str(),
                        config.environment.as_str(),
                        config.username,
                        config.database
                    );
                    return Ok(config);
                }
                Err(reason) => {
                    debug!("연결 전략 '{}' 건너뜀: {}", tag, reason);
                }
            }
        }

        Err(AppError::ConfigurationError(
            "사용 가능한 연결 전략이 없습니다. MONGODB_URI 또는 MONGODB_PASSWORD \
             환경 변수를 설정해주세요"
                .to_string(),
        ))
    }

    /// 헬스체크에 보고할 클러스터 라벨을 반환합니다.
    ///
    /// URI의 호스트 부분(포트 포함)을 사용하며,
    /// 빌드용 목 연결 정보에는 클러스터가 없으므로 `None`을 반환합니다.
    pub fn cluster_label(&self) -> Option<String> {
        if self.strategy == ConnectionStrategy::Build {
            return None;
        }
        uri_host(&self.uri).map(|host| host.to_string())
    }

    /// 비밀번호를 가린 URI를 반환합니다. 로그 출력 전용입니다.
    pub fn redacted_uri(&self) -> String {
        let Some((scheme, rest)) = split_scheme(&self.uri) else {
            return self.uri.clone();
        };

        match rest.rsplit_once('@') {
            Some((userinfo, remainder)) => {
                let user = userinfo.split(':').next().unwrap_or(userinfo);
                format!("{}{}:****@{}", scheme, user, remainder)
            }
            None => self.uri.clone(),
        }
    }
}

/// 전략 1: 빌드 감지
///
/// URI가 플레이스홀더 호스트(경로 없는 로컬 데몬 기본 주소 또는
/// `placeholder` 호스트)를 가리키면 목 연결 정보를 반환합니다.
/// 이 연결 정보로는 어떤 네트워크 연결도 시도되지 않습니다.
fn strategy_build_phase(env: &ResolverEnv) -> Result<MongoConfig, AppError> {
    let uri = env.uri.as_deref().ok_or_else(|| {
        AppError::ConfigurationError("MONGODB_URI가 설정되지 않았습니다".to_string())
    })?;

    if !is_placeholder_uri(uri) {
        return Err(AppError::ConfigurationError(
            "MONGODB_URI가 플레이스홀더 호스트가 아닙니다".to_string(),
        ));
    }

    Ok(MongoConfig {
        uri: uri.to_string(),
        database: uri_database(uri)
            .unwrap_or(DEFAULT_DATABASE)
            .to_string(),
        username: "build".to_string(),
        environment: EnvironmentLabel::Build,
        strategy: ConnectionStrategy::Build,
    })
}

/// 전략 2: 직접 URI
///
/// `MONGODB_URI`를 그대로 사용합니다. 데이터베이스 이름은 URI 경로에서
/// 파싱하며, 없으면 기본 이름을 사용합니다.
fn strategy_direct_uri(env: &ResolverEnv) -> Result<MongoConfig, AppError> {
    let uri = env.uri.as_deref().ok_or_else(|| {
        AppError::ConfigurationError("MONGODB_URI가 설정되지 않았습니다".to_string())
    })?;

    if is_placeholder_uri(uri) {
        return Err(AppError::ConfigurationError(
            "MONGODB_URI가 플레이스홀더 호스트를 가리킵니다".to_string(),
        ));
    }

    if split_scheme(uri).is_none() {
        return Err(AppError::ConfigurationError(
            "MONGODB_URI는 mongodb:// 또는 mongodb+srv:// 로 시작해야 합니다".to_string(),
        ));
    }

    Ok(MongoConfig {
        uri: uri.to_string(),
        database: uri_database(uri)
            .unwrap_or(DEFAULT_DATABASE)
            .to_string(),
        username: uri_username(uri)
            .unwrap_or(ANONYMOUS_PRINCIPAL)
            .to_string(),
        environment: EnvironmentLabel::from_mode(&env.mode),
        strategy: ConnectionStrategy::DirectUri,
    })
}

/// 전략 3: 관리형 클러스터
///
/// 고정 클러스터 호스트와 환경별 사용자/데이터베이스 쌍으로
/// 연결 문자열을 조합합니다. 쓰기 보증(w=majority)과 재시도 쓰기가
/// 활성화됩니다. 비밀번호는 URI에 퍼센트 인코딩되어 들어갑니다.
fn strategy_managed_credentials(env: &ResolverEnv) -> Result<MongoConfig, AppError> {
    let password = env.password.as_deref().ok_or_else(|| {
        AppError::ConfigurationError("MONGODB_PASSWORD가 설정되지 않았습니다".to_string())
    })?;

    let (username, database) = if env.mode.is_development() {
        (DEV_USERNAME, DEV_DATABASE)
    } else {
        (PROD_USERNAME, PROD_DATABASE)
    };

    let uri = format!(
        "mongodb+srv://{}:{}@{}/{}?retryWrites=true&w=majority&appName=Cluster0",
        username,
        urlencoding::encode(password),
        CLUSTER_HOST,
        database
    );

    Ok(MongoConfig {
        uri,
        database: database.to_string(),
        username: username.to_string(),
        environment: EnvironmentLabel::from_mode(&env.mode),
        strategy: ConnectionStrategy::Managed,
    })
}

/// 전략 4: 로컬 데몬 폴백
///
/// 개발 환경에서만 사이드카 컨테이너 호스트를 가리키는 연결 정보를
/// 구성합니다. 프로덕션에서는 실패하여 최종 설정 에러가 노출됩니다.
fn strategy_local_daemon(env: &ResolverEnv) -> Result<MongoConfig, AppError> {
    if !env.mode.is_development() {
        return Err(AppError::ConfigurationError(
            "프로덕션 환경에서는 로컬 데몬 폴백을 사용하지 않습니다".to_string(),
        ));
    }

    Ok(MongoConfig {
        uri: format!(
            "mongodb://{}:27017/{}",
            LOCAL_FALLBACK_HOST, DEFAULT_DATABASE
        ),
        database: DEFAULT_DATABASE.to_string(),
        username: ANONYMOUS_PRINCIPAL.to_string(),
        environment: EnvironmentLabel::Development,
        strategy: ConnectionStrategy::LocalFallback,
    })
}

/// URI에서 스킴을 분리합니다. 지원하지 않는 스킴이면 `None`.
fn split_scheme(uri: &str) -> Option<(&str, &str)> {
    for scheme in ["mongodb+srv://", "mongodb://"] {
        if let Some(rest) = uri.strip_prefix(scheme) {
            return Some((scheme, rest));
        }
    }
    None
}

/// 스킴 뒤의 권한(authority) 부분과 경로+쿼리 부분을 분리합니다.
fn split_authority(uri: &str) -> Option<(&str, Option<&str>)> {
    let (_, rest) = split_scheme(uri)?;
    match rest.split_once('/') {
        Some((authority, path_and_query)) => Some((authority, Some(path_and_query))),
        None => Some((rest, None)),
    }
}

/// URI의 호스트(포트 포함) 부분을 반환합니다.
fn uri_host(uri: &str) -> Option<&str> {
    let (authority, _) = split_authority(uri)?;
    Some(match authority.rsplit_once('@') {
        Some((_, host)) => host,
        None => authority,
    })
}

/// URI 사용자 정보에서 사용자 이름을 반환합니다.
fn uri_username(uri: &str) -> Option<&str> {
    let (authority, _) = split_authority(uri)?;
    let (userinfo, _) = authority.rsplit_once('@')?;
    Some(userinfo.split(':').next().unwrap_or(userinfo))
}

/// URI 경로에서 데이터베이스 이름을 반환합니다. 경로가 없으면 `None`.
fn uri_database(uri: &str) -> Option<&str> {
    let (_, path_and_query) = split_authority(uri)?;
    let path = path_and_query?;
    let database = path.split('?').next().unwrap_or(path);
    if database.is_empty() {
        None
    } else {
        Some(database)
    }
}

/// URI가 플레이스홀더 호스트를 가리키는지 확인합니다.
///
/// 경로(데이터베이스) 없이 로컬 데몬 기본 주소를 가리키거나,
/// 호스트 이름이 `placeholder`인 경우 빌드용 플레이스홀더로 취급합니다.
/// 데이터베이스 경로가 있는 로컬 주소는 실제 연결 대상입니다.
fn is_placeholder_uri(uri: &str) -> bool {
    let Some(host_port) = uri_host(uri) else {
        return false;
    };
    let host = host_port.split(':').next().unwrap_or(host_port);

    if PLACEHOLDER_HOSTS.contains(&host) {
        return true;
    }

    LOCAL_DAEMON_HOSTS.contains(&host) && uri_database(uri).is_none()
}
