//! 실행 환경 및 서버 설정 관리 모듈
//!
//! 실행 환경 감지, 서버 바인딩, 요청 제한 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Development`를 기본값으로 사용합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let env = Environment::current();
    /// match env {
    ///     Environment::Development => println!("개발 환경"),
    ///     Environment::Production => println!("프로덕션 환경"),
    ///     _ => {}
    /// }
    /// ```
    pub fn current() -> Self {
        match env::var("ENVIRONMENT").or_else(|_| env::var("NODE_ENV")) {
            Ok(value) => Self::from_str(&value),
            Err(_) => Environment::Development,
        }
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `s` - 환경 이름 문자열 (대소문자 무관)
    ///
    /// # Returns
    ///
    /// 해당하는 Environment 값. 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 개발 계열 환경인지 여부를 반환합니다.
    ///
    /// 연결 전략에서 개발용 사용자/데이터베이스 쌍과 로컬 폴백 허용 여부를
    /// 결정할 때 사용됩니다. Test는 개발 계열로 취급합니다.
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다.
    ///
    /// # Returns
    ///
    /// 포트 번호. 기본값: 8080
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: 커스텀 포트 설정
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다.
    ///
    /// # Returns
    ///
    /// 호스트 주소. 기본값: "0.0.0.0" (모든 인터페이스)
    ///
    /// # Environment Variables
    ///
    /// - `HOST`: 커스텀 호스트 설정
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }
}

/// 요청 제한(Rate Limiting) 설정
pub struct RateLimitConfig;

impl RateLimitConfig {
    /// 초당 허용 요청 수를 반환합니다. 기본값: 10
    ///
    /// # Environment Variables
    ///
    /// - `RATE_LIMIT_PER_SECOND`: 초당 요청 수
    pub fn per_second() -> u64 {
        env::var("RATE_LIMIT_PER_SECOND")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10)
    }

    /// 버스트 허용량을 반환합니다. 기본값: 20
    ///
    /// # Environment Variables
    ///
    /// - `RATE_LIMIT_BURST`: 버스트 크기
    pub fn burst_size() -> u32 {
        env::var("RATE_LIMIT_BURST")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .unwrap_or(20)
    }
}
