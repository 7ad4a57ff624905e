//! # Service Registry - 싱글톤 컨테이너
//!
//! 프로세스 전역 인프라 컴포넌트를 관리하는 싱글톤 컨테이너입니다.
//! 연결 관리자처럼 프로세스당 정확히 하나만 존재해야 하는 컴포넌트를
//! 타입 기반으로 저장하고 지연 초기화합니다.
//!
//! ## 동작 원리
//!
//! ```text
//! 1. 등록 (Registration)
//!    ├─ ServiceLocator::set(Arc<T>) → TypeId 키로 저장
//!    └─ ServiceLocator::get_or_init(|| ...) → 없으면 생성 후 저장
//!
//! 2. 조회 (Lookup)
//!    ├─ ServiceLocator::get::<T>() → Arc 다운캐스트 후 복제 반환
//!    └─ 이후 동일 타입 요청 시 같은 인스턴스 반환
//! ```
//!
//! 요청 핸들러는 이 컨테이너를 직접 조회하지 않습니다. 부트스트랩 단계에서
//! 꺼낸 인스턴스를 `web::Data`로 주입받아 사용합니다. 컨테이너의 역할은
//! 워커별 앱 팩토리나 반복 생성되는 테스트 하네스가 연결 관리자를
//! 중복 생성하지 않도록 보장하는 것입니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::core::registry::ServiceLocator;
//! use crate::db::connection::ConnectionManager;
//!
//! let manager = ServiceLocator::get_or_init(|| Arc::new(ConnectionManager::new()));
//! let same = ServiceLocator::get::<ConnectionManager>().unwrap();
//! assert!(Arc::ptr_eq(&manager, &same));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

/// 타입 ID → 컴포넌트 인스턴스 매핑
///
/// 프로세스 수명 동안 유지되는 전역 저장소입니다.
/// `RwLock`으로 보호되어 동시 조회는 병렬로, 등록은 배타적으로 수행됩니다.
static GLOBAL_COMPONENTS: Lazy<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 싱글톤 컨테이너
///
/// 상태는 전역 저장소에 있고 이 구조체는 네임스페이스 역할만 합니다.
pub struct ServiceLocator;

impl ServiceLocator {
    /// 컴포넌트 인스턴스를 등록합니다.
    ///
    /// 같은 타입이 이미 등록되어 있으면 새 인스턴스로 교체됩니다.
    ///
    /// # Arguments
    ///
    /// * `instance` - 등록할 컴포넌트 (`Arc`로 래핑)
    pub fn set<T: Send + Sync + 'static>(instance: Arc<T>) {
        let mut components = GLOBAL_COMPONENTS
            .write()
            .expect("component registry lock poisoned");
        components.insert(TypeId::of::<T>(), instance);
    }

    /// 등록된 컴포넌트를 조회합니다.
    ///
    /// # Returns
    ///
    /// * `Some(Arc<T>)` - 등록된 인스턴스
    /// * `None` - 해당 타입이 등록되지 않은 경우
    pub fn get<T: Send + Sync + 'static>() -> Option<Arc<T>> {
        let components = GLOBAL_COMPONENTS
            .read()
            .expect("component registry lock poisoned");
        components
            .get(&TypeId::of::<T>())
            .and_then(|component| Arc::clone(component).downcast::<T>().ok())
    }

    /// 컴포넌트를 조회하고, 없으면 생성하여 등록합니다.
    ///
    /// 쓰기 잠금 안에서 확인-후-생성을 수행하므로 동시에 호출되어도
    /// 인스턴스는 한 번만 생성됩니다.
    ///
    /// # Arguments
    ///
    /// * `init` - 최초 1회 호출되는 생성 함수
    pub fn get_or_init<T, F>(init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Arc<T>,
    {
        let mut components = GLOBAL_COMPONENTS
            .write()
            .expect("component registry lock poisoned");

        if let Some(existing) = components
            .get(&TypeId::of::<T>())
            .and_then(|component| Arc::clone(component).downcast::<T>().ok())
        {
            return existing;
        }

        let instance = init();
        components.insert(TypeId::of::<T>(), Arc::clone(&instance) as Arc<dyn Any + Send + Sync>);
        instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ProbeComponent {
        value: u32,
    }

    struct OtherComponent;

    #[test]
    fn test_set_and_get_roundtrip() {
        ServiceLocator::set(Arc::new(ProbeComponent { value: 7 }));

        let fetched = ServiceLocator::get::<ProbeComponent>().unwrap();
        assert_eq!(fetched.value, 7);
    }

    #[test]
    fn test_get_unregistered_returns_none() {
        assert!(ServiceLocator::get::<OtherComponent>().is_none());
    }

    #[test]
    fn test_get_or_init_returns_same_instance() {
        struct InitOnce;

        let first = ServiceLocator::get_or_init(|| Arc::new(InitOnce));
        let second = ServiceLocator::get_or_init(|| Arc::new(InitOnce));

        assert!(Arc::ptr_eq(&first, &second));
    }
}
