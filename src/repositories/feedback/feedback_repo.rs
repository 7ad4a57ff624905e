//! # 피드백 리포지토리 구현
//!
//! 피드백 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB `feedbacks` 컬렉션에 대한 저장/조회 연산을 제공합니다.
//!
//! ## 에러 처리
//!
//! 모든 메서드는 `Result<T, AppError>` 타입을 반환합니다.
//! 데이터베이스 액세서를 통해 컬렉션을 얻으므로, 연결이 불가능한 상태에서는
//! 쿼리를 시도하기 전에 연결 계층의 에러가 그대로 전파됩니다.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{Collection, IndexModel, bson::doc};

use crate::db::Database;
use crate::domain::entities::feedback::Feedback;
use crate::errors::AppError;
use crate::repositories::Repository;

/// 피드백 컬렉션 이름
const COLLECTION_NAME: &str = "feedbacks";

/// 목록 조회 시 반환하는 최대 문서 수
const LIST_LIMIT: i64 = 50;

/// 피드백 데이터 액세스 리포지토리
///
/// 피드백 엔티티의 저장과 조회를 담당합니다. 피드백은 생성 이후
/// 수정/삭제되지 않으므로 쓰기 연산은 insert 하나뿐입니다.
pub struct FeedbackRepository {
    /// MongoDB 데이터베이스 액세서
    db: Arc<Database>,
}

impl FeedbackRepository {
    /// 새 피드백 리포지토리를 생성합니다.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// 피드백 컬렉션 핸들을 반환합니다.
    ///
    /// 매 호출마다 데이터베이스 액세서의 상태 점검을 거칩니다.
    async fn collection(&self) -> Result<Collection<Feedback>, AppError> {
        Ok(self
            .db
            .get_database()
            .await?
            .collection::<Feedback>(COLLECTION_NAME))
    }

    /// 피드백을 저장합니다.
    ///
    /// # 반환값
    ///
    /// MongoDB가 부여한 ID가 채워진 피드백
    pub async fn insert(&self, mut feedback: Feedback) -> Result<Feedback, AppError> {
        let collection = self.collection().await?;
        let result = collection.insert_one(&feedback).await?;

        feedback.id = result.inserted_id.as_object_id();
        Ok(feedback)
    }

    /// 최근 피드백 목록을 조회합니다.
    ///
    /// 제출 시간 내림차순으로 최대 [`LIST_LIMIT`]건을 반환합니다.
    pub async fn find_recent(&self) -> Result<Vec<Feedback>, AppError> {
        let collection = self.collection().await?;

        let mut cursor = collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .limit(LIST_LIMIT)
            .await?;

        let mut feedbacks = Vec::new();
        while let Some(feedback) = cursor.try_next().await? {
            feedbacks.push(feedback);
        }

        Ok(feedbacks)
    }
}

#[async_trait]
impl Repository for FeedbackRepository {
    fn name(&self) -> &str {
        "feedback"
    }

    fn collection_name(&self) -> &str {
        COLLECTION_NAME
    }

    /// 조회 정렬에 사용하는 제출 시간 내림차순 인덱스를 생성합니다.
    async fn init(&self) -> Result<(), AppError> {
        let collection = self.collection().await?;

        let index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .build();
        collection.create_index(index).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::data_config::Environment;
    use crate::config::mongo_config::ResolverEnv;
    use crate::db::connection::ConnectionManager;

    fn sentinel_repository() -> FeedbackRepository {
        let manager = Arc::new(ConnectionManager::with_env(ResolverEnv {
            uri: Some("mongodb://localhost:27017".to_string()),
            password: None,
            mode: Environment::Development,
        }));
        FeedbackRepository::new(Arc::new(Database::new(manager)))
    }

    #[test]
    fn test_repository_metadata() {
        let repo = sentinel_repository();

        assert_eq!(repo.name(), "feedback");
        assert_eq!(repo.collection_name(), "feedbacks");
    }

    #[actix_web::test]
    async fn test_operations_fail_without_real_connection() {
        let repo = sentinel_repository();

        let insert_error = repo
            .insert(Feedback::new("Alice".to_string(), "Hello".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(insert_error, AppError::DatabaseUnavailable(_)));

        let list_error = repo.find_recent().await.unwrap_err();
        assert!(matches!(list_error, AppError::DatabaseUnavailable(_)));

        let init_error = repo.init().await.unwrap_err();
        assert!(matches!(init_error, AppError::DatabaseUnavailable(_)));
    }
}
