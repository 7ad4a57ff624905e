//! 피드백 서비스 구현
//!
//! 피드백 제출/조회의 비즈니스 로직을 담당합니다.
//! 입력 정리(트리밍)와 필수값 검증을 거친 후 리포지토리에 위임하고,
//! 엔티티를 응답 DTO로 변환하여 반환합니다.

use std::sync::Arc;

use log::info;

use crate::db::Database;
use crate::domain::dto::feedback::{CreateFeedbackRequest, FeedbackResponse};
use crate::domain::entities::feedback::Feedback;
use crate::errors::AppError;
use crate::repositories::{FeedbackRepository, Repository};
use crate::utils::string_utils::validate_required_string;

/// 피드백 비즈니스 로직 서비스
pub struct FeedbackService {
    /// 피드백 데이터 액세스 리포지토리
    repository: FeedbackRepository,
}

impl FeedbackService {
    /// 데이터베이스 액세서 위에 새 서비스를 구성합니다.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            repository: FeedbackRepository::new(db),
        }
    }

    /// 서비스 초기화 - 리포지토리 인덱스를 준비합니다.
    pub async fn init(&self) -> Result<(), AppError> {
        self.repository.init().await
    }

    /// 피드백을 제출합니다.
    ///
    /// 이름과 메시지는 앞뒤 공백이 제거되며, 비어 있으면
    /// `ValidationError`를 반환합니다. 저장에 성공하면 ID가 채워진
    /// 응답 DTO를 반환합니다.
    pub async fn submit_feedback(
        &self,
        request: CreateFeedbackRequest,
    ) -> Result<FeedbackResponse, AppError> {
        let name = validate_required_string(&request.name, "이름")?;
        let message = validate_required_string(&request.message, "메시지")?;

        let feedback = self.repository.insert(Feedback::new(name, message)).await?;

        info!("💬 새 피드백 저장: id={}", feedback.id_string());
        Ok(FeedbackResponse::from(feedback))
    }

    /// 최근 피드백 목록을 조회합니다. 제출 시간 내림차순입니다.
    pub async fn list_feedback(&self) -> Result<Vec<FeedbackResponse>, AppError> {
        let feedbacks = self.repository.find_recent().await?;

        Ok(feedbacks
            .into_iter()
            .map(FeedbackResponse::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::data_config::Environment;
    use crate::config::mongo_config::ResolverEnv;
    use crate::db::connection::ConnectionManager;

    fn sentinel_service() -> FeedbackService {
        let manager = Arc::new(ConnectionManager::with_env(ResolverEnv {
            uri: Some("mongodb://localhost:27017".to_string()),
            password: None,
            mode: Environment::Development,
        }));
        FeedbackService::new(Arc::new(Database::new(manager)))
    }

    #[actix_web::test]
    async fn test_blank_name_is_rejected_before_storage() {
        let service = sentinel_service();

        let error = service
            .submit_feedback(CreateFeedbackRequest {
                name: "   ".to_string(),
                message: "Hello".to_string(),
            })
            .await
            .unwrap_err();

        // 데이터베이스에 닿기 전에 검증 단계에서 거부됨
        assert!(matches!(error, AppError::ValidationError(_)));
    }

    #[actix_web::test]
    async fn test_blank_message_is_rejected_before_storage() {
        let service = sentinel_service();

        let error = service
            .submit_feedback(CreateFeedbackRequest {
                name: "Alice".to_string(),
                message: "".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::ValidationError(_)));
    }

    #[actix_web::test]
    async fn test_valid_submission_requires_real_connection() {
        let service = sentinel_service();

        let error = service
            .submit_feedback(CreateFeedbackRequest {
                name: "Alice".to_string(),
                message: "Hello".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::DatabaseUnavailable(_)));
    }
}
