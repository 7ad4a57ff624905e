//! 피드백 제출 요청 DTO
//!
//! 새로운 피드백 제출을 위한 HTTP 요청 데이터 구조를 정의합니다.
//! 클라이언트 입력 데이터의 검증과 타입 안전성을 보장합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::utils::string_utils::is_valid_string;

/// 새로운 피드백 제출을 위한 요청 DTO
///
/// JSON 역직렬화와 입력 검증을 자동으로 수행합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    /// 제출자 이름 (1-100자, 공백만으로 구성 불가)
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    /// 피드백 메시지 (1-1000자, 공백만으로 구성 불가)
    #[validate(length(min = 1, max = 1000, message = "메시지는 1-1000자 사이여야 합니다"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub message: String,
}

/// 공백만으로 구성된 입력을 거부합니다
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if !is_valid_string(value) {
        return Err(ValidationError::new("blank")
            .with_message("공백만으로는 제출할 수 없습니다".into()));
    }
    Ok(())
}
