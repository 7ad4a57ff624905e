//! Feedback Entity Implementation
//!
//! 피드백 엔티티의 핵심 구현체입니다.
//! 제출된 피드백은 생성 이후 수정되지 않으며 삭제되지도 않습니다.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// 피드백 엔티티
///
/// 사용자가 제출한 이름/메시지 쌍을 표현하는 도메인 엔티티입니다.
/// 문서 필드 이름은 기존 저장 데이터와의 호환을 위해 camelCase를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 제출자 이름
    pub name: String,
    /// 피드백 메시지
    pub message: String,
    /// 제출 시간
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

impl Feedback {
    /// 새 피드백을 생성합니다.
    ///
    /// `id`는 저장 시점에 MongoDB가 부여하므로 `None`으로 시작하고,
    /// 제출 시간은 현재 시간으로 기록됩니다.
    pub fn new(name: String, message: String) -> Self {
        Self {
            id: None,
            name,
            message,
            created_at: DateTime::now(),
        }
    }

    /// ID를 16진수 문자열로 반환합니다. 저장 전이면 빈 문자열입니다.
    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}
