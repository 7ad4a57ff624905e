use serde::{Deserialize, Serialize};

use crate::domain::entities::feedback::Feedback;

/// 피드백 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub name: String,
    pub message: String,

    /// 제출 시간 (RFC 3339)
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        let id = feedback.id_string();
        let created_at = feedback
            .created_at
            .try_to_rfc3339_string()
            .unwrap_or_default();

        Self {
            id,
            name: feedback.name,
            message: feedback.message,
            created_at,
        }
    }
}
