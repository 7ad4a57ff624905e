//! HTTP 핸들러 모듈
//!
//! REST API 엔드포인트의 요청/응답 처리를 담당합니다.
//!
//! # Modules
//!
//! - [`feedback`] - 피드백 제출/목록 엔드포인트
//! - [`health`] - 헬스체크 엔드포인트

pub mod feedback;
pub mod health;
