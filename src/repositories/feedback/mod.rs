//! 피드백 리포지토리 모듈

pub mod feedback_repo;

pub use feedback_repo::FeedbackRepository;
