//! 터미널 출력 포맷팅 유틸리티
//!
//! 애플리케이션 초기화 과정에서 사용되는 터미널 출력 함수들을 제공합니다.
//! 박스 형태의 제목과 하위 작업 상태를 시각적으로 표현합니다.

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// Unicode 박스 문자를 사용하여 시각적으로 눈에 띄는 제목을 출력합니다.
/// 텍스트는 자동으로 중앙 정렬됩니다.
///
/// # Arguments
///
/// * `title` - 출력할 제목 문자열
///
/// # Examples
///
/// ```rust,ignore
/// use crate::utils::display_terminal::print_boxed_title;
///
/// print_boxed_title("FeedbackHub Backend");
/// ```
///
/// Output:
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║                FeedbackHub Backend               ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    // 고정 너비 50칸 사용 (박스 내부 콘텐츠)
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^49}║", title);
    println!("╚{}╝", border);
}

/// 서브 작업의 상태를 표시합니다
///
/// 들여쓰기된 트리 구조로 하위 작업의 진행 상황을 출력합니다.
///
/// # Arguments
///
/// * `name` - 서브 작업의 이름
/// * `status` - 현재 상태 또는 결과
///
/// # Examples
///
/// ```rust,ignore
/// use crate::utils::display_terminal::print_sub_task;
///
/// print_sub_task("Database", "Connected");
/// ```
///
/// Output:
/// ```text
///    ├─ Database: Connected
/// ```
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}
