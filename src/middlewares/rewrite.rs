//! 경로 접두어 재작성 미들웨어
//!
//! `/green` 접두어가 붙은 요청 경로를 라우팅 전에 접두어 없는 경로로
//! 내부 재작성합니다. 리다이렉트가 아니므로 클라이언트 주소창은 바뀌지 않습니다.
//!
//! 재작성 규칙:
//!
//! - `/green`, `/green/` → `/`
//! - `/green/{path}` → `/{path}`
//! - 접두어 뒤에 구분자가 없는 경로(`/greenhouse`)는 별개 경로이므로 유지
//! - 쿼리 문자열은 그대로 보존
//! - `/api/*` 경로는 접두어가 붙지 않으므로 영향을 받지 않음

use std::future::{Ready, ready};

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::uri::Uri,
};

/// 경로 접두어 재작성 미들웨어
pub struct PrefixRewrite {
    /// 제거할 경로 접두어 (예: "/green")
    prefix: String,
}

impl PrefixRewrite {
    /// 지정한 접두어를 제거하는 미들웨어를 생성합니다.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// `/green` 대체 진입 경로용 미들웨어를 생성합니다.
    pub fn green() -> Self {
        Self::new("/green")
    }
}

/// 재작성 대상 경로를 계산합니다. 대상이 아니면 `None`.
fn rewrite_target(path: &str, prefix: &str) -> Option<String> {
    let rest = path.strip_prefix(prefix)?;

    if rest.is_empty() || rest == "/" {
        return Some("/".to_string());
    }

    // "/greenhouse"처럼 접두어로 시작하기만 하는 경로는 별개 경로
    if !rest.starts_with('/') {
        return None;
    }

    Some(rest.to_string())
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for PrefixRewrite
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = PrefixRewriteService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PrefixRewriteService {
            service,
            prefix: self.prefix.clone(),
        }))
    }
}

/// 요청마다 경로를 재작성하고 내부 서비스로 전달하는 서비스
pub struct PrefixRewriteService<S> {
    service: S,
    prefix: String,
}

impl<S, B> Service<ServiceRequest> for PrefixRewriteService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if let Some(target) = rewrite_target(req.path(), &self.prefix) {
            let path_and_query = match req.query_string() {
                "" => target,
                query => format!("{}?{}", target, query),
            };

            let mut parts = req.head().uri.clone().into_parts();
            // 재작성된 경로가 유효하지 않으면 원래 요청을 그대로 전달
            if let Ok(path_and_query) = path_and_query.parse() {
                parts.path_and_query = Some(path_and_query);
                if let Ok(uri) = Uri::from_parts(parts) {
                    req.match_info_mut().get_mut().update(&uri);
                    req.head_mut().uri = uri;
                }
            }
        }

        self.service.call(req)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    use super::*;

    #[test]
    fn test_rewrite_target_rules() {
        assert_eq!(rewrite_target("/green", "/green").as_deref(), Some("/"));
        assert_eq!(rewrite_target("/green/", "/green").as_deref(), Some("/"));
        assert_eq!(
            rewrite_target("/green/about", "/green").as_deref(),
            Some("/about")
        );
        assert_eq!(rewrite_target("/greenhouse", "/green"), None);
        assert_eq!(rewrite_target("/api/feedback", "/green"), None);
        assert_eq!(rewrite_target("/", "/green"), None);
    }

    #[actix_web::test]
    async fn test_green_paths_are_rewritten() {
        let app = test::init_service(
            App::new()
                .wrap(PrefixRewrite::green())
                .route(
                    "/",
                    web::get().to(|| async { HttpResponse::Ok().body("home") }),
                )
                .route(
                    "/about",
                    web::get().to(|| async { HttpResponse::Ok().body("about") }),
                ),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/green").to_request(),
        )
        .await;
        assert_eq!(test::read_body(response).await, "home");

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/green/about").to_request(),
        )
        .await;
        assert_eq!(test::read_body(response).await, "about");
    }

    #[actix_web::test]
    async fn test_unprefixed_paths_are_untouched() {
        let app = test::init_service(
            App::new()
                .wrap(PrefixRewrite::green())
                .route(
                    "/about",
                    web::get().to(|| async { HttpResponse::Ok().body("about") }),
                ),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/about").to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);

        // 접두어로 시작하기만 하는 경로는 재작성되지 않음
        let response = test::call_service(
            &app,
            test::TestRequest::get().uri("/greenhouse").to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_query_string_is_preserved() {
        let app = test::init_service(
            App::new().wrap(PrefixRewrite::green()).route(
                "/echo",
                web::get().to(|req: HttpRequest| async move {
                    HttpResponse::Ok().body(req.query_string().to_string())
                }),
            ),
        )
        .await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/green/echo?page=2&sort=desc")
                .to_request(),
        )
        .await;

        assert_eq!(test::read_body(response).await, "page=2&sort=desc");
    }
}
