mod common;

use axum::{Router, extract::ConnectInfo, http::StatusCode};
use axum_test::TestServer;
use common::{TestDeps, create_test_state};
use goodiex_api::routes::app_router;
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower::Layer;

#[derive(Clone)]
struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Full application router, as served, with a fixed peer address.
fn create_app_server(deps: &TestDeps) -> TestServer {
    let app = app_router(create_test_state(deps), false).unwrap();
    let router = Router::new()
        .fallback_service(app)
        .layer(MockConnectInfoLayer);

    TestServer::new(router).unwrap()
}

#[tokio::test]
async fn test_health_with_trailing_slash() {
    let server = create_app_server(&TestDeps::default());

    let response = server.get("/health/").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let server = create_app_server(&TestDeps::default());

    let response = server
        .post("/api/domain/generate-cname")
        .add_header("Origin", "https://shop.example.com")
        .json(&json!({"store_id": "42"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
    assert_eq!(
        response.json::<Value>()["cname"],
        "store-42.goodiex.com"
    );
}

#[tokio::test]
async fn test_api_routes_rate_limited_health_exempt() {
    let server = create_app_server(&TestDeps::default());

    let mut limited = false;
    for _ in 0..40 {
        let response = server
            .post("/api/domain/generate-cname/")
            .json(&json!({"store_id": "42"}))
            .await;

        if response.status_code() == StatusCode::TOO_MANY_REQUESTS {
            limited = true;
            break;
        }
        response.assert_status_ok();
    }
    assert!(limited);

    server.get("/health").await.assert_status_ok();
}
