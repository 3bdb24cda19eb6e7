//! HttpIpSource against a live in-process echo service.
//!
//! Each test starts an axum server on a random port and points the source at
//! it, so status handling and the query string go over real HTTP.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use dyndns_core::traits::IpSource;
use dyndns_ip_http::HttpIpSource;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Start `app` on 127.0.0.1 with an ephemeral port
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Echo service answering `status` with `body`, recording query strings
fn echo_service(status: StatusCode, body: &'static str, seen: Seen) -> Router {
    Router::new()
        .route(
            "/checkip",
            get(
                move |State(seen): State<Seen>, Query(params): Query<HashMap<String, String>>| async move {
                    seen.lock().unwrap().push(params);
                    (status, body)
                },
            ),
        )
        .with_state(seen)
}

#[tokio::test]
async fn returns_trimmed_body_and_sends_format() {
    let seen = Seen::default();
    let addr = serve(echo_service(StatusCode::OK, " 203.0.113.7\n", seen.clone())).await;

    let source = HttpIpSource::new(format!("http://{addr}/checkip"), "text", None).unwrap();
    let ip = source.current().await.unwrap();

    assert_eq!(ip, "203.0.113.7");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].get("format").map(String::as_str), Some("text"));
}

#[tokio::test]
async fn empty_format_is_not_sent() {
    let seen = Seen::default();
    let addr = serve(echo_service(StatusCode::OK, "203.0.113.7", seen.clone())).await;

    let source = HttpIpSource::new(format!("http://{addr}/checkip"), "", None).unwrap();
    source.current().await.unwrap();

    assert!(seen.lock().unwrap()[0].is_empty());
}

#[tokio::test]
async fn body_is_not_validated() {
    let addr = serve(echo_service(StatusCode::OK, "not-an-ip", Seen::default())).await;

    let source = HttpIpSource::new(format!("http://{addr}/checkip"), "text", None).unwrap();

    assert_eq!(source.current().await.unwrap(), "not-an-ip");
}

#[tokio::test]
async fn server_error_is_upstream_error() {
    let addr = serve(echo_service(
        StatusCode::INTERNAL_SERVER_ERROR,
        "boom",
        Seen::default(),
    ))
    .await;

    let source = HttpIpSource::new(format!("http://{addr}/checkip"), "text", None).unwrap();
    let err = source.current().await.unwrap_err();

    assert!(err.is_upstream(), "unexpected error: {:?}", err);
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn not_found_is_upstream_error() {
    let addr = serve(echo_service(StatusCode::OK, "203.0.113.7", Seen::default())).await;

    let source = HttpIpSource::new(format!("http://{addr}/elsewhere"), "text", None).unwrap();
    let err = source.current().await.unwrap_err();

    assert!(err.is_upstream(), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn unreachable_service_is_network_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpIpSource::new(format!("http://{addr}/checkip"), "text", None).unwrap();
    let err = source.current().await.unwrap_err();

    assert!(err.is_network(), "unexpected error: {:?}", err);
}
