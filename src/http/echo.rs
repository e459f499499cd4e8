//! Source address echo.
//!
//! `GET /echosourceip` answers with the peer address of the connection, as
//! text, exactly as the transport reported it. Tests use it to see which
//! network identity reached a backend after proxy and mesh hops.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};

/// The caller's address as observed by the server.
///
/// Filled from `ConnectInfo` by [`record_remote_addr`] unless something
/// earlier already set it; in-process tests insert arbitrary values directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddr(pub String);

pub async fn record_remote_addr(mut request: Request, next: Next) -> Response {
    if request.extensions().get::<RemoteAddr>().is_none() {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string());
        if let Some(peer) = peer {
            request.extensions_mut().insert(RemoteAddr(peer));
        }
    }
    next.run(request).await
}

pub async fn echo_source_ip(request: Request) -> String {
    request
        .extensions()
        .get::<RemoteAddr>()
        .map(|RemoteAddr(addr)| addr.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/echosourceip", get(echo_source_ip))
            .layer(middleware::from_fn(record_remote_addr))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn returns_substituted_address_verbatim() {
        let request = axum::http::Request::builder()
            .uri("/echosourceip")
            .extension(RemoteAddr("foo".into()))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "foo");
    }

    #[tokio::test]
    async fn falls_back_to_connect_info() {
        let peer: SocketAddr = "10.0.16.4:51234".parse().unwrap();
        let request = axum::http::Request::builder()
            .uri("/echosourceip")
            .extension(ConnectInfo(peer))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "10.0.16.4:51234");
    }

    #[tokio::test]
    async fn substituted_address_wins_over_connect_info() {
        let peer: SocketAddr = "10.0.16.4:51234".parse().unwrap();
        let request = axum::http::Request::builder()
            .uri("/echosourceip")
            .extension(ConnectInfo(peer))
            .extension(RemoteAddr("192.0.2.10".into()))
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "192.0.2.10");
    }

    #[tokio::test]
    async fn repeated_requests_return_identical_bodies() {
        let mut bodies = Vec::new();
        for _ in 0..3 {
            let request = axum::http::Request::builder()
                .uri("/echosourceip")
                .extension(RemoteAddr("198.51.100.7:40000".into()))
                .body(Body::empty())
                .unwrap();
            bodies.push(body_text(app().oneshot(request).await.unwrap()).await);
        }
        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    }
}
