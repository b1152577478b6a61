//! Request-id tagging.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Stamps every request and response with an `x-request-id`.
///
/// A caller-supplied id wins; otherwise a fresh UUID is minted. The id
/// also lands in the request extensions, where the trace span picks it
/// up.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    let id = match req.headers().get(&header) {
        Some(value) => value.clone(),
        None => HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown")),
    };

    req.extensions_mut().insert(id.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(header, id);
    res
}

#[cfg(test)]
mod tests {
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async {}))
            .layer(middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn echoes_a_caller_supplied_id() {
        let res = app()
            .oneshot(
                Request::get("/")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn mints_an_id_when_none_is_sent() {
        let res = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = res.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
