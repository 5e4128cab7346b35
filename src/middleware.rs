use axum::{
    body::Body,
    http::{header, Request, Response},
    middleware::Next,
};

/// Every command reply is a fresh random meme, so nothing may be cached.
/// Images are served as-is from third-party sites; never let clients sniff them.
pub async fn reply_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );

    headers.insert(
        header::HeaderName::from_static("x-content-type-options"),
        header::HeaderValue::from_static("nosniff"),
    );

    response
}
