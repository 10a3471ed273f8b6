use axum::{extract::Request, http::Response, middleware::Next, response::IntoResponse};

/// Middlware to trace headers.
///
/// Values of `authorization` and `cookie` are masked.
pub async fn trace_headers(req: Request, next: Next) -> impl IntoResponse {
    let incoming_headers: Vec<_> = req
        .headers()
        .iter()
        .map(|(name, value)| match name.as_str() {
            "authorization" | "cookie" => (name.as_str(), "..."),
            _ => (name.as_str(), value.to_str().unwrap_or("<binary>")),
        })
        .collect();
    tracing::trace!(?incoming_headers, "Headers");

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let outgoing_headers = &parts.headers;
    tracing::trace!(?outgoing_headers, "Headers");

    Response::from_parts(parts, body)
}
