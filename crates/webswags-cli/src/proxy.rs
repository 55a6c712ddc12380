//! CORS relay used by the Swagger UI "Try it out" button.
//!
//! `/proxy?url=<target>` forwards the request to `target` and streams the
//! upstream answer back, so browsers can call APIs that do not send CORS
//! headers themselves.

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::server::AppState;

/// Query parameter holding the upstream URL
const TARGET_PARAM: &str = "url";

/// Preflight cache lifetime, in seconds
const PREFLIGHT_MAX_AGE: &str = "3600";

/// Headers that describe a single connection and are never relayed
const HOP_BY_HOP: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

pub async fn handle_proxy(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let Some(target) = params
        .iter()
        .find(|(key, _)| key == TARGET_PARAM)
        .map(|(_, value)| value.clone())
    else {
        return (StatusCode::BAD_REQUEST, "Missing url parameter").into_response();
    };

    if method == Method::OPTIONS {
        return preflight();
    }

    let remaining: Vec<(String, String)> = params
        .into_iter()
        .filter(|(key, _)| key != TARGET_PARAM)
        .collect();

    let upstream = match state
        .client
        .request(method.clone(), &target)
        .headers(forwarded_request_headers(&headers))
        .query(&remaining)
        .body(body)
        .send()
        .await
    {
        Ok(upstream) => upstream,
        Err(e) => {
            tracing::warn!(error = %e, target = %target, "Proxy request failed");
            return (StatusCode::BAD_GATEWAY, format!("Proxy error: {e}")).into_response();
        }
    };

    let status = upstream.status();
    tracing::info!(method = %method, target = %target, status = %status, "Proxied request");

    let relayed_headers = relayed_response_headers(upstream.headers());
    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = relayed_headers;
    response
}

/// Answer for a plain `OPTIONS` request that reached the relay
fn preflight() -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS, HEAD"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(
            "Content-Type, Authorization, X-Requested-With, Accept, X-API-Key, X-Custom-Header",
        ),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    response
}

fn forwarded_request_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(incoming.len());
    for (name, value) in incoming {
        if *name == header::HOST || *name == header::CONTENT_LENGTH || is_hop_by_hop(name) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Upstream headers minus hop-by-hop and CORS ones; the CORS layer sets its own
fn relayed_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if is_hop_by_hop(name) || name.as_str().starts_with("access-control-") {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(name) || name.as_str() == "keep-alive"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_and_hop_by_hop_not_forwarded() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::HOST, HeaderValue::from_static("localhost:8085"));
        incoming.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        incoming.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        incoming.insert("x-api-key", HeaderValue::from_static("secret"));

        let forwarded = forwarded_request_headers(&incoming);
        assert!(forwarded.get(header::HOST).is_none());
        assert!(forwarded.get(header::CONNECTION).is_none());
        assert_eq!(forwarded[header::AUTHORIZATION], "Bearer t");
        assert_eq!(forwarded["x-api-key"], "secret");
    }

    #[test]
    fn test_upstream_cors_headers_dropped() {
        let mut upstream = HeaderMap::new();
        upstream.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://example.com"),
        );
        upstream.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        upstream.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let relayed = relayed_response_headers(&upstream);
        assert_eq!(relayed.len(), 1);
        assert_eq!(relayed[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_preflight_headers() {
        let response = preflight();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_MAX_AGE], "3600");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
