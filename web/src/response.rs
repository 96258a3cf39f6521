//! Conversion of dispatch responses into axum responses.

use axum::{body::Body, response::Response};
use mvc_dispatch_core::ResponseParts;

/// Build an axum [`Response`] from what the dispatch wrote.
///
/// The [`RouteInfo`](mvc_dispatch_core::RouteInfo) of the executed action is
/// kept in the response extensions for outer layers.
#[must_use]
pub fn into_response(parts: ResponseParts) -> Response {
    let status = parts.status_or_default();
    let body = parts.body.map_or_else(Body::empty, Body::from);

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = parts.headers;
    if let Some(route) = parts.route {
        response.extensions_mut().insert(route);
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, HeaderValue, StatusCode};
    use mvc_dispatch_core::RouteInfo;

    #[tokio::test]
    async fn redirect_parts_become_empty_redirect() {
        let mut parts = ResponseParts {
            status: Some(StatusCode::FOUND),
            ..ResponseParts::default()
        };
        parts.headers.insert(LOCATION, HeaderValue::from_static("/x"));

        let response = into_response(parts);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/x");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn route_info_travels_in_extensions() {
        let parts = ResponseParts {
            body: Some(b"ok".to_vec()),
            route: Some(RouteInfo {
                controller: "home".to_string(),
                action: "getIndex".to_string(),
                original_action: "index".to_string(),
            }),
            ..ResponseParts::default()
        };

        let response = into_response(parts);
        assert_eq!(response.status(), StatusCode::OK);
        let route = response.extensions().get::<RouteInfo>().unwrap();
        assert_eq!(route.action, "getIndex");
    }
}
