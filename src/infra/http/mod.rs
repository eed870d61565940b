mod console;
mod middleware;
mod public;

pub use middleware::RequestContext;
pub use public::build_router;

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::Error as SqlxError;

use crate::application::{
    auth::{AuthService, Session},
    chrome::ChromeService,
    console::ConsoleService,
    error::ErrorReport,
    feed::FeedService,
    uploads::UploadService,
};
use crate::infra::{db::PostgresRepositories, uploads::UploadStorage};
use crate::presentation::views::{LayoutChrome, render_error_response};

/// htmx response header asking the client to navigate without a full reload.
pub const HX_LOCATION: HeaderName = HeaderName::from_static("hx-location");

#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<FeedService>,
    pub chrome: Arc<ChromeService>,
    pub console: Arc<ConsoleService>,
    pub uploads: Arc<UploadService>,
    pub upload_storage: Arc<UploadStorage>,
    pub auth: AuthService,
    pub db: Arc<PostgresRepositories>,
    pub secure_cookie: bool,
    pub upload_body_limit: usize,
}

/// Site chrome for `session`. When it cannot be loaded the error page is rendered
/// in a fallback shell instead.
async fn load_chrome(state: &HttpState, session: Session) -> Result<LayoutChrome, Response> {
    state
        .chrome
        .load(session)
        .await
        .map_err(|err| render_error_response(LayoutChrome::fallback(session.authenticated), err))
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

fn plain_response(body: String) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// `HX-Location` value that swaps the whole body with `path`.
fn hx_location_value(path: &str) -> HeaderValue {
    let payload = json!({ "path": path, "target": "body", "swap": "innerHTML" }).to_string();
    HeaderValue::from_str(&payload).unwrap_or_else(|_| HeaderValue::from_static("/"))
}

/// Empty JSON body with an `HX-Location` redirect to `path`.
fn relocate_response(path: &str) -> Response {
    ([(HX_LOCATION, hx_location_value(path))], Json(json!({}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hx_location_targets_body() {
        let value = hx_location_value("/post/abc");
        let parsed: serde_json::Value =
            serde_json::from_str(value.to_str().expect("ascii")).expect("json");
        assert_eq!(parsed["path"], "/post/abc");
        assert_eq!(parsed["target"], "body");
        assert_eq!(parsed["swap"], "innerHTML");
    }
}
