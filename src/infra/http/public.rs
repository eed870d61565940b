use std::io::ErrorKind;

use axum::{
    Extension, Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{
        HeaderValue, StatusCode,
        header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar, Form,
    cookie::{Cookie, SameSite},
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use time::Duration;
use tracing::error;
use uuid::Uuid;

use crate::{
    application::{
        auth::{AuthError, SESSION_COOKIE, SESSION_TTL_SECONDS, Session},
        error::{ErrorReport, HttpError},
        feed::FeedError,
        pagination::PageRequest,
        robots::robots_txt,
    },
    infra::uploads::UploadStorageError,
    presentation::views::{
        IndexTemplate, LayoutChrome, LayoutContext, LoginContext, LoginTemplate, PostTemplate,
        render_error_response, render_not_found_response, render_template_response,
    },
};

use super::{
    HttpState, console, db_health_response, load_chrome,
    middleware::{log_responses, resolve_session, set_request_context},
    plain_response, relocate_response,
};

pub fn build_router(state: HttpState) -> Router {
    let routes = Router::new()
        .route("/", get(index))
        .route("/post/{id}", get(post_detail))
        .route("/console-login", get(login_page).post(login))
        .route("/console-logout", post(logout))
        .route("/robots.txt", get(robots))
        .route("/_health/db", get(public_health))
        .route("/uploads/{*path}", get(serve_upload))
        .route("/static/{*path}", get(crate::infra::assets::serve_static))
        .merge(console::build_console_router(&state))
        .fallback(fallback_router);

    routes
        .layer(middleware::from_fn_with_state(state.clone(), resolve_session))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageQuery {
    page: Option<String>,
}

async fn index(
    State(state): State<HttpState>,
    Extension(session): Extension<Session>,
    Query(query): Query<PageQuery>,
) -> Response {
    let chrome = match load_chrome(&state, session).await {
        Ok(chrome) => chrome,
        Err(response) => return response,
    };

    let request = PageRequest::from_query(query.page.as_deref());
    match state
        .feed
        .page_context(request, session.authenticated)
        .await
    {
        Ok(content) => {
            let title = chrome.blog_name.clone();
            let view = LayoutContext::new(chrome, title, content);
            render_template_response(IndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => feed_error_to_response(err, chrome),
    }
}

async fn post_detail(
    State(state): State<HttpState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Response {
    let chrome = match load_chrome(&state, session).await {
        Ok(chrome) => chrome,
        Err(response) => return response,
    };

    let Ok(id) = Uuid::parse_str(&id) else {
        return render_not_found_response(chrome);
    };

    match state.feed.post_detail(id, session.authenticated).await {
        Ok(Some(content)) => {
            let title = content.title.clone();
            let view = LayoutContext::new(chrome, title, content);
            render_template_response(PostTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(chrome),
        Err(err) => feed_error_to_response(err, chrome),
    }
}

async fn login_page(
    State(state): State<HttpState>,
    Extension(session): Extension<Session>,
) -> Response {
    let chrome = match load_chrome(&state, session).await {
        Ok(chrome) => chrome,
        Err(response) => return response,
    };
    let view = LayoutContext::new(chrome, "Login", LoginContext);
    render_template_response(LoginTemplate { view }, StatusCode::OK)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginForm {
    account: String,
    password: String,
}

async fn login(
    State(state): State<HttpState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth.login(&form.account, &form.password) {
        Ok(token) => {
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .secure(state.secure_cookie)
                .same_site(SameSite::Strict)
                .max_age(Duration::seconds(SESSION_TTL_SECONDS));
            (jar.add(cookie), relocate_response("/")).into_response()
        }
        Err(AuthError::InvalidCredentials) => {
            let mut response = (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
            ErrorReport::from_message(
                "infra::http::public::login",
                StatusCode::UNAUTHORIZED,
                "account or password mismatch",
            )
            .attach(&mut response);
            response
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn logout(jar: CookieJar) -> Response {
    let removal = Cookie::build(SESSION_COOKIE).path("/");
    (jar.remove(removal), relocate_response("/")).into_response()
}

async fn robots() -> Response {
    plain_response(robots_txt())
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

async fn serve_upload(State(state): State<HttpState>, Path(path): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::serve_upload";

    match state.upload_storage.read(&path).await {
        Ok(bytes) => build_upload_response(&path, bytes),
        Err(UploadStorageError::InvalidPath) => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Upload not found",
            "The requested upload is not available",
        )
        .into_response(),
        Err(UploadStorageError::Io(err)) if err.kind() == ErrorKind::NotFound => HttpError::new(
            SOURCE,
            StatusCode::NOT_FOUND,
            "Upload not found",
            "The requested upload is not available",
        )
        .into_response(),
        Err(err) => {
            error!(
                target = "blockflare::http::uploads",
                path = %path,
                error = %err,
                "failed to read stored upload"
            );
            HttpError::internal(SOURCE, &err).into_response()
        }
    }
}

fn build_upload_response(path: &str, bytes: Bytes) -> Response {
    let len = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(CONTENT_LENGTH, value);
    }
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=31536000, immutable"),
    );

    response
}

async fn fallback_router(
    State(state): State<HttpState>,
    Extension(session): Extension<Session>,
) -> Response {
    match load_chrome(&state, session).await {
        Ok(chrome) => render_not_found_response(chrome),
        Err(response) => response,
    }
}

fn feed_error_to_response(err: FeedError, chrome: LayoutChrome) -> Response {
    render_error_response(chrome, HttpError::from(err))
}
