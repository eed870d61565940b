use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post},
};
use axum_extra::extract::Form;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::{
        auth::Session,
        console::{ConsoleError, SavePostCommand},
        error::HttpError,
        uploads::UploadImageCommand,
    },
    domain::error::DomainError,
    presentation::views::{
        EditorTemplate, LayoutContext, render_error_response, render_not_found_response,
        render_template_response,
    },
};

use super::{HttpState, load_chrome, middleware::require_session, relocate_response};

pub(super) fn build_console_router(state: &HttpState) -> Router<HttpState> {
    Router::new()
        .route("/console/post", get(new_post).post(save_new_post))
        .route(
            "/console/post/{id}",
            get(edit_post).post(save_post).delete(delete_post),
        )
        .route(
            "/console/upload-image",
            post(upload_image).layer(DefaultBodyLimit::max(state.upload_body_limit)),
        )
        .route("/console/{*rest}", any(console_not_found))
        .route_layer(middleware::from_fn(require_session))
}

/// Unknown console paths, still behind the session gate.
async fn console_not_found(
    State(state): State<HttpState>,
    Extension(session): Extension<Session>,
) -> Response {
    match load_chrome(&state, session).await {
        Ok(chrome) => render_not_found_response(chrome),
        Err(response) => response,
    }
}

async fn new_post(State(state): State<HttpState>) -> Response {
    match state.console.create_draft().await {
        Ok(record) => relocate_response(&format!("/console/post/{}", record.id)),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn edit_post(
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

    match state.console.editor_context(id).await {
        Ok(content) => {
            let title = content.title.clone();
            let view = LayoutContext::new(chrome, title, content);
            render_template_response(EditorTemplate { view }, StatusCode::OK)
        }
        Err(ConsoleError::Domain(DomainError::NotFound { .. })) => {
            render_not_found_response(chrome)
        }
        Err(err) => render_error_response(chrome, HttpError::from(err)),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavePostForm {
    title: String,
    blocks: Vec<String>,
    is_publish: Option<String>,
    relocate: Option<String>,
    tags: Vec<String>,
}

impl SavePostForm {
    fn into_command(self, id: Option<Uuid>) -> (SavePostCommand, bool) {
        let relocate = self.relocate.as_deref().is_none_or(|value| value == "true");
        let command = SavePostCommand {
            id,
            title: self.title,
            blocks: self.blocks,
            publish: self.is_publish.as_deref() == Some("1"),
            tags: self.tags,
        };
        (command, relocate)
    }
}

async fn save_new_post(State(state): State<HttpState>, Form(form): Form<SavePostForm>) -> Response {
    persist(state, None, form).await
}

async fn save_post(
    State(state): State<HttpState>,
    Path(id): Path<String>,
    Form(form): Form<SavePostForm>,
) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id(&id);
    };
    persist(state, Some(id), form).await
}

async fn persist(state: HttpState, id: Option<Uuid>, form: SavePostForm) -> Response {
    let (command, relocate) = form.into_command(id);
    match state.console.save(command).await {
        Ok(record) if relocate => relocate_response(&format!("/post/{}", record.id)),
        Ok(_) => Json(json!({})).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn delete_post(State(state): State<HttpState>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id(&id);
    };
    match state.console.delete(id).await {
        Ok(()) => relocate_response("/"),
        Err(err) => HttpError::from(err).into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UploadImageRequest {
    image: String,
    name: String,
    #[serde(rename = "type")]
    content_type: String,
}

async fn upload_image(
    State(state): State<HttpState>,
    Json(request): Json<UploadImageRequest>,
) -> Response {
    let command = UploadImageCommand {
        image: request.image,
        name: request.name,
        content_type: request.content_type,
    };

    match state.uploads.store_image(command).await {
        Ok(stored) => Json(json!({ "success": 1, "file": { "url": stored.url } })).into_response(),
        Err(err) => {
            let err = HttpError::from(err);
            let mut response = (err.status(), Json(json!({ "success": 0 }))).into_response();
            err.into_report().attach(&mut response);
            response
        }
    }
}

fn invalid_id(raw: &str) -> Response {
    HttpError::new(
        "infra::http::console",
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("`{raw}` is not a post id"),
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(relocate: Option<&str>) -> SavePostForm {
        SavePostForm {
            title: "t".into(),
            relocate: relocate.map(str::to_string),
            is_publish: Some("1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn relocation_defaults_on_and_needs_literal_true() {
        assert!(form(None).into_command(None).1);
        assert!(form(Some("true")).into_command(None).1);
        for value in ["false", "0", "TRUE", ""] {
            assert!(!form(Some(value)).into_command(None).1, "relocate={value}");
        }
    }

    #[test]
    fn publish_flag_requires_one() {
        let (command, _) = form(None).into_command(None);
        assert!(command.publish);

        let mut draft = form(None);
        draft.is_publish = Some("0".into());
        assert!(!draft.into_command(None).0.publish);
    }
}
