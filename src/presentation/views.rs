use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

/// Product name appended to every page title.
pub const SITE_SUFFIX: &str = "BlockFlare";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content.heading(), content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Render an [`HttpError`] as an error page in the layout shell, keeping its report.
pub fn render_error_response(chrome: LayoutChrome, error: HttpError) -> Response {
    let status = error.status();
    let content = ErrorPageView::new(status, error.public_message());
    let view = LayoutContext::new(chrome, content.heading(), content);
    let mut response = render_template_response(ErrorTemplate { view }, status);
    error.into_report().attach(&mut response);
    response
}

/// Site branding and session state shared by every page.
#[derive(Clone)]
pub struct LayoutChrome {
    pub blog_name: String,
    pub blog_avatar: String,
    /// Plain description used in meta tags.
    pub blog_desc: String,
    /// Description rendered from Markdown for the page header.
    pub blog_desc_html: String,
    pub authenticated: bool,
}

impl LayoutChrome {
    /// Branding used when site metadata cannot be loaded.
    pub fn fallback(authenticated: bool) -> Self {
        Self {
            blog_name: SITE_SUFFIX.to_string(),
            blog_avatar: "/static/avatar.svg".to_string(),
            blog_desc: String::new(),
            blog_desc_html: String::new(),
            authenticated,
        }
    }

    /// Where the header avatar leads: the editor when signed in, otherwise the login page.
    pub fn avatar_href(&self) -> &'static str {
        if self.authenticated {
            "/console/post"
        } else {
            "/console-login"
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub chrome: LayoutChrome,
    pub page_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, title: impl AsRef<str>, content: T) -> Self {
        let title = title.as_ref();
        let page_title = if title.is_empty() {
            SITE_SUFFIX.to_string()
        } else {
            format!("{title} | {SITE_SUFFIX}")
        };
        Self {
            chrome,
            page_title,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub excerpt_html: String,
    pub is_draft: bool,
}

pub struct PageContext {
    pub posts: Vec<PostCard>,
    /// Set only when the page came back full, so another fetch may have results.
    pub next_page: Option<u32>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<PageContext>,
}

pub struct PostDetailContext {
    pub id: String,
    pub title: String,
    pub published: String,
    pub iso_date: String,
    pub content_html: String,
    pub is_draft: bool,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailContext>,
}

pub struct EditorContext {
    pub id: String,
    pub title: String,
    pub is_draft: bool,
    /// Base64 of the JSON block array, read back by the editor script.
    pub blocks_base64: String,
}

#[derive(Template)]
#[template(path = "editor.html")]
pub struct EditorTemplate {
    pub view: LayoutContext<EditorContext>,
}

pub struct LoginContext;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub view: LayoutContext<LoginContext>,
}

pub struct ErrorPageView {
    pub status: u16,
    pub message: String,
}

impl ErrorPageView {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn heading(&self) -> String {
        format!("{} {}", self.status, self.message)
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
