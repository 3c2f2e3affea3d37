//! Response helpers shared by page handlers

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::session::Error as SessionError;
use tracing::error;

use crate::interfaces::http::render::{Page, RenderError, Renderer, TemplateData};
use crate::interfaces::http::session::{Session, KEY_ERROR, KEY_FLASH, KEY_USER_ID, KEY_WARNING};

/// Failures that stop a page handler outright
#[derive(Debug)]
pub enum PageError {
    Session(SessionError),
    Render(RenderError),
}

impl From<SessionError> for PageError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl From<RenderError> for PageError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Session(e) => {
                error!("Session failure: {}", e);
                Redirect::temporary("/").into_response()
            }
            Self::Render(e) => {
                error!("Render failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

pub type PageResult = Result<Response, PageError>;

/// Record `message` as the error notice and 307 to `to`.
pub async fn redirect_with_error(session: &Session, to: &str, message: &str) -> PageResult {
    session.insert(KEY_ERROR, message).await?;
    Ok(Redirect::temporary(to).into_response())
}

/// The generic failure path: error notice, 307 home.
pub async fn go_home(session: &Session, message: &str) -> PageResult {
    redirect_with_error(session, "/", message).await
}

pub fn see_other(to: &str) -> PageResult {
    Ok(Redirect::to(to).into_response())
}

/// Render `page` with 200, consuming any pending notices.
pub async fn render_page(
    renderer: &dyn Renderer,
    session: &Session,
    page: Page,
    mut data: TemplateData,
) -> PageResult {
    data.flash = session.remove::<String>(KEY_FLASH).await?.unwrap_or_default();
    data.warning = session.remove::<String>(KEY_WARNING).await?.unwrap_or_default();
    data.error = session.remove::<String>(KEY_ERROR).await?.unwrap_or_default();
    data.is_authenticated = session.get::<i32>(KEY_USER_ID).await?.is_some();

    let body = renderer.render(page, &data)?;
    Ok(Html(body).into_response())
}
