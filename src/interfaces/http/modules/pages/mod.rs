//! Informational pages

use axum::extract::State;

use crate::interfaces::http::common::{render_page, PageResult};
use crate::interfaces::http::render::{Page, TemplateData};
use crate::interfaces::http::session::Session;
use crate::interfaces::http::state::AppState;

async fn show(state: &AppState, session: &Session, page: Page) -> PageResult {
    render_page(state.renderer.as_ref(), session, page, TemplateData::new()).await
}

pub async fn home(State(state): State<AppState>, session: Session) -> PageResult {
    show(&state, &session, Page::Home).await
}

pub async fn about(State(state): State<AppState>, session: Session) -> PageResult {
    show(&state, &session, Page::About).await
}

pub async fn generals_quarters(State(state): State<AppState>, session: Session) -> PageResult {
    show(&state, &session, Page::GeneralsQuarters).await
}

pub async fn majors_suite(State(state): State<AppState>, session: Session) -> PageResult {
    show(&state, &session, Page::MajorsSuite).await
}

pub async fn contact(State(state): State<AppState>, session: Session) -> PageResult {
    show(&state, &session, Page::Contact).await
}
