//! Staff login and logout

use axum::extract::State;
use tracing::{error, info, warn};

use crate::domain::DomainError;
use crate::interfaces::http::common::{go_home, render_page, see_other, PageResult, PostedForm};
use crate::interfaces::http::render::{Page, TemplateData};
use crate::interfaces::http::session::{Session, KEY_ERROR, KEY_FLASH, KEY_USER_ID};
use crate::interfaces::http::state::AppState;

pub const LOGIN_PATH: &str = "/user/login";

/// `GET /user/login`
pub async fn login_page(State(state): State<AppState>, session: Session) -> PageResult {
    render_page(state.renderer.as_ref(), &session, Page::Login, TemplateData::new()).await
}

/// `POST /user/login`
pub async fn post_login(
    State(state): State<AppState>,
    session: Session,
    PostedForm(mut form): PostedForm,
) -> PageResult {
    session.cycle_id().await?;

    form.required(&["email", "password"]);
    form.is_email("email");
    if !form.valid() {
        let data = TemplateData::new().with_form(form);
        return render_page(state.renderer.as_ref(), &session, Page::Login, data).await;
    }

    let email = form.get("email").trim();
    match state.repo.authenticate(email, form.get("password")).await {
        Ok((user_id, _)) => {
            info!(user_id, "Staff login");
            session.insert(KEY_USER_ID, user_id).await?;
            session.insert(KEY_FLASH, "Logged in successfully").await?;
            see_other("/")
        }
        Err(DomainError::Unauthorized(_)) => {
            warn!("Failed login for {}", email);
            session.insert(KEY_ERROR, "Invalid login credentials").await?;
            see_other(LOGIN_PATH)
        }
        Err(e) => {
            error!("Login lookup failed: {}", e);
            go_home(&session, "Can't log in right now").await
        }
    }
}

/// `GET /user/logout`
pub async fn logout(session: Session) -> PageResult {
    session.flush().await?;
    see_other(LOGIN_PATH)
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use tower_sessions::session::Id;
    use tower_sessions::SessionStore;

    use super::*;
    use crate::infrastructure::database::repositories::test_repo::{
        TEST_ADMIN_EMAIL, TEST_ADMIN_ID, TEST_ADMIN_PASSWORD,
    };
    use crate::interfaces::http::session::KEY_RESERVATION;
    use crate::interfaces::http::testing::{location, TestApp};

    #[tokio::test]
    async fn login_page_renders() {
        let app = TestApp::new();
        assert_eq!(app.get(LOGIN_PATH, "t").await.status(), StatusCode::OK);
        assert_eq!(app.last_page(), Some(Page::Login));
    }

    #[tokio::test]
    async fn good_credentials_rotate_session_id_and_store_user() {
        let app = TestApp::new();
        app.seed("visitor", KEY_RESERVATION, &"pending").await;
        let before = app.session_id("visitor").unwrap();

        let body = format!("email={}&password={}", TEST_ADMIN_EMAIL, TEST_ADMIN_PASSWORD);
        let resp = app.post_form(LOGIN_PATH, "visitor", &body).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
        assert!(resp.headers().contains_key(header::SET_COOKIE));

        let after = app.session_id("visitor").unwrap();
        assert_ne!(after, before);
        assert!(app.store.load(&before.parse::<Id>().unwrap()).await.unwrap().is_none());
        assert_eq!(
            app.session_value::<i32>("visitor", KEY_USER_ID).await,
            Some(TEST_ADMIN_ID)
        );
        assert_eq!(
            app.session_value::<String>("visitor", KEY_RESERVATION).await.as_deref(),
            Some("pending")
        );
    }

    #[tokio::test]
    async fn bad_credentials_return_to_login() {
        let app = TestApp::new();
        let resp = app
            .post_form(LOGIN_PATH, "t", "email=admin@example.com&password=nope")
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), LOGIN_PATH);
    }

    #[tokio::test]
    async fn invalid_form_rerenders() {
        let app = TestApp::new();
        let resp = app.post_form(LOGIN_PATH, "t", "email=abc&password=").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let (page, data) = app.last_render().unwrap();
        assert_eq!(page, Page::Login);
        assert!(!data.form.errors.get("email").is_empty());
        assert!(!data.form.errors.get("password").is_empty());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let app = TestApp::new();
        app.seed("t", KEY_USER_ID, &TEST_ADMIN_ID).await;
        let resp = app.get("/user/logout", "t").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), LOGIN_PATH);
        assert!(app.session_value::<i32>("t", KEY_USER_ID).await.is_none());
        assert!(app.session_id("t").is_none());
        assert!(app.store.is_empty());
    }
}
