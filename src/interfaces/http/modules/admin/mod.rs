//! Back-office: reservation lists, edits and the staff profile
//!
//! Every route here sits behind [`require_authentication`].

use axum::{
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, info};

use crate::domain::{Processed, Reservation};
use crate::interfaces::http::common::{
    go_home, render_page, see_other, PageError, PageResult, PostedForm,
};
use crate::interfaces::http::modules::auth::LOGIN_PATH;
use crate::interfaces::http::modules::reservations::validate_guest_form;
use crate::interfaces::http::render::{Page, TemplateData};
use crate::interfaces::http::session::{Session, KEY_ERROR, KEY_FLASH, KEY_USER_ID};
use crate::interfaces::http::state::AppState;
use crate::shared::Form;

/// Send anonymous visitors to the login page.
pub async fn require_authentication(
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Response {
    match session.get::<i32>(KEY_USER_ID).await.map(|id| id.is_some()) {
        Ok(true) => next.run(request).await,
        Ok(false) => {
            if let Err(e) = session.insert(KEY_ERROR, "Log in first!").await {
                return PageError::from(e).into_response();
            }
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(e) => PageError::from(e).into_response(),
    }
}

/// Which list an admin reservation page was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListSource {
    New,
    All,
}

impl ListSource {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "new" => Some(Self::New),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::All => "all",
        }
    }

    fn list_path(self) -> String {
        format!("/admin/reservations-{}", self.as_str())
    }
}

fn target(src: &str, id: &str) -> Option<(ListSource, i32)> {
    Some((ListSource::parse(src)?, id.parse().ok()?))
}

/// `GET /admin/dashboard`
pub async fn dashboard(State(state): State<AppState>, session: Session) -> PageResult {
    let data = match state.repo.all_new_reservations().await {
        Ok(new) => TemplateData::new().with_int("new_reservations", new.len() as i64),
        Err(e) => {
            error!("Dashboard counts failed: {}", e);
            return go_home(&session, "Can't load dashboard").await;
        }
    };
    render_page(state.renderer.as_ref(), &session, Page::AdminDashboard, data).await
}

/// `GET /admin/reservations-new`
pub async fn new_reservations(State(state): State<AppState>, session: Session) -> PageResult {
    match state.repo.all_new_reservations().await {
        Ok(list) => {
            let data = TemplateData::new().with("reservations", &list)?;
            render_page(state.renderer.as_ref(), &session, Page::AdminNewReservations, data).await
        }
        Err(e) => {
            error!("Listing new reservations failed: {}", e);
            go_home(&session, "Can't load reservations").await
        }
    }
}

/// `GET /admin/reservations-all`
pub async fn all_reservations(State(state): State<AppState>, session: Session) -> PageResult {
    match state.repo.all_reservations().await {
        Ok(list) => {
            let data = TemplateData::new().with("reservations", &list)?;
            render_page(state.renderer.as_ref(), &session, Page::AdminAllReservations, data).await
        }
        Err(e) => {
            error!("Listing reservations failed: {}", e);
            go_home(&session, "Can't load reservations").await
        }
    }
}

fn show_data(
    src: ListSource,
    reservation: &Reservation,
    form: Form,
) -> Result<TemplateData, PageError> {
    Ok(TemplateData::new()
        .with("reservation", reservation)?
        .with_string("src", src.as_str())
        .with_form(form))
}

/// `GET /admin/reservations/{src}/{id}/show`
pub async fn show_reservation(
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
) -> PageResult {
    let Some((src, id)) = target(&src, &id) else {
        return go_home(&session, "Unknown reservation").await;
    };
    let reservation = match state.repo.get_reservation_by_id(id).await {
        Ok(r) => r,
        Err(e) => {
            error!("Reservation {} lookup failed: {}", id, e);
            return go_home(&session, "Can't find reservation").await;
        }
    };

    let data = show_data(src, &reservation, Form::default())?;
    render_page(state.renderer.as_ref(), &session, Page::AdminShowReservation, data).await
}

/// `POST /admin/reservations/{src}/{id}`
pub async fn post_reservation(
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
    PostedForm(mut form): PostedForm,
) -> PageResult {
    let Some((src, id)) = target(&src, &id) else {
        return go_home(&session, "Unknown reservation").await;
    };
    let mut reservation = match state.repo.get_reservation_by_id(id).await {
        Ok(r) => r,
        Err(e) => {
            error!("Reservation {} lookup failed: {}", id, e);
            return go_home(&session, "Can't find reservation").await;
        }
    };

    reservation.first_name = form.get("first_name").trim().to_string();
    reservation.last_name = form.get("last_name").trim().to_string();
    reservation.email = form.get("email").trim().to_string();
    reservation.phone = form.get("phone").trim().to_string();

    validate_guest_form(&mut form);
    if !form.valid() {
        let data = show_data(src, &reservation, form)?;
        return render_page(state.renderer.as_ref(), &session, Page::AdminShowReservation, data)
            .await;
    }

    if let Err(e) = state.repo.update_reservation(&reservation).await {
        error!("Updating reservation {} failed: {}", id, e);
        return go_home(&session, "Can't save reservation").await;
    }
    session.insert(KEY_FLASH, "Changes saved").await?;
    see_other(&src.list_path())
}

/// `GET /admin/process-reservation/{src}/{id}/do`
pub async fn process_reservation(
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
) -> PageResult {
    let Some((src, id)) = target(&src, &id) else {
        return go_home(&session, "Unknown reservation").await;
    };
    if let Err(e) = state
        .repo
        .update_processed_for_reservation(id, Processed::Processed)
        .await
    {
        error!("Marking reservation {} processed failed: {}", id, e);
        return go_home(&session, "Can't update reservation").await;
    }
    info!(reservation_id = id, "Reservation processed");
    session.insert(KEY_FLASH, "Reservation marked as processed").await?;
    see_other(&src.list_path())
}

/// `GET /admin/delete-reservation/{src}/{id}/do`
pub async fn delete_reservation(
    State(state): State<AppState>,
    session: Session,
    Path((src, id)): Path<(String, String)>,
) -> PageResult {
    let Some((src, id)) = target(&src, &id) else {
        return go_home(&session, "Unknown reservation").await;
    };
    if let Err(e) = state.repo.delete_reservation(id).await {
        error!("Deleting reservation {} failed: {}", id, e);
        return go_home(&session, "Can't delete reservation").await;
    }
    info!(reservation_id = id, "Reservation deleted");
    session.insert(KEY_FLASH, "Reservation deleted").await?;
    see_other(&src.list_path())
}

/// `GET /admin/profile`
pub async fn profile(State(state): State<AppState>, session: Session) -> PageResult {
    let Some(user_id) = session.get::<i32>(KEY_USER_ID).await? else {
        return see_other(LOGIN_PATH);
    };
    match state.repo.get_user_by_id(user_id).await {
        Ok(user) => {
            let data = TemplateData::new().with("user", &user)?;
            render_page(state.renderer.as_ref(), &session, Page::AdminProfile, data).await
        }
        Err(e) => {
            error!("User {} lookup failed: {}", user_id, e);
            go_home(&session, "Can't load profile").await
        }
    }
}

/// `POST /admin/profile`
pub async fn post_profile(
    State(state): State<AppState>,
    session: Session,
    PostedForm(mut form): PostedForm,
) -> PageResult {
    let Some(user_id) = session.get::<i32>(KEY_USER_ID).await? else {
        return see_other(LOGIN_PATH);
    };
    let mut user = match state.repo.get_user_by_id(user_id).await {
        Ok(user) => user,
        Err(e) => {
            error!("User {} lookup failed: {}", user_id, e);
            return go_home(&session, "Can't load profile").await;
        }
    };

    user.first_name = form.get("first_name").trim().to_string();
    user.last_name = form.get("last_name").trim().to_string();
    user.email = form.get("email").trim().to_string();

    form.required(&["first_name", "last_name", "email"]);
    form.is_email("email");
    if !form.valid() {
        let data = TemplateData::new().with("user", &user)?.with_form(form);
        return render_page(state.renderer.as_ref(), &session, Page::AdminProfile, data).await;
    }

    if let Err(e) = state.repo.update_user(&user).await {
        error!("Updating user {} failed: {}", user_id, e);
        return go_home(&session, "Can't save profile").await;
    }
    session.insert(KEY_FLASH, "Profile updated").await?;
    see_other("/admin/profile")
}
