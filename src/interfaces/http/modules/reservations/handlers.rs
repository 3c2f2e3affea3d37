//! Guest booking handlers
//!
//! search → choose room (or direct book link) → guest form → summary.
//! The pending reservation rides in the session between these steps.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{error, warn};

use crate::domain::{format_date, parse_date, BookingError, Reservation, StayPeriod};
use crate::interfaces::http::common::{
    go_home, redirect_with_error, render_page, see_other, PageResult, PostedForm,
};
use crate::interfaces::http::render::{Page, RenderError, TemplateData};
use crate::interfaces::http::session::{Session, KEY_CONFIRMED, KEY_ERROR, KEY_RESERVATION};
use crate::interfaces::http::state::AppState;
use crate::shared::Form;

use super::dto::{AvailabilityRequest, AvailabilityResponse};

/// `GET /search-availability`
pub async fn search_availability(State(state): State<AppState>, session: Session) -> PageResult {
    render_page(
        state.renderer.as_ref(),
        &session,
        Page::SearchAvailability,
        TemplateData::new(),
    )
    .await
}

/// `POST /search-availability`
pub async fn post_availability(
    State(state): State<AppState>,
    session: Session,
    PostedForm(form): PostedForm,
) -> PageResult {
    let period = match StayPeriod::parse(form.get("start"), form.get("end")) {
        Ok(p) => p,
        Err(e) => {
            warn!("Availability search with bad dates: {}", e);
            return redirect_with_error(&session, "/search-availability", "Invalid dates").await;
        }
    };

    let rooms = match state.booking.available_rooms(period).await {
        Ok(rooms) => rooms,
        Err(_) => return go_home(&session, "Can't search availability").await,
    };

    if rooms.is_empty() {
        session.insert(KEY_ERROR, "No availability").await?;
        return see_other("/search-availability");
    }

    session
        .insert(KEY_RESERVATION, Reservation::pending(period))
        .await?;

    let data = TemplateData::new()
        .with("rooms", &rooms)?
        .with_string("start_date", format_date(period.start()))
        .with_string("end_date", format_date(period.end()));
    render_page(state.renderer.as_ref(), &session, Page::ChooseRoom, data).await
}

/// Check one room for a date range
#[utoipa::path(
    post,
    path = "/search-availability-json",
    tag = "Availability",
    request_body(
        content = AvailabilityRequest,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Availability result, including input errors", body = AvailabilityResponse),
        (status = 307, description = "Request had no body")
    )
)]
pub async fn availability_json(
    State(state): State<AppState>,
    PostedForm(form): PostedForm,
) -> Json<AvailabilityResponse> {
    let period = match StayPeriod::parse(form.get("start"), form.get("end")) {
        Ok(p) => p,
        Err(e) => return Json(AvailabilityResponse::failure(e.to_string())),
    };
    let room_id: i32 = match form.get("room_id").trim().parse() {
        Ok(id) => id,
        Err(_) => return Json(AvailabilityResponse::failure("Invalid room id")),
    };

    match state.booking.room_availability(period, room_id).await {
        Ok(available) => Json(AvailabilityResponse {
            ok: available,
            message: String::new(),
            room_id: room_id.to_string(),
            start_date: format_date(period.start()),
            end_date: format_date(period.end()),
        }),
        Err(_) => Json(AvailabilityResponse::failure("Error querying database")),
    }
}

/// `GET /choose-room/{id}`
pub async fn choose_room(session: Session, id: Option<Path<String>>) -> PageResult {
    let Some(room_id) = id.and_then(|Path(raw)| raw.parse::<i32>().ok()) else {
        return go_home(&session, "Missing or invalid room id").await;
    };

    let Some(mut reservation) = session.get::<Reservation>(KEY_RESERVATION).await? else {
        return go_home(&session, "Can't get reservation from session").await;
    };

    reservation.room_id = room_id;
    session.insert(KEY_RESERVATION, &reservation).await?;
    see_other("/make-reservation")
}

/// `GET /book-room?id=&s=&e=`
pub async fn book_room(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HashMap<String, String>>,
) -> PageResult {
    let param = |key: &str| -> String { params.get(key).cloned().unwrap_or_default() };

    let Ok(room_id) = param("id").parse::<i32>() else {
        return go_home(&session, "Missing or invalid room id").await;
    };
    let period = match StayPeriod::parse(&param("s"), &param("e")) {
        Ok(p) => p,
        Err(_) => return go_home(&session, "Invalid dates").await,
    };
    let room = match state.booking.room(room_id).await {
        Ok(room) => room,
        Err(_) => return go_home(&session, "Can't get room from db").await,
    };

    session
        .insert(KEY_RESERVATION, Reservation::pending(period).with_room(room))
        .await?;
    see_other("/make-reservation")
}

fn reservation_page_data(
    reservation: &Reservation,
    form: Form,
) -> Result<TemplateData, RenderError> {
    Ok(TemplateData::new()
        .with("reservation", reservation)?
        .with_string("start_date", format_date(reservation.start_date))
        .with_string("end_date", format_date(reservation.end_date))
        .with_form(form))
}

/// `GET /make-reservation`
pub async fn make_reservation(State(state): State<AppState>, session: Session) -> PageResult {
    let Some(mut reservation) = session.get::<Reservation>(KEY_RESERVATION).await? else {
        return go_home(&session, "Can't get reservation from session").await;
    };

    let room = match state.booking.room(reservation.room_id).await {
        Ok(room) => room,
        Err(_) => return go_home(&session, "Can't find room").await,
    };
    reservation.room = room;
    session.insert(KEY_RESERVATION, &reservation).await?;

    let data = reservation_page_data(&reservation, Form::default())?;
    render_page(state.renderer.as_ref(), &session, Page::MakeReservation, data).await
}

/// Guest detail checks shared with the back-office edit form.
pub fn validate_guest_form(form: &mut Form) {
    form.required(&["first_name", "last_name", "email", "phone"]);
    form.min_length("first_name", 3);
    form.min_length("last_name", 3);
    form.is_email("email");
}

/// `POST /make-reservation`
pub async fn post_reservation(
    State(state): State<AppState>,
    session: Session,
    PostedForm(mut form): PostedForm,
) -> PageResult {
    let Ok(start) = parse_date(form.get("start_date")) else {
        return go_home(&session, "Can't parse start date").await;
    };
    let Ok(end) = parse_date(form.get("end_date")) else {
        return go_home(&session, "Can't parse end date").await;
    };
    let Ok(room_id) = form.get("room_id").trim().parse::<i32>() else {
        return go_home(&session, "Invalid room id").await;
    };
    if StayPeriod::new(start, end).is_err() {
        return go_home(&session, "Departure must be after arrival").await;
    }

    let pending = session
        .get::<Reservation>(KEY_RESERVATION)
        .await?
        .unwrap_or_default();
    let room = if pending.room.id == room_id {
        pending.room.clone()
    } else {
        match state.booking.room(room_id).await {
            Ok(room) => room,
            Err(_) => return go_home(&session, "Can't find room").await,
        }
    };

    let mut reservation = Reservation {
        first_name: form.get("first_name").trim().to_string(),
        last_name: form.get("last_name").trim().to_string(),
        email: form.get("email").trim().to_string(),
        phone: form.get("phone").trim().to_string(),
        start_date: start,
        end_date: end,
        ..pending
    }
    .with_room(room);

    validate_guest_form(&mut form);
    if !form.valid() {
        let data = reservation_page_data(&reservation, form)?;
        return render_page(state.renderer.as_ref(), &session, Page::MakeReservation, data).await;
    }

    match state.booking.confirm(&reservation).await {
        Ok(id) => reservation.id = id,
        Err(BookingError::Reservation(_)) => {
            return go_home(&session, "Can't insert reservation into database").await;
        }
        Err(BookingError::Restriction { .. }) => {
            return go_home(&session, "Can't insert room restriction").await;
        }
    }

    session.remove_value(KEY_RESERVATION).await?;
    if let Err(e) = session.insert(KEY_CONFIRMED, &reservation).await {
        error!("Reservation {} saved but not kept for the summary: {}", reservation.id, e);
        return Err(e.into());
    }
    see_other("/reservation-summary")
}

/// `GET /reservation-summary`
pub async fn reservation_summary(State(state): State<AppState>, session: Session) -> PageResult {
    let Some(reservation) = session.remove::<Reservation>(KEY_CONFIRMED).await? else {
        return go_home(&session, "Can't get reservation from session").await;
    };

    let data = reservation_page_data(&reservation, Form::default())?;
    render_page(state.renderer.as_ref(), &session, Page::ReservationSummary, data).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::domain::{Processed, RestrictionKind, Room, RoomRestriction};
    use crate::infrastructure::database::repositories::test_repo::{
        FAILING_RESERVATION_ROOM, FAILING_RESTRICTION_ROOM,
    };
    use crate::infrastructure::database::TestDatabaseRepo;
    use crate::interfaces::http::testing::{location, TestApp};

    const TOKEN: &str = "test-session";

    fn pending_with_dates(room_id: i32, start: &str, end: &str) -> Reservation {
        Reservation {
            room_id,
            ..Reservation::pending(StayPeriod::parse(start, end).unwrap())
        }
    }

    fn pending(room_id: i32) -> Reservation {
        pending_with_dates(room_id, "2050-01-01", "2050-01-02")
    }

    /// Pending reservation as left by the guest form, room already resolved.
    fn pending_in_room(room_id: i32, room_name: &str) -> Reservation {
        pending(0).with_room(Room::new(room_id, room_name))
    }

    fn guest_body(room_id: &str) -> String {
        format!(
            "start_date=2050-01-01&end_date=2050-01-02&first_name=John&last_name=Smith\
             &email=john@smith.com&phone=123456789&room_id={}",
            room_id
        )
    }

    // ── static pages ──────────────────────────────────────────────

    #[tokio::test]
    async fn search_page_renders() {
        let app = TestApp::new();
        let resp = app.get("/search-availability", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(app.last_page(), Some(Page::SearchAvailability));
    }

    // ── search availability ───────────────────────────────────────

    #[tokio::test]
    async fn search_with_rooms_renders_choice_list() {
        let app = TestApp::new();
        let resp = app
            .post_form("/search-availability", TOKEN, "start=2050-01-01&end=2050-01-02")
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (page, data) = app.last_render().unwrap();
        assert_eq!(page, Page::ChooseRoom);
        assert!(!data.data["rooms"].as_array().unwrap().is_empty());

        let saved: Reservation = app.session_value(TOKEN, KEY_RESERVATION).await.unwrap();
        assert_eq!(format_date(saved.start_date), "2050-01-01");
        assert_eq!(format_date(saved.end_date), "2050-01-02");
    }

    #[tokio::test]
    async fn search_without_rooms_redirects_with_notice() {
        let app = TestApp::new();
        let resp = app
            .post_form("/search-availability", TOKEN, "start=2050-10-01&end=2050-10-02")
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/search-availability");
        assert!(app.last_render().is_none());
        assert_eq!(
            app.session_value::<String>(TOKEN, KEY_ERROR).await.as_deref(),
            Some("No availability")
        );
    }

    #[tokio::test]
    async fn search_storage_error_goes_home() {
        let app = TestApp::new();
        let resp = app
            .post_form("/search-availability", TOKEN, "start=2050-11-11&end=2050-11-12")
            .await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), "/");
    }

    #[tokio::test]
    async fn search_with_bad_dates_returns_to_search() {
        let app = TestApp::new();
        for body in [
            "start=invalid-data&end=2050-01-02",
            "start=2050-01-01&end=invalid-data",
            "start=2050-01-02&end=2050-01-01",
        ] {
            let resp = app.post_form("/search-availability", TOKEN, body).await;
            assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", body);
            assert_eq!(location(&resp), "/search-availability");
        }
    }

    #[tokio::test]
    async fn search_without_body_redirects() {
        let app = TestApp::new();
        let resp = app.post_form("/search-availability", TOKEN, "").await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    // ── JSON availability ─────────────────────────────────────────

    #[tokio::test]
    async fn json_availability_for_free_room() {
        let app = TestApp::new();
        let resp = app
            .post_form(
                "/search-availability-json",
                TOKEN,
                "start=2050-01-01&end=2050-01-02&room_id=1",
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: AvailabilityResponse = TestApp::json(resp).await;
        assert_eq!(
            body,
            AvailabilityResponse {
                ok: true,
                message: String::new(),
                room_id: "1".into(),
                start_date: "2050-01-01".into(),
                end_date: "2050-01-02".into(),
            }
        );
    }

    #[tokio::test]
    async fn json_availability_respects_half_open_ranges() {
        let stay = pending_with_dates(1, "2050-03-01", "2050-03-05");
        let repo =
            TestDatabaseRepo::new().with_restriction(RoomRestriction::for_reservation(&stay, 42));
        let app = TestApp::with_repo(repo);

        let overlapping = app
            .post_form(
                "/search-availability-json",
                TOKEN,
                "start=2050-03-04&end=2050-03-06&room_id=1",
            )
            .await;
        let body: AvailabilityResponse = TestApp::json(overlapping).await;
        assert!(!body.ok);

        let adjacent = app
            .post_form(
                "/search-availability-json",
                TOKEN,
                "start=2050-03-05&end=2050-03-06&room_id=1",
            )
            .await;
        let body: AvailabilityResponse = TestApp::json(adjacent).await;
        assert!(body.ok);
    }

    #[tokio::test]
    async fn json_availability_errors_are_payloads() {
        let app = TestApp::new();
        for body in [
            "start=bad&end=2050-01-02&room_id=1",
            "start=2050-01-01&end=2050-01-02&room_id=abc",
            "start=2050-01-01&end=2050-01-02&room_id=999",
        ] {
            let resp = app.post_form("/search-availability-json", TOKEN, body).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", body);
            let payload: AvailabilityResponse = TestApp::json(resp).await;
            assert!(!payload.ok);
            assert!(!payload.message.is_empty());
        }
    }

    #[tokio::test]
    async fn json_availability_without_body_redirects() {
        let app = TestApp::new();
        let resp = app.post_form("/search-availability-json", TOKEN, "").await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    // ── choose room ───────────────────────────────────────────────

    #[tokio::test]
    async fn choose_room_updates_pending_reservation() {
        let app = TestApp::new();
        app.seed(TOKEN, KEY_RESERVATION, &pending(0)).await;

        let resp = app.get("/choose-room/1", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/make-reservation");

        let saved: Reservation = app.session_value(TOKEN, KEY_RESERVATION).await.unwrap();
        assert_eq!(saved.room_id, 1);
    }

    #[tokio::test]
    async fn chosen_room_reaches_the_form_unchanged() {
        let app = TestApp::new();
        let guest = Reservation {
            first_name: "John".into(),
            last_name: "Smith".into(),
            email: "john@smith.com".into(),
            phone: "123456789".into(),
            ..pending_with_dates(0, "2050-03-01", "2050-03-04")
        };
        app.seed(TOKEN, KEY_RESERVATION, &guest).await;

        let resp = app.get("/choose-room/1", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let stored: Reservation = app.session_value(TOKEN, KEY_RESERVATION).await.unwrap();

        let resp = app.get("/make-reservation", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let (_, data) = app.last_render().unwrap();
        let shown: Reservation = serde_json::from_value(data.data["reservation"].clone()).unwrap();

        assert_eq!(shown.first_name, stored.first_name);
        assert_eq!(shown.last_name, stored.last_name);
        assert_eq!(shown.email, stored.email);
        assert_eq!(shown.phone, stored.phone);
        assert_eq!(shown.room_id, stored.room_id);
        assert_eq!(shown.start_date, stored.start_date);
        assert_eq!(shown.end_date, stored.end_date);
        assert_eq!(shown.room_id, 1);
        assert_eq!(shown.first_name, "John");
    }

    #[tokio::test]
    async fn choose_room_without_valid_id_goes_home() {
        let app = TestApp::new();
        app.seed(TOKEN, KEY_RESERVATION, &pending(0)).await;
        for uri in ["/choose-room/fish", "/choose-room/"] {
            let resp = app.get(uri, TOKEN).await;
            assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", uri);
            assert_eq!(location(&resp), "/");
        }
    }

    #[tokio::test]
    async fn choose_room_without_session_reservation_goes_home() {
        let app = TestApp::new();
        let resp = app.get("/choose-room/1", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    // ── book room ─────────────────────────────────────────────────

    #[tokio::test]
    async fn book_room_stores_pending_reservation() {
        let app = TestApp::new();
        let resp = app
            .get("/book-room?id=1&s=2050-01-01&e=2050-01-02", TOKEN)
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/make-reservation");

        let saved: Reservation = app.session_value(TOKEN, KEY_RESERVATION).await.unwrap();
        assert_eq!(saved.room_id, 1);
        assert_eq!(saved.room.room_name, "General's Quarters");
    }

    #[tokio::test]
    async fn book_room_failures_go_home() {
        let app = TestApp::new();
        for uri in [
            "/book-room?id=4&s=2050-01-01&e=2050-01-02",
            "/book-room?id=x&s=2050-01-01&e=2050-01-02",
            "/book-room?id=1&s=bad&e=2050-01-02",
            "/book-room",
        ] {
            let resp = app.get(uri, TOKEN).await;
            assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", uri);
        }
    }

    // ── reservation form ──────────────────────────────────────────

    #[tokio::test]
    async fn reservation_form_renders_pending_reservation() {
        let app = TestApp::new();
        let r = pending(1);
        app.seed(TOKEN, KEY_RESERVATION, &r).await;

        let resp = app.get("/make-reservation", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (page, data) = app.last_render().unwrap();
        assert_eq!(page, Page::MakeReservation);
        let shown: Reservation = serde_json::from_value(data.data["reservation"].clone()).unwrap();
        assert_eq!(shown.room_id, r.room_id);
        assert_eq!(shown.start_date, r.start_date);
        assert_eq!(shown.end_date, r.end_date);
        assert_eq!(shown.first_name, r.first_name);
        assert_eq!(shown.room.room_name, "General's Quarters");
    }

    #[tokio::test]
    async fn reservation_form_requires_session() {
        let app = TestApp::new();
        let resp = app.get("/make-reservation", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[tokio::test]
    async fn reservation_form_with_unknown_room_goes_home() {
        let app = TestApp::new();
        app.seed(TOKEN, KEY_RESERVATION, &pending(100)).await;
        let resp = app.get("/make-reservation", TOKEN).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    // ── submit reservation ────────────────────────────────────────

    #[tokio::test]
    async fn valid_submission_saves_and_redirects_to_summary() {
        let app = TestApp::new();
        app.seed(TOKEN, KEY_RESERVATION, &pending(1)).await;

        let resp = app.post_form("/make-reservation", TOKEN, &guest_body("1")).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/reservation-summary");

        assert!(app
            .session_value::<Reservation>(TOKEN, KEY_RESERVATION)
            .await
            .is_none());
        let confirmed: Reservation = app.session_value(TOKEN, KEY_CONFIRMED).await.unwrap();
        assert_eq!(confirmed.id, 1);
        assert_eq!(confirmed.first_name, "John");
        assert_eq!(confirmed.processed, Processed::New);

        let blocks = app.repo.restriction_inserts();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].reservation_id, Some(1));
        assert_eq!(blocks[0].restriction, RestrictionKind::Reservation);
    }

    #[tokio::test]
    async fn submission_without_pending_reservation_is_accepted() {
        let app = TestApp::new();
        let resp = app.post_form("/make-reservation", TOKEN, &guest_body("1")).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn short_first_name_rerenders_with_error() {
        let app = TestApp::new();
        let body = guest_body("1").replace("first_name=John", "first_name=J");
        let resp = app.post_form("/make-reservation", TOKEN, &body).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (page, data) = app.last_render().unwrap();
        assert_eq!(page, Page::MakeReservation);
        assert!(!data.form.errors.get("first_name").is_empty());
        assert!(data.form.errors.get("last_name").is_empty());
        assert_eq!(data.data["reservation"]["first_name"], "J");
        assert!(app.repo.restriction_inserts().is_empty());
    }

    #[tokio::test]
    async fn bad_email_rerenders_with_error() {
        let app = TestApp::new();
        let body = guest_body("1").replace("email=john@smith.com", "email=abc");
        let resp = app.post_form("/make-reservation", TOKEN, &body).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let (_, data) = app.last_render().unwrap();
        assert!(!data.form.errors.get("email").is_empty());
    }

    #[tokio::test]
    async fn unparsable_submission_goes_home() {
        let app = TestApp::new();
        for body in [
            guest_body("1").replace("start_date=2050-01-01", "start_date=invalid"),
            guest_body("1").replace("end_date=2050-01-02", "end_date=invalid"),
            guest_body("invalid"),
            String::new(),
        ] {
            let resp = app.post_form("/make-reservation", TOKEN, &body).await;
            assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "{}", body);
        }
    }

    #[tokio::test]
    async fn failed_reservation_insert_skips_restriction() {
        let app = TestApp::new();
        let resp = app
            .post_form(
                "/make-reservation",
                TOKEN,
                &guest_body(&FAILING_RESERVATION_ROOM.to_string()),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), "/");
        assert!(app.repo.restriction_inserts().is_empty());
        assert!(app
            .session_value::<Reservation>(TOKEN, KEY_CONFIRMED)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn failed_restriction_insert_goes_home() {
        let app = TestApp::new();
        app.seed(
            TOKEN,
            KEY_RESERVATION,
            &pending_in_room(FAILING_RESTRICTION_ROOM, "Annex"),
        )
        .await;
        let resp = app
            .post_form(
                "/make-reservation",
                TOKEN,
                &guest_body(&FAILING_RESTRICTION_ROOM.to_string()),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(app
            .session_value::<Reservation>(TOKEN, KEY_CONFIRMED)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn posted_room_replaces_pending_room() {
        let app = TestApp::new();
        app.seed(
            TOKEN,
            KEY_RESERVATION,
            &pending_in_room(FAILING_RESERVATION_ROOM, "Major's Suite"),
        )
        .await;

        let resp = app.post_form("/make-reservation", TOKEN, &guest_body("1")).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let confirmed: Reservation = app.session_value(TOKEN, KEY_CONFIRMED).await.unwrap();
        assert_eq!(confirmed.room_id, 1);
        assert_eq!(confirmed.room.id, 1);
        assert_eq!(confirmed.room.room_name, "General's Quarters");
    }

    #[tokio::test]
    async fn unknown_posted_room_goes_home_without_booking() {
        let app = TestApp::new();
        let resp = app.post_form("/make-reservation", TOKEN, &guest_body("7")).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&resp), "/");
        assert!(app.repo.restriction_inserts().is_empty());
    }

    // ── summary ───────────────────────────────────────────────────

    #[tokio::test]
    async fn summary_is_shown_once() {
        let app = TestApp::new();
        app.seed(TOKEN, KEY_CONFIRMED, &pending(1)).await;

        let first = app.get("/reservation-summary", TOKEN).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(app.last_page(), Some(Page::ReservationSummary));

        let second = app.get("/reservation-summary", TOKEN).await;
        assert_eq!(second.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    // ── whole flow ────────────────────────────────────────────────

    #[tokio::test]
    async fn search_choose_book_summary() {
        let app = TestApp::new();
        let search = app
            .post_form("/search-availability", TOKEN, "start=2050-01-01&end=2050-01-02")
            .await;
        assert_eq!(search.status(), StatusCode::OK);

        assert_eq!(app.get("/choose-room/1", TOKEN).await.status(), StatusCode::SEE_OTHER);
        assert_eq!(app.get("/make-reservation", TOKEN).await.status(), StatusCode::OK);
        assert_eq!(
            app.post_form("/make-reservation", TOKEN, &guest_body("1"))
                .await
                .status(),
            StatusCode::SEE_OTHER
        );
        assert_eq!(app.get("/reservation-summary", TOKEN).await.status(), StatusCode::OK);

        let (_, data) = app.last_render().unwrap();
        assert_eq!(data.data["reservation"]["room"]["room_name"], "General's Quarters");
    }
}
