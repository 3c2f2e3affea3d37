//! Router harness for handler tests
//!
//! Drives the full router against [`TestDatabaseRepo`] and a renderer that
//! records what it was asked to draw. Sessions are addressed by a label;
//! the harness keeps each label's session cookie the way a browser would.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde::{de::DeserializeOwned, Serialize};
use time::OffsetDateTime;
use tower::ServiceExt;
use tower_sessions::cookie::Cookie;
use tower_sessions::session::{Id, Record};
use tower_sessions::SessionStore;

use crate::infrastructure::database::TestDatabaseRepo;
use crate::infrastructure::session::InMemorySessionStore;
use crate::interfaces::http::render::{Page, RenderError, Renderer, TemplateData};
use crate::interfaces::http::session::SessionState;
use crate::interfaces::http::{create_router, AppState};

const COOKIE_NAME: &str = "session";

#[derive(Default)]
pub struct RecordingRenderer {
    last: Mutex<Option<(Page, TemplateData)>>,
}

impl Renderer for RecordingRenderer {
    fn render(&self, page: Page, data: &TemplateData) -> Result<String, RenderError> {
        *self.last.lock().unwrap() = Some((page, data.clone()));
        Ok(page.name().to_string())
    }
}

pub struct TestApp {
    router: Router,
    pub store: InMemorySessionStore,
    pub repo: Arc<TestDatabaseRepo>,
    renderer: Arc<RecordingRenderer>,
    jar: Mutex<HashMap<String, String>>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repo(TestDatabaseRepo::new())
    }

    pub fn with_repo(repo: TestDatabaseRepo) -> Self {
        let repo = Arc::new(repo);
        let store = InMemorySessionStore::new();
        let renderer = Arc::new(RecordingRenderer::default());

        let sessions = SessionState {
            store: store.clone(),
            cookie_name: COOKIE_NAME.into(),
            secure: false,
            lifetime: Duration::from_secs(3600),
        };
        let state = AppState::new(repo.clone(), renderer.clone(), sessions);
        let router = create_router(state, None, Path::new("./static"));

        Self {
            router,
            store,
            repo,
            renderer,
            jar: Mutex::new(HashMap::new()),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Current session id behind `label`, if the label holds a cookie.
    pub fn session_id(&self, label: &str) -> Option<String> {
        self.jar.lock().unwrap().get(label).cloned()
    }

    fn request(&self, label: &str) -> axum::http::request::Builder {
        let builder = Request::builder();
        match self.session_id(label) {
            Some(id) => builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, id)),
            None => builder,
        }
    }

    /// Track `Set-Cookie` for `label`: new ids replace the old one, a
    /// removal cookie forgets it.
    fn remember(&self, label: &str, response: &Response) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let cookie = Cookie::parse(value.to_str().unwrap().to_string()).unwrap();
            if cookie.name() != COOKIE_NAME {
                continue;
            }
            let mut jar = self.jar.lock().unwrap();
            if cookie.value().is_empty() || cookie.max_age() == Some(time::Duration::ZERO) {
                jar.remove(label);
            } else {
                jar.insert(label.to_string(), cookie.value().to_string());
            }
        }
    }

    pub async fn get(&self, uri: &str, label: &str) -> Response {
        let req = self.request(label).uri(uri).body(Body::empty()).unwrap();
        let resp = self.send(req).await;
        self.remember(label, &resp);
        resp
    }

    pub async fn post_form(&self, uri: &str, label: &str, body: &str) -> Response {
        let req = self
            .request(label)
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = self.send(req).await;
        self.remember(label, &resp);
        resp
    }

    async fn record(&self, label: &str) -> Option<Record> {
        let id: Id = self.session_id(label)?.parse().unwrap();
        self.store.load(&id).await.unwrap()
    }

    /// Store a value in a session before the request that reads it.
    pub async fn seed<T: Serialize>(&self, label: &str, key: &str, value: &T) {
        let value = serde_json::to_value(value).unwrap();
        match self.record(label).await {
            Some(mut record) => {
                record.data.insert(key.to_string(), value);
                self.store.save(&record).await.unwrap();
            }
            None => {
                let mut record = Record {
                    id: Id::default(),
                    data: HashMap::from([(key.to_string(), value)]),
                    expiry_date: OffsetDateTime::now_utc() + time::Duration::hours(1),
                };
                self.store.create(&mut record).await.unwrap();
                self.jar
                    .lock()
                    .unwrap()
                    .insert(label.to_string(), record.id.to_string());
            }
        }
    }

    pub async fn session_value<T: DeserializeOwned>(&self, label: &str, key: &str) -> Option<T> {
        let record = self.record(label).await?;
        record
            .data
            .get(key)
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    pub fn last_render(&self) -> Option<(Page, TemplateData)> {
        self.renderer.last.lock().unwrap().clone()
    }

    pub fn last_page(&self) -> Option<Page> {
        self.last_render().map(|(page, _)| page)
    }

    pub async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
