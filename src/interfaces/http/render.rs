//! Page rendering boundary
//!
//! Handlers build a [`TemplateData`] bag and hand it to a [`Renderer`]
//! together with the [`Page`] to draw. `HtmlRenderer` is the built-in
//! implementation; a template engine plugs in behind the same trait.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::shared::Form;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot serialize template data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    About,
    GeneralsQuarters,
    MajorsSuite,
    Contact,
    SearchAvailability,
    ChooseRoom,
    MakeReservation,
    ReservationSummary,
    Login,
    AdminDashboard,
    AdminNewReservations,
    AdminAllReservations,
    AdminShowReservation,
    AdminProfile,
}

impl Page {
    pub fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::GeneralsQuarters => "generals-quarters",
            Self::MajorsSuite => "majors-suite",
            Self::Contact => "contact",
            Self::SearchAvailability => "search-availability",
            Self::ChooseRoom => "choose-room",
            Self::MakeReservation => "make-reservation",
            Self::ReservationSummary => "reservation-summary",
            Self::Login => "login",
            Self::AdminDashboard => "admin-dashboard",
            Self::AdminNewReservations => "admin-new-reservations",
            Self::AdminAllReservations => "admin-all-reservations",
            Self::AdminShowReservation => "admin-reservations-show",
            Self::AdminProfile => "admin-profile",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::GeneralsQuarters => "General's Quarters",
            Self::MajorsSuite => "Major's Suite",
            Self::Contact => "Contact",
            Self::SearchAvailability => "Search for Availability",
            Self::ChooseRoom => "Choose a Room",
            Self::MakeReservation => "Make Reservation",
            Self::ReservationSummary => "Reservation Summary",
            Self::Login => "Login",
            Self::AdminDashboard => "Dashboard",
            Self::AdminNewReservations => "New Reservations",
            Self::AdminAllReservations => "All Reservations",
            Self::AdminShowReservation => "Reservation",
            Self::AdminProfile => "Profile",
        }
    }
}

/// Everything a page can show.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    pub string_map: HashMap<String, String>,
    pub int_map: HashMap<String, i64>,
    pub data: Map<String, Value>,
    pub form: Form,
    pub flash: String,
    pub warning: String,
    pub error: String,
    pub is_authenticated: bool,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a serializable value into the data bag.
    pub fn with<T: Serialize>(mut self, key: &str, value: &T) -> Result<Self, RenderError> {
        self.data.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn with_string(mut self, key: &str, value: impl Into<String>) -> Self {
        self.string_map.insert(key.to_string(), value.into());
        self
    }

    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.int_map.insert(key.to_string(), value);
        self
    }

    pub fn with_form(mut self, form: Form) -> Self {
        self.form = form;
        self
    }
}

pub trait Renderer: Send + Sync {
    fn render(&self, page: Page, data: &TemplateData) -> Result<String, RenderError>;
}

/// Minimal HTML shell: title, notices and the data bag as embedded JSON.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl Renderer for HtmlRenderer {
    fn render(&self, page: Page, data: &TemplateData) -> Result<String, RenderError> {
        // `</` would end the script element early
        let json = serde_json::to_string(data)?.replace("</", "<\\/");

        let mut notices = String::new();
        for (class, text) in [
            ("flash", &data.flash),
            ("warning", &data.warning),
            ("error", &data.error),
        ] {
            if !text.is_empty() {
                notices.push_str(&format!(
                    "<div class=\"notice {}\">{}</div>\n",
                    class,
                    escape_html(text)
                ));
            }
        }

        Ok(format!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<link rel=\"stylesheet\" href=\"/static/css/styles.css\">\n\
             </head>\n<body data-page=\"{name}\">\n<h1>{title}</h1>\n{notices}\
             <script type=\"application/json\" id=\"page-data\">{json}</script>\n\
             </body>\n</html>\n",
            title = escape_html(page.title()),
            name = page.name(),
            notices = notices,
            json = json,
        ))
    }
}
