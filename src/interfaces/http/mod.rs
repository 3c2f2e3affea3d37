//! HTTP interface
//!
//! - `modules`: page handlers grouped by area, plus health and metrics
//! - `session`: session keys and the `tower-sessions` layer
//! - `render`: page rendering boundary
//! - `router`: route table and OpenAPI document

pub mod common;
pub mod modules;
pub mod render;
pub mod router;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use render::{HtmlRenderer, Page, Renderer, TemplateData};
pub use router::create_router;
pub use session::SessionState;
pub use state::AppState;
