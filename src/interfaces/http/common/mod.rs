//! Shared extractors and response helpers for page handlers

pub mod posted_form;
pub mod respond;

pub use posted_form::PostedForm;
pub use respond::{go_home, redirect_with_error, render_page, see_other, PageError, PageResult};
