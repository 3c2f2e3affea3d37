//! URL-encoded form extractor
//!
//! `PostedForm` decodes an `application/x-www-form-urlencoded` body into a
//! [`Form`] ready for validation. A request without a body cannot be
//! handled by any form page and is redirected home with 307.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Redirect, Response};
use tracing::warn;

use crate::shared::Form;

pub struct PostedForm(pub Form);

/// Rejection for [`PostedForm`]
#[derive(Debug)]
pub enum PostedFormRejection {
    MissingBody,
    Unreadable(String),
}

impl IntoResponse for PostedFormRejection {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingBody => warn!("Form post without a body"),
            Self::Unreadable(e) => warn!("Cannot read form body: {}", e),
        }
        Redirect::temporary("/").into_response()
    }
}

impl<S> FromRequest<S> for PostedForm
where
    S: Send + Sync,
{
    type Rejection = PostedFormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| PostedFormRejection::Unreadable(e.to_string()))?;

        if body.is_empty() {
            return Err(PostedFormRejection::MissingBody);
        }

        let pairs = url::form_urlencoded::parse(&body).into_owned();
        Ok(PostedForm(Form::from_pairs(pairs)))
    }
}
