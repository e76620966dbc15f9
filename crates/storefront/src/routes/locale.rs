//! Header language switch.

use axum::{
    Form,
    response::{IntoResponse, Redirect, Response},
};
use easyshop_core::{Destination, Locale};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Language switch form data.
#[derive(Debug, Deserialize)]
pub struct LocaleForm {
    /// Page to return to.
    pub next: Option<String>,
}

/// Toggle between English and Arabic, then return to the same page.
pub async fn switch(session: Session, Form(form): Form<LocaleForm>) -> Result<Response, AppError> {
    let current: Locale = session
        .get(session_keys::LOCALE)
        .await?
        .unwrap_or_default();
    session
        .insert(session_keys::LOCALE, current.toggled())
        .await?;

    let next = form
        .next
        .as_deref()
        .filter(|path| is_local_path(path))
        .unwrap_or(Destination::Home.path());
    Ok(Redirect::to(next).into_response())
}

/// Only same-site absolute paths are followed.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
