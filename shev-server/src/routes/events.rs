//! Event creation, view page and calendar download

use axum::{
    Form, Router,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use minijinja::context;
use shev_core::NewEventForm;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(new_event_form).post(create_event))
        .route("/view/{id}", get(view_event))
        .route("/ev/{id}", get(download_calendar))
}

/// GET / - Creation form
async fn new_event_form(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render("index.html", context! {})?))
}

/// POST / - Create an event and redirect to its page
///
/// The body is read as raw pairs because `alarm` may repeat.
async fn create_event(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Redirect, AppError> {
    let form = NewEventForm::from_pairs(pairs);

    let event = state
        .service
        .create(form)
        .await
        .map_err(|e| AppError::from_shev(e, "Failed to create new event."))?;

    Ok(Redirect::to(&format!("/view/{}", event.id)))
}

/// GET /view/{id} - Human-readable event page
async fn view_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let view = state
        .service
        .view(&id)
        .await
        .map_err(|e| AppError::from_shev(e, "Failed to get event."))?;

    Ok(Html(state.templates.render("view_ev.html", context! { ev => view })?))
}

/// GET /ev/{id} - ICS download
async fn download_calendar(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let ics = state
        .service
        .calendar(&id)
        .await
        .map_err(|e| AppError::from_shev(e, "Failed to get event."))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{id}.ics\""),
            ),
        ],
        ics,
    ))
}
