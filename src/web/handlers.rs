//! Request handlers for the dashboard page and its JSON API.

use std::sync::Arc;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Deserialize;

use crate::catalog::QueryDefinition;
use crate::error::GlanceError;
use crate::query::RenderModel;
use crate::web::{page, AppState};

/// Form body posted by the query selector.
#[derive(Debug, Deserialize)]
pub struct QueryForm {
    pub query: Option<String>,
}

pub async fn healthz() -> &'static str {
    "OK"
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render_page(&state.executor.registry().keys(), None))
}

pub async fn run_query_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<QueryForm>,
) -> Html<String> {
    let name = form.query.unwrap_or_default();
    let model = state.executor.run(name.trim()).await;
    Html(page::render_page(
        &state.executor.registry().keys(),
        Some(&model),
    ))
}

pub async fn list_queries(State(state): State<Arc<AppState>>) -> Json<Vec<QueryDefinition>> {
    Json(state.executor.registry().definitions().to_vec())
}

pub async fn run_query_api(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> (StatusCode, Json<RenderModel>) {
    let model = state.executor.run(&name).await;
    let status = match &model.failure {
        None => StatusCode::OK,
        Some(GlanceError::InvalidSelection(_)) => StatusCode::NOT_FOUND,
        Some(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(model))
}
