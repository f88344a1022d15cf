use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::state::AppState;
use crate::core::diet::parse_diet;
use crate::domain::model::{CartAnalysis, ComboBundle};
use crate::utils::error::{BlueBlissError, Result};

#[derive(Debug, Deserialize)]
pub struct CombosQuery {
    diet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    user_id: String,
    message: String,
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| BlueBlissError::validation(rejection.body_text()))
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "ok", "combos": state.catalog.len() }))
}

pub async fn list_combos_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CombosQuery>,
) -> Result<Json<Vec<ComboBundle>>> {
    let combos = match query.diet.as_deref() {
        Some(diet) => state
            .catalog
            .filter_by_diet(parse_diet(diet)?)
            .into_iter()
            .cloned()
            .collect(),
        None => state.catalog.combos().to_vec(),
    };

    Ok(Json(combos))
}

pub async fn get_combo_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ComboBundle>> {
    Ok(Json(state.catalog.find(&id)?.clone()))
}

pub async fn trending_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "dishes": state.analyzer.trending() }))
}

pub async fn analyze_cart_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<CartAnalysis>> {
    let body = json_body(payload)?;
    Ok(Json(state.analyzer.analyze(&body).await?))
}

pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let request = json_body(payload)?;
    let reply = state
        .assistant
        .reply(&request.user_id, &request.message)
        .await?;

    Ok(Json(json!({ "reply": reply })))
}
