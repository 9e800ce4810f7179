use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Service, Totals};
use crate::state::AppState;

// GET /services?serviceType=X
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesQuery {
    pub service_type: Option<String>,
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServicesQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let db = state.db();
    let services = queries::list_services(&db, query.service_type.as_deref())
        .map_err(AppError::db("fetching service"))?;
    Ok(Json(services))
}

// GET /totals
pub async fn totals(State(state): State<Arc<AppState>>) -> Result<Json<Totals>, AppError> {
    let db = state.db();
    let totals = queries::get_totals(&db).map_err(AppError::db("fetching totals"))?;
    Ok(Json(totals))
}

// GET /income
pub async fn income(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db();
    let total = queries::get_income(&db).map_err(AppError::db("retrieving total income"))?;
    Ok(Json(serde_json::json!({ "totalIncome": total })))
}
