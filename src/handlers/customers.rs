use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Customer;
use crate::state::AppState;

// GET /customers
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let db = state.db();
    let customers = queries::list_customers(&db).map_err(AppError::db("retrieving customers"))?;
    Ok(Json(customers))
}

// DELETE /customers/delete/:id
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = {
        let db = state.db();
        queries::delete_customer(&db, id).map_err(AppError::db("deleting customer"))?
    };

    if !deleted {
        return Err(AppError::NotFound("Customer"));
    }

    tracing::info!(customer_id = id, "customer deleted");
    Ok(Json(serde_json::json!({ "message": "Customer deleted successfully" })))
}
