use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use common::storage::types::categoria::{Categoria, CategoriaData};
use serde_json::json;
use tracing::info;

use crate::{api_state::ApiState, error::ApiError};

pub async fn create_category(
    State(state): State<ApiState>,
    Json(data): Json<CategoriaData>,
) -> Result<impl IntoResponse, ApiError> {
    let categoria = Categoria::create(data, &state.db).await?;
    info!(id = categoria.id, nombre = %categoria.nombre, "Created category");

    Ok((StatusCode::CREATED, Json(categoria)))
}

pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let categorias = Categoria::list(&state.db).await?;

    Ok(Json(categorias))
}

pub async fn get_category(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let categoria = Categoria::get(id, &state.db).await?;

    Ok(Json(categoria))
}

pub async fn update_category(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(data): Json<CategoriaData>,
) -> Result<impl IntoResponse, ApiError> {
    let categoria = Categoria::update(id, data, &state.db).await?;
    info!(id = categoria.id, nombre = %categoria.nombre, "Updated category");

    Ok(Json(categoria))
}

pub async fn delete_category(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    Categoria::delete(id, &state.db).await?;
    info!(id, "Deleted category");

    Ok(Json(json!({ "status": "deleted", "id": id })))
}
