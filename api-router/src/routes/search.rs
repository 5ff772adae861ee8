use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use common::storage::types::texto::Texto;
use serde::Deserialize;

use crate::{api_state::ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub palabra: Option<String>,
}

pub async fn search_texts(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let textos = Texto::search(params.palabra.as_deref(), &state.db).await?;

    Ok(Json(textos))
}
